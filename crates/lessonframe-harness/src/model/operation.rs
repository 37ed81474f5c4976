//! Operations for model-based testing.
//!
//! Operations represent everything that can happen to a page after
//! discovery: learner clicks, messages from any window with any origin, and
//! the passage of time. They are generated randomly by proptest and applied
//! to both the model and the simulated page.

use arbitrary::Arbitrary;
use lessonframe_proto::{
    ExplorationCompleted, ExplorationLoaded, ExplorationReset, InboundMessage, StateTransition,
};

use super::world::{FOREIGN_ORIGIN, LESSON_ORIGIN, OTHER_LESSON_ORIGIN};

/// Index into the standard frame set. Values past its end name a window no
/// frame owns.
pub type FrameIndex = u8;

/// Operations that can be applied to the page.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Learner presses a frame's load button.
    Activate {
        /// Target frame.
        frame: FrameIndex,
    },

    /// A window posts a message to the host page.
    Post {
        /// Frame whose window sends the message.
        from: FrameIndex,
        /// Origin reported for the sender.
        origin: OriginChoice,
        /// Message body.
        message: ModelMessage,
    },

    /// Advance simulation time, firing due timers.
    AdvanceTime {
        /// Milliseconds to advance.
        millis: u16,
    },
}

/// Origins a sender may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum OriginChoice {
    /// The shared lesson origin.
    Lesson,
    /// The lesson origin with a trailing slash.
    LessonTrailingSlash,
    /// The lesson origin over plain HTTP.
    LessonHttp,
    /// The second lesson server.
    OtherLesson,
    /// An unrelated origin.
    Foreign,
}

impl OriginChoice {
    /// Origin string as the browser would report it.
    pub fn as_str(self) -> String {
        match self {
            Self::Lesson => LESSON_ORIGIN.to_string(),
            Self::LessonTrailingSlash => format!("{LESSON_ORIGIN}/"),
            Self::LessonHttp => LESSON_ORIGIN.replacen("https://", "http://", 1),
            Self::OtherLesson => OTHER_LESSON_ORIGIN.to_string(),
            Self::Foreign => FOREIGN_ORIGIN.to_string(),
        }
    }
}

/// Compact message bodies.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum ModelMessage {
    /// `explorationLoaded`.
    Loaded {
        /// Lesson version.
        version: u8,
    },
    /// `heightChange`; a zero height is malformed.
    Height {
        /// Height in pixels.
        height: u16,
        /// Scroll request.
        scroll: bool,
    },
    /// `stateTransition` between two numbered states.
    Transition {
        /// Old state number.
        from: u8,
        /// New state number.
        to: u8,
    },
    /// `explorationReset`.
    Reset {
        /// State number before the reset.
        state: u8,
    },
    /// `explorationCompleted`.
    Completed {
        /// Lesson version.
        version: u8,
    },
    /// Well-formed envelope with an unknown title.
    Unknown,
    /// Not JSON.
    Garbage,
}

impl ModelMessage {
    /// Decoded form, or `None` for bodies that do not decode.
    pub fn decoded(&self) -> Option<InboundMessage> {
        let message = match self {
            Self::Loaded { version } => InboundMessage::ExplorationLoaded(ExplorationLoaded {
                exploration_version: version.to_string(),
            }),
            Self::Height { height, scroll } => {
                let height = std::num::NonZeroU32::new(u32::from(*height))?;
                InboundMessage::HeightChange(lessonframe_proto::HeightChange {
                    height,
                    scroll: *scroll,
                })
            },
            Self::Transition { from, to } => InboundMessage::StateTransition(StateTransition {
                old_state_name: state_name(*from),
                json_answer: format!("{{\"choice\":{to}}}"),
                new_state_name: state_name(*to),
                exploration_version: "1".to_string(),
            }),
            Self::Reset { state } => InboundMessage::ExplorationReset(ExplorationReset {
                state_name: state_name(*state),
            }),
            Self::Completed { version } => {
                InboundMessage::ExplorationCompleted(ExplorationCompleted {
                    exploration_version: version.to_string(),
                })
            },
            Self::Unknown | Self::Garbage => return None,
        };
        Some(message)
    }

    /// JSON text a child would post.
    pub fn to_json(&self) -> String {
        match self {
            Self::Height { height: 0, scroll } => {
                format!(r#"{{"title":"heightChange","payload":{{"height":0,"scroll":{scroll}}}}}"#)
            },
            Self::Unknown => r#"{"title":"explorationPaused","payload":{}}"#.to_string(),
            Self::Garbage => "{\"title\":".to_string(),
            other => other.decoded().and_then(|message| message.encode().ok()).unwrap_or_default(),
        }
    }
}

fn state_name(index: u8) -> String {
    format!("State {index}")
}
