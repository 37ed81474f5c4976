//! Reference model of one embedded frame.

use lessonframe_core::{HookCall, LOAD_TIMEOUT};
use lessonframe_proto::InboundMessage;

/// Default frame height in pixels.
const DEFAULT_HEIGHT_PX: u32 = 700;

/// Lifecycle as the model sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelLifecycle {
    /// Configuration error.
    Invalid,
    /// Load button shown.
    AwaitingManualLoad,
    /// Frame mounted, not loaded.
    Loading,
    /// Lesson running.
    Loaded,
    /// Lesson completed.
    Completed,
}

impl ModelLifecycle {
    /// Same names as [`lessonframe_core::FrameState::as_str`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::AwaitingManualLoad => "awaiting_manual_load",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Completed => "completed",
        }
    }

    fn has_frame(self) -> bool {
        matches!(self, Self::Loading | Self::Loaded | Self::Completed)
    }
}

/// Loading indicator as the model sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// Not shown.
    Absent,
    /// Waiting for the lesson.
    Loading,
    /// Timed out.
    Failed,
}

/// One frame of the reference model.
#[derive(Debug, Clone)]
pub struct ModelFrame {
    origin: Option<&'static str>,
    fixed_height: Option<u32>,
    lifecycle: ModelLifecycle,
    has_loaded: bool,
    indicator: IndicatorState,
    hidden: bool,
    reveal_due: bool,
    timeout_at: Option<u64>,
    height: u32,
    scrolls: u32,
}

impl ModelFrame {
    /// A frame with no lesson id.
    pub fn invalid() -> Self {
        Self::with_lifecycle(ModelLifecycle::Invalid, None, None)
    }

    /// A frame loading from `origin` since `now`.
    pub fn loading(origin: &'static str, fixed_height: Option<u32>, now: u64) -> Self {
        let mut frame = Self::awaiting(origin, fixed_height);
        frame.activate(now);
        frame
    }

    /// A frame waiting for its load button.
    pub fn awaiting(origin: &'static str, fixed_height: Option<u32>) -> Self {
        Self::with_lifecycle(ModelLifecycle::AwaitingManualLoad, Some(origin), fixed_height)
    }

    fn with_lifecycle(
        lifecycle: ModelLifecycle,
        origin: Option<&'static str>,
        fixed_height: Option<u32>,
    ) -> Self {
        Self {
            origin,
            fixed_height,
            lifecycle,
            has_loaded: false,
            indicator: IndicatorState::Absent,
            hidden: true,
            reveal_due: false,
            timeout_at: None,
            height: fixed_height.unwrap_or(DEFAULT_HEIGHT_PX),
            scrolls: 0,
        }
    }

    /// Learner pressed the load button.
    pub fn activate(&mut self, now: u64) {
        if self.lifecycle != ModelLifecycle::AwaitingManualLoad {
            return;
        }
        self.lifecycle = ModelLifecycle::Loading;
        self.indicator = IndicatorState::Loading;
        self.timeout_at = Some(now + timeout_millis());
    }

    /// True if a message from this frame's window carrying `origin` is
    /// accepted.
    pub fn accepts(&self, origin: &str) -> bool {
        self.lifecycle.has_frame() && self.origin == Some(origin)
    }

    /// Apply an accepted message, returning the hook call it causes.
    pub fn receive(&mut self, message: InboundMessage) -> Option<HookCall> {
        match message {
            InboundMessage::ExplorationLoaded(loaded) => {
                if self.lifecycle != ModelLifecycle::Loading {
                    return None;
                }
                self.lifecycle = ModelLifecycle::Loaded;
                self.has_loaded = true;
                self.indicator = IndicatorState::Absent;
                self.timeout_at = None;
                self.reveal_due = true;
                Some(HookCall::ExplorationLoaded {
                    exploration_version: loaded.exploration_version,
                })
            },
            InboundMessage::HeightChange(change) => {
                if self.fixed_height.is_none() {
                    self.height = change.height.get();
                }
                if change.scroll {
                    self.scrolls += 1;
                }
                Some(HookCall::HeightChange { height: change.height.get() })
            },
            InboundMessage::StateTransition(transition) => {
                Some(HookCall::StateTransition(transition))
            },
            InboundMessage::ExplorationReset(reset) => {
                if self.lifecycle == ModelLifecycle::Completed {
                    self.lifecycle = ModelLifecycle::Loaded;
                }
                Some(HookCall::ExplorationReset { state_name: reset.state_name })
            },
            InboundMessage::ExplorationCompleted(completed) => {
                if self.lifecycle != ModelLifecycle::Loaded {
                    return None;
                }
                self.lifecycle = ModelLifecycle::Completed;
                Some(HookCall::ExplorationCompleted {
                    exploration_version: completed.exploration_version,
                })
            },
        }
    }

    /// Time moved to `now`.
    pub fn tick(&mut self, now: u64) {
        if self.timeout_at.is_some_and(|at| at <= now) {
            self.timeout_at = None;
            if !self.has_loaded {
                self.indicator = IndicatorState::Failed;
            }
        }
        if self.reveal_due {
            self.reveal_due = false;
            self.hidden = false;
        }
    }

    /// Lifecycle state.
    pub fn lifecycle(&self) -> ModelLifecycle {
        self.lifecycle
    }

    /// Loading indicator.
    pub fn indicator(&self) -> IndicatorState {
        self.indicator
    }

    /// Hidden flag, once the frame exists.
    pub fn hidden(&self) -> Option<bool> {
        self.lifecycle.has_frame().then_some(self.hidden)
    }

    /// Rendered height, once the frame exists.
    pub fn height(&self) -> Option<u32> {
        self.lifecycle.has_frame().then_some(self.height)
    }

    /// Scroll requests so far.
    pub fn scrolls(&self) -> u32 {
        self.scrolls
    }
}

fn timeout_millis() -> u64 {
    u64::try_from(LOAD_TIMEOUT.as_millis()).unwrap_or(u64::MAX)
}
