//! Child-to-parent message envelope.
//!
//! Every message posted by an embedded lesson is a JSON string of the form
//! `{"title": <kind>, "payload": {...}}`. The payload shape depends on the
//! title:
//!
//! | title                  | payload                                                          |
//! |------------------------|------------------------------------------------------------------|
//! | `explorationLoaded`    | `explorationVersion`                                             |
//! | `heightChange`         | `height` (positive integer), `scroll` (boolean)                  |
//! | `stateTransition`      | `oldStateName`, `jsonAnswer`, `newStateName`, `explorationVersion` |
//! | `explorationReset`     | `stateName`                                                      |
//! | `explorationCompleted` | `explorationVersion`                                             |
//!
//! `explorationVersion` arrives as a string from current lessons and as an
//! integer from older ones; both decode to a `String`.

use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EnvelopeError;

/// Discriminant of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    /// The lesson finished loading inside the frame.
    ExplorationLoaded,
    /// The lesson content changed height.
    HeightChange,
    /// The learner moved between lesson states.
    StateTransition,
    /// The learner restarted the lesson.
    ExplorationReset,
    /// The learner reached a terminal lesson state.
    ExplorationCompleted,
}

impl MessageKind {
    /// All kinds, in protocol order.
    pub const ALL: [Self; 5] = [
        Self::ExplorationLoaded,
        Self::HeightChange,
        Self::StateTransition,
        Self::ExplorationReset,
        Self::ExplorationCompleted,
    ];

    /// Wire title of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExplorationLoaded => "explorationLoaded",
            Self::HeightChange => "heightChange",
            Self::StateTransition => "stateTransition",
            Self::ExplorationReset => "explorationReset",
            Self::ExplorationCompleted => "explorationCompleted",
        }
    }

    /// Look up a kind by its wire title.
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == title)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `explorationLoaded` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationLoaded {
    /// Version of the lesson that loaded.
    #[serde(deserialize_with = "version_string")]
    pub exploration_version: String,
}

/// `heightChange` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightChange {
    /// New content height in pixels.
    pub height: NonZeroU32,
    /// Scroll the frame into view after resizing.
    #[serde(default)]
    pub scroll: bool,
}

/// `stateTransition` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTransition {
    /// State the learner left.
    pub old_state_name: String,
    /// JSON-encoded answer submitted in the old state.
    pub json_answer: String,
    /// State the learner entered.
    pub new_state_name: String,
    /// Version of the running lesson.
    #[serde(deserialize_with = "version_string")]
    pub exploration_version: String,
}

/// `explorationReset` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationReset {
    /// State the learner was in before the reset.
    pub state_name: String,
}

/// `explorationCompleted` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationCompleted {
    /// Version of the completed lesson.
    #[serde(deserialize_with = "version_string")]
    pub exploration_version: String,
}

/// A decoded child-to-parent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "title", content = "payload", rename_all = "camelCase")]
pub enum InboundMessage {
    /// See [`ExplorationLoaded`].
    ExplorationLoaded(ExplorationLoaded),
    /// See [`HeightChange`].
    HeightChange(HeightChange),
    /// See [`StateTransition`].
    StateTransition(StateTransition),
    /// See [`ExplorationReset`].
    ExplorationReset(ExplorationReset),
    /// See [`ExplorationCompleted`].
    ExplorationCompleted(ExplorationCompleted),
}

impl InboundMessage {
    /// Decode a message body.
    ///
    /// Unknown titles are reported separately from malformed bodies so the
    /// caller can log the former and silently drop the latter.
    ///
    /// # Errors
    ///
    /// - `EnvelopeError::Malformed` if the body is not a JSON object with a
    ///   string `title`, or the payload does not fit the title
    /// - `EnvelopeError::UnrecognizedKind` if the title is unknown
    pub fn decode(data: &str) -> Result<Self, EnvelopeError> {
        let value: serde_json::Value =
            serde_json::from_str(data).map_err(|e| EnvelopeError::malformed(&e))?;

        let title = value
            .get("title")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| EnvelopeError::Malformed { reason: "missing title".to_string() })?;

        if MessageKind::from_title(title).is_none() {
            return Err(EnvelopeError::UnrecognizedKind { title: title.to_string() });
        }

        serde_json::from_value(value).map_err(|e| EnvelopeError::malformed(&e))
    }

    /// Encode as the JSON string a child frame would post.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Kind of this message.
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::ExplorationLoaded(_) => MessageKind::ExplorationLoaded,
            Self::HeightChange(_) => MessageKind::HeightChange,
            Self::StateTransition(_) => MessageKind::StateTransition,
            Self::ExplorationReset(_) => MessageKind::ExplorationReset,
            Self::ExplorationCompleted(_) => MessageKind::ExplorationCompleted,
        }
    }
}

/// Deserialize an `explorationVersion` sent as a string or a number.
pub(crate) fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Version::deserialize(deserializer)? {
        Version::Text(text) => text,
        Version::Number(number) => number.to_string(),
    })
}
