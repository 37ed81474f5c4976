//! Analytics events published by the backend.
//!
//! Handlers never block on a slow consumer: events go onto a bounded channel
//! with `try_send`, and a full channel drops the event with a log line.

use lessonframe_proto::{ReportEndpoint, StateTransitionReport, VersionReport};
use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::error::ServerError;

/// One published analytics event.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    /// Event name, e.g. `openclassroom.exploration.loaded`.
    pub name: &'static str,
    /// Event body with snake_case fields.
    pub payload: Value,
}

impl PublishedEvent {
    /// Event for a loaded or completed lesson.
    pub fn version(endpoint: ReportEndpoint, lesson_id: &str, report: &VersionReport) -> Self {
        Self {
            name: endpoint.event_name(),
            payload: json!({
                "exploration_id": lesson_id,
                "exploration_version": report.exploration_version,
            }),
        }
    }

    /// Event for a state transition. The learner's answer is not published.
    pub fn state_transition(lesson_id: &str, report: &StateTransitionReport) -> Self {
        Self {
            name: ReportEndpoint::StateTransition.event_name(),
            payload: json!({
                "exploration_id": lesson_id,
                "old_state_name": report.old_state_name,
                "new_state_name": report.new_state_name,
                "exploration_version": report.exploration_version,
            }),
        }
    }
}

/// Receiver half of the event channel.
pub type EventReceiver = mpsc::Receiver<PublishedEvent>;

/// Sending half of the event channel.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: mpsc::Sender<PublishedEvent>,
}

/// Create a bounded event channel holding at most `capacity` events.
pub fn channel(capacity: usize) -> (EventPublisher, EventReceiver) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (EventPublisher { sender }, receiver)
}

impl EventPublisher {
    /// Publish an event without waiting.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Internal` if the receiver is gone. A full
    /// channel is not an error.
    pub fn publish(&self, event: PublishedEvent) -> Result<(), ServerError> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(event)) => {
                tracing::warn!(event = event.name, "event channel full, dropping event");
                Ok(())
            },
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(ServerError::Internal("event channel closed".to_string()))
            },
        }
    }
}
