//! Lifecycle reports sent from the host page to the host backend.
//!
//! Each report is one JSON POST to a handler endpoint. Bodies mirror the
//! inbound message payload that triggered them.

use serde::{Deserialize, Serialize};

/// Backend handler receiving a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportEndpoint {
    /// Lesson finished loading.
    ExplorationLoaded,
    /// Learner changed state.
    StateTransition,
    /// Learner completed the lesson.
    ExplorationCompleted,
}

impl ReportEndpoint {
    /// Handler name, the last path segment of the endpoint.
    pub const fn handler_name(self) -> &'static str {
        match self {
            Self::ExplorationLoaded => "on_exploration_loaded",
            Self::StateTransition => "on_state_transition",
            Self::ExplorationCompleted => "on_exploration_completed",
        }
    }

    /// Request path of the handler.
    pub fn path(self) -> String {
        format!("/handler/{}", self.handler_name())
    }

    /// Name under which the backend publishes the event.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::ExplorationLoaded => "openclassroom.exploration.loaded",
            Self::StateTransition => "openclassroom.exploration.state.changed",
            Self::ExplorationCompleted => "openclassroom.exploration.completed",
        }
    }
}

/// Body of the loaded and completed reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionReport {
    /// Lesson version.
    #[serde(deserialize_with = "crate::envelope::version_string")]
    pub exploration_version: String,
}

/// Body of the state transition report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTransitionReport {
    /// State the learner left.
    pub old_state_name: String,
    /// JSON-encoded answer. Absent from reports built by older pages.
    #[serde(default)]
    pub json_answer: String,
    /// State the learner entered.
    pub new_state_name: String,
    /// Lesson version.
    #[serde(deserialize_with = "crate::envelope::version_string")]
    pub exploration_version: String,
}

/// A report ready to be POSTed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    /// Target handler.
    pub endpoint: ReportEndpoint,
    /// JSON body.
    pub body: serde_json::Value,
}

impl AnalyticsReport {
    /// Report for a loaded or completed lesson.
    pub fn version(endpoint: ReportEndpoint, exploration_version: &str) -> Self {
        let body = serde_json::json!({ "explorationVersion": exploration_version });
        Self { endpoint, body }
    }

    /// Report for a state transition.
    pub fn state_transition(report: &StateTransitionReport) -> Self {
        let body = serde_json::json!({
            "oldStateName": report.old_state_name,
            "jsonAnswer": report.json_answer,
            "newStateName": report.new_state_name,
            "explorationVersion": report.exploration_version,
        });
        Self { endpoint: ReportEndpoint::StateTransition, body }
    }
}
