//! Post-hooks: host-supplied notifications for lifecycle events.
//!
//! Controllers never call hooks directly. They return
//! [`FrameAction::Hook`](crate::FrameAction::Hook) carrying a [`HookCall`],
//! and the driver dispatches it to whatever [`PostHooks`] the host installed.

use lessonframe_proto::{AnalyticsReport, ReportEndpoint, StateTransition, StateTransitionReport};

use crate::controller::FrameId;

/// Overridable lifecycle notifications. Every method defaults to a no-op.
pub trait PostHooks {
    /// The frame was resized after a `heightChange` message.
    fn on_height_change(&mut self, _frame: FrameId, _height: u32) {}

    /// The lesson loaded.
    fn on_exploration_loaded(&mut self, _frame: FrameId, _exploration_version: &str) {}

    /// The learner moved between lesson states.
    fn on_state_transition(&mut self, _frame: FrameId, _transition: &StateTransition) {}

    /// The lesson was reset; `state_name` is the state before the reset.
    fn on_exploration_reset(&mut self, _frame: FrameId, _state_name: &str) {}

    /// The lesson was completed.
    fn on_exploration_completed(&mut self, _frame: FrameId, _exploration_version: &str) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl PostHooks for NoopHooks {}

/// A pending hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookCall {
    /// See [`PostHooks::on_height_change`].
    HeightChange {
        /// New height in pixels.
        height: u32,
    },
    /// See [`PostHooks::on_exploration_loaded`].
    ExplorationLoaded {
        /// Loaded lesson version.
        exploration_version: String,
    },
    /// See [`PostHooks::on_state_transition`].
    StateTransition(StateTransition),
    /// See [`PostHooks::on_exploration_reset`].
    ExplorationReset {
        /// State before the reset.
        state_name: String,
    },
    /// See [`PostHooks::on_exploration_completed`].
    ExplorationCompleted {
        /// Completed lesson version.
        exploration_version: String,
    },
}

impl HookCall {
    /// Invoke the matching method on `hooks`.
    pub fn dispatch<H: PostHooks + ?Sized>(&self, frame: FrameId, hooks: &mut H) {
        match self {
            Self::HeightChange { height } => hooks.on_height_change(frame, *height),
            Self::ExplorationLoaded { exploration_version } => {
                hooks.on_exploration_loaded(frame, exploration_version);
            },
            Self::StateTransition(transition) => hooks.on_state_transition(frame, transition),
            Self::ExplorationReset { state_name } => hooks.on_exploration_reset(frame, state_name),
            Self::ExplorationCompleted { exploration_version } => {
                hooks.on_exploration_completed(frame, exploration_version);
            },
        }
    }
}

/// Destination of analytics reports, typically an HTTP client.
pub trait ReportSink {
    /// Hand over one report.
    fn submit(&mut self, frame: FrameId, report: AnalyticsReport);
}

impl<F> ReportSink for F
where
    F: FnMut(FrameId, AnalyticsReport),
{
    fn submit(&mut self, frame: FrameId, report: AnalyticsReport) {
        self(frame, report);
    }
}

/// Hooks that report loads, state transitions and completions to the host
/// backend.
#[derive(Debug)]
pub struct AnalyticsHooks<S> {
    sink: S,
}

impl<S: ReportSink> AnalyticsHooks<S> {
    /// Report through `sink`.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give the sink back.
    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: ReportSink> PostHooks for AnalyticsHooks<S> {
    fn on_exploration_loaded(&mut self, frame: FrameId, exploration_version: &str) {
        let report =
            AnalyticsReport::version(ReportEndpoint::ExplorationLoaded, exploration_version);
        self.sink.submit(frame, report);
    }

    fn on_state_transition(&mut self, frame: FrameId, transition: &StateTransition) {
        let report = AnalyticsReport::state_transition(&StateTransitionReport {
            old_state_name: transition.old_state_name.clone(),
            json_answer: transition.json_answer.clone(),
            new_state_name: transition.new_state_name.clone(),
            exploration_version: transition.exploration_version.clone(),
        });
        self.sink.submit(frame, report);
    }

    fn on_exploration_completed(&mut self, frame: FrameId, exploration_version: &str) {
        let report =
            AnalyticsReport::version(ReportEndpoint::ExplorationCompleted, exploration_version);
        self.sink.submit(frame, report);
    }
}
