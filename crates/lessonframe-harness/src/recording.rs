//! Post-hooks that remember every call.

use lessonframe_core::{FrameId, HookCall, PostHooks};
use lessonframe_proto::StateTransition;

/// Records hook invocations in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingHooks {
    calls: Vec<(FrameId, HookCall)>,
}

impl RecordingHooks {
    /// No calls recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far.
    pub fn calls(&self) -> &[(FrameId, HookCall)] {
        &self.calls
    }

    /// Calls made for `frame`.
    pub fn calls_for(&self, frame: FrameId) -> Vec<&HookCall> {
        self.calls.iter().filter(|(f, _)| *f == frame).map(|(_, call)| call).collect()
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl PostHooks for RecordingHooks {
    fn on_height_change(&mut self, frame: FrameId, height: u32) {
        self.calls.push((frame, HookCall::HeightChange { height }));
    }

    fn on_exploration_loaded(&mut self, frame: FrameId, exploration_version: &str) {
        self.calls.push((
            frame,
            HookCall::ExplorationLoaded { exploration_version: exploration_version.to_string() },
        ));
    }

    fn on_state_transition(&mut self, frame: FrameId, transition: &StateTransition) {
        self.calls.push((frame, HookCall::StateTransition(transition.clone())));
    }

    fn on_exploration_reset(&mut self, frame: FrameId, state_name: &str) {
        self.calls
            .push((frame, HookCall::ExplorationReset { state_name: state_name.to_string() }));
    }

    fn on_exploration_completed(&mut self, frame: FrameId, exploration_version: &str) {
        self.calls.push((
            frame,
            HookCall::ExplorationCompleted { exploration_version: exploration_version.to_string() },
        ));
    }
}
