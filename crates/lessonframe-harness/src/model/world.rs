//! Model world - the standard page and its observable state.
//!
//! Every model-based run starts from the same page of four placeholders:
//!
//! | frame | lesson  | source origin           | height  | autoload |
//! |-------|---------|-------------------------|---------|----------|
//! | 0     | `demo`  | [`LESSON_ORIGIN`]       | auto    | yes      |
//! | 1     | `quiz`  | [`LESSON_ORIGIN`]       | `500px` | no       |
//! | 2     | `intro` | [`OTHER_LESSON_ORIGIN`] | auto    | yes      |
//! | 3     | (none)  |                         |         |          |
//!
//! Frames 0 and 1 share an origin, so only the source window tells their
//! messages apart.

use lessonframe_core::{EmbedNode, FrameId, HookCall, NodeId, config::attr};

use super::{
    frame::{IndicatorState, ModelFrame, ModelLifecycle},
    operation::{ModelMessage, Operation, OriginChoice},
};
use crate::{document::LoadingIndicator, recording::RecordingHooks, sim_page::SimPage};

/// Origin of the host page.
pub const PAGE_ORIGIN: &str = "https://host.example.org";

/// Origin of frames 0 and 1.
pub const LESSON_ORIGIN: &str = "https://lessons.example.org";

/// Origin of frame 2.
pub const OTHER_LESSON_ORIGIN: &str = "https://lessons.example.net";

/// An origin no frame uses.
pub const FOREIGN_ORIGIN: &str = "https://attacker.example.com";

/// Number of frames on the standard page.
pub const STANDARD_FRAMES: usize = 4;

/// Placeholders of the standard page, in discovery order.
pub fn standard_nodes() -> Vec<EmbedNode> {
    vec![
        EmbedNode::new(NodeId(1)).attr(attr::LESSON_ID, "demo").attr(attr::SRC, LESSON_ORIGIN),
        EmbedNode::new(NodeId(2))
            .attr(attr::LESSON_ID, "quiz")
            .attr(attr::SRC, LESSON_ORIGIN)
            .attr(attr::HEIGHT, "500px")
            .attr(attr::AUTOLOAD, "false"),
        EmbedNode::new(NodeId(3))
            .attr(attr::LESSON_ID, "intro")
            .attr(attr::SRC, OTHER_LESSON_ORIGIN),
        EmbedNode::new(NodeId(4)),
    ]
}

/// What a test can observe about one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameObservation {
    /// Lifecycle state name.
    pub state: &'static str,
    /// Warning box shown.
    pub warning: bool,
    /// Load button shown.
    pub load_button: bool,
    /// Loading indicator.
    pub indicator: IndicatorState,
    /// Frame hidden, once it exists.
    pub hidden: Option<bool>,
    /// Rendered height, once the frame exists.
    pub height: Option<u32>,
    /// Scroll requests.
    pub scrolls: u32,
}

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Per-frame observations, by frame index.
    pub frames: Vec<FrameObservation>,
    /// Hook calls in order.
    pub hooks: Vec<(FrameId, HookCall)>,
}

impl ObservableState {
    /// Observe a simulated page.
    pub fn from_sim(sim: &SimPage<RecordingHooks>) -> Self {
        let frames = (0..STANDARD_FRAMES)
            .map(|index| {
                let id = frame_id(index);
                let view = sim.document().view(id).cloned().unwrap_or_default();
                let element = view.frame.as_ref();

                FrameObservation {
                    state: sim.state(id).map_or("unknown", |state| state.as_str()),
                    warning: view.warning.is_some(),
                    load_button: view.load_button.is_some(),
                    indicator: match view.loading_indicator {
                        None => IndicatorState::Absent,
                        Some(LoadingIndicator::Loading { .. }) => IndicatorState::Loading,
                        Some(LoadingIndicator::Failed { .. }) => IndicatorState::Failed,
                    },
                    hidden: element.map(|e| e.hidden),
                    height: element.and_then(|e| e.rendered_height()),
                    scrolls: element.map_or(0, |e| e.scroll_count),
                }
            })
            .collect();

        Self { frames, hooks: sim.hooks().calls().to_vec() }
    }
}

/// Model world - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    frames: Vec<ModelFrame>,
    now: u64,
    hooks: Vec<(FrameId, HookCall)>,
}

impl ModelWorld {
    /// The standard page right after discovery.
    pub fn new() -> Self {
        let frames = vec![
            ModelFrame::loading(LESSON_ORIGIN, None, 0),
            ModelFrame::awaiting(LESSON_ORIGIN, Some(500)),
            ModelFrame::loading(OTHER_LESSON_ORIGIN, None, 0),
            ModelFrame::invalid(),
        ];

        Self { frames, now: 0, hooks: Vec::new() }
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::Activate { frame } => {
                if let Some(model) = self.frames.get_mut(usize::from(*frame)) {
                    model.activate(self.now);
                }
            },
            Operation::Post { from, origin, message } => self.post(*from, *origin, message),
            Operation::AdvanceTime { millis } => {
                self.now += u64::from(*millis);
                for frame in &mut self.frames {
                    frame.tick(self.now);
                }
            },
        }
    }

    fn post(&mut self, from: u8, origin: OriginChoice, message: &ModelMessage) {
        let index = usize::from(from);
        let Some(frame) = self.frames.get_mut(index) else {
            return;
        };
        if !frame.accepts(&origin.as_str()) {
            return;
        }
        let Some(decoded) = message.decoded() else {
            return;
        };
        if let Some(call) = frame.receive(decoded) {
            self.hooks.push((frame_id(index), call));
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let frames = self
            .frames
            .iter()
            .map(|frame| {
                let lifecycle = frame.lifecycle();
                FrameObservation {
                    state: lifecycle.as_str(),
                    warning: lifecycle == ModelLifecycle::Invalid,
                    load_button: lifecycle == ModelLifecycle::AwaitingManualLoad,
                    indicator: frame.indicator(),
                    hidden: frame.hidden(),
                    height: frame.height(),
                    scrolls: frame.scrolls(),
                }
            })
            .collect();

        ObservableState { frames, hooks: self.hooks.clone() }
    }
}

impl Default for ModelWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame id of the frame at `index` on the standard page.
pub fn frame_id(index: usize) -> FrameId {
    FrameId(u32::try_from(index).unwrap_or(u32::MAX))
}
