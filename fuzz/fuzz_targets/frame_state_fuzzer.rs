//! Fuzz target for the [`FrameController`] state machine
//!
//! Drives one controller with arbitrary placeholder attributes and event
//! sequences, including events that make no sense in the current state.
//!
//! # Invariants
//!
//! - The frame is mounted at most once
//! - `Invalid` is terminal: no action ever follows it
//! - Once loaded, the load failure message is never shown
//! - `Completed` is only reachable from `Loaded`
//! - NEVER panic on an out-of-order event

#![no_main]

use std::num::NonZeroU32;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lessonframe_core::{
    EmbedContext, EmbedNode, FrameAction, FrameController, FrameEvent, FrameId, FrameState,
    FrameTimer, NodeId, config::attr,
};
use lessonframe_harness::SimEnv;
use lessonframe_proto::{
    ExplorationCompleted, ExplorationLoaded, ExplorationReset, HeightChange, InboundMessage,
    Origin, StateTransition,
};

#[derive(Debug, Arbitrary)]
struct Placeholder {
    lesson_id: Option<String>,
    src: Option<String>,
    height: Option<String>,
    autoload: Option<String>,
    tag: Option<String>,
}

#[derive(Debug, Arbitrary)]
enum Event {
    Mount,
    ManualLoad,
    LoadTimeout,
    Reveal,
    Loaded,
    Height { height: u32, scroll: bool },
    Transition,
    Reset,
    Completed,
}

impl Event {
    fn into_frame_event(self) -> FrameEvent {
        let version = || "1".to_string();
        match self {
            Self::Mount => FrameEvent::Mount,
            Self::ManualLoad => FrameEvent::ManualLoad,
            Self::LoadTimeout => FrameEvent::TimerFired(FrameTimer::LoadTimeout),
            Self::Reveal => FrameEvent::TimerFired(FrameTimer::Reveal),
            Self::Loaded => FrameEvent::Message(InboundMessage::ExplorationLoaded(
                ExplorationLoaded { exploration_version: version() },
            )),
            Self::Height { height, scroll } => {
                FrameEvent::Message(InboundMessage::HeightChange(HeightChange {
                    height: NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
                    scroll,
                }))
            },
            Self::Transition => {
                FrameEvent::Message(InboundMessage::StateTransition(StateTransition {
                    old_state_name: "A".to_string(),
                    json_answer: "null".to_string(),
                    new_state_name: "B".to_string(),
                    exploration_version: version(),
                }))
            },
            Self::Reset => FrameEvent::Message(InboundMessage::ExplorationReset(ExplorationReset {
                state_name: "B".to_string(),
            })),
            Self::Completed => FrameEvent::Message(InboundMessage::ExplorationCompleted(
                ExplorationCompleted { exploration_version: version() },
            )),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    placeholder: Placeholder,
    events: Vec<Event>,
}

fuzz_target!(|input: Input| {
    let env = SimEnv::with_seed(0);
    let origin = Origin::new("https://host.example.org");
    let ctx = EmbedContext::bootstrap(&env, origin).expect("simulated entropy");

    let p = input.placeholder;
    let mut node = match p.tag {
        Some(tag) => EmbedNode::with_tag(NodeId(1), tag),
        None => EmbedNode::new(NodeId(1)),
    };
    for (name, value) in [
        (attr::LESSON_ID, p.lesson_id),
        (attr::SRC, p.src),
        (attr::HEIGHT, p.height),
        (attr::AUTOLOAD, p.autoload),
    ] {
        if let Some(value) = value {
            node.set_attr(name, &value);
        }
    }

    let mut controller = FrameController::new(FrameId(0), node);
    let mut mounts = 0;
    for event in input.events {
        let before = controller.state();
        let actions = controller.handle(event.into_frame_event(), &ctx);
        let after = controller.state();

        if before == FrameState::Invalid {
            assert!(actions.is_empty(), "action after invalid: {actions:?}");
        }
        if after == FrameState::Completed && before != FrameState::Completed {
            assert_eq!(before, FrameState::Loaded);
        }
        for action in &actions {
            match action {
                FrameAction::MountFrame(_) => mounts += 1,
                FrameAction::ShowLoadFailure { .. } => {
                    assert!(!controller.session().has_loaded(), "failure shown after load");
                },
                _ => {},
            }
        }
        assert!(mounts <= 1, "frame mounted twice");
    }
});
