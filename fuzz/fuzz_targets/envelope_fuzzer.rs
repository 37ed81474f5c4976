//! Fuzz target for inbound message decoding and routing
//!
//! Any string a foreign window posts must be handled without panicking.
//!
//! # Invariants
//!
//! - `InboundMessage::decode` NEVER panics
//! - A decoded message re-encodes and decodes to itself
//! - Wrong origin or unknown window is ALWAYS `AuthenticationFailure`,
//!   whatever the body
//! - A `heightChange` that decodes always has a positive height

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lessonframe_core::{
    EmbedContext, EmbedNode, FrameId, InboundEnvelope, MessageRouter, NodeId, RouteError,
    WindowId, config::attr,
};
use lessonframe_harness::SimEnv;
use lessonframe_proto::{InboundMessage, Origin};

const LESSONS: &str = "https://lessons.example.org";

#[derive(Debug, Arbitrary)]
struct Input {
    origin: String,
    window: Option<u64>,
    data: String,
}

fuzz_target!(|input: Input| {
    if let Ok(message) = InboundMessage::decode(&input.data) {
        if let InboundMessage::HeightChange(change) = &message {
            assert!(change.height.get() > 0);
        }
        let encoded = message.encode().expect("decoded message must encode");
        assert_eq!(InboundMessage::decode(&encoded).ok(), Some(message));
    }

    let env = SimEnv::with_seed(0);
    let origin = Origin::new("https://host.example.org");
    let ctx = EmbedContext::bootstrap(&env, origin).expect("simulated entropy");
    let mut page = lessonframe_core::EmbedPage::new(ctx);
    page.discover([EmbedNode::new(NodeId(1))
        .attr(attr::LESSON_ID, "demo")
        .attr(attr::SRC, LESSONS)]);
    page.attach_window(FrameId(0), WindowId(1));

    let envelope = InboundEnvelope {
        origin: input.origin.clone(),
        source: input.window.map(WindowId),
        data: input.data,
    };
    let trusted = input.origin == LESSONS && input.window == Some(1);
    let result = page.receive(&envelope);
    if !trusted {
        assert_eq!(result, Err(RouteError::AuthenticationFailure));
    }

    let router = MessageRouter::new();
    assert_eq!(router.authenticate(&envelope).err(), Some(RouteError::AuthenticationFailure));
});
