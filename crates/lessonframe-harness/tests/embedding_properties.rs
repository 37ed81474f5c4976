//! Embedding properties checked against the simulated page.

use std::time::Duration;

use lessonframe_core::{
    EmbedNode, FrameState, FrameTimer, HookCall, NodeId, RouteError, SECRET_LENGTH,
    SecretGenerator, WindowId, config::attr,
};
use lessonframe_harness::{InlineHeight, SimEnv, SimPage};
use lessonframe_proto::{FragmentParams, HeightChange, InboundMessage};
use proptest::prelude::*;

const PAGE: &str = "https://host.example.org";
const LESSONS: &str = "https://lessons.example.org";
const LOADED: &str = r#"{"title":"explorationLoaded","payload":{"explorationVersion":"3"}}"#;

fn lesson(id: u64) -> EmbedNode {
    EmbedNode::new(NodeId(id)).attr(attr::LESSON_ID, "demo").attr(attr::SRC, LESSONS)
}

fn height_change(height: u32, scroll: bool) -> String {
    let message = InboundMessage::HeightChange(HeightChange {
        height: std::num::NonZeroU32::new(height).unwrap_or(std::num::NonZeroU32::MIN),
        scroll,
    });
    message.encode().unwrap_or_default()
}

fn reset() -> String {
    r#"{"title":"explorationReset","payload":{"stateName":"Question 2"}}"#.to_string()
}

proptest! {
    #[test]
    fn prop_secret_length_and_alphabet(seed in any::<u64>(), length in 0usize..256) {
        let secret = SecretGenerator::generate(&SimEnv::with_seed(seed), length).expect("entropy");

        prop_assert_eq!(secret.len(), length);
        prop_assert!(secret.expose().bytes().all(|b| b.is_ascii_uppercase()));
    }

    #[test]
    fn prop_independent_secrets_differ(seed in any::<u64>()) {
        let env = SimEnv::with_seed(seed);
        let a = SecretGenerator::generate(&env, SECRET_LENGTH).expect("entropy");
        let b = SecretGenerator::generate(&env, SECRET_LENGTH).expect("entropy");

        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_origin_mismatch_never_transitions(suffix in "[/:a-z0-9.]{1,8}") {
        let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
        let frame = sim.discover([lesson(1)])[0];
        let window = sim.window_of(frame);

        for origin in [format!("{LESSONS}{suffix}"), LESSONS.replacen("https", "http", 1)] {
            prop_assert_eq!(
                sim.post_as(window, &origin, LOADED),
                Err(RouteError::AuthenticationFailure)
            );
        }

        prop_assert_eq!(sim.state(frame), Some(FrameState::Loading));
        prop_assert!(sim.hooks().calls().is_empty());
        prop_assert!(sim.reported_errors().is_empty());
    }
}

#[test]
fn same_seed_same_frame_location() {
    let locations: Vec<_> = (0..2)
        .map(|_| {
            let mut sim = SimPage::new(77, PAGE).expect("bootstrap");
            let frame = sim.discover([lesson(1)])[0];
            sim.document().frame(frame).map(|f| f.src.clone())
        })
        .collect();

    assert_eq!(locations[0], locations[1]);
}

#[test]
fn all_frames_share_the_page_secret() {
    let mut sim = SimPage::new(5, PAGE).expect("bootstrap");
    let frames = sim.discover([lesson(1), lesson(2)]);

    let secrets: Vec<_> = frames
        .iter()
        .map(|&frame| {
            let src = &sim.document().frame(frame).map(|f| f.src.clone()).unwrap_or_default();
            FragmentParams::from_uri(src).secret
        })
        .collect();

    assert_eq!(secrets[0].as_deref(), Some(sim.page().context().secret().expose()));
    assert_eq!(secrets[0], secrets[1]);
}

#[test]
fn trailing_slash_and_scheme_are_rejected() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1)])[0];
    let window = sim.window_of(frame);

    for origin in [format!("{LESSONS}/"), "http://lessons.example.org".to_string()] {
        assert_eq!(sim.post_as(window, &origin, LOADED), Err(RouteError::AuthenticationFailure));
    }

    assert_eq!(sim.state(frame), Some(FrameState::Loading));
    assert!(sim.hooks().calls().is_empty());
}

#[test]
fn same_origin_other_window_is_dropped() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frames = sim.discover([lesson(1), lesson(2)]);

    // A window nobody registered, with the right origin and a valid body.
    assert_eq!(
        sim.post_as(Some(WindowId(999)), LESSONS, LOADED),
        Err(RouteError::AuthenticationFailure)
    );
    assert_eq!(sim.state(frames[0]), Some(FrameState::Loading));
    assert_eq!(sim.state(frames[1]), Some(FrameState::Loading));

    // The sibling frame's window only ever speaks for the sibling.
    sim.post_from_child(frames[1], LOADED).expect("delivered");
    assert_eq!(sim.state(frames[0]), Some(FrameState::Loading));
    assert_eq!(sim.state(frames[1]), Some(FrameState::Loaded));
    assert!(sim.hooks().calls_for(frames[0]).is_empty());
}

#[test]
fn manual_load_creates_exactly_one_frame() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1).attr(attr::AUTOLOAD, "false")])[0];

    assert_eq!(sim.document().frame_count(), 0);
    assert_eq!(sim.state(frame), Some(FrameState::AwaitingManualLoad));
    let view = sim.document().view(frame).cloned().unwrap_or_default();
    assert_eq!(view.load_button.as_deref(), Some("Load Lesson"));
    assert_eq!(view.autoload_attr.as_deref(), Some("true"));

    sim.activate(frame);
    assert_eq!(sim.state(frame), Some(FrameState::Loading));
    assert_eq!(sim.document().frame_count(), 1);
    let first_window = sim.window_of(frame);

    sim.activate(frame);
    sim.activate(frame);
    assert_eq!(sim.document().frame_count(), 1);
    assert_eq!(sim.window_of(frame), first_window);
    assert_eq!(sim.page().router().len(), 1);
    let autoload = sim.page().controller(frame).map(|c| c.node().get_attr(attr::AUTOLOAD));
    assert_eq!(autoload, Some(Some("true")));
}

#[test]
fn auto_height_follows_child() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1).attr(attr::HEIGHT, "auto")])[0];

    sim.post_from_child(frame, &height_change(450, false)).expect("delivered");

    let element = sim.document().frame(frame).cloned();
    assert_eq!(element.as_ref().and_then(|e| e.rendered_height()), Some(450));
    assert_eq!(element.map(|e| e.scroll_count), Some(0));
    assert_eq!(sim.hooks().calls(), &[(frame, HookCall::HeightChange { height: 450 })]);
}

#[test]
fn fixed_height_ignores_child() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1).attr(attr::HEIGHT, "500px")])[0];

    sim.post_from_child(frame, &height_change(450, true)).expect("delivered");

    let element = sim.document().frame(frame).cloned();
    assert_eq!(element.as_ref().and_then(|e| e.rendered_height()), Some(500));
    assert_eq!(element.map(|e| e.scroll_count), Some(1));
}

#[test]
fn reset_lets_frame_shrink() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1)])[0];
    sim.post_from_child(frame, LOADED).expect("delivered");
    sim.post_from_child(frame, &height_change(900, false)).expect("delivered");

    // A host script pinned the tall height inline.
    sim.document_mut().pin_inline_height(frame, 900);

    sim.post_from_child(frame, &reset()).expect("delivered");
    assert_eq!(sim.document().frame(frame).map(|f| f.inline_height), Some(InlineHeight::Auto));

    sim.post_from_child(frame, &height_change(300, false)).expect("delivered");
    assert_eq!(sim.document().frame(frame).and_then(|f| f.rendered_height()), Some(300));
}

#[test]
fn late_timeout_never_regresses_loaded_ui() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1)])[0];

    sim.advance(Duration::from_millis(9_999));
    sim.post_from_child(frame, LOADED).expect("delivered");
    assert!(!sim.is_armed(frame, FrameTimer::LoadTimeout));

    sim.advance(Duration::from_secs(30));

    let view = sim.document().view(frame).cloned().unwrap_or_default();
    assert_eq!(view.loading_indicator, None);
    assert_eq!(view.frame.map(|f| f.hidden), Some(false));
}

#[test]
fn timeout_then_load_recovers() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1)])[0];

    sim.advance(Duration::from_secs(10));
    let view = sim.document().view(frame).cloned().unwrap_or_default();
    assert!(matches!(
        view.loading_indicator,
        Some(lessonframe_harness::LoadingIndicator::Failed { ref message, ref subtitle })
            if message == "This lesson could not be loaded." && subtitle == "Sorry about that."
    ));

    sim.post_from_child(frame, LOADED).expect("delivered");
    sim.settle();

    let view = sim.document().view(frame).cloned().unwrap_or_default();
    assert_eq!(view.loading_indicator, None);
    assert_eq!(view.frame.map(|f| f.hidden), Some(false));
    assert_eq!(sim.state(frame), Some(FrameState::Loaded));
}

#[test]
fn unrecognized_kind_is_reported_not_applied() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1)])[0];

    let result = sim.post_from_child(frame, r#"{"title":"explorationPaused","payload":{}}"#);

    assert_eq!(
        result,
        Err(RouteError::UnrecognizedKind { title: "explorationPaused".to_string() })
    );
    assert_eq!(sim.reported_errors().len(), 1);
    assert_eq!(sim.state(frame), Some(FrameState::Loading));
}

#[test]
fn malformed_message_is_silent() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([lesson(1)])[0];

    for body in ["{", r#"{"payload":{}}"#, r#"{"title":"heightChange","payload":{"height":-4}}"#] {
        assert!(matches!(
            sim.post_from_child(frame, body),
            Err(RouteError::MalformedMessage { .. })
        ));
    }

    assert!(sim.reported_errors().is_empty());
    assert!(sim.hooks().calls().is_empty());
}
