//! End-to-end page scenarios.

use std::time::Duration;

use lessonframe_core::{
    AnalyticsHooks, EmbedContext, EmbedNode, FrameId, FrameState, HookCall, NodeId, ReportSink,
    config::attr,
};
use lessonframe_harness::{LoadingIndicator, SimEnv, SimPage};
use lessonframe_proto::{AnalyticsReport, Origin, ReportEndpoint};

const PAGE: &str = "https://host.example.org";

const LOADED_V3: &str = r#"{"title":"explorationLoaded","payload":{"explorationVersion":"3"}}"#;

#[derive(Debug, Default)]
struct Collected(Vec<(FrameId, AnalyticsReport)>);

impl ReportSink for Collected {
    fn submit(&mut self, frame: FrameId, report: AnalyticsReport) {
        self.0.push((frame, report));
    }
}

#[test]
fn demo_lesson_loads_and_reveals() {
    let mut sim = SimPage::new(2024, PAGE).expect("bootstrap");
    let frame = sim.discover([EmbedNode::new(NodeId(1)).attr(attr::LESSON_ID, "demo")])[0];

    // Frame created hidden at top:-9999px, with a loading indicator above it.
    let element = sim.document().frame(frame).cloned().expect("frame mounted");
    assert!(element.hidden);
    let expected = format!("{PAGE}/explore/demo?iframed=true&locale=en#version=0.0.1&secret=");
    assert!(element.src.starts_with(&expected));
    assert_eq!(element.title, "Open Classroom lesson");
    assert_eq!(element.height_attr, "700px");
    assert_eq!(element.width_attr, "98%");
    assert_eq!(
        sim.document().view(frame).and_then(|v| v.loading_indicator.clone()),
        Some(LoadingIndicator::Loading { message: "Loading...".to_string() })
    );

    // No src attribute: the lesson is served from the page origin.
    sim.post_from_child(frame, LOADED_V3).expect("authenticated");
    sim.settle();

    let view = sim.document().view(frame).cloned().expect("view");
    assert_eq!(view.loading_indicator, None);
    assert_eq!(view.frame.map(|f| f.hidden), Some(false));
    assert_eq!(sim.state(frame), Some(FrameState::Loaded));
    assert_eq!(
        sim.hooks().calls(),
        &[(frame, HookCall::ExplorationLoaded { exploration_version: "3".to_string() })]
    );
}

#[test]
fn missing_id_shows_warning_forever() {
    let mut sim = SimPage::new(1, PAGE).expect("bootstrap");
    let frame = sim.discover([EmbedNode::new(NodeId(1))])[0];

    let view = sim.document().view(frame).cloned().expect("view");
    let (heading, message) = view.warning.expect("warning shown");
    assert!(heading.contains("Warning:"));
    assert!(message.contains("openclassroom-id"));
    assert_eq!(sim.document().frame_count(), 0);

    // Nothing gets through: no window exists, timers never fire, clicks do
    // nothing.
    assert!(sim.post_from_child(frame, LOADED_V3).is_err());
    sim.activate(frame);
    sim.advance(Duration::from_secs(60));

    assert_eq!(sim.document().frame_count(), 0);
    assert_eq!(sim.state(frame), Some(FrameState::Invalid));
    assert!(sim.hooks().calls().is_empty());
}

#[test]
fn full_lesson_lifecycle() {
    let mut sim = SimPage::new(9, PAGE).expect("bootstrap");
    let frame = sim.discover([EmbedNode::new(NodeId(1))
        .attr(attr::LESSON_ID, "fractions")
        .attr(attr::SRC, "https://lessons.example.org")
        .attr(attr::LOCALE, "vi")
        .attr(attr::EXPLORATION_VERSION, "7")])[0];

    let src = sim.document().frame(frame).map(|f| f.src.clone()).expect("frame");
    assert!(src.starts_with(concat!(
        "https://lessons.example.org/explore/fractions?iframed=true&locale=vi&v=7",
        "#version=0.0.1&secret=",
    )));

    let messages = [
        r#"{"title":"explorationLoaded","payload":{"explorationVersion":7}}"#,
        r#"{"title":"heightChange","payload":{"height":640,"scroll":true}}"#,
        concat!(
            r#"{"title":"stateTransition","payload":{"oldStateName":"Intro","#,
            r#""jsonAnswer":"\"1/2\"","newStateName":"End","explorationVersion":"7"}}"#,
        ),
        r#"{"title":"explorationCompleted","payload":{"explorationVersion":"7"}}"#,
        r#"{"title":"explorationReset","payload":{"stateName":"End"}}"#,
        r#"{"title":"explorationCompleted","payload":{"explorationVersion":"7"}}"#,
    ];
    for message in messages {
        sim.post_from_child(frame, message).expect("authenticated");
        sim.settle();
    }

    let kinds: Vec<_> = sim
        .hooks()
        .calls()
        .iter()
        .map(|(_, call)| match call {
            HookCall::HeightChange { .. } => "height",
            HookCall::ExplorationLoaded { .. } => "loaded",
            HookCall::StateTransition(_) => "transition",
            HookCall::ExplorationReset { .. } => "reset",
            HookCall::ExplorationCompleted { .. } => "completed",
        })
        .collect();
    assert_eq!(kinds, ["loaded", "height", "transition", "completed", "reset", "completed"]);
    assert_eq!(sim.state(frame), Some(FrameState::Completed));

    let element = sim.document().frame(frame).cloned().expect("frame");
    assert_eq!(element.rendered_height(), Some(640));
    assert_eq!(element.scroll_count, 1);
}

#[test]
fn frames_fail_independently() {
    let mut sim = SimPage::new(3, PAGE).expect("bootstrap");
    let frames = sim.discover([
        EmbedNode::new(NodeId(1)).attr(attr::LESSON_ID, "a"),
        EmbedNode::new(NodeId(2)),
        EmbedNode::new(NodeId(3)).attr(attr::LESSON_ID, "b"),
    ]);

    let loaded = r#"{"title":"explorationLoaded","payload":{"explorationVersion":"1"}}"#;
    sim.post_from_child(frames[2], loaded).expect("authenticated");
    sim.advance(Duration::from_secs(10));

    let indicator = |sim: &SimPage, frame: FrameId| {
        sim.document().view(frame).and_then(|v| v.loading_indicator.clone())
    };
    assert!(matches!(indicator(&sim, frames[0]), Some(LoadingIndicator::Failed { .. })));
    assert_eq!(sim.state(frames[1]), Some(FrameState::Invalid));
    assert_eq!(indicator(&sim, frames[2]), None);
    assert_eq!(sim.state(frames[2]), Some(FrameState::Loaded));
}

#[test]
fn rediscovery_mounts_only_new_nodes() {
    let mut sim = SimPage::new(3, PAGE).expect("bootstrap");
    sim.discover([EmbedNode::new(NodeId(1)).attr(attr::LESSON_ID, "a")]);

    let frames = sim.discover([
        EmbedNode::new(NodeId(1)).attr(attr::LESSON_ID, "a"),
        EmbedNode::new(NodeId(2)).attr(attr::LESSON_ID, "b"),
    ]);

    assert_eq!(frames, vec![FrameId(0), FrameId(1)]);
    assert_eq!(sim.document().frame_count(), 2);
    assert_eq!(sim.page().router().len(), 2);
}

#[test]
fn analytics_hooks_report_lifecycle() {
    let env = SimEnv::with_seed(11);
    let context = EmbedContext::bootstrap(&env, Origin::new(PAGE)).expect("bootstrap");
    let hooks = AnalyticsHooks::new(Collected::default());
    let mut sim = SimPage::with_hooks(env, context, hooks);

    let frame = sim.discover([EmbedNode::new(NodeId(1)).attr(attr::LESSON_ID, "demo")])[0];
    for message in [
        r#"{"title":"explorationLoaded","payload":{"explorationVersion":"3"}}"#,
        r#"{"title":"heightChange","payload":{"height":300}}"#,
        r#"{"title":"explorationCompleted","payload":{"explorationVersion":"3"}}"#,
    ] {
        sim.post_from_child(frame, message).expect("authenticated");
    }

    let endpoints: Vec<_> =
        sim.hooks().sink().0.iter().map(|(_, report)| report.endpoint).collect();
    assert_eq!(
        endpoints,
        [ReportEndpoint::ExplorationLoaded, ReportEndpoint::ExplorationCompleted]
    );
}
