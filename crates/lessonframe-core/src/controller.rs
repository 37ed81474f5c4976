//! Frame controller state machine.
//!
//! One `FrameController` owns one placeholder node and the frame that
//! replaces it. It is a pure state machine: events go in, [`FrameAction`]s
//! come out, and the driver applies them to the document, its timers and the
//! installed [`PostHooks`](crate::PostHooks).
//!
//! ```text
//!            Mount                 ManualLoad
//! Unloaded ───────► AwaitingManualLoad ───────┐
//!    │  │                                     ▼
//!    │  └──────────────────────────────────► Loading ──explorationLoaded──► Loaded
//!    │ (missing id)                                                        │   ▲
//!    ▼                                                   explorationCompleted  │ explorationReset
//! Invalid                                                                  ▼   │
//!                                                                         Completed
//! ```
//!
//! `heightChange`, `stateTransition` and `explorationReset` never move the
//! machine between `Loading` and `Loaded`; they only produce side effects.

use std::{fmt, time::Duration};

use lessonframe_proto::{
    ExplorationCompleted, ExplorationLoaded, ExplorationReset, FrameUrl, HeightChange,
    InboundMessage, Origin,
};

use crate::{
    config::{DEFAULT_HEIGHT, DEFAULT_WIDTH, EmbedConfig, EmbedNode, ResolvedDimension, attr},
    context::EmbedContext,
    error::ConfigError,
    hooks::HookCall,
    i18n::msg,
    session::{DisplayedRegion, FrameSession, FrameState},
};

/// Style of a freshly mounted frame: off-screen and hidden, so autofocus
/// inside the lesson cannot scroll the host page.
pub const HIDDEN_FRAME_STYLE: &str =
    "margin: 10px; position: fixed; top: -9999px; visibility: hidden;";

/// Page-assigned identity of a frame controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u32);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame-{}", self.0)
    }
}

/// One-shot timers a controller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTimer {
    /// Fires [`LOAD_TIMEOUT`](crate::LOAD_TIMEOUT) after mounting.
    LoadTimeout,
    /// Fires on the next scheduling turn after load, once layout settled.
    Reveal,
}

/// Events fed into a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// The page discovered the placeholder.
    Mount,
    /// The learner pressed the load button.
    ManualLoad,
    /// An authenticated message from this controller's frame.
    Message(InboundMessage),
    /// A timer requested by this controller fired.
    TimerFired(FrameTimer),
}

/// Everything the driver needs to create the frame element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    /// Frame location (redacted in `Debug`).
    pub url: FrameUrl,
    /// `height` attribute and whether it is fixed.
    pub height: ResolvedDimension,
    /// `width` attribute and whether it is fixed.
    pub width: ResolvedDimension,
    /// Accessible title.
    pub title: String,
    /// Initial inline style.
    pub style: String,
}

/// Side effects requested by a controller, applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameAction {
    /// Replace the placeholder with a warning box.
    ShowWarning {
        /// Bold lead-in, `"Warning: "` looked up in the context's catalog.
        heading: String,
        /// Explanation.
        message: String,
    },

    /// Put a load button inside the placeholder.
    ShowLoadButton {
        /// Button label.
        label: String,
    },

    /// Set the placeholder's `autoload` attribute to `"true"`.
    SetAutoload,

    /// Replace the placeholder (and any load button) with the frame.
    MountFrame(FrameSpec),

    /// Insert a loading indicator directly above the frame.
    InsertLoadingIndicator {
        /// Indicator text.
        message: String,
    },

    /// Turn the loading indicator into a failure message, in place.
    ShowLoadFailure {
        /// Replacement indicator text.
        message: String,
        /// Line shown under it.
        subtitle: String,
    },

    /// Remove the loading indicator.
    RemoveLoadingIndicator,

    /// Restore the frame's position, visibility and offset to `inherit`.
    RevealFrame,

    /// Set the frame's inline height to `auto`, dropping any pixel override
    /// so the lesson can measure its natural height.
    ResetInlineHeight,

    /// Remove the frame's inline height so the `height` attribute applies.
    ClearInlineHeight,

    /// Set the frame's `height` attribute.
    SetFrameHeight {
        /// Height in pixels.
        height: u32,
    },

    /// Scroll so the bottom of the frame is visible.
    ScrollIntoView,

    /// Arm a one-shot timer, replacing any armed timer of the same kind.
    ScheduleTimer {
        /// Timer kind.
        timer: FrameTimer,
        /// Delay from now.
        after: Duration,
    },

    /// Disarm a timer if it is still pending.
    CancelTimer {
        /// Timer kind.
        timer: FrameTimer,
    },

    /// Invoke a post-hook.
    Hook(HookCall),
}

/// State machine for one embedded frame.
#[derive(Debug, Clone)]
pub struct FrameController {
    id: FrameId,
    node: EmbedNode,
    session: FrameSession,
}

impl FrameController {
    /// Controller for `node`, in [`FrameState::Unloaded`].
    pub fn new(id: FrameId, node: EmbedNode) -> Self {
        Self { id, node, session: FrameSession::new() }
    }

    /// Controller identity.
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// The placeholder node, including attribute changes made so far.
    pub fn node(&self) -> &EmbedNode {
        &self.node
    }

    /// Session state.
    pub fn session(&self) -> &FrameSession {
        &self.session
    }

    /// Lifecycle state.
    pub fn state(&self) -> FrameState {
        self.session.state
    }

    /// Origin the frame was loaded from, once it exists.
    pub fn source_origin(&self) -> Option<&Origin> {
        self.session.config.as_ref().map(|config| &config.source_origin)
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: FrameEvent, ctx: &EmbedContext) -> Vec<FrameAction> {
        let before = self.session.state;

        let actions = match event {
            FrameEvent::Mount => self.handle_mount(ctx),
            FrameEvent::ManualLoad => self.handle_manual_load(ctx),
            FrameEvent::Message(message) => self.handle_message(message),
            FrameEvent::TimerFired(timer) => self.handle_timer(timer, ctx),
        };

        if before != self.session.state {
            tracing::debug!(
                frame = %self.id,
                from = %before,
                to = %self.session.state,
                "frame transition"
            );
        }

        actions
    }

    fn handle_mount(&mut self, ctx: &EmbedContext) -> Vec<FrameAction> {
        if self.session.state != FrameState::Unloaded {
            tracing::debug!(
                frame = %self.id,
                state = %self.session.state,
                "ignoring repeated mount"
            );
            return Vec::new();
        }
        self.enter(ctx)
    }

    fn handle_manual_load(&mut self, ctx: &EmbedContext) -> Vec<FrameAction> {
        if self.session.state != FrameState::AwaitingManualLoad {
            tracing::debug!(frame = %self.id, state = %self.session.state, "ignoring load request");
            return Vec::new();
        }
        self.enter(ctx)
    }

    /// Entry action shared by mount and manual load.
    fn enter(&mut self, ctx: &EmbedContext) -> Vec<FrameAction> {
        let config = match EmbedConfig::from_node(&self.node, ctx.page_origin()) {
            Ok(config) => config,
            Err(err) => return self.halt(&err, ctx),
        };

        if !config.autoload {
            self.node.set_attr(attr::AUTOLOAD, "true");
            self.session.state = FrameState::AwaitingManualLoad;
            self.session.displayed = DisplayedRegion::LoadButton;

            return vec![
                FrameAction::ShowLoadButton { label: ctx.gettext(msg::LOAD_LESSON).to_string() },
                FrameAction::SetAutoload,
            ];
        }

        self.load(config, ctx)
    }

    fn halt(&mut self, err: &ConfigError, ctx: &EmbedContext) -> Vec<FrameAction> {
        self.session.state = FrameState::Invalid;

        match err {
            ConfigError::MissingLessonId => {
                self.session.displayed = DisplayedRegion::Warning;
                vec![FrameAction::ShowWarning {
                    heading: ctx.gettext(msg::WARNING_HEADING).to_string(),
                    message: ctx.gettext(msg::MISSING_LESSON_ID).to_string(),
                }]
            },
            ConfigError::UnexpectedTag { .. } => {
                tracing::warn!(frame = %self.id, "{err}");
                Vec::new()
            },
        }
    }

    fn load(&mut self, config: EmbedConfig, ctx: &EmbedContext) -> Vec<FrameAction> {
        let height = config.height.resolve(DEFAULT_HEIGHT);
        let width = config.width.resolve(DEFAULT_WIDTH);

        let url = FrameUrl {
            origin: config.source_origin.clone(),
            lesson_id: config.lesson_id.clone(),
            locale: config.locale.clone(),
            exploration_version: config.exploration_version.clone(),
            protocol_version: ctx.protocol_version().to_string(),
            secret: ctx.secret().expose().to_string(),
        };

        let spec = FrameSpec {
            url,
            height: height.clone(),
            width: width.clone(),
            title: ctx.gettext(msg::FRAME_TITLE).to_string(),
            style: HIDDEN_FRAME_STYLE.to_string(),
        };

        tracing::debug!(
            frame = %self.id,
            lesson = %config.lesson_id,
            origin = %config.source_origin,
            "mounting lesson frame"
        );

        self.session.config = Some(config);
        self.session.height = Some(height);
        self.session.width = Some(width);
        self.session.state = FrameState::Loading;
        self.session.displayed = DisplayedRegion::Frame;
        self.session.loading_indicator_visible = true;

        vec![
            FrameAction::MountFrame(spec),
            FrameAction::InsertLoadingIndicator { message: ctx.gettext(msg::LOADING).to_string() },
            FrameAction::ScheduleTimer {
                timer: FrameTimer::LoadTimeout,
                after: ctx.load_timeout(),
            },
        ]
    }

    fn handle_timer(&mut self, timer: FrameTimer, ctx: &EmbedContext) -> Vec<FrameAction> {
        match timer {
            FrameTimer::LoadTimeout => {
                if self.session.has_loaded || !self.session.loading_indicator_visible {
                    return Vec::new();
                }
                tracing::debug!(frame = %self.id, "lesson did not load in time");
                vec![FrameAction::ShowLoadFailure {
                    message: ctx.gettext(msg::LOAD_FAILED).to_string(),
                    subtitle: ctx.gettext(msg::LOAD_FAILED_SUBTITLE).to_string(),
                }]
            },
            FrameTimer::Reveal => {
                if self.session.has_loaded {
                    vec![FrameAction::RevealFrame]
                } else {
                    Vec::new()
                }
            },
        }
    }

    fn handle_message(&mut self, message: InboundMessage) -> Vec<FrameAction> {
        if !self.session.state.has_frame() {
            tracing::debug!(frame = %self.id, kind = %message.kind(), "no frame mounted");
            return Vec::new();
        }

        match message {
            InboundMessage::ExplorationLoaded(loaded) => self.on_loaded(loaded),
            InboundMessage::HeightChange(change) => self.on_height_change(change),
            InboundMessage::StateTransition(transition) => {
                vec![FrameAction::Hook(HookCall::StateTransition(transition))]
            },
            InboundMessage::ExplorationReset(reset) => self.on_reset(reset),
            InboundMessage::ExplorationCompleted(completed) => self.on_completed(completed),
        }
    }

    fn on_loaded(&mut self, loaded: ExplorationLoaded) -> Vec<FrameAction> {
        if self.session.state != FrameState::Loading {
            tracing::debug!(
                frame = %self.id,
                state = %self.session.state,
                "duplicate load ignored"
            );
            return Vec::new();
        }

        self.session.state = FrameState::Loaded;
        self.session.has_loaded = true;

        let mut actions = Vec::with_capacity(4);
        if self.session.loading_indicator_visible {
            self.session.loading_indicator_visible = false;
            actions.push(FrameAction::RemoveLoadingIndicator);
        }
        actions.push(FrameAction::CancelTimer { timer: FrameTimer::LoadTimeout });
        actions.push(FrameAction::ScheduleTimer {
            timer: FrameTimer::Reveal,
            after: Duration::ZERO,
        });
        actions.push(FrameAction::Hook(HookCall::ExplorationLoaded {
            exploration_version: loaded.exploration_version,
        }));
        actions
    }

    fn on_height_change(&self, change: HeightChange) -> Vec<FrameAction> {
        let height = change.height.get();

        let mut actions = vec![FrameAction::ClearInlineHeight];
        if !self.session.height_fixed() {
            actions.push(FrameAction::SetFrameHeight { height });
        }
        if change.scroll {
            actions.push(FrameAction::ScrollIntoView);
        }
        actions.push(FrameAction::Hook(HookCall::HeightChange { height }));
        actions
    }

    fn on_reset(&mut self, reset: ExplorationReset) -> Vec<FrameAction> {
        if self.session.state == FrameState::Completed {
            self.session.state = FrameState::Loaded;
        }

        vec![
            FrameAction::ResetInlineHeight,
            FrameAction::Hook(HookCall::ExplorationReset { state_name: reset.state_name }),
        ]
    }

    fn on_completed(&mut self, completed: ExplorationCompleted) -> Vec<FrameAction> {
        if self.session.state != FrameState::Loaded {
            tracing::debug!(frame = %self.id, state = %self.session.state, "completion ignored");
            return Vec::new();
        }

        self.session.state = FrameState::Completed;
        vec![FrameAction::Hook(HookCall::ExplorationCompleted {
            exploration_version: completed.exploration_version,
        })]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::{
        num::NonZeroU32,
        time::{Duration, Instant},
    };

    use lessonframe_proto::{FragmentParams, StateTransition};

    use super::*;
    use crate::{Environment, config::NodeId};

    #[derive(Clone)]
    struct TestEnv;

    impl Environment for TestEnv {
        type Instant = Instant;

        fn now(&self) -> Instant {
            Instant::now()
        }

        fn advance(&self, instant: Instant, duration: Duration) -> Instant {
            instant + duration
        }

        fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
            std::future::ready(())
        }

        fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), crate::EntropyError> {
            // Deterministic for tests
            for (i, byte) in buffer.iter_mut().enumerate() {
                *byte = i as u8;
            }
            Ok(())
        }
    }

    fn ctx() -> EmbedContext {
        EmbedContext::bootstrap(&TestEnv, Origin::new("https://host.example.org")).unwrap()
    }

    fn demo_node() -> EmbedNode {
        EmbedNode::new(NodeId(1)).attr(attr::LESSON_ID, "demo")
    }

    fn loaded(version: &str) -> FrameEvent {
        FrameEvent::Message(InboundMessage::ExplorationLoaded(ExplorationLoaded {
            exploration_version: version.to_string(),
        }))
    }

    fn height(px: u32, scroll: bool) -> FrameEvent {
        FrameEvent::Message(InboundMessage::HeightChange(HeightChange {
            height: NonZeroU32::new(px).unwrap(),
            scroll,
        }))
    }

    fn reset(state: &str) -> FrameEvent {
        FrameEvent::Message(InboundMessage::ExplorationReset(ExplorationReset {
            state_name: state.to_string(),
        }))
    }

    fn completed(version: &str) -> FrameEvent {
        FrameEvent::Message(InboundMessage::ExplorationCompleted(ExplorationCompleted {
            exploration_version: version.to_string(),
        }))
    }

    fn mounted(node: EmbedNode, ctx: &EmbedContext) -> FrameController {
        let mut controller = FrameController::new(FrameId(0), node);
        controller.handle(FrameEvent::Mount, ctx);
        controller
    }

    fn hooks(actions: &[FrameAction]) -> Vec<&HookCall> {
        actions
            .iter()
            .filter_map(|a| match a {
                FrameAction::Hook(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn mount_creates_hidden_frame_and_loading_indicator() {
        let ctx = ctx();
        let mut controller = FrameController::new(FrameId(0), demo_node());

        let actions = controller.handle(FrameEvent::Mount, &ctx);

        assert_eq!(controller.state(), FrameState::Loading);
        assert_eq!(actions.len(), 3);
        match &actions[0] {
            FrameAction::MountFrame(spec) => {
                assert_eq!(spec.style, HIDDEN_FRAME_STYLE);
                assert_eq!(spec.height, ResolvedDimension { value: "700px".into(), fixed: false });
                assert_eq!(spec.width, ResolvedDimension { value: "98%".into(), fixed: false });
                assert_eq!(spec.title, "Open Classroom lesson");
                assert!(spec.url.to_uri().starts_with(concat!(
                    "https://host.example.org/explore/demo?iframed=true&locale=en",
                    "#version=0.0.1&secret=",
                )));
            },
            other => panic!("expected MountFrame, got {other:?}"),
        }
        assert_eq!(
            actions[1],
            FrameAction::InsertLoadingIndicator { message: "Loading...".into() }
        );
        assert_eq!(
            actions[2],
            FrameAction::ScheduleTimer {
                timer: FrameTimer::LoadTimeout,
                after: Duration::from_millis(10_000)
            }
        );
    }

    #[test]
    fn frame_url_carries_context_secret() {
        let ctx = ctx();
        let mut controller = FrameController::new(FrameId(0), demo_node());

        let actions = controller.handle(FrameEvent::Mount, &ctx);
        let FrameAction::MountFrame(spec) = &actions[0] else {
            panic!("expected MountFrame");
        };

        let params = FragmentParams::from_uri(&spec.url.to_uri());
        assert_eq!(params.secret.as_deref(), Some(ctx.secret().expose()));
        assert_eq!(params.version.as_deref(), Some("0.0.1"));
    }

    #[test]
    fn missing_id_halts_with_warning() {
        let ctx = ctx();
        let mut controller = FrameController::new(FrameId(0), EmbedNode::new(NodeId(1)));

        let actions = controller.handle(FrameEvent::Mount, &ctx);

        assert_eq!(controller.state(), FrameState::Invalid);
        assert_eq!(controller.session().displayed(), DisplayedRegion::Warning);
        match &actions[..] {
            [FrameAction::ShowWarning { heading, message }] => {
                assert!(heading.contains("Warning:"));
                assert!(message.contains("openclassroom-id"));
            },
            other => panic!("unexpected actions {other:?}"),
        }

        // Halted: nothing reaches the session any more.
        assert!(controller.handle(loaded("1"), &ctx).is_empty());
        assert!(controller.handle(FrameEvent::ManualLoad, &ctx).is_empty());
        assert!(controller.handle(FrameEvent::Mount, &ctx).is_empty());
        assert!(
            controller.handle(FrameEvent::TimerFired(FrameTimer::LoadTimeout), &ctx).is_empty()
        );
    }

    #[test]
    fn missing_id_wins_over_autoload_false() {
        let ctx = ctx();
        let node = EmbedNode::new(NodeId(1)).attr(attr::AUTOLOAD, "false");
        let controller = mounted(node, &ctx);

        assert_eq!(controller.state(), FrameState::Invalid);
    }

    #[test]
    fn wrong_tag_halts_without_dom_changes() {
        let ctx = ctx();
        let node = EmbedNode::with_tag(NodeId(1), "div").attr(attr::LESSON_ID, "demo");
        let mut controller = FrameController::new(FrameId(0), node);

        assert!(controller.handle(FrameEvent::Mount, &ctx).is_empty());
        assert_eq!(controller.state(), FrameState::Invalid);
    }

    #[test]
    fn autoload_false_waits_for_manual_load() {
        let ctx = ctx();
        let node = demo_node().attr(attr::AUTOLOAD, "false");
        let mut controller = FrameController::new(FrameId(0), node);

        let actions = controller.handle(FrameEvent::Mount, &ctx);
        assert_eq!(
            actions,
            vec![
                FrameAction::ShowLoadButton { label: "Load Lesson".into() },
                FrameAction::SetAutoload
            ]
        );
        assert_eq!(controller.state(), FrameState::AwaitingManualLoad);
        assert_eq!(controller.node().get_attr(attr::AUTOLOAD), Some("true"));

        let actions = controller.handle(FrameEvent::ManualLoad, &ctx);
        assert!(matches!(actions[0], FrameAction::MountFrame(_)));
        assert_eq!(controller.state(), FrameState::Loading);

        // A second activation never creates a second frame.
        assert!(controller.handle(FrameEvent::ManualLoad, &ctx).is_empty());
    }

    #[test]
    fn manual_load_without_button_is_ignored() {
        let ctx = ctx();
        let mut controller = FrameController::new(FrameId(0), demo_node());

        assert!(controller.handle(FrameEvent::ManualLoad, &ctx).is_empty());
        assert_eq!(controller.state(), FrameState::Unloaded);
    }

    #[test]
    fn loaded_removes_indicator_and_schedules_reveal() {
        let ctx = ctx();
        let mut controller = mounted(demo_node(), &ctx);

        let actions = controller.handle(loaded("3"), &ctx);

        assert_eq!(
            actions,
            vec![
                FrameAction::RemoveLoadingIndicator,
                FrameAction::CancelTimer { timer: FrameTimer::LoadTimeout },
                FrameAction::ScheduleTimer { timer: FrameTimer::Reveal, after: Duration::ZERO },
                FrameAction::Hook(HookCall::ExplorationLoaded { exploration_version: "3".into() }),
            ]
        );
        assert_eq!(controller.state(), FrameState::Loaded);
        assert!(controller.session().has_loaded());
        assert!(!controller.session().loading_indicator_visible());

        let actions = controller.handle(FrameEvent::TimerFired(FrameTimer::Reveal), &ctx);
        assert_eq!(actions, vec![FrameAction::RevealFrame]);
    }

    #[test]
    fn duplicate_loaded_is_ignored() {
        let ctx = ctx();
        let mut controller = mounted(demo_node(), &ctx);
        controller.handle(loaded("3"), &ctx);

        assert!(controller.handle(loaded("3"), &ctx).is_empty());
    }

    #[test]
    fn timeout_before_load_shows_failure_but_load_still_recovers() {
        let ctx = ctx();
        let mut controller = mounted(demo_node(), &ctx);

        let actions = controller.handle(FrameEvent::TimerFired(FrameTimer::LoadTimeout), &ctx);
        assert_eq!(
            actions,
            vec![FrameAction::ShowLoadFailure {
                message: "This lesson could not be loaded.".into(),
                subtitle: "Sorry about that.".into(),
            }]
        );
        assert_eq!(controller.state(), FrameState::Loading);

        let actions = controller.handle(loaded("5"), &ctx);
        assert_eq!(actions[0], FrameAction::RemoveLoadingIndicator);
        assert_eq!(controller.state(), FrameState::Loaded);
    }

    #[test]
    fn late_timeout_is_noop() {
        let ctx = ctx();
        let mut controller = mounted(demo_node(), &ctx);
        controller.handle(loaded("3"), &ctx);

        assert!(
            controller.handle(FrameEvent::TimerFired(FrameTimer::LoadTimeout), &ctx).is_empty()
        );
    }

    #[test]
    fn auto_height_follows_content() {
        let ctx = ctx();
        let mut controller = mounted(demo_node(), &ctx);

        let actions = controller.handle(height(450, false), &ctx);
        assert_eq!(
            actions,
            vec![
                FrameAction::ClearInlineHeight,
                FrameAction::SetFrameHeight { height: 450 },
                FrameAction::Hook(HookCall::HeightChange { height: 450 }),
            ]
        );
    }

    #[test]
    fn fixed_height_is_never_changed() {
        let ctx = ctx();
        let mut controller = mounted(demo_node().attr(attr::HEIGHT, "500px"), &ctx);

        let actions = controller.handle(height(450, true), &ctx);
        assert!(!actions.iter().any(|a| matches!(a, FrameAction::SetFrameHeight { .. })));
        assert!(actions.contains(&FrameAction::ScrollIntoView));
    }

    #[test]
    fn reset_releases_inline_height() {
        let ctx = ctx();
        let mut controller = mounted(demo_node(), &ctx);
        controller.handle(loaded("3"), &ctx);

        let actions = controller.handle(reset("Question 2"), &ctx);
        assert_eq!(
            actions,
            vec![
                FrameAction::ResetInlineHeight,
                FrameAction::Hook(HookCall::ExplorationReset { state_name: "Question 2".into() }),
            ]
        );
        assert_eq!(controller.state(), FrameState::Loaded);
    }

    #[test]
    fn completion_and_restart() {
        let ctx = ctx();
        let mut controller = mounted(demo_node(), &ctx);

        // Not loaded yet: completion is ignored.
        assert!(controller.handle(completed("3"), &ctx).is_empty());

        controller.handle(loaded("3"), &ctx);
        let actions = controller.handle(completed("3"), &ctx);
        assert_eq!(
            hooks(&actions),
            vec![&HookCall::ExplorationCompleted { exploration_version: "3".into() }]
        );
        assert_eq!(controller.state(), FrameState::Completed);

        controller.handle(reset("End"), &ctx);
        assert_eq!(controller.state(), FrameState::Loaded);
    }

    #[test]
    fn state_transition_only_forwards() {
        let ctx = ctx();
        let mut controller = mounted(demo_node(), &ctx);
        controller.handle(loaded("3"), &ctx);

        let transition = StateTransition {
            old_state_name: "Intro".into(),
            json_answer: "\"yes\"".into(),
            new_state_name: "Next".into(),
            exploration_version: "3".into(),
        };
        let actions = controller
            .handle(FrameEvent::Message(InboundMessage::StateTransition(transition.clone())), &ctx);

        assert_eq!(actions, vec![FrameAction::Hook(HookCall::StateTransition(transition))]);
        assert_eq!(controller.state(), FrameState::Loaded);
    }

    #[test]
    fn messages_before_mount_are_ignored() {
        let ctx = ctx();
        let mut controller = FrameController::new(FrameId(0), demo_node());

        assert!(controller.handle(loaded("1"), &ctx).is_empty());
        assert!(controller.handle(height(100, false), &ctx).is_empty());
        assert_eq!(controller.state(), FrameState::Unloaded);
    }

    #[test]
    fn translated_ui_strings() {
        let mut catalog = crate::Catalog::new();
        catalog.insert(msg::LOADING, "Đang tải...");
        let ctx = ctx().with_catalog(catalog);
        let mut controller = FrameController::new(FrameId(0), demo_node());

        let actions = controller.handle(FrameEvent::Mount, &ctx);
        assert_eq!(
            actions[1],
            FrameAction::InsertLoadingIndicator { message: "Đang tải...".into() }
        );
    }

    #[test]
    fn warning_heading_is_translated() {
        let mut catalog = crate::Catalog::new();
        catalog.insert(msg::WARNING_HEADING, "Cảnh báo: ");
        let ctx = ctx().with_catalog(catalog);
        let mut controller = FrameController::new(FrameId(0), EmbedNode::new(NodeId(1)));

        let actions = controller.handle(FrameEvent::Mount, &ctx);

        match &actions[..] {
            [FrameAction::ShowWarning { heading, .. }] => assert_eq!(heading, "Cảnh báo: "),
            other => panic!("unexpected actions {other:?}"),
        }
    }
}
