//! Simulation driver for an [`EmbedPage`].
//!
//! Plays the part of the browser binding: applies DOM actions to a
//! [`SimDocument`], gives each mounted frame a fresh window, keeps a timer
//! queue on the [`SimEnv`] virtual clock and dispatches hook calls.
//!
//! ```text
//!  post / activate / advance
//!            │
//!            ▼
//!        EmbedPage ──► Vec<PageAction> ──► SimDocument
//!                                     ├──► timer queue
//!                                     └──► PostHooks
//! ```
//!
//! Messages are processed in the order they are posted. Timers fire in
//! deadline order; timers with equal deadlines fire in scheduling order.

use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use lessonframe_core::{
    EmbedContext, EmbedNode, EmbedPage, EntropyError, Environment, FrameAction, FrameId, FrameState,
    FrameTimer, InboundEnvelope, PageAction, PostHooks, RouteError, WindowId,
};
use lessonframe_proto::Origin;

use crate::{
    document::SimDocument,
    recording::RecordingHooks,
    sim_env::{SimEnv, SimInstant},
};

type TimerKey = (SimInstant, u64);

/// A simulated host page.
#[derive(Debug)]
pub struct SimPage<H = RecordingHooks> {
    env: SimEnv,
    page: EmbedPage,
    document: SimDocument,
    hooks: H,
    timers: BTreeMap<TimerKey, (FrameId, FrameTimer)>,
    armed: HashMap<(FrameId, FrameTimer), TimerKey>,
    windows: BTreeMap<FrameId, WindowId>,
    next_window: u64,
    next_seq: u64,
    reported: Vec<RouteError>,
}

impl SimPage<RecordingHooks> {
    /// Page served from `page_origin`, bootstrapped with a seeded environment.
    pub fn new(seed: u64, page_origin: &str) -> Result<Self, EntropyError> {
        let env = SimEnv::with_seed(seed);
        let context = EmbedContext::bootstrap(&env, Origin::new(page_origin))?;
        Ok(Self::with_hooks(env, context, RecordingHooks::new()))
    }
}

impl<H: PostHooks> SimPage<H> {
    /// Page with an explicit context and hooks.
    pub fn with_hooks(env: SimEnv, context: EmbedContext, hooks: H) -> Self {
        Self {
            env,
            page: EmbedPage::new(context),
            document: SimDocument::new(),
            hooks,
            timers: BTreeMap::new(),
            armed: HashMap::new(),
            windows: BTreeMap::new(),
            next_window: 1,
            next_seq: 0,
            reported: Vec::new(),
        }
    }

    /// Discover `nodes` and return the frame of each, in order.
    pub fn discover(&mut self, nodes: impl IntoIterator<Item = EmbedNode>) -> Vec<FrameId> {
        let nodes: Vec<EmbedNode> = nodes.into_iter().collect();
        let ids: Vec<_> = nodes.iter().map(EmbedNode::id).collect();

        let actions = self.page.discover(nodes);
        self.apply(actions);

        ids.into_iter().filter_map(|node| self.page.frame_for_node(node)).collect()
    }

    /// Press `frame`'s load button.
    pub fn activate(&mut self, frame: FrameId) {
        let actions = self.page.activate(frame);
        self.apply(actions);
    }

    /// Deliver a message as the browser would.
    ///
    /// Non-silent routing failures are also kept for
    /// [`SimPage::reported_errors`].
    pub fn post(&mut self, envelope: &InboundEnvelope) -> Result<(), RouteError> {
        match self.page.receive(envelope) {
            Ok(actions) => {
                self.apply(actions);
                Ok(())
            },
            Err(err) => {
                if !err.is_silent() {
                    self.reported.push(err.clone());
                }
                Err(err)
            },
        }
    }

    /// Post `data` from `window` with the given origin.
    pub fn post_as(
        &mut self,
        window: Option<WindowId>,
        origin: &str,
        data: &str,
    ) -> Result<(), RouteError> {
        self.post(&InboundEnvelope {
            origin: origin.to_string(),
            source: window,
            data: data.to_string(),
        })
    }

    /// Post `data` from inside `frame`: its window, its source origin.
    pub fn post_from_child(&mut self, frame: FrameId, data: &str) -> Result<(), RouteError> {
        let origin = self
            .page
            .controller(frame)
            .and_then(|controller| controller.source_origin())
            .map(|origin| origin.as_str().to_string())
            .unwrap_or_default();
        let window = self.window_of(frame);

        self.post_as(window, &origin, data)
    }

    /// Advance the clock by `duration`, firing due timers in deadline order.
    pub fn advance(&mut self, duration: Duration) {
        let target = self.env.advance(self.env.now(), duration);

        while let Some((&key, &(frame, timer))) = self.timers.first_key_value() {
            if key.0 > target {
                break;
            }
            self.timers.remove(&key);
            self.armed.remove(&(frame, timer));
            self.env.advance_to(key.0);

            tracing::trace!(%frame, ?timer, at = ?key.0, "timer fired");
            let actions = self.page.fire_timer(frame, timer);
            self.apply(actions);
        }

        self.env.advance_to(target);
    }

    /// Fire timers that are already due, such as zero-delay reveals.
    pub fn settle(&mut self) {
        self.advance(Duration::ZERO);
    }

    fn apply(&mut self, actions: Vec<PageAction>) {
        for PageAction { frame, action } in actions {
            match &action {
                FrameAction::MountFrame(spec) => {
                    let window = WindowId(self.next_window);
                    self.next_window += 1;

                    self.document.mount_frame(frame, spec, window);
                    self.windows.insert(frame, window);
                    self.page.attach_window(frame, window);
                },
                FrameAction::ScheduleTimer { timer, after } => self.schedule(frame, *timer, *after),
                FrameAction::CancelTimer { timer } => self.cancel(frame, *timer),
                FrameAction::Hook(call) => call.dispatch(frame, &mut self.hooks),
                other => self.document.apply(frame, other),
            }
        }
    }

    fn schedule(&mut self, frame: FrameId, timer: FrameTimer, after: Duration) {
        self.cancel(frame, timer);

        let key = (self.env.advance(self.env.now(), after), self.next_seq);
        self.next_seq += 1;

        self.timers.insert(key, (frame, timer));
        self.armed.insert((frame, timer), key);
    }

    fn cancel(&mut self, frame: FrameId, timer: FrameTimer) {
        if let Some(key) = self.armed.remove(&(frame, timer)) {
            self.timers.remove(&key);
        }
    }

    /// Window given to `frame`'s frame element.
    pub fn window_of(&self, frame: FrameId) -> Option<WindowId> {
        self.windows.get(&frame).copied()
    }

    /// Lifecycle state of `frame`.
    pub fn state(&self, frame: FrameId) -> Option<FrameState> {
        self.page.controller(frame).map(|controller| controller.state())
    }

    /// True if `timer` is armed for `frame`.
    pub fn is_armed(&self, frame: FrameId, timer: FrameTimer) -> bool {
        self.armed.contains_key(&(frame, timer))
    }

    /// Routing failures that must be reported.
    pub fn reported_errors(&self) -> &[RouteError] {
        &self.reported
    }

    /// The simulated document.
    pub fn document(&self) -> &SimDocument {
        &self.document
    }

    /// Mutable access to the document, for host-side DOM changes.
    pub fn document_mut(&mut self) -> &mut SimDocument {
        &mut self.document
    }

    /// Installed hooks.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// The driven page.
    pub fn page(&self) -> &EmbedPage {
        &self.page
    }

    /// The environment.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }
}
