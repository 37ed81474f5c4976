//! Page-level wiring: discovery, window registration and dispatch.
//!
//! An [`EmbedPage`] owns every [`FrameController`] created during one page
//! load, plus the single [`MessageRouter`] shared by them. Drivers talk to
//! the page, never to controllers directly.

use std::collections::{BTreeMap, HashMap};

use crate::{
    config::{EmbedNode, NodeId},
    context::EmbedContext,
    controller::{FrameAction, FrameController, FrameEvent, FrameId, FrameTimer},
    error::RouteError,
    router::{InboundEnvelope, MessageRouter, WindowId},
};

/// An action addressed to the frame that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAction {
    /// Producing frame.
    pub frame: FrameId,
    /// The action.
    pub action: FrameAction,
}

/// All embedded frames of one page load.
#[derive(Debug)]
pub struct EmbedPage {
    context: EmbedContext,
    router: MessageRouter,
    frames: BTreeMap<FrameId, FrameController>,
    nodes: HashMap<NodeId, FrameId>,
    next_frame: u32,
}

impl EmbedPage {
    /// Page without frames.
    pub fn new(context: EmbedContext) -> Self {
        Self {
            context,
            router: MessageRouter::new(),
            frames: BTreeMap::new(),
            nodes: HashMap::new(),
            next_frame: 0,
        }
    }

    /// Wrap and mount every node not seen before.
    ///
    /// Discovering the same node twice is a no-op, so a page that runs
    /// discovery again after inserting more placeholders only mounts the new
    /// ones.
    pub fn discover(&mut self, nodes: impl IntoIterator<Item = EmbedNode>) -> Vec<PageAction> {
        let mut actions = Vec::new();

        for node in nodes {
            if self.nodes.contains_key(&node.id()) {
                continue;
            }

            let id = FrameId(self.next_frame);
            self.next_frame += 1;
            self.nodes.insert(node.id(), id);

            let mut controller = FrameController::new(id, node);
            let produced = controller.handle(FrameEvent::Mount, &self.context);
            self.frames.insert(id, controller);

            actions.extend(produced.into_iter().map(|action| PageAction { frame: id, action }));
        }

        tracing::debug!(frames = self.frames.len(), "discovery finished");
        actions
    }

    /// The learner pressed `frame`'s load button.
    pub fn activate(&mut self, frame: FrameId) -> Vec<PageAction> {
        self.dispatch(frame, FrameEvent::ManualLoad)
    }

    /// Register the window of `frame`'s freshly created frame element.
    ///
    /// Returns false if the frame does not exist or has no frame element,
    /// in which case nothing is registered.
    pub fn attach_window(&mut self, frame: FrameId, window: WindowId) -> bool {
        let Some(origin) = self.frames.get(&frame).and_then(FrameController::source_origin) else {
            return false;
        };

        self.router.register(window, frame, origin.clone());
        true
    }

    /// The frame element of `frame` left the document.
    pub fn detach(&mut self, frame: FrameId) {
        self.router.unregister(frame);
    }

    /// Authenticate an inbound message and dispatch it to its frame.
    ///
    /// # Errors
    ///
    /// Any [`RouteError`] from [`MessageRouter::authenticate`]. Check
    /// [`RouteError::is_silent`] before reporting it anywhere.
    pub fn receive(&mut self, envelope: &InboundEnvelope) -> Result<Vec<PageAction>, RouteError> {
        let routed = self.router.authenticate(envelope)?;
        Ok(self.dispatch(routed.frame, FrameEvent::Message(routed.message)))
    }

    /// A timer requested by `frame` fired.
    pub fn fire_timer(&mut self, frame: FrameId, timer: FrameTimer) -> Vec<PageAction> {
        self.dispatch(frame, FrameEvent::TimerFired(timer))
    }

    fn dispatch(&mut self, frame: FrameId, event: FrameEvent) -> Vec<PageAction> {
        let Some(controller) = self.frames.get_mut(&frame) else {
            tracing::debug!(%frame, "event for unknown frame");
            return Vec::new();
        };

        controller
            .handle(event, &self.context)
            .into_iter()
            .map(|action| PageAction { frame, action })
            .collect()
    }

    /// Controller of `frame`.
    pub fn controller(&self, frame: FrameId) -> Option<&FrameController> {
        self.frames.get(&frame)
    }

    /// Frame created for `node`, if discovered.
    pub fn frame_for_node(&self, node: NodeId) -> Option<FrameId> {
        self.nodes.get(&node).copied()
    }

    /// All controllers in creation order.
    pub fn controllers(&self) -> impl Iterator<Item = &FrameController> {
        self.frames.values()
    }

    /// The page's embedding context.
    pub fn context(&self) -> &EmbedContext {
        &self.context
    }

    /// The page's router.
    pub fn router(&self) -> &MessageRouter {
        &self.router
    }
}
