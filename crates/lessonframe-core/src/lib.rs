//! Lesson embedding core.
//!
//! Action-based state machines that embed lessons served from another origin
//! into a host page. Nothing here touches a document, a clock or a socket:
//! components consume events and return actions, and a driver (the browser
//! binding, or the simulation harness) applies them.
//!
//! ## Architecture
//!
//! ```text
//! EmbedPage
//!   ├─ EmbedContext       (page origin, session secret, catalog)
//!   ├─ FrameController    (one per placeholder, lifecycle state machine)
//!   └─ MessageRouter      (source window + origin authentication)
//!
//! FrameAction::Hook ──► PostHooks (NoopHooks, AnalyticsHooks)
//! ```
//!
//! ## Invariants
//!
//! - The session secret is generated once per [`EmbedContext`] and only ever
//!   leaves it inside a frame location fragment.
//! - A message reaches a controller only if its source window is registered
//!   to that controller's frame and its origin equals the frame's source
//!   origin exactly.
//! - A controller in [`FrameState::Invalid`] produces no further actions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod controller;
pub mod env;
pub mod error;
pub mod hooks;
pub mod i18n;
pub mod page;
pub mod router;
pub mod secret;
pub mod session;
mod system_env;

pub use config::{Dimension, EmbedConfig, EmbedNode, NodeId, ResolvedDimension};
pub use context::{EmbedContext, LOAD_TIMEOUT};
pub use controller::{
    FrameAction, FrameController, FrameEvent, FrameId, FrameSpec, FrameTimer, HIDDEN_FRAME_STYLE,
};
pub use env::Environment;
pub use error::{CatalogError, ConfigError, EntropyError, RouteError};
pub use hooks::{AnalyticsHooks, HookCall, NoopHooks, PostHooks, ReportSink};
pub use i18n::Catalog;
pub use page::{EmbedPage, PageAction};
pub use router::{InboundEnvelope, MessageRouter, Routed, WindowId};
pub use secret::{SECRET_LENGTH, SecretGenerator, SessionSecret};
pub use session::{DisplayedRegion, FrameSession, FrameState};
pub use system_env::SystemEnv;
