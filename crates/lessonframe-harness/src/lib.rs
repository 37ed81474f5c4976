//! Deterministic simulation harness for lesson frame embedding.
//!
//! Drives an [`EmbedPage`](lessonframe_core::EmbedPage) without a browser:
//!
//! - [`SimEnv`]: virtual clock and seeded RNG, so a run with the same seed
//!   produces the same secret and the same timer schedule
//! - [`SimDocument`]: the DOM state the embedding script touches
//! - [`SimPage`]: the driver that applies actions, owns windows and timers
//! - [`RecordingHooks`]: post-hooks that remember every call
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and a [`SimPage`], and
//! their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod document;
pub mod model;
pub mod recording;
pub mod sim_env;
pub mod sim_page;

pub use document::{FrameElement, InlineHeight, LoadingIndicator, PlaceholderView, SimDocument};
pub use model::{ModelMessage, ModelWorld, ObservableState, Operation, OriginChoice};
pub use recording::RecordingHooks;
pub use sim_env::{SimEnv, SimInstant};
pub use sim_page::SimPage;
