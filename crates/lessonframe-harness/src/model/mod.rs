//! Reference model for model-based testing.
//!
//! The model is a simplified implementation that captures the embedding
//! lifecycle without actions, routing tables or a document. It serves as the
//! oracle against which [`SimPage`](crate::SimPage) is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Observable behaviour only: states, visible DOM and hook calls
//! - Deterministic: Same inputs produce same outputs

mod frame;
pub mod operation;
mod world;

pub use frame::{IndicatorState, ModelFrame, ModelLifecycle};
pub use operation::{FrameIndex, ModelMessage, Operation, OriginChoice};
pub use world::{
    FOREIGN_ORIGIN, FrameObservation, LESSON_ORIGIN, ModelWorld, OTHER_LESSON_ORIGIN,
    ObservableState, PAGE_ORIGIN, STANDARD_FRAMES, frame_id, standard_nodes,
};
