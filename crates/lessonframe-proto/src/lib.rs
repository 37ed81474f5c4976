//! Lesson embedding wire types.
//!
//! Everything that crosses a boundary between the host page, the embedded
//! lesson frame and the host backend lives here:
//!
//! - [`InboundMessage`]: JSON envelopes posted by the child frame
//! - [`Origin`]: scheme+host+port compared byte-for-byte
//! - [`FrameUrl`] / [`FragmentParams`]: the frame location and its fragment
//! - [`AnalyticsReport`]: lifecycle reports POSTed to the host backend
//!
//! The crate is pure data: no I/O, no clocks, no randomness.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analytics;
pub mod envelope;
pub mod error;
pub mod frame_url;
pub mod origin;

pub use analytics::{AnalyticsReport, ReportEndpoint, StateTransitionReport, VersionReport};
pub use envelope::{
    ExplorationCompleted, ExplorationLoaded, ExplorationReset, HeightChange, InboundMessage,
    MessageKind, StateTransition,
};
pub use error::EnvelopeError;
pub use frame_url::{EMBED_PROTOCOL_VERSION, FragmentParams, FrameUrl};
pub use origin::Origin;
