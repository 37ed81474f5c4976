//! Envelope decoding errors.

use thiserror::Error;

/// Errors produced while decoding a message posted by the child frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The body is not a JSON envelope, or the payload does not match the
    /// shape required by its title.
    #[error("malformed message: {reason}")]
    Malformed {
        /// Decoder diagnostic. Never shown to users.
        reason: String,
    },

    /// The envelope parsed but its title names no known message kind.
    #[error("unrecognized message kind: {title}")]
    UnrecognizedKind {
        /// Title carried by the envelope.
        title: String,
    },
}

impl EnvelopeError {
    pub(crate) fn malformed(err: &serde_json::Error) -> Self {
        Self::Malformed { reason: err.to_string() }
    }
}
