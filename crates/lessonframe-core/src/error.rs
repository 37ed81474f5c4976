//! Core error types.

use thiserror::Error;

/// Errors deriving an [`EmbedConfig`](crate::EmbedConfig) from a placeholder
/// node. Both are terminal for the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The node has no `openclassroom-id` attribute.
    #[error("no openclassroom-id attribute was specified")]
    MissingLessonId,

    /// The node is not an `<openclassroom>` element.
    #[error("expected an <openclassroom> node, not <{tag}>")]
    UnexpectedTag {
        /// Tag name found instead.
        tag: String,
    },
}

/// Reasons an inbound cross-document message was not delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Unknown source window, or origin not equal to the frame's source
    /// origin.
    #[error("message failed sender authentication")]
    AuthenticationFailure,

    /// Authenticated, but the body is not a valid envelope.
    #[error("malformed message: {reason}")]
    MalformedMessage {
        /// Decoder diagnostic.
        reason: String,
    },

    /// Authenticated and well-formed, but of an unknown kind.
    #[error("event {title} not recognized")]
    UnrecognizedKind {
        /// Title carried by the envelope.
        title: String,
    },
}

impl RouteError {
    /// Returns true if the failure must leave no trace at all.
    ///
    /// Authentication failures and malformed messages are dropped without
    /// logging. Unrecognized kinds come from an authenticated child and are
    /// logged.
    pub fn is_silent(&self) -> bool {
        match self {
            Self::AuthenticationFailure | Self::MalformedMessage { .. } => true,
            Self::UnrecognizedKind { .. } => false,
        }
    }
}

/// The environment could not supply random bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entropy source unavailable: {reason}")]
pub struct EntropyError {
    /// Diagnostic from the entropy source.
    pub reason: String,
}

/// Errors loading a translation catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Catalog text is not a JSON object of strings.
    #[error("invalid catalog: {reason}")]
    InvalidJson {
        /// Parser diagnostic.
        reason: String,
    },
}
