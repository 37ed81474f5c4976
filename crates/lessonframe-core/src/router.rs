//! Message router
//!
//! Authenticates cross-document messages and routes them to the frame that
//! sent them.
//!
//! ## Authentication
//!
//! A message is accepted only when both checks pass:
//!
//! - Source window: the sending window is one registered to a mounted frame
//! - Origin: the reported origin is byte-for-byte equal to that frame's
//!   source origin
//!
//! Neither check alone is enough. The origin alone would let any window from
//! the lesson origin (another tab, another frame) speak for this one; the
//! window alone would accept messages after the frame navigated elsewhere.
//!
//! ## Logging
//!
//! Authentication failures and malformed bodies are dropped without a trace.
//! Only authenticated messages of an unknown kind are logged.

use std::collections::HashMap;

use lessonframe_proto::{EnvelopeError, InboundMessage, Origin};

use crate::{controller::FrameId, error::RouteError};

/// Handle of a browsing context (window) as seen by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

/// A cross-document message as delivered to the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEnvelope {
    /// Origin reported by the browser for the sender.
    pub origin: String,
    /// Sending window, if the browser exposed one.
    pub source: Option<WindowId>,
    /// Message body.
    pub data: String,
}

/// An authenticated, decoded message and its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    /// Frame that sent the message.
    pub frame: FrameId,
    /// Decoded message.
    pub message: InboundMessage,
}

#[derive(Debug, Clone)]
struct Registration {
    frame: FrameId,
    origin: Origin,
}

/// Maps child windows to the frames that own them.
#[derive(Debug, Clone, Default)]
pub struct MessageRouter {
    by_window: HashMap<WindowId, Registration>,
}

impl MessageRouter {
    /// Empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept messages from `window` on behalf of `frame`, provided they
    /// carry `origin`.
    ///
    /// Registering a window again replaces its previous registration.
    pub fn register(&mut self, window: WindowId, frame: FrameId, origin: Origin) {
        if let Some(previous) = self.by_window.insert(window, Registration { frame, origin }) {
            if previous.frame != frame {
                tracing::debug!(?window, from = %previous.frame, to = %frame, "window reassigned");
            }
        }
    }

    /// Forget every window registered for `frame`.
    pub fn unregister(&mut self, frame: FrameId) {
        self.by_window.retain(|_, registration| registration.frame != frame);
    }

    /// Frame registered for `window`.
    pub fn frame_for(&self, window: WindowId) -> Option<FrameId> {
        self.by_window.get(&window).map(|r| r.frame)
    }

    /// Number of registered windows.
    pub fn len(&self) -> usize {
        self.by_window.len()
    }

    /// True if no window is registered.
    pub fn is_empty(&self) -> bool {
        self.by_window.is_empty()
    }

    /// Authenticate and decode a message.
    ///
    /// Decoding happens only after authentication, so an unauthenticated
    /// sender cannot tell a malformed body from a rejected one.
    ///
    /// # Errors
    ///
    /// - `RouteError::AuthenticationFailure` for an unknown or missing
    ///   source window, or an origin other than the frame's
    /// - `RouteError::MalformedMessage` if the body is not a valid envelope
    /// - `RouteError::UnrecognizedKind` if the title is unknown
    pub fn authenticate(&self, envelope: &InboundEnvelope) -> Result<Routed, RouteError> {
        let registration = envelope
            .source
            .and_then(|window| self.by_window.get(&window))
            .ok_or(RouteError::AuthenticationFailure)?;

        if !registration.origin.matches(&envelope.origin) {
            return Err(RouteError::AuthenticationFailure);
        }

        match InboundMessage::decode(&envelope.data) {
            Ok(message) => Ok(Routed { frame: registration.frame, message }),
            Err(EnvelopeError::Malformed { reason }) => {
                Err(RouteError::MalformedMessage { reason })
            },
            Err(EnvelopeError::UnrecognizedKind { title }) => {
                let err = RouteError::UnrecognizedKind { title };
                tracing::warn!(frame = %registration.frame, "{err}");
                Err(err)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lessonframe_proto::ExplorationLoaded;

    use super::*;

    const LESSONS: &str = "https://lessons.example.org";

    fn router() -> MessageRouter {
        let mut router = MessageRouter::new();
        router.register(WindowId(7), FrameId(0), Origin::new(LESSONS));
        router
    }

    fn envelope(origin: &str, source: Option<u64>, data: &str) -> InboundEnvelope {
        InboundEnvelope {
            origin: origin.to_string(),
            source: source.map(WindowId),
            data: data.to_string(),
        }
    }

    const LOADED: &str =
        r#"{"title":"explorationLoaded","payload":{"explorationVersion":"2"}}"#;

    #[test]
    fn routes_authenticated_message() {
        let routed = router().authenticate(&envelope(LESSONS, Some(7), LOADED)).unwrap();

        assert_eq!(routed.frame, FrameId(0));
        assert_eq!(
            routed.message,
            InboundMessage::ExplorationLoaded(ExplorationLoaded {
                exploration_version: "2".to_string()
            })
        );
    }

    #[test]
    fn rejects_foreign_origin_from_known_window() {
        let result = router().authenticate(&envelope("https://evil.example", Some(7), LOADED));
        assert_eq!(result, Err(RouteError::AuthenticationFailure));
    }

    #[test]
    fn rejects_right_origin_from_unknown_window() {
        let result = router().authenticate(&envelope(LESSONS, Some(8), LOADED));
        assert_eq!(result, Err(RouteError::AuthenticationFailure));

        let result = router().authenticate(&envelope(LESSONS, None, LOADED));
        assert_eq!(result, Err(RouteError::AuthenticationFailure));
    }

    #[test]
    fn origin_comparison_is_exact() {
        for origin in [
            "https://lessons.example.org/",
            "https://lessons.example.org:443",
            "HTTPS://lessons.example.org",
            "http://lessons.example.org",
        ] {
            let result = router().authenticate(&envelope(origin, Some(7), LOADED));
            assert_eq!(result, Err(RouteError::AuthenticationFailure), "{origin}");
        }
    }

    #[test]
    fn authentication_precedes_decoding() {
        let result = router().authenticate(&envelope("https://evil.example", Some(7), "{"));
        assert_eq!(result, Err(RouteError::AuthenticationFailure));
    }

    #[test]
    fn malformed_and_unknown_are_distinguished() {
        let result = router().authenticate(&envelope(LESSONS, Some(7), "not json"));
        assert!(matches!(result, Err(RouteError::MalformedMessage { .. })));

        let result =
            router().authenticate(&envelope(LESSONS, Some(7), r#"{"title":"bogus","payload":{}}"#));
        assert_eq!(result, Err(RouteError::UnrecognizedKind { title: "bogus".to_string() }));
    }

    #[test]
    fn unregister_removes_frame_windows() {
        let mut router = router();
        router.register(WindowId(9), FrameId(0), Origin::new(LESSONS));
        router.register(WindowId(10), FrameId(1), Origin::new(LESSONS));
        assert_eq!(router.len(), 3);

        router.unregister(FrameId(0));

        assert_eq!(router.len(), 1);
        assert_eq!(router.frame_for(WindowId(7)), None);
        assert_eq!(router.frame_for(WindowId(10)), Some(FrameId(1)));
    }

    #[test]
    fn frames_are_isolated() {
        let mut router = router();
        router.register(WindowId(8), FrameId(1), Origin::new("https://other.example.org"));

        // Frame 1's window cannot use frame 0's origin.
        let result = router.authenticate(&envelope(LESSONS, Some(8), LOADED));
        assert_eq!(result, Err(RouteError::AuthenticationFailure));

        let routed =
            router.authenticate(&envelope("https://other.example.org", Some(8), LOADED)).unwrap();
        assert_eq!(routed.frame, FrameId(1));
    }
}
