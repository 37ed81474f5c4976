//! Frame location construction.
//!
//! ```text
//! <origin>/explore/<lesson>?iframed=true&locale=<locale>[&v=<version>]
//!     #version=<protocol>&secret=<secret>
//! ```
//!
//! The query is visible to servers and their logs. The fragment never leaves
//! the browser and is readable only by script inside the child frame, which
//! is why the session secret travels there and nowhere else.

use std::fmt;

use crate::origin::Origin;

/// Version of the parent/child embedding protocol, sent in the fragment.
pub const EMBED_PROTOCOL_VERSION: &str = "0.0.1";

const VERSION_KEY: &str = "version";
const SECRET_KEY: &str = "secret";

/// Location of an embedded lesson frame.
///
/// # Security
///
/// - **Debug Redaction**: the `Debug` impl redacts `secret`; the full
///   location is only produced by [`FrameUrl::to_uri`].
#[derive(Clone, PartialEq, Eq)]
pub struct FrameUrl {
    /// Origin serving the lesson.
    pub origin: Origin,
    /// Lesson identifier.
    pub lesson_id: String,
    /// Locale requested from the lesson server.
    pub locale: String,
    /// Pinned lesson version, if any.
    pub exploration_version: Option<String>,
    /// Embedding protocol version.
    pub protocol_version: String,
    /// Per-page session secret.
    pub secret: String,
}

impl FrameUrl {
    /// Render the full location, escaped the way `encodeURI` does.
    pub fn to_uri(&self) -> String {
        let version = self
            .exploration_version
            .as_deref()
            .map(|v| format!("&v={v}"))
            .unwrap_or_default();

        let raw = format!(
            concat!(
                "{origin}/explore/{lesson}?iframed=true&locale={locale}{version}",
                "#{version_key}={protocol}&{secret_key}={secret}",
            ),
            origin = self.origin,
            lesson = self.lesson_id,
            locale = self.locale,
            protocol = self.protocol_version,
            secret = self.secret,
            version = version,
            version_key = VERSION_KEY,
            secret_key = SECRET_KEY,
        );

        encode_uri(&raw)
    }
}

impl fmt::Debug for FrameUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameUrl")
            .field("origin", &self.origin)
            .field("lesson_id", &self.lesson_id)
            .field("locale", &self.locale)
            .field("exploration_version", &self.exploration_version)
            .field("protocol_version", &self.protocol_version)
            .field("secret", &format!("<redacted {} chars>", self.secret.len()))
            .finish()
    }
}

/// Parameters the child frame reads back from its location fragment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FragmentParams {
    /// Embedding protocol version.
    pub version: Option<String>,
    /// Session secret.
    pub secret: Option<String>,
}

impl FragmentParams {
    /// Parse a fragment, with or without its leading `#`.
    ///
    /// Unknown keys are ignored; the last occurrence of a key wins.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut params = Self::default();

        for pair in fragment.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                VERSION_KEY => params.version = Some(value.to_string()),
                SECRET_KEY => params.secret = Some(value.to_string()),
                _ => {},
            }
        }

        params
    }

    /// Extract the fragment from a full location and parse it.
    pub fn from_uri(uri: &str) -> Self {
        uri.split_once('#').map(|(_, fragment)| Self::parse(fragment)).unwrap_or_default()
    }
}

impl fmt::Debug for FragmentParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentParams")
            .field("version", &self.version)
            .field("secret", &self.secret.as_ref().map(|s| format!("<redacted {} chars>", s.len())))
            .finish()
    }
}

/// Percent-encode everything outside the `encodeURI` safe set.
fn encode_uri(input: &str) -> String {
    const SAFE: &[u8] = b";,/?:@&=+$-_.!~*'()#";

    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || SAFE.contains(&byte) {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
