//! Page-lifetime embedding context.

use std::time::Duration;

use lessonframe_proto::{EMBED_PROTOCOL_VERSION, Origin};

use crate::{
    env::Environment,
    error::EntropyError,
    i18n::Catalog,
    secret::{SECRET_LENGTH, SecretGenerator, SessionSecret},
};

/// How long a frame may take to report `explorationLoaded` before the
/// loading indicator turns into a failure message.
pub const LOAD_TIMEOUT: Duration = Duration::from_millis(10_000);

/// State shared by every frame created during one page load.
///
/// Built once at bootstrap and handed to each controller. A new page load
/// builds a new context, and with it a new secret.
#[derive(Debug, Clone)]
pub struct EmbedContext {
    page_origin: Origin,
    secret: SessionSecret,
    protocol_version: String,
    load_timeout: Duration,
    catalog: Catalog,
}

impl EmbedContext {
    /// Bootstrap a context for a page served from `page_origin`.
    ///
    /// # Errors
    ///
    /// Returns `EntropyError` if the environment cannot produce the session
    /// secret. The page must not embed any frame in that case.
    pub fn bootstrap<E: Environment>(env: &E, page_origin: Origin) -> Result<Self, EntropyError> {
        let secret = SecretGenerator::generate(env, SECRET_LENGTH)?;
        tracing::debug!(origin = %page_origin, "embedding context bootstrapped");

        Ok(Self {
            page_origin,
            secret,
            protocol_version: EMBED_PROTOCOL_VERSION.to_string(),
            load_timeout: LOAD_TIMEOUT,
            catalog: Catalog::new(),
        })
    }

    /// Use `catalog` for UI strings.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Override the load timeout.
    #[must_use]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Origin of the host page.
    pub fn page_origin(&self) -> &Origin {
        &self.page_origin
    }

    /// The session secret.
    pub fn secret(&self) -> &SessionSecret {
        &self.secret
    }

    /// Embedding protocol version written into frame fragments.
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Load timeout for new frames.
    pub fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// Translate a UI string.
    pub fn gettext<'a>(&'a self, source: &'a str) -> &'a str {
        self.catalog.gettext(source)
    }
}
