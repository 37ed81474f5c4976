//! Lesson embedding host backend.
//!
//! Serves the pieces of the course platform that surround an embedded
//! lesson:
//! - the student view holding the embed placeholder
//! - the studio edit form, its preview and its submit handler
//! - the analytics handlers the page reports lifecycle events to
//! - translation catalogs for the page script
//!
//! ## Architecture
//!
//! ```text
//! lessonframe-server
//!   ├─ Server             (axum over a tokio TcpListener)
//!   ├─ AppState           (settings, catalogs, event publisher)
//!   ├─ TranslationStore   (catalogs loaded at start-up)
//!   └─ EventPublisher     (bounded channel to the event consumer)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalogs;
mod error;
pub mod events;
mod handlers;
pub mod settings;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
pub use catalogs::TranslationStore;
pub use error::ServerError;
pub use events::{EventPublisher, EventReceiver, PublishedEvent};
use lessonframe_proto::ReportEndpoint;
pub use settings::{BlockSettings, StudioSubmit};
use tokio::{net::TcpListener, sync::RwLock};

/// Events buffered before new ones are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Address to bind to (e.g., "127.0.0.1:8000")
    pub bind_address: String,
    /// Initial block settings
    pub settings: BlockSettings,
    /// Directory of `<lang>.json` catalogs
    pub translations_dir: Option<PathBuf>,
    /// Capacity of the event channel
    pub event_capacity: usize,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            settings: BlockSettings::default(),
            translations_dir: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    settings: Arc<RwLock<BlockSettings>>,
    translations: Arc<TranslationStore>,
    events: EventPublisher,
}

impl AppState {
    /// Create handler state.
    pub fn new(
        settings: BlockSettings,
        translations: TranslationStore,
        events: EventPublisher,
    ) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            translations: Arc::new(translations),
            events,
        }
    }

    /// Snapshot of the current settings.
    pub async fn settings(&self) -> BlockSettings {
        self.settings.read().await.clone()
    }
}

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/student_view", get(handlers::student_view))
        .route("/studio_view", get(handlers::studio_view))
        .route("/author_view", get(handlers::author_view))
        .route(settings::STUDIO_SUBMIT_PATH, post(handlers::studio_submit))
        .route(&ReportEndpoint::ExplorationLoaded.path(), post(handlers::on_exploration_loaded))
        .route(&ReportEndpoint::StateTransition.path(), post(handlers::on_state_transition))
        .route(
            &ReportEndpoint::ExplorationCompleted.path(),
            post(handlers::on_exploration_completed),
        )
        .route("/i18n/:lang", get(handlers::translations))
        .with_state(state)
}

/// Production lesson backend.
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Load catalogs and bind the listener.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` or `ServerError::Catalog` if the
    /// catalogs fail to load, `ServerError::Transport` if binding fails.
    pub async fn bind(
        config: ServerRuntimeConfig,
        events: EventPublisher,
    ) -> Result<Self, ServerError> {
        let translations = match &config.translations_dir {
            Some(dir) => TranslationStore::load_dir(dir)?,
            None => TranslationStore::new(),
        };
        if translations.is_empty() {
            tracing::warn!("No translation catalogs loaded");
        } else {
            tracing::info!(catalogs = translations.len(), "Loaded translation catalogs");
        }

        let listener = TcpListener::bind(&config.bind_address).await?;
        let state = AppState::new(config.settings, translations, events);

        Ok(Self { listener, state })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until the process exits.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Transport` if the accept loop fails.
    pub async fn run(self) -> Result<(), ServerError> {
        axum::serve(self.listener, router(self.state)).await?;
        Ok(())
    }
}
