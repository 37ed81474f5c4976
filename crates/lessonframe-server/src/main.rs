//! Lesson backend binary.
//!
//! # Usage
//!
//! ```bash
//! # Serve the default lesson on localhost
//! lessonframe-server
//!
//! # Serve a specific lesson with translations
//! lessonframe-server --bind 0.0.0.0:8000 --lesson-id fractions --translations ./i18n
//! ```

use std::path::PathBuf;

use clap::Parser;
use lessonframe_server::{
    BlockSettings, DEFAULT_EVENT_CAPACITY, Server, ServerRuntimeConfig, events,
    settings::{DEFAULT_DISPLAY_NAME, DEFAULT_LESSON_ID, DEFAULT_SRC},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Lesson embedding backend
#[derive(Parser, Debug)]
#[command(name = "lessonframe-server")]
#[command(about = "Host backend for embedded lessons")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Lesson to embed
    #[arg(long, default_value = DEFAULT_LESSON_ID)]
    lesson_id: String,

    /// Origin of the lesson site
    #[arg(long, default_value = DEFAULT_SRC)]
    src: String,

    /// Display name of the block
    #[arg(long, default_value = DEFAULT_DISPLAY_NAME)]
    display_name: String,

    /// Directory of `<lang>.json` translation catalogs
    #[arg(short, long)]
    translations: Option<PathBuf>,

    /// Events buffered before new ones are dropped
    #[arg(long, default_value_t = DEFAULT_EVENT_CAPACITY)]
    event_capacity: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Lesson backend starting");
    tracing::info!("Binding to {}", args.bind);

    let config = ServerRuntimeConfig {
        bind_address: args.bind,
        settings: BlockSettings {
            display_name: args.display_name,
            lesson_id: args.lesson_id,
            src: args.src,
        },
        translations_dir: args.translations,
        event_capacity: args.event_capacity,
    };

    let (publisher, mut receiver) = events::channel(config.event_capacity);
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            tracing::info!(event = event.name, payload = %event.payload, "published");
        }
    });

    let server = Server::bind(config, publisher).await?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
