use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use borsa_go_core::entries::{EntryService, EntryServiceTrait};
use borsa_go_storage_sqlite::{db, entries::EntryRepository};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub entry_service: Arc<dyn EntryServiceTrait>,
    pub db_path: String,
}

/// Installs the global subscriber. Logs go to stderr so command output stays clean.
pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::debug!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let entry_repository = Arc::new(EntryRepository::new(pool.clone(), writer));
    let entry_service: Arc<dyn EntryServiceTrait> =
        Arc::new(EntryService::new(entry_repository));

    Ok(Arc::new(AppState {
        entry_service,
        db_path,
    }))
}
