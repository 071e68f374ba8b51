pub mod auth;
pub mod bilan;
pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod patients;
pub mod scheduling;
pub mod validation;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the embedding host (GUI shell, test harness).
///
/// Honors `RUST_LOG` when set, otherwise falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
