#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use crate::api::{AppState, MgmtState};
use crate::config::Config;
use crate::services::auth_service::AuthService;
use crate::services::health_service::HealthService;
use crate::services::message_service::MessageService;
use crate::storage::{MemoryStore, MessageStore, PgMessageStore};
use std::sync::Arc;
use tokio::sync::watch;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod telemetry;

/// The wired application: router state for both listeners.
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub mgmt_state: MgmtState,
}

impl App {
    /// Wires services around an already constructed store.
    #[must_use]
    pub fn with_store(config: &Config, store: Arc<dyn MessageStore>) -> Self {
        let state = AppState {
            message_service: MessageService::new(Arc::clone(&store)),
            auth_service: AuthService::new(&config.auth),
        };
        let mgmt_state = MgmtState { health_service: HealthService::new(store, config.health.clone()) };
        Self { state, mgmt_state }
    }
}

/// Opens the store selected by the configuration and applies any seed file.
///
/// # Errors
/// Returns an error if the database cannot be reached or migrated, or the seed file is malformed.
pub async fn init_store(config: &Config) -> anyhow::Result<Arc<dyn MessageStore>> {
    let store: Arc<dyn MessageStore> = if let Some(url) = &config.database_url {
        let pool = storage::init_pool(url, &config.database).await?;
        storage::run_migrations(&pool).await?;
        tracing::info!("Using PostgreSQL message store");
        Arc::new(PgMessageStore::new(pool))
    } else {
        tracing::info!("Using in-memory message store");
        Arc::new(MemoryStore::new())
    };

    if let Some(path) = &config.database.seed_csv {
        match storage::seed::load_csv(&*store, path).await {
            Ok(_) => {}
            Err(storage::seed::SeedError::Io(e)) => {
                tracing::warn!(error = %e, path = %path.display(), "Messages could not be loaded from seed file");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(store)
}

pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        tracing::error!(panic = %info, location = %location, "Unrecoverable panic");
    }));
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
