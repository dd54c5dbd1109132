use crate::config::DatabaseConfig;
use crate::domain::message::{Message, NewMessage};
use crate::error::Result;
use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use uuid::Uuid;

pub mod memory;
pub mod message_repo;
pub mod records;
pub mod seed;

pub use memory::MemoryStore;
pub use message_repo::PgMessageStore;

pub type DbPool = Pool<Postgres>;

/// Storage for board messages.
///
/// Implementations own all shared state; callers hold them behind an `Arc`.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug {
    /// Stores a new message, assigning a fresh id and a creation time later than
    /// any message created before it.
    async fn create(&self, message: NewMessage) -> Result<Message>;

    /// # Errors
    /// Returns `AppError::NotFound` if no message has this id.
    async fn get(&self, id: Uuid) -> Result<Message>;

    /// Returns every message, most recently created first.
    async fn list(&self) -> Result<Vec<Message>>;

    /// Replaces the text of a message and returns the updated record.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if no message has this id.
    async fn update_text(&self, id: Uuid, text: String) -> Result<Message>;

    /// Inserts a message that already carries its id and creation time.
    /// Returns `false` when a message with the same id is already stored.
    async fn restore(&self, message: Message) -> Result<bool>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Initializes the database connection pool, retrying while the database comes up.
///
/// # Errors
/// Returns `sqlx::Error` once every connection attempt has failed.
pub async fn init_pool(database_url: &str, config: &DatabaseConfig) -> std::result::Result<DbPool, sqlx::Error> {
    let strategy = ConstantBuilder::default()
        .with_delay(Duration::from_secs(config.retry_delay_secs))
        .with_max_times(config.connect_retries);

    (move || async move { PgPoolOptions::new().max_connections(config.max_connections).connect(database_url).await })
        .retry(strategy)
        .notify(|e, delay| {
            tracing::warn!(error = %e, retry_in = ?delay, "Database connection failed, retrying");
        })
        .await
}

/// Applies the embedded schema migrations.
///
/// # Errors
/// Returns an error if a migration fails.
pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
