//! TuneHub Storage
//!
//! `SQLite` database layer for the TuneHub catalog.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature (users, songs, albums, artists,
//!   playlists) owns its own queries
//! - **Listings**: [`SqliteCollection`] executes shaped listing queries in a
//!   single round trip
//!
//! # Example
//!
//! ```rust,no_run
//! use tunehub_core::{QueryShaper, ShaperConfig};
//! use tunehub_storage::{create_pool, run_migrations, SqliteCollection};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://tunehub.db").await?;
//! run_migrations(&pool).await?;
//!
//! let songs = SqliteCollection::songs(pool);
//! let params = vec![("genre".to_string(), "Jazz".to_string())];
//! let page = QueryShaper::new(ShaperConfig::default())
//!     .execute(&songs, &params)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod catalog;

// Vertical slices
pub mod albums;
pub mod artists;
pub mod playlists;
pub mod songs;
pub mod users;

pub use catalog::SqliteCollection;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://tunehub.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!(url = database_url, "Database pool created");

    Ok(pool)
}
