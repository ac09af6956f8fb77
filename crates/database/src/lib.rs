//! SQLite persistence layer for the parent dashboard.
//!
//! This crate provides async database operations for children, chat
//! messages, locations, call logs, schedules, safe zones, device presence,
//! and AI assistant history using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, models::NewChild, child};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:dashboard.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Add a child to a parent account
//!     let child = child::create_child(
//!         db.pool(),
//!         &NewChild {
//!             parent_id: "5d0f3c1e-parent".to_string(),
//!             name: "Ayu".to_string(),
//!             date_of_birth: Some("2015-04-01".to_string()),
//!             sex: Some("female".to_string()),
//!         },
//!     )
//!     .await?;
//!     println!("pairing code: {}", child.qr_code);
//!
//!     Ok(())
//! }
//! ```

pub mod assistant_message;
pub mod call_log;
pub mod chat_message;
pub mod child;
pub mod error;
pub mod location;
pub mod models;
pub mod presence;
pub mod safe_zone;
pub mod schedule;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    AssistantMessage, AttachmentKind, CallLog, CallType, ChatMessage, Child, Location,
    NewChatMessage, NewChild, NewSchedule, Presence, SafeZone, Schedule, SenderRole,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/dashboard.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing); keep it to one connection
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(url, pool_size, "Connected to database");

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
