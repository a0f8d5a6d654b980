// file: src/database/mod.rs

use crate::error::AppResult;
use crate::models::{BlockerEvent, EventKey, StoredToken};
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

// Declare submodules
pub mod blocker_events;
pub mod calendars;
pub mod tokens;

pub const DATABASE_FILE_NAME: &str = ".gcalsync.db";

/// Handle to the local bookkeeping store. Holds a single connection so the
/// run has exclusive use of it.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn open(path: &Path) -> AppResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let db = Self::connect(options).await?;
        info!("Opened database {}", path.display());
        Ok(db)
    }

    /// Private in-memory store, used by tests and dry runs.
    pub async fn in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        run_schema(&pool).await?;

        Ok(Database { pool })
    }

    /// Releases the connection. Safe to call on an already closed pool.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database closed");
    }

    // --- Blocker Event Delegates ---

    pub async fn all_blocker_events(&self) -> AppResult<Vec<BlockerEvent>> {
        Ok(blocker_events::get_all(&self.pool).await?)
    }

    pub async fn insert_blocker_event(
        &self,
        event: &BlockerEvent,
        origin_calendar_id: &str,
        origin_event_id: &str,
    ) -> AppResult<()> {
        Ok(blocker_events::insert(&self.pool, event, origin_calendar_id, origin_event_id).await?)
    }

    pub async fn delete_blocker_event(&self, key: &EventKey) -> AppResult<u64> {
        Ok(blocker_events::delete(&self.pool, key).await?)
    }

    // --- Calendar Delegates ---

    pub async fn add_calendar(&self, account_name: &str, calendar_id: &str) -> AppResult<()> {
        Ok(calendars::add(&self.pool, account_name, calendar_id).await?)
    }

    pub async fn account_name_for_calendar(&self, calendar_id: &str) -> AppResult<String> {
        Ok(calendars::account_name_for(&self.pool, calendar_id).await?)
    }

    // --- Token Delegates ---

    pub async fn load_token(&self, account_name: &str) -> AppResult<Option<StoredToken>> {
        tokens::load(&self.pool, account_name).await
    }

    pub async fn save_token(&self, account_name: &str, token: &StoredToken) -> AppResult<()> {
        tokens::save(&self.pool, account_name, token).await
    }
}

async fn run_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schema = include_str!("schema.sql");

    let mut current_statement = String::new();
    for line in schema.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }

        current_statement.push_str(line);
        current_statement.push('\n');

        if trimmed.ends_with(';') {
            sqlx::query(&current_statement).execute(pool).await?;
            current_statement.clear();
        }
    }
    Ok(())
}
