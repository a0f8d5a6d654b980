//! Calendar desynchronization.
//!
//! Removes every recorded blocker event from its remote calendar, then drops
//! the bookkeeping rows. The remote pass must finish cleanly before any row is
//! deleted; a record whose remote deletion fails stays in the store for the
//! next run.

use crate::calendar::google::{GoogleClientFactory, CALENDAR_API_BASE, TOKEN_URL};
use crate::calendar::{ClientFactory, EventDeleter};
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::database::{Database, DATABASE_FILE_NAME};
use crate::error::{AppError, AppResult};
use crate::http_config::HttpConfig;
use crate::models::{BlockerEvent, EventKey};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DesyncOptions {
    /// Explicit config file. `None` searches for `.gcalsync.toml`.
    pub config_path: Option<PathBuf>,
    pub database_path: PathBuf,
    pub api_base: String,
    pub token_url: String,
}

impl Default for DesyncOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            database_path: PathBuf::from(DATABASE_FILE_NAME),
            api_base: CALENDAR_API_BASE.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DesyncSummary {
    pub deleted: usize,
    pub not_found: usize,
    pub purged: usize,
}

/// Load config, open the store, and run one desync pass against Google.
///
/// The store is closed before returning on every path once it was opened.
pub async fn desync_calendars<W: Write>(options: &DesyncOptions, out: &mut W) -> AppResult<DesyncSummary> {
    let config = match &options.config_path {
        Some(path) => Config::from_path(path)?,
        None => Config::load(CONFIG_FILE_NAME)?,
    };

    let db = Database::open(&options.database_path).await?;
    let result = run_with_google(&config, &db, options, out).await;
    db.close().await;
    result
}

async fn run_with_google<W: Write>(
    config: &Config,
    db: &Database,
    options: &DesyncOptions,
    out: &mut W,
) -> AppResult<DesyncSummary> {
    let http = HttpConfig::default().build_client()?;
    let factory = GoogleClientFactory::new(http, db.clone(), config)
        .with_endpoints(&options.api_base, &options.token_url);

    Desynchronizer::new(db, &factory).run(out).await
}

pub struct Desynchronizer<'a> {
    db: &'a Database,
    factory: &'a dyn ClientFactory,
    clients: HashMap<String, Arc<dyn EventDeleter>>,
}

impl<'a> Desynchronizer<'a> {
    pub fn new(db: &'a Database, factory: &'a dyn ClientFactory) -> Self {
        Self {
            db,
            factory,
            clients: HashMap::new(),
        }
    }

    pub async fn run<W: Write>(&mut self, out: &mut W) -> AppResult<DesyncSummary> {
        writeln!(out, "🚀 Starting calendar desynchronization...")?;

        let events = self.db.all_blocker_events().await?;
        info!("Found {} blocker events to remove", events.len());

        let mut summary = DesyncSummary::default();
        let keys = self.delete_remote(&events, &mut summary, out).await?;
        summary.purged = self.purge_local(&keys, out).await?;

        writeln!(out, "Calendars desynced successfully")?;
        Ok(summary)
    }

    /// Returns the keys of every event confirmed absent remotely, in store order.
    async fn delete_remote<W: Write>(
        &mut self,
        events: &[BlockerEvent],
        summary: &mut DesyncSummary,
        out: &mut W,
    ) -> AppResult<Vec<EventKey>> {
        let mut keys = Vec::with_capacity(events.len());

        for event in events {
            let client = self.client(&event.account_name).await?;

            match client.delete_event(&event.calendar_id, &event.event_id).await {
                Ok(()) => {
                    writeln!(out, "  ✅ Blocker event deleted: {}", event.event_id)?;
                    summary.deleted += 1;
                }
                Err(e) if e.is_not_found() => {
                    warn!("Blocker event {} already absent: {}", event.event_id, e);
                    writeln!(out, "  ⚠️ Blocker event not found in calendar: {}", event.event_id)?;
                    summary.not_found += 1;
                }
                Err(e) => {
                    return Err(AppError::calendar(
                        format!(
                            "deleting blocker event {} from calendar {}",
                            event.event_id, event.calendar_id
                        ),
                        e,
                    ));
                }
            }

            keys.push(event.key());
        }

        Ok(keys)
    }

    async fn purge_local<W: Write>(&self, keys: &[EventKey], out: &mut W) -> AppResult<usize> {
        for key in keys {
            let rows = self.db.delete_blocker_event(key).await?;
            debug!(
                "Removed {} row(s) for event {} on calendar {}",
                rows, key.event_id, key.calendar_id
            );
            writeln!(out, "  📥 Blocker event deleted from database: {}", key.event_id)?;
        }
        Ok(keys.len())
    }

    async fn client(&mut self, account_name: &str) -> AppResult<Arc<dyn EventDeleter>> {
        if let Some(client) = self.clients.get(account_name) {
            return Ok(Arc::clone(client));
        }

        let client = self.factory.client_for(account_name).await?;
        self.clients.insert(account_name.to_string(), Arc::clone(&client));
        Ok(client)
    }
}

/// Look up the account that owns `calendar_id`. An unknown calendar is an error.
pub async fn account_name_for_calendar(db: &Database, calendar_id: &str) -> AppResult<String> {
    match db.account_name_for_calendar(calendar_id).await {
        Ok(name) => Ok(name),
        Err(AppError::Database(sqlx::Error::RowNotFound)) => Err(AppError::not_found(format!(
            "no account recorded for calendar ID {}",
            calendar_id
        ))),
        Err(e) => Err(e),
    }
}
