use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A placeholder event the sync step created on a remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BlockerEvent {
    pub event_id: String,
    pub calendar_id: String,
    pub account_name: String,
}

impl BlockerEvent {
    pub fn new(event_id: &str, calendar_id: &str, account_name: &str) -> Self {
        Self {
            event_id: event_id.to_string(),
            calendar_id: calendar_id.to_string(),
            account_name: account_name.to_string(),
        }
    }

    pub fn key(&self) -> EventKey {
        EventKey {
            event_id: self.event_id.clone(),
            calendar_id: self.calendar_id.clone(),
        }
    }
}

/// Identifies exactly one blocker row: both fields must match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub event_id: String,
    pub calendar_id: String,
}
