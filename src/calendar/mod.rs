// Remote calendar seam
// The desync routine only ever deletes events, so that is the whole surface.

use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod google;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Event gone: {0}")]
    Gone(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl CalendarError {
    /// The event no longer exists remotely (404 or 410).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Gone(_))
    }
}

/// An authenticated client scoped to one account.
#[async_trait]
pub trait EventDeleter: Send + Sync {
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), CalendarError>;
}

/// Builds the client for an account on first use.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn client_for(&self, account_name: &str) -> AppResult<Arc<dyn EventDeleter>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_gone_are_recoverable() {
        assert!(CalendarError::NotFound("e1".to_string()).is_not_found());
        assert!(CalendarError::Gone("e1".to_string()).is_not_found());
    }

    #[test]
    fn test_other_errors_are_not_recoverable() {
        assert!(!CalendarError::TokenExpired.is_not_found());
        assert!(!CalendarError::AuthRequired.is_not_found());
        assert!(!CalendarError::RateLimited(30).is_not_found());
        assert!(!CalendarError::Api("500".to_string()).is_not_found());
    }
}
