// Google Calendar integration
// Event deletion over the v3 REST API, with OAuth refresh-token handling.

use crate::calendar::{CalendarError, ClientFactory, EventDeleter};
use crate::config::{Config, GoogleConfig};
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::StoredToken;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub struct GoogleCalendarClient {
    http: Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(http: Client, access_token: &str) -> Self {
        Self::with_base_url(http, access_token, CALENDAR_API_BASE)
    }

    pub fn with_base_url(http: Client, access_token: &str, base_url: &str) -> Self {
        Self {
            http,
            access_token: access_token.to_string(),
            base_url: base_url.to_string(),
        }
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> Result<Url, CalendarError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CalendarError::Api(format!("invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| CalendarError::Api(format!("base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(&["calendars", calendar_id, "events", event_id]);
        Ok(url)
    }
}

#[async_trait]
impl EventDeleter for GoogleCalendarClient {
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), CalendarError> {
        let url = self.event_url(calendar_id, event_id)?;
        log::debug!("DELETE {}", url);

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        // Delete returns 204 No Content on success
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let body = response.text().await.unwrap_or_default();

        Err(status_error(status, retry_after, event_id, body))
    }
}

fn status_error(
    status: StatusCode,
    retry_after: Option<u64>,
    event_id: &str,
    body: String,
) -> CalendarError {
    match status.as_u16() {
        401 => CalendarError::TokenExpired,
        403 => CalendarError::AuthRequired,
        404 => CalendarError::NotFound(event_id.to_string()),
        410 => CalendarError::Gone(event_id.to_string()),
        429 => CalendarError::RateLimited(retry_after.unwrap_or(60)),
        _ => CalendarError::Api(format!("{}: {}", status, body)),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Builds per-account Google clients from tokens kept in the local store.
pub struct GoogleClientFactory {
    http: Client,
    db: Database,
    credentials: GoogleConfig,
    api_base: String,
    token_url: String,
}

impl GoogleClientFactory {
    pub fn new(http: Client, db: Database, config: &Config) -> Self {
        Self {
            http,
            db,
            credentials: config.google.clone(),
            api_base: CALENDAR_API_BASE.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }

    /// Point the factory at alternate API and token endpoints.
    pub fn with_endpoints(mut self, api_base: &str, token_url: &str) -> Self {
        self.api_base = api_base.to_string();
        self.token_url = token_url.to_string();
        self
    }

    async fn access_token(&self, account_name: &str) -> AppResult<String> {
        let token = self.db.load_token(account_name).await?.ok_or_else(|| {
            AppError::auth(format!(
                "no token stored for account {}; run the add command first",
                account_name
            ))
        })?;

        if !token.is_expired(Utc::now()) {
            return Ok(token.access_token);
        }

        log::info!("Refreshing access token for account '{}'", account_name);
        let refreshed = self.refresh(account_name, &token).await?;
        self.db.save_token(account_name, &refreshed).await?;
        Ok(refreshed.access_token)
    }

    async fn refresh(&self, account_name: &str, token: &StoredToken) -> AppResult<StoredToken> {
        if token.refresh_token.is_empty() {
            return Err(AppError::auth(format!(
                "token for account {} expired and has no refresh token",
                account_name
            )));
        }

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", token.refresh_token.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::auth(format!("token refresh for {} failed: {}", account_name, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::auth(format!(
                "token refresh for {} rejected ({}): {}",
                account_name, status, body
            )));
        }

        let parsed: TokenResponse = response.json().await.map_err(|e| {
            AppError::auth(format!("token refresh for {} returned bad JSON: {}", account_name, e))
        })?;

        let expiry = (parsed.expires_in > 0).then(|| Utc::now() + Duration::seconds(parsed.expires_in));
        let token_type = if parsed.token_type.is_empty() {
            token.token_type.clone()
        } else {
            parsed.token_type
        };

        // Google usually omits the refresh token on refresh
        let refresh_token = parsed
            .refresh_token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| token.refresh_token.clone());

        Ok(StoredToken {
            access_token: parsed.access_token,
            token_type,
            refresh_token,
            expiry,
        })
    }
}

#[async_trait]
impl ClientFactory for GoogleClientFactory {
    async fn client_for(&self, account_name: &str) -> AppResult<Arc<dyn EventDeleter>> {
        let access_token = self.access_token(account_name).await?;
        log::debug!("Built calendar client for account '{}'", account_name);
        Ok(Arc::new(GoogleCalendarClient::with_base_url(
            self.http.clone(),
            &access_token,
            &self.api_base,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> Config {
        Config::parse("[google]\nclient_id = \"cid\"\nclient_secret = \"csecret\"\n").unwrap()
    }

    async fn delete_with_status(status: u16) -> Result<(), CalendarError> {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/c1/events/e1"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let client = GoogleCalendarClient::with_base_url(Client::new(), "test_token", &mock_server.uri());
        client.delete_event("c1", "e1").await
    }

    #[tokio::test]
    async fn test_delete_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/event123"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GoogleCalendarClient::with_base_url(Client::new(), "test_token", &mock_server.uri());
        let result = client.delete_event("primary", "event123").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_event_not_found() {
        let err = delete_with_status(404).await.unwrap_err();
        assert!(matches!(err, CalendarError::NotFound(ref id) if id == "e1"));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_event_gone() {
        let err = delete_with_status(410).await.unwrap_err();
        assert!(matches!(err, CalendarError::Gone(_)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_event_unauthorized() {
        let err = delete_with_status(401).await.unwrap_err();
        assert!(matches!(err, CalendarError::TokenExpired));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_event_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
            .mount(&mock_server)
            .await;

        let client = GoogleCalendarClient::with_base_url(Client::new(), "t", &mock_server.uri());
        let err = client.delete_event("c1", "e1").await.unwrap_err();
        assert!(matches!(err, CalendarError::RateLimited(12)));
    }

    #[tokio::test]
    async fn test_delete_event_server_error() {
        let err = delete_with_status(500).await.unwrap_err();
        assert!(matches!(err, CalendarError::Api(_)));
    }

    #[test]
    fn test_event_url_encodes_ids() {
        let client = GoogleCalendarClient::new(Client::new(), "t");
        let url = client.event_url("team/cal#1@group.calendar.google.com", "e 1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team%2Fcal%231@group.calendar.google.com/events/e%201"
        );
    }

    #[tokio::test]
    async fn test_factory_uses_stored_token() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/c1/events/e1"))
            .and(header("Authorization", "Bearer stored_access"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let db = Database::in_memory().await.unwrap();
        let token = StoredToken {
            access_token: "stored_access".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: "refresh".to_string(),
            expiry: Some(Utc::now() + Duration::hours(1)),
        };
        db.save_token("acct-A", &token).await.unwrap();

        let token_url = format!("{}/token", mock_server.uri());
        let factory = GoogleClientFactory::new(Client::new(), db, &test_config())
            .with_endpoints(&mock_server.uri(), &token_url);

        let client = factory.client_for("acct-A").await.unwrap();
        client.delete_event("c1", "e1").await.unwrap();
    }

    #[tokio::test]
    async fn test_factory_refreshes_expired_token() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=old_refresh"))
            .and(body_string_contains("client_id=cid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh_access",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let db = Database::in_memory().await.unwrap();
        let expired = StoredToken {
            access_token: "stale_access".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: "old_refresh".to_string(),
            expiry: Some(Utc::now() - Duration::hours(1)),
        };
        db.save_token("acct-A", &expired).await.unwrap();

        let token_url = format!("{}/token", mock_server.uri());
        let factory = GoogleClientFactory::new(Client::new(), db.clone(), &test_config())
            .with_endpoints(&mock_server.uri(), &token_url);

        let access = factory.access_token("acct-A").await.unwrap();
        assert_eq!(access, "fresh_access");

        let saved = db.load_token("acct-A").await.unwrap().unwrap();
        assert_eq!(saved.access_token, "fresh_access");
        assert_eq!(saved.refresh_token, "old_refresh");
        assert!(!saved.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn test_factory_rejects_refresh_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&mock_server)
            .await;

        let db = Database::in_memory().await.unwrap();
        let expired = StoredToken {
            access_token: "stale".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: "revoked".to_string(),
            expiry: Some(Utc::now() - Duration::minutes(5)),
        };
        db.save_token("acct-A", &expired).await.unwrap();

        let token_url = format!("{}/token", mock_server.uri());
        let factory = GoogleClientFactory::new(Client::new(), db, &test_config())
            .with_endpoints(&mock_server.uri(), &token_url);

        let result = factory.client_for("acct-A").await;
        assert!(matches!(result, Err(AppError::Auth(ref msg)) if msg.contains("invalid_grant")));
    }

    #[tokio::test]
    async fn test_factory_without_token() {
        let db = Database::in_memory().await.unwrap();
        let factory = GoogleClientFactory::new(Client::new(), db, &test_config());

        let result = factory.client_for("unknown").await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
