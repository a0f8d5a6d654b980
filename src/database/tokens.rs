// Tokens are stored as the JSON encoding of `StoredToken`.
use crate::error::{AppError, AppResult};
use crate::models::StoredToken;
use sqlx::SqlitePool;

pub async fn load(pool: &SqlitePool, account_name: &str) -> AppResult<Option<StoredToken>> {
    let raw: Option<String> = sqlx::query_scalar("SELECT token FROM tokens WHERE account_name = ?")
        .bind(account_name)
        .fetch_optional(pool)
        .await?;

    raw.map(|json| {
        serde_json::from_str(&json).map_err(|e| {
            AppError::auth(format!("stored token for {} is unreadable: {}", account_name, e))
        })
    })
    .transpose()
}

pub async fn save(pool: &SqlitePool, account_name: &str, token: &StoredToken) -> AppResult<()> {
    let json = serde_json::to_string(token)
        .map_err(|e| AppError::auth(format!("failed to encode token for {}: {}", account_name, e)))?;

    sqlx::query("INSERT OR REPLACE INTO tokens (account_name, token) VALUES (?, ?)")
        .bind(account_name)
        .bind(json)
        .execute(pool)
        .await?;

    Ok(())
}
