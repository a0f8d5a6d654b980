use sqlx::SqlitePool;

pub async fn add(pool: &SqlitePool, account_name: &str, calendar_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO calendars (account_name, calendar_id) VALUES (?, ?)")
        .bind(account_name)
        .bind(calendar_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Fails with `RowNotFound` when no calendar row matches.
pub async fn account_name_for(pool: &SqlitePool, calendar_id: &str) -> Result<String, sqlx::Error> {
    sqlx::query_scalar("SELECT account_name FROM calendars WHERE calendar_id = ?")
        .bind(calendar_id)
        .fetch_one(pool)
        .await
}
