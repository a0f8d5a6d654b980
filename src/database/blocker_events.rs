use crate::models::{BlockerEvent, EventKey};
use sqlx::SqlitePool;

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<BlockerEvent>, sqlx::Error> {
    sqlx::query_as::<_, BlockerEvent>(
        "SELECT event_id, calendar_id, account_name FROM blocker_events ORDER BY rowid",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert(
    pool: &SqlitePool,
    event: &BlockerEvent,
    origin_calendar_id: &str,
    origin_event_id: &str,
) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO blocker_events (event_id, origin_calendar_id, calendar_id, account_name, last_updated, origin_event_id) VALUES (?, ?, ?, ?, ?, ?)"
    )
    .bind(&event.event_id)
    .bind(origin_calendar_id)
    .bind(&event.calendar_id)
    .bind(&event.account_name)
    .bind(now)
    .bind(origin_event_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Deletes rows matching both the event and calendar id. Returns rows affected.
pub async fn delete(pool: &SqlitePool, key: &EventKey) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blocker_events WHERE event_id = ? AND calendar_id = ?")
        .bind(&key.event_id)
        .bind(&key.calendar_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
