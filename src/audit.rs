use crate::{db::DbPool, error::AppResult, models::LogEntry};
use uuid::Uuid;

/// Append one entry to the activity log. Every mutating ledger operation
/// records exactly one entry; the write is part of the operation and its
/// failure propagates to the caller.
pub async fn record_activity(
    pool: &DbPool,
    action: &str,
    description: &str,
) -> AppResult<LogEntry> {
    let id = Uuid::new_v4();
    let entry = sqlx::query_as::<_, LogRow>(
        r#"
        INSERT INTO activity_logs (id, action, description)
        VALUES ($1, $2, $3)
        RETURNING id, action, description, created_at
        "#,
    )
    .bind(id)
    .bind(action)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(LogEntry {
        id: entry.id,
        action: entry.action,
        description: entry.description,
        created_at: entry.created_at,
    })
}

#[derive(sqlx::FromRow)]
struct LogRow {
    id: Uuid,
    action: String,
    description: String,
    created_at: chrono::DateTime<chrono::Utc>,
}
