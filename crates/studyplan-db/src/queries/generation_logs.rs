//! Database query functions for the `plan_generation_logs` table.

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use studyplan_core::model::GenerationLogEntry;

use crate::models::{GenerationLogRow, to_sql_date, to_sql_timestamp};

/// Append one generation log entry. Returns the inserted row.
pub async fn insert_generation_log<'e>(
    executor: impl PgExecutor<'e>,
    entry: &GenerationLogEntry,
) -> Result<GenerationLogRow> {
    let plan_date = to_sql_date(&entry.date, "date")?;
    let generated_at = to_sql_timestamp(&entry.generated_at_iso, "generatedAtIso")?;

    let row = sqlx::query_as::<_, GenerationLogRow>(
        "INSERT INTO plan_generation_logs \
             (user_id, plan_date, generated_at, reason, input_hash, output_hash, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING *",
    )
    .bind(entry.user_id)
    .bind(plan_date)
    .bind(generated_at)
    .bind(&entry.reason)
    .bind(&entry.input_hash)
    .bind(&entry.output_hash)
    .bind(entry.notes.as_deref())
    .fetch_one(executor)
    .await
    .context("failed to insert generation log")?;

    Ok(row)
}

/// All log entries for one `(user, date)`, oldest first.
pub async fn list_generation_logs(
    pool: &PgPool,
    user_id: Uuid,
    date: &str,
) -> Result<Vec<GenerationLogRow>> {
    let plan_date = to_sql_date(date, "date")?;

    let rows = sqlx::query_as::<_, GenerationLogRow>(
        "SELECT * FROM plan_generation_logs \
         WHERE user_id = $1 AND plan_date = $2 \
         ORDER BY generated_at, id",
    )
    .bind(user_id)
    .bind(plan_date)
    .fetch_all(pool)
    .await
    .context("failed to list generation logs")?;

    Ok(rows)
}
