//! Database query functions for the `executed_days` table.

use anyhow::{Context, Result};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use studyplan_core::model::ExecutedDayEntry;

use crate::models::{ExecutedDayRow, to_sql_date, to_sql_minutes, to_sql_timestamp};

/// Insert an executed-day record.
///
/// Fails with a unique violation if the day was already executed.
pub async fn insert_executed_day<'e>(
    executor: impl PgExecutor<'e>,
    entry: &ExecutedDayEntry,
) -> Result<ExecutedDayRow> {
    let executed_date = to_sql_date(&entry.date, "date")?;
    let executed_at = to_sql_timestamp(&entry.executed_at_iso, "executedAtIso")?;

    let row = sqlx::query_as::<_, ExecutedDayRow>(
        "INSERT INTO executed_days \
             (user_id, executed_date, result_status, total_executed_minutes, \
              factual_summary, executed_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING *",
    )
    .bind(entry.user_id)
    .bind(executed_date)
    .bind(entry.result_status.to_string())
    .bind(to_sql_minutes(
        entry.total_executed_minutes,
        "totalExecutedMinutes",
    )?)
    .bind(Json(&entry.factual_summary))
    .bind(executed_at)
    .fetch_one(executor)
    .await
    .with_context(|| {
        format!(
            "failed to insert executed day for {} on {}",
            entry.user_id, entry.date
        )
    })?;

    Ok(row)
}

pub async fn get_executed_day(
    pool: &PgPool,
    user_id: Uuid,
    date: &str,
) -> Result<Option<ExecutedDayRow>> {
    let executed_date = to_sql_date(date, "date")?;

    let row = sqlx::query_as::<_, ExecutedDayRow>(
        "SELECT * FROM executed_days WHERE user_id = $1 AND executed_date = $2",
    )
    .bind(user_id)
    .bind(executed_date)
    .fetch_optional(pool)
    .await
    .context("failed to fetch executed day")?;

    Ok(row)
}

/// Whether `(user, date)` has an execution record.
pub async fn executed_day_exists(pool: &PgPool, user_id: Uuid, date: &str) -> Result<bool> {
    let executed_date = to_sql_date(date, "date")?;

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM executed_days WHERE user_id = $1 AND executed_date = $2)",
    )
    .bind(user_id)
    .bind(executed_date)
    .fetch_one(pool)
    .await
    .context("failed to check executed day")?;

    Ok(exists)
}
