//! Database query functions for `projection_generation_logs` and
//! `calendar_projections`.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use studyplan_core::model::{CalendarProjection, ProjectionGenerationLogEntry};

use crate::models::{
    CalendarProjectionRow, ProjectionLogRow, to_sql_date, to_sql_minutes, to_sql_timestamp,
};

/// Append a projection log entry. Returns the inserted row, whose `id` is
/// the generation log id referenced by the projection.
pub async fn insert_projection_log(
    pool: &PgPool,
    entry: &ProjectionGenerationLogEntry,
) -> Result<ProjectionLogRow> {
    let row = sqlx::query_as::<_, ProjectionLogRow>(
        "INSERT INTO projection_generation_logs \
             (user_id, range_start, range_end, generated_at, day_count, input_hash, output_hash) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING *",
    )
    .bind(entry.user_id)
    .bind(to_sql_date(&entry.range_start, "rangeStart")?)
    .bind(to_sql_date(&entry.range_end, "rangeEnd")?)
    .bind(to_sql_timestamp(&entry.generated_at_iso, "generatedAtIso")?)
    .bind(to_sql_minutes(entry.day_count, "dayCount")?)
    .bind(&entry.input_hash)
    .bind(&entry.output_hash)
    .fetch_one(pool)
    .await
    .context("failed to insert projection generation log")?;

    Ok(row)
}

/// Insert or replace the cached projection for `(user, range)`.
pub async fn upsert_calendar_projection(
    pool: &PgPool,
    user_id: Uuid,
    projection: &CalendarProjection,
) -> Result<CalendarProjectionRow> {
    let row = sqlx::query_as::<_, CalendarProjectionRow>(
        "INSERT INTO calendar_projections \
             (user_id, range_start, range_end, days, generation_log_id) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (user_id, range_start, range_end) DO UPDATE SET \
             days = EXCLUDED.days, \
             generation_log_id = EXCLUDED.generation_log_id, \
             updated_at = now() \
         RETURNING *",
    )
    .bind(user_id)
    .bind(to_sql_date(&projection.range_start, "rangeStart")?)
    .bind(to_sql_date(&projection.range_end, "rangeEnd")?)
    .bind(Json(&projection.days))
    .bind(projection.generation_log_id)
    .fetch_one(pool)
    .await
    .context("failed to upsert calendar projection")?;

    Ok(row)
}

pub async fn get_calendar_projection(
    pool: &PgPool,
    user_id: Uuid,
    range_start: &str,
    range_end: &str,
) -> Result<Option<CalendarProjectionRow>> {
    let row = sqlx::query_as::<_, CalendarProjectionRow>(
        "SELECT * FROM calendar_projections \
         WHERE user_id = $1 AND range_start = $2 AND range_end = $3",
    )
    .bind(user_id)
    .bind(to_sql_date(range_start, "rangeStart")?)
    .bind(to_sql_date(range_end, "rangeEnd")?)
    .fetch_optional(pool)
    .await
    .context("failed to fetch calendar projection")?;

    Ok(row)
}
