//! Database query functions for the `cycle_cursors` table.

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::CycleCursorRow;

/// Store the CICLO cursor for a user, replacing any previous value.
pub async fn upsert_cycle_cursor<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    cursor: u32,
) -> Result<()> {
    let cursor =
        i32::try_from(cursor).with_context(|| format!("cycle cursor out of range: {cursor}"))?;

    sqlx::query(
        "INSERT INTO cycle_cursors (user_id, cursor) VALUES ($1, $2) \
         ON CONFLICT (user_id) DO UPDATE SET cursor = EXCLUDED.cursor, updated_at = now()",
    )
    .bind(user_id)
    .bind(cursor)
    .execute(executor)
    .await
    .context("failed to update cycle cursor")?;

    Ok(())
}

/// The stored cursor, or `None` if the user never ran a CICLO plan.
pub async fn get_cycle_cursor(pool: &PgPool, user_id: Uuid) -> Result<Option<u32>> {
    let row =
        sqlx::query_as::<_, CycleCursorRow>("SELECT * FROM cycle_cursors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch cycle cursor")?;

    row.map(|r| {
        u32::try_from(r.cursor).with_context(|| format!("stored cycle cursor is negative: {}", r.cursor))
    })
    .transpose()
}
