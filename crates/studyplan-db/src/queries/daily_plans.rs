//! Database query functions for the `daily_plans` table.

use anyhow::{Context, Result};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use studyplan_core::model::DailyPlan;

use crate::models::{DailyPlanRow, to_sql_date, to_sql_minutes};

/// Insert the plan for `(user_id, plan.date)` or wholly replace the stored
/// one. Returns the stored row.
///
/// A stored plan that is already `EXECUTED` is never replaced; the call
/// fails instead.
pub async fn upsert_daily_plan<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    plan: &DailyPlan,
) -> Result<DailyPlanRow> {
    let plan_date = to_sql_date(&plan.date, "date")?;

    let row = sqlx::query_as::<_, DailyPlanRow>(
        "INSERT INTO daily_plans \
             (user_id, plan_date, status, daily_minutes, review_minutes, \
              extras_minutes, theory_minutes, items, trace) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (user_id, plan_date) DO UPDATE SET \
             status = EXCLUDED.status, \
             daily_minutes = EXCLUDED.daily_minutes, \
             review_minutes = EXCLUDED.review_minutes, \
             extras_minutes = EXCLUDED.extras_minutes, \
             theory_minutes = EXCLUDED.theory_minutes, \
             items = EXCLUDED.items, \
             trace = EXCLUDED.trace, \
             updated_at = now() \
         WHERE daily_plans.status <> 'EXECUTED' \
         RETURNING *",
    )
    .bind(user_id)
    .bind(plan_date)
    .bind(plan.status.to_string())
    .bind(to_sql_minutes(plan.daily_minutes, "dailyMinutes")?)
    .bind(to_sql_minutes(plan.review_minutes, "reviewMinutes")?)
    .bind(to_sql_minutes(plan.extras_minutes, "extrasMinutes")?)
    .bind(to_sql_minutes(plan.theory_minutes, "theoryMinutes")?)
    .bind(Json(&plan.items))
    .bind(Json(&plan.trace))
    .fetch_optional(executor)
    .await
    .with_context(|| format!("failed to upsert daily plan for {user_id} on {}", plan.date))?;

    match row {
        Some(row) => Ok(row),
        None => anyhow::bail!(
            "daily plan for {user_id} on {} is already executed and cannot be replaced",
            plan.date
        ),
    }
}

/// Fetch the stored plan for one `(user, date)`.
pub async fn get_daily_plan(
    pool: &PgPool,
    user_id: Uuid,
    date: &str,
) -> Result<Option<DailyPlanRow>> {
    let plan_date = to_sql_date(date, "date")?;

    let row = sqlx::query_as::<_, DailyPlanRow>(
        "SELECT * FROM daily_plans WHERE user_id = $1 AND plan_date = $2",
    )
    .bind(user_id)
    .bind(plan_date)
    .fetch_optional(pool)
    .await
    .context("failed to fetch daily plan")?;

    Ok(row)
}

/// Flip the stored plan for `(user, date)` to `EXECUTED`.
///
/// Returns whether a plan existed. A day may be executed without ever
/// having been planned.
pub async fn mark_executed<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    date: &str,
) -> Result<bool> {
    let plan_date = to_sql_date(date, "date")?;

    let result = sqlx::query(
        "UPDATE daily_plans SET status = 'EXECUTED', updated_at = now() \
         WHERE user_id = $1 AND plan_date = $2",
    )
    .bind(user_id)
    .bind(plan_date)
    .execute(executor)
    .await
    .context("failed to mark daily plan executed")?;

    Ok(result.rows_affected() > 0)
}
