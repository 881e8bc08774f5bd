//! [`PgPlanStore`]: every engine port backed by one PostgreSQL pool.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use studyplan_core::model::{
    CalendarProjection, CycleState, DailyPlan, ExecutedDayEntry, GenerationLogEntry,
    PlanningContext, ProjectionGenerationLogEntry,
};
use studyplan_core::ports::{
    CalendarProjectionPersistencePort, CalendarProjectionReadPort, DailyPlanPersistencePort,
    DailyPlanReadPort, ExecutionPersistencePort, PlanningContextPort,
};

use crate::queries::{cycle_cursors, daily_plans, executed_days, generation_logs, projections};

/// PostgreSQL adapter for the persistence and read ports.
///
/// Declares cycle-cursor storage, so CICLO profiles can be planned through
/// it. Plan and cursor are written in one transaction, as are the
/// executed-day record and the status flip of the stored plan.
#[derive(Debug, Clone)]
pub struct PgPlanStore {
    pool: PgPool,
}

impl PgPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Overlay the facts this store owns onto a context from another
    /// provider: the execution flag and the stored CICLO cursor.
    ///
    /// The execution flag is only ever raised, never cleared.
    pub async fn overlay_context(&self, ctx: &mut PlanningContext) -> Result<()> {
        if executed_days::executed_day_exists(&self.pool, ctx.user_id, &ctx.date).await? {
            ctx.has_execution = true;
        }
        if let Some(cursor) = cycle_cursors::get_cycle_cursor(&self.pool, ctx.user_id).await? {
            ctx.cycle = Some(CycleState { cursor });
        }
        Ok(())
    }

    pub async fn get_executed_day(
        &self,
        user_id: Uuid,
        date: &str,
    ) -> Result<Option<ExecutedDayEntry>> {
        executed_days::get_executed_day(&self.pool, user_id, date)
            .await?
            .map(|row| row.into_entry())
            .transpose()
    }

    pub async fn list_generation_logs(
        &self,
        user_id: Uuid,
        date: &str,
    ) -> Result<Vec<GenerationLogEntry>> {
        let rows = generation_logs::list_generation_logs(&self.pool, user_id, date).await?;
        Ok(rows.into_iter().map(|row| row.into_entry()).collect())
    }
}

#[async_trait]
impl DailyPlanPersistencePort for PgPlanStore {
    async fn upsert_daily_plan(&self, user_id: Uuid, plan: &DailyPlan) -> Result<()> {
        daily_plans::upsert_daily_plan(&self.pool, user_id, plan).await?;
        Ok(())
    }

    async fn append_generation_log(&self, entry: &GenerationLogEntry) -> Result<()> {
        let row = generation_logs::insert_generation_log(&self.pool, entry).await?;
        debug!(log_id = %row.id, date = %entry.date, "generation log appended");
        Ok(())
    }

    async fn update_cycle_cursor(&self, user_id: Uuid, next_cursor: u32) -> Result<()> {
        cycle_cursors::upsert_cycle_cursor(&self.pool, user_id, next_cursor).await
    }

    fn supports_cycle_cursor(&self) -> bool {
        true
    }

    async fn save_plan(
        &self,
        user_id: Uuid,
        plan: &DailyPlan,
        next_cursor: Option<u32>,
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        daily_plans::upsert_daily_plan(&mut *tx, user_id, plan).await?;
        if let Some(cursor) = next_cursor {
            cycle_cursors::upsert_cycle_cursor(&mut *tx, user_id, cursor).await?;
        }

        tx.commit().await.context("failed to commit daily plan")?;
        Ok(())
    }
}

#[async_trait]
impl DailyPlanReadPort for PgPlanStore {
    async fn get_daily_plan(&self, user_id: Uuid, date: &str) -> Result<Option<DailyPlan>> {
        daily_plans::get_daily_plan(&self.pool, user_id, date)
            .await?
            .map(|row| row.into_plan())
            .transpose()
    }
}

#[async_trait]
impl ExecutionPersistencePort for PgPlanStore {
    async fn insert_executed_day(&self, entry: &ExecutedDayEntry) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        if let Err(err) = executed_days::insert_executed_day(&mut *tx, entry).await {
            let duplicate = err
                .downcast_ref::<sqlx::Error>()
                .and_then(|e| e.as_database_error())
                .is_some_and(|e| e.is_unique_violation());
            if duplicate {
                anyhow::bail!(
                    "{} already has an executed record for user {}",
                    entry.date,
                    entry.user_id
                );
            }
            return Err(err);
        }
        let had_plan = daily_plans::mark_executed(&mut *tx, entry.user_id, &entry.date).await?;

        tx.commit().await.context("failed to commit executed day")?;

        info!(
            user_id = %entry.user_id,
            date = %entry.date,
            had_plan,
            "executed day recorded"
        );
        Ok(())
    }
}

#[async_trait]
impl CalendarProjectionPersistencePort for PgPlanStore {
    async fn create_projection_generation_log(
        &self,
        entry: &ProjectionGenerationLogEntry,
    ) -> Result<Uuid> {
        let row = projections::insert_projection_log(&self.pool, entry).await?;
        Ok(row.id)
    }

    async fn upsert_calendar_projection(
        &self,
        user_id: Uuid,
        projection: &CalendarProjection,
    ) -> Result<()> {
        projections::upsert_calendar_projection(&self.pool, user_id, projection).await?;
        Ok(())
    }
}

#[async_trait]
impl CalendarProjectionReadPort for PgPlanStore {
    async fn get_calendar_projection(
        &self,
        user_id: Uuid,
        range_start: &str,
        range_end: &str,
    ) -> Result<Option<CalendarProjection>> {
        let row =
            projections::get_calendar_projection(&self.pool, user_id, range_start, range_end)
                .await?;
        Ok(row.map(|r| r.into_projection()))
    }
}

// ---------------------------------------------------------------------------
// Context overlay
// ---------------------------------------------------------------------------

/// A [`PlanningContextPort`] that takes contexts from another provider and
/// overlays the facts held by a [`PgPlanStore`].
pub struct StoredFactsContext<'a> {
    inner: &'a dyn PlanningContextPort,
    store: &'a PgPlanStore,
}

impl<'a> StoredFactsContext<'a> {
    pub fn new(inner: &'a dyn PlanningContextPort, store: &'a PgPlanStore) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl PlanningContextPort for StoredFactsContext<'_> {
    async fn get_planning_context(&self, user_id: Uuid, date: &str) -> Result<PlanningContext> {
        let mut ctx = self.inner.get_planning_context(user_id, date).await?;
        self.store.overlay_context(&mut ctx).await?;
        Ok(ctx)
    }
}
