//! Port traits: the engine's only contact with the outside world.
//!
//! Every trait is object-safe so use-cases can hold `&dyn Port` references,
//! and every method returns `anyhow::Result` so adapter failures reach the
//! caller untouched.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{
    CalendarProjection, DailyPlan, ExecutedDayEntry, GenerationLogEntry, PlanningContext,
    ProjectionGenerationLogEntry,
};

/// Supplies the normalized facts for one `(user, date)`.
#[async_trait]
pub trait PlanningContextPort: Send + Sync {
    async fn get_planning_context(&self, user_id: Uuid, date: &str) -> Result<PlanningContext>;
}

/// Writes plans, the generation log, and the CICLO cursor.
#[async_trait]
pub trait DailyPlanPersistencePort: Send + Sync {
    /// Insert or wholly replace the plan stored for `plan.date`.
    async fn upsert_daily_plan(&self, user_id: Uuid, plan: &DailyPlan) -> Result<()>;

    /// Append one immutable audit entry.
    async fn append_generation_log(&self, entry: &GenerationLogEntry) -> Result<()>;

    async fn update_cycle_cursor(&self, user_id: Uuid, next_cursor: u32) -> Result<()>;

    /// Whether this adapter can store the CICLO rotation cursor.
    ///
    /// Only consulted by use-cases that opted in to cycle rotation; CICLO
    /// profiles are refused otherwise.
    fn supports_cycle_cursor(&self) -> bool {
        false
    }

    /// Store a plan and, when present, the cursor that goes with it.
    ///
    /// The default performs two independent writes. Adapters that can
    /// should override it to make both writes atomic.
    async fn save_plan(
        &self,
        user_id: Uuid,
        plan: &DailyPlan,
        next_cursor: Option<u32>,
    ) -> Result<()> {
        self.upsert_daily_plan(user_id, plan).await?;
        if let Some(cursor) = next_cursor {
            self.update_cycle_cursor(user_id, cursor).await?;
        }
        Ok(())
    }
}

/// Reads materialized plans.
#[async_trait]
pub trait DailyPlanReadPort: Send + Sync {
    async fn get_daily_plan(&self, user_id: Uuid, date: &str) -> Result<Option<DailyPlan>>;
}

/// Records executed days.
#[async_trait]
pub trait ExecutionPersistencePort: Send + Sync {
    /// Insert the execution record. Must fail if one already exists for
    /// the same `(user, date)`.
    async fn insert_executed_day(&self, entry: &ExecutedDayEntry) -> Result<()>;
}

/// Writes calendar projections and their audit log.
#[async_trait]
pub trait CalendarProjectionPersistencePort: Send + Sync {
    /// Append a projection audit entry and return its id.
    async fn create_projection_generation_log(
        &self,
        entry: &ProjectionGenerationLogEntry,
    ) -> Result<Uuid>;

    async fn upsert_calendar_projection(
        &self,
        user_id: Uuid,
        projection: &CalendarProjection,
    ) -> Result<()>;
}

/// Reads cached calendar projections.
#[async_trait]
pub trait CalendarProjectionReadPort: Send + Sync {
    async fn get_calendar_projection(
        &self,
        user_id: Uuid,
        range_start: &str,
        range_end: &str,
    ) -> Result<Option<CalendarProjection>>;
}

// Compile-time assertion: every port can be used as a trait object.
const _: () = {
    fn _assert_object_safe(
        _: &dyn PlanningContextPort,
        _: &dyn DailyPlanPersistencePort,
        _: &dyn DailyPlanReadPort,
        _: &dyn ExecutionPersistencePort,
        _: &dyn CalendarProjectionPersistencePort,
        _: &dyn CalendarProjectionReadPort,
    ) {
    }
};
