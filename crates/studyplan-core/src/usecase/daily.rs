//! Daily plan use-cases: generate, regenerate, read.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::compose::compose;
use crate::date;
use crate::error::{BlockReason, PlanningError};
use crate::hash::canonical_hash;
use crate::model::{DailyPlan, GenerationLogEntry, StudyMode};
use crate::ports::{DailyPlanPersistencePort, DailyPlanReadPort, PlanningContextPort};

use super::{load_context, now_iso};

/// Log reason recorded by [`GenerateDailyPlan::execute`].
pub const DEFAULT_GENERATION_REASON: &str = "generate";

/// Log reason recorded by [`RegenerateDailyPlan`].
pub const REGENERATE_REASON: &str = "manual_regenerate";

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub plan: DailyPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cycle_cursor: Option<u32>,
    pub input_hash: String,
    pub output_hash: String,
}

// ---------------------------------------------------------------------------
// GenerateDailyPlan
// ---------------------------------------------------------------------------

/// Builds, stores, and audits the plan for one day.
///
/// CICLO profiles are refused with `cycle_cursor_storage_not_defined`
/// unless cycle rotation was enabled with [`Self::with_cycle_rotation`]
/// and the persistence port stores cursors.
pub struct GenerateDailyPlan<'a> {
    context: &'a dyn PlanningContextPort,
    persistence: &'a dyn DailyPlanPersistencePort,
    cycle_rotation: bool,
}

impl<'a> GenerateDailyPlan<'a> {
    pub fn new(
        context: &'a dyn PlanningContextPort,
        persistence: &'a dyn DailyPlanPersistencePort,
    ) -> Self {
        Self {
            context,
            persistence,
            cycle_rotation: false,
        }
    }

    /// Opt in to planning CICLO profiles and persisting the advanced
    /// cursor. Has no effect on a port without cursor storage.
    pub fn with_cycle_rotation(mut self) -> Self {
        self.cycle_rotation = true;
        self
    }

    fn cycle_cursor_available(&self) -> bool {
        self.cycle_rotation && self.persistence.supports_cycle_cursor()
    }

    /// Generate with the default log reason.
    pub async fn execute(
        &self,
        user_id: Uuid,
        date: &str,
    ) -> Result<GenerationOutcome, PlanningError> {
        self.execute_with_reason(user_id, date, DEFAULT_GENERATION_REASON, None)
            .await
    }

    /// Generate, recording `reason` and optional `notes` in the log entry.
    ///
    /// Steps:
    /// 1. Load the context and check it matches the request.
    /// 2. Refuse executed days and, unless cycle rotation is enabled and
    ///    stored, CICLO profiles.
    ///    Nothing is written when a gate refuses.
    /// 3. Compose the plan.
    /// 4. Store the plan together with any advanced cursor.
    /// 5. Append the hash-based generation log entry.
    pub async fn execute_with_reason(
        &self,
        user_id: Uuid,
        date: &str,
        reason: &str,
        notes: Option<String>,
    ) -> Result<GenerationOutcome, PlanningError> {
        let ctx = load_context(self.context, user_id, date).await?;

        if ctx.has_execution {
            warn!(user_id = %user_id, date, "generation refused: day already executed");
            return Err(PlanningError::blocked(date, BlockReason::DayAlreadyExecuted));
        }
        if ctx.profile.study_mode == StudyMode::Ciclo && !self.cycle_cursor_available() {
            warn!(user_id = %user_id, date, "generation refused: no cycle cursor storage");
            return Err(PlanningError::blocked(
                date,
                BlockReason::CycleCursorStorageNotDefined,
            ));
        }

        let composed = compose(&ctx)?;
        let input_hash = canonical_hash(&ctx)?;
        let output_hash = canonical_hash(&composed.plan)?;

        self.persistence
            .save_plan(user_id, &composed.plan, composed.next_cycle_cursor)
            .await?;

        let entry = GenerationLogEntry {
            user_id,
            date: date.to_owned(),
            generated_at_iso: now_iso(),
            reason: reason.to_owned(),
            input_hash: input_hash.clone(),
            output_hash: output_hash.clone(),
            notes,
        };
        self.persistence.append_generation_log(&entry).await?;

        info!(
            user_id = %user_id,
            date,
            reason,
            input_hash = %input_hash,
            output_hash = %output_hash,
            items = composed.plan.items.len(),
            "daily plan generated"
        );

        Ok(GenerationOutcome {
            plan: composed.plan,
            next_cycle_cursor: composed.next_cycle_cursor,
            input_hash,
            output_hash,
        })
    }
}

// ---------------------------------------------------------------------------
// RegenerateDailyPlan
// ---------------------------------------------------------------------------

/// Manual regeneration: same gates and flow, fixed log reason.
pub struct RegenerateDailyPlan<'a> {
    inner: GenerateDailyPlan<'a>,
}

impl<'a> RegenerateDailyPlan<'a> {
    pub fn new(
        context: &'a dyn PlanningContextPort,
        persistence: &'a dyn DailyPlanPersistencePort,
    ) -> Self {
        Self {
            inner: GenerateDailyPlan::new(context, persistence),
        }
    }

    /// See [`GenerateDailyPlan::with_cycle_rotation`].
    pub fn with_cycle_rotation(self) -> Self {
        Self {
            inner: self.inner.with_cycle_rotation(),
        }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        date: &str,
        notes: Option<String>,
    ) -> Result<GenerationOutcome, PlanningError> {
        self.inner
            .execute_with_reason(user_id, date, REGENERATE_REASON, notes)
            .await
    }
}

// ---------------------------------------------------------------------------
// GetDailyPlan
// ---------------------------------------------------------------------------

/// Pure read of a materialized plan. Never composes on the fly.
pub struct GetDailyPlan<'a> {
    reads: &'a dyn DailyPlanReadPort,
}

impl<'a> GetDailyPlan<'a> {
    pub fn new(reads: &'a dyn DailyPlanReadPort) -> Self {
        Self { reads }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        day: &str,
    ) -> Result<Option<DailyPlan>, PlanningError> {
        date::assert_iso_date(day, "date")?;
        Ok(self.reads.get_daily_plan(user_id, day).await?)
    }
}
