//! Calendar projections: a regenerable, non-authoritative cache of plans
//! over a bounded date range.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::compose::compose;
use crate::date;
use crate::error::{BlockReason, PlanningError};
use crate::hash::canonical_hash;
use crate::model::{
    CalendarProjection, DailyPlan, PlanningContext, ProjectionGenerationLogEntry, StudyMode,
};
use crate::ports::{
    CalendarProjectionPersistencePort, CalendarProjectionReadPort, PlanningContextPort,
};

use super::{load_context, now_iso};

/// Largest allowed distance between `range_start` and `range_end`, both
/// days included, so a projection covers at most 91 dates.
pub const MAX_PROJECTION_SPAN_DAYS: i64 = 90;

/// Result of a successful projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionOutcome {
    pub projection: CalendarProjection,
    pub input_hash: String,
    pub output_hash: String,
}

/// Parse and check a projection range.
pub(crate) fn validate_range(
    range_start: &str,
    range_end: &str,
) -> Result<(NaiveDate, NaiveDate), PlanningError> {
    let start = date::parse_iso_date(range_start, "rangeStart")?;
    let end = date::parse_iso_date(range_end, "rangeEnd")?;

    if start > end {
        return Err(PlanningError::invalid_input(
            "rangeEnd",
            format!("rangeEnd {range_end} is before rangeStart {range_start}"),
        ));
    }

    let span = (end - start).num_days();
    if span > MAX_PROJECTION_SPAN_DAYS {
        return Err(PlanningError::invalid_input(
            "rangeEnd",
            format!("projection spans {span} days, the maximum is {MAX_PROJECTION_SPAN_DAYS}"),
        ));
    }

    Ok((start, end))
}

// ---------------------------------------------------------------------------
// GenerateCalendarProjection
// ---------------------------------------------------------------------------

/// Composes every day of a range and caches the result.
///
/// Days are planned exactly as [`super::GenerateDailyPlan`] would plan them,
/// but nothing is written per day: no plan rows, no cursor, no execution
/// records. The first day that cannot be planned aborts the whole run.
pub struct GenerateCalendarProjection<'a> {
    context: &'a dyn PlanningContextPort,
    persistence: &'a dyn CalendarProjectionPersistencePort,
}

impl<'a> GenerateCalendarProjection<'a> {
    pub fn new(
        context: &'a dyn PlanningContextPort,
        persistence: &'a dyn CalendarProjectionPersistencePort,
    ) -> Self {
        Self {
            context,
            persistence,
        }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        range_start: &str,
        range_end: &str,
    ) -> Result<ProjectionOutcome, PlanningError> {
        let (start, end) = validate_range(range_start, range_end)?;

        let mut contexts: Vec<PlanningContext> = Vec::new();
        let mut days: Vec<DailyPlan> = Vec::new();

        for day in date::date_range_inclusive(start, end) {
            let day = date::format_iso_date(day);
            let ctx = load_context(self.context, user_id, &day).await?;

            if ctx.has_execution {
                warn!(user_id = %user_id, date = %day, "projection aborted: day already executed");
                return Err(PlanningError::blocked(day, BlockReason::DayAlreadyExecuted));
            }
            // Projections never persist a cursor.
            if ctx.profile.study_mode == StudyMode::Ciclo {
                warn!(user_id = %user_id, date = %day, "projection aborted: CICLO profile");
                return Err(PlanningError::blocked(
                    day,
                    BlockReason::CycleCursorStorageNotDefined,
                ));
            }

            days.push(compose(&ctx)?.plan);
            contexts.push(ctx);
        }

        let input_hash = canonical_hash(&contexts)?;
        let output_hash = canonical_hash(&days)?;
        // At most 91 days, always fits.
        let day_count = days.len() as u32;

        let log_entry = ProjectionGenerationLogEntry {
            user_id,
            range_start: range_start.to_owned(),
            range_end: range_end.to_owned(),
            generated_at_iso: now_iso(),
            day_count,
            input_hash: input_hash.clone(),
            output_hash: output_hash.clone(),
        };
        let generation_log_id = self
            .persistence
            .create_projection_generation_log(&log_entry)
            .await?;

        let projection = CalendarProjection {
            range_start: range_start.to_owned(),
            range_end: range_end.to_owned(),
            days,
            generation_log_id,
        };
        self.persistence
            .upsert_calendar_projection(user_id, &projection)
            .await?;

        info!(
            user_id = %user_id,
            range_start,
            range_end,
            day_count,
            generation_log_id = %generation_log_id,
            output_hash = %output_hash,
            "calendar projection generated"
        );

        Ok(ProjectionOutcome {
            projection,
            input_hash,
            output_hash,
        })
    }
}

// ---------------------------------------------------------------------------
// GetCalendarProjection
// ---------------------------------------------------------------------------

/// Pure read of a cached projection.
pub struct GetCalendarProjection<'a> {
    reads: &'a dyn CalendarProjectionReadPort,
}

impl<'a> GetCalendarProjection<'a> {
    pub fn new(reads: &'a dyn CalendarProjectionReadPort) -> Self {
        Self { reads }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        range_start: &str,
        range_end: &str,
    ) -> Result<Option<CalendarProjection>, PlanningError> {
        validate_range(range_start, range_end)?;
        Ok(self
            .reads
            .get_calendar_projection(user_id, range_start, range_end)
            .await?)
    }
}
