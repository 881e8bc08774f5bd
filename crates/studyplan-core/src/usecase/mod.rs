//! Use-cases: one struct per public operation.
//!
//! Each use-case fetches a fresh context, applies the normative gates,
//! composes, persists, and appends to the audit log. Per `(user, date)` the
//! states are:
//!
//! ```text
//! no-plan -> planned   (generate / regenerate)
//! planned -> planned   (regenerate)
//! no-plan -> executed  (execute)
//! planned -> executed  (execute)
//! ```
//!
//! `executed` is terminal.

pub mod calendar;
pub mod daily;
pub mod execute;

pub use calendar::{
    GenerateCalendarProjection, GetCalendarProjection, MAX_PROJECTION_SPAN_DAYS,
    ProjectionOutcome,
};
pub use daily::{
    DEFAULT_GENERATION_REASON, GenerateDailyPlan, GenerationOutcome, GetDailyPlan,
    REGENERATE_REASON, RegenerateDailyPlan,
};
pub use execute::{ExecuteDay, ExecuteDayRequest, parse_result_status};

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::date;
use crate::error::PlanningError;
use crate::model::PlanningContext;
use crate::ports::PlanningContextPort;

/// Fetch the context for `(user_id, day)` and check that the provider
/// echoed back the same identity.
pub(crate) async fn load_context(
    port: &dyn PlanningContextPort,
    user_id: Uuid,
    day: &str,
) -> Result<PlanningContext, PlanningError> {
    date::assert_iso_date(day, "date")?;

    let ctx = port.get_planning_context(user_id, day).await?;

    if ctx.user_id != user_id {
        return Err(PlanningError::invalid_input(
            "userId",
            format!(
                "planning context belongs to user {}, requested {user_id}",
                ctx.user_id
            ),
        ));
    }
    if ctx.date != day {
        return Err(PlanningError::invalid_input(
            "date",
            format!("planning context is for {}, requested {day}", ctx.date),
        ));
    }

    Ok(ctx)
}

/// Audit timestamp. The only wall-clock read in the engine.
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
