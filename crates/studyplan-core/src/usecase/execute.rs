//! ExecuteDay: the only transition into the terminal `executed` state.

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{BlockReason, PlanningError};
use crate::model::{ExecutedDayEntry, ExecutionResultStatus, MAX_DAILY_MINUTES, UnknownVariant};
use crate::ports::{ExecutionPersistencePort, PlanningContextPort};

use super::{load_context, now_iso};

/// Factual outcome of a day as reported by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteDayRequest {
    pub user_id: Uuid,
    pub date: String,
    pub result_status: ExecutionResultStatus,
    pub total_executed_minutes: u32,
    pub factual_summary: Value,
}

/// Parse a wire-format result status, reporting failures as `InvalidInput`.
pub fn parse_result_status(value: &str) -> Result<ExecutionResultStatus, PlanningError> {
    value
        .parse()
        .map_err(|e: UnknownVariant| PlanningError::invalid_input("resultStatus", e.to_string()))
}

/// Records an executed day.
pub struct ExecuteDay<'a> {
    context: &'a dyn PlanningContextPort,
    persistence: &'a dyn ExecutionPersistencePort,
}

impl<'a> ExecuteDay<'a> {
    pub fn new(
        context: &'a dyn PlanningContextPort,
        persistence: &'a dyn ExecutionPersistencePort,
    ) -> Self {
        Self {
            context,
            persistence,
        }
    }

    /// Validate the report, refuse already-executed days, and insert the
    /// immutable execution record.
    ///
    /// The context is read only for `has_execution`; the stored plan is not
    /// consulted.
    pub async fn execute(
        &self,
        request: ExecuteDayRequest,
    ) -> Result<ExecutedDayEntry, PlanningError> {
        if request.total_executed_minutes > MAX_DAILY_MINUTES {
            return Err(PlanningError::invalid_input(
                "totalExecutedMinutes",
                format!(
                    "totalExecutedMinutes must be between 0 and {MAX_DAILY_MINUTES}, got {}",
                    request.total_executed_minutes
                ),
            ));
        }

        let ctx = load_context(self.context, request.user_id, &request.date).await?;
        if ctx.has_execution {
            warn!(
                user_id = %request.user_id,
                date = %request.date,
                "execution refused: day already executed"
            );
            return Err(PlanningError::blocked(
                request.date,
                BlockReason::DayAlreadyExecuted,
            ));
        }

        let entry = ExecutedDayEntry {
            user_id: request.user_id,
            date: request.date,
            result_status: request.result_status,
            total_executed_minutes: request.total_executed_minutes,
            factual_summary: request.factual_summary,
            executed_at_iso: now_iso(),
        };
        self.persistence.insert_executed_day(&entry).await?;

        info!(
            user_id = %entry.user_id,
            date = %entry.date,
            result_status = %entry.result_status,
            minutes = entry.total_executed_minutes,
            "day executed"
        );

        Ok(entry)
    }
}
