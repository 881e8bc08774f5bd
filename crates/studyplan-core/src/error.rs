//! The engine's error taxonomy.
//!
//! Every variant carries machine-readable fields. Errors are raised at the
//! point of detection and propagate unchanged; nothing inside the engine
//! catches or retries.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date::DateError;
use crate::hash::HashError;

/// Why a date was classified as a rest day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestDayReason {
    /// The weekday has no budget (or no rule at all).
    WeeklySchedule,
    /// The date falls inside a configured rest period.
    RestPeriod,
}

impl fmt::Display for RestDayReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::WeeklySchedule => "WEEKLY_SCHEDULE",
            Self::RestPeriod => "REST_PERIOD",
        };
        f.write_str(s)
    }
}

/// Normative reasons a use-case refuses to plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    DayAlreadyExecuted,
    CycleCursorStorageNotDefined,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DayAlreadyExecuted => "day_already_executed",
            Self::CycleCursorStorageNotDefined => "cycle_cursor_storage_not_defined",
        };
        f.write_str(s)
    }
}

/// Allocation layer that ran out of minutes.
///
/// Theory never overflows: it consumes whatever is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStage {
    Reviews,
    Extras,
}

impl fmt::Display for AllocationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Reviews => "REVIEWS",
            Self::Extras => "EXTRAS",
        };
        f.write_str(s)
    }
}

/// Errors produced by composition and by the use-cases.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("{date} is a rest day ({reason})")]
    RestDay { date: String, reason: RestDayReason },

    #[error("planning blocked for {date}: {reason}")]
    PlanningBlocked { date: String, reason: BlockReason },

    #[error("{date} has already been executed; its plan is immutable")]
    ExecutionAlreadyExists { date: String },

    #[error(
        "insufficient time on {date} at stage {stage}: required {required_minutes} min, \
         available {available_minutes} min, missing {missing_minutes} min"
    )]
    InsufficientTime {
        date: String,
        stage: AllocationStage,
        required_minutes: u32,
        available_minutes: u32,
        missing_minutes: u32,
    },

    #[error("invalid input for {field}: {message}")]
    InvalidInput { message: String, field: String },

    /// A port failed. The underlying error is passed through untouched.
    #[error(transparent)]
    Port(#[from] anyhow::Error),
}

impl PlanningError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: field.into(),
        }
    }

    pub fn blocked(date: impl Into<String>, reason: BlockReason) -> Self {
        Self::PlanningBlocked {
            date: date.into(),
            reason,
        }
    }

    pub(crate) fn insufficient_time(
        date: &str,
        stage: AllocationStage,
        required_minutes: u32,
        available_minutes: u32,
    ) -> Self {
        Self::InsufficientTime {
            date: date.to_owned(),
            stage,
            required_minutes,
            available_minutes,
            missing_minutes: required_minutes.saturating_sub(available_minutes),
        }
    }
}

impl From<DateError> for PlanningError {
    fn from(err: DateError) -> Self {
        let field = match &err {
            DateError::Malformed { field, .. } | DateError::NotACalendarDay { field, .. } => {
                field.clone()
            }
        };
        Self::InvalidInput {
            message: err.to_string(),
            field,
        }
    }
}

impl From<HashError> for PlanningError {
    fn from(err: HashError) -> Self {
        Self::InvalidInput {
            message: err.to_string(),
            field: "canonicalHash".to_owned(),
        }
    }
}
