//! Row types for the study-plan tables and their conversion into the
//! engine's model.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use studyplan_core::date;
use studyplan_core::model::{
    CalendarProjection, DailyPlan, DailyPlanItem, ExecutedDayEntry, ExecutionResultStatus,
    GenerationLogEntry, PlanStatus, PlanTrace,
};

// ---------------------------------------------------------------------------
// Conversions shared by the queries
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` string for binding to a `DATE` column.
pub fn to_sql_date(value: &str, field: &str) -> Result<NaiveDate> {
    Ok(date::parse_iso_date(value, field)?)
}

/// Parse an RFC 3339 timestamp for binding to a `TIMESTAMPTZ` column.
pub fn to_sql_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("{field} is not an RFC 3339 timestamp: {value:?}"))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Bind a minute quantity to an `INTEGER` column.
pub fn to_sql_minutes(value: u32, field: &str) -> Result<i32> {
    i32::try_from(value).with_context(|| format!("{field} out of range: {value}"))
}

pub(crate) fn from_sql_minutes(value: i32, field: &str) -> Result<u32> {
    u32::try_from(value).with_context(|| format!("{field} is negative: {value}"))
}

pub(crate) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyPlanRow {
    pub user_id: Uuid,
    pub plan_date: NaiveDate,
    pub status: String,
    pub daily_minutes: i32,
    pub review_minutes: i32,
    pub extras_minutes: i32,
    pub theory_minutes: i32,
    pub items: Json<Vec<DailyPlanItem>>,
    pub trace: Json<PlanTrace>,
    pub updated_at: DateTime<Utc>,
}

impl DailyPlanRow {
    pub fn into_plan(self) -> Result<DailyPlan> {
        let status: PlanStatus = self
            .status
            .parse()
            .with_context(|| format!("stored plan for {} has a bad status", self.plan_date))?;
        Ok(DailyPlan {
            date: date::format_iso_date(self.plan_date),
            status,
            daily_minutes: from_sql_minutes(self.daily_minutes, "daily_minutes")?,
            review_minutes: from_sql_minutes(self.review_minutes, "review_minutes")?,
            extras_minutes: from_sql_minutes(self.extras_minutes, "extras_minutes")?,
            theory_minutes: from_sql_minutes(self.theory_minutes, "theory_minutes")?,
            items: self.items.0,
            trace: self.trace.0,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenerationLogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub reason: String,
    pub input_hash: String,
    pub output_hash: String,
    pub notes: Option<String>,
}

impl GenerationLogRow {
    pub fn into_entry(self) -> GenerationLogEntry {
        GenerationLogEntry {
            user_id: self.user_id,
            date: date::format_iso_date(self.plan_date),
            generated_at_iso: format_timestamp(self.generated_at),
            reason: self.reason,
            input_hash: self.input_hash,
            output_hash: self.output_hash,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CycleCursorRow {
    pub user_id: Uuid,
    pub cursor: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExecutedDayRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub executed_date: NaiveDate,
    pub result_status: String,
    pub total_executed_minutes: i32,
    pub factual_summary: Json<Value>,
    pub executed_at: DateTime<Utc>,
}

impl ExecutedDayRow {
    pub fn into_entry(self) -> Result<ExecutedDayEntry> {
        let result_status: ExecutionResultStatus = self.result_status.parse().with_context(|| {
            format!("executed day {} has a bad result status", self.executed_date)
        })?;
        Ok(ExecutedDayEntry {
            user_id: self.user_id,
            date: date::format_iso_date(self.executed_date),
            result_status,
            total_executed_minutes: from_sql_minutes(
                self.total_executed_minutes,
                "total_executed_minutes",
            )?,
            factual_summary: self.factual_summary.0,
            executed_at_iso: format_timestamp(self.executed_at),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectionLogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub day_count: i32,
    pub input_hash: String,
    pub output_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarProjectionRow {
    pub user_id: Uuid,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub days: Json<Vec<DailyPlan>>,
    pub generation_log_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

impl CalendarProjectionRow {
    pub fn into_projection(self) -> CalendarProjection {
        CalendarProjection {
            range_start: date::format_iso_date(self.range_start),
            range_end: date::format_iso_date(self.range_end),
            days: self.days.0,
            generation_log_id: self.generation_log_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_normalize_to_utc() {
        let ts = to_sql_timestamp("2024-03-18T10:00:00.250-03:00", "executedAtIso").unwrap();
        assert_eq!(format_timestamp(ts), "2024-03-18T13:00:00.250Z");
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        assert!(to_sql_timestamp("yesterday", "generatedAtIso").is_err());
    }

    #[test]
    fn dates_must_be_calendar_days() {
        assert!(to_sql_date("2024-02-30", "date").is_err());
        assert_eq!(
            to_sql_date("2024-02-29", "date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn plan_row_round_trips_status() {
        let row = DailyPlanRow {
            user_id: Uuid::nil(),
            plan_date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            status: "EXECUTED".into(),
            daily_minutes: 60,
            review_minutes: 0,
            extras_minutes: 0,
            theory_minutes: 60,
            items: Json(vec![]),
            trace: Json(PlanTrace {
                remaining_after_reviews: 60,
                remaining_after_extras: 60,
                remaining_after_theory: 0,
            }),
            updated_at: Utc::now(),
        };
        let plan = row.into_plan().unwrap();
        assert_eq!(plan.date, "2024-03-18");
        assert_eq!(plan.status, PlanStatus::Executed);
        assert_eq!(plan.theory_minutes, 60);
    }

    #[test]
    fn negative_minutes_are_rejected() {
        assert!(from_sql_minutes(-1, "daily_minutes").is_err());
    }
}
