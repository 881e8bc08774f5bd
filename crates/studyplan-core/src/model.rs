//! Data model shared by the engine, its ports, and every adapter.
//!
//! All structs serialize as camelCase JSON and enums as their
//! SCREAMING_SNAKE_CASE names, which is also the form that gets hashed into
//! the generation log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::date;
use crate::error::PlanningError;

/// Upper bound for any per-day minute quantity.
pub const MAX_DAILY_MINUTES: u32 = 1440;

/// Accepted range for `subjectsPerDayLimit`.
pub const SUBJECTS_PER_DAY_RANGE: std::ops::RangeInclusive<u32> = 1..=9;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Theory-subject selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyMode {
    /// First N active subjects in priority order.
    Fixo,
    /// Rotating window driven by a persisted cursor.
    Ciclo,
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fixo => "FIXO",
            Self::Ciclo => "CICLO",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------

/// Lifecycle status of a daily plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Planned,
    Executed,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Planned => "PLANNED",
            Self::Executed => "EXECUTED",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(Self::Planned),
            "EXECUTED" => Ok(Self::Executed),
            other => Err(UnknownVariant::new("plan status", other)),
        }
    }
}

// ---------------------------------------------------------------------------

/// Kind of a plan item. Also fixes the presentation order of extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DailyPlanItemType {
    Theory,
    Questions,
    Informatives,
    LeiSeca,
    Review,
}

impl fmt::Display for DailyPlanItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Theory => "THEORY",
            Self::Questions => "QUESTIONS",
            Self::Informatives => "INFORMATIVES",
            Self::LeiSeca => "LEI_SECA",
            Self::Review => "REVIEW",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------

/// Factual outcome reported when a day is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionResultStatus {
    Completed,
    Partial,
    NotCompleted,
    RestDay,
}

impl fmt::Display for ExecutionResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Completed => "COMPLETED",
            Self::Partial => "PARTIAL",
            Self::NotCompleted => "NOT_COMPLETED",
            Self::RestDay => "REST_DAY",
        };
        f.write_str(s)
    }
}

impl FromStr for ExecutionResultStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLETED" => Ok(Self::Completed),
            "PARTIAL" => Ok(Self::Partial),
            "NOT_COMPLETED" => Ok(Self::NotCompleted),
            "REST_DAY" => Ok(Self::RestDay),
            other => Err(UnknownVariant::new("result status", other)),
        }
    }
}

/// Error returned when parsing a string into one of the model enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Per-weekday budget and layer switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayRule {
    /// ISO weekday, 1 (Monday) through 7 (Sunday).
    pub weekday: u8,
    pub daily_minutes: u32,
    pub theory_enabled: bool,
    pub questions_enabled: bool,
    pub informatives_enabled: bool,
    pub lei_seca_enabled: bool,
}

impl WeekdayRule {
    /// The all-zero, all-disabled rule used when a profile has no entry for
    /// a weekday.
    pub fn disabled(weekday: u8) -> Self {
        Self {
            weekday,
            daily_minutes: 0,
            theory_enabled: false,
            questions_enabled: false,
            informatives_enabled: false,
            lei_seca_enabled: false,
        }
    }
}

/// Fixed durations for the "extras" layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasDurations {
    pub questions_minutes: u32,
    pub informatives_minutes: u32,
    pub lei_seca_minutes: u32,
}

/// Policy the review provider used to schedule review tasks.
///
/// The engine never reads it; it only travels with the profile so that it
/// is covered by the input hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoReviewPolicy {
    pub enabled: bool,
    #[serde(default)]
    pub intervals_days: Vec<u32>,
    #[serde(default)]
    pub review_minutes: u32,
}

/// Inclusive date range during which no plan is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestPeriod {
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Normative configuration of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRules {
    pub subjects_per_day_limit: u32,
    pub study_mode: StudyMode,
    pub weekday_rules: Vec<WeekdayRule>,
    pub extras_durations: ExtrasDurations,
    pub auto_review_policy: AutoReviewPolicy,
    #[serde(default)]
    pub rest_periods: Vec<RestPeriod>,
}

impl ProfileRules {
    /// The rule for `weekday`, if the profile defines one.
    pub fn weekday_rule(&self, weekday: u8) -> Option<&WeekdayRule> {
        self.weekday_rules.iter().find(|r| r.weekday == weekday)
    }

    /// Structural validation of the profile.
    ///
    /// A weekday without a rule is tolerated: the composer treats it as a
    /// rest day.
    /// Reject out-of-range weekdays and duplicate rules. Runs before any
    /// weekday lookup, since a duplicate would make the lookup ambiguous.
    pub fn check_weekday_rules(&self) -> Result<(), PlanningError> {
        let mut seen = [false; 8];
        for rule in &self.weekday_rules {
            if !(1..=7).contains(&rule.weekday) {
                return Err(PlanningError::invalid_input(
                    "weekdayRules.weekday",
                    format!("weekday must be between 1 and 7, got {}", rule.weekday),
                ));
            }
            let slot = &mut seen[usize::from(rule.weekday)];
            if *slot {
                return Err(PlanningError::invalid_input(
                    "weekdayRules.weekday",
                    format!("duplicate rule for weekday {}", rule.weekday),
                ));
            }
            *slot = true;

            if rule.daily_minutes > MAX_DAILY_MINUTES {
                return Err(PlanningError::invalid_input(
                    "weekdayRules.dailyMinutes",
                    format!(
                        "dailyMinutes for weekday {} must be at most {MAX_DAILY_MINUTES}, got {}",
                        rule.weekday, rule.daily_minutes
                    ),
                ));
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        if !SUBJECTS_PER_DAY_RANGE.contains(&self.subjects_per_day_limit) {
            return Err(PlanningError::invalid_input(
                "subjectsPerDayLimit",
                format!(
                    "subjectsPerDayLimit must be between 1 and 9, got {}",
                    self.subjects_per_day_limit
                ),
            ));
        }

        self.check_weekday_rules()?;

        for period in &self.rest_periods {
            date::assert_iso_date(&period.start_date, "restPeriods.startDate")?;
            date::assert_iso_date(&period.end_date, "restPeriods.endDate")?;
            if period.start_date > period.end_date {
                return Err(PlanningError::invalid_input(
                    "restPeriods",
                    format!(
                        "rest period starts after it ends: {} > {}",
                        period.start_date, period.end_date
                    ),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Planning inputs
// ---------------------------------------------------------------------------

/// A theory subject. Providers deliver them already sorted by priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTheory {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}

/// A review due on the queried date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewTask {
    pub id: String,
    pub source_date: String,
    pub subject_id: String,
    pub subject_name: String,
    pub scheduled_date: String,
    pub review_minutes: u32,
}

/// Persisted CICLO rotation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleState {
    pub cursor: u32,
}

/// Everything the engine needs to plan one `(user, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningContext {
    pub user_id: Uuid,
    pub date: String,
    pub profile: ProfileRules,
    #[serde(default)]
    pub subjects: Vec<SubjectTheory>,
    #[serde(default)]
    pub review_tasks: Vec<ReviewTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<CycleState>,
    pub has_execution: bool,
}

// ---------------------------------------------------------------------------
// Planning outputs
// ---------------------------------------------------------------------------

/// One line of a daily plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlanItem {
    #[serde(rename = "type")]
    pub item_type: DailyPlanItemType,
    pub title: String,
    pub minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Remaining minutes after each allocation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTrace {
    pub remaining_after_reviews: u32,
    pub remaining_after_extras: u32,
    pub remaining_after_theory: u32,
}

/// The plan for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub date: String,
    pub status: PlanStatus,
    pub daily_minutes: u32,
    pub review_minutes: u32,
    pub extras_minutes: u32,
    pub theory_minutes: u32,
    pub items: Vec<DailyPlanItem>,
    pub trace: PlanTrace,
}

// ---------------------------------------------------------------------------
// Audit and execution records
// ---------------------------------------------------------------------------

/// Append-only record of one successful (re)generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationLogEntry {
    pub user_id: Uuid,
    pub date: String,
    pub generated_at_iso: String,
    pub reason: String,
    pub input_hash: String,
    pub output_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Immutable factual record of an executed day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedDayEntry {
    pub user_id: Uuid,
    pub date: String,
    pub result_status: ExecutionResultStatus,
    pub total_executed_minutes: u32,
    pub factual_summary: Value,
    pub executed_at_iso: String,
}

/// Audit record of one calendar projection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionGenerationLogEntry {
    pub user_id: Uuid,
    pub range_start: String,
    pub range_end: String,
    pub generated_at_iso: String,
    pub day_count: u32,
    pub input_hash: String,
    pub output_hash: String,
}

/// Regenerable cache of plans over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarProjection {
    pub range_start: String,
    pub range_end: String,
    pub days: Vec<DailyPlan>,
    pub generation_log_id: Uuid,
}
