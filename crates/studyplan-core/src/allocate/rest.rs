//! Rest-day classification. Takes precedence over every other layer.

use crate::date;
use crate::error::{PlanningError, RestDayReason};
use crate::model::ProfileRules;

/// Outcome of [`evaluate_rest_day`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestDayEvaluation {
    pub is_rest_day: bool,
    pub reason: Option<RestDayReason>,
}

impl RestDayEvaluation {
    fn rest(reason: RestDayReason) -> Self {
        Self {
            is_rest_day: true,
            reason: Some(reason),
        }
    }

    fn working() -> Self {
        Self {
            is_rest_day: false,
            reason: None,
        }
    }
}

/// Decide whether `date` is a rest day under `profile`.
///
/// Checked in order: missing weekday rule, zero-minute weekday, explicit
/// rest period. A missing rule is reported as [`RestDayReason::WeeklySchedule`].
/// Duplicate or out-of-range weekday rules are invalid input, never a rest day.
pub fn evaluate_rest_day(
    date: &str,
    profile: &ProfileRules,
) -> Result<RestDayEvaluation, PlanningError> {
    let weekday = date::weekday_from_iso_date(date)?;
    profile.check_weekday_rules()?;

    let Some(rule) = profile.weekday_rule(weekday) else {
        return Ok(RestDayEvaluation::rest(RestDayReason::WeeklySchedule));
    };

    if rule.daily_minutes == 0 {
        return Ok(RestDayEvaluation::rest(RestDayReason::WeeklySchedule));
    }

    let in_rest_period = profile
        .rest_periods
        .iter()
        .any(|p| date::is_date_in_range_inclusive(date, &p.start_date, &p.end_date));
    if in_rest_period {
        return Ok(RestDayEvaluation::rest(RestDayReason::RestPeriod));
    }

    Ok(RestDayEvaluation::working())
}
