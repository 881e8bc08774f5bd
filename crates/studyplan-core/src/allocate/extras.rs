//! Extras layer: questions, informatives and statute reading ("lei seca").
//!
//! Each kind is allocated only when the weekday enables it, always with its
//! configured fixed duration.

use crate::error::{AllocationStage, PlanningError};
use crate::model::{DailyPlanItem, DailyPlanItemType, ExtrasDurations, WeekdayRule};

/// Output of [`allocate_extras`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrasAllocation {
    pub items: Vec<DailyPlanItem>,
    pub extras_minutes: u32,
    pub remaining_minutes: u32,
}

/// Allocate the enabled extras out of `remaining_minutes`.
///
/// Items come out in the fixed order QUESTIONS, INFORMATIVES, LEI_SECA.
pub fn allocate_extras(
    date: &str,
    rule: &WeekdayRule,
    durations: &ExtrasDurations,
    remaining_minutes: u32,
) -> Result<ExtrasAllocation, PlanningError> {
    let candidates = [
        (
            rule.questions_enabled,
            DailyPlanItemType::Questions,
            "Questões",
            durations.questions_minutes,
            "extrasDurations.questionsMinutes",
        ),
        (
            rule.informatives_enabled,
            DailyPlanItemType::Informatives,
            "Informativos",
            durations.informatives_minutes,
            "extrasDurations.informativesMinutes",
        ),
        (
            rule.lei_seca_enabled,
            DailyPlanItemType::LeiSeca,
            "Lei Seca",
            durations.lei_seca_minutes,
            "extrasDurations.leiSecaMinutes",
        ),
    ];

    let mut items = Vec::new();
    let mut extras_minutes = 0u32;

    for (enabled, item_type, title, minutes, field) in candidates {
        if !enabled {
            continue;
        }
        if minutes < 1 {
            return Err(PlanningError::invalid_input(
                field,
                format!(
                    "{item_type} is enabled for weekday {} but its duration is {minutes}",
                    rule.weekday
                ),
            ));
        }
        extras_minutes = extras_minutes.saturating_add(minutes);
        items.push(DailyPlanItem {
            item_type,
            title: title.to_owned(),
            minutes,
            metadata: None,
        });
    }

    if extras_minutes > remaining_minutes {
        return Err(PlanningError::insufficient_time(
            date,
            AllocationStage::Extras,
            extras_minutes,
            remaining_minutes,
        ));
    }

    Ok(ExtrasAllocation {
        items,
        extras_minutes,
        remaining_minutes: remaining_minutes - extras_minutes,
    })
}
