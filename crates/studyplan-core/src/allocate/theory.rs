//! Theory layer: consumes every minute left after reviews and extras.
//!
//! Two selection modes share one distribution rule. FIXO takes the first
//! N active subjects in priority order; CICLO takes N consecutive subjects
//! starting at the persisted cursor, wrapping around the active list.

use serde_json::json;

use crate::model::{
    DailyPlanItem, DailyPlanItemType, MAX_DAILY_MINUTES, StudyMode, SubjectTheory, WeekdayRule,
};

/// Output of [`allocate_theory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoryAllocation {
    pub items: Vec<DailyPlanItem>,
    pub theory_minutes: u32,
    pub remaining_minutes: u32,
    /// Cursor to persist after a CICLO allocation that produced items.
    pub next_cycle_cursor: Option<u32>,
}

/// Allocate the remaining budget across the selected theory subjects.
///
/// When the weekday disables theory nothing is spent. When it is enabled
/// all `remaining_minutes` become theory minutes even if there is no active
/// subject to receive them; that gap is left visible in the plan.
pub fn allocate_theory(
    rule: &WeekdayRule,
    study_mode: StudyMode,
    subjects_per_day_limit: u32,
    subjects: &[SubjectTheory],
    cycle_cursor: Option<u32>,
    remaining_minutes: u32,
) -> TheoryAllocation {
    if !rule.theory_enabled {
        return TheoryAllocation {
            items: Vec::new(),
            theory_minutes: 0,
            remaining_minutes,
            next_cycle_cursor: None,
        };
    }

    let theory_minutes = remaining_minutes;
    let spent = |items: Vec<DailyPlanItem>, next_cycle_cursor: Option<u32>| TheoryAllocation {
        items,
        theory_minutes,
        remaining_minutes: 0,
        next_cycle_cursor,
    };

    let active: Vec<&SubjectTheory> = subjects.iter().filter(|s| s.is_active).collect();
    if theory_minutes == 0 || active.is_empty() {
        return spent(Vec::new(), None);
    }

    let active_count = active.len();
    let take_n = [
        subjects_per_day_limit as usize,
        active_count,
        theory_minutes as usize,
        MAX_DAILY_MINUTES as usize,
    ]
    .into_iter()
    .min()
    .unwrap_or(0);
    if take_n == 0 {
        return spent(Vec::new(), None);
    }

    let (selected, next_cycle_cursor): (Vec<&SubjectTheory>, Option<u32>) = match study_mode {
        StudyMode::Fixo => (active[..take_n].to_vec(), None),
        StudyMode::Ciclo => {
            let start = cycle_cursor.unwrap_or(0) as usize % active_count;
            let selected = (0..take_n)
                .map(|offset| active[(start + offset) % active_count])
                .collect();
            let next = ((start + take_n) % active_count) as u32;
            (selected, Some(next))
        }
    };

    let share = theory_minutes / take_n as u32;
    let extra = theory_minutes % take_n as u32;

    let items = selected
        .into_iter()
        .enumerate()
        .map(|(i, subject)| DailyPlanItem {
            item_type: DailyPlanItemType::Theory,
            title: format!("Teoria: {}", subject.name),
            minutes: if (i as u32) < extra { share + 1 } else { share },
            metadata: Some(json!({ "subjectId": subject.id })),
        })
        .collect();

    spent(items, next_cycle_cursor)
}
