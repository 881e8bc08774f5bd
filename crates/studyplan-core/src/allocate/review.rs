//! Review layer: the first consumer of the daily budget.

use serde_json::json;

use crate::error::{AllocationStage, PlanningError};
use crate::model::{DailyPlanItem, DailyPlanItemType, ReviewTask};

/// Output of [`allocate_reviews`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewAllocation {
    pub items: Vec<DailyPlanItem>,
    pub review_minutes: u32,
    pub remaining_minutes: u32,
}

/// Allocate every review task due on `date` out of `daily_minutes`.
///
/// Reviews are never dropped to make room: if they do not fit, the day
/// fails with `InsufficientTime` at stage `REVIEWS`.
pub fn allocate_reviews(
    date: &str,
    daily_minutes: u32,
    tasks: &[ReviewTask],
) -> Result<ReviewAllocation, PlanningError> {
    let review_minutes = tasks
        .iter()
        .fold(0u32, |acc, t| acc.saturating_add(t.review_minutes));

    if review_minutes > daily_minutes {
        return Err(PlanningError::insufficient_time(
            date,
            AllocationStage::Reviews,
            review_minutes,
            daily_minutes,
        ));
    }

    let items = tasks
        .iter()
        .map(|task| DailyPlanItem {
            item_type: DailyPlanItemType::Review,
            title: format!("Revisão: {}", task.subject_name),
            minutes: task.review_minutes,
            metadata: Some(json!({
                "reviewId": task.id,
                "subjectId": task.subject_id,
                "sourceDate": task.source_date,
                "scheduledDate": task.scheduled_date,
            })),
        })
        .collect();

    Ok(ReviewAllocation {
        items,
        review_minutes,
        remaining_minutes: daily_minutes - review_minutes,
    })
}
