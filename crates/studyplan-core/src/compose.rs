//! Daily plan composition: the four layers in their fixed order.
//!
//! ```text
//! has_execution?  -> ExecutionAlreadyExists
//! rest day?       -> RestDay
//! reviews         (full daily budget)
//! extras          (what reviews left)
//! theory          (everything else)
//! ```

use crate::allocate::{allocate_extras, allocate_reviews, allocate_theory, evaluate_rest_day};
use crate::date;
use crate::error::{PlanningError, RestDayReason};
use crate::model::{DailyPlan, PlanStatus, PlanTrace, PlanningContext, WeekdayRule};

/// A composed plan plus the CICLO cursor to persist alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPlan {
    pub plan: DailyPlan,
    pub next_cycle_cursor: Option<u32>,
}

/// Compose the plan for `ctx.date`.
///
/// Pure and deterministic: the same context always yields the same plan.
pub fn compose(ctx: &PlanningContext) -> Result<ComposedPlan, PlanningError> {
    if ctx.has_execution {
        return Err(PlanningError::ExecutionAlreadyExists {
            date: ctx.date.clone(),
        });
    }

    let rest = evaluate_rest_day(&ctx.date, &ctx.profile)?;
    if rest.is_rest_day {
        return Err(PlanningError::RestDay {
            date: ctx.date.clone(),
            reason: rest.reason.unwrap_or(RestDayReason::WeeklySchedule),
        });
    }

    let profile = &ctx.profile;
    profile.validate()?;

    let weekday = date::weekday_from_iso_date(&ctx.date)?;
    let rule = profile
        .weekday_rule(weekday)
        .cloned()
        .unwrap_or_else(|| WeekdayRule::disabled(weekday));
    let daily_minutes = rule.daily_minutes;

    let reviews = allocate_reviews(&ctx.date, daily_minutes, &ctx.review_tasks)?;
    let extras = allocate_extras(
        &ctx.date,
        &rule,
        &profile.extras_durations,
        reviews.remaining_minutes,
    )?;
    let theory = allocate_theory(
        &rule,
        profile.study_mode,
        profile.subjects_per_day_limit,
        &ctx.subjects,
        ctx.cycle.map(|c| c.cursor),
        extras.remaining_minutes,
    );

    let trace = PlanTrace {
        remaining_after_reviews: reviews.remaining_minutes,
        remaining_after_extras: extras.remaining_minutes,
        remaining_after_theory: theory.remaining_minutes,
    };

    let mut items = reviews.items;
    items.extend(extras.items);
    items.extend(theory.items);

    Ok(ComposedPlan {
        plan: DailyPlan {
            date: ctx.date.clone(),
            status: PlanStatus::Planned,
            daily_minutes,
            review_minutes: reviews.review_minutes,
            extras_minutes: extras.extras_minutes,
            theory_minutes: theory.theory_minutes,
            items,
            trace,
        },
        next_cycle_cursor: theory.next_cycle_cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocationStage;
    use crate::hash::canonical_hash;
    use crate::model::{CycleState, DailyPlanItemType, RestPeriod, StudyMode};
    use crate::test_support::{context, profile, review, subject};

    fn kinds(plan: &DailyPlan) -> Vec<DailyPlanItemType> {
        plan.items.iter().map(|i| i.item_type).collect()
    }

    #[test]
    fn fixo_reference_day() {
        let mut p = profile(180);
        p.weekday_rules[0].questions_enabled = true;
        let mut ctx = context(p);
        ctx.review_tasks = vec![review("r1", "Penal", 30)];
        ctx.subjects = vec![subject("A", true), subject("B", true), subject("C", true)];

        let composed = compose(&ctx).unwrap();
        let plan = &composed.plan;

        assert_eq!(plan.status, PlanStatus::Planned);
        assert_eq!(plan.daily_minutes, 180);
        assert_eq!(plan.review_minutes, 30);
        assert_eq!(plan.extras_minutes, 20);
        assert_eq!(plan.theory_minutes, 130);
        assert_eq!(
            kinds(plan),
            vec![
                DailyPlanItemType::Review,
                DailyPlanItemType::Questions,
                DailyPlanItemType::Theory,
                DailyPlanItemType::Theory
            ]
        );
        assert_eq!(plan.items[2].title, "Teoria: A");
        assert_eq!(plan.items[2].minutes, 65);
        assert_eq!(plan.items[3].title, "Teoria: B");
        assert_eq!(plan.items[3].minutes, 65);
        assert_eq!(
            plan.trace,
            PlanTrace {
                remaining_after_reviews: 150,
                remaining_after_extras: 130,
                remaining_after_theory: 0,
            }
        );
        assert_eq!(composed.next_cycle_cursor, None);
    }

    #[test]
    fn budget_is_conserved_with_active_subjects() {
        let mut p = profile(97);
        p.weekday_rules[0].informatives_enabled = true;
        p.weekday_rules[0].lei_seca_enabled = true;
        let mut ctx = context(p);
        ctx.review_tasks = vec![review("r1", "Penal", 12), review("r2", "Civil", 9)];
        ctx.subjects = vec![subject("A", true), subject("B", true)];

        let plan = compose(&ctx).unwrap().plan;
        assert_eq!(
            plan.daily_minutes,
            plan.review_minutes + plan.extras_minutes + plan.theory_minutes
        );
        assert_eq!(plan.items.iter().map(|i| i.minutes).sum::<u32>(), 97);
        assert!(plan.items.iter().all(|i| i.minutes >= 1));
    }

    #[test]
    fn executed_day_is_rejected_first() {
        let mut p = profile(0);
        p.subjects_per_day_limit = 0;
        let mut ctx = context(p);
        ctx.has_execution = true;
        let err = compose(&ctx).unwrap_err();
        assert!(matches!(err, PlanningError::ExecutionAlreadyExists { .. }), "{err:?}");
    }

    #[test]
    fn rest_day_wins_over_configured_layers() {
        let mut p = profile(120);
        p.weekday_rules[0].questions_enabled = true;
        p.rest_periods.push(RestPeriod {
            start_date: "2024-03-15".into(),
            end_date: "2024-03-20".into(),
            label: None,
        });
        let mut ctx = context(p);
        ctx.review_tasks = vec![review("r1", "Penal", 500)];

        match compose(&ctx).unwrap_err() {
            PlanningError::RestDay { date, reason } => {
                assert_eq!(date, ctx.date);
                assert_eq!(reason, RestDayReason::RestPeriod);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_minute_weekday_is_rest_day() {
        let err = compose(&context(profile(0))).unwrap_err();
        assert!(matches!(
            err,
            PlanningError::RestDay {
                reason: RestDayReason::WeeklySchedule,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_weekday_rule_is_rejected_before_rest_check() {
        let mut p = profile(120);
        let mut rest_twin = p.weekday_rules[0].clone();
        rest_twin.daily_minutes = 0;
        p.weekday_rules.insert(0, rest_twin);

        let err = compose(&context(p)).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidInput { .. }), "{err:?}");
    }

    #[test]
    fn reviews_overflow_stops_composition() {
        let mut ctx = context(profile(120));
        ctx.review_tasks = vec![review("r1", "Penal", 100), review("r2", "Civil", 50)];
        match compose(&ctx).unwrap_err() {
            PlanningError::InsufficientTime {
                stage,
                missing_minutes,
                ..
            } => {
                assert_eq!(stage, AllocationStage::Reviews);
                assert_eq!(missing_minutes, 30);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extras_overflow_after_reviews() {
        let mut p = profile(40);
        p.weekday_rules[0].questions_enabled = true;
        let mut ctx = context(p);
        ctx.review_tasks = vec![review("r1", "Penal", 25)];
        match compose(&ctx).unwrap_err() {
            PlanningError::InsufficientTime {
                stage,
                required_minutes,
                available_minutes,
                ..
            } => {
                assert_eq!(stage, AllocationStage::Extras);
                assert_eq!(required_minutes, 20);
                assert_eq!(available_minutes, 15);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_profile_is_rejected_on_working_days() {
        let mut p = profile(60);
        p.subjects_per_day_limit = 12;
        let err = compose(&context(p)).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidInput { .. }));
    }

    #[test]
    fn ciclo_returns_next_cursor() {
        let mut p = profile(100);
        p.study_mode = StudyMode::Ciclo;
        p.subjects_per_day_limit = 3;
        let mut ctx = context(p);
        ctx.subjects = (0..4).map(|i| subject(&format!("S{i}"), true)).collect();
        ctx.cycle = Some(CycleState { cursor: 2 });

        let composed = compose(&ctx).unwrap();
        let titles: Vec<_> = composed.plan.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Teoria: S2", "Teoria: S3", "Teoria: S0"]);
        assert_eq!(composed.next_cycle_cursor, Some(1));
    }

    #[test]
    fn theory_disabled_leaves_remainder_in_trace() {
        let mut p = profile(60);
        p.weekday_rules[0].theory_enabled = false;
        let mut ctx = context(p);
        ctx.subjects = vec![subject("A", true)];
        let plan = compose(&ctx).unwrap().plan;
        assert!(plan.items.is_empty());
        assert_eq!(plan.theory_minutes, 0);
        assert_eq!(plan.trace.remaining_after_theory, 60);
    }

    #[test]
    fn composition_is_deterministic() {
        let mut ctx = context(profile(150));
        ctx.review_tasks = vec![review("r1", "Penal", 20)];
        ctx.subjects = vec![subject("A", true), subject("B", true), subject("C", false)];

        let first = compose(&ctx).unwrap();
        let second = compose(&ctx).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            canonical_hash(&first.plan).unwrap(),
            canonical_hash(&second.plan).unwrap()
        );
    }
}
