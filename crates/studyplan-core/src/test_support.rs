//! Fixture builders for unit tests.

use uuid::Uuid;

use crate::model::{
    AutoReviewPolicy, ExtrasDurations, PlanningContext, ProfileRules, ReviewTask, StudyMode,
    SubjectTheory, WeekdayRule,
};

/// A Monday.
pub const MONDAY: &str = "2024-03-18";

pub fn user_id() -> Uuid {
    Uuid::from_u128(0x5d1b_2c3e_0000_4000_8000_0000_0000_0001)
}

/// Every weekday gets `daily_minutes` with theory on and extras off.
pub fn profile(daily_minutes: u32) -> ProfileRules {
    ProfileRules {
        subjects_per_day_limit: 2,
        study_mode: StudyMode::Fixo,
        weekday_rules: (1..=7)
            .map(|weekday| WeekdayRule {
                daily_minutes,
                theory_enabled: true,
                ..WeekdayRule::disabled(weekday)
            })
            .collect(),
        extras_durations: ExtrasDurations {
            questions_minutes: 20,
            informatives_minutes: 10,
            lei_seca_minutes: 15,
        },
        auto_review_policy: AutoReviewPolicy {
            enabled: true,
            intervals_days: vec![1, 7, 30],
            review_minutes: 15,
        },
        rest_periods: vec![],
    }
}

pub fn subject(id: &str, is_active: bool) -> SubjectTheory {
    SubjectTheory {
        id: id.to_owned(),
        name: id.to_owned(),
        is_active,
    }
}

pub fn review(id: &str, subject_name: &str, minutes: u32) -> ReviewTask {
    ReviewTask {
        id: id.to_owned(),
        source_date: "2024-03-11".to_owned(),
        subject_id: format!("subj-{subject_name}"),
        subject_name: subject_name.to_owned(),
        scheduled_date: MONDAY.to_owned(),
        review_minutes: minutes,
    }
}

pub fn context(profile: ProfileRules) -> PlanningContext {
    PlanningContext {
        user_id: user_id(),
        date: MONDAY.to_owned(),
        profile,
        subjects: vec![],
        review_tasks: vec![],
        cycle: None,
        has_execution: false,
    }
}
