//! In-memory port implementations that record every call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use uuid::Uuid;

use studyplan_core::model::{
    AutoReviewPolicy, CalendarProjection, DailyPlan, ExecutedDayEntry, ExtrasDurations,
    GenerationLogEntry, PlanningContext, ProfileRules, ProjectionGenerationLogEntry, ReviewTask,
    StudyMode, SubjectTheory, WeekdayRule,
};
use studyplan_core::ports::{
    CalendarProjectionPersistencePort, CalendarProjectionReadPort, DailyPlanPersistencePort,
    DailyPlanReadPort, ExecutionPersistencePort, PlanningContextPort,
};

pub const MONDAY: &str = "2024-03-18";

pub fn user() -> Uuid {
    Uuid::parse_str("7f1c2a4e-93b1-4d2f-a8c5-0e6b9d3f1a20").unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

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

pub fn subject(name: &str) -> SubjectTheory {
    SubjectTheory {
        id: format!("id-{name}"),
        name: name.to_owned(),
        is_active: true,
    }
}

pub fn review(id: &str, subject_name: &str, minutes: u32, date: &str) -> ReviewTask {
    ReviewTask {
        id: id.to_owned(),
        source_date: "2024-03-01".to_owned(),
        subject_id: format!("id-{subject_name}"),
        subject_name: subject_name.to_owned(),
        scheduled_date: date.to_owned(),
        review_minutes: minutes,
    }
}

pub fn context(date: &str, profile: ProfileRules) -> PlanningContext {
    PlanningContext {
        user_id: user(),
        date: date.to_owned(),
        profile,
        subjects: vec![subject("A"), subject("B"), subject("C")],
        review_tasks: vec![],
        cycle: None,
        has_execution: false,
    }
}

// ---------------------------------------------------------------------------
// Context provider
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StaticContexts {
    contexts: Mutex<HashMap<String, PlanningContext>>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticContexts {
    pub fn with(contexts: impl IntoIterator<Item = PlanningContext>) -> Self {
        let this = Self::default();
        for ctx in contexts {
            this.put(ctx);
        }
        this
    }

    /// Register `ctx` under its own date.
    pub fn put(&self, ctx: PlanningContext) {
        self.contexts.lock().unwrap().insert(ctx.date.clone(), ctx);
    }

    /// Register `ctx` under an arbitrary date key (to simulate a provider
    /// that echoes the wrong day).
    pub fn put_at(&self, date: &str, ctx: PlanningContext) {
        self.contexts.lock().unwrap().insert(date.to_owned(), ctx);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlanningContextPort for StaticContexts {
    async fn get_planning_context(&self, _user_id: Uuid, date: &str) -> Result<PlanningContext> {
        self.calls.lock().unwrap().push(date.to_owned());
        self.contexts
            .lock()
            .unwrap()
            .get(date)
            .cloned()
            .ok_or_else(|| anyhow!("no planning context for {date}"))
    }
}

// ---------------------------------------------------------------------------
// Recording store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingStore {
    pub cursor_storage: bool,
    pub fail_writes: bool,
    pub plans: Mutex<HashMap<(Uuid, String), DailyPlan>>,
    pub logs: Mutex<Vec<GenerationLogEntry>>,
    pub cursors: Mutex<HashMap<Uuid, u32>>,
    pub executed: Mutex<Vec<ExecutedDayEntry>>,
    pub projection_logs: Mutex<Vec<(Uuid, ProjectionGenerationLogEntry)>>,
    pub projections: Mutex<HashMap<(Uuid, String, String), CalendarProjection>>,
    pub writes: Mutex<Vec<&'static str>>,
}

impl RecordingStore {
    pub fn with_cursor_storage() -> Self {
        Self {
            cursor_storage: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    fn record(&self, op: &'static str) -> Result<()> {
        self.writes.lock().unwrap().push(op);
        if self.fail_writes {
            bail!("simulated storage outage during {op}");
        }
        Ok(())
    }
}

#[async_trait]
impl DailyPlanPersistencePort for RecordingStore {
    async fn upsert_daily_plan(&self, user_id: Uuid, plan: &DailyPlan) -> Result<()> {
        self.record("upsert_daily_plan")?;
        self.plans
            .lock()
            .unwrap()
            .insert((user_id, plan.date.clone()), plan.clone());
        Ok(())
    }

    async fn append_generation_log(&self, entry: &GenerationLogEntry) -> Result<()> {
        self.record("append_generation_log")?;
        self.logs.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn update_cycle_cursor(&self, user_id: Uuid, next_cursor: u32) -> Result<()> {
        self.record("update_cycle_cursor")?;
        self.cursors.lock().unwrap().insert(user_id, next_cursor);
        Ok(())
    }

    fn supports_cycle_cursor(&self) -> bool {
        self.cursor_storage
    }
}

#[async_trait]
impl DailyPlanReadPort for RecordingStore {
    async fn get_daily_plan(&self, user_id: Uuid, date: &str) -> Result<Option<DailyPlan>> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .get(&(user_id, date.to_owned()))
            .cloned())
    }
}

#[async_trait]
impl ExecutionPersistencePort for RecordingStore {
    async fn insert_executed_day(&self, entry: &ExecutedDayEntry) -> Result<()> {
        self.record("insert_executed_day")?;
        let mut executed = self.executed.lock().unwrap();
        if executed
            .iter()
            .any(|e| e.user_id == entry.user_id && e.date == entry.date)
        {
            bail!("duplicate executed day {}", entry.date);
        }
        executed.push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl CalendarProjectionPersistencePort for RecordingStore {
    async fn create_projection_generation_log(
        &self,
        entry: &ProjectionGenerationLogEntry,
    ) -> Result<Uuid> {
        self.record("create_projection_generation_log")?;
        let id = Uuid::new_v4();
        self.projection_logs
            .lock()
            .unwrap()
            .push((id, entry.clone()));
        Ok(id)
    }

    async fn upsert_calendar_projection(
        &self,
        user_id: Uuid,
        projection: &CalendarProjection,
    ) -> Result<()> {
        self.record("upsert_calendar_projection")?;
        self.projections.lock().unwrap().insert(
            (
                user_id,
                projection.range_start.clone(),
                projection.range_end.clone(),
            ),
            projection.clone(),
        );
        Ok(())
    }
}

#[async_trait]
impl CalendarProjectionReadPort for RecordingStore {
    async fn get_calendar_projection(
        &self,
        user_id: Uuid,
        range_start: &str,
        range_end: &str,
    ) -> Result<Option<CalendarProjection>> {
        Ok(self
            .projections
            .lock()
            .unwrap()
            .get(&(user_id, range_start.to_owned(), range_end.to_owned()))
            .cloned())
    }
}
