//! Use-case tests for recording executed days.

mod common;

use common::{MONDAY, RecordingStore, StaticContexts, context, profile, user};
use serde_json::json;

use studyplan_core::model::ExecutionResultStatus;
use studyplan_core::usecase::{ExecuteDay, ExecuteDayRequest, GenerateDailyPlan};
use studyplan_core::{BlockReason, PlanningError};

fn request(minutes: u32) -> ExecuteDayRequest {
    ExecuteDayRequest {
        user_id: user(),
        date: MONDAY.to_owned(),
        result_status: ExecutionResultStatus::Partial,
        total_executed_minutes: minutes,
        factual_summary: json!({"theory": 60, "questions": 15}),
    }
}

#[tokio::test]
async fn inserts_execution_record() {
    let provider = StaticContexts::with([context(MONDAY, profile(120))]);
    let store = RecordingStore::default();

    let entry = ExecuteDay::new(&provider, &store)
        .execute(request(75))
        .await
        .expect("execution should be recorded");

    assert_eq!(entry.user_id, user());
    assert_eq!(entry.date, MONDAY);
    assert_eq!(entry.result_status, ExecutionResultStatus::Partial);
    assert_eq!(entry.total_executed_minutes, 75);
    assert_eq!(entry.factual_summary, json!({"theory": 60, "questions": 15}));

    let executed = store.executed.lock().unwrap();
    assert_eq!(executed.as_slice(), &[entry]);
}

#[tokio::test]
async fn already_executed_day_is_blocked() {
    let mut ctx = context(MONDAY, profile(120));
    ctx.has_execution = true;
    let provider = StaticContexts::with([ctx]);
    let store = RecordingStore::default();

    let err = ExecuteDay::new(&provider, &store)
        .execute(request(30))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlanningError::PlanningBlocked {
            reason: BlockReason::DayAlreadyExecuted,
            ..
        }
    ));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn minutes_are_bounded_by_one_day() {
    let provider = StaticContexts::with([context(MONDAY, profile(120))]);
    let store = RecordingStore::default();
    let usecase = ExecuteDay::new(&provider, &store);

    assert!(usecase.execute(request(1440)).await.is_ok());

    let err = ExecuteDay::new(&provider, &RecordingStore::default())
        .execute(request(1441))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, PlanningError::InvalidInput { field, .. } if field == "totalExecutedMinutes")
    );
}

#[tokio::test]
async fn rest_day_can_be_executed() {
    // Zero-budget weekday: nothing to plan, but the fact can still be recorded.
    let mut p = profile(120);
    p.weekday_rules[0].daily_minutes = 0;
    let provider = StaticContexts::with([context(MONDAY, p)]);
    let store = RecordingStore::default();

    let mut req = request(0);
    req.result_status = ExecutionResultStatus::RestDay;
    let entry = ExecuteDay::new(&provider, &store).execute(req).await.unwrap();
    assert_eq!(entry.result_status, ExecutionResultStatus::RestDay);
}

#[tokio::test]
async fn executed_day_then_refuses_generation() {
    let provider = StaticContexts::with([context(MONDAY, profile(120))]);
    let store = RecordingStore::default();

    ExecuteDay::new(&provider, &store)
        .execute(request(120))
        .await
        .unwrap();

    // The provider now reports the execution, as a real one would.
    let mut ctx = context(MONDAY, profile(120));
    ctx.has_execution = true;
    provider.put(ctx);

    let err = GenerateDailyPlan::new(&provider, &store)
        .execute(user(), MONDAY)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlanningError::PlanningBlocked {
            reason: BlockReason::DayAlreadyExecuted,
            ..
        }
    ));
    assert!(store.plans.lock().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_insert_failure_surfaces_from_the_port() {
    // A stale context (has_execution still false) must still be stopped by
    // the storage uniqueness guarantee.
    let provider = StaticContexts::with([context(MONDAY, profile(120))]);
    let store = RecordingStore::default();
    let usecase = ExecuteDay::new(&provider, &store);

    usecase.execute(request(60)).await.unwrap();
    let err = usecase.execute(request(60)).await.unwrap_err();
    match err {
        PlanningError::Port(inner) => assert!(inner.to_string().contains("duplicate")),
        other => panic!("unexpected error: {other:?}"),
    }
}
