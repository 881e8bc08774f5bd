//! `studyplan execute`: record the factual outcome of a day.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use uuid::Uuid;

use studyplan_core::usecase::{ExecuteDay, ExecuteDayRequest, parse_result_status};
use studyplan_db::{PgPlanStore, StoredFactsContext};

use crate::print_json;
use crate::source::ContextFile;

pub struct ExecuteArgs<'a> {
    pub context_path: &'a Path,
    pub user_id: Uuid,
    pub date: &'a str,
    pub status: &'a str,
    pub minutes: u32,
    pub summary: Option<&'a str>,
}

pub async fn run_execute(store: &PgPlanStore, args: ExecuteArgs<'_>) -> Result<()> {
    let result_status = parse_result_status(args.status)?;
    let factual_summary = match args.summary {
        Some(raw) => serde_json::from_str(raw).context("--summary is not valid JSON")?,
        None => Value::Object(Default::default()),
    };

    let file = ContextFile::load(args.context_path)?;
    let contexts = StoredFactsContext::new(&file, store);

    let entry = ExecuteDay::new(&contexts, store)
        .execute(ExecuteDayRequest {
            user_id: args.user_id,
            date: args.date.to_owned(),
            result_status,
            total_executed_minutes: args.minutes,
            factual_summary,
        })
        .await?;

    print_json(&entry)
}
