//! Daily plan commands: compose, hash, generate, regenerate, show.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use uuid::Uuid;

use studyplan_core::usecase::{
    DEFAULT_GENERATION_REASON, GenerateDailyPlan, GetDailyPlan, RegenerateDailyPlan,
};
use studyplan_core::{canonical_hash, compose};
use studyplan_db::{PgPlanStore, StoredFactsContext};

use crate::print_json;
use crate::source::ContextFile;

/// `studyplan compose`: compose the single context in `path`, no database.
pub fn run_compose(path: &Path) -> Result<()> {
    let file = ContextFile::load(path)?;
    let ctx = file.single()?;

    let composed = compose(ctx)?;
    let input_hash = canonical_hash(ctx)?;
    let output_hash = canonical_hash(&composed.plan)?;

    let mut out = json!({
        "plan": composed.plan,
        "inputHash": input_hash,
        "outputHash": output_hash,
    });
    if let Some(cursor) = composed.next_cycle_cursor {
        out["nextCycleCursor"] = json!(cursor);
    }
    print_json(&out)
}

/// `studyplan hash`: canonical SHA-256 of any JSON document.
pub fn run_hash(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    println!("{}", canonical_hash(&value)?);
    Ok(())
}

pub struct GenerateOptions {
    pub notes: Option<String>,
    pub regenerate: bool,
    pub cycle_rotation: bool,
}

/// `studyplan generate` / `studyplan regenerate`.
pub async fn run_generate(
    store: &PgPlanStore,
    context_path: &Path,
    user_id: Uuid,
    date: &str,
    options: GenerateOptions,
) -> Result<()> {
    let file = ContextFile::load(context_path)?;
    let contexts = StoredFactsContext::new(&file, store);

    let outcome = if options.regenerate {
        let usecase = RegenerateDailyPlan::new(&contexts, store);
        let usecase = if options.cycle_rotation {
            usecase.with_cycle_rotation()
        } else {
            usecase
        };
        usecase.execute(user_id, date, options.notes).await?
    } else {
        let usecase = GenerateDailyPlan::new(&contexts, store);
        let usecase = if options.cycle_rotation {
            usecase.with_cycle_rotation()
        } else {
            usecase
        };
        usecase
            .execute_with_reason(user_id, date, DEFAULT_GENERATION_REASON, options.notes)
            .await?
    };

    print_json(&outcome)
}

/// `studyplan show`: print the stored plan, if any.
pub async fn run_show(store: &PgPlanStore, user_id: Uuid, date: &str) -> Result<()> {
    match GetDailyPlan::new(store).execute(user_id, date).await? {
        Some(plan) => print_json(&plan),
        None => {
            println!("No plan stored for {user_id} on {date}.");
            Ok(())
        }
    }
}
