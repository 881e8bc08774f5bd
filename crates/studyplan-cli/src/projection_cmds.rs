//! Calendar projection commands: project, projection.

use std::path::Path;

use anyhow::Result;
use uuid::Uuid;

use studyplan_core::usecase::{GenerateCalendarProjection, GetCalendarProjection};
use studyplan_db::{PgPlanStore, StoredFactsContext};

use crate::print_json;
use crate::source::ContextFile;

/// `studyplan project`: compose and cache every day of a range.
pub async fn run_project(
    store: &PgPlanStore,
    context_path: &Path,
    user_id: Uuid,
    from: &str,
    to: &str,
) -> Result<()> {
    let file = ContextFile::load(context_path)?;
    let contexts = StoredFactsContext::new(&file, store);

    let outcome = GenerateCalendarProjection::new(&contexts, store)
        .execute(user_id, from, to)
        .await?;

    print_json(&outcome)
}

/// `studyplan projection`: print a cached projection, if any.
pub async fn run_show_projection(
    store: &PgPlanStore,
    user_id: Uuid,
    from: &str,
    to: &str,
) -> Result<()> {
    match GetCalendarProjection::new(store)
        .execute(user_id, from, to)
        .await?
    {
        Some(projection) => print_json(&projection),
        None => {
            println!("No projection cached for {user_id} from {from} to {to}.");
            Ok(())
        }
    }
}
