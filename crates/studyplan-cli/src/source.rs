//! Planning contexts read from a JSON file.
//!
//! The file holds either one `PlanningContext` or an array of them. Lookups
//! match on `(userId, date)`; anything else is a provider failure.

use std::path::Path;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use studyplan_core::model::PlanningContext;
use studyplan_core::ports::PlanningContextPort;

#[derive(Deserialize)]
#[serde(untagged)]
enum ContextDocument {
    Many(Vec<PlanningContext>),
    One(Box<PlanningContext>),
}

/// In-memory [`PlanningContextPort`] loaded from a context file.
#[derive(Debug, Clone)]
pub struct ContextFile {
    contexts: Vec<PlanningContext>,
}

impl ContextFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read context file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse context file {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        let document: ContextDocument = serde_json::from_str(json)?;
        let contexts = match document {
            ContextDocument::Many(contexts) => contexts,
            ContextDocument::One(ctx) => vec![*ctx],
        };
        if contexts.is_empty() {
            bail!("context file holds no planning contexts");
        }
        Ok(Self { contexts })
    }

    /// The only context in the file, or an error if there are several.
    pub fn single(&self) -> Result<&PlanningContext> {
        match self.contexts.as_slice() {
            [ctx] => Ok(ctx),
            many => bail!(
                "context file holds {} contexts; exactly one is needed here",
                many.len()
            ),
        }
    }

    pub fn contexts(&self) -> &[PlanningContext] {
        &self.contexts
    }
}

#[async_trait]
impl PlanningContextPort for ContextFile {
    async fn get_planning_context(&self, user_id: Uuid, date: &str) -> Result<PlanningContext> {
        self.contexts
            .iter()
            .find(|ctx| ctx.user_id == user_id && ctx.date == date)
            .cloned()
            .with_context(|| format!("context file has no entry for user {user_id} on {date}"))
    }
}
