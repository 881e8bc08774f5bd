//! PostgreSQL persistence for the study-plan engine.
//!
//! [`store::PgPlanStore`] implements every persistence and read port from
//! `studyplan-core`. The free functions under [`queries`] are the raw table
//! accessors it is built from.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;

pub use config::DbConfig;
pub use store::{PgPlanStore, StoredFactsContext};
