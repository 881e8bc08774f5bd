//! Deterministic daily study-plan allocation.
//!
//! Given a user's normative profile and a date, [`compose::compose`]
//! partitions the day's minutes across four strictly ordered layers (rest,
//! reviews, extras, theory). The [`usecase`] module wraps composition with
//! context retrieval, persistence, and a SHA-256 audit trail through the
//! traits in [`ports`].

pub mod allocate;
pub mod compose;
pub mod date;
pub mod error;
pub mod hash;
pub mod model;
pub mod ports;
pub mod usecase;

#[cfg(test)]
mod test_support;

pub use compose::{ComposedPlan, compose};
pub use error::{AllocationStage, BlockReason, PlanningError, RestDayReason};
pub use hash::{canonical_hash, sha256_hex, stable_stringify};
