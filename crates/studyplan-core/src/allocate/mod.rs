//! The four allocation layers, applied by the composer in this order:
//! rest, reviews, extras, theory.
//!
//! Each layer is a pure function from its inputs and the incoming remainder
//! to its items and the outgoing remainder.

pub mod extras;
pub mod rest;
pub mod review;
pub mod theory;

pub use extras::{ExtrasAllocation, allocate_extras};
pub use rest::{RestDayEvaluation, evaluate_rest_day};
pub use review::{ReviewAllocation, allocate_reviews};
pub use theory::{TheoryAllocation, allocate_theory};
