//! Verification layers.
//!
//! Each layer produces a [`CheckResult`](aula_core::models::CheckResult) with a
//! signal in [0, 1]. The engine runs all of them and keeps the ordered list.

pub mod citation;
pub mod confidence;
pub mod cross_reference;
pub mod embedding;
pub mod entailment;
pub mod heuristic;
