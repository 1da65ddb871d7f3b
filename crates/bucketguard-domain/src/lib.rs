//! Pure policy evaluation and remediation planning (no IO).
//!
//! Input: bucket observations collected elsewhere, or the findings of a prior scan.
//! Output: findings, actions and their summary reports.

#![forbid(unsafe_code)]

pub mod model;
pub mod policy;
pub mod remediation;
pub mod report;

pub mod checks;
mod engine;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;

pub use engine::{evaluate, evaluate_bucket, threshold_breached};
