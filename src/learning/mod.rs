//! Learning logic: choosing the problem of the day and crediting progress

pub mod selector;
pub mod updater;

// Re-exports
pub use selector::{Selection, remaining_problems, select_problem};
pub use updater::{ValidationEvent, ValidationOutcome, apply_validation, next_streak, xp_level};
