//! Structural and semantic validation of a conceptual [`State`](crate::model::State).
//!
//! Every rule in [`rules`] runs independently and the [`evaluator`] merges
//! their findings into one ordered list; nothing short-circuits.

pub mod evaluator;
pub mod rules;

pub use evaluator::validate;
