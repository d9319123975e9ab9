//! Fitting the expected-yards model from historical plays.
pub mod importance;
pub mod split;
pub mod trainer;

pub use importance::permutation_importance;
pub use split::split_indices;
pub use trainer::{train, Trainer, TrainingOutcome, ValidationSet, LABEL_LIMIT};
