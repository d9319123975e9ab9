//! Serving predictions from a trained artifact.
pub mod cache;
pub mod predictor;

pub use cache::{default_model_path, global_cache, ModelCache, DEFAULT_MODEL_PATH, MODEL_PATH_ENV};
pub use predictor::{Attribution, Explanation, Predictor, YardsPredictor};
