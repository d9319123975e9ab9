pub mod artifact;
pub mod gbdt;
pub mod metrics;
pub mod regressor;

pub use artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use gbdt::GbdtRegressor;
pub use metrics::{FeatureImportance, RegressionMetrics, TrainingMetrics};
pub use regressor::Regressor;
