//! xyards-model: expected-yards (xY) modelling for football play calling.
//!
//! The crate reads play-by-play data, turns each play into a versioned
//! feature vector, fits a gradient-boosted regression model on yards gained
//! and persists it together with the encoding it was trained on. A loaded
//! model can then score hypothetical situations, rank candidate play calls
//! and step through whole drives.
//!
//! Everything that touches the model goes through [`features::FeatureEncoding`],
//! so training and serving share one column layout; artifacts whose layout no
//! longer matches are rejected on load.
pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod model;
pub mod predict;
pub mod recommend;
pub mod report;
pub mod simulate;
pub mod train;

pub use error::{Result, XyardsError};
