use serde::{Deserialize, Serialize};

/// Error summary for a set of yardage predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub samples: usize,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn evaluate(predictions: &[f32], actual: &[f32]) -> Self {
        if predictions.is_empty() || predictions.len() != actual.len() {
            return Self {
                samples: 0,
                rmse: 0.0,
                mae: 0.0,
                r2: 0.0,
            };
        }

        let n = actual.len() as f64;
        let mean = actual.iter().map(|&v| f64::from(v)).sum::<f64>() / n;

        let mut sq_err = 0.0_f64;
        let mut abs_err = 0.0_f64;
        let mut total = 0.0_f64;
        for (&p, &a) in predictions.iter().zip(actual) {
            let d = f64::from(p) - f64::from(a);
            sq_err += d * d;
            abs_err += d.abs();
            total += (f64::from(a) - mean).powi(2);
        }

        // Constant targets leave R² undefined; report 0 rather than NaN.
        let r2 = if total > 0.0 { 1.0 - sq_err / total } else { 0.0 };

        Self {
            samples: predictions.len(),
            rmse: (sq_err / n).sqrt(),
            mae: abs_err / n,
            r2,
        }
    }
}

/// Metrics for both partitions of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub train: RegressionMetrics,
    pub validation: Option<RegressionMetrics>,
}

impl TrainingMetrics {
    pub fn log_summary(&self) {
        log::info!("----- Model Performance -----");
        log::info!(
            "Train      RMSE {:.3}  MAE {:.3}  R2 {:.3}  ({} plays)",
            self.train.rmse,
            self.train.mae,
            self.train.r2,
            self.train.samples
        );
        match &self.validation {
            Some(v) => log::info!(
                "Validation RMSE {:.3}  MAE {:.3}  R2 {:.3}  ({} plays)",
                v.rmse,
                v.mae,
                v.r2,
                v.samples
            ),
            None => log::warn!("No validation partition; metrics are in-sample only."),
        }
        log::info!("-----------------------------");
    }
}

/// Relative share of one column in the model's accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f32,
}
