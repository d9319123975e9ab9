//! Permutation importance: how much worse the model gets when one column is
//! shuffled.
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::Result;
use crate::model::metrics::{FeatureImportance, RegressionMetrics};
use crate::model::regressor::Regressor;

/// Relative importance per column, sorted by decreasing share.
///
/// Each column is shuffled with its own seed (`seed + column`), so the result
/// is reproducible regardless of rayon scheduling. Increases in MAE are
/// clamped at zero and normalised to sum to one (all zeros if nothing helps).
pub fn permutation_importance<R: Regressor>(
    model: &R,
    x: &Array2<f32>,
    y: &[f32],
    names: &[String],
    seed: u64,
) -> Result<Vec<FeatureImportance>> {
    let base_mae = RegressionMetrics::evaluate(&model.predict(x)?, y).mae;

    let increases: Vec<f64> = (0..x.ncols())
        .into_par_iter()
        .map(|col| -> Result<f64> {
            let mut shuffled = x.clone();
            let mut column: Vec<f32> = x.column(col).to_vec();
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(col as u64));
            column.shuffle(&mut rng);
            for (dst, v) in shuffled.column_mut(col).iter_mut().zip(column) {
                *dst = v;
            }
            let mae = RegressionMetrics::evaluate(&model.predict(&shuffled)?, y).mae;
            Ok((mae - base_mae).max(0.0))
        })
        .collect::<Result<Vec<f64>>>()?;

    let total: f64 = increases.iter().sum();
    let mut importance: Vec<FeatureImportance> = names
        .iter()
        .zip(&increases)
        .map(|(name, &inc)| FeatureImportance {
            feature: name.clone(),
            importance: if total > 0.0 { (inc / total) as f32 } else { 0.0 },
        })
        .collect();
    importance.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    Ok(importance)
}
