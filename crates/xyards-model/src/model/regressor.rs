use ndarray::Array2;

use crate::error::Result;

/// Contract shared by the regression back-ends.
///
/// Rows of `x` are samples and columns follow the fitted
/// [`FeatureEncoding`](crate::features::FeatureEncoding); `y` is yards gained.
pub trait Regressor: Send + Sync {
    fn fit(&mut self, x: &Array2<f32>, y: &[f32]) -> Result<()>;

    /// One prediction per row of `x`.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f32>>;

    fn is_trained(&self) -> bool;

    /// Number of input columns the fitted model expects.
    fn feature_size(&self) -> usize;

    fn name(&self) -> &str {
        "regressor"
    }
}
