use plotly::common::{DashType, Line, Mode, Orientation};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot, Scatter};

use crate::model::metrics::FeatureImportance;

/// Horizontal bar chart of the `top` most important columns.
pub fn plot_feature_importance(importance: &[FeatureImportance], top: usize) -> Plot {
    // plotly draws the first bar at the bottom
    let shown: Vec<&FeatureImportance> = importance.iter().take(top).rev().collect();
    let names: Vec<String> = shown.iter().map(|f| f.feature.clone()).collect();
    let shares: Vec<f32> = shown.iter().map(|f| f.importance).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(shares, names)
            .orientation(Orientation::Horizontal)
            .name("Importance"),
    );
    plot.set_layout(
        Layout::new()
            .title("Permutation Feature Importance")
            .x_axis(Axis::new().title("Share of MAE increase"))
            .height(120 + 22 * top.min(importance.len())),
    );
    plot
}

/// Predicted vs actual yards on the validation partition.
pub fn plot_predicted_vs_actual(actual: &[f32], predicted: &[f32]) -> Plot {
    let lo = actual
        .iter()
        .chain(predicted)
        .copied()
        .fold(f32::INFINITY, f32::min);
    let hi = actual
        .iter()
        .chain(predicted)
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    let (lo, hi) = if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    };

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(actual.to_vec(), predicted.to_vec())
            .mode(Mode::Markers)
            .name("Validation plays"),
    );
    plot.add_trace(
        Scatter::new(vec![lo, hi], vec![lo, hi])
            .mode(Mode::Lines)
            .name("y = x")
            .line(Line::new().color("red").dash(DashType::Dash)),
    );
    plot.set_layout(
        Layout::new()
            .title("Predicted vs Actual Yards")
            .x_axis(Axis::new().title("Actual yards"))
            .y_axis(Axis::new().title("Predicted yards")),
    );
    plot
}
