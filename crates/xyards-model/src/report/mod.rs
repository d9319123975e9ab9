//! Self-contained HTML report for a training run.
pub mod plots;

use std::fs;
use std::path::Path;

use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::error::Result;
use crate::model::artifact::ModelArtifact;
use crate::model::metrics::RegressionMetrics;
use crate::train::ValidationSet;
use plots::{plot_feature_importance, plot_predicted_vs_actual};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
    plot_count: usize,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
            plot_count: 0,
        }
    }

    pub fn add_content(&mut self, markup: Markup) {
        self.content.push(markup);
    }

    pub fn add_plot(&mut self, plot: Plot) {
        self.plot_count += 1;
        let id = format!(
            "{}-plot-{}",
            self.title.to_lowercase().replace(' ', "-"),
            self.plot_count
        );
        self.content
            .push(html! { div class="plot" { (PreEscaped(plot.to_inline_html(Some(&id)))) } });
    }
}

pub struct Report {
    title: String,
    subtitle: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, subtitle: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style {
                        "body { font-family: sans-serif; margin: 2rem; }
                        table { border-collapse: collapse; }
                        td, th { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
                        pre { background-color: #f5f5f5; padding: 10px; border-radius: 5px; }"
                    }
                }
                body {
                    h1 { (self.title) }
                    p { (self.subtitle) }
                    @for section in &self.sections {
                        section {
                            h2 { (section.title) }
                            @for block in &section.content {
                                (block)
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render().into_string())?;
        log::info!("Report saved to: {}", path.display());
        Ok(())
    }
}

fn metrics_row(name: &str, m: &RegressionMetrics) -> Markup {
    html! {
        tr {
            th { (name) }
            td { (m.samples) }
            td { (format!("{:.3}", m.rmse)) }
            td { (format!("{:.3}", m.mae)) }
            td { (format!("{:.3}", m.r2)) }
        }
    }
}

/// Metrics, importance and validation fit for a freshly trained artifact.
pub fn training_report(artifact: &ModelArtifact, validation: &ValidationSet) -> Result<Report> {
    let mut report = Report::new(
        "Expected Yards Training Report",
        &format!(
            "Trained {} on {} features",
            artifact.trained_at,
            artifact.feature_names.len()
        ),
    );

    let mut overview = ReportSection::new("Performance");
    overview.add_content(html! {
        table {
            tr { th { "Partition" } th { "Plays" } th { "RMSE" } th { "MAE" } th { "R²" } }
            (metrics_row("Train", &artifact.metrics.train))
            @if let Some(v) = &artifact.metrics.validation {
                (metrics_row("Validation", v))
            }
        }
    });
    if !validation.actual.is_empty() {
        overview.add_plot(plot_predicted_vs_actual(&validation.actual, &validation.predicted));
    }
    report.add_section(overview);

    if !artifact.feature_importance.is_empty() {
        let mut importance = ReportSection::new("Feature Importance");
        importance.add_plot(plot_feature_importance(&artifact.feature_importance, 20));
        report.add_section(importance);
    }

    let mut config = ReportSection::new("Configuration");
    let json = serde_json::to_string_pretty(&artifact.trainer).map_err(std::io::Error::from)?;
    config.add_content(html! { pre { code { (json) } } });
    report.add_section(config);

    Ok(report)
}
