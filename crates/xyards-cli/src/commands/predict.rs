use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use xyards_model::data::{PlaySituation, PlayType};
use xyards_model::predict::{Attribution, Predictor};

/// Output of `xyards predict`.
#[derive(Debug, Serialize)]
pub struct PredictionOutput {
    pub situation: PlaySituation,
    pub expected_yards: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_yards: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributions: Vec<Attribution>,
}

pub fn run_prediction(
    predictor: &Arc<Predictor>,
    situation: PlaySituation,
    play_type: PlayType,
    explain: bool,
) -> Result<PredictionOutput> {
    let situation = situation.with_play_type(play_type);
    let features = predictor.encode(&situation)?;

    if explain {
        let explanation = predictor.explain(&features)?;
        Ok(PredictionOutput {
            situation,
            expected_yards: explanation.expected_yards,
            baseline_yards: Some(explanation.baseline_yards),
            attributions: explanation.attributions,
        })
    } else {
        Ok(PredictionOutput {
            expected_yards: predictor.predict(&features)?,
            situation,
            baseline_yards: None,
            attributions: Vec::new(),
        })
    }
}

pub fn print_prediction(out: &PredictionOutput, top: usize) {
    let s = &out.situation;
    println!(
        "{} & {} at the {} ({}): {:.2} expected yards",
        ordinal(s.down),
        s.distance,
        s.yardline_100,
        s.play_type,
        out.expected_yards
    );
    if let Some(base) = out.baseline_yards {
        println!("Average play: {:.2} yards", base);
        println!("Top contributions:");
        for a in out.attributions.iter().take(top) {
            println!("  {:<28} {:>8.3} (value {})", a.feature, a.contribution, a.value);
        }
    }
}

pub fn ordinal(down: u8) -> &'static str {
    match down {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        _ => "4th",
    }
}
