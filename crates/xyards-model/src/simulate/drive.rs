use std::fmt;

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

use crate::data::{PlaySituation, PlayType};
use crate::error::{Result, XyardsError};
use crate::predict::YardsPredictor;

/// Gaussian jitter added to every predicted gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub std_dev: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub max_plays: usize,
    /// Share of the distance to go that counts as a conversion, in (0, 1].
    pub conversion_threshold: f32,
    pub noise: Option<NoiseConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_plays: 20,
            conversion_threshold: 1.0,
            noise: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_plays == 0 {
            return Err(XyardsError::InvalidConfig("max_plays must be > 0".into()));
        }
        if !(self.conversion_threshold > 0.0 && self.conversion_threshold <= 1.0) {
            return Err(XyardsError::InvalidConfig(format!(
                "conversion_threshold must be in (0, 1], got {}",
                self.conversion_threshold
            )));
        }
        if let Some(noise) = &self.noise {
            if !(noise.std_dev.is_finite() && noise.std_dev > 0.0) {
                return Err(XyardsError::InvalidConfig(format!(
                    "noise std_dev must be positive, got {}",
                    noise.std_dev
                )));
            }
        }
        Ok(())
    }
}

/// Why a drive stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveOutcome {
    Touchdown,
    Safety,
    TurnoverOnDowns,
    PlayLimit,
    SequenceExhausted,
}

impl fmt::Display for DriveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            DriveOutcome::Touchdown => "touchdown",
            DriveOutcome::Safety => "safety",
            DriveOutcome::TurnoverOnDowns => "turnover on downs",
            DriveOutcome::PlayLimit => "play limit reached",
            DriveOutcome::SequenceExhausted => "play sequence exhausted",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveStep {
    /// 1-based.
    pub play_number: usize,
    pub down: u8,
    pub distance: f32,
    pub yardline_100: f32,
    pub play_type: PlayType,
    pub expected_yards: f32,
    /// Expected yards plus noise, if any.
    pub gained: f32,
    pub first_down: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveTrace {
    pub steps: Vec<DriveStep>,
    pub outcome: DriveOutcome,
    pub total_yards: f32,
    /// Field position after the last play.
    pub final_yardline: f32,
}

/// Play out `plays` from `start`, feeding each predicted gain back into the
/// down, distance and field position of the next snap.
pub fn simulate_drive<P, I>(
    predictor: &P,
    start: &PlaySituation,
    plays: I,
    config: &SimulationConfig,
) -> Result<DriveTrace>
where
    P: YardsPredictor,
    I: IntoIterator<Item = PlayType>,
{
    config.validate()?;
    start.validate()?;

    let mut jitter = match &config.noise {
        Some(noise) => {
            let normal = Normal::new(0.0, noise.std_dev)
                .map_err(|e| XyardsError::InvalidConfig(format!("noise: {}", e)))?;
            Some((normal, StdRng::seed_from_u64(noise.seed)))
        }
        None => None,
    };

    let mut state = start.clone();
    let mut plays = plays.into_iter();
    let mut steps: Vec<DriveStep> = Vec::new();

    let outcome = loop {
        if steps.len() >= config.max_plays {
            break DriveOutcome::PlayLimit;
        }
        let play_type = match plays.next() {
            Some(pt) => pt,
            None => break DriveOutcome::SequenceExhausted,
        };

        state.play_type = play_type;
        let expected_yards = predictor.predict_situation(&state)?;
        let gained = match jitter.as_mut() {
            Some((normal, rng)) => expected_yards + normal.sample(rng) as f32,
            None => expected_yards,
        };
        let yardline = state.yardline_100 - gained;
        let first_down = gained >= config.conversion_threshold * state.distance;

        steps.push(DriveStep {
            play_number: steps.len() + 1,
            down: state.down,
            distance: state.distance,
            yardline_100: state.yardline_100,
            play_type,
            expected_yards,
            gained,
            first_down,
        });

        if yardline <= 0.0 {
            state.yardline_100 = 0.0;
            break DriveOutcome::Touchdown;
        }
        if yardline >= 100.0 {
            state.yardline_100 = 100.0;
            break DriveOutcome::Safety;
        }
        state.yardline_100 = yardline;

        if first_down {
            state.down = 1;
            state.distance = yardline.min(10.0);
        } else if state.down == 4 {
            break DriveOutcome::TurnoverOnDowns;
        } else {
            state.down += 1;
            state.distance = (state.distance - gained).min(yardline);
        }
    };

    log::debug!("Drive ended after {} plays: {}", steps.len(), outcome);

    Ok(DriveTrace {
        total_yards: start.yardline_100 - state.yardline_100,
        final_yardline: state.yardline_100,
        steps,
        outcome,
    })
}
