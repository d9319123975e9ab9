use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, XyardsError};

/// Offensive play call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Run,
    Pass,
}

impl PlayType {
    pub const ALL: [PlayType; 2] = [PlayType::Run, PlayType::Pass];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayType::Run => "run",
            PlayType::Pass => "pass",
        }
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayType {
    type Err = XyardsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "run" | "rush" => Ok(PlayType::Run),
            "pass" => Ok(PlayType::Pass),
            other => Err(XyardsError::InvalidSituation(format!(
                "unknown play type '{}', expected run or pass",
                other
            ))),
        }
    }
}

/// Score/clock context. Every field is optional; the encoder imputes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub quarter: Option<u8>,
    pub score_differential: Option<f32>,
    pub game_seconds_remaining: Option<f32>,
}

/// Everything the model sees about a play before the snap.
///
/// Built from an ingested [`PlayRecord`] or directly for a hypothetical
/// scenario. `yardline_100` is the distance to the opponent's goal line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaySituation {
    pub down: u8,
    pub distance: f32,
    pub yardline_100: f32,
    pub play_type: PlayType,
    pub formation: Option<String>,
    pub personnel: Option<String>,
    #[serde(default)]
    pub context: GameContext,
}

impl PlaySituation {
    pub fn new(down: u8, distance: f32, yardline_100: f32) -> Self {
        Self {
            down,
            distance,
            yardline_100,
            play_type: PlayType::Pass,
            formation: None,
            personnel: None,
            context: GameContext::default(),
        }
    }

    pub fn with_play_type(mut self, play_type: PlayType) -> Self {
        self.play_type = play_type;
        self
    }

    pub fn with_formation(mut self, formation: impl Into<String>) -> Self {
        self.formation = Some(formation.into());
        self
    }

    pub fn with_personnel(mut self, personnel: impl Into<String>) -> Self {
        self.personnel = Some(personnel.into());
        self
    }

    pub fn with_quarter(mut self, quarter: u8) -> Self {
        self.context.quarter = Some(quarter);
        self
    }

    pub fn with_score_differential(mut self, diff: f32) -> Self {
        self.context.score_differential = Some(diff);
        self
    }

    pub fn with_seconds_remaining(mut self, seconds: f32) -> Self {
        self.context.game_seconds_remaining = Some(seconds);
        self
    }

    /// Check the ranges a real play can take.
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.down) {
            return Err(XyardsError::InvalidSituation(format!(
                "down must be 1-4, got {}",
                self.down
            )));
        }
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(XyardsError::InvalidSituation(format!(
                "distance must be positive, got {}",
                self.distance
            )));
        }
        if !self.yardline_100.is_finite() || !(0.0..=100.0).contains(&self.yardline_100) {
            return Err(XyardsError::InvalidSituation(format!(
                "yardline_100 must be within 0-100, got {}",
                self.yardline_100
            )));
        }
        if let Some(q) = self.context.quarter {
            if !(1..=5).contains(&q) {
                return Err(XyardsError::InvalidSituation(format!(
                    "quarter must be 1-5, got {}",
                    q
                )));
            }
        }
        Ok(())
    }
}

/// Who touched the ball, when the source carries it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayParticipants {
    pub posteam: Option<String>,
    pub rusher: Option<String>,
    pub receiver: Option<String>,
}

/// One ingested play with its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub situation: PlaySituation,
    pub yards_gained: f32,
    #[serde(default)]
    pub participants: PlayParticipants,
}

impl PlayRecord {
    pub fn new(situation: PlaySituation, yards_gained: f32) -> Self {
        Self {
            situation,
            yards_gained,
            participants: PlayParticipants::default(),
        }
    }

    /// Gained at least the distance to go.
    pub fn is_success(&self) -> bool {
        self.yards_gained >= self.situation.distance
    }
}
