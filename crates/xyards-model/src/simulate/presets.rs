use std::fmt;
use std::str::FromStr;

use crate::data::PlaySituation;
use crate::error::{Result, XyardsError};

/// Canned game situations for quick what-if runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioPreset {
    GoalLineStand,
    TwoMinuteDrill,
    ShortYardage,
    RedZoneOpportunity,
    DesperationDrive,
    SafeTerritory,
    ThirdDownConversion,
    OpeningDrive,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 8] = [
        ScenarioPreset::GoalLineStand,
        ScenarioPreset::TwoMinuteDrill,
        ScenarioPreset::ShortYardage,
        ScenarioPreset::RedZoneOpportunity,
        ScenarioPreset::DesperationDrive,
        ScenarioPreset::SafeTerritory,
        ScenarioPreset::ThirdDownConversion,
        ScenarioPreset::OpeningDrive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioPreset::GoalLineStand => "goal-line-stand",
            ScenarioPreset::TwoMinuteDrill => "two-minute-drill",
            ScenarioPreset::ShortYardage => "short-yardage",
            ScenarioPreset::RedZoneOpportunity => "red-zone-opportunity",
            ScenarioPreset::DesperationDrive => "desperation-drive",
            ScenarioPreset::SafeTerritory => "safe-territory",
            ScenarioPreset::ThirdDownConversion => "third-down-conversion",
            ScenarioPreset::OpeningDrive => "opening-drive",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScenarioPreset::GoalLineStand => "Pinned near the goal line in a one-score game.",
            ScenarioPreset::TwoMinuteDrill => "Trailing late, driving for the tying score.",
            ScenarioPreset::ShortYardage => "Fourth and one at midfield: go for it or punt.",
            ScenarioPreset::RedZoneOpportunity => "First down inside the 20 with a small lead.",
            ScenarioPreset::DesperationDrive => "Fourth and long, down a touchdown.",
            ScenarioPreset::SafeTerritory => "Backed up in own territory with a lead.",
            ScenarioPreset::ThirdDownConversion => "Third and seven in opponent territory.",
            ScenarioPreset::OpeningDrive => "First snap of the game.",
        }
    }

    /// (down, distance, yardline_100, quarter, score differential)
    fn values(&self) -> (u8, f32, f32, u8, f32) {
        match self {
            ScenarioPreset::GoalLineStand => (3, 2.0, 3.0, 4, -4.0),
            ScenarioPreset::TwoMinuteDrill => (2, 8.0, 35.0, 4, -3.0),
            ScenarioPreset::ShortYardage => (4, 1.0, 45.0, 3, 0.0),
            ScenarioPreset::RedZoneOpportunity => (1, 10.0, 15.0, 2, 3.0),
            ScenarioPreset::DesperationDrive => (4, 12.0, 40.0, 4, -7.0),
            ScenarioPreset::SafeTerritory => (1, 10.0, 85.0, 1, 7.0),
            ScenarioPreset::ThirdDownConversion => (3, 7.0, 28.0, 3, -3.0),
            ScenarioPreset::OpeningDrive => (1, 10.0, 75.0, 1, 0.0),
        }
    }

    pub fn situation(&self) -> PlaySituation {
        let (down, distance, yardline, quarter, score) = self.values();
        PlaySituation::new(down, distance, yardline)
            .with_quarter(quarter)
            .with_score_differential(score)
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioPreset {
    type Err = XyardsError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                XyardsError::InvalidSituation(format!(
                    "unknown scenario '{}', expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}
