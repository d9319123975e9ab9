//! Ranking candidate play calls by expected yards.
use std::fmt;

use serde::Serialize;

use crate::data::{PlaySituation, PlayType};
use crate::error::{Result, XyardsError};
use crate::predict::YardsPredictor;

/// Margin above which a recommendation is reported as high confidence.
pub const HIGH_CONFIDENCE_MARGIN: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Moderate,
}

impl Confidence {
    fn from_margin(margin: f32) -> Self {
        if margin > HIGH_CONFIDENCE_MARGIN {
            Confidence::High
        } else {
            Confidence::Moderate
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "high",
            Confidence::Moderate => "moderate",
        })
    }
}

/// Situational note attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SituationAdvice {
    ShortYardage,
    PassingDown,
    RedZone,
    Standard,
}

impl SituationAdvice {
    pub fn for_situation(s: &PlaySituation) -> Self {
        if s.down == 4 && s.distance <= 2.0 {
            SituationAdvice::ShortYardage
        } else if s.down == 3 && s.distance >= 8.0 {
            SituationAdvice::PassingDown
        } else if s.yardline_100 <= 10.0 {
            SituationAdvice::RedZone
        } else {
            SituationAdvice::Standard
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SituationAdvice::ShortYardage => "Short yardage situation - consider power run",
            SituationAdvice::PassingDown => "Passing down - defense expects pass",
            SituationAdvice::RedZone => "Red zone - compressed field affects passing",
            SituationAdvice::Standard => "Standard down - use expected yards as guide",
        }
    }
}

impl fmt::Display for SituationAdvice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlay {
    pub play_type: PlayType,
    pub expected_yards: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Best first. Each candidate appears once.
    pub ranked: Vec<RankedPlay>,
    /// Expected-yards gap between the top two candidates (0 with one).
    pub margin: f32,
    pub confidence: Confidence,
    pub advice: SituationAdvice,
}

impl Recommendation {
    pub fn best(&self) -> &RankedPlay {
        &self.ranked[0]
    }
}

/// Predict every candidate in `situation` and rank by expected yards.
///
/// Ties keep the order in which candidates were given; repeated candidates
/// count once, at their first position.
pub fn recommend<P: YardsPredictor>(
    predictor: &P,
    situation: &PlaySituation,
    candidates: &[PlayType],
) -> Result<Recommendation> {
    let mut menu: Vec<PlayType> = Vec::with_capacity(candidates.len());
    for &c in candidates {
        if !menu.contains(&c) {
            menu.push(c);
        }
    }
    if menu.is_empty() {
        return Err(XyardsError::InvalidSituation(
            "no candidate play types to rank".to_string(),
        ));
    }

    let mut ranked = menu
        .into_iter()
        .map(|play_type| {
            let s = situation.clone().with_play_type(play_type);
            Ok(RankedPlay {
                play_type,
                expected_yards: predictor.predict_situation(&s)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // sort_by is stable, so equal predictions keep input order
    ranked.sort_by(|a, b| b.expected_yards.total_cmp(&a.expected_yards));

    let margin = match ranked.as_slice() {
        [first, second, ..] => first.expected_yards - second.expected_yards,
        _ => 0.0,
    };
    log::debug!(
        "Recommending {} for {}&{} at {} (margin {:.2})",
        ranked[0].play_type,
        situation.down,
        situation.distance,
        situation.yardline_100,
        margin
    );

    Ok(Recommendation {
        ranked,
        margin,
        confidence: Confidence::from_margin(margin),
        advice: SituationAdvice::for_situation(situation),
    })
}
