use anyhow::Result;

use xyards_model::data::{PlaySituation, PlayType};
use xyards_model::predict::YardsPredictor;
use xyards_model::recommend::{recommend, Recommendation};

use crate::commands::predict::ordinal;

pub fn run_recommendation<P: YardsPredictor>(
    predictor: &P,
    situation: &PlaySituation,
    candidates: &[PlayType],
) -> Result<Recommendation> {
    Ok(recommend(predictor, situation, candidates)?)
}

pub fn print_recommendation(situation: &PlaySituation, rec: &Recommendation) {
    println!(
        "{} & {} at the {}",
        ordinal(situation.down),
        situation.distance,
        situation.yardline_100
    );
    println!(
        "Recommended: {} ({} confidence, +{:.2} yards)",
        rec.best().play_type.as_str().to_uppercase(),
        rec.confidence,
        rec.margin
    );
    for (rank, play) in rec.ranked.iter().enumerate() {
        println!("  {}. {:<5} {:>6.2}", rank + 1, play.play_type, play.expected_yards);
    }
    println!("{}", rec.advice);
}
