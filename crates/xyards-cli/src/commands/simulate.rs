use std::path::Path;

use anyhow::{Context, Result};

use xyards_model::data::{PlaySituation, PlayType};
use xyards_model::predict::YardsPredictor;
use xyards_model::simulate::{simulate_drive, DriveTrace, SimulationConfig};

use crate::commands::predict::ordinal;

pub fn run_simulation<P: YardsPredictor>(
    predictor: &P,
    start: &PlaySituation,
    plays: &[PlayType],
    config: &SimulationConfig,
) -> Result<DriveTrace> {
    Ok(simulate_drive(predictor, start, plays.iter().copied(), config)?)
}

pub fn print_trace(trace: &DriveTrace) {
    for step in &trace.steps {
        println!(
            "{:>2}. {} & {:<5.1} at {:>5.1}  {:<4} {:>6.2} yds{}",
            step.play_number,
            ordinal(step.down),
            step.distance,
            step.yardline_100,
            step.play_type,
            step.gained,
            if step.first_down { "  first down" } else { "" }
        );
    }
    println!(
        "Result: {} after {} plays, {:.1} yards gained, ball at the {:.1}",
        trace.outcome,
        trace.steps.len(),
        trace.total_yards,
        trace.final_yardline
    );
}

/// Write the drive as one CSV row per play.
pub fn write_trace_csv<P: AsRef<Path>>(trace: &DriveTrace, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for step in &trace.steps {
        writer.serialize(step)?;
    }
    writer.flush()?;
    log::info!("Drive trace written to: {}", path.display());
    Ok(())
}
