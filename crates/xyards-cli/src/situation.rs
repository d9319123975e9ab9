//! Game-situation flags shared by predict, recommend and simulate.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};

use xyards_model::data::PlaySituation;
use xyards_model::simulate::ScenarioPreset;

pub fn with_situation_args(cmd: Command) -> Command {
    let presets: Vec<&'static str> = ScenarioPreset::ALL.iter().map(|p| p.name()).collect();
    cmd.arg(
        Arg::new("scenario")
            .long("scenario")
            .help("Start from a preset situation; other flags override its fields")
            .value_parser(clap::builder::PossibleValuesParser::new(presets)),
    )
    .arg(
        Arg::new("down")
            .long("down")
            .help("Current down (1-4)")
            .value_parser(clap::value_parser!(u8).range(1..=4)),
    )
    .arg(
        Arg::new("distance")
            .long("distance")
            .help("Yards to go for a first down")
            .value_parser(clap::value_parser!(f32)),
    )
    .arg(
        Arg::new("yardline")
            .long("yardline")
            .help("Yards from the opponent's end zone (0-100)")
            .value_parser(clap::value_parser!(f32)),
    )
    .arg(
        Arg::new("quarter")
            .long("quarter")
            .value_parser(clap::value_parser!(u8).range(1..=5)),
    )
    .arg(
        Arg::new("score_diff")
            .long("score-diff")
            .help("Offense score minus defense score")
            .allow_negative_numbers(true)
            .value_parser(clap::value_parser!(f32)),
    )
    .arg(
        Arg::new("seconds_remaining")
            .long("seconds-remaining")
            .value_parser(clap::value_parser!(f32)),
    )
    .arg(
        Arg::new("formation")
            .long("formation")
            .value_parser(clap::builder::NonEmptyStringValueParser::new()),
    )
    .arg(
        Arg::new("personnel")
            .long("personnel")
            .value_parser(clap::builder::NonEmptyStringValueParser::new()),
    )
    .arg(
        Arg::new("model")
            .short('m')
            .long("model")
            .help("Trained model artifact. Defaults to $XYARDS_MODEL or models/expected_yards_model.json")
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
    )
}

/// Build the situation from a preset and/or explicit flags.
pub fn situation_from_matches(matches: &ArgMatches) -> Result<PlaySituation> {
    let preset = matches
        .get_one::<String>("scenario")
        .map(|name| name.parse::<ScenarioPreset>())
        .transpose()?;

    let mut situation = match preset {
        Some(p) => {
            log::info!("Scenario: {} ({})", p, p.description());
            p.situation()
        }
        None => {
            let required = |name: &str| {
                matches
                    .get_one::<f32>(name)
                    .copied()
                    .with_context(|| format!("--{} is required unless --scenario is given", name))
            };
            let down = matches
                .get_one::<u8>("down")
                .copied()
                .context("--down is required unless --scenario is given")?;
            PlaySituation::new(down, required("distance")?, required("yardline")?)
        }
    };

    if let Some(&down) = matches.get_one::<u8>("down") {
        situation.down = down;
    }
    if let Some(&distance) = matches.get_one::<f32>("distance") {
        situation.distance = distance;
    }
    if let Some(&yardline) = matches.get_one::<f32>("yardline") {
        situation.yardline_100 = yardline;
    }
    if let Some(&quarter) = matches.get_one::<u8>("quarter") {
        situation = situation.with_quarter(quarter);
    }
    if let Some(&diff) = matches.get_one::<f32>("score_diff") {
        situation = situation.with_score_differential(diff);
    }
    if let Some(&secs) = matches.get_one::<f32>("seconds_remaining") {
        situation = situation.with_seconds_remaining(secs);
    }
    if let Some(formation) = matches.get_one::<String>("formation") {
        situation = situation.with_formation(formation.clone());
    }
    if let Some(personnel) = matches.get_one::<String>("personnel") {
        situation = situation.with_personnel(personnel.clone());
    }

    situation.validate()?;
    Ok(situation)
}
