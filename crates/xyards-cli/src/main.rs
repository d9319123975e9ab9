use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use xyards_cli::commands::predict::{print_prediction, run_prediction};
use xyards_cli::commands::recommend::{print_recommendation, run_recommendation};
use xyards_cli::commands::simulate::{print_trace, run_simulation, write_trace_csv};
use xyards_cli::commands::summarize::{load_records, run_summary, SummaryRequest};
use xyards_cli::commands::train::{run_training, TrainCommandConfig};
use xyards_cli::situation::{situation_from_matches, with_situation_args};
use xyards_cli::util::{load_predictor, model_error, parse_list, resolve_model_path, setup_instructions};
use xyards_model::data::PlayType;
use xyards_model::simulate::{NoiseConfig, SimulationConfig};

fn main() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("XYARDS_LOG", "error,xyards=info"))
        .init();

    let matches = build_cli().get_matches();

    let result = match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("recommend", sub_m)) => handle_recommend(sub_m),
        Some(("simulate", sub_m)) => handle_simulate(sub_m),
        Some(("summarize", sub_m)) => handle_summarize(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    if let Err(e) = result {
        match model_error(&e) {
            Some(err) if err.is_setup_error() => {
                eprintln!("{}", setup_instructions(err));
                std::process::exit(2)
            }
            _ => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1)
            }
        }
    }
}

fn build_cli() -> Command {
    Command::new("xyards")
        .version(clap::crate_version!())
        .about("Expected yards (xY) - play-by-play modelling, play calls and drive simulation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train the expected-yards model from play-by-play data")
                .arg(
                    Arg::new("config")
                        .help("Path to training configuration file. Prints a template when omitted.")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train_data")
                        .short('d')
                        .long("train_data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Play-by-play CSV/TSV. Overrides the file in the configuration.")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Where the trained model artifact is written.")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("report_file")
                        .long("report")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("HTML training report path.")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("rounds")
                        .long("rounds")
                        .help("Number of boosting rounds.")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for the train/validation split and importance shuffles.")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            with_situation_args(
                Command::new("predict").about("Expected yards for a single play call"),
            )
            .arg(
                Arg::new("play_type")
                    .long("play-type")
                    .default_value("pass")
                    .value_parser(["run", "pass"]),
            )
            .arg(
                Arg::new("explain")
                    .long("explain")
                    .help("Show per-feature contributions.")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("top")
                    .long("top")
                    .default_value("10")
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(json_arg()),
        )
        .subcommand(
            with_situation_args(
                Command::new("recommend").about("Rank candidate play calls by expected yards"),
            )
            .arg(
                Arg::new("candidates")
                    .long("candidates")
                    .default_value("run,pass")
                    .help("Comma-separated play types to compare."),
            )
            .arg(json_arg()),
        )
        .subcommand(
            with_situation_args(
                Command::new("simulate").about("Play out a drive from a starting situation"),
            )
            .arg(
                Arg::new("plays")
                    .long("plays")
                    .required(true)
                    .help("Comma-separated play calls, e.g. run,pass,pass"),
            )
            .arg(
                Arg::new("max_plays")
                    .long("max-plays")
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("threshold")
                    .long("threshold")
                    .help("Share of the distance to go that converts a first down (0-1].")
                    .value_parser(clap::value_parser!(f32)),
            )
            .arg(
                Arg::new("noise")
                    .long("noise")
                    .help("Standard deviation of Gaussian noise added to each gain.")
                    .value_parser(clap::value_parser!(f64)),
            )
            .arg(
                Arg::new("seed")
                    .long("seed")
                    .default_value("42")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("output_file")
                    .short('o')
                    .long("output")
                    .help("Write the drive trace as CSV.")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(json_arg()),
        )
        .subcommand(
            Command::new("summarize")
                .about("Summary statistics over play-by-play data")
                .arg(
                    Arg::new("data")
                        .help("Play-by-play CSV/TSV")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("team").long("team").help("Possession team to browse."))
                .arg(
                    Arg::new("player")
                        .long("player")
                        .requires("team")
                        .help("Rusher or receiver name within --team."),
                )
                .arg(json_arg()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print JSON instead of text.")
        .action(ArgAction::SetTrue)
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    if config_path.is_none() && matches.get_one::<String>("train_data").is_none() {
        eprintln!("[xyards::train] No config file provided; template:");
        println!("{}", serde_json::to_string_pretty(&TrainCommandConfig::default())?);
        return Ok(());
    }
    if let Some(path) = config_path {
        log::info!("[xyards::train] Training from config: {:?}", path);
    }

    let config = TrainCommandConfig::from_arguments(config_path, matches)?;
    let artifact = run_training(&config)?;
    eprintln!(
        "[xyards::train] Model with {} features written to {}",
        artifact.feature_names.len(),
        config.output_file
    );
    Ok(())
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let situation = situation_from_matches(matches)?;
    let play_type: PlayType = matches
        .get_one::<String>("play_type")
        .map_or(Ok(PlayType::Pass), |s| s.parse())?;
    let predictor = load_predictor(&resolve_model_path(matches))?;

    let output = run_prediction(&predictor, situation, play_type, matches.get_flag("explain"))?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_prediction(&output, matches.get_one::<usize>("top").copied().unwrap_or(10));
    }
    Ok(())
}

fn handle_recommend(matches: &ArgMatches) -> Result<()> {
    let situation = situation_from_matches(matches)?;
    let candidates = parse_list(
        matches.get_one::<String>("candidates").map_or("run,pass", String::as_str),
        str::parse::<PlayType>,
    )?;
    let predictor = load_predictor(&resolve_model_path(matches))?;

    let rec = run_recommendation(&predictor, &situation, &candidates)?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&rec)?);
    } else {
        print_recommendation(&situation, &rec);
    }
    Ok(())
}

fn handle_simulate(matches: &ArgMatches) -> Result<()> {
    let start = situation_from_matches(matches)?;
    let plays = parse_list(
        matches.get_one::<String>("plays").map_or("", String::as_str),
        str::parse::<PlayType>,
    )?;

    let mut config = SimulationConfig::default();
    if let Some(&max_plays) = matches.get_one::<usize>("max_plays") {
        config.max_plays = max_plays;
    }
    if let Some(&threshold) = matches.get_one::<f32>("threshold") {
        config.conversion_threshold = threshold;
    }
    if let Some(&std_dev) = matches.get_one::<f64>("noise") {
        config.noise = Some(NoiseConfig {
            std_dev,
            seed: matches.get_one::<u64>("seed").copied().unwrap_or(42),
        });
    }

    let predictor = load_predictor(&resolve_model_path(matches))?;
    let trace = run_simulation(&predictor, &start, &plays, &config)?;

    if let Some(path) = matches.get_one::<PathBuf>("output_file") {
        write_trace_csv(&trace, path)?;
    }
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&trace)?);
    } else {
        print_trace(&trace);
    }
    Ok(())
}

fn handle_summarize(matches: &ArgMatches) -> Result<()> {
    let data: &String = matches
        .get_one("data")
        .ok_or_else(|| anyhow::anyhow!("data file is required"))?;
    let records = load_records(data)?;

    let team = matches.get_one::<String>("team").map(String::as_str);
    let player = matches.get_one::<String>("player").map(String::as_str);
    let request = match (team, player) {
        (Some(team), Some(player)) => SummaryRequest::Player { team, player },
        (Some(team), None) => SummaryRequest::Team(team),
        _ => SummaryRequest::All,
    };
    run_summary(&records, request, matches.get_flag("json"))
}
