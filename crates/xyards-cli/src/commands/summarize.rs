use anyhow::{Context, Result};

use xyards_model::analytics::{player_plays, players_for_team, summarize, Summary};
use xyards_model::data::{read_plays, PlayRecord};

use crate::commands::predict::ordinal;

pub enum SummaryRequest<'a> {
    All,
    Team(&'a str),
    Player { team: &'a str, player: &'a str },
}

pub fn load_records(path: &str) -> Result<Vec<PlayRecord>> {
    Ok(read_plays(path)
        .with_context(|| format!("Failed to read plays from {}", path))?
        .records)
}

pub fn print_summary(title: &str, s: &Summary) {
    println!("{}", title);
    println!("  Plays:              {}", s.plays);
    println!("  Average yards:      {:.2}", s.average_yards);
    println!("  Pass share:         {:.1}%", s.pass_share * 100.0);
    if let Some(rate) = s.third_down_conversion {
        println!("  3rd down converted: {:.1}%", rate * 100.0);
    }
    if let Some(avg) = s.red_zone_average_yards {
        println!("  Red zone avg yards: {:.2}", avg);
    }
    for (down, g) in &s.by_down {
        println!(
            "  {} down: {:>6} plays {:>6.2} yds {:>5.1}% success",
            ordinal(*down),
            g.count,
            g.mean_yards,
            g.success_rate * 100.0
        );
    }
    for (pt, g) in &s.by_play_type {
        println!(
            "  {:<8} {:>6} plays {:>6.2} yds {:>5.1}% success",
            pt.as_str(),
            g.count,
            g.mean_yards,
            g.success_rate * 100.0
        );
    }
}

pub fn run_summary(records: &[PlayRecord], request: SummaryRequest<'_>, json: bool) -> Result<()> {
    match request {
        SummaryRequest::All => {
            let summary = summarize(records);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary("All plays", &summary);
            }
        }
        SummaryRequest::Team(team) => {
            let players = players_for_team(records, team);
            if json {
                println!("{}", serde_json::to_string_pretty(&players)?);
            } else {
                println!("{} ball carriers and targets:", team);
                for name in &players {
                    println!("  {}", name);
                }
            }
        }
        SummaryRequest::Player { team, player } => {
            let plays: Vec<PlayRecord> = player_plays(records, team, player)
                .into_iter()
                .cloned()
                .collect();
            if plays.is_empty() {
                anyhow::bail!("No plays found for {} on {}", player, team);
            }
            let summary = summarize(&plays);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&format!("{} ({})", player, team), &summary);
            }
        }
    }
    Ok(())
}
