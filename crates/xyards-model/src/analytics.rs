//! Descriptive statistics over ingested plays.
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::data::{PlayRecord, PlayType};

/// Yardline at or inside which a play counts as red zone.
pub const RED_ZONE_YARDLINE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub mean_yards: f64,
    /// Share of plays that gained at least the distance to go.
    pub success_rate: f64,
}

impl GroupStats {
    fn of<'a, I: IntoIterator<Item = &'a PlayRecord>>(records: I) -> Self {
        let (mut count, mut yards, mut successes) = (0usize, 0.0f64, 0usize);
        for r in records {
            count += 1;
            yards += f64::from(r.yards_gained);
            successes += usize::from(r.is_success());
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            count,
            mean_yards: yards / count as f64,
            success_rate: successes as f64 / count as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub plays: usize,
    pub average_yards: f64,
    pub pass_share: f64,
    /// `None` when there are no third-down plays.
    pub third_down_conversion: Option<f64>,
    pub red_zone_average_yards: Option<f64>,
    pub by_down: BTreeMap<u8, GroupStats>,
    pub by_play_type: Vec<(PlayType, GroupStats)>,
}

pub fn summarize(records: &[PlayRecord]) -> Summary {
    let all = GroupStats::of(records);
    let passes = records
        .iter()
        .filter(|r| r.situation.play_type == PlayType::Pass)
        .count();

    let third = GroupStats::of(records.iter().filter(|r| r.situation.down == 3));
    let red_zone =
        GroupStats::of(records.iter().filter(|r| r.situation.yardline_100 <= RED_ZONE_YARDLINE));

    let mut by_down = BTreeMap::new();
    for down in 1..=4u8 {
        let stats = GroupStats::of(records.iter().filter(|r| r.situation.down == down));
        if stats.count > 0 {
            by_down.insert(down, stats);
        }
    }

    let by_play_type = PlayType::ALL
        .iter()
        .map(|&pt| {
            (
                pt,
                GroupStats::of(records.iter().filter(|r| r.situation.play_type == pt)),
            )
        })
        .filter(|(_, s)| s.count > 0)
        .collect();

    Summary {
        plays: all.count,
        average_yards: all.mean_yards,
        pass_share: if all.count > 0 {
            passes as f64 / all.count as f64
        } else {
            0.0
        },
        third_down_conversion: (third.count > 0).then(|| third.success_rate),
        red_zone_average_yards: (red_zone.count > 0).then(|| red_zone.mean_yards),
        by_down,
        by_play_type,
    }
}

fn same_name(a: Option<&str>, b: &str) -> bool {
    a.map_or(false, |a| a.trim().eq_ignore_ascii_case(b.trim()))
}

/// Plays where `player` carried or caught the ball for `team`.
pub fn player_plays<'a>(records: &'a [PlayRecord], team: &str, player: &str) -> Vec<&'a PlayRecord> {
    records
        .iter()
        .filter(|r| same_name(r.participants.posteam.as_deref(), team))
        .filter(|r| {
            same_name(r.participants.rusher.as_deref(), player)
                || same_name(r.participants.receiver.as_deref(), player)
        })
        .collect()
}

/// Sorted, de-duplicated rushers and receivers for `team`.
pub fn players_for_team(records: &[PlayRecord], team: &str) -> Vec<String> {
    let names: BTreeSet<String> = records
        .iter()
        .filter(|r| same_name(r.participants.posteam.as_deref(), team))
        .flat_map(|r| [r.participants.rusher.as_ref(), r.participants.receiver.as_ref()])
        .flatten()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    names.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PlayParticipants, PlaySituation};

    fn play(down: u8, togo: f32, yl: f32, pt: PlayType, gained: f32) -> PlayRecord {
        PlayRecord::new(PlaySituation::new(down, togo, yl).with_play_type(pt), gained)
    }

    fn with_players(mut r: PlayRecord, team: &str, rusher: Option<&str>, receiver: Option<&str>) -> PlayRecord {
        r.participants = PlayParticipants {
            posteam: Some(team.to_string()),
            rusher: rusher.map(str::to_string),
            receiver: receiver.map(str::to_string),
        };
        r
    }

    #[test]
    fn summary_aggregates() {
        let records = vec![
            play(1, 10.0, 75.0, PlayType::Run, 4.0),
            play(3, 5.0, 50.0, PlayType::Pass, 6.0),
            play(3, 8.0, 15.0, PlayType::Pass, 2.0),
            play(2, 6.0, 10.0, PlayType::Run, 0.0),
        ];
        let s = summarize(&records);
        assert_eq!(s.plays, 4);
        assert!((s.average_yards - 3.0).abs() < 1e-9);
        assert!((s.pass_share - 0.5).abs() < 1e-9);
        assert_eq!(s.third_down_conversion, Some(0.5));
        assert_eq!(s.red_zone_average_yards, Some(1.0));
        assert_eq!(s.by_down.len(), 3);
        assert_eq!(s.by_down[&3].count, 2);
        assert_eq!(s.by_play_type[0].0, PlayType::Run);
        assert!((s.by_play_type[1].1.mean_yards - 4.0).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_has_no_rates() {
        let s = summarize(&[]);
        assert_eq!(s.plays, 0);
        assert_eq!(s.third_down_conversion, None);
        assert!(s.by_play_type.is_empty());
    }

    #[test]
    fn player_browsing() {
        let records = vec![
            with_players(play(1, 10.0, 70.0, PlayType::Run, 5.0), "KC", Some("I.Pacheco"), None),
            with_players(play(2, 5.0, 65.0, PlayType::Pass, 12.0), "KC", None, Some("T.Kelce")),
            with_players(play(1, 10.0, 53.0, PlayType::Pass, 8.0), "kc", None, Some("T.Kelce")),
            with_players(play(1, 10.0, 40.0, PlayType::Run, 3.0), "BUF", Some("J.Cook"), None),
        ];
        assert_eq!(players_for_team(&records, "KC"), vec!["I.Pacheco", "T.Kelce"]);
        assert_eq!(player_plays(&records, "KC", "t.kelce").len(), 2);
        assert!(player_plays(&records, "BUF", "T.Kelce").is_empty());
    }
}
