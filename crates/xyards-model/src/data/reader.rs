//! Play-by-play CSV/TSV reader.
//!
//! Column names follow the nflfastR export; a few common aliases are
//! accepted for the optional fields. Rows that cannot be used are skipped
//! and counted in the [`IngestReport`]; a missing mandatory column aborts the
//! whole read.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::Serialize;

use crate::data::play::{GameContext, PlayParticipants, PlayRecord, PlaySituation, PlayType};
use crate::error::{Result, XyardsError};

pub const REQUIRED_COLUMNS: [&str; 5] = ["down", "ydstogo", "yardline_100", "yards_gained", "play_type"];

const QUARTER_COLUMNS: [&str; 2] = ["quarter", "qtr"];
const SCORE_COLUMNS: [&str; 2] = ["score_differential", "score_diff"];
const SECONDS_COLUMNS: [&str; 1] = ["game_seconds_remaining"];
const FORMATION_COLUMNS: [&str; 2] = ["formation", "offense_formation"];
const PERSONNEL_COLUMNS: [&str; 2] = ["personnel_offense", "offense_personnel"];
const POSTEAM_COLUMNS: [&str; 1] = ["posteam"];
const RUSHER_COLUMNS: [&str; 1] = ["rusher_player_name"];
const RECEIVER_COLUMNS: [&str; 1] = ["receiver_player_name"];

/// Configuration for reading play-by-play files.
#[derive(Debug, Clone)]
pub struct PlayReaderConfig {
    /// Field delimiter. When `None` it is inferred from the file extension
    /// (`.tsv` → tab, anything else → comma).
    pub delimiter: Option<u8>,
    /// Drop rows outside the plausible ranges (yards −30..=99, distance
    /// 1..=30, down 1..=4, yardline 0..=100).
    pub filter_outliers: bool,
}

impl Default for PlayReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            filter_outliers: true,
        }
    }
}

/// What happened to each row of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub rows_read: usize,
    pub kept: usize,
    pub skipped_missing: usize,
    /// Rows whose situation is out of range (distance 0, yardline past the
    /// goal line) and survived the outlier filter, e.g. with it disabled.
    pub skipped_invalid: usize,
    pub filtered_play_type: usize,
    pub filtered_outlier: usize,
}

/// Parsed plays ready for encoding.
#[derive(Debug)]
pub struct PlayData {
    pub records: Vec<PlayRecord>,
    pub report: IngestReport,
}

/// Read a play-by-play file with the default configuration.
pub fn read_plays<P: AsRef<Path>>(path: P) -> Result<PlayData> {
    read_plays_with_config(path, &PlayReaderConfig::default())
}

pub fn read_plays_with_config<P: AsRef<Path>>(path: P, config: &PlayReaderConfig) -> Result<PlayData> {
    let path = path.as_ref();
    let delimiter = config.delimiter.unwrap_or_else(|| delimiter_for(path));
    let file = File::open(path)?;
    log::debug!("Reading plays from {}", path.display());
    read_plays_from(file, delimiter, config)
}

/// Read plays from any byte source.
pub fn read_plays_from<R: Read>(source: R, delimiter: u8, config: &PlayReaderConfig) -> Result<PlayData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    let mut report = IngestReport::default();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        report.rows_read += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping malformed row {}: {}", row, e);
                report.skipped_missing += 1;
                continue;
            }
        };

        match columns.parse_row(&record, row, config.filter_outliers) {
            Ok(RowOutcome::Keep(play)) => {
                records.push(play);
                report.kept += 1;
            }
            Ok(RowOutcome::OtherPlayType) => report.filtered_play_type += 1,
            Ok(RowOutcome::Outlier) => report.filtered_outlier += 1,
            Ok(RowOutcome::Invalid(reason)) => {
                log::debug!("Skipping row {}: {}", row, reason);
                report.skipped_invalid += 1;
            }
            Err(e) => {
                log::debug!("Skipping row: {}", e);
                report.skipped_missing += 1;
            }
        }
    }

    if report.skipped_missing > 0 {
        log::warn!(
            "Skipped {} of {} rows with missing or unparseable required fields",
            report.skipped_missing,
            report.rows_read
        );
    }
    if report.skipped_invalid > 0 {
        log::warn!(
            "Skipped {} of {} rows with an invalid game situation",
            report.skipped_invalid,
            report.rows_read
        );
    }
    log::info!(
        "Loaded {} plays ({} non run/pass, {} outliers filtered)",
        report.kept,
        report.filtered_play_type,
        report.filtered_outlier
    );

    Ok(PlayData { records, report })
}

fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("tsv") => b'\t',
        _ => b',',
    }
}

fn csv_error(e: csv::Error) -> XyardsError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => XyardsError::Io(io),
        other => XyardsError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{:?}", other),
        )),
    }
}

enum RowOutcome {
    Keep(PlayRecord),
    OtherPlayType,
    Outlier,
    Invalid(XyardsError),
}

struct ColumnIndex {
    down: usize,
    ydstogo: usize,
    yardline: usize,
    yards_gained: usize,
    play_type: usize,
    quarter: Option<usize>,
    score: Option<usize>,
    seconds: Option<usize>,
    formation: Option<usize>,
    personnel: Option<usize>,
    posteam: Option<usize>,
    rusher: Option<usize>,
    receiver: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let required = |name: &str| {
            find_column(headers, name).ok_or_else(|| XyardsError::MissingRequiredField {
                field: name.to_string(),
                row: None,
            })
        };

        Ok(Self {
            down: required("down")?,
            ydstogo: required("ydstogo")?,
            yardline: required("yardline_100")?,
            yards_gained: required("yards_gained")?,
            play_type: required("play_type")?,
            quarter: find_any_column(headers, &QUARTER_COLUMNS),
            score: find_any_column(headers, &SCORE_COLUMNS),
            seconds: find_any_column(headers, &SECONDS_COLUMNS),
            formation: find_any_column(headers, &FORMATION_COLUMNS),
            personnel: find_any_column(headers, &PERSONNEL_COLUMNS),
            posteam: find_any_column(headers, &POSTEAM_COLUMNS),
            rusher: find_any_column(headers, &RUSHER_COLUMNS),
            receiver: find_any_column(headers, &RECEIVER_COLUMNS),
        })
    }

    fn parse_row(&self, record: &StringRecord, row: usize, filter_outliers: bool) -> Result<RowOutcome> {
        let required_number = |idx: usize, field: &str| -> Result<f32> {
            cell(record, Some(idx))
                .and_then(|v| v.parse::<f32>().ok())
                .filter(|v| v.is_finite())
                .ok_or_else(|| XyardsError::MissingRequiredField {
                    field: field.to_string(),
                    row: Some(row),
                })
        };

        let play_type_raw = cell(record, Some(self.play_type)).ok_or_else(|| {
            XyardsError::MissingRequiredField {
                field: "play_type".to_string(),
                row: Some(row),
            }
        })?;
        let play_type = match play_type_raw.parse::<PlayType>() {
            Ok(pt) => pt,
            Err(_) => return Ok(RowOutcome::OtherPlayType),
        };

        let down = required_number(self.down, "down")?;
        let distance = required_number(self.ydstogo, "ydstogo")?;
        let yardline = required_number(self.yardline, "yardline_100")?;
        let yards_gained = required_number(self.yards_gained, "yards_gained")?;

        if filter_outliers && is_outlier(down, distance, yardline, yards_gained) {
            return Ok(RowOutcome::Outlier);
        }
        let context = GameContext {
            quarter: optional_number(record, self.quarter).map(|q| q.round().clamp(1.0, 5.0) as u8),
            score_differential: optional_number(record, self.score),
            game_seconds_remaining: optional_number(record, self.seconds),
        };

        let situation = PlaySituation {
            down: down.round() as u8,
            distance,
            yardline_100: yardline,
            play_type,
            formation: cell(record, self.formation).map(str::to_string),
            personnel: cell(record, self.personnel).map(str::to_string),
            context,
        };
        if let Err(e) = situation.validate() {
            return Ok(RowOutcome::Invalid(e));
        }

        let participants = PlayParticipants {
            posteam: cell(record, self.posteam).map(str::to_string),
            rusher: cell(record, self.rusher).map(str::to_string),
            receiver: cell(record, self.receiver).map(str::to_string),
        };

        Ok(RowOutcome::Keep(PlayRecord {
            situation,
            yards_gained,
            participants,
        }))
    }
}

fn is_outlier(down: f32, distance: f32, yardline: f32, yards_gained: f32) -> bool {
    !(-30.0..=99.0).contains(&yards_gained)
        || distance <= 0.0
        || distance > 30.0
        || !(1.0..=4.0).contains(&down)
        || !(0.0..=100.0).contains(&yardline)
}

/// Non-empty trimmed cell, treating the usual NA spellings as missing.
fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    let value = record.get(idx?)?.trim();
    match value {
        "" | "NA" | "na" | "NaN" | "nan" | "null" | "None" => None,
        v => Some(v),
    }
}

fn optional_number(record: &StringRecord, idx: Option<usize>) -> Option<f32> {
    cell(record, idx)
        .and_then(|v| v.parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn find_any_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| find_column(headers, name))
}
