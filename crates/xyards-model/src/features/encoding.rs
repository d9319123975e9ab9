//! Situation → feature encoding fixed at training time.
//!
//! A [`FeatureEncoding`] is the only thing that decides column order. It is
//! fitted once on the training records, stored inside the model artifact and
//! reused verbatim at inference, so the two sides cannot drift apart.
//!
//! Layout (schema version [`FEATURE_SCHEMA_VERSION`]):
//!
//! 1. the [`BASE_COLUMNS`] in declaration order;
//! 2. `formation_<category>` for each fitted formation (sorted), then
//!    `formation_unknown`;
//! 3. `personnel_<category>` likewise, then `personnel_unknown`.
//!
//! Missing optional inputs are imputed from [`ImputationDefaults`]; a
//! category that was not fitted lands in the `_unknown` column and is logged
//! as a warning.
use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median};

use crate::config::EncodingConfig;
use crate::data::{PlayRecord, PlaySituation, PlayType};
use crate::error::{Result, XyardsError};
use crate::features::vector::FeatureVector;

/// Bumped whenever the base columns or their derivation change.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

pub const BASE_COLUMNS: [&str; 18] = [
    "down",
    "ydstogo",
    "distance_to_goal",
    "is_pass",
    "is_run",
    "red_zone",
    "goal_line",
    "third_down",
    "fourth_down",
    "short_yardage",
    "long_yardage",
    "yards_per_down",
    "score_diff",
    "losing",
    "winning_big",
    "fourth_quarter",
    "first_half",
    "game_seconds_remaining",
];

/// Bucket for missing-from-vocabulary categories.
pub const FALLBACK_CATEGORY: &str = "unknown";

const DEFAULT_QUARTER: u8 = 1;
const DEFAULT_SECONDS_REMAINING: f32 = 1800.0;

/// Lower-case, and collapse every run of non-alphanumerics into `_`.
pub fn normalize_category(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Where a raw category value ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryCode {
    Known(usize),
    /// Explicitly unknown (or empty) in the input.
    Fallback,
    /// Not part of the fitted vocabulary.
    Unseen,
}

/// Sorted set of categories for one categorical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub prefix: String,
    pub categories: Vec<String>,
}

impl CategoryVocabulary {
    pub fn empty(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            categories: Vec::new(),
        }
    }

    /// Fit from raw values; returns the vocabulary and its most frequent
    /// category (ties broken by lexical order).
    pub fn fit<'a, I>(prefix: &str, values: I, min_count: usize) -> (Self, Option<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for raw in values {
            let key = normalize_category(raw);
            if key.is_empty() || key == FALLBACK_CATEGORY {
                continue;
            }
            *counts.entry(key).or_default() += 1;
        }

        let min_count = min_count.max(1);
        let mut mode: Option<(&String, usize)> = None;
        let mut categories = Vec::new();
        for (key, &count) in &counts {
            if count < min_count {
                continue;
            }
            categories.push(key.clone());
            if mode.map_or(true, |(_, best)| count > best) {
                mode = Some((key, count));
            }
        }

        let folded = counts.len() - categories.len();
        if folded > 0 {
            log::debug!(
                "{}: {} rare categories folded into '{}'",
                prefix,
                folded,
                FALLBACK_CATEGORY
            );
        }

        (
            Self {
                prefix: prefix.to_string(),
                categories,
            },
            mode.map(|(k, _)| k.clone()),
        )
    }

    pub fn lookup(&self, raw: &str) -> CategoryCode {
        let key = normalize_category(raw);
        if key.is_empty() || key == FALLBACK_CATEGORY {
            return CategoryCode::Fallback;
        }
        match self.categories.binary_search(&key) {
            Ok(idx) => CategoryCode::Known(idx),
            Err(_) => CategoryCode::Unseen,
        }
    }

    /// Number of one-hot columns, fallback included.
    pub fn width(&self) -> usize {
        self.categories.len() + 1
    }

    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(FALLBACK_CATEGORY))
            .map(move |c| format!("{}_{}", self.prefix, c))
    }

    fn write_one_hot(&self, code: CategoryCode, out: &mut [f32]) {
        out.iter_mut().for_each(|v| *v = 0.0);
        let idx = match code {
            CategoryCode::Known(i) => i,
            CategoryCode::Fallback | CategoryCode::Unseen => self.categories.len(),
        };
        out[idx] = 1.0;
    }
}

/// Values substituted for missing optional inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationDefaults {
    /// Most frequent training formation.
    pub formation: String,
    /// Most frequent training personnel grouping.
    pub personnel: String,
    pub quarter: u8,
    pub score_differential: f32,
    /// Median of the training data.
    pub game_seconds_remaining: f32,
}

impl Default for ImputationDefaults {
    fn default() -> Self {
        Self {
            formation: FALLBACK_CATEGORY.to_string(),
            personnel: FALLBACK_CATEGORY.to_string(),
            quarter: DEFAULT_QUARTER,
            score_differential: 0.0,
            game_seconds_remaining: DEFAULT_SECONDS_REMAINING,
        }
    }
}

/// An input category that fell back to the `_unknown` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnseenCategory {
    pub field: String,
    pub value: String,
}

/// Versioned mapping from [`PlaySituation`] to model input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoding {
    pub schema_version: u32,
    pub formation: CategoryVocabulary,
    pub personnel: CategoryVocabulary,
    pub defaults: ImputationDefaults,
}

impl Default for FeatureEncoding {
    fn default() -> Self {
        Self {
            schema_version: FEATURE_SCHEMA_VERSION,
            formation: CategoryVocabulary::empty("formation"),
            personnel: CategoryVocabulary::empty("personnel"),
            defaults: ImputationDefaults::default(),
        }
    }
}

impl FeatureEncoding {
    /// Fit vocabularies and imputation defaults on training records.
    pub fn fit(records: &[PlayRecord], config: &EncodingConfig) -> Self {
        let (formation, formation_mode) = CategoryVocabulary::fit(
            "formation",
            records
                .iter()
                .filter_map(|r| r.situation.formation.as_deref()),
            config.min_category_count,
        );
        let (personnel, personnel_mode) = CategoryVocabulary::fit(
            "personnel",
            records
                .iter()
                .filter_map(|r| r.situation.personnel.as_deref()),
            config.min_category_count,
        );

        let seconds: Vec<f64> = records
            .iter()
            .filter_map(|r| r.situation.context.game_seconds_remaining)
            .map(f64::from)
            .collect();
        let game_seconds_remaining = if seconds.is_empty() {
            DEFAULT_SECONDS_REMAINING
        } else {
            Data::new(seconds).median() as f32
        };

        let defaults = ImputationDefaults {
            formation: formation_mode.unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
            personnel: personnel_mode.unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
            quarter: DEFAULT_QUARTER,
            score_differential: 0.0,
            game_seconds_remaining,
        };

        log::debug!(
            "Fitted encoding: {} formations, {} personnel groupings, defaults {:?}",
            formation.categories.len(),
            personnel.categories.len(),
            defaults
        );

        Self {
            schema_version: FEATURE_SCHEMA_VERSION,
            formation,
            personnel,
            defaults,
        }
    }

    pub fn width(&self) -> usize {
        BASE_COLUMNS.len() + self.formation.width() + self.personnel.width()
    }

    /// Column order produced by this encoding.
    pub fn column_names(&self) -> Vec<String> {
        BASE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.formation.column_names())
            .chain(self.personnel.column_names())
            .collect()
    }

    /// Encode a single situation. Unseen categories fall back and are logged.
    pub fn encode(&self, situation: &PlaySituation) -> Result<FeatureVector> {
        let (vector, unseen) = self.encode_with_fallbacks(situation)?;
        for u in &unseen {
            log::warn!(
                "{}",
                XyardsError::UnseenCategory {
                    field: u.field.clone(),
                    value: u.value.clone(),
                }
            );
        }
        Ok(vector)
    }

    /// Like [`encode`](Self::encode), returning the fallbacks instead of
    /// logging them.
    pub fn encode_with_fallbacks(
        &self,
        situation: &PlaySituation,
    ) -> Result<(FeatureVector, Vec<UnseenCategory>)> {
        situation.validate()?;
        let mut values = vec![0.0f32; self.width()];
        let unseen = self.write_row(situation, &mut values);
        Ok((FeatureVector::new(self.column_names(), values)?, unseen))
    }

    /// Training matrix (rows follow `records`), through the same code path as
    /// single-vector encoding.
    pub fn encode_matrix(&self, records: &[PlayRecord]) -> Result<Array2<f32>> {
        let width = self.width();
        let mut data = vec![0.0f32; records.len() * width];
        for (record, row) in records.iter().zip(data.chunks_mut(width)) {
            self.write_row(&record.situation, row);
        }
        Array2::from_shape_vec((records.len(), width), data).map_err(|e| {
            XyardsError::SchemaMismatch {
                expected: width,
                found: width,
                detail: e.to_string(),
            }
        })
    }

    fn write_row(&self, s: &PlaySituation, out: &mut [f32]) -> Vec<UnseenCategory> {
        let down = f32::from(s.down);
        let distance = s.distance;
        let yardline = s.yardline_100;
        let quarter = s.context.quarter.unwrap_or(self.defaults.quarter);
        let score = s
            .context
            .score_differential
            .unwrap_or(self.defaults.score_differential);
        let seconds = s
            .context
            .game_seconds_remaining
            .unwrap_or(self.defaults.game_seconds_remaining);

        let base = [
            down,
            distance,
            yardline,
            flag(s.play_type == PlayType::Pass),
            flag(s.play_type == PlayType::Run),
            flag(yardline <= 20.0),
            flag(yardline <= 5.0),
            flag(s.down == 3),
            flag(s.down == 4),
            flag(distance <= 3.0),
            flag(distance >= 8.0),
            distance / down.max(1.0),
            score,
            flag(score < 0.0),
            flag(score > 14.0),
            flag(quarter == 4),
            flag(quarter <= 2),
            seconds,
        ];
        out[..BASE_COLUMNS.len()].copy_from_slice(&base);

        let mut unseen = Vec::new();
        let (formation_out, personnel_out) =
            out[BASE_COLUMNS.len()..].split_at_mut(self.formation.width());

        let formation = s
            .formation
            .as_deref()
            .unwrap_or(self.defaults.formation.as_str());
        let code = self.formation.lookup(formation);
        if code == CategoryCode::Unseen {
            unseen.push(UnseenCategory {
                field: "formation".to_string(),
                value: formation.to_string(),
            });
        }
        self.formation.write_one_hot(code, formation_out);

        let personnel = s
            .personnel
            .as_deref()
            .unwrap_or(self.defaults.personnel.as_str());
        let code = self.personnel.lookup(personnel);
        if code == CategoryCode::Unseen {
            unseen.push(UnseenCategory {
                field: "personnel".to_string(),
                value: personnel.to_string(),
            });
        }
        self.personnel.write_one_hot(code, personnel_out);

        unseen
    }
}

fn flag(cond: bool) -> f32 {
    if cond {
        1.0
    } else {
        0.0
    }
}
