use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;

use xyards_model::predict::{default_model_path, global_cache, Predictor};
use xyards_model::XyardsError;

pub fn validate_tsv_or_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("File must have a .tsv or .csv extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// `--model`, then `XYARDS_MODEL`, then the default artifact location.
pub fn resolve_model_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("model")
        .cloned()
        .unwrap_or_else(default_model_path)
}

/// Shared predictor for this process.
///
/// A column mismatch found while loading means the artifact is stale, so it
/// is reported like any other unusable artifact.
pub fn load_predictor(path: &Path) -> Result<Arc<Predictor>> {
    let cache = global_cache(Some(path));
    cache
        .get()
        .map_err(|err| match err {
            XyardsError::SchemaMismatch { .. } => XyardsError::ModelArtifactCorrupt {
                path: cache.path().to_path_buf(),
                reason: err.to_string(),
            },
            other => other,
        })
        .with_context(|| format!("Failed to load model from {}", cache.path().display()))
}

/// The library error behind an anyhow chain, if any.
pub fn model_error(err: &anyhow::Error) -> Option<&XyardsError> {
    err.chain().find_map(|e| e.downcast_ref::<XyardsError>())
}

pub fn setup_instructions(err: &XyardsError) -> String {
    format!(
        "No usable expected-yards model: {}\n\n\
         Train one first:\n\
         \x20   xyards train config.json -d play_by_play.csv -o models/expected_yards_model.json\n\n\
         Run `xyards train` without arguments to print a configuration template,\n\
         and point --model or XYARDS_MODEL at the trained artifact.",
        err
    )
}

pub fn parse_list<T, F>(raw: &str, parse: F) -> Result<Vec<T>>
where
    F: Fn(&str) -> std::result::Result<T, XyardsError>,
{
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse(s).map_err(anyhow::Error::from))
        .collect()
}
