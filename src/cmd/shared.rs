/*!
shared.rs - shared helpers for subcommands.

Focus:
  - split_csv / csv_filter: comma separated flag values -> lists
  - parse_limit: lenient numeric coercion for `--limit`
  - parse_inline_args / load_args_file: tool arguments (JSON, or YAML files)
*/

use std::path::Path;

use serde_json::Value;

use crate::error::CliError;

/* ---- List Flags ---- */

/// Split a comma separated flag value; segments are trimmed and empty ones
/// dropped.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `split_csv` for an optional flag. A flag that yields no segments counts
/// as absent.
pub fn csv_filter(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(split_csv).filter(|v| !v.is_empty())
}

/* ---- Numeric Flags ---- */

/// Coerce `--limit`. Non-numeric and non-finite values are dropped (treated
/// as if the flag was never given). Page sizes are unsigned, so negative
/// values are dropped too and fractions truncate.
pub fn parse_limit(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n.min(f64::from(u32::MAX)) as u32),
        Ok(n) if n.is_finite() => {
            tracing::warn!(value = raw, "ignoring negative --limit");
            None
        }
        _ => {
            tracing::warn!(value = raw, "ignoring non-numeric --limit");
            None
        }
    }
}

/* ---- Tool Arguments ---- */

/// Parse the inline `--args` JSON.
pub fn parse_inline_args(raw: &str) -> Result<Value, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::InvalidArguments {
        source_name: "--args".to_string(),
        reason: e.to_string(),
    })
}

/// Load `--args-file`. `.yaml` / `.yml` files are read as YAML and converted,
/// everything else must be JSON.
pub fn load_args_file(path: &Path) -> Result<Value, CliError> {
    let source_name = format!("--args-file {}", path.display());
    let invalid = |reason: String| CliError::InvalidArguments {
        source_name: source_name.clone(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let lower = path.to_string_lossy().to_ascii_lowercase();

    if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        let yaml_v: serde_yaml::Value =
            serde_yaml::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
        serde_json::to_value(yaml_v).map_err(|e| invalid(e.to_string()))
    } else {
        serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))
    }
}

/* ---- Tests ---- */
