//! Pricing defaults for the binary.
//!
//! Values are layered: built-in defaults, then `defaults.json` in the config
//! directory, then command-line flags (which clap fills from the environment
//! when not given).

use std::path::{Path, PathBuf};

use tracing::debug;
use treequote_engine::PricingDefaults;

use crate::error::{CliError, Result};
use crate::files::read_json_optional;

/// Name of the defaults file inside the config directory.
pub const DEFAULTS_FILE: &str = "defaults.json";

/// Returns the config directory, `~/.treequote` unless overridden.
pub fn config_dir(overridden: Option<&Path>) -> PathBuf {
    overridden.map(Path::to_path_buf).unwrap_or_else(|| {
        dirs::home_dir()
            .map(|h| h.join(".treequote"))
            .unwrap_or_else(|| PathBuf::from(".treequote"))
    })
}

/// Loads pricing defaults from `dir`, falling back to built-in values when
/// the file is absent.
pub fn load_defaults(dir: &Path) -> Result<PricingDefaults> {
    let path = dir.join(DEFAULTS_FILE);
    match read_json_optional::<PricingDefaults>(&path)? {
        Some(defaults) => {
            defaults
                .validate()
                .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
            debug!(path = %path.display(), "Loaded pricing defaults");
            Ok(defaults)
        }
        None => Ok(PricingDefaults::default()),
    }
}

/// Applies flag overrides on top of loaded defaults and checks the result.
pub fn resolve_defaults(
    mut defaults: PricingDefaults,
    margin: Option<f64>,
    buffer: Option<f64>,
) -> Result<PricingDefaults> {
    if let Some(margin) = margin {
        defaults = defaults.with_margin_percent(margin);
    }
    if let Some(buffer) = buffer {
        defaults = defaults.with_buffer_fraction(buffer);
    }
    defaults
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(defaults)
}
