use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;
use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "tailbuf.toml";

/// Get the default tailbuf data directory: ~/.tailbuf
pub fn get_tailbuf_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().context("Cannot determine home directory")?;
    Ok(home.join(".tailbuf"))
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the configuration.
///
/// Priority: `explicit` path, then ./tailbuf.toml, then ~/.tailbuf/config.toml,
/// then built-in defaults. Environment overrides are applied last.
///
/// The result is not validated: callers layer their own overrides on top and
/// call [`super::RingConfig::validate`] once everything is applied.
pub fn load_default(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let local_config = Path::new(CONFIG_FILE_NAME);

    let mut cfg = if let Some(path) = explicit {
        load_from_path(path)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        match get_tailbuf_data_dir().map(|d| d.join("config.toml")) {
            Ok(home_config) if home_config.exists() => load_from_path(&home_config)?,
            _ => AppConfig::default(),
        }
    };

    apply_overrides(&mut cfg, |k| std::env::var(k).ok())?;
    tracing::debug!(
        initial_size = cfg.ring.initial_size,
        max_size = cfg.ring.max_size,
        "config loaded"
    );
    Ok(cfg)
}

/// Applies `TAILBUF_*` overrides looked up through `lookup`.
pub fn apply_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = non_empty(lookup("TAILBUF_MAX_SIZE")) {
        cfg.ring.max_size = parse_size("TAILBUF_MAX_SIZE", &v)?;
    }
    if let Some(v) = non_empty(lookup("TAILBUF_INITIAL_SIZE")) {
        cfg.ring.initial_size = parse_size("TAILBUF_INITIAL_SIZE", &v)?;
    }
    if let Some(v) = non_empty(lookup("TAILBUF_LOG_LEVEL")) {
        cfg.logging.level = v;
    }
    Ok(())
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_size(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::Env {
        var,
        value: value.to_string(),
    })
}
