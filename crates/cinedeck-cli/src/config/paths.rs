//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory name under the config root.
const APP_DIR: &str = "cinedeck";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// 1. `{dir}/config.toml` when `--dir` is given.
/// 2. `$XDG_CONFIG_HOME/cinedeck/config.toml` when that variable is set.
/// 3. `~/.config/cinedeck/config.toml` otherwise.
///
/// # Errors
///
/// Returns an error if neither `--dir`, `XDG_CONFIG_HOME` nor `HOME` is available.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    config_path_from(dir.map(PathBuf::as_path), xdg.as_deref(), home.as_deref())
}

fn config_path_from(dir: Option<&Path>, xdg: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(root) = xdg.filter(|p| p.is_absolute()) {
        return Ok(root.join(APP_DIR).join(CONFIG_FILE));
    }
    let home = home.context("HOME environment variable is not set")?;
    Ok(home.join(".config").join(APP_DIR).join(CONFIG_FILE))
}
