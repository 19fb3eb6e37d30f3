use crate::app::filter::ExclusionSet;
use crate::app::models::{Mode, RunConfig};
use anyhow::{bail, Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_EXCLUDES: [&str; 2] = [".venv", ".git"];

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub log_level: Option<String>,
    #[serde(default)]
    pub revert_symlinks: RevertSymlinksSection,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RevertSymlinksSection {
    pub excludes: Option<Vec<String>>,
    #[serde(rename = "move", default)]
    pub move_targets: bool,
}

fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("twlib").join("config.toml"))
}

/// An explicit path must exist; the default location is optional.
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path()?;
            if !path.exists() {
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config at {:?}", config_path))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", config_path))
}

/// `--verbose` wins, then the file, then info.
pub fn resolve_log_level(verbose: bool, file: &ConfigFile) -> Result<LevelFilter> {
    if verbose {
        return Ok(LevelFilter::Debug);
    }
    match file.log_level.as_deref() {
        Some(level) => {
            LevelFilter::from_str(level).with_context(|| format!("Invalid log_level: {}", level))
        }
        None => Ok(LevelFilter::Info),
    }
}

/// CLI excludes replace the configured ones, which replace the built-in pair.
pub fn resolve_revert_config(
    root: PathBuf,
    cli_excludes: Vec<String>,
    dry_run: bool,
    move_targets: bool,
    file: &ConfigFile,
) -> Result<RunConfig> {
    if !root.exists() {
        bail!("Directory does not exist: {}", root.display());
    }
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let excludes = if !cli_excludes.is_empty() {
        ExclusionSet::new(cli_excludes)
    } else if let Some(configured) = &file.revert_symlinks.excludes {
        ExclusionSet::new(configured.iter().cloned())
    } else {
        ExclusionSet::new(DEFAULT_EXCLUDES)
    };

    let mode = if move_targets || file.revert_symlinks.move_targets {
        Mode::Move
    } else {
        Mode::Copy
    };

    Ok(RunConfig {
        root,
        excludes,
        dry_run,
        mode,
    })
}
