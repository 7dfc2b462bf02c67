//! Data directory, configuration and logging for the native CLI

use anyhow::{Context, Result};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use espresso_core::Config;

const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "espresso.log";
pub const NOTES_FILE: &str = "notes.json";

/// Get the ~/.espresso directory path
pub fn default_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".espresso"))
}

/// Load `config.json` from `dir`; a missing file means defaults
pub fn load_config(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Config::from_json(&json).with_context(|| format!("Invalid config in {}", path.display()))
}

/// Resolve where notes live: `ESPRESSO_DIR`, then the config's `data_dir`,
/// then the directory the config was read from. Creates it if needed.
pub fn data_dir(config_dir: &Path, config: &Config) -> Result<PathBuf> {
    let dir = env::var_os("ESPRESSO_DIR")
        .map(PathBuf::from)
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| config_dir.to_path_buf());
    ensure_dir(&dir)?;
    Ok(dir)
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}

/// Send log output to `espresso.log`; the terminal belongs to the UI
pub fn init_logging(dir: &Path) -> Result<()> {
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
