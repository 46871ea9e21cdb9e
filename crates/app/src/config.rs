use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "extrato.toml";
pub const DEFAULT_TOP_N: usize = 50;

/// Runner settings read from `extrato.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the statement files.
    pub input_dir: PathBuf,
    /// Directory the CSV tables are written to.
    pub output_dir: PathBuf,
    /// Rows kept in the top-description tables.
    pub top_n: usize,
    /// Category table in TOML; the built-in table when unset.
    pub rules_file: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("pdfs"),
            output_dir: PathBuf::from("saida_analise"),
            top_n: DEFAULT_TOP_N,
            rules_file: None,
            log_filter: "info".to_string(),
        }
    }
}

/// Reads the config at `path`; a missing file gives the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Writes a default config unless one exists. Returns whether a file was written.
pub fn init_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    save_config(path, &Config::default())?;
    Ok(true)
}
