//! Configuration and data directory resolution.
//!
//! Resolved once at startup from: CLI `--data-dir` > `SSASSIST_DATA_DIR`
//! env > `~/.ssassist`. Settings load from `config.toml` under the data
//! dir; a missing file means defaults.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://localhost:8001";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the assistant backend.
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the data dir. A missing file yields the
    /// defaults; a malformed one is an error rather than a silent reset.
    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let path = data_dir.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}

/// Resolve the data directory.
///
/// Priority: `explicit` arg > `SSASSIST_DATA_DIR` env > `~/.ssassist`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let dir = if let Some(p) = explicit {
        p.to_path_buf()
    } else if let Ok(env_val) = std::env::var("SSASSIST_DATA_DIR") {
        PathBuf::from(env_val)
    } else {
        dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("HOME directory not found"))?
            .join(".ssassist")
    };
    Ok(dir)
}

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

pub fn transcripts_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("transcripts")
}

/// Create all required subdirectories under the data dir.
pub fn ensure_dirs(data_dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    std::fs::create_dir_all(log_dir(data_dir))?;
    std::fs::create_dir_all(transcripts_dir(data_dir))?;
    Ok(())
}
