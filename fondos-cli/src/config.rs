use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_fondos_home;

pub const DEFAULT_BASE_URL: &str = "https://on395jxt36.execute-api.us-east-2.amazonaws.com/dev";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    /// Base URL every endpoint path is appended to (no trailing slash needed)
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "text" => Some(LogFormat::Text),
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSection {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            log: LogSection::default(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Apply `FONDOS_API_URL` / `LOG_FORMAT` style overrides.
    pub fn with_overrides(mut self, api_url: Option<String>, log_format: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(format) = log_format.as_deref().and_then(LogFormat::parse) {
            self.log.format = format;
        }
        self
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_fondos_home()?.join("config.toml"))
}

/// Config file plus environment overrides.
pub fn load_config() -> Result<Config> {
    let cfg = load_config_from(&config_path()?)?;
    Ok(cfg.with_overrides(
        std::env::var("FONDOS_API_URL").ok(),
        std::env::var("LOG_FORMAT").ok(),
    ))
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config()?;
    println!("# {}{}", p.display(), if p.exists() { "" } else { " (defaults)" });
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.api.base_url = "http://localhost:3000".into();
        cfg.log.format = LogFormat::Json;
        save_config_to(&cfg, &p).unwrap();
        assert_eq!(load_config_from(&p).unwrap(), cfg);
    }

    #[test]
    fn test_log_section_optional() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[api]\nbase_url = \"http://x\"\n").unwrap();
        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.api.base_url, "http://x");
        assert_eq!(cfg.log, LogSection::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::default().with_overrides(Some("http://override".into()), Some("json".into()));
        assert_eq!(cfg.api.base_url, "http://override");
        assert_eq!(cfg.log.format, LogFormat::Json);

        let cfg = Config::default().with_overrides(Some("  ".into()), Some("weird".into()));
        assert_eq!(cfg, Config::default());
    }
}
