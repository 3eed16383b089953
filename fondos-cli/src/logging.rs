//! Logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the filter comes from `[log] level` in
//! config. One-shot commands write to stderr. The TUI owns the terminal, so it
//! logs to `~/.fondos/fondos.log` instead.

use anyhow::{Context, Result, anyhow};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::{LogFormat, LogSection};

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn env_filter(default_level: &str) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(from_env.as_deref(), default_level)
}

/// First valid of: `RUST_LOG` directives, the configured level, `info`.
fn filter_from(directives: Option<&str>, default_level: &str) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(default_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

pub fn init_logging(section: &LogSection, default_level: &str, target: LogTarget) -> Result<()> {
    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(writer)
        .with_ansi(ansi);

    let res = match section.format {
        LogFormat::Text => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    res.map_err(|e| anyhow!("init logging: {e}"))
}
