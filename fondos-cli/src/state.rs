use anyhow::{Context, Result};
use fondos_core::SessionStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// State directory: `$FONDOS_HOME`, else `~/.fondos`.
pub fn fondos_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FONDOS_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".fondos"))
}

pub fn ensure_fondos_home() -> Result<PathBuf> {
    let dir = fondos_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn session_path() -> Result<PathBuf> {
    Ok(ensure_fondos_home()?.join("session"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(ensure_fondos_home()?.join("fondos.log"))
}

/// Active user id kept as plain text in a single file.
/// A missing or blank file means nobody is logged in.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(session_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(s) => {
                let id = s.trim();
                Ok(if id.is_empty() { None } else { Some(id.to_string()) })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", self.path.display())),
        }
    }

    fn save(&self, user_id: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        fs::write(&self.path, user_id).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}
