use crate::sessions::SessionsData;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// TOML file holding the whole tracker
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the store; a missing or empty file yields an empty store
    pub fn load(&self) -> Result<SessionsData> {
        if !self.file_path.exists() {
            info!(
                "{} does not exist yet, starting empty",
                self.file_path.display()
            );
            return Ok(SessionsData::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("failed to read {}", self.file_path.display()))?;
        if content.trim().is_empty() {
            return Ok(SessionsData::new());
        }
        let data: SessionsData = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.file_path.display()))?;
        debug!(
            "loaded {} song(s), {} task(s) from {}",
            data.songs().len(),
            data.tasks().len(),
            self.file_path.display()
        );
        Ok(data)
    }

    pub fn save(&self, data: &SessionsData) -> Result<()> {
        let content = toml::to_string_pretty(data).context("failed to serialize sessions data")?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("failed to write {}", self.file_path.display()))?;
        debug!("saved {}", self.file_path.display());
        Ok(())
    }
}
