//! Editor configuration
//!
//! Loaded from `~/.nodle/tagsync.json` when present. Every field is optional in
//! the file and falls back to the defaults in [`crate::constants`].

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Deferred re-checks allowed while a node's control list is still being built
    pub max_retries: u32,
    /// Delay between those re-checks
    pub retry_delay_ms: u64,
    /// Wait for the editor's controls-ready signal instead of polling
    pub use_ready_signal: bool,
    /// Tag seeded into fresh synchronizer nodes
    pub baseline_tag: String,
    pub frame_interval_ms: u64,
    /// Frame cap for `Editor::run_until_idle`
    pub max_idle_frames: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_retries: constants::bootstrap::MAX_RETRIES,
            retry_delay_ms: constants::bootstrap::RETRY_DELAY_MS,
            use_ready_signal: true,
            baseline_tag: constants::tag_sync::BASELINE_TAG.to_string(),
            frame_interval_ms: constants::event_loop::FRAME_INTERVAL_MS,
            max_idle_frames: constants::event_loop::MAX_IDLE_FRAMES,
        }
    }
}

impl EditorConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Default config location in the user's home directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".nodle").join("tagsync.json"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Explicit path must exist; otherwise the default location is used when present
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No editor config found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagsync.json");
        std::fs::write(&path, r#"{ "max_retries": 3, "use_ready_signal": false }"#).unwrap();

        let config = EditorConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.max_retries, 3);
        assert!(!config.use_ready_signal);
        assert_eq!(config.retry_delay(), Duration::from_millis(50));
        assert_eq!(config.baseline_tag, "prompt");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tagsync.json");
        let config = EditorConfig {
            baseline_tag: "seed".to_string(),
            ..EditorConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(EditorConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EditorConfig::load_or_default(Some(&dir.path().join("absent.json"))).is_err());
    }
}
