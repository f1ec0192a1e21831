//! Dialog tuning knobs, loadable from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

const MIN_TICK_MS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid dialog config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Appearance and timing of a [`crate::BusyDialog`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BusyDialogConfig {
    /// Poll period of the dialog timer.
    pub tick_period_ms: u64,
    /// Edge length of the animation frame, in points.
    pub icon_size: f32,
    pub progress_width: f32,
    pub min_width: f32,
    /// Paint "NN%" on determinate bars.
    pub show_percentage: bool,
}

impl Default for BusyDialogConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 300,
            icon_size: 24.0,
            progress_width: 240.0,
            min_width: 220.0,
            show_percentage: true,
        }
    }
}

impl BusyDialogConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(MIN_TICK_MS))
    }
}
