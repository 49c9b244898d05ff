use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::state::filter::MatchCase;

pub const CONFIG_ENV: &str = "CSVSHEET_CONFIG";
pub const OPEN_ENV: &str = "CSVSHEET_OPEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Height assumed for rows that have not been laid out yet.
    pub estimated_row_height: f64,
    /// Rows materialized beyond each edge of the viewport.
    pub overscan: usize,
    /// Viewport height used until the scroll container reports its size.
    pub viewport_extent: f64,
    pub match_case: MatchCase,
    pub export_prefix: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            estimated_row_height: 90.0,
            overscan: 5,
            viewport_extent: 720.0,
            match_case: MatchCase::Insensitive,
            export_prefix: "pattern-context".to_string(),
        }
    }
}

impl SheetConfig {
    /// Loads the file named by `CSVSHEET_CONFIG`, or defaults.
    pub fn load() -> Self {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => {
                tracing::debug!("{CONFIG_ENV} not set, using default config");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// CSV file to open at startup, if any.
pub fn startup_file() -> Option<PathBuf> {
    std::env::var_os(OPEN_ENV).map(PathBuf::from)
}
