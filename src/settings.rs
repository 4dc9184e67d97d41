//! Game settings and preferences
//!
//! Persisted separately from levels and scores as a small JSON file. Missing
//! fields take their defaults so older files keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_MSPT, EXPECTED_FRAME_MS};
use crate::leaderboard::DEFAULT_LEADERBOARD_ROWS;
use crate::sim::SimConfig;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// Milliseconds per physics tick; fixed for the whole run
    pub mspt: u32,
    /// Most ticks run in a single frame before the clock resyncs
    pub max_catch_up_ticks: u32,

    // === Scores ===
    /// Logged-in player; scores are only submitted when set
    pub username: Option<String>,
    /// Rows shown on the end-screen leaderboard
    pub leaderboard_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mspt: DEFAULT_MSPT,
            max_catch_up_ticks: default_catch_up(DEFAULT_MSPT),
            username: None,
            leaderboard_rows: DEFAULT_LEADERBOARD_ROWS,
        }
    }
}

/// Three expected frames worth of ticks
fn default_catch_up(mspt: u32) -> u32 {
    (3 * EXPECTED_FRAME_MS).div_ceil(mspt.max(1))
}

impl Settings {
    /// Settings with a different tick length and the matching catch-up cap
    pub fn with_mspt(mspt: u32) -> Self {
        let mspt = mspt.max(1);
        Self {
            mspt,
            max_catch_up_ticks: default_catch_up(mspt),
            ..Self::default()
        }
    }

    /// Physics configuration for a new run
    pub fn sim_config(&self) -> SimConfig {
        SimConfig::new(self.mspt)
    }

    /// Logged-in username, treating an empty name as anonymous
    pub fn player(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let loaded = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| serde_json::from_str::<Settings>(&json).map_err(|e| e.to_string()));

        match loaded {
            Ok(mut settings) => {
                if settings.mspt == 0 {
                    log::warn!("Ignoring mspt=0 in {}", path.display());
                    settings.mspt = DEFAULT_MSPT;
                }
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::info!("Using default settings ({}: {err})", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
