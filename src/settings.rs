//! Game settings and preferences
//!
//! Persisted as JSON, separately from the progress save.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::BLOCK_MOVE_TIME;

/// Default settings file name
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Largest frame skip; a tick must stay shorter than one block slide
pub const MAX_FRAME_SKIP: u8 = (BLOCK_MOVE_TIME - 2) as u8;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound effect volume (0 - 100)
    pub sfx_volume: u8,
    /// Music volume (0 - 100)
    pub music_volume: u8,
    pub fullscreen: bool,
    /// Frames skipped per update (0 - `MAX_FRAME_SKIP`); every tick advances
    /// `frame_skip + 1` steps
    pub frame_skip: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 100,
            music_volume: 100,
            fullscreen: false,
            frame_skip: 0,
        }
    }
}

impl Settings {
    pub fn set_sfx_volume(&mut self, volume: i32) {
        self.sfx_volume = volume.clamp(0, 100) as u8;
    }

    pub fn set_music_volume(&mut self, volume: i32) {
        self.music_volume = volume.clamp(0, 100) as u8;
    }

    pub fn set_frame_skip(&mut self, frames: i32) {
        self.frame_skip = frames.clamp(0, MAX_FRAME_SKIP as i32) as u8;
    }

    /// Game steps per simulation tick, always below `BLOCK_MOVE_TIME`
    pub fn step(&self) -> i32 {
        self.frame_skip.min(MAX_FRAME_SKIP) as i32 + 1
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("Using default settings");
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&json) {
            Ok(mut settings) => {
                // Out-of-range values from hand-edited files
                settings.set_sfx_volume(settings.sfx_volume as i32);
                settings.set_music_volume(settings.music_volume as i32);
                settings.set_frame_skip(settings.frame_skip as i32);
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring malformed settings in {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }
}
