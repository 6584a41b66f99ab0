//! Audio preferences, persisted next to the score records.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const SETTINGS_PATH: &str = "Extras/settings.json";

const VOLUME_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            volume: 0.5,
            muted: false,
        }
    }
}

impl Settings {
    /// Load from `path`, or defaults if it is missing or broken.
    pub fn load(path: &Path) -> Self {
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Settings>(&text).map_err(|e| e.to_string()));
        match parsed {
            Ok(settings) => {
                log::info!("loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::info!("using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("settings saved");
        Ok(())
    }

    /// Volume actually sent to the mixer.
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn louder(&mut self) {
        self.volume = (self.volume + VOLUME_STEP).min(1.0);
    }

    pub fn quieter(&mut self) {
        self.volume = (self.volume - VOLUME_STEP).max(0.0);
    }

    fn sanitized(mut self) -> Self {
        if !self.volume.is_finite() {
            self.volume = Self::default().volume;
        }
        self.volume = self.volume.clamp(0.0, 1.0);
        self
    }
}
