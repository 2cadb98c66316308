//! Player settings and preferences
//!
//! Persisted as JSON next to the app data. Everything a round needs from
//! here is copied into a `SessionConfig` when the round is created.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::round::Prompt;
use crate::session::{ConfigError, SessionConfig};

/// Settings file could not be read or written
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tilt sensitivity presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Sensitivity {
    /// Needs a deliberate nod (~50 degrees)
    Low,
    #[default]
    Medium,
    /// Registers small tilts (~30 degrees)
    High,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Low => "Low",
            Sensitivity::Medium => "Medium",
            Sensitivity::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Sensitivity::Low),
            "medium" | "med" => Some(Sensitivity::Medium),
            "high" => Some(Sensitivity::High),
            _ => None,
        }
    }

    /// `(trigger, reset)` thresholds on the z axis
    pub fn thresholds(&self) -> (f32, f32) {
        match self {
            Sensitivity::Low => (0.75, 0.35),
            Sensitivity::Medium => (DEFAULT_TRIGGER_THRESHOLD, DEFAULT_RESET_THRESHOLD),
            Sensitivity::High => (0.50, 0.30),
        }
    }
}

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round ===
    /// Round length in seconds
    pub round_secs: u32,
    pub sensitivity: Sensitivity,
    /// Explicit thresholds, overriding the preset when both are set
    pub trigger_threshold: Option<f32>,
    pub reset_threshold: Option<f32>,
    /// Accelerometer update interval
    pub sample_interval_ms: u32,
    /// Wait for the video file after the round ends
    pub recorder_failsafe_ms: u64,

    // === Video ===
    /// Record the front camera during play
    pub record_video: bool,

    // === Audio ===
    pub enable_music: bool,
    pub enable_sfx: bool,
    pub enable_vibration: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music multiplier while a round is playing
    pub play_volume_modifier: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_secs: DEFAULT_ROUND_SECS,
            sensitivity: Sensitivity::Medium,
            trigger_threshold: None,
            reset_threshold: None,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            recorder_failsafe_ms: RECORDER_FAILSAFE_MS,

            record_video: true,

            enable_music: false,
            enable_sfx: true,
            enable_vibration: true,
            music_volume: DEFAULT_MUSIC_VOLUME,
            sfx_volume: DEFAULT_SFX_VOLUME,
            play_volume_modifier: PLAY_VOLUME_MODIFIER,
        }
    }
}

impl Settings {
    /// Create settings from a sensitivity preset
    pub fn from_preset(preset: Sensitivity) -> Self {
        Self {
            sensitivity: preset,
            ..Self::default()
        }
    }

    /// Switch preset and drop any manual threshold overrides
    pub fn apply_preset(&mut self, preset: Sensitivity) {
        self.sensitivity = preset;
        self.trigger_threshold = None;
        self.reset_threshold = None;
    }

    /// Thresholds in effect: the overrides if both are set, else the preset
    pub fn effective_thresholds(&self) -> (f32, f32) {
        match (self.trigger_threshold, self.reset_threshold) {
            (Some(trigger), Some(reset)) => (trigger, reset),
            _ => self.sensitivity.thresholds(),
        }
    }

    /// Build the configuration for one round over `pool`
    pub fn session_config(&self, pool: Vec<Prompt>, seed: u64) -> Result<SessionConfig, ConfigError> {
        let (trigger_threshold, reset_threshold) = self.effective_thresholds();
        let config = SessionConfig {
            pool,
            duration_secs: self.round_secs,
            trigger_threshold,
            reset_threshold,
            sample_interval_ms: self.sample_interval_ms,
            failsafe_ms: self.recorder_failsafe_ms,
            record_video: self.record_video,
            sound_effects: self.enable_sfx,
            sfx_volume: self.sfx_volume,
            haptics: self.enable_vibration,
            music: self.enable_music,
            music_volume: self.music_volume,
            play_volume: self.play_volume_modifier,
            idle_volume: IDLE_VOLUME_MODIFIER,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read settings from `path`
    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Read settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Write settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tilt-charades-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_presets_are_valid_configs() {
        for preset in [Sensitivity::Low, Sensitivity::Medium, Sensitivity::High] {
            let settings = Settings::from_preset(preset);
            assert!(settings.session_config(Vec::new(), 1).is_ok(), "{}", preset.as_str());
            assert_eq!(Sensitivity::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(Sensitivity::from_str("med"), Some(Sensitivity::Medium));
        assert_eq!(Sensitivity::from_str("extreme"), None);
    }

    #[test]
    fn test_overrides_need_both_thresholds() {
        let mut settings = Settings {
            trigger_threshold: Some(0.7),
            ..Default::default()
        };
        assert_eq!(settings.effective_thresholds(), Sensitivity::Medium.thresholds());

        settings.reset_threshold = Some(0.4);
        assert_eq!(settings.effective_thresholds(), (0.7, 0.4));

        settings.apply_preset(Sensitivity::High);
        assert_eq!(settings.effective_thresholds(), (0.50, 0.30));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let settings = Settings {
            trigger_threshold: Some(0.3),
            reset_threshold: Some(0.6),
            ..Default::default()
        };
        assert!(matches!(
            settings.session_config(Vec::new(), 0),
            Err(ConfigError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn test_session_config_carries_preferences() {
        let settings = Settings {
            round_secs: 45,
            enable_sfx: false,
            record_video: false,
            ..Default::default()
        };
        let config = settings
            .session_config(vec![Prompt::from("Arepa")], 9)
            .unwrap();
        assert_eq!(config.duration_secs, 45);
        assert!(!config.sound_effects);
        assert!(!config.record_video);
        assert_eq!(config.seed, 9);
        assert_eq!(config.pool.len(), 1);
    }

    #[test]
    fn test_session_config_carries_audio() {
        let settings = Settings {
            enable_music: true,
            music_volume: 0.8,
            sfx_volume: 0.3,
            ..Default::default()
        };
        let config = settings.session_config(Vec::new(), 0).unwrap();
        assert!(config.music);
        assert_eq!(config.music_volume, 0.8);
        assert_eq!(config.sfx_volume, 0.3);
        assert_eq!(config.feedback_for(true).volume, 0.3);

        let loud = Settings {
            sfx_volume: 1.2,
            ..Default::default()
        };
        assert_eq!(
            loud.session_config(Vec::new(), 0).unwrap_err(),
            ConfigError::InvalidVolume(1.2)
        );
    }

    #[test]
    fn test_failsafe_setting_is_bounded() {
        let settings = Settings {
            recorder_failsafe_ms: u64::MAX,
            ..Default::default()
        };
        assert_eq!(
            settings.session_config(Vec::new(), 0).unwrap_err(),
            ConfigError::InvalidFailsafe(u64::MAX)
        );
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let settings = Settings {
            round_secs: 60,
            sensitivity: Sensitivity::High,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_or_corrupt_file_uses_defaults() {
        let missing = temp_path("missing");
        assert!(matches!(Settings::try_load(&missing), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_from(&missing), Settings::default());

        let corrupt = temp_path("corrupt");
        fs::write(&corrupt, "{ not json").unwrap();
        assert!(matches!(Settings::try_load(&corrupt), Err(SettingsError::Json(_))));
        assert_eq!(Settings::load_from(&corrupt), Settings::default());
        let _ = fs::remove_file(&corrupt);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"round_secs": 30}"#).unwrap();
        assert_eq!(settings.round_secs, 30);
        assert_eq!(settings.sensitivity, Sensitivity::Medium);
    }
}
