//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to each
//! subsystem at startup.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::camera::Facing;

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for speech recognition and synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// BCP-47 language tag passed to both the recognizer and the synthesizer.
    pub language: String,
    /// Phrases that wake the assistant.  Matched as lowercase substrings.
    pub wake_phrases: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "en-US".into(),
            wake_phrases: vec!["hey vision".into(), "hi vision".into(), "hello vision".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// DetectionConfig
// ---------------------------------------------------------------------------

/// Settings for the periodic detection loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Milliseconds between detection ticks.
    pub interval_ms: u64,
    /// Average luma below which a frame is considered totally dark.
    pub dark_threshold: f32,
    /// Average luma below which a frame is considered low light.
    pub low_light_threshold: f32,
    /// Seconds a spoken class label stays muted.
    pub cooldown_secs: u64,
    /// Distance reported for a zero-width box, in meters.
    pub max_distance_m: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            dark_threshold: 20.0,
            low_light_threshold: 50.0,
            cooldown_secs: 5,
            max_distance_m: 3.0,
        }
    }
}

impl DetectionConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Settings for the remote detection backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base URL of the detection service (e.g. `http://localhost:8500`).
    ///
    /// `None` means no backend is configured; the console harness then uses
    /// a detector that never reports anything.
    pub endpoint: Option<String>,
    /// Maximum seconds to wait for a single inference (and for a single
    /// request to the backend).
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// NavigationConfig
// ---------------------------------------------------------------------------

/// Settings for scripted navigation narration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Seconds to wait after a step finishes speaking before the next one.
    pub step_delay_secs: u64,
    /// Static map embed shown while navigating.
    pub map_embed_url: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            step_delay_secs: 5,
            map_embed_url: "https://www.openstreetmap.org/export/embed.html?bbox=72.50,23.00,72.65,23.15&layer=mapnik&marker=23.03,72.58".into(),
        }
    }
}

impl NavigationConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_secs(self.step_delay_secs)
    }
}

// ---------------------------------------------------------------------------
// CameraConfig
// ---------------------------------------------------------------------------

/// Camera selection and the resolution hint passed to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera the session starts with.
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            facing: Facing::Back,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

// ---------------------------------------------------------------------------
// ConsoleConfig
// ---------------------------------------------------------------------------

/// Settings for the stdin/stdout harness used by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Luma value (0-255) of the synthetic camera frame.
    pub frame_luma: u8,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Simulated speaking rate used to decide when an utterance finishes.
    pub words_per_minute: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            frame_luma: 128,
            frame_width: 640,
            frame_height: 480,
            words_per_minute: 180,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use vision_assist::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Recognition / synthesis settings.
    pub speech: SpeechConfig,
    /// Detection loop timing and thresholds.
    pub detection: DetectionConfig,
    /// Detection backend.
    pub model: ModelConfig,
    /// Navigation narration settings.
    pub navigation: NavigationConfig,
    /// Camera selection.
    pub camera: CameraConfig,
    /// Console harness settings (binary only).
    pub console: ConsoleConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.speech.language, default.speech.language);
        assert_eq!(config.detection.interval_ms, default.detection.interval_ms);
        assert_eq!(config.camera.facing, default.camera.facing);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.speech.language, "en-US");
        assert_eq!(cfg.speech.wake_phrases.len(), 3);
        assert_eq!(cfg.detection.interval(), Duration::from_secs(1));
        assert_eq!(cfg.detection.cooldown(), Duration::from_secs(5));
        assert_eq!(cfg.detection.dark_threshold, 20.0);
        assert_eq!(cfg.detection.low_light_threshold, 50.0);
        assert_eq!(cfg.detection.max_distance_m, 3.0);
        assert_eq!(cfg.navigation.step_delay(), Duration::from_secs(5));
        assert!(cfg.navigation.map_embed_url.starts_with("https://www.openstreetmap.org/"));
        assert_eq!(cfg.camera.facing, Facing::Back);
        assert_eq!((cfg.camera.ideal_width, cfg.camera.ideal_height), (1280, 720));
        assert!(cfg.model.endpoint.is_none());
        assert_eq!(cfg.model.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");

        let mut cfg = AppConfig::default();
        cfg.speech.wake_phrases = vec!["okay vision".into()];
        cfg.detection.interval_ms = 500;
        cfg.model.endpoint = Some("http://localhost:8500".into());
        cfg.navigation.step_delay_secs = 2;
        cfg.camera.facing = Facing::Front;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.speech.wake_phrases, vec!["okay vision".to_string()]);
        assert_eq!(loaded.detection.interval_ms, 500);
        assert_eq!(loaded.model.endpoint.as_deref(), Some("http://localhost:8500"));
        assert_eq!(loaded.navigation.step_delay_secs, 2);
        assert_eq!(loaded.camera.facing, Facing::Front);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[detection]\ncooldown_secs = 8\n").expect("write");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.detection.cooldown_secs, 8);
        assert_eq!(loaded.detection.interval_ms, 1_000);
        assert_eq!(loaded.speech.language, "en-US");
    }
}
