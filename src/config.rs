//! Configuration management for the gesture controller

use crate::{
    constants::{
        DEFAULT_AMBIGUITY_MARGIN, DEFAULT_COOLDOWN_SECS, DEFAULT_CURL_THRESHOLD,
        DEFAULT_MATCH_THRESHOLD, DEFAULT_REQUIRED_STABILITY, DEFAULT_RIGHT_CLICK_COOLDOWN_SECS,
        DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_SMOOTHING_FACTOR,
        DEFAULT_STATUS_CLEAR_SECS,
    },
    filters::{create_filter, CursorFilter},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier and stability settings
    pub recognition: RecognitionConfig,

    /// Action trigger settings
    pub dispatch: DispatchConfig,

    /// Smart mouse settings
    pub smart_mouse: SmartMouseConfig,

    /// Target screen
    pub screen: ScreenConfig,

    /// File locations
    pub storage: StorageConfig,
}

/// Classifier and stability settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Maximum nearest-sample distance accepted as a match (radians)
    pub match_threshold: f64,

    /// Minimum gap between the best and second-best label
    pub ambiguity_margin: f64,

    /// Consecutive frames before a gesture is confirmed
    pub required_stability: u32,
}

/// Action trigger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Minimum seconds between one-shot actions
    pub cooldown_secs: f64,

    /// Seconds before the last-action status text is cleared
    pub status_clear_secs: f64,
}

/// Smart mouse settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartMouseConfig {
    /// Curl distance below which a finger counts as curled
    pub curl_threshold: f64,

    /// Cursor smoothing filter: `exponential` or `none`
    pub filter: String,

    /// Weight kept from the previous cursor position (0 = no smoothing)
    pub smoothing_factor: f64,

    /// Minimum seconds between right clicks
    pub right_click_cooldown_secs: f64,

    /// Treat the camera image as a mirror
    pub mirror_x: bool,
}

/// Target screen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Recorded gesture samples
    pub gestures_file: PathBuf,

    /// Gesture to action bindings
    pub bindings_file: PathBuf,

    /// Reference images, one directory per gesture
    pub samples_dir: PathBuf,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            ambiguity_margin: DEFAULT_AMBIGUITY_MARGIN,
            required_stability: DEFAULT_REQUIRED_STABILITY,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            status_clear_secs: DEFAULT_STATUS_CLEAR_SECS,
        }
    }
}

impl Default for SmartMouseConfig {
    fn default() -> Self {
        Self {
            curl_threshold: DEFAULT_CURL_THRESHOLD,
            filter: "exponential".to_string(),
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            right_click_cooldown_secs: DEFAULT_RIGHT_CLICK_COOLDOWN_SECS,
            mirror_x: true,
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            gestures_file: PathBuf::from("gestures.json"),
            bindings_file: PathBuf::from("action_config.json"),
            samples_dir: PathBuf::from("samples"),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::ConfigError`] if it
    /// does not parse.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// [`Error::ConfigError`] if the text does not parse.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// [`Error::ConfigError`] on serialization failure, [`Error::Io`] on write failure.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the cursor smoothing filter from configuration
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for an unknown filter or bad smoothing factor.
    pub fn create_cursor_filter(&self) -> Result<Box<dyn CursorFilter>> {
        match self.smart_mouse.filter.to_lowercase().as_str() {
            "exponential" => create_filter(&format!("exponential:{}", self.smart_mouse.smoothing_factor)),
            name => create_filter(name),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// [`Error::ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        let rec = &self.recognition;
        if !(rec.match_threshold.is_finite() && rec.match_threshold > 0.0) {
            return Err(Error::ConfigError("Match threshold must be positive".to_string()));
        }
        if !(rec.ambiguity_margin.is_finite() && rec.ambiguity_margin >= 0.0) {
            return Err(Error::ConfigError(
                "Ambiguity margin must be non-negative".to_string(),
            ));
        }
        if rec.required_stability == 0 {
            return Err(Error::ConfigError(
                "Required stability must be at least 1 frame".to_string(),
            ));
        }

        for (name, secs) in [
            ("Cooldown", self.dispatch.cooldown_secs),
            ("Status clear delay", self.dispatch.status_clear_secs),
            ("Right click cooldown", self.smart_mouse.right_click_cooldown_secs),
        ] {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err(Error::ConfigError(format!("{name} must be a non-negative number of seconds")));
            }
        }

        if !(self.smart_mouse.curl_threshold.is_finite() && self.smart_mouse.curl_threshold > 0.0) {
            return Err(Error::ConfigError("Curl threshold must be positive".to_string()));
        }
        self.create_cursor_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid cursor filter: {e}")))?;

        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(Error::ConfigError("Screen size must be non-zero".to_string()));
        }

        if self.storage.gestures_file.as_os_str().is_empty()
            || self.storage.bindings_file.as_os_str().is_empty()
        {
            return Err(Error::ConfigError("Storage paths must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Hand Gesture Control Configuration

# Gesture recognition
recognition:
  match_threshold: 0.85
  ambiguity_margin: 0.10
  required_stability: 3

# Action triggering
dispatch:
  cooldown_secs: 0.5
  status_clear_secs: 3.0

# Smart mouse (MOUSE mode)
smart_mouse:
  curl_threshold: 0.1
  filter: "exponential"
  smoothing_factor: 0.2
  right_click_cooldown_secs: 1.0
  mirror_x: true

# Target screen
screen:
  width: 1920
  height: 1080

# Files
storage:
  gestures_file: "gestures.json"
  bindings_file: "action_config.json"
  samples_dir: "samples"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.recognition.required_stability, 3);
        assert!(config.smart_mouse.mirror_x);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.recognition.required_stability = 0;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.smart_mouse.smoothing_factor = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smart_mouse.filter = "kalman".to_string();
        assert!(config.validate().is_err());
    }
}
