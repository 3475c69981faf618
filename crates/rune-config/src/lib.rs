//! Rune motion configuration system
//!
//! This crate provides centralized configuration for the rune motion engine,
//! loading settings from `rune.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`RuneConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the motion engine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Animation defaults
    pub motion: MotionConfig,
    /// Gesture detection settings
    pub gestures: GestureConfig,
}

/// Animation defaults applied when a node declares no transition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Default tween duration in milliseconds
    pub default_duration_ms: f32,
    /// Default tween delay in milliseconds
    pub default_delay_ms: f32,
    /// Default easing name (linear, ease, ease-in, ease-out, ease-in-out)
    pub default_easing: String,
    /// Apply targets immediately instead of tweening (no interpolation)
    pub instant: bool,
}

/// Gesture detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Pointer travel in pixels before a press on a draggable node becomes a drag
    pub drag_threshold_px: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 300.0,
            default_delay_ms: 0.0,
            default_easing: "ease".to_string(),
            instant: false,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 3.0,
        }
    }
}

impl RuneConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the rune.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if the file doesn't exist or is invalid
    pub fn load_or_default() -> Self {
        let path = Path::new("rune.toml");
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("ignoring rune.toml: {err}");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_MOTION_DURATION_MS") {
            match val.parse::<f32>() {
                Ok(ms) if ms >= 0.0 => self.motion.default_duration_ms = ms,
                _ => warn!("RUNE_MOTION_DURATION_MS={val} is not a valid duration"),
            }
        }
        if let Ok(val) = std::env::var("RUNE_MOTION_DELAY_MS") {
            match val.parse::<f32>() {
                Ok(ms) if ms >= 0.0 => self.motion.default_delay_ms = ms,
                _ => warn!("RUNE_MOTION_DELAY_MS={val} is not a valid delay"),
            }
        }
        if let Ok(easing) = std::env::var("RUNE_MOTION_EASING") {
            self.motion.default_easing = easing;
        }
        if let Ok(val) = std::env::var("RUNE_MOTION_INSTANT") {
            self.motion.instant = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("RUNE_DRAG_THRESHOLD") {
            match val.parse::<f64>() {
                Ok(px) if px >= 0.0 => self.gestures.drag_threshold_px = px,
                _ => warn!("RUNE_DRAG_THRESHOLD={val} is not a valid distance"),
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
