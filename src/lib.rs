//! Rune motion: gesture-driven variant animation for component trees.
//!
//! This facade re-exports the engine ([`rune_motion`]) and its configuration
//! ([`rune_config`]), plus helpers for building an engine from `rune.toml`.

use std::path::Path;

use anyhow::{Context, Result};

pub use rune_config as config;
pub use rune_motion as motion;

pub use rune_config::{ConfigError, GestureConfig, MotionConfig, RuneConfig};
pub use rune_motion::*;

/// Engine configured from `rune.toml` in the current directory plus environment overrides.
pub fn engine_from_env() -> MotionEngine {
    MotionEngine::with_config(&RuneConfig::load())
}

/// Engine configured from a specific TOML file, with environment overrides applied on top.
pub fn engine_from_file(path: impl AsRef<Path>) -> Result<MotionEngine> {
    let path = path.as_ref();
    let mut config = RuneConfig::load_from_file(path)
        .with_context(|| format!("failed to load motion config from {}", path.display()))?;
    config.merge_with_env();
    Ok(MotionEngine::with_config(&config))
}
