//! Engine Configuration
//!
//! A static configuration object read once at engine start. Values come
//! from (lowest to highest priority) built-in defaults, a TOML file, and
//! `COMPANION_*` environment variables.
//!
//! ```toml
//! # ~/.config/companion/config.toml
//! roam_mode = "bottom"
//! idle_sleep_probability = 0.05
//! zoomies_probability = 0.5
//! bubble_life_ms = 2000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roam::RoamMode;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`EngineConfig`]
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A value is outside its allowed range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Where the active configuration came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file found; built-in defaults
    Defaults,
    /// Loaded from this file
    File(PathBuf),
}

/// Tunable constants for the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Roam mode at startup
    pub roam_mode: RoamMode,

    /// Per-tick chance that an idle pet falls asleep
    pub idle_sleep_probability: f32,

    /// Per-tick chance that an idle pet gets the zoomies (checked after sleep)
    pub zoomies_probability: f32,

    /// Distance of the pet's floor from the bottom edge in bottom mode
    pub bottom_floor_offset: f32,

    /// Distance of the owner's floor from the bottom edge in bottom mode
    pub owner_floor_offset: f32,

    /// Pointer distance from the pet's center that starts a drag
    pub drag_capture_radius: f32,

    /// Minimum time between owner facing flips
    pub face_change_hysteresis_ms: u64,

    /// Lifetime of every floating bubble
    pub bubble_life_ms: u64,

    /// How long a click keeps the owner talking
    pub talk_duration_ms: u64,

    /// Delay between waking up startled and walking off
    pub surprise_recovery_ms: u64,

    /// Minimum gap between drag feedback cues
    pub drag_cue_interval_ms: u64,

    /// Pet render scale
    pub pet_scale: f32,

    /// Owner render scale
    pub owner_scale: f32,

    /// Square footprint used for bounds clamping
    pub actor_size: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            roam_mode: RoamMode::Full,
            idle_sleep_probability: 0.05,
            zoomies_probability: 0.5,
            bottom_floor_offset: 50.0,
            owner_floor_offset: 130.0,
            drag_capture_radius: 60.0,
            face_change_hysteresis_ms: 1500,
            bubble_life_ms: 2000,
            talk_duration_ms: 3000,
            surprise_recovery_ms: 1000,
            drag_cue_interval_ms: 600,
            pet_scale: 1.5,
            owner_scale: 2.5,
            actor_size: 50.0,
        }
    }
}

impl EngineConfig {
    /// Check every value is usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, p) in [
            ("idle_sleep_probability", self.idle_sleep_probability),
            ("zoomies_probability", self.zoomies_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{p} is not a probability"),
                });
            }
        }
        if self.idle_sleep_probability + self.zoomies_probability > 1.0 {
            return Err(ConfigError::Invalid {
                field: "zoomies_probability",
                reason: "sleep and zoomies probabilities add up to more than 1".into(),
            });
        }

        for (field, v) in [
            ("drag_capture_radius", self.drag_capture_radius),
            ("pet_scale", self.pet_scale),
            ("owner_scale", self.owner_scale),
            ("actor_size", self.actor_size),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{v} must be positive"),
                });
            }
        }

        for (field, v) in [
            ("bottom_floor_offset", self.bottom_floor_offset),
            ("owner_floor_offset", self.owner_floor_offset),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{v} must not be negative"),
                });
            }
        }

        if self.bubble_life_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "bubble_life_ms",
                reason: "bubbles need a non-zero lifetime".into(),
            });
        }

        Ok(())
    }

    /// Apply `COMPANION_*` environment variables on top of this config
    ///
    /// Environment variables:
    /// - `COMPANION_ROAM_MODE`: "full", "bottom" or "none"
    /// - `COMPANION_IDLE_SLEEP_PROBABILITY`
    /// - `COMPANION_ZOOMIES_PROBABILITY`
    /// - `COMPANION_BOTTOM_FLOOR_OFFSET`
    /// - `COMPANION_DRAG_CAPTURE_RADIUS`
    /// - `COMPANION_FACE_CHANGE_HYSTERESIS_MS`
    /// - `COMPANION_BUBBLE_LIFE_MS`
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment, or a map in tests)
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            match raw.trim().parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "Ignoring unparseable config override");
                    None
                }
            }
        }

        if let Some(v) = parsed(&lookup, "COMPANION_ROAM_MODE") {
            self.roam_mode = v;
        }
        if let Some(v) = parsed(&lookup, "COMPANION_IDLE_SLEEP_PROBABILITY") {
            self.idle_sleep_probability = v;
        }
        if let Some(v) = parsed(&lookup, "COMPANION_ZOOMIES_PROBABILITY") {
            self.zoomies_probability = v;
        }
        if let Some(v) = parsed(&lookup, "COMPANION_BOTTOM_FLOOR_OFFSET") {
            self.bottom_floor_offset = v;
        }
        if let Some(v) = parsed(&lookup, "COMPANION_DRAG_CAPTURE_RADIUS") {
            self.drag_capture_radius = v;
        }
        if let Some(v) = parsed(&lookup, "COMPANION_FACE_CHANGE_HYSTERESIS_MS") {
            self.face_change_hysteresis_ms = v;
        }
        if let Some(v) = parsed(&lookup, "COMPANION_BUBBLE_LIFE_MS") {
            self.bubble_life_ms = v;
        }
        self
    }
}

/// Default config file location
///
/// `$XDG_CONFIG_HOME/companion/config.toml` (or the platform equivalent).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("companion").join("config.toml"))
}

/// Load and validate a config file
///
/// # Errors
///
/// Returns `ConfigError` if the file can't be read, parsed or validated.
pub fn load_config_from_path(path: &Path) -> Result<EngineConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EngineConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Resolve the active configuration
///
/// An explicit path must exist. Without one, the default path is used if
/// present, otherwise the built-in defaults. Environment overrides are
/// applied last and the result is validated.
///
/// # Errors
///
/// Returns `ConfigError` if a file fails to load or the final config is invalid.
pub fn load_config(explicit: Option<&Path>) -> Result<(EngineConfig, ConfigSource), ConfigError> {
    let (config, source) = match explicit {
        Some(path) => (
            load_config_from_path(path)?,
            ConfigSource::File(path.to_path_buf()),
        ),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => (load_config_from_path(&path)?, ConfigSource::File(path)),
            None => (EngineConfig::default(), ConfigSource::Defaults),
        },
    };

    let config = config.with_env_overrides();
    config.validate()?;
    tracing::debug!(source = ?source, "Configuration loaded");
    Ok((config, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.roam_mode, RoamMode::Full);
        assert_eq!(config.bubble_life_ms, 2000);
        assert_eq!(config.face_change_hysteresis_ms, 1500);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = EngineConfig {
            idle_sleep_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "idle_sleep_probability",
                ..
            })
        ));

        let config = EngineConfig {
            idle_sleep_probability: 0.6,
            zoomies_probability: 0.6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let config = EngineConfig {
            drag_capture_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "drag_capture_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("COMPANION_ROAM_MODE", "bottom"),
            ("COMPANION_BUBBLE_LIFE_MS", "3500"),
            ("COMPANION_ZOOMIES_PROBABILITY", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::default()
            .with_overrides_from(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.roam_mode, RoamMode::Bottom);
        assert_eq!(config.bubble_life_ms, 3500);
        // Unparseable values leave the default in place
        assert!((config.zoomies_probability - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "roam_mode = \"none\"").unwrap();
        writeln!(file, "drag_capture_radius = 80.0").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.roam_mode, RoamMode::Hidden);
        assert!((config.drag_capture_radius - 80.0).abs() < f32::EPSILON);
        // Unspecified fields keep their defaults
        assert_eq!(config.bubble_life_ms, 2000);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "roam_mode = [1, 2").unwrap();
        assert!(matches!(
            load_config_from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let missing = Path::new("/definitely/not/here/config.toml");
        assert!(matches!(
            load_config(Some(missing)),
            Err(ConfigError::Io { .. })
        ));
    }
}
