//! Effect tuning.
//!
//! `EffectsConfig::default()` reproduces the stock Dino Run particle feel.
//! Alternate tunings can be loaded from a JSON file; any field left out of the
//! file keeps its default, including fields inside the `jump`, `land` and
//! `collision` objects, which patch their own preset.

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Motion and lifetime parameters shared by every spawned particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Downward acceleration added to `vy` each frame.
    pub gravity: f64,
    /// Default lifetime range in milliseconds, `[min, max)`.
    pub lifetime_ms: [f64; 2],
    /// Width of the horizontal velocity distribution, centred on zero.
    pub vx_spread: f64,
    /// Initial vertical velocity range (negative = upward).
    pub vy_range: [f64; 2],
    /// Visual scale range, `[min, max)`.
    pub scale_range: [f64; 2],
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            gravity: 0.2,
            lifetime_ms: [500.0, 1500.0],
            vx_spread: 5.0,
            vy_range: [-7.0, -2.0],
            scale_range: [0.5, 1.0],
        }
    }
}

/// Shape of one triggered burst (jump, land, collision).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstConfig {
    /// Particles spawned per trigger.
    pub count: usize,
    /// Horizontal jitter around the origin (± this many units).
    #[serde(default)]
    pub jitter: f64,
    /// Fixed lifetime; `None` uses the tuning's random range.
    #[serde(default)]
    pub lifetime_ms: Option<f64>,
    /// Vertical velocity override; `None` uses the tuning's range.
    #[serde(default)]
    pub vy_range: Option<[f64; 2]>,
}

impl BurstConfig {
    /// Dust kicked up when the runner leaves the ground.
    pub fn jump() -> Self {
        Self {
            count: 6,
            jitter: 10.0,
            lifetime_ms: Some(800.0),
            vy_range: Some([-4.0, -1.0]),
        }
    }

    /// Wider dust puff when the runner touches down.
    pub fn land() -> Self {
        Self {
            count: 8,
            jitter: 15.0,
            ..Self::jump()
        }
    }

    /// Sparks on hitting an obstacle.
    pub fn collision() -> Self {
        Self {
            count: 12,
            jitter: 0.0,
            lifetime_ms: None,
            vy_range: None,
        }
    }
}

/// Partial burst read from a config file; absent fields keep the preset.
///
/// An explicit `null` for `lifetime_ms` or `vy_range` clears the preset's
/// override, falling back to the tuning ranges.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct BurstPatch {
    count: Option<usize>,
    jitter: Option<f64>,
    #[serde(deserialize_with = "present")]
    lifetime_ms: Option<Option<f64>>,
    #[serde(deserialize_with = "present")]
    vy_range: Option<Option<[f64; 2]>>,
}

/// Distinguish a field set to `null` from a missing one.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl BurstPatch {
    fn apply(self, preset: BurstConfig) -> BurstConfig {
        BurstConfig {
            count: self.count.unwrap_or(preset.count),
            jitter: self.jitter.unwrap_or(preset.jitter),
            lifetime_ms: self.lifetime_ms.unwrap_or(preset.lifetime_ms),
            vy_range: self.vy_range.unwrap_or(preset.vy_range),
        }
    }
}

/// On-disk shape of an [`EffectsConfig`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EffectsConfigFile {
    tuning: Option<ParticleTuning>,
    default_count: Option<usize>,
    jump: BurstPatch,
    land: BurstPatch,
    collision: BurstPatch,
}

impl From<EffectsConfigFile> for EffectsConfig {
    fn from(file: EffectsConfigFile) -> Self {
        let stock = EffectsConfig::default();
        Self {
            tuning: file.tuning.unwrap_or(stock.tuning),
            default_count: file.default_count.unwrap_or(stock.default_count),
            jump: file.jump.apply(stock.jump),
            land: file.land.apply(stock.land),
            collision: file.collision.apply(stock.collision),
        }
    }
}

/// Complete tuning for a `ParticleSystem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EffectsConfigFile")]
pub struct EffectsConfig {
    pub tuning: ParticleTuning,
    /// Particle count used by `emit` callers that have no better number.
    pub default_count: usize,
    pub jump: BurstConfig,
    pub land: BurstConfig,
    pub collision: BurstConfig,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            tuning: ParticleTuning::default(),
            default_count: 5,
            jump: BurstConfig::jump(),
            land: BurstConfig::land(),
            collision: BurstConfig::collision(),
        }
    }
}

impl EffectsConfig {
    /// Fewer, shorter-lived particles for small terminals or slow machines.
    pub fn subtle() -> Self {
        Self {
            tuning: ParticleTuning {
                lifetime_ms: [300.0, 800.0],
                ..Default::default()
            },
            default_count: 3,
            jump: BurstConfig {
                count: 3,
                lifetime_ms: Some(500.0),
                ..BurstConfig::jump()
            },
            land: BurstConfig {
                count: 4,
                lifetime_ms: Some(500.0),
                ..BurstConfig::land()
            },
            collision: BurstConfig {
                count: 6,
                ..BurstConfig::collision()
            },
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Like [`load`](Self::load), but falls back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %err,
                    "using default effects config"
                );
                Self::default()
            }
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make sampling or fading meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tuning;
        if !t.gravity.is_finite() || t.gravity < 0.0 {
            return Err(ConfigError::invalid(
                "tuning.gravity",
                "must be finite and non-negative",
            ));
        }
        if !t.vx_spread.is_finite() || t.vx_spread < 0.0 {
            return Err(ConfigError::invalid(
                "tuning.vx_spread",
                "must be finite and non-negative",
            ));
        }
        check_range("tuning.lifetime_ms", t.lifetime_ms)?;
        if t.lifetime_ms[0] <= 0.0 {
            return Err(ConfigError::invalid(
                "tuning.lifetime_ms",
                "lifetimes must be positive",
            ));
        }
        check_range("tuning.vy_range", t.vy_range)?;
        check_range("tuning.scale_range", t.scale_range)?;

        for (name, burst) in [
            ("jump", &self.jump),
            ("land", &self.land),
            ("collision", &self.collision),
        ] {
            if !burst.jitter.is_finite() || burst.jitter < 0.0 {
                return Err(ConfigError::invalid(
                    format!("{name}.jitter"),
                    "must be finite and non-negative",
                ));
            }
            if let Some(lifetime) = burst.lifetime_ms {
                if !lifetime.is_finite() || lifetime <= 0.0 {
                    return Err(ConfigError::invalid(
                        format!("{name}.lifetime_ms"),
                        "lifetimes must be positive",
                    ));
                }
            }
            if let Some(range) = burst.vy_range {
                check_range(&format!("{name}.vy_range"), range)?;
            }
        }
        Ok(())
    }
}

fn check_range(field: &str, [lo, hi]: [f64; 2]) -> Result<(), ConfigError> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(ConfigError::invalid(field, "bounds must be finite"));
    }
    if lo > hi {
        return Err(ConfigError::invalid(field, "lower bound exceeds upper bound"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_feel() {
        let config = EffectsConfig::default();
        assert_eq!(config.default_count, 5);
        assert!((config.tuning.gravity - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.tuning.lifetime_ms, [500.0, 1500.0]);

        assert_eq!(config.jump.count, 6);
        assert_eq!(config.jump.jitter, 10.0);
        assert_eq!(config.jump.lifetime_ms, Some(800.0));
        assert_eq!(config.jump.vy_range, Some([-4.0, -1.0]));

        assert_eq!(config.land.count, 8);
        assert_eq!(config.land.jitter, 15.0);
        assert_eq!(config.land.lifetime_ms, Some(800.0));

        assert_eq!(config.collision.count, 12);
        assert!(config.collision.lifetime_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_subtle_preset_is_valid_and_smaller() {
        let subtle = EffectsConfig::subtle();
        let stock = EffectsConfig::default();
        assert!(subtle.validate().is_ok());
        assert!(subtle.jump.count < stock.jump.count);
        assert!(subtle.land.count < stock.land.count);
        assert!(subtle.collision.count < stock.collision.count);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EffectsConfig::from_json_str(r#"{ "tuning": { "gravity": 0.5 } }"#)
            .expect("partial config should parse");
        assert!((config.tuning.gravity - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.tuning.lifetime_ms, [500.0, 1500.0]);
        assert_eq!(config.jump, BurstConfig::jump());
    }

    #[test]
    fn test_partial_burst_patches_its_own_preset() {
        let config = EffectsConfig::from_json_str(
            r#"{ "jump": { "jitter": 5.0 }, "land": { "count": 2 } }"#,
        )
        .expect("partial burst should parse");

        assert_eq!(config.jump.jitter, 5.0);
        assert_eq!(config.jump.count, 6);
        assert_eq!(config.jump.lifetime_ms, Some(800.0));
        assert_eq!(config.jump.vy_range, Some([-4.0, -1.0]));

        assert_eq!(config.land.count, 2);
        assert_eq!(config.land.jitter, 15.0);
        assert_eq!(config.collision, BurstConfig::collision());
    }

    #[test]
    fn test_null_burst_override_clears_preset() {
        let config = EffectsConfig::from_json_str(r#"{ "jump": { "lifetime_ms": null } }"#)
            .expect("null override should parse");
        assert_eq!(config.jump.lifetime_ms, None);
        assert_eq!(config.jump.vy_range, Some([-4.0, -1.0]));
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let config = EffectsConfig::subtle();
        let json = config.to_json_pretty().expect("serialize");
        let parsed = EffectsConfig::from_json_str(&json).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = EffectsConfig::from_json_str(r#"{ "tuning": { "vy_range": [-1.0, -4.0] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "tuning.vy_range"));
    }

    #[test]
    fn test_rejects_negative_gravity() {
        let mut config = EffectsConfig::default();
        config.tuning.gravity = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "tuning.gravity"
        ));
    }

    #[test]
    fn test_rejects_zero_burst_lifetime() {
        let mut config = EffectsConfig::default();
        config.land.lifetime_ms = Some(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "land.lifetime_ms"
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = EffectsConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = std::env::temp_dir().join("dino_fx_missing_config_12345.json");
        assert!(matches!(
            EffectsConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(EffectsConfig::load_or_default(&path), EffectsConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "dino_fx_config_test_{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "default_count": 9 }"#).expect("write temp config");

        let config = EffectsConfig::load(&path).expect("load temp config");
        assert_eq!(config.default_count, 9);

        // Cleanup
        let _ = fs::remove_file(&path);
    }
}
