use std::env;

use foundation::math::DEFAULT_SCALE_DIVISOR;
use layers::symbology::DEFAULT_MARKER_EXPONENT;
use viewport::ViewportConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Invalid { key: String, value: String },
    OutOfRange { key: String, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "{key}: cannot parse {value:?} as a number")
            }
            ConfigError::OutOfRange { key, reason } => write!(f, "{key}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Engine tuning. Defaults match the shipped map; every field can be
/// overridden through a `PINMAP_*` environment variable.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub viewport: ViewportConfig,
    /// Markers are drawn at `scale^-marker_exponent`.
    pub marker_exponent: f64,
    /// Projection scale is `width / projection_divisor / PI`.
    pub projection_divisor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            marker_exponent: DEFAULT_MARKER_EXPONENT,
            projection_divisor: DEFAULT_SCALE_DIVISOR,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let var = |key: &str, default: f64| env_var_f64(&lookup, key, default);
        let ms = |key: &str, default_s: f64| -> Result<f64, ConfigError> {
            Ok(var(key, default_s * 1000.0)? / 1000.0)
        };

        let cfg = Self {
            viewport: ViewportConfig {
                min_scale: var("PINMAP_MIN_SCALE", d.viewport.min_scale)?,
                max_scale: var("PINMAP_MAX_SCALE", d.viewport.max_scale)?,
                focus_scale: var("PINMAP_FOCUS_SCALE", d.viewport.focus_scale)?,
                focus_duration_s: ms("PINMAP_FOCUS_DURATION_MS", d.viewport.focus_duration_s)?,
                click_distance_px: var("PINMAP_CLICK_DISTANCE_PX", d.viewport.click_distance_px)?,
                wheel_idle_s: ms("PINMAP_WHEEL_IDLE_MS", d.viewport.wheel_idle_s)?,
                ..d.viewport
            },
            marker_exponent: var("PINMAP_MARKER_EXPONENT", d.marker_exponent)?,
            projection_divisor: var("PINMAP_PROJECTION_DIVISOR", d.projection_divisor)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let out_of_range = |key: &str, reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::OutOfRange {
                key: key.to_string(),
                reason: reason.to_string(),
            })
        };
        let v = &self.viewport;
        if !(v.min_scale > 0.0 && v.min_scale.is_finite()) {
            return out_of_range("PINMAP_MIN_SCALE", "must be positive");
        }
        if !(v.max_scale >= v.min_scale && v.max_scale.is_finite()) {
            return out_of_range("PINMAP_MAX_SCALE", "must not be below PINMAP_MIN_SCALE");
        }
        if v.focus_duration_s < 0.0 || v.wheel_idle_s < 0.0 || v.click_distance_px < 0.0 {
            return out_of_range("PINMAP_*", "durations and distances must not be negative");
        }
        if self.projection_divisor <= 0.0 {
            return out_of_range("PINMAP_PROJECTION_DIVISOR", "must be positive");
        }
        Ok(())
    }
}

fn env_var_f64<F>(lookup: &F, key: &str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ConfigError::Invalid {
                key: key.to_string(),
                value: raw,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.viewport.max_scale, 15.0);
        assert_eq!(cfg.marker_exponent, 0.7);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = EngineConfig::from_lookup(lookup(&[
            ("PINMAP_MAX_SCALE", "20"),
            ("PINMAP_FOCUS_DURATION_MS", "500"),
            ("PINMAP_MARKER_EXPONENT", " 0.5 "),
        ]))
        .unwrap();
        assert_eq!(cfg.viewport.max_scale, 20.0);
        assert_eq!(cfg.viewport.focus_duration_s, 0.5);
        assert_eq!(cfg.marker_exponent, 0.5);
    }

    #[test]
    fn malformed_and_inconsistent_values_are_rejected() {
        let err = EngineConfig::from_lookup(lookup(&[("PINMAP_MIN_SCALE", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "PINMAP_MIN_SCALE"));

        let err = EngineConfig::from_lookup(lookup(&[("PINMAP_MAX_SCALE", "0.5")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }
}
