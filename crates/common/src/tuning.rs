use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Numeric constants driving the trick integrator and camera rig.
///
/// Defaults reproduce the reference feel of the demo. Every field may be
/// overridden from a config file; missing fields fall back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Vertical acceleration in units/s². Must be negative.
    pub gravity: f32,
    /// Vertical velocity given on take-off, units/s.
    pub jump_impulse: f32,
    /// Flip accumulator growth rate, rad/s.
    pub flip_speed: f32,
    /// Height at which the board rests on the ground.
    pub resting_height: f32,
    /// Ground-plane speed while idle, units/s.
    pub move_speed: f32,
    /// Per-frame lerp factor pulling the camera toward its desired position.
    pub camera_blend: f32,
    /// Camera position relative to the skater.
    pub camera_offset: Vec3,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: -9.0,
            jump_impulse: 4.0,
            flip_speed: std::f32::consts::PI * 2.2,
            resting_height: 0.1,
            move_speed: 4.0,
            camera_blend: 0.8,
            camera_offset: Vec3::new(0.0, 2.0, 5.0),
        }
    }
}

impl Tuning {
    /// Check the invariants the integrator relies on. A negative gravity and
    /// a positive finite impulse guarantee every airborne state lands.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("flip_speed", self.flip_speed),
            ("resting_height", self.resting_height),
            ("move_speed", self.move_speed),
            ("camera_blend", self.camera_blend),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not finite")));
            }
        }
        if !self.camera_offset.is_finite() {
            return Err(invalid("camera_offset", "components must be finite".into()));
        }
        if self.gravity >= 0.0 {
            return Err(invalid("gravity", format!("{} must be negative", self.gravity)));
        }
        if self.jump_impulse <= 0.0 {
            return Err(invalid(
                "jump_impulse",
                format!("{} must be positive", self.jump_impulse),
            ));
        }
        if self.flip_speed < 0.0 {
            return Err(invalid("flip_speed", format!("{} is negative", self.flip_speed)));
        }
        if self.move_speed < 0.0 {
            return Err(invalid("move_speed", format!("{} is negative", self.move_speed)));
        }
        if !(0.0..=1.0).contains(&self.camera_blend) {
            return Err(invalid(
                "camera_blend",
                format!("{} is outside [0, 1]", self.camera_blend),
            ));
        }
        Ok(())
    }

    /// Parse and validate tuning from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_yaml::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Time from take-off until the board is back at resting height,
    /// ignoring frame quantization.
    pub fn airtime(&self) -> f32 {
        2.0 * self.jump_impulse / -self.gravity
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Read a YAML file into any deserializable config type.
pub fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(serde_yaml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let t = Tuning::default();
        assert!(t.validate().is_ok());
        assert_eq!(t.gravity, -9.0);
        assert_eq!(t.jump_impulse, 4.0);
        assert_eq!(t.resting_height, 0.1);
        assert_eq!(t.camera_blend, 0.8);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let t = Tuning::from_yaml_str("gravity: -12.0\n").unwrap();
        assert_eq!(t.gravity, -12.0);
        assert_eq!(t.move_speed, 4.0);
    }

    #[test]
    fn upward_gravity_rejected() {
        let err = Tuning::from_yaml_str("gravity: 3.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gravity", .. }));
    }

    #[test]
    fn blend_out_of_range_rejected() {
        let t = Tuning {
            camera_blend: 1.5,
            ..Tuning::default()
        };
        assert!(matches!(
            t.validate(),
            Err(ConfigError::Invalid { field: "camera_blend", .. })
        ));
    }

    #[test]
    fn non_finite_rejected() {
        let t = Tuning {
            flip_speed: f32::NAN,
            ..Tuning::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn airtime_matches_ballistics() {
        let t = Tuning::default();
        assert!((t.airtime() - 8.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_yaml::<Tuning>(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
