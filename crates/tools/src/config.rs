use serde::{Deserialize, Serialize};
use skatepark_common::{ConfigError, Tuning, load_yaml};
use skatepark_input::KeyBindings;
use std::path::Path;

/// Everything a run can be configured with.
///
/// ```yaml
/// tuning:
///   gravity: -9.0
///   camera_blend: 0.8
/// bindings:
///   Space: jump
///   KeyE: flip
/// ```
///
/// Missing tuning fields keep their defaults. A `bindings` table replaces
/// the default table as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkateConfig {
    pub tuning: Tuning,
    pub bindings: KeyBindings,
}

impl SkateConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config: SkateConfig = load_yaml(path)?;
        config.tuning.validate()?;
        tracing::info!(
            path = %path.display(),
            bindings = config.bindings.len(),
            "config loaded"
        );
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SkateConfig = serde_yaml::from_str(text)?;
        config.tuning.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skatepark_common::Trick;
    use skatepark_input::Binding;
    use std::io::Write;

    #[test]
    fn no_path_gives_defaults() {
        let config = SkateConfig::load(None).unwrap();
        assert_eq!(config, SkateConfig::default());
    }

    #[test]
    fn loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tuning:\n  move_speed: 6.0\nbindings:\n  KeyJ: flip").unwrap();
        let config = SkateConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.tuning.move_speed, 6.0);
        assert_eq!(config.tuning.gravity, -9.0);
        assert_eq!(config.bindings.get("KeyJ"), Some(Binding::Trick(Trick::Flip)));
        assert_eq!(config.bindings.get("KeyE"), None);
    }

    #[test]
    fn invalid_tuning_rejected() {
        let err = SkateConfig::from_yaml_str("tuning:\n  jump_impulse: 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "jump_impulse",
                ..
            }
        ));
    }

    #[test]
    fn bad_binding_is_yaml_error() {
        let err = SkateConfig::from_yaml_str("bindings:\n  KeyO: ollie\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_roundtrip_of_defaults() {
        let text = SkateConfig::default().to_yaml().unwrap();
        let back = SkateConfig::from_yaml_str(&text).unwrap();
        assert_eq!(back.bindings, KeyBindings::default());
        assert_eq!(back.tuning.resting_height, 0.1);
    }
}
