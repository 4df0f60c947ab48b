use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::drag::DEFAULT_ROTATION_SPEED;
use crate::transform::{DEFAULT_DISTANCE, DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR};

/// Viewer settings, read from a JSON5 file. Missing fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub background: [f32; 3],
    pub rotation_speed: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub vsync: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: String::from("Spinning cube"),
            background: [0.0, 0.0, 0.0],
            rotation_speed: DEFAULT_ROTATION_SPEED,
            fov_degrees: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            distance: DEFAULT_DISTANCE,
            vsync: true,
        }
    }
}

impl ViewerConfig {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = json5::from_str(text).map_err(ConfigError::Format)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }

        if !(self.rotation_speed.is_finite() && self.rotation_speed > 0.0) {
            return Err(ConfigError::Invalid("rotation_speed must be positive".into()));
        }

        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(
                "fov_degrees must be between 0 and 180".into(),
            ));
        }

        if !(self.near > 0.0 && self.near < self.far) {
            return Err(ConfigError::Invalid("need 0 < near < far".into()));
        }

        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(ConfigError::Invalid("distance must be positive".into()));
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(std::io::Error),
    #[error("invalid config format: {0}")]
    Format(json5::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
