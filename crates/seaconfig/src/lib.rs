use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const MAX_OCTAVES: u32 = 16;
pub const MAX_STEP_BUDGET: u32 = 512;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSetting {
    Low,
    #[default]
    High,
}

/// Sea surface shape and motion.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeaSection {
    pub height: f64,
    pub choppy: f64,
    pub speed: f64,
    pub freq: f64,
}

impl Default for SeaSection {
    fn default() -> Self {
        Self {
            height: 0.4,
            choppy: 2.0,
            speed: 0.2,
            freq: 0.2,
        }
    }
}

/// Intersection search and shading fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarchSection {
    pub steps: u32,
    pub geometry_octaves: u32,
    pub fragment_octaves: u32,
}

impl Default for MarchSection {
    fn default() -> Self {
        Self {
            steps: 40,
            geometry_octaves: 3,
            fragment_octaves: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSection {
    pub speed: f64,
    pub pointer_sensitivity: f64,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            speed: 0.2,
            pointer_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub power: PowerSetting,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OceanConfig {
    pub version: u32,
    #[serde(default)]
    pub sea: SeaSection,
    #[serde(default)]
    pub march: MarchSection,
    #[serde(default)]
    pub camera: CameraSection,
    #[serde(default)]
    pub window: WindowSection,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            version: 1,
            sea: SeaSection::default(),
            march: MarchSection::default(),
            camera: CameraSection::default(),
            window: WindowSection::default(),
        }
    }
}

impl OceanConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: OceanConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialises the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        let sea = &self.sea;
        require_finite("sea.height", sea.height)?;
        if sea.height < 0.0 {
            return Err(ConfigError::Invalid("sea.height must be >= 0".into()));
        }
        require_positive("sea.choppy", sea.choppy)?;
        require_finite("sea.speed", sea.speed)?;
        require_positive("sea.freq", sea.freq)?;

        let march = &self.march;
        if march.steps > MAX_STEP_BUDGET {
            return Err(ConfigError::Invalid(format!(
                "march.steps must be <= {MAX_STEP_BUDGET}"
            )));
        }
        for (name, octaves) in [
            ("march.geometry_octaves", march.geometry_octaves),
            ("march.fragment_octaves", march.fragment_octaves),
        ] {
            if octaves == 0 || octaves > MAX_OCTAVES {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 1 and {MAX_OCTAVES}"
                )));
            }
        }

        require_finite("camera.speed", self.camera.speed)?;
        require_finite("camera.pointer_sensitivity", self.camera.pointer_sensitivity)?;

        for (name, value) in [
            ("window.width", self.window.width),
            ("window.height", self.window.height),
        ] {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0")));
            }
        }

        Ok(())
    }

    /// Window size if both dimensions are configured.
    pub fn window_size(&self) -> Option<(u32, u32)> {
        self.window.width.zip(self.window.height)
    }
}

/// Values reach the renderer as `f32`, so range checks run on the narrowed value.
fn require_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if (value as f32).is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be finite")))
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value as f32 > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be > 0")))
    }
}
