//! Configuration system
//!
//! The world collaborator owns these values; the index only reads them. A
//! configuration can be built in code or loaded from a TOML / RON file.

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file and validate it
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        let config: Self = if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges; called after every load
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its valid range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for a [`WorldOctree`](crate::spatial::WorldOctree)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Center of the root node region, stored as `[x, y, z]`
    pub world_center: Vec3,

    /// Half size of the root node region along each axis, stored as `[x, y, z]`
    pub world_half_size: Vec3,

    /// Depth limit used by [`WorldOctree::insert_default`](crate::spatial::WorldOctree::insert_default)
    pub max_depth: u32,

    /// Padding added around a ray segment's bounds before pruning nodes
    pub ray_padding: f64,

    /// Half size of the point region used for microphones
    pub point_half_size: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            world_center: Vec3::zeros(),
            world_half_size: Vec3::repeat(1024.0),
            max_depth: 8,
            ray_padding: 0.01,
            point_half_size: 1e-4,
        }
    }
}

impl IndexConfig {
    /// Create a configuration for a cubic world
    pub fn cube(center: Vec3, half_size: f64, max_depth: u32) -> Self {
        Self {
            world_center: center,
            world_half_size: Vec3::repeat(half_size),
            max_depth,
            ..Default::default()
        }
    }

    /// Root region center
    pub fn center(&self) -> Vec3 {
        self.world_center
    }

    /// Root region half size
    pub fn half_size(&self) -> Vec3 {
        self.world_half_size
    }
}

impl Config for IndexConfig {
    /// Check that every size is finite and non-negative
    fn validate(&self) -> Result<(), ConfigError> {
        if self.world_half_size.iter().any(|h| !h.is_finite() || *h < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "world_half_size must be finite and non-negative, got {:?}",
                self.world_half_size
            )));
        }
        if self.world_center.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "world_center must be finite, got {:?}",
                self.world_center
            )));
        }
        if !(self.ray_padding >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ray_padding must be non-negative, got {}",
                self.ray_padding
            )));
        }
        if !(self.point_half_size >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "point_half_size must be non-negative, got {}",
                self.point_half_size
            )));
        }
        Ok(())
    }
}
