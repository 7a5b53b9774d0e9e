//! Physics and scene configuration

use serde::{Deserialize, Serialize};

use super::Config;
use crate::foundation::math::Vec3;

/// Physics bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity in m/s^2
    pub gravity: [f32; 3],
    /// Length of one simulation sub-step in seconds
    pub fixed_time_step: f32,
    /// Sub-steps per call; time beyond that is dropped
    pub max_sub_steps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            fixed_time_step: 1.0 / 60.0,
            max_sub_steps: 1,
        }
    }
}

impl PhysicsConfig {
    /// Gravity as a vector
    pub fn gravity(&self) -> Vec3 {
        Vec3::from(self.gravity)
    }
}

impl Config for PhysicsConfig {}

/// Everything needed to assemble a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Directory asset file names are resolved against
    pub asset_root: String,
    /// Physics settings
    pub physics: PhysicsConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_root: "assets".to_string(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Builder pattern: set the asset root
    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<String>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Builder pattern: set the physics settings
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }
}

impl Config for SceneConfig {}
