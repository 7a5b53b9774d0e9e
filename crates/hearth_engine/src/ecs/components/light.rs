//! Lighting component for ECS
//!
//! Pure data: the render backend reads it, the light's position and direction
//! come from the owning entity's transform.

use serde::{Deserialize, Serialize};

use crate::ecs::component::{Component, ComponentKind};
use crate::ecs::storage::ComponentStore;
use crate::ecs::world::World;
use crate::foundation::math::Vec3;

/// Types of lights supported by the lighting system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightType {
    /// Directional light (like sunlight) with parallel rays
    Directional,
    /// Point light that radiates in all directions from a position
    Point,
    /// Spot light that creates a cone of light from a position
    Spot,
}

impl LightType {
    /// Name used in scene documents
    pub fn as_str(self) -> &'static str {
        match self {
            LightType::Directional => "Directional",
            LightType::Point => "Point",
            LightType::Spot => "Spot",
        }
    }

    /// Parse the scene document name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Directional" => Some(LightType::Directional),
            "Point" => Some(LightType::Point),
            "Spot" => Some(LightType::Spot),
            _ => None,
        }
    }
}

/// Light source data
#[derive(Debug, Clone, PartialEq)]
pub struct LightComponent {
    /// The type of light (directional, point, or spot)
    pub light_type: LightType,
    /// RGB color values for the light (0.0 to 1.0 range)
    pub color: Vec3,
    /// Light intensity multiplier
    pub intensity: f32,
    /// Inner cone angle for spot lights in radians
    pub inner_angle: f32,
    /// Outer cone angle for spot lights in radians
    pub outer_angle: f32,
    /// Attenuation exponent
    pub falloff: f32,
    /// Maximum range for point/spot lights
    pub radius: f32,
    /// Whether this light should cast shadows
    pub cast_shadow: bool,
    /// Percentage-closer filtering of the shadow map
    pub pcf_enabled: bool,
    /// Shadow depth bias
    pub depth_bias: f32,
}

impl Component for LightComponent {
    const KIND: ComponentKind = ComponentKind::Light;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.lights
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.lights
    }
}

impl Default for LightComponent {
    fn default() -> Self {
        Self::point(Vec3::new(1.0, 1.0, 1.0), 1.0, 10.0)
    }
}

impl LightComponent {
    /// Directional light
    pub fn directional(color: Vec3, intensity: f32) -> Self {
        Self {
            light_type: LightType::Directional,
            color,
            intensity,
            inner_angle: 0.0,
            outer_angle: 0.0,
            falloff: 0.0,
            radius: 0.0,
            cast_shadow: true,
            pcf_enabled: true,
            depth_bias: 0.005,
        }
    }

    /// Point light
    pub fn point(color: Vec3, intensity: f32, radius: f32) -> Self {
        Self {
            light_type: LightType::Point,
            radius,
            falloff: 2.0,
            cast_shadow: false,
            ..Self::directional(color, intensity)
        }
    }

    /// Spot light; angles in radians
    pub fn spot(color: Vec3, intensity: f32, radius: f32, inner_angle: f32, outer_angle: f32) -> Self {
        Self {
            light_type: LightType::Spot,
            inner_angle,
            outer_angle,
            ..Self::point(color, intensity, radius)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_type_names_round_trip() {
        for ty in [LightType::Directional, LightType::Point, LightType::Spot] {
            assert_eq!(LightType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(LightType::parse("Area"), None);
    }

    #[test]
    fn spot_keeps_cone_angles() {
        let light = LightComponent::spot(Vec3::new(1.0, 0.5, 0.2), 2.0, 15.0, 0.2, 0.4);
        assert_eq!(light.light_type, LightType::Spot);
        assert_eq!(light.inner_angle, 0.2);
        assert_eq!(light.outer_angle, 0.4);
        assert_eq!(light.radius, 15.0);
    }
}
