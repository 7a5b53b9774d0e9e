//! Collision shapes and the shared shape registry
//!
//! Shapes are reference counted independently of bodies: one shape may back
//! several bodies and is destroyed when the last reference is released.

use slotmap::SlotMap;

use super::PhysicsError;
use crate::foundation::math::Vec3;

slotmap::new_key_type! {
    /// Handle to a registered collision shape
    pub struct ShapeKey;
}

/// Collision shape description (local space, Y-up)
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDesc {
    /// Box with the given half extents
    Box {
        /// Half size along each local axis
        half_extents: Vec3,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Capsule along the local Y axis
    Capsule {
        /// Radius of the hemispheres and cylinder
        radius: f32,
        /// Distance between the hemisphere centers
        height: f32,
    },
    /// Infinite static plane `dot(normal, x) = constant`
    Plane {
        /// Plane normal
        normal: Vec3,
        /// Offset along the normal
        constant: f32,
    },
}

impl ShapeDesc {
    /// Shape substituted when a rigid body is attached without one
    pub fn default_box() -> Self {
        ShapeDesc::Box {
            half_extents: Vec3::new(0.5, 0.5, 0.5),
        }
    }

    /// Name used in scene documents
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeDesc::Box { .. } => "Box",
            ShapeDesc::Sphere { .. } => "Sphere",
            ShapeDesc::Capsule { .. } => "Capsule",
            ShapeDesc::Plane { .. } => "Plane",
        }
    }

    /// Whether every dimension is finite and positive (planes: non-zero normal)
    pub fn is_valid(&self) -> bool {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        match self {
            ShapeDesc::Box { half_extents } => half_extents.iter().all(|&v| positive(v)),
            ShapeDesc::Sphere { radius } => positive(*radius),
            ShapeDesc::Capsule { radius, height } => positive(*radius) && height.is_finite() && *height >= 0.0,
            ShapeDesc::Plane { normal, constant } => {
                constant.is_finite()
                    && normal.iter().all(|v| v.is_finite())
                    && normal.norm_squared() > f32::EPSILON
            }
        }
    }

    /// Principal moments of inertia for the given mass; zero for massless bodies
    pub fn local_inertia(&self, mass: f32) -> Vec3 {
        if mass <= 0.0 {
            return Vec3::zeros();
        }
        match self {
            ShapeDesc::Box { half_extents } => {
                let size = half_extents * 2.0;
                let (x2, y2, z2) = (size.x * size.x, size.y * size.y, size.z * size.z);
                Vec3::new(y2 + z2, x2 + z2, x2 + y2) * (mass / 12.0)
            }
            ShapeDesc::Sphere { radius } => {
                let i = 0.4 * mass * radius * radius;
                Vec3::new(i, i, i)
            }
            ShapeDesc::Capsule { radius, height } => {
                // Bounding-box approximation
                let size = Vec3::new(*radius * 2.0, height + radius * 2.0, *radius * 2.0);
                let (x2, y2, z2) = (size.x * size.x, size.y * size.y, size.z * size.z);
                Vec3::new(y2 + z2, x2 + z2, x2 + y2) * (mass / 12.0)
            }
            ShapeDesc::Plane { .. } => Vec3::zeros(),
        }
    }
}

#[derive(Debug, Clone)]
struct ShapeEntry {
    desc: ShapeDesc,
    refs: u32,
}

/// Reference-counted collection of collision shapes
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: SlotMap<ShapeKey, ShapeEntry>,
}

impl ShapeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape with one reference held by the caller
    pub fn create(&mut self, desc: ShapeDesc) -> Result<ShapeKey, PhysicsError> {
        if !desc.is_valid() {
            log::error!("ShapeRegistry::create: invalid shape {desc:?}");
            return Err(PhysicsError::InvalidShape(format!("{desc:?}")));
        }
        Ok(self.shapes.insert(ShapeEntry { desc, refs: 1 }))
    }

    /// Key of a registered shape equal to `desc`, without touching the count
    pub fn find(&self, desc: &ShapeDesc) -> Option<ShapeKey> {
        self.shapes
            .iter()
            .find_map(|(key, entry)| (entry.desc == *desc).then_some(key))
    }

    /// Take a reference to a shape equal to `desc`, registering it if none exists
    pub fn acquire(&mut self, desc: ShapeDesc) -> Result<ShapeKey, PhysicsError> {
        match self.find(&desc) {
            Some(key) => {
                self.retain(key)?;
                Ok(key)
            }
            None => self.create(desc),
        }
    }

    /// Add a reference
    pub fn retain(&mut self, key: ShapeKey) -> Result<u32, PhysicsError> {
        let entry = self.shapes.get_mut(key).ok_or(PhysicsError::UnknownShape)?;
        entry.refs += 1;
        Ok(entry.refs)
    }

    /// Drop a reference; returns true when the shape was destroyed
    pub fn release(&mut self, key: ShapeKey) -> bool {
        let Some(entry) = self.shapes.get_mut(key) else {
            log::warn!("ShapeRegistry::release: unknown shape {key:?}");
            return false;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            self.shapes.remove(key);
            true
        } else {
            false
        }
    }

    /// Shape description
    pub fn get(&self, key: ShapeKey) -> Option<&ShapeDesc> {
        self.shapes.get(key).map(|entry| &entry.desc)
    }

    /// Current reference count
    pub fn refs(&self, key: ShapeKey) -> Option<u32> {
        self.shapes.get(key).map(|entry| entry.refs)
    }

    /// Number of live shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the registry holds no shapes
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn validity_rules() {
        assert!(ShapeDesc::default_box().is_valid());
        assert!(!ShapeDesc::Sphere { radius: 0.0 }.is_valid());
        assert!(!ShapeDesc::Sphere { radius: f32::NAN }.is_valid());
        assert!(!ShapeDesc::Box { half_extents: Vec3::new(1.0, -1.0, 1.0) }.is_valid());
        assert!(ShapeDesc::Capsule { radius: 0.5, height: 0.0 }.is_valid());
        assert!(!ShapeDesc::Plane { normal: Vec3::zeros(), constant: 0.0 }.is_valid());
    }

    #[test]
    fn inertia_is_zero_for_static_bodies() {
        assert_eq!(ShapeDesc::default_box().local_inertia(0.0), Vec3::zeros());
        let sphere = ShapeDesc::Sphere { radius: 1.0 }.local_inertia(5.0);
        assert_relative_eq!(sphere, Vec3::new(2.0, 2.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn shapes_are_destroyed_with_last_reference() {
        let mut registry = ShapeRegistry::new();
        let key = registry.create(ShapeDesc::Sphere { radius: 1.0 }).unwrap();
        assert_eq!(registry.retain(key).unwrap(), 2);
        assert!(!registry.release(key));
        assert_eq!(registry.refs(key), Some(1));
        assert!(registry.release(key));
        assert!(registry.get(key).is_none());
        assert!(!registry.release(key), "stale key must be ignored");
    }

    #[test]
    fn acquire_shares_identical_shapes() {
        let mut registry = ShapeRegistry::new();
        let a = registry.acquire(ShapeDesc::Sphere { radius: 0.5 }).unwrap();
        let b = registry.acquire(ShapeDesc::Sphere { radius: 0.5 }).unwrap();
        let c = registry.acquire(ShapeDesc::Sphere { radius: 0.75 }).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.find(&ShapeDesc::Sphere { radius: 0.75 }), Some(c));
        assert_eq!(registry.refs(a), Some(2));
        assert_eq!(registry.len(), 2);
        assert!(registry.acquire(ShapeDesc::Sphere { radius: 0.0 }).is_err());
    }

    #[test]
    fn invalid_shape_is_rejected() {
        let mut registry = ShapeRegistry::new();
        let result = registry.create(ShapeDesc::Sphere { radius: -1.0 });
        assert!(matches!(result, Err(PhysicsError::InvalidShape(_))));
        assert!(registry.is_empty());
    }
}
