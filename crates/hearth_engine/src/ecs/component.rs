//! Component kinds and the trait tying component types to their stores

use std::fmt;

use bitflags::bitflags;

use super::storage::ComponentStore;
use super::world::World;

/// The fixed set of component kinds an entity can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// Position, rotation and scale; always present
    Transform,
    /// View/projection parameters
    Camera,
    /// Renderable geometry and material
    Model,
    /// Light source
    Light,
    /// Physics rigid body
    RigidBody,
}

impl ComponentKind {
    /// Number of component kinds
    pub const COUNT: usize = 5;

    /// All kinds in declaration order
    pub const ALL: [ComponentKind; Self::COUNT] = [
        ComponentKind::Transform,
        ComponentKind::Camera,
        ComponentKind::Model,
        ComponentKind::Light,
        ComponentKind::RigidBody,
    ];

    /// Order in which components are torn down when an entity is destroyed.
    ///
    /// RigidBody goes first so the physics world never holds a body whose
    /// transform is gone. Transform goes last since every other kind assumes
    /// it exists.
    pub const TEARDOWN_ORDER: [ComponentKind; Self::COUNT] = [
        ComponentKind::RigidBody,
        ComponentKind::Camera,
        ComponentKind::Light,
        ComponentKind::Model,
        ComponentKind::Transform,
    ];

    /// Position in the per-entity slot table
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit for this kind in a [`ComponentMask`]
    pub const fn mask(self) -> ComponentMask {
        match self {
            ComponentKind::Transform => ComponentMask::TRANSFORM,
            ComponentKind::Camera => ComponentMask::CAMERA,
            ComponentKind::Model => ComponentMask::MODEL,
            ComponentKind::Light => ComponentMask::LIGHT,
            ComponentKind::RigidBody => ComponentMask::RIGID_BODY,
        }
    }

    /// Name used in logs and scene documents
    pub const fn name(self) -> &'static str {
        match self {
            ComponentKind::Transform => "Transform",
            ComponentKind::Camera => "Camera",
            ComponentKind::Model => "Model",
            ComponentKind::Light => "Light",
            ComponentKind::RigidBody => "RigidBody",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of component kinds attached to an entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentMask: u8 {
        /// Transform attached
        const TRANSFORM = 1 << 0;
        /// Camera attached
        const CAMERA = 1 << 1;
        /// Model attached
        const MODEL = 1 << 2;
        /// Light attached
        const LIGHT = 1 << 3;
        /// RigidBody attached
        const RIGID_BODY = 1 << 4;
    }
}

/// A component type with a dedicated store in the [`World`]
pub trait Component: Sized + 'static {
    /// Kind tag of this component type
    const KIND: ComponentKind;

    /// The store holding components of this type
    fn store(world: &World) -> &ComponentStore<Self>;

    /// Mutable access to the store holding components of this type
    fn store_mut(world: &mut World) -> &mut ComponentStore<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teardown_order_covers_every_kind_once() {
        let mut seen = ComponentMask::empty();
        for kind in ComponentKind::TEARDOWN_ORDER {
            assert!(!seen.contains(kind.mask()));
            seen |= kind.mask();
        }
        assert_eq!(seen, ComponentMask::all());
        assert_eq!(ComponentKind::TEARDOWN_ORDER[0], ComponentKind::RigidBody);
        assert_eq!(ComponentKind::TEARDOWN_ORDER[4], ComponentKind::Transform);
    }

    #[test]
    fn slot_indices_are_dense() {
        for (i, kind) in ComponentKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
