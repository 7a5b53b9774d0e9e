//! ECS Components module
//!
//! One module per component kind. Each type implements
//! [`Component`](crate::ecs::Component) to bind it to its store in the world.

pub mod transform;
pub mod camera;
pub mod model;
pub mod light;
pub mod rigid_body;

pub use transform::{Space, TransformComponent};
pub use camera::CameraComponent;
pub use model::{InstanceUniforms, ModelComponent};
pub use light::{LightComponent, LightType};
pub use rigid_body::{RigidBodyComponent, RigidBodyDesc};
