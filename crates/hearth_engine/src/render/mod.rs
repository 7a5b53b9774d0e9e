//! Render-side contracts
//!
//! The GPU backend is reached only through [`RenderDevice`]; the scene hands
//! it geometry, textures and shader sources and, every frame, a
//! [`RenderQueue`] of batched draw items plus the active camera.

pub mod device;
pub mod mesh;
pub mod queue;

pub use device::{DeviceStats, GpuId, HeadlessDevice, RenderDevice, RenderError};
pub use mesh::{MeshData, Vertex};
pub use queue::{active_camera, DrawItem, RenderBatch, RenderQueue};
