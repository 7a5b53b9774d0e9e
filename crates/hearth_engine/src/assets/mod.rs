//! Asset loading and reference-counted resource caches

pub mod cache;
pub mod material;
pub mod obj_loader;
pub mod resources;

pub use cache::ResourceCache;
pub use material::{Material, MaterialFile, MaterialKind, MaterialUniforms};
pub use obj_loader::{ObjError, ObjLoader};
pub use resources::{Geometry, Resources, Shader, Texture};

use thiserror::Error;

use crate::foundation::collections::TypedHandle;
use crate::render::RenderError;

/// Handle to cached geometry
pub type GeometryHandle = TypedHandle<Geometry>;
/// Handle to a cached texture
pub type TextureHandle = TypedHandle<Texture>;
/// Handle to a cached shader program
pub type ShaderHandle = TypedHandle<Shader>;
/// Handle to a cached material
pub type MaterialHandle = TypedHandle<Material>;

/// Resource loading errors
#[derive(Error, Debug)]
pub enum ResourceError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// OBJ parse failure
    #[error("Failed to load geometry '{name}': {source}")]
    Geometry {
        name: String,
        #[source]
        source: ObjError,
    },

    /// Upload or compile failure
    #[error("Render device error: {0}")]
    Render(#[from] RenderError),

    /// Malformed material file
    #[error("Invalid material '{name}': {reason}")]
    Material { name: String, reason: String },

    /// Handle does not name a live entry
    #[error("Stale or invalid resource handle")]
    InvalidHandle,
}
