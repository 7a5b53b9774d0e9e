//! Materials: a shader plus uniforms that may reference textures
//!
//! Texture references inside [`MaterialUniforms`] are counted. The type is
//! not `Clone`: copies go through [`MaterialUniforms::clone_retained`] and
//! overwrites through [`MaterialUniforms::assign_from`], which adjust the
//! texture cache so counts stay exact.

use serde::{Deserialize, Serialize};

use super::resources::Resources;
use super::{ResourceError, ShaderHandle, TextureHandle};

/// Shading model the render backend should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Flat color or texture, no lighting
    Unlit,
    /// Blinn-Phong lighting
    #[default]
    Phong,
    /// Metallic-roughness PBR
    Pbr,
}

/// On-disk material description (JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MaterialFile {
    /// Shading model
    pub kind: MaterialKind,
    /// Shader program file
    pub shader: String,
    /// Optional diffuse texture file
    pub diffuse_map: Option<String>,
    /// Optional normal map file
    pub normal_map: Option<String>,
    /// Base color
    pub color: [f32; 4],
    /// Specular exponent
    pub shininess: f32,
}

impl Default for MaterialFile {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Phong,
            shader: String::new(),
            diffuse_map: None,
            normal_map: None,
            color: [1.0, 1.0, 1.0, 1.0],
            shininess: 32.0,
        }
    }
}

/// Per-material uniform values, holding counted texture references
#[derive(Debug, PartialEq)]
pub struct MaterialUniforms {
    /// Diffuse texture
    pub diffuse_map: Option<TextureHandle>,
    /// Normal map
    pub normal_map: Option<TextureHandle>,
    /// Base color
    pub color: [f32; 4],
    /// Specular exponent
    pub shininess: f32,
}

impl Default for MaterialUniforms {
    fn default() -> Self {
        Self {
            diffuse_map: None,
            normal_map: None,
            color: [1.0, 1.0, 1.0, 1.0],
            shininess: 32.0,
        }
    }
}

impl MaterialUniforms {
    fn textures(&self) -> impl Iterator<Item = TextureHandle> {
        self.diffuse_map.into_iter().chain(self.normal_map)
    }

    /// Take one reference to each texture of `self`, or none at all
    fn retain_textures(&self, resources: &mut Resources) -> Result<(), ResourceError> {
        if let Some(stale) = self.textures().find(|&t| resources.textures().get(t).is_none()) {
            log::error!("MaterialUniforms: stale texture handle {stale:?}");
            return Err(ResourceError::InvalidHandle);
        }
        let mut retained = Vec::with_capacity(2);
        for texture in self.textures() {
            if let Err(e) = resources.retain_texture(texture) {
                for texture in retained {
                    // Retained a moment ago, so the release cannot miss
                    let _ = resources.release_texture(texture);
                }
                return Err(e);
            }
            retained.push(texture);
        }
        Ok(())
    }

    /// Copy that holds its own references to every texture.
    ///
    /// Fails without touching any count when a texture handle is stale.
    pub fn clone_retained(&self, resources: &mut Resources) -> Result<Self, ResourceError> {
        self.retain_textures(resources)?;
        Ok(Self {
            diffuse_map: self.diffuse_map,
            normal_map: self.normal_map,
            color: self.color,
            shininess: self.shininess,
        })
    }

    /// Overwrite with `other`: take references to its textures, then release ours.
    ///
    /// Fails without changes when `other` holds a stale texture. Once the new
    /// references are taken the overwrite always completes; stale handles
    /// among the old textures are logged and skipped.
    pub fn assign_from(&mut self, other: &MaterialUniforms, resources: &mut Resources) -> Result<(), ResourceError> {
        other.retain_textures(resources)?;
        for texture in self.textures() {
            if let Err(e) = resources.release_texture(texture) {
                log::warn!("MaterialUniforms::assign_from: dropping old texture {texture:?}: {e}");
            }
        }
        self.diffuse_map = other.diffuse_map;
        self.normal_map = other.normal_map;
        self.color = other.color;
        self.shininess = other.shininess;
        Ok(())
    }

    /// Give back every texture reference, returning the first failure
    pub fn release(self, resources: &mut Resources) -> Result<(), ResourceError> {
        let mut outcome = Ok(());
        for texture in self.textures() {
            if let Err(e) = resources.release_texture(texture) {
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        }
        outcome
    }
}

/// A loaded material
#[derive(Debug, PartialEq)]
pub struct Material {
    /// Shading model
    pub kind: MaterialKind,
    /// Shader program reference
    pub shader: ShaderHandle,
    /// Uniform values and texture references
    pub uniforms: MaterialUniforms,
}
