//! Geometry, texture, shader and material caches behind one render device
//!
//! Every `load_*` either returns a cached handle with one more reference or
//! loads from disk, uploads through the device and caches the result. Every
//! `release_*` drops a reference and frees the GPU object when the count
//! reaches zero.

use std::path::{Path, PathBuf};

use super::cache::ResourceCache;
use super::material::{Material, MaterialFile, MaterialUniforms};
use super::obj_loader::ObjLoader;
use super::{GeometryHandle, MaterialHandle, ResourceError, ShaderHandle, TextureHandle};
use crate::render::{DeviceStats, GpuId, HeadlessDevice, MeshData, RenderDevice};

/// Uploaded geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    /// Device object
    pub gpu: GpuId,
    /// Vertex count
    pub vertex_count: usize,
    /// Triangle count
    pub triangle_count: usize,
}

/// Uploaded texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Device object
    pub gpu: GpuId,
    /// Size of the encoded file
    pub byte_len: usize,
}

/// Compiled shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    /// Device object
    pub gpu: GpuId,
}

/// All resource caches of a scene
pub struct Resources {
    root: PathBuf,
    device: Box<dyn RenderDevice>,
    geometries: ResourceCache<Geometry>,
    textures: ResourceCache<Texture>,
    shaders: ResourceCache<Shader>,
    materials: ResourceCache<Material>,
}

impl Resources {
    /// Resolve file names against `root` and upload through `device`
    pub fn new(root: impl Into<PathBuf>, device: Box<dyn RenderDevice>) -> Self {
        Self {
            root: root.into(),
            device,
            geometries: ResourceCache::new(),
            textures: ResourceCache::new(),
            shaders: ResourceCache::new(),
            materials: ResourceCache::new(),
        }
    }

    /// Resources backed by a [`HeadlessDevice`]
    pub fn headless(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Box::new(HeadlessDevice::new()))
    }

    /// Asset root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Device object counters
    pub fn device_stats(&self) -> DeviceStats {
        self.device.stats()
    }

    /// Geometry cache
    pub fn geometries(&self) -> &ResourceCache<Geometry> {
        &self.geometries
    }

    /// Texture cache
    pub fn textures(&self) -> &ResourceCache<Texture> {
        &self.textures
    }

    /// Shader cache
    pub fn shaders(&self) -> &ResourceCache<Shader> {
        &self.shaders
    }

    /// Material cache
    pub fn materials(&self) -> &ResourceCache<Material> {
        &self.materials
    }

    /// Load an OBJ file
    pub fn load_geometry(&mut self, name: &str) -> Result<GeometryHandle, ResourceError> {
        let path = self.root.join(name);
        let device = &mut self.device;
        self.geometries
            .acquire(name, || {
                let mesh = ObjLoader::load_obj(&path).map_err(|source| ResourceError::Geometry {
                    name: name.to_string(),
                    source,
                })?;
                upload_geometry(device.as_mut(), name, &mesh)
            })
            .inspect_err(|e| log::error!("failed to load geometry '{name}': {e}"))
    }

    /// Cache in-memory geometry under `name`, or reference the cached entry
    pub fn add_geometry(&mut self, name: &str, mesh: &MeshData) -> Result<GeometryHandle, ResourceError> {
        let device = &mut self.device;
        self.geometries
            .acquire(name, || upload_geometry(device.as_mut(), name, mesh))
            .inspect_err(|e| log::error!("failed to upload geometry '{name}': {e}"))
    }

    /// Add a reference to cached geometry
    pub fn retain_geometry(&mut self, handle: GeometryHandle) -> Result<u32, ResourceError> {
        self.geometries.retain(handle)
    }

    /// Drop a geometry reference
    pub fn release_geometry(&mut self, handle: GeometryHandle) -> Result<(), ResourceError> {
        if let Some(geometry) = self.geometries.release(handle)? {
            self.device.destroy(geometry.gpu);
        }
        Ok(())
    }

    /// Load a texture file
    pub fn load_texture(&mut self, name: &str) -> Result<TextureHandle, ResourceError> {
        let path = self.root.join(name);
        let device = &mut self.device;
        self.textures
            .acquire(name, || {
                let bytes = read_bytes(&path)?;
                let gpu = device.upload_texture(name, &bytes)?;
                Ok(Texture {
                    gpu,
                    byte_len: bytes.len(),
                })
            })
            .inspect_err(|e| log::error!("failed to load texture '{name}': {e}"))
    }

    /// Add a reference to a cached texture
    pub fn retain_texture(&mut self, handle: TextureHandle) -> Result<u32, ResourceError> {
        self.textures.retain(handle)
    }

    /// Drop a texture reference
    pub fn release_texture(&mut self, handle: TextureHandle) -> Result<(), ResourceError> {
        if let Some(texture) = self.textures.release(handle)? {
            self.device.destroy(texture.gpu);
        }
        Ok(())
    }

    /// Load and compile a shader source file
    pub fn load_shader(&mut self, name: &str) -> Result<ShaderHandle, ResourceError> {
        let path = self.root.join(name);
        let device = &mut self.device;
        self.shaders
            .acquire(name, || {
                let source = String::from_utf8(read_bytes(&path)?).map_err(|e| ResourceError::Material {
                    name: name.to_string(),
                    reason: format!("shader source is not UTF-8: {e}"),
                })?;
                let gpu = device.compile_program(name, &source)?;
                Ok(Shader { gpu })
            })
            .inspect_err(|e| log::error!("failed to load shader '{name}': {e}"))
    }

    /// Drop a shader reference
    pub fn release_shader(&mut self, handle: ShaderHandle) -> Result<(), ResourceError> {
        if let Some(shader) = self.shaders.release(handle)? {
            self.device.destroy(shader.gpu);
        }
        Ok(())
    }

    /// Load a JSON material file together with its shader and textures
    pub fn load_material(&mut self, name: &str) -> Result<MaterialHandle, ResourceError> {
        if let Some(handle) = self.materials.find(name) {
            self.materials.retain(handle)?;
            return Ok(handle);
        }
        let path = self.root.join(name);
        let file: MaterialFile = read_bytes(&path)
            .and_then(|bytes| {
                serde_json::from_slice(&bytes).map_err(|e| ResourceError::Material {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            })
            .inspect_err(|e| log::error!("failed to load material '{name}': {e}"))?;
        self.create_material(name, &file)
    }

    /// Cache a material built from an in-memory description
    pub fn create_material(&mut self, name: &str, file: &MaterialFile) -> Result<MaterialHandle, ResourceError> {
        if let Some(handle) = self.materials.find(name) {
            self.materials.retain(handle)?;
            return Ok(handle);
        }
        let material = self.build_material(name, file)?;
        self.materials.acquire(name, || Ok(material))
    }

    fn build_material(&mut self, name: &str, file: &MaterialFile) -> Result<Material, ResourceError> {
        if file.shader.is_empty() {
            log::error!("material '{name}' names no shader");
            return Err(ResourceError::Material {
                name: name.to_string(),
                reason: "no shader".to_string(),
            });
        }
        let shader = self.load_shader(&file.shader)?;
        let mut uniforms = MaterialUniforms {
            diffuse_map: None,
            normal_map: None,
            color: file.color,
            shininess: file.shininess,
        };

        let textures = [(&file.diffuse_map, 0), (&file.normal_map, 1)];
        for (texture, slot) in textures {
            let Some(texture) = texture else {
                continue;
            };
            match self.load_texture(texture) {
                Ok(handle) if slot == 0 => uniforms.diffuse_map = Some(handle),
                Ok(handle) => uniforms.normal_map = Some(handle),
                Err(e) => {
                    if let Err(release) = uniforms.release(self).and(self.release_shader(shader)) {
                        log::warn!("material '{name}': rollback failed: {release}");
                    }
                    return Err(e);
                }
            }
        }

        Ok(Material {
            kind: file.kind,
            shader,
            uniforms,
        })
    }

    /// Add a reference to a cached material
    pub fn retain_material(&mut self, handle: MaterialHandle) -> Result<u32, ResourceError> {
        self.materials.retain(handle)
    }

    /// Drop a material reference; the last one releases its shader and textures
    pub fn release_material(&mut self, handle: MaterialHandle) -> Result<(), ResourceError> {
        let Some(material) = self.materials.release(handle)? else {
            return Ok(());
        };
        let textures = material.uniforms.release(self);
        let shader = self.release_shader(material.shader);
        textures.and(shader)
    }

    /// Loaded material
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    /// Overwrite a cached material's uniforms, keeping texture counts exact
    pub fn set_material_uniforms(
        &mut self,
        handle: MaterialHandle,
        uniforms: &MaterialUniforms,
    ) -> Result<(), ResourceError> {
        // Take the uniforms out so the texture cache can be borrowed mutably
        let mut current = match self.materials.get_mut(handle) {
            Some(material) => std::mem::take(&mut material.uniforms),
            None => return Err(ResourceError::InvalidHandle),
        };
        let result = current.assign_from(uniforms, self);
        if let Some(material) = self.materials.get_mut(handle) {
            material.uniforms = current;
        }
        result
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ResourceError> {
    std::fs::read(path).map_err(|source| ResourceError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn upload_geometry(device: &mut dyn RenderDevice, name: &str, mesh: &MeshData) -> Result<Geometry, ResourceError> {
    let gpu = device.upload_geometry(name, mesh)?;
    Ok(Geometry {
        gpu,
        vertex_count: mesh.vertices.len(),
        triangle_count: mesh.triangle_count(),
    })
}
