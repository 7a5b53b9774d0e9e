//! Render device contract
//!
//! The resource caches upload through a [`RenderDevice`] and destroy what
//! they uploaded when the last reference goes away. [`HeadlessDevice`] keeps
//! the books without a GPU.

use std::collections::HashSet;

use super::mesh::MeshData;

/// Opaque GPU object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuId(pub u32);

/// Rendering errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Geometry or texture data was rejected
    #[error("upload of '{name}' failed: {reason}")]
    UploadFailed {
        /// Resource name
        name: String,
        /// Device message
        reason: String,
    },

    /// Shader program failed to compile
    #[error("shader '{name}' failed to compile: {log}")]
    CompileFailed {
        /// Shader name
        name: String,
        /// Compiler output
        log: String,
    },
}

/// Object counters kept by a device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Objects created since startup
    pub created: usize,
    /// Objects destroyed since startup
    pub destroyed: usize,
    /// Destroy calls for objects that were not alive
    pub invalid_destroys: usize,
}

impl DeviceStats {
    /// Objects currently alive
    pub fn live(&self) -> usize {
        self.created - self.destroyed
    }
}

/// GPU-side operations the engine core needs
pub trait RenderDevice {
    /// Upload vertex and index buffers
    fn upload_geometry(&mut self, name: &str, mesh: &MeshData) -> Result<GpuId, RenderError>;

    /// Upload an encoded texture
    fn upload_texture(&mut self, name: &str, bytes: &[u8]) -> Result<GpuId, RenderError>;

    /// Compile a shader program
    fn compile_program(&mut self, name: &str, source: &str) -> Result<GpuId, RenderError>;

    /// Free a GPU object
    fn destroy(&mut self, id: GpuId);

    /// Object counters
    fn stats(&self) -> DeviceStats;
}

/// Device that allocates ids and counts objects without touching a GPU
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    next_id: u32,
    live: HashSet<GpuId>,
    stats: DeviceStats,
}

impl HeadlessDevice {
    /// Create a device with no objects
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> GpuId {
        self.next_id += 1;
        let id = GpuId(self.next_id);
        self.live.insert(id);
        self.stats.created += 1;
        id
    }
}

impl RenderDevice for HeadlessDevice {
    fn upload_geometry(&mut self, name: &str, mesh: &MeshData) -> Result<GpuId, RenderError> {
        if !mesh.is_valid() {
            return Err(RenderError::UploadFailed {
                name: name.to_string(),
                reason: "mesh has no vertices or out-of-range indices".to_string(),
            });
        }
        Ok(self.allocate())
    }

    fn upload_texture(&mut self, name: &str, bytes: &[u8]) -> Result<GpuId, RenderError> {
        if bytes.is_empty() {
            return Err(RenderError::UploadFailed {
                name: name.to_string(),
                reason: "empty texture data".to_string(),
            });
        }
        Ok(self.allocate())
    }

    fn compile_program(&mut self, name: &str, source: &str) -> Result<GpuId, RenderError> {
        if source.trim().is_empty() {
            return Err(RenderError::CompileFailed {
                name: name.to_string(),
                log: "empty shader source".to_string(),
            });
        }
        Ok(self.allocate())
    }

    fn destroy(&mut self, id: GpuId) {
        if self.live.remove(&id) {
            self.stats.destroyed += 1;
        } else {
            log::error!("HeadlessDevice::destroy: {id:?} is not alive");
            self.stats.invalid_destroys += 1;
        }
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesh::Vertex;

    #[test]
    fn counts_creation_and_destruction() {
        let mut device = HeadlessDevice::new();
        let texture = device.upload_texture("a.png", &[1, 2, 3]).unwrap();
        let program = device.compile_program("lit", "void main() {}").unwrap();
        assert_ne!(texture, program);
        device.destroy(texture);
        device.destroy(texture);
        let stats = device.stats();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.destroyed, 1);
        assert_eq!(stats.invalid_destroys, 1);
        assert_eq!(stats.live(), 1);
    }

    #[test]
    fn rejects_bad_input() {
        let mut device = HeadlessDevice::new();
        assert!(device.compile_program("empty", "  ").is_err());
        assert!(device.upload_texture("none", &[]).is_err());
        let mesh = MeshData::new(vec![Vertex::new([0.0; 3], [0.0; 3], [0.0; 2])], vec![0, 1, 2]);
        assert!(device.upload_geometry("broken", &mesh).is_err());
        assert_eq!(device.stats().created, 0);
    }
}
