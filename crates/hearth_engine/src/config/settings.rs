//! Engine settings file
//!
//! A flat JSON object of integer dimensions. A missing file is replaced by
//! defaults and written back; an unreadable one falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Config;

/// Window, render target and shadow map dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EngineSettings {
    /// Window width in pixels
    pub window_width: u32,
    /// Window height in pixels
    pub window_height: u32,
    /// Render target width in pixels
    pub render_width: u32,
    /// Render target height in pixels
    pub render_height: u32,
    /// Shadow map width in texels
    pub shadow_map_width: u32,
    /// Shadow map height in texels
    pub shadow_map_height: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            render_width: 1280,
            render_height: 720,
            shadow_map_width: 2048,
            shadow_map_height: 2048,
        }
    }
}

impl Config for EngineSettings {}

impl EngineSettings {
    /// Load settings, falling back to defaults.
    ///
    /// A missing file is created with the defaults. A malformed file is left
    /// alone. Neither case is an error.
    pub fn load_or_create(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("settings file {} not found, writing defaults", path.display());
            let settings = Self::default();
            if let Err(e) = settings.save_to_file(path) {
                log::warn!("could not write settings file {}: {e}", path.display());
            }
            return settings;
        }

        match Self::load_from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("could not read settings file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Width over height of the render target
    pub fn render_aspect(&self) -> f32 {
        if self.render_height == 0 {
            return 1.0;
        }
        self.render_width as f32 / self.render_height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = EngineSettings::load_or_create(&path);
        assert_eq!(settings, EngineSettings::default());
        assert!(path.exists());

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["WindowWidth"], 1280);
        assert_eq!(written["ShadowMapHeight"], 2048);
    }

    #[test]
    fn existing_values_are_kept_and_gaps_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "WindowWidth": 800, "WindowHeight": 600 }"#).unwrap();
        let settings = EngineSettings::load_or_create(&path);
        assert_eq!(settings.window_width, 800);
        assert_eq!(settings.window_height, 600);
        assert_eq!(settings.render_width, 1280);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(EngineSettings::load_or_create(&path), EngineSettings::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn aspect_guards_zero_height() {
        let settings = EngineSettings {
            render_height: 0,
            ..EngineSettings::default()
        };
        assert_eq!(settings.render_aspect(), 1.0);
    }
}
