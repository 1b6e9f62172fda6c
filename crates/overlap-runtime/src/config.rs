//! Editor configuration
//!
//! Loaded from an optional TOML file, then overridden by environment variables:
//! - `OVERLAP_SNAP_TRANSLATION`
//! - `OVERLAP_SNAP_ROTATION` (degrees)
//! - `OVERLAP_SNAP_SCALE`
//!
//! Every section falls back to its defaults, so a partial file is valid.

use crate::widget::SnapIncrements;
use glam::Vec3;
use overlap_core::{OverlapError, Result};
use overlap_scene::{Camera, SceneOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "overlap".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [1.0, 2.5, 4.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Increments applied while Shift is held
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub translation: f32,
    pub rotation_degrees: f32,
    pub scale: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            translation: 0.5,
            rotation_degrees: 45.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub size: f32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self { size: 0.75 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clear_color: u32,
    pub grid_size: f32,
    pub grid_divisions: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let options = SceneOptions::default();
        Self {
            clear_color: options.clear_color,
            grid_size: options.grid_size,
            grid_divisions: options.grid_divisions,
        }
    }
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl EditorConfig {
    /// Load from a file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content).map_err(|e| {
            OverlapError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load `path` if given and present, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                log::warn!("Config {} not found, using defaults", path.display());
                Ok(Self::from_env())
            }
            None => Ok(Self::from_env()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are skipped.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut f32); 3] = [
            ("OVERLAP_SNAP_TRANSLATION", &mut self.snap.translation),
            ("OVERLAP_SNAP_ROTATION", &mut self.snap.rotation_degrees),
            ("OVERLAP_SNAP_SCALE", &mut self.snap.scale),
        ];
        for (key, slot) in targets {
            let Some(raw) = lookup(key) else {
                continue;
            };
            match raw.trim().parse::<f32>() {
                Ok(value) if value > 0.0 => *slot = value,
                _ => log::warn!("Ignoring {}={:?}: expected a positive number", key, raw),
            }
        }
    }

    pub fn build_camera(&self) -> Camera {
        let mut camera = Camera::looking_at(
            Vec3::from(self.camera.position),
            Vec3::from(self.camera.target),
            self.camera.fov_degrees,
            self.camera.near,
            self.camera.far,
        );
        camera.set_aspect(self.window.width as f32, self.window.height as f32);
        camera
    }

    pub fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            clear_color: self.scene.clear_color,
            grid_size: self.scene.grid_size,
            grid_divisions: self.scene.grid_divisions,
        }
    }

    pub fn snap_increments(&self) -> SnapIncrements {
        SnapIncrements {
            translation: self.snap.translation,
            rotation: self.snap.rotation_degrees.to_radians(),
            scale: self.snap.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_scene_constants() {
        let config = EditorConfig::default();
        assert_eq!(config.window.title, "overlap");
        assert_eq!(config.camera.position, [1.0, 2.5, 4.0]);
        assert_eq!(config.scene.clear_color, 0x111111);
        assert_relative_eq!(config.widget.size, 0.75);
        assert_relative_eq!(config.snap_increments().rotation, std::f32::consts::FRAC_PI_4);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = EditorConfig::from_toml_str(
            r#"
[snap]
translation = 0.25

[window]
width = 800
"#,
        )
        .unwrap();
        assert_relative_eq!(config.snap.translation, 0.25);
        assert_relative_eq!(config.snap.rotation_degrees, 45.0);
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let err = EditorConfig::from_toml_str("[snap]\ntranslation = \"lots\"").unwrap_err();
        assert!(matches!(err, OverlapError::TomlParse(_)));
    }

    #[test]
    fn overrides_apply_and_bad_values_are_skipped() {
        let env: HashMap<&str, &str> = [
            ("OVERLAP_SNAP_TRANSLATION", "0.1"),
            ("OVERLAP_SNAP_ROTATION", "fifteen"),
            ("OVERLAP_SNAP_SCALE", "-2"),
        ]
        .into_iter()
        .collect();

        let mut config = EditorConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_relative_eq!(config.snap.translation, 0.1);
        assert_relative_eq!(config.snap.rotation_degrees, 45.0);
        assert_relative_eq!(config.snap.scale, 1.0);
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = EditorConfig::default();
        config.scene.grid_divisions = 20;
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[camera]"));
        assert_eq!(EditorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn camera_uses_window_aspect() {
        let config = EditorConfig::default();
        let camera = config.build_camera();
        assert_relative_eq!(camera.aspect, 1280.0 / 720.0);
        assert_relative_eq!(camera.fov, 75.0);
    }
}
