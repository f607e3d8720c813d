use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::input::KeyBindings;
use crate::projection::Camera;
use crate::render::Color;
use crate::Result;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: Camera,
    pub keys: KeyBindings,
    pub clear_color: Color,
    /// Name of the visualization to enable at startup, overriding the
    /// built-in enabled flags.
    pub visualization: Option<String>,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Configuration specific to the host window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub fullscreen: bool,
    /// Size used when not running full screen.
    pub width: u32,
    pub height: u32,
    /// Upper bound on presented frames per second.
    pub frame_rate: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Graphamatics".to_string(),
            fullscreen: true,
            width: 800,
            height: 600,
            frame_rate: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.window.fullscreen);
        assert_eq!(config.camera.fov_y_degrees, 45.0);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::from_json_str(
            r#"{
                "window": { "fullscreen": false, "width": 1024 },
                "keys": { "back": "Q" },
                "clear_color": { "r": 0.1, "g": 0.2, "b": 0.3 },
                "visualization": "Rotating Cube"
            }"#,
        )
        .unwrap();

        assert!(!config.window.fullscreen);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.keys.back, Key::Q);
        assert_eq!(config.clear_color, Color::rgb(0.1, 0.2, 0.3));
        assert_eq!(config.visualization.as_deref(), Some("Rotating Cube"));
    }

    #[test]
    fn malformed_documents_are_config_errors() {
        let err = AppConfig::from_json_str("{ \"window\": 3 }").unwrap_err();
        assert!(format!("{err}").starts_with("invalid configuration"));
    }

    #[test]
    fn binding_the_catch_all_key_is_rejected() {
        let err = AppConfig::from_json_str(r#"{ "keys": { "back": "Other" } }"#).unwrap_err();
        assert!(matches!(err, crate::GraphamaticsError::Config(_)));
    }

    #[test]
    fn missing_files_surface_io_errors() {
        let err = AppConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, crate::GraphamaticsError::Io(_)));
    }
}
