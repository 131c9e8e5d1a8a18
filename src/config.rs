use std::fmt;
use std::path::PathBuf;

use crate::camera::Camera;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => write!(f, "width"),
            Dimension::Height => write!(f, "height"),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {dimension}={value}, should be positive")]
    InvalidDimension { dimension: Dimension, value: i32 },
}

/// Everything the viewer needs to know before it opens a window.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub asset: PathBuf,
    /// Replaces the camera derived from the scene bounds.
    pub camera: Option<Camera>,
    pub vertex_shader: Option<PathBuf>,
    pub fragment_shader: Option<PathBuf>,
    /// Render a single frame into this PNG file instead of opening an
    /// interactive window.
    pub output: Option<PathBuf>,
    pub vsync: bool,
}

impl ViewerConfig {
    pub fn new(
        width: i32,
        height: i32,
        title: impl Into<String>,
        asset: impl Into<PathBuf>,
    ) -> Result<ViewerConfig, ConfigError> {
        let width = positive(Dimension::Width, width)?;
        let height = positive(Dimension::Height, height)?;
        Ok(ViewerConfig {
            width,
            height,
            title: title.into(),
            asset: asset.into(),
            camera: None,
            vertex_shader: None,
            fragment_shader: None,
            output: None,
            vsync: true,
        })
    }

    pub fn with_camera(mut self, camera: Option<Camera>) -> ViewerConfig {
        self.camera = camera;
        self
    }

    pub fn with_shaders(
        mut self,
        vertex_shader: Option<PathBuf>,
        fragment_shader: Option<PathBuf>,
    ) -> ViewerConfig {
        self.vertex_shader = vertex_shader;
        self.fragment_shader = fragment_shader;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> ViewerConfig {
        self.output = output;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> ViewerConfig {
        self.vsync = vsync;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

fn positive(dimension: Dimension, value: i32) -> Result<u32, ConfigError> {
    match u32::try_from(value) {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidDimension { dimension, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_dimensions_are_accepted() {
        let config = ViewerConfig::new(1280, 720, "glTF Viewer", "scene.gltf").unwrap();
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.asset, PathBuf::from("scene.gltf"));
        assert!(config.vsync);
        assert_eq!(config.output, None);
    }

    #[test]
    fn non_positive_dimensions_name_the_culprit() {
        assert_eq!(
            ViewerConfig::new(0, 720, "", "a.gltf"),
            Err(ConfigError::InvalidDimension {
                dimension: Dimension::Width,
                value: 0
            })
        );
        let error = ViewerConfig::new(640, -1, "", "a.gltf").unwrap_err();
        assert_eq!(error.to_string(), "invalid height=-1, should be positive");
    }

    #[test]
    fn width_is_checked_first() {
        let error = ViewerConfig::new(-5, -7, "", "a.gltf").unwrap_err();
        assert_eq!(error.to_string(), "invalid width=-5, should be positive");
    }

    #[test]
    fn aspect_ratio() {
        let config = ViewerConfig::new(800, 400, "", "a.gltf").unwrap();
        assert_eq!(config.aspect_ratio(), 2.0);
    }
}
