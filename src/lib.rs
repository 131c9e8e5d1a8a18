//! A minimal glTF 2.0 viewer: loads a scene, uploads its buffers into
//! OpenGL vertex arrays, and draws it from a first-person camera.

pub mod camera;
pub mod config;
pub mod gui;
pub mod renderer;
pub mod viewer;

pub use camera::{Camera, CameraError, CameraInput, FirstPersonCameraController};
pub use config::{ConfigError, Dimension, ViewerConfig};
pub use viewer::{StopHandle, Viewer};
