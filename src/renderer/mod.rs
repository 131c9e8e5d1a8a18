use glam::{Mat4, Vec3};

use crate::camera::Camera;

pub mod draw_calls;
pub mod gl;
pub mod gltf;
pub mod gpu;
pub mod uniforms;

use gltf::{Bounds, Document, SceneResources, ShaderSources, UploadError};
use gpu::{Gpu, GpuError};
use uniforms::MatrixUniforms;

/// Vertical field of view of the projection, in degrees.
pub const FIELD_OF_VIEW: f32 = 70.0;
/// Scene size assumed when the scene has no usable bounds.
const FALLBACK_DISTANCE: f32 = 100.0;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to create the forward shading program")]
    Program(#[source] GpuError),

    #[error("failed to upload the scene")]
    Upload(#[from] UploadError),

    #[error("failed to render offscreen")]
    Offscreen(#[source] GpuError),
}

/// Draws one glTF document with the forward shading program.
///
/// Owns every GPU object it creates and deletes them on drop.
pub struct Renderer<G: Gpu> {
    gpu: G,
    document: Document,
    resources: SceneResources,
    uniforms: MatrixUniforms,
    bounds: Option<Bounds>,
    projection: Mat4,
}

impl<G: Gpu> Renderer<G> {
    pub fn new(
        mut gpu: G,
        document: Document,
        shaders: &ShaderSources,
        aspect: f32,
    ) -> Result<Renderer<G>, Error> {
        let program = gpu
            .create_program(&shaders.vertex, &shaders.fragment)
            .map_err(Error::Program)?;
        let uniforms = MatrixUniforms::locate(&gpu, program);
        let resources = match gltf::upload(&mut gpu, &document) {
            Ok(resources) => resources,
            Err(err) => {
                gpu.delete_program(program);
                return Err(err.into());
            }
        };

        let bounds = gltf::scene_bounds(&document);
        match bounds {
            Some(Bounds { min, max }) => log::info!("Scene bounds: {min} .. {max}"),
            None => log::info!("Scene has no bounds, assuming a size of {FALLBACK_DISTANCE}"),
        }
        let projection = projection(max_distance(bounds), aspect);

        Ok(Renderer {
            gpu,
            document,
            resources,
            uniforms,
            bounds,
            projection,
        })
    }

    pub fn gpu(&self) -> &G {
        &self.gpu
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn resources(&self) -> &SceneResources {
        &self.resources
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Length of the scene's bounding box diagonal.
    pub fn max_distance(&self) -> f32 {
        max_distance(self.bounds)
    }

    /// Camera movement speed in world units per second, scaled to the scene.
    pub fn camera_speed(&self) -> f32 {
        0.5 * self.max_distance()
    }

    /// Recomputes the projection for a new window shape.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.projection = projection(self.max_distance(), width as f32 / height as f32);
        }
    }

    /// A camera looking at the scene's center from one diagonal away. Flat
    /// scenes (no depth) are looked at from the side instead.
    pub fn default_camera(&self) -> Camera {
        let Some(bounds) = self.bounds else {
            return Camera::default();
        };
        let center = bounds.center();
        let diagonal = bounds.diagonal();
        let up = Vec3::Y;
        let eye = if diagonal.z > 0.0 {
            center + diagonal
        } else {
            center + 2.0 * diagonal.cross(up)
        };
        Camera::new(eye, center, up).unwrap_or_default()
    }

    /// Draws the active scene into the bound framebuffer.
    pub fn render(&mut self, camera: &Camera, width: u32, height: u32) {
        self.gpu.begin_frame(width, height);
        self.gpu.use_program(Some(self.uniforms.program()));
        gltf::draw_scene(
            &mut self.gpu,
            &self.document,
            &self.resources,
            &self.uniforms,
            &self.projection,
            &camera.view_matrix(),
        );
        self.gpu.use_program(None);
    }

    /// Renders one frame offscreen and reads it back as RGB8 rows, bottom
    /// row first.
    pub fn render_to_pixels(
        &mut self,
        camera: &Camera,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, Error> {
        let target = self
            .gpu
            .create_render_target(width, height)
            .map_err(Error::Offscreen)?;
        self.gpu.bind_render_target(Some(&target));
        self.render(camera, width, height);
        let pixels = self.gpu.read_pixels(width, height);
        self.gpu.bind_render_target(None);
        self.gpu.delete_render_target(target);
        Ok(pixels)
    }
}

impl<G: Gpu> Drop for Renderer<G> {
    fn drop(&mut self) {
        self.resources.release(&mut self.gpu);
        self.gpu.delete_program(self.uniforms.program());
    }
}

fn max_distance(bounds: Option<Bounds>) -> f32 {
    bounds
        .map(|bounds| bounds.diagonal().length())
        .filter(|&distance| distance > 0.0)
        .unwrap_or(FALLBACK_DISTANCE)
}

fn projection(max_distance: f32, aspect: f32) -> Mat4 {
    Mat4::perspective_rh_gl(
        FIELD_OF_VIEW.to_radians(),
        aspect,
        0.001 * max_distance,
        1.5 * max_distance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scenes_fall_back_to_a_fixed_size() {
        assert_eq!(max_distance(None), FALLBACK_DISTANCE);
        let point = Bounds {
            min: Vec3::ONE,
            max: Vec3::ONE,
        };
        assert_eq!(max_distance(Some(point)), FALLBACK_DISTANCE);
    }

    #[test]
    fn projection_clips_to_the_scene_size() {
        let projection = projection(10.0, 1.0);
        let near = projection.project_point3(Vec3::new(0.0, 0.0, -0.01));
        let far = projection.project_point3(Vec3::new(0.0, 0.0, -15.0));
        assert!((near.z + 1.0).abs() < 1e-4, "{near}");
        assert!((far.z - 1.0).abs() < 1e-4, "{far}");
    }
}
