use glam::Mat4;

use crate::renderer::gltf::{MODEL_VIEW_MATRIX, MODEL_VIEW_PROJ_MATRIX, NORMAL_MATRIX};
use crate::renderer::gpu::{Gpu, Program, UniformLocation};

/// The per-draw matrices of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMatrices {
    pub model_view_proj: Mat4,
    pub model_view: Mat4,
    pub normal: Mat4,
}

impl NodeMatrices {
    /// A non-invertible model-view gives whatever `inverse` returns; it is
    /// not corrected.
    pub fn new(projection: &Mat4, view: &Mat4, local_to_world: &Mat4) -> NodeMatrices {
        let model_view = *view * *local_to_world;
        NodeMatrices {
            model_view_proj: *projection * model_view,
            model_view,
            normal: model_view.inverse().transpose(),
        }
    }
}

/// Uniform locations of the matrix inputs of the forward program.
///
/// A location is `None` when the linker optimized that uniform out; binding
/// it is then skipped, as OpenGL does for location -1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixUniforms {
    program: Program,
    model_view_proj: Option<UniformLocation>,
    model_view: Option<UniformLocation>,
    normal: Option<UniformLocation>,
}

impl MatrixUniforms {
    pub fn locate(gpu: &impl Gpu, program: Program) -> MatrixUniforms {
        let locate = |name| {
            let location = gpu.uniform_location(program, name);
            if location.is_none() {
                log::warn!("Uniform {name} is not active in program {}", program.0);
            }
            location
        };
        MatrixUniforms {
            program,
            model_view_proj: locate(MODEL_VIEW_PROJ_MATRIX),
            model_view: locate(MODEL_VIEW_MATRIX),
            normal: locate(NORMAL_MATRIX),
        }
    }

    pub fn program(&self) -> Program {
        self.program
    }

    /// Uploads the matrices to the program, which must be the active one.
    pub fn bind(&self, gpu: &mut impl Gpu, matrices: &NodeMatrices) {
        assert_eq!(
            gpu.current_program(),
            Some(self.program),
            "matrix uniforms bound while their program is not in use"
        );
        let uniforms = [
            (self.model_view_proj, &matrices.model_view_proj),
            (self.model_view, &matrices.model_view),
            (self.normal, &matrices.normal),
        ];
        for (location, matrix) in uniforms {
            if let Some(location) = location {
                gpu.uniform_matrix(location, matrix);
            }
        }
    }
}
