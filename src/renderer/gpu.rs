use glam::Mat4;

use crate::renderer::draw_calls::DrawCall;
use crate::renderer::gltf::ComponentType;

/// A GPU buffer object holding the bytes of one glTF buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferObject(pub u32);

/// A vertex array object describing the attribute layout of one primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArray(pub u32);

/// A linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Program(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

/// An offscreen framebuffer with color and depth attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub framebuffer: u32,
    pub color: u32,
    pub depth: u32,
}

/// How one vertex attribute slot reads its data out of a buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    pub components: i32,
    pub component_type: ComponentType,
    pub normalized: bool,
    /// Zero means tightly packed.
    pub stride: usize,
    pub offset: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum GpuError {
    #[error("failed to allocate {0}")]
    Allocation(&'static str),

    #[error("compiling {stage} shader failed: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("linking shader program failed: {0}")]
    ProgramLink(String),

    #[error("offscreen framebuffer is incomplete (status {0:#x})")]
    IncompleteFramebuffer(u32),
}

/// The graphics operations the scene pipeline needs.
///
/// Implementations follow the bind-before-use model of OpenGL: the
/// vertex-array-relative operations ([`Gpu::vertex_attribute`],
/// [`Gpu::element_buffer`], [`Gpu::draw`]) act on whatever vertex array is
/// currently bound. Callers go through [`VertexArrayBinding`] so that every
/// draw binds its own vertex array instead of relying on earlier calls.
pub trait Gpu {
    fn create_buffer(&mut self, data: &[u8]) -> Result<BufferObject, GpuError>;
    fn delete_buffers(&mut self, buffers: &[BufferObject]);

    fn create_vertex_arrays(&mut self, count: usize) -> Result<Vec<VertexArray>, GpuError>;
    fn delete_vertex_arrays(&mut self, vertex_arrays: &[VertexArray]);
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArray>);
    fn vertex_attribute(&mut self, slot: u32, buffer: BufferObject, layout: &AttributeLayout);
    fn element_buffer(&mut self, buffer: BufferObject);
    fn draw(&mut self, draw_call: &DrawCall);

    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<Program, GpuError>;
    fn delete_program(&mut self, program: Program);
    fn use_program(&mut self, program: Option<Program>);
    fn current_program(&self) -> Option<Program>;
    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation>;
    fn uniform_matrix(&mut self, location: UniformLocation, matrix: &Mat4);

    /// Sets the viewport, enables depth testing and clears color and depth.
    fn begin_frame(&mut self, width: u32, height: u32);

    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTarget, GpuError>;
    fn bind_render_target(&mut self, target: Option<&RenderTarget>);
    fn delete_render_target(&mut self, target: RenderTarget);
    /// Reads back the bound framebuffer as tightly packed RGB8 rows, bottom row first.
    fn read_pixels(&mut self, width: u32, height: u32) -> Vec<u8>;
}

impl<G: Gpu + ?Sized> Gpu for &mut G {
    fn create_buffer(&mut self, data: &[u8]) -> Result<BufferObject, GpuError> {
        (**self).create_buffer(data)
    }
    fn delete_buffers(&mut self, buffers: &[BufferObject]) {
        (**self).delete_buffers(buffers)
    }
    fn create_vertex_arrays(&mut self, count: usize) -> Result<Vec<VertexArray>, GpuError> {
        (**self).create_vertex_arrays(count)
    }
    fn delete_vertex_arrays(&mut self, vertex_arrays: &[VertexArray]) {
        (**self).delete_vertex_arrays(vertex_arrays)
    }
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArray>) {
        (**self).bind_vertex_array(vertex_array)
    }
    fn vertex_attribute(&mut self, slot: u32, buffer: BufferObject, layout: &AttributeLayout) {
        (**self).vertex_attribute(slot, buffer, layout)
    }
    fn element_buffer(&mut self, buffer: BufferObject) {
        (**self).element_buffer(buffer)
    }
    fn draw(&mut self, draw_call: &DrawCall) {
        (**self).draw(draw_call)
    }
    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<Program, GpuError> {
        (**self).create_program(vertex, fragment)
    }
    fn delete_program(&mut self, program: Program) {
        (**self).delete_program(program)
    }
    fn use_program(&mut self, program: Option<Program>) {
        (**self).use_program(program)
    }
    fn current_program(&self) -> Option<Program> {
        (**self).current_program()
    }
    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation> {
        (**self).uniform_location(program, name)
    }
    fn uniform_matrix(&mut self, location: UniformLocation, matrix: &Mat4) {
        (**self).uniform_matrix(location, matrix)
    }
    fn begin_frame(&mut self, width: u32, height: u32) {
        (**self).begin_frame(width, height)
    }
    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTarget, GpuError> {
        (**self).create_render_target(width, height)
    }
    fn bind_render_target(&mut self, target: Option<&RenderTarget>) {
        (**self).bind_render_target(target)
    }
    fn delete_render_target(&mut self, target: RenderTarget) {
        (**self).delete_render_target(target)
    }
    fn read_pixels(&mut self, width: u32, height: u32) -> Vec<u8> {
        (**self).read_pixels(width, height)
    }
}

/// A vertex array bound for the lifetime of this value. Unbinds on drop.
pub struct VertexArrayBinding<'a, G: Gpu> {
    gpu: &'a mut G,
}

impl<'a, G: Gpu> VertexArrayBinding<'a, G> {
    pub fn bind(gpu: &'a mut G, vertex_array: VertexArray) -> VertexArrayBinding<'a, G> {
        gpu.bind_vertex_array(Some(vertex_array));
        VertexArrayBinding { gpu }
    }

    pub fn attribute(&mut self, slot: u32, buffer: BufferObject, layout: &AttributeLayout) {
        self.gpu.vertex_attribute(slot, buffer, layout);
    }

    /// Binding the element buffer while the vertex array is bound records it
    /// in the vertex array.
    pub fn element_buffer(&mut self, buffer: BufferObject) {
        self.gpu.element_buffer(buffer);
    }

    pub fn draw(&mut self, draw_call: &DrawCall) {
        self.gpu.draw(draw_call);
    }
}

impl<G: Gpu> Drop for VertexArrayBinding<'_, G> {
    fn drop(&mut self) {
        self.gpu.bind_vertex_array(None);
    }
}
