//! OpenGL 3.3 core bindings, generated by `build.rs`, and the [`Gpu`]
//! implementation on top of them.

use std::ffi::{c_char, c_void, CStr, CString};
use std::fmt::{self, Display};

use glam::Mat4;

use crate::renderer::draw_calls::DrawCall;
use crate::renderer::gpu::{
    AttributeLayout, BufferObject, Gpu, GpuError, Program, RenderTarget, UniformLocation,
    VertexArray,
};

#[allow(clippy::all, non_camel_case_types, non_snake_case, non_upper_case_globals, unused)]
mod bindings {
    include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
}

pub use bindings::*;

/// Runs an unsafe OpenGL call, and in debug builds, checks `glGetError`
/// afterwards and panics with the error and call site if there was one.
macro_rules! call {
    ($expr:expr) => {{
        let result = unsafe { $expr };
        if cfg!(debug_assertions) {
            let error = unsafe { $crate::renderer::gl::GetError() };
            if error != $crate::renderer::gl::NO_ERROR {
                panic!(
                    "OpenGL error {} at {}:{}:{}",
                    $crate::renderer::gl::error_name(error),
                    file!(),
                    line!(),
                    column!(),
                );
            }
        }
        result
    }};
}

pub fn error_name(error: types::GLenum) -> String {
    match error {
        INVALID_ENUM => "INVALID_ENUM".to_string(),
        INVALID_VALUE => "INVALID_VALUE".to_string(),
        INVALID_OPERATION => "INVALID_OPERATION".to_string(),
        OUT_OF_MEMORY => "OUT_OF_MEMORY".to_string(),
        INVALID_FRAMEBUFFER_OPERATION => "INVALID_FRAMEBUFFER_OPERATION".to_string(),
        _ => format!("{error}"),
    }
}

/// Identification strings of the current context.
#[derive(Debug, Clone)]
pub struct GlInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub shading_language: String,
}

impl Display for GlInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (OpenGL {}, GLSL {})",
            self.vendor, self.renderer, self.version, self.shading_language,
        )
    }
}

/// The [`Gpu`] of the current OpenGL context.
///
/// Only one context is ever made current, on the main thread, so this holds
/// no state of its own.
pub struct GlGpu {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl GlGpu {
    /// Loads the function pointers with `loader` (e.g. SDL's
    /// `gl_get_proc_address`). The context must be current.
    pub fn load<F>(loader: F) -> GlGpu
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        load_with(loader);
        GlGpu {
            _not_send: std::marker::PhantomData,
        }
    }

    pub fn info(&self) -> GlInfo {
        GlInfo {
            vendor: get_string(VENDOR),
            renderer: get_string(RENDERER),
            version: get_string(VERSION),
            shading_language: get_string(SHADING_LANGUAGE_VERSION),
        }
    }
}

fn get_string(name: types::GLenum) -> String {
    let string = call!(GetString(name));
    if string.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(string as *const c_char) }
        .to_string_lossy()
        .into_owned()
}

fn info_log(length: i32, read: impl FnOnce(i32, *mut i32, *mut c_char)) -> String {
    let mut info_log = vec![0u8; length.max(1) as usize];
    let mut written = 0;
    read(info_log.len() as i32, &mut written, info_log.as_mut_ptr() as *mut c_char);
    info_log.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&info_log).into_owned()
}

/// Compiles a shader of the given kind, returning the info log on failure.
pub fn create_shader(shader_type: types::GLenum, source: &str) -> Result<u32, GpuError> {
    let stage = match shader_type {
        VERTEX_SHADER => "vertex",
        FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    };
    let shader = call!(CreateShader(shader_type));
    if shader == 0 {
        return Err(GpuError::Allocation("shader object"));
    }
    let sources = [source.as_ptr() as *const c_char];
    let source_lens = [source.len() as i32];
    call!(ShaderSource(shader, 1, sources.as_ptr(), source_lens.as_ptr()));
    call!(CompileShader(shader));
    let mut compile_status = 0;
    call!(GetShaderiv(shader, COMPILE_STATUS, &mut compile_status));
    if compile_status == FALSE as i32 {
        let mut length = 0;
        call!(GetShaderiv(shader, INFO_LOG_LENGTH, &mut length));
        let log = info_log(length, |capacity, written, buffer| {
            call!(GetShaderInfoLog(shader, capacity, written, buffer));
        });
        call!(DeleteShader(shader));
        return Err(GpuError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

/// Links the shaders into a program. The shaders are left for the caller to
/// delete.
pub fn create_program(shaders: &[u32]) -> Result<u32, GpuError> {
    let program = call!(CreateProgram());
    if program == 0 {
        return Err(GpuError::Allocation("shader program"));
    }
    for &shader in shaders {
        call!(AttachShader(program, shader));
    }
    call!(LinkProgram(program));
    let mut link_status = 0;
    call!(GetProgramiv(program, LINK_STATUS, &mut link_status));
    if link_status == FALSE as i32 {
        let mut length = 0;
        call!(GetProgramiv(program, INFO_LOG_LENGTH, &mut length));
        let log = info_log(length, |capacity, written, buffer| {
            call!(GetProgramInfoLog(program, capacity, written, buffer));
        });
        call!(DeleteProgram(program));
        return Err(GpuError::ProgramLink(log));
    }
    Ok(program)
}

impl Gpu for GlGpu {
    fn create_buffer(&mut self, data: &[u8]) -> Result<BufferObject, GpuError> {
        let mut buffer = 0;
        call!(GenBuffers(1, &mut buffer));
        if buffer == 0 {
            return Err(GpuError::Allocation("buffer object"));
        }
        call!(BindBuffer(ARRAY_BUFFER, buffer));
        // Not through call!, running out of memory is reported instead of
        // panicking.
        let error = unsafe {
            BufferData(
                ARRAY_BUFFER,
                data.len() as isize,
                data.as_ptr() as *const c_void,
                STATIC_DRAW,
            );
            GetError()
        };
        call!(BindBuffer(ARRAY_BUFFER, 0));
        if error != NO_ERROR {
            call!(DeleteBuffers(1, &buffer));
            log::error!("glBufferData of {} bytes failed: {}", data.len(), error_name(error));
            return Err(GpuError::Allocation("buffer object storage"));
        }
        Ok(BufferObject(buffer))
    }

    fn delete_buffers(&mut self, buffers: &[BufferObject]) {
        let names = buffers.iter().map(|buffer| buffer.0).collect::<Vec<_>>();
        call!(DeleteBuffers(names.len() as i32, names.as_ptr()));
    }

    fn create_vertex_arrays(&mut self, count: usize) -> Result<Vec<VertexArray>, GpuError> {
        let mut names = vec![0; count];
        if count > 0 {
            call!(GenVertexArrays(count as i32, names.as_mut_ptr()));
        }
        if names.contains(&0) {
            call!(DeleteVertexArrays(names.len() as i32, names.as_ptr()));
            return Err(GpuError::Allocation("vertex arrays"));
        }
        Ok(names.into_iter().map(VertexArray).collect())
    }

    fn delete_vertex_arrays(&mut self, vertex_arrays: &[VertexArray]) {
        let names = vertex_arrays.iter().map(|vao| vao.0).collect::<Vec<_>>();
        call!(DeleteVertexArrays(names.len() as i32, names.as_ptr()));
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArray>) {
        call!(BindVertexArray(vertex_array.map_or(0, |vao| vao.0)));
    }

    fn vertex_attribute(&mut self, slot: u32, buffer: BufferObject, layout: &AttributeLayout) {
        call!(BindBuffer(ARRAY_BUFFER, buffer.0));
        call!(EnableVertexAttribArray(slot));
        call!(VertexAttribPointer(
            slot,
            layout.components,
            layout.component_type.gl_enum(),
            if layout.normalized { TRUE } else { FALSE },
            layout.stride as i32,
            layout.offset as *const c_void,
        ));
        call!(BindBuffer(ARRAY_BUFFER, 0));
    }

    fn element_buffer(&mut self, buffer: BufferObject) {
        call!(BindBuffer(ELEMENT_ARRAY_BUFFER, buffer.0));
    }

    fn draw(&mut self, draw_call: &DrawCall) {
        match *draw_call {
            DrawCall::Arrays { mode, first, count } => {
                call!(DrawArrays(mode.gl_enum(), first, count));
            }
            DrawCall::Elements {
                mode,
                count,
                index_type,
                byte_offset,
            } => {
                call!(DrawElements(
                    mode.gl_enum(),
                    count,
                    index_type.gl_enum(),
                    byte_offset as *const c_void,
                ));
            }
        }
    }

    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<Program, GpuError> {
        let vertex_shader = create_shader(VERTEX_SHADER, vertex)?;
        let fragment_shader = match create_shader(FRAGMENT_SHADER, fragment) {
            Ok(shader) => shader,
            Err(err) => {
                call!(DeleteShader(vertex_shader));
                return Err(err);
            }
        };
        let program = create_program(&[vertex_shader, fragment_shader]);
        call!(DeleteShader(vertex_shader));
        call!(DeleteShader(fragment_shader));
        program.map(Program)
    }

    fn delete_program(&mut self, program: Program) {
        call!(DeleteProgram(program.0));
    }

    fn use_program(&mut self, program: Option<Program>) {
        call!(UseProgram(program.map_or(0, |program| program.0)));
    }

    fn current_program(&self) -> Option<Program> {
        let mut program = 0;
        call!(GetIntegerv(CURRENT_PROGRAM, &mut program));
        (program != 0).then_some(Program(program as u32))
    }

    fn uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name).ok()?;
        let location = call!(GetUniformLocation(program.0, name.as_ptr()));
        (location != -1).then_some(UniformLocation(location))
    }

    fn uniform_matrix(&mut self, location: UniformLocation, matrix: &Mat4) {
        let columns = matrix.to_cols_array();
        call!(UniformMatrix4fv(location.0, 1, FALSE, columns.as_ptr()));
    }

    fn begin_frame(&mut self, width: u32, height: u32) {
        call!(Viewport(0, 0, width as i32, height as i32));
        // The overlay painter leaves these enabled.
        call!(Disable(SCISSOR_TEST));
        call!(Disable(BLEND));
        call!(Enable(DEPTH_TEST));
        call!(DepthMask(TRUE));
        call!(ClearColor(0.0, 0.0, 0.0, 1.0));
        call!(Clear(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT));
    }

    fn create_render_target(&mut self, width: u32, height: u32) -> Result<RenderTarget, GpuError> {
        let mut framebuffer = 0;
        let mut renderbuffers = [0; 2];
        call!(GenFramebuffers(1, &mut framebuffer));
        call!(GenRenderbuffers(2, renderbuffers.as_mut_ptr()));
        let [color, depth] = renderbuffers;
        let target = RenderTarget {
            framebuffer,
            color,
            depth,
        };
        if framebuffer == 0 || color == 0 || depth == 0 {
            self.delete_render_target(target);
            return Err(GpuError::Allocation("offscreen framebuffer"));
        }

        call!(BindFramebuffer(FRAMEBUFFER, framebuffer));
        for (renderbuffer, format, attachment) in [
            (color, RGBA8, COLOR_ATTACHMENT0),
            (depth, DEPTH_COMPONENT24, DEPTH_ATTACHMENT),
        ] {
            call!(BindRenderbuffer(RENDERBUFFER, renderbuffer));
            call!(RenderbufferStorage(
                RENDERBUFFER,
                format,
                width as i32,
                height as i32
            ));
            call!(FramebufferRenderbuffer(
                FRAMEBUFFER,
                attachment,
                RENDERBUFFER,
                renderbuffer
            ));
        }
        call!(BindRenderbuffer(RENDERBUFFER, 0));
        let status = call!(CheckFramebufferStatus(FRAMEBUFFER));
        call!(BindFramebuffer(FRAMEBUFFER, 0));
        if status != FRAMEBUFFER_COMPLETE {
            self.delete_render_target(target);
            return Err(GpuError::IncompleteFramebuffer(status));
        }
        Ok(target)
    }

    fn bind_render_target(&mut self, target: Option<&RenderTarget>) {
        call!(BindFramebuffer(
            FRAMEBUFFER,
            target.map_or(0, |target| target.framebuffer)
        ));
    }

    fn delete_render_target(&mut self, target: RenderTarget) {
        let renderbuffers = [target.color, target.depth];
        call!(DeleteRenderbuffers(2, renderbuffers.as_ptr()));
        call!(DeleteFramebuffers(1, &target.framebuffer));
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> Vec<u8> {
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        call!(PixelStorei(PACK_ALIGNMENT, 1));
        call!(ReadPixels(
            0,
            0,
            width as i32,
            height as i32,
            RGB,
            UNSIGNED_BYTE,
            pixels.as_mut_ptr() as *mut c_void,
        ));
        pixels
    }
}
