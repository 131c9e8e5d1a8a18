use std::ffi::c_void;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::video::{GLContext, GLProfile, Window, WindowBuildError};
use sdl2::{EventPump, Sdl, VideoSubsystem};

use crate::camera::{CameraError, CameraInput, FirstPersonCameraController};
use crate::config::{ConfigError, ViewerConfig};
use crate::gui::{DebugOverlay, FrameTimer, GuiError, OverlayAction};
use crate::renderer::gl::GlGpu;
use crate::renderer::gltf::{self, Document, ShaderSources};
use crate::renderer::{self, Renderer};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("sdl error: {0}")]
    Sdl(String),

    #[error("failed to create the window")]
    Window(#[from] WindowBuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("failed to load the glTF asset")]
    Load(#[from] gltf::Error),

    #[error("failed to read shader source")]
    Shader(#[source] std::io::Error),

    #[error(transparent)]
    Renderer(#[from] renderer::Error),

    #[error(transparent)]
    Gui(#[from] GuiError),

    #[error("failed to write {path}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Ends [`Viewer::run`] after the frame in flight. Can be sent to other
/// threads.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The window, its GL context, and everything drawn into it.
pub struct Viewer {
    // Fields drop in declaration order: GL objects go before the context,
    // the context before the window, the window before SDL.
    renderer: Renderer<GlGpu>,
    overlay: Option<DebugOverlay>,
    _gl_context: GLContext,
    window: Window,
    event_pump: EventPump,
    video: VideoSubsystem,
    _sdl: Sdl,

    config: ViewerConfig,
    controller: FirstPersonCameraController,
    timer: FrameTimer,
    stop: StopHandle,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Viewer, Error> {
        let document = Document::load(&config.asset)?;
        let shaders = ShaderSources::load(
            config.vertex_shader.as_deref(),
            config.fragment_shader.as_deref(),
        )
        .map_err(Error::Shader)?;

        let sdl = sdl2::init().map_err(Error::Sdl)?;
        let video = sdl.video().map_err(Error::Sdl)?;
        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);
        gl_attr.set_double_buffer(true);

        let mut window_builder = video.window(&config.title, config.width, config.height);
        window_builder.opengl().resizable();
        if config.output.is_some() {
            window_builder.hidden();
        }
        let window = window_builder.build()?;
        let gl_context = window.gl_create_context().map_err(Error::Sdl)?;
        window.gl_make_current(&gl_context).map_err(Error::Sdl)?;
        let swap_interval = if config.vsync { 1 } else { 0 };
        if let Err(err) = video.gl_set_swap_interval(swap_interval) {
            log::warn!("Could not set swap interval {swap_interval}: {err}");
        }
        let event_pump = sdl.event_pump().map_err(Error::Sdl)?;

        let gpu = GlGpu::load(|name| video.gl_get_proc_address(name) as *const c_void);
        let info = gpu.info();
        log::info!("OpenGL vendor: {}", info.vendor);
        log::info!("OpenGL renderer: {}", info.renderer);
        log::info!("OpenGL version: {}", info.version);
        log::info!("GLSL version: {}", info.shading_language);

        let renderer = Renderer::new(gpu, document, &shaders, config.aspect_ratio())?;
        let overlay = if config.output.is_none() {
            let glow = unsafe {
                glow::Context::from_loader_function(|name| {
                    video.gl_get_proc_address(name) as *const c_void
                })
            };
            Some(DebugOverlay::new(Arc::new(glow))?)
        } else {
            None
        };

        let camera = match config.camera {
            Some(camera) => camera,
            None => renderer.default_camera(),
        };
        log::info!("Camera: {}", camera.lookat_args());
        let controller = FirstPersonCameraController::new(camera, renderer.camera_speed());

        Ok(Viewer {
            renderer,
            overlay,
            _gl_context: gl_context,
            window,
            event_pump,
            video,
            _sdl: sdl,
            config,
            controller,
            timer: FrameTimer::default(),
            stop: StopHandle::default(),
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Renders to the configured output file, or runs the interactive loop
    /// until stopped.
    pub fn run(&mut self) -> Result<(), Error> {
        if let Some(output) = self.config.output.clone() {
            return self.render_to_file(&output);
        }

        let mut last_frame = Instant::now();
        while !self.stop.is_stopped() {
            let (width, height) = self.window.drawable_size();
            self.renderer.render(self.controller.camera(), width, height);

            let actions = match &mut self.overlay {
                Some(overlay) => overlay.frame(
                    self.window.size(),
                    (width, height),
                    &self.timer,
                    self.controller.camera(),
                ),
                None => Vec::new(),
            };
            for action in actions {
                self.handle_action(action);
            }

            self.window.gl_swap_window();

            for event in self.event_pump.poll_iter() {
                if let Some(overlay) = &mut self.overlay {
                    overlay.handle_event(&event);
                }
                match event {
                    Event::Quit { .. }
                    | Event::KeyUp {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => self.stop.stop(),
                    Event::Window {
                        win_event: WindowEvent::SizeChanged(..),
                        ..
                    } => {
                        let (width, height) = self.window.drawable_size();
                        self.renderer.resize(width, height);
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            let elapsed = now - last_frame;
            last_frame = now;
            self.timer.push(elapsed);

            let overlay_wants_input = self
                .overlay
                .as_ref()
                .map_or(false, |overlay| overlay.wants_input());
            // An idle frame also ends any drag the overlay took over.
            let input = if overlay_wants_input {
                CameraInput::default()
            } else {
                camera_input(&self.event_pump)
            };
            self.controller.update(elapsed.as_secs_f32(), &input);
        }
        log::info!("Stopped");
        Ok(())
    }

    fn handle_action(&mut self, action: OverlayAction) {
        match action {
            OverlayAction::CopyCameraArgs(args) => {
                log::info!("{args}");
                self.set_clipboard(&args);
            }
            OverlayAction::CopyText(text) => self.set_clipboard(&text),
            OverlayAction::Quit => self.stop.stop(),
        }
    }

    fn set_clipboard(&self, text: &str) {
        if let Err(err) = self.video.clipboard().set_clipboard_text(text) {
            log::warn!("Could not copy to clipboard: {err}");
        }
    }

    fn render_to_file(&mut self, path: &Path) -> Result<(), Error> {
        let (width, height) = (self.config.width, self.config.height);
        let camera = self.controller.camera();
        let pixels = self.renderer.render_to_pixels(camera, width, height)?;
        let image_error = |source: image::ImageError| Error::Image {
            path: path.display().to_string(),
            source,
        };
        let mut image = image::RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
            image_error(image::ImageError::Parameter(
                image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ),
            ))
        })?;
        // OpenGL rows start at the bottom.
        image::imageops::flip_vertical_in_place(&mut image);
        image.save(path).map_err(image_error)?;
        log::info!("Wrote {width}x{height} frame to {}", path.display());
        Ok(())
    }
}

fn camera_input(event_pump: &EventPump) -> CameraInput {
    let keyboard = event_pump.keyboard_state();
    let pressed = |scancode: Scancode| keyboard.is_scancode_pressed(scancode);
    let mouse = event_pump.mouse_state();
    CameraInput {
        forward: pressed(Scancode::W),
        backward: pressed(Scancode::S),
        left: pressed(Scancode::A),
        right: pressed(Scancode::D),
        up: pressed(Scancode::Up),
        down: pressed(Scancode::Down),
        roll_left: pressed(Scancode::Q),
        roll_right: pressed(Scancode::E),
        drag: mouse
            .left()
            .then(|| Vec2::new(mouse.x() as f32, mouse.y() as f32)),
    }
}
