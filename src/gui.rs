//! The debug overlay: frame timing, a scratch text field, and the camera
//! state with a button to copy it as command line arguments.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sdl2::event::Event as SdlEvent;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::mouse::MouseButton;

use crate::camera::Camera;

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("failed to create the overlay painter: {0}")]
    Painter(String),
}

/// Rolling frame time statistics.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    frame_times_ms: VecDeque<f32>,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> FrameTimer {
        FrameTimer {
            frame_times_ms: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, frame_time: Duration) {
        if self.frame_times_ms.len() == self.capacity {
            self.frame_times_ms.pop_front();
        }
        self.frame_times_ms.push_back(frame_time.as_secs_f32() * 1000.0);
    }

    pub fn average_ms(&self) -> Option<f32> {
        if self.frame_times_ms.is_empty() {
            return None;
        }
        Some(self.frame_times_ms.iter().sum::<f32>() / self.frame_times_ms.len() as f32)
    }

    pub fn fps(&self) -> Option<f32> {
        self.average_ms()
            .filter(|&ms| ms > 0.0)
            .map(|ms| 1000.0 / ms)
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        FrameTimer::new(120)
    }
}

/// Something the user asked for through the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayAction {
    /// Copy the `--lookat` arguments of the current camera to the clipboard.
    CopyCameraArgs(String),
    /// Put text copied or cut in a text field on the clipboard.
    CopyText(String),
    Quit,
}

/// The overlay's own widgets, independent of how it is painted.
#[derive(Debug, Clone)]
pub struct OverlayState {
    pub window_open: bool,
    pub text: String,
}

impl Default for OverlayState {
    fn default() -> Self {
        OverlayState {
            window_open: true,
            text: String::new(),
        }
    }
}

impl OverlayState {
    pub fn ui(
        &mut self,
        ctx: &egui::Context,
        timer: &FrameTimer,
        camera: &Camera,
    ) -> Vec<OverlayAction> {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        actions.push(OverlayAction::Quit);
                    }
                });
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.window_open, "GUI");
                });
            });
        });

        let mut window_open = self.window_open;
        egui::Window::new("GUI")
            .open(&mut window_open)
            .default_pos([10.0, 40.0])
            .resizable(true)
            .show(ctx, |ui| {
                match (timer.average_ms(), timer.fps()) {
                    (Some(ms), Some(fps)) => {
                        ui.label(format!("Application average {ms:.3} ms/frame ({fps:.1} FPS)"));
                    }
                    _ => {
                        ui.label("Application average: no frames yet");
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Text:");
                    ui.text_edit_singleline(&mut self.text);
                });
                ui.label(format!("You wrote: {}", self.text));

                egui::CollapsingHeader::new("Camera")
                    .default_open(true)
                    .show(ui, |ui| {
                        for (name, value) in [
                            ("eye", camera.eye()),
                            ("center", camera.center()),
                            ("up", camera.up()),
                            ("front", camera.front()),
                            ("left", camera.left()),
                        ] {
                            let [x, y, z] = value.to_array();
                            ui.label(format!("{name}: {x:.3} {y:.3} {z:.3}"));
                        }
                        if ui.button("Copy camera args to clipboard").clicked() {
                            actions.push(OverlayAction::CopyCameraArgs(camera.lookat_args()));
                        }
                    });
            });
        self.window_open = window_open;

        actions
    }
}

/// Paints [`OverlayState`] over the scene with `egui_glow`, fed by SDL events.
pub struct DebugOverlay {
    ctx: egui::Context,
    painter: egui_glow::Painter,
    state: OverlayState,
    events: Vec<egui::Event>,
    modifiers: egui::Modifiers,
    started: Instant,
}

impl DebugOverlay {
    pub fn new(gl: Arc<glow::Context>) -> Result<DebugOverlay, GuiError> {
        let painter = egui_glow::Painter::new(gl, "", None, false)
            .map_err(|err| GuiError::Painter(err.to_string()))?;
        Ok(DebugOverlay {
            ctx: egui::Context::default(),
            painter,
            state: OverlayState::default(),
            events: Vec::new(),
            modifiers: egui::Modifiers::default(),
            started: Instant::now(),
        })
    }

    /// Whether the overlay is using the mouse or keyboard, in which case the
    /// camera should not react to them.
    pub fn wants_input(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.wants_keyboard_input()
    }

    pub fn handle_event(&mut self, event: &SdlEvent) {
        if let Some(event) = translate_event(event, &mut self.modifiers) {
            self.events.push(event);
        }
    }

    /// Lays out and paints one frame of the overlay. `window_size` is in
    /// points (the coordinates of mouse events), `drawable_size` in pixels.
    pub fn frame(
        &mut self,
        window_size: (u32, u32),
        drawable_size: (u32, u32),
        timer: &FrameTimer,
        camera: &Camera,
    ) -> Vec<OverlayAction> {
        let pixels_per_point = if window_size.0 > 0 {
            drawable_size.0 as f32 / window_size.0 as f32
        } else {
            1.0
        };
        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(window_size.0 as f32, window_size.1 as f32),
            )),
            time: Some(self.started.elapsed().as_secs_f64()),
            modifiers: self.modifiers,
            events: std::mem::take(&mut self.events),
            ..Default::default()
        };
        self.ctx.set_pixels_per_point(pixels_per_point);

        let state = &mut self.state;
        let mut actions = Vec::new();
        let full_output = self.ctx.run(raw_input, |ctx| {
            actions = state.ui(ctx, timer, camera);
        });
        actions.extend(clipboard_actions(&full_output.platform_output));
        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.painter.paint_and_update_textures(
            [drawable_size.0, drawable_size.1],
            full_output.pixels_per_point,
            &primitives,
            &full_output.textures_delta,
        );
        actions
    }
}

impl Drop for DebugOverlay {
    fn drop(&mut self) {
        self.painter.destroy();
    }
}

fn clipboard_actions(output: &egui::PlatformOutput) -> Vec<OverlayAction> {
    output
        .commands
        .iter()
        .filter_map(|command| match command {
            egui::OutputCommand::CopyText(text) => Some(OverlayAction::CopyText(text.clone())),
            _ => None,
        })
        .collect()
}

fn translate_event(event: &SdlEvent, modifiers: &mut egui::Modifiers) -> Option<egui::Event> {
    match event {
        SdlEvent::MouseMotion { x, y, .. } => Some(egui::Event::PointerMoved(egui::pos2(
            *x as f32, *y as f32,
        ))),
        SdlEvent::MouseButtonDown {
            mouse_btn, x, y, ..
        }
        | SdlEvent::MouseButtonUp {
            mouse_btn, x, y, ..
        } => Some(egui::Event::PointerButton {
            pos: egui::pos2(*x as f32, *y as f32),
            button: match mouse_btn {
                MouseButton::Left => egui::PointerButton::Primary,
                MouseButton::Right => egui::PointerButton::Secondary,
                MouseButton::Middle => egui::PointerButton::Middle,
                _ => return None,
            },
            pressed: matches!(event, SdlEvent::MouseButtonDown { .. }),
            modifiers: *modifiers,
        }),
        SdlEvent::TextInput { text, .. } => Some(egui::Event::Text(text.clone())),
        SdlEvent::KeyDown {
            keycode, keymod, repeat, ..
        }
        | SdlEvent::KeyUp {
            keycode, keymod, repeat, ..
        } => {
            *modifiers = translate_modifiers(*keymod);
            let key = translate_key((*keycode)?)?;
            let pressed = matches!(event, SdlEvent::KeyDown { .. });
            if pressed && modifiers.command {
                match key {
                    egui::Key::C => return Some(egui::Event::Copy),
                    egui::Key::X => return Some(egui::Event::Cut),
                    _ => {}
                }
            }
            Some(egui::Event::Key {
                key,
                physical_key: None,
                pressed,
                repeat: *repeat,
                modifiers: *modifiers,
            })
        }
        _ => None,
    }
}

fn translate_modifiers(keymod: Mod) -> egui::Modifiers {
    let ctrl = keymod.intersects(Mod::LCTRLMOD | Mod::RCTRLMOD);
    egui::Modifiers {
        alt: keymod.intersects(Mod::LALTMOD | Mod::RALTMOD),
        ctrl,
        shift: keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD),
        mac_cmd: false,
        command: ctrl,
    }
}

fn translate_key(keycode: Keycode) -> Option<egui::Key> {
    Some(match keycode {
        Keycode::Backspace => egui::Key::Backspace,
        Keycode::Delete => egui::Key::Delete,
        Keycode::Return | Keycode::KpEnter => egui::Key::Enter,
        Keycode::Tab => egui::Key::Tab,
        Keycode::Escape => egui::Key::Escape,
        Keycode::Left => egui::Key::ArrowLeft,
        Keycode::Right => egui::Key::ArrowRight,
        Keycode::Up => egui::Key::ArrowUp,
        Keycode::Down => egui::Key::ArrowDown,
        Keycode::Home => egui::Key::Home,
        Keycode::End => egui::Key::End,
        Keycode::A => egui::Key::A,
        Keycode::C => egui::Key::C,
        Keycode::X => egui::Key::X,
        Keycode::Z => egui::Key::Z,
        _ => return None,
    })
}
