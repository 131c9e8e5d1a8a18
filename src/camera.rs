use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Quat, Vec2, Vec3};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CameraError {
    #[error("camera up {up} is collinear with the view direction from {eye} to {center}")]
    DegenerateBasis { eye: Vec3, center: Vec3, up: Vec3 },

    #[error("expected nine comma-separated numbers (eye, center, up), got {0:?}")]
    InvalidLookat(String),
}

/// A look-at camera. `up` is kept orthonormal to the view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    eye: Vec3,
    center: Vec3,
    up: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Result<Camera, CameraError> {
        let front = center - eye;
        let left = up.cross(front);
        if left == Vec3::ZERO {
            return Err(CameraError::DegenerateBasis { eye, center, up });
        }
        let up = front.cross(left).normalize();
        Ok(Camera { eye, center, up })
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        (self.center - self.eye).normalize()
    }

    pub fn left(&self) -> Vec3 {
        self.up.cross(self.front()).normalize()
    }

    /// The `--lookat` command line argument that recreates this camera.
    pub fn lookat_args(&self) -> String {
        format!("--lookat {self}")
    }

    /// Moves eye and center together along the camera's own axes.
    pub fn move_local(&mut self, truck_left: f32, pedestal_up: f32, dolly_in: f32) {
        let translation =
            truck_left * self.left() + pedestal_up * self.up + dolly_in * self.front();
        self.eye += translation;
        self.center += translation;
    }

    /// Rotates the view direction about the world up axis.
    pub fn rotate_left(&mut self, radians: f32) {
        self.rotate_about_eye(Quat::from_axis_angle(Vec3::Y, radians));
    }

    /// Rotates the view direction about the camera's left axis.
    pub fn rotate_up(&mut self, radians: f32) {
        self.rotate_about_eye(Quat::from_axis_angle(self.left(), -radians));
    }

    /// Rotates `up` about the view direction.
    pub fn roll_right(&mut self, radians: f32) {
        self.up = Quat::from_axis_angle(self.front(), radians) * self.up;
    }

    fn rotate_about_eye(&mut self, rotation: Quat) {
        let front = rotation * (self.center - self.eye);
        let up = rotation * self.up;
        // Looking straight along the new up would lose the basis.
        if up.cross(front) != Vec3::ZERO {
            self.center = self.eye + front;
            self.up = up.normalize();
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            eye: Vec3::ZERO,
            center: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [ex, ey, ez] = self.eye.to_array();
        let [cx, cy, cz] = self.center.to_array();
        let [ux, uy, uz] = self.up.to_array();
        write!(f, "{ex},{ey},{ez},{cx},{cy},{cz},{ux},{uy},{uz}")
    }
}

impl FromStr for Camera {
    type Err = CameraError;

    /// Parses `ex,ey,ez,cx,cy,cz,ux,uy,uz`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CameraError::InvalidLookat(s.to_string());
        let numbers = s
            .split(',')
            .map(|number| number.trim().parse::<f32>().ok().filter(|n| n.is_finite()))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        let numbers: [f32; 9] = numbers.try_into().map_err(|_| invalid())?;
        Camera::new(
            Vec3::from_slice(&numbers[0..3]),
            Vec3::from_slice(&numbers[3..6]),
            Vec3::from_slice(&numbers[6..9]),
        )
    }
}

/// Keys and mouse state sampled for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub roll_left: bool,
    pub roll_right: bool,
    /// The cursor position while the left mouse button is held.
    pub drag: Option<Vec2>,
}

/// Radians per second.
const ROLL_SPEED: f32 = 1.0;
/// Radians per pixel of cursor movement.
const MOUSE_SENSITIVITY: f32 = 0.01;

/// WASD-style movement, arrow keys for height, Q/E to roll and left mouse
/// drag to look around.
#[derive(Debug, Clone)]
pub struct FirstPersonCameraController {
    camera: Camera,
    /// World units per second.
    speed: f32,
    last_drag: Option<Vec2>,
}

impl FirstPersonCameraController {
    pub fn new(camera: Camera, speed: f32) -> FirstPersonCameraController {
        FirstPersonCameraController {
            camera,
            speed,
            last_drag: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Applies one frame of input. Returns whether the camera moved.
    pub fn update(&mut self, elapsed: f32, input: &CameraInput) -> bool {
        let axis = |positive: bool, negative: bool| -> f32 {
            match (positive, negative) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            }
        };
        let step = self.speed * elapsed;
        let truck_left = axis(input.left, input.right) * step;
        let pedestal_up = axis(input.up, input.down) * step;
        let dolly_in = axis(input.forward, input.backward) * step;
        let roll = axis(input.roll_right, input.roll_left) * ROLL_SPEED * elapsed;

        let mut moved = false;
        if truck_left != 0.0 || pedestal_up != 0.0 || dolly_in != 0.0 {
            self.camera.move_local(truck_left, pedestal_up, dolly_in);
            moved = true;
        }
        if roll != 0.0 {
            self.camera.roll_right(roll);
            moved = true;
        }

        match (self.last_drag, input.drag) {
            (Some(last), Some(cursor)) if cursor != last => {
                let delta = cursor - last;
                self.camera.rotate_left(-MOUSE_SENSITIVITY * delta.x);
                self.camera.rotate_up(MOUSE_SENSITIVITY * delta.y);
                moved = true;
            }
            _ => {}
        }
        self.last_drag = input.drag;

        moved
    }
}
