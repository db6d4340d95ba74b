//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Camera representation and transformations in two modes
//! - Projection matrix handling
//! - Camera controller for input processing
//!
//! ## Key Components
//! - `Camera`: Position, look-at target and a [`CameraMode`]
//! - `Projection`: Manages perspective projection settings
//! - `CameraController`: Turns player actions into camera movement
//!
//! ## Modes
//!
//! A `Fixed` camera looks at an explicit target that callers set directly; the orbit demo
//! drives one of these. A `FreeLook` camera owns a horizontal and a vertical angle and
//! derives its target from them, so translations follow the view direction.

use std::f32::consts::{PI, TAU};

use cgmath::*;
use web_time::Duration;

use crate::engine_state::PlayerAction;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Largest vertical angle a free-look camera may reach, just short of straight up or down.
pub const MAX_VERTICAL_ANGLE: f32 = PI * 0.4999;

/// Distance of the orbiting camera from its focus.
pub const ORBIT_RADIUS: f32 = 60.0;
/// Height of the orbiting camera above its focus.
pub const ORBIT_HEIGHT: f32 = 25.0;
/// Orbit angle is `elapsed seconds / ORBIT_PERIOD_DIVISOR`.
pub const ORBIT_PERIOD_DIVISOR: f32 = 3.0;

/// How the camera's target is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// The target is set explicitly.
    Fixed,
    /// The target is one unit along the direction given by the angles.
    FreeLook {
        /// Rotation about the world Y axis in radians, wrapped to one turn.
        horizontal_angle: f32,
        /// Rotation about the local X axis in radians, clamped to
        /// `[-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE]`. Positive looks down.
        vertical_angle: f32,
    },
}

/// A viewpoint for rendering the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    target: Point3<f32>,
    mode: CameraMode,
}

impl Camera {
    /// Creates a camera at `position` looking at `target`.
    pub fn fixed(position: Point3<f32>, target: Point3<f32>) -> Self {
        Self {
            position,
            target,
            mode: CameraMode::Fixed,
        }
    }

    /// Creates a free-look camera at `position` looking along +Z.
    #[cfg(test)]
    pub(crate) fn free_look(position: Point3<f32>) -> Self {
        let mut camera = Self {
            position,
            target: position,
            mode: CameraMode::FreeLook {
                horizontal_angle: 0.0,
                vertical_angle: 0.0,
            },
        };
        camera.move_target();
        camera
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    #[cfg(test)]
    pub(crate) fn target(&self) -> Point3<f32> {
        self.target
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switches to free-look, keeping the current view direction.
    pub fn enter_free_look(&mut self) {
        if let CameraMode::FreeLook { .. } = self.mode {
            return;
        }

        let direction = self.target - self.position;
        let (horizontal_angle, vertical_angle) = if direction.magnitude2() > f32::EPSILON {
            let direction = direction.normalize();
            (
                direction.x.atan2(direction.z),
                (-direction.y).asin().clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE),
            )
        } else {
            (0.0, 0.0)
        };
        self.mode = CameraMode::FreeLook {
            horizontal_angle,
            vertical_angle,
        };
        self.move_target();
    }

    /// Switches to fixed mode, keeping the current target.
    pub fn enter_fixed(&mut self) {
        self.mode = CameraMode::Fixed;
    }

    /// Places a fixed camera on its orbit around `focus` after `elapsed_seconds`.
    pub fn orbit(&mut self, focus: Point3<f32>, elapsed_seconds: f32) {
        self.mode = CameraMode::Fixed;
        let angle = elapsed_seconds / ORBIT_PERIOD_DIVISOR;
        self.position = Point3::new(
            focus.x + ORBIT_RADIUS * angle.cos(),
            focus.y + ORBIT_HEIGHT,
            focus.z + ORBIT_RADIUS * angle.sin(),
        );
        self.target = focus;
    }

    /// Rotation applied to local movement and the forward vector. Identity when fixed.
    pub fn rotation(&self) -> Matrix3<f32> {
        match self.mode {
            CameraMode::Fixed => Matrix3::identity(),
            CameraMode::FreeLook {
                horizontal_angle,
                vertical_angle,
            } => Matrix3::from_angle_y(Rad(horizontal_angle)) * Matrix3::from_angle_x(Rad(vertical_angle)),
        }
    }

    /// Moves along the camera's local X axis; positive is to the right of the view.
    pub fn translate_x(&mut self, amount: f32) {
        self.translate(Vector3::new(-amount, 0.0, 0.0));
    }

    /// Moves along the camera's local Y axis; positive is up.
    pub fn translate_y(&mut self, amount: f32) {
        self.translate(Vector3::new(0.0, amount, 0.0));
    }

    /// Moves along the camera's local Z axis; positive is forwards.
    pub fn translate_z(&mut self, amount: f32) {
        self.translate(Vector3::new(0.0, 0.0, amount));
    }

    fn translate(&mut self, local: Vector3<f32>) {
        let offset = self.rotation() * local;
        self.position += offset;
        match self.mode {
            CameraMode::Fixed => self.target += offset,
            CameraMode::FreeLook { .. } => self.move_target(),
        }
    }

    /// Turns a free-look camera about the world Y axis.
    pub fn rotate_y(&mut self, amount: f32) {
        if let CameraMode::FreeLook {
            horizontal_angle, ..
        } = &mut self.mode
        {
            *horizontal_angle = (*horizontal_angle + amount) % TAU;
            self.move_target();
        }
    }

    /// Tilts a free-look camera about its local X axis.
    pub fn rotate_x(&mut self, amount: f32) {
        if let CameraMode::FreeLook { vertical_angle, .. } = &mut self.mode {
            *vertical_angle = (*vertical_angle + amount).clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE);
            self.move_target();
        }
    }

    fn move_target(&mut self) {
        if let CameraMode::FreeLook { .. } = self.mode {
            self.target = self.position + self.rotation() * Vector3::unit_z();
        }
    }

    /// Calculates the view matrix for this camera.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Calculates the projection matrix.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Handles camera movement and rotation based on player actions.
///
/// Movement is accumulated from the latest [`PlayerAction`] and applied, scaled by the
/// frame time, on the next [`CameraController::apply`].
#[derive(Debug)]
pub struct CameraController {
    amount_right: f32,
    amount_forward: f32,
    amount_up: f32,

    /// Arrow key turning, applied at `KEY_ROTATION_SPEED`
    rotate_horizontal: f32,
    rotate_vertical: f32,

    /// Mouse look in radians, applied as is
    look_horizontal: f32,
    look_vertical: f32,

    /// Blocks per second
    speed: f32,
    /// Radians per pixel of mouse motion
    sensitivity: f32,
}

/// Radians per second turned by the arrow keys.
const KEY_ROTATION_SPEED: f32 = 1.5;

impl CameraController {
    /// Creates a new camera controller.
    ///
    /// # Arguments
    /// * `speed` - Movement speed in blocks per second
    /// * `sensitivity` - Mouse look sensitivity in radians per pixel
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_up: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            look_horizontal: 0.0,
            look_vertical: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Records the movement requested by `actions`.
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        let axis = |positive: bool, negative: bool| positive as i32 as f32 - negative as i32 as f32;

        self.amount_forward = axis(actions.move_forward, actions.move_backward);
        self.amount_right = axis(actions.move_right, actions.move_left);
        self.amount_up = axis(actions.move_up, actions.move_down);

        self.rotate_horizontal = axis(actions.turn_left, actions.turn_right);
        self.rotate_vertical = axis(actions.turn_down, actions.turn_up);
        if let Some((delta_x, delta_y)) = actions.rotate_view {
            self.look_horizontal = -delta_x as f32 * self.sensitivity;
            self.look_vertical = delta_y as f32 * self.sensitivity;
        }
    }

    /// Checks if there are any pending updates that would affect the camera.
    pub fn has_updates(&self) -> bool {
        self.amount_forward != 0.0
            || self.amount_right != 0.0
            || self.amount_up != 0.0
            || self.rotate_horizontal != 0.0
            || self.rotate_vertical != 0.0
            || self.look_horizontal != 0.0
            || self.look_vertical != 0.0
    }

    /// Applies and clears the pending movement.
    pub fn apply(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();
        let distance = self.speed * dt;

        camera.translate_z(self.amount_forward * distance);
        camera.translate_x(self.amount_right * distance);
        camera.translate_y(self.amount_up * distance);
        camera.rotate_y(self.rotate_horizontal * KEY_ROTATION_SPEED * dt + self.look_horizontal);
        camera.rotate_x(self.rotate_vertical * KEY_ROTATION_SPEED * dt + self.look_vertical);

        *self = Self::new(self.speed, self.sensitivity);
    }
}
