//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - Player input processing for camera control
//! - The orbit demo, which circles the world until the player takes over
//!
//! ## Core Components
//! - `Camera`: Position, target and [`CameraMode`](camera::CameraMode)
//! - `CameraController`: Handles player input and updates camera state
//! - `Projection`: Manages the camera's projection matrix

use camera::{Camera, CameraController, Projection};
use cgmath::{Matrix4, Point3};
use web_time::Duration;

use super::{settings::GameSettings, PlayerAction};

pub mod camera;

/// Manages the camera, its controller and its projection.
///
/// # Fields
/// - `camera`: The current camera state
/// - `camera_controller`: Handles player input and camera movement
/// - `projection`: Perspective projection for the current surface
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// Handles player input and camera movement
    pub camera_controller: CameraController,
    /// Perspective projection for the current surface size
    pub projection: Projection,
    /// Whether the orbit demo drives the camera
    orbiting: bool,
    /// Time spent orbiting, which sets the orbit angle
    orbit_time: Duration,
    /// Point the orbit circles
    orbit_focus: Point3<f32>,
}

impl CameraState {
    /// Creates a camera state that starts out orbiting `orbit_focus`.
    ///
    /// # Arguments
    /// * `settings` - Speed, sensitivity and projection settings
    /// * `width` - Surface width in pixels
    /// * `height` - Surface height in pixels
    /// * `orbit_focus` - Point the orbit demo circles
    pub fn new(settings: &GameSettings, width: u32, height: u32, orbit_focus: Point3<f32>) -> Self {
        let projection = Projection::new(
            width,
            height,
            cgmath::Deg(settings.field_of_view_degrees),
            settings.near_plane,
            settings.far_plane,
        );

        let mut camera = Camera::fixed(orbit_focus, orbit_focus);
        camera.orbit(orbit_focus, 0.0);

        Self {
            camera,
            camera_controller: CameraController::new(settings.camera_speed, settings.mouse_sensitivity),
            projection,
            orbiting: true,
            orbit_time: Duration::ZERO,
            orbit_focus,
        }
    }

    /// `true` while the orbit demo drives the camera.
    pub fn is_orbiting(&self) -> bool {
        self.orbiting
    }

    /// Switches between the orbit demo and free-look, keeping the current view.
    pub fn toggle_mode(&mut self) {
        self.orbiting = !self.orbiting;
        if self.orbiting {
            self.camera.enter_fixed();
            self.camera.orbit(self.orbit_focus, self.orbit_time.as_secs_f32());
        } else {
            self.camera.enter_free_look();
        }
    }

    /// Processes player input actions and updates the camera controller state.
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.camera_controller.intake_actions(actions);
    }

    /// Advances the camera by `dt`.
    ///
    /// # Returns
    /// `true` if the camera moved.
    pub fn update(&mut self, dt: Duration) -> bool {
        if self.orbiting {
            self.orbit_time += dt;
            self.camera.orbit(self.orbit_focus, self.orbit_time.as_secs_f32());
            return !dt.is_zero();
        }

        if self.camera_controller.has_updates() {
            self.camera_controller.apply(&mut self.camera, dt);
            return true;
        }
        false
    }

    /// The camera position.
    pub fn position(&self) -> Point3<f32> {
        self.camera.position()
    }

    /// The current view matrix.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera.calc_matrix()
    }

    /// The current projection matrix.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.calc_matrix()
    }

    /// Adapts the projection to a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }
}
