//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling and the mouse lock
//! - Application lifecycle events
//!
//! Start-up failures are kept in [`ApplicationState::exit_error`] and the event loop is
//! asked to exit, so `run` can return them.

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{Graphics, GraphicsResult, MaybeGraphics};
use input_manager::InputManager;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::engine_state::{error::EngineError, EngineState};

/// The main application state container that manages the application's lifecycle.
pub struct ApplicationState {
    /// The current graphics state, either waiting to be built or already moved
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// The error that stopped the application, if any
    pub exit_error: Option<EngineError>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The core engine state and logic
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,
}

impl ApplicationState {
    /// Creates the application state, waiting for `resumed` to start graphics initialization.
    pub fn new(graphics: MaybeGraphics) -> Self {
        Self {
            graphics,
            state: None,
            exit_error: None,
        }
    }

    /// Builds the engine from freshly initialized graphics resources.
    fn initialize_application_state(&mut self, gfx: Graphics) -> Result<(), EngineError> {
        let Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            settings,
            shader_source,
            atlas,
        } = gfx;

        let engine_state = EngineState::new(
            surface,
            surface_config,
            device,
            queue,
            settings,
            &shader_source,
            &atlas,
        )?;

        self.state = Some(InitializedApplicationState {
            engine_state,
            window,
            input_manager: InputManager::new(),
            last_wait_time: web_time::Instant::now(),
        });
        self.graphics = MaybeGraphics::Moved;

        info!("Engine ready");
        Ok(())
    }

    /// Records a fatal error and stops the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: EngineError) {
        error!("{}", error);
        self.exit_error = Some(error);
        event_loop.exit();
    }
}

impl InitializedApplicationState {
    /// Grabs and hides the cursor, or releases it.
    ///
    /// Falls back to confining the cursor on platforms without a locked mode. If neither
    /// works the mouse stays unlocked.
    fn set_mouse_locked(&mut self, locked: bool) {
        let grab = if locked {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };

        if let Err(e) = grab {
            warn!("Could not change the cursor grab: {}", e);
            if locked {
                return;
            }
        }

        self.window.set_cursor_visible(!locked);
        self.input_manager.set_mouse_locked(locked);
    }
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let is_exit_request = matches!(
            event,
            WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event: KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                    ..
                }
        );
        if is_exit_request {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(false) => {
                state.set_mouse_locked(false);
                state.input_manager.reset_inputs();
            }
            WindowEvent::RedrawRequested => {
                state.engine_state.render();
            }
            _ => (),
        }
    }

    /// Feeds raw mouse motion to the input manager.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    /// * `_device_id` - ID of the device that generated the event
    /// * `event` - The device event to process
    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    /// Starts graphics initialization the first time the application is resumed.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the result of graphics initialization and brings up the engine.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `graphics` - The initialized graphics resources, or the error that prevented them
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        let result = graphics.and_then(|gfx| self.initialize_application_state(gfx));
        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    /// Handles frame timing and input, then requests the next frame.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let now = web_time::Instant::now();
            let wait_dt = now - state.last_wait_time;

            let processed_input = state.input_manager.get_and_reset_processed_input();
            if processed_input.get_key_state(KeyCode::Tab).is_just_pressed() {
                let locked = !state.input_manager.is_mouse_locked();
                state.set_mouse_locked(locked);
            }

            state.engine_state.set_input_commands(&processed_input);
            state.engine_state.process_input(wait_dt);

            state.last_wait_time = now;
            state.window.request_redraw();
        }
    }
}
