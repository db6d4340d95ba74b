//! # Input Manager
//!
//! Collects winit keyboard and mouse events between frames and turns them into a
//! [`ProcessedInputState`] once per frame.
//!
//! Only the keys in [`KEY_CODES`] are tracked. Mouse motion is only recorded while the
//! cursor is locked, so moving the pointer over an unlocked window never turns the camera.

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 13] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
    KeyCode::ShiftLeft,
    KeyCode::ArrowUp,
    KeyCode::ArrowDown,
    KeyCode::ArrowLeft,
    KeyCode::ArrowRight,
    KeyCode::Tab,
    KeyCode::KeyC,
    KeyCode::Escape,
];

/// Manages the state of all input devices and processes input events.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key released and the mouse unlocked.
    pub fn new() -> Self {
        let mut keyboard_inputs_old = HashMap::new();
        let mut keyboard_inputs_new = HashMap::new();
        for key_code in KEY_CODES {
            keyboard_inputs_old.insert(key_code, false);
            keyboard_inputs_new.insert(key_code, false);
        }

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_inputs: MouseInput::default(),
        }
    }

    /// Copies the current key state into the old state ready for the next frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => {
                self.set_key(*key, *state == ElementState::Pressed);
            }
            WindowEvent::Focused(false) => {
                for key_state in self.keyboard_inputs_new.values_mut() {
                    *key_state = false;
                }
            }
            _ => {}
        }
    }

    /// Records the raw state of a tracked key. Untracked keys are ignored.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Adds relative mouse movement, if the mouse is locked.
    ///
    /// # Arguments
    /// * `delta` - The (x, y) delta of mouse movement since the last event
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.mouse_inputs.locked {
            return;
        }
        let (x, y) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Records whether the window currently holds the cursor.
    pub fn set_mouse_locked(&mut self, locked: bool) {
        self.mouse_inputs.locked = locked;
        if !locked {
            self.mouse_inputs.mouse_delta = None;
        }
    }

    /// Whether the window currently holds the cursor.
    pub fn is_mouse_locked(&self) -> bool {
        self.mouse_inputs.locked
    }

    /// Creates a processed input state from the current raw boolean states.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
            mouse_locked: self.mouse_inputs.locked,
        }
    }

    /// Returns this frame's processed input and resets per-frame state.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Rolls key state over to the next frame and drops accumulated mouse movement.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();
        self.mouse_inputs.mouse_delta = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_key_is_pressed_then_held_then_released() {
        let mut input = InputManager::new();

        input.set_key(KeyCode::KeyW, true);
        let frame = input.get_and_reset_processed_input();
        assert!(frame.get_key_state(KeyCode::KeyW).is_just_pressed());

        let frame = input.get_and_reset_processed_input();
        assert_eq!(frame.get_key_state(KeyCode::KeyW), RawInputState::Held);

        input.set_key(KeyCode::KeyW, false);
        let frame = input.get_and_reset_processed_input();
        assert_eq!(frame.get_key_state(KeyCode::KeyW), RawInputState::Released);
    }

    #[test]
    fn mouse_motion_is_ignored_until_locked() {
        let mut input = InputManager::new();
        input.intake_mouse_motion((5.0, 5.0));
        assert_eq!(input.create_processed_input_state().mouse_delta, None);

        input.set_mouse_locked(true);
        input.intake_mouse_motion((5.0, -2.0));
        input.intake_mouse_motion((1.0, 1.0));
        let frame = input.get_and_reset_processed_input();
        assert_eq!(frame.mouse_delta, Some((6.0, -1.0)));
        assert!(frame.mouse_locked);

        assert_eq!(input.create_processed_input_state().mouse_delta, None);
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut input = InputManager::new();
        input.set_key(KeyCode::KeyQ, true);
        assert!(!input.keyboard_inputs_new.contains_key(&KeyCode::KeyQ));
    }
}
