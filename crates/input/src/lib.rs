#![warn(missing_docs)]
//! Keyboard input tracking and named keybind registration.

mod keybind;

pub use keybind::{parse_key_code, KeybindHandle, KeybindRegistry};
pub use winit::keyboard::KeyCode;

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::PhysicalKey;

/// Keyboard state tracking for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently pressed.
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed this frame (edge-triggered).
    keys_just_pressed: HashSet<KeyCode>,
    /// Keys released this frame (edge-triggered).
    keys_just_released: HashSet<KeyCode>,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event to update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(keycode),
                    state,
                    ..
                },
            ..
        } = event
        {
            match state {
                ElementState::Pressed => self.press_key(*keycode),
                ElementState::Released => self.release_key(*keycode),
            }
        }
    }

    /// Record a key press. Held keys do not re-trigger.
    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_pressed.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Record a key release.
    pub fn release_key(&mut self, key: KeyCode) {
        if self.keys_pressed.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    /// Reset per-frame state (call at the start of each frame).
    pub fn begin_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }

    /// Check if a key is currently pressed.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was just pressed this frame.
    pub fn key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Check if a key was just released this frame.
    pub fn key_just_released(&self, key: KeyCode) -> bool {
        self.keys_just_released.contains(&key)
    }
}
