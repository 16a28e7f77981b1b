//! Named keybinds owned by the systems that register them.
//!
//! A system registers a bind when it loads and receives a [`KeybindHandle`]. The
//! handle is not clonable; giving it back through [`KeybindRegistry::unregister`]
//! removes the bind.

use crate::InputState;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use winit::keyboard::KeyCode;

/// Proof of registration for one named keybind.
#[derive(Debug, PartialEq, Eq)]
pub struct KeybindHandle {
    id: u32,
    name: String,
}

impl KeybindHandle {
    /// Display name the bind was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone)]
struct Keybind {
    name: String,
    key: KeyCode,
}

/// Registry of named keybinds.
#[derive(Debug, Default)]
pub struct KeybindRegistry {
    binds: BTreeMap<u32, Keybind>,
    next_id: u32,
}

impl KeybindRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bind named `name` on `default_key`.
    pub fn register(&mut self, name: &str, default_key: KeyCode) -> KeybindHandle {
        if self.binds.values().any(|bind| bind.name == name) {
            warn!("Keybind '{}' registered more than once", name);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.binds.insert(
            id,
            Keybind {
                name: name.to_string(),
                key: default_key,
            },
        );
        debug!(name, ?default_key, "keybind registered");
        KeybindHandle {
            id,
            name: name.to_string(),
        }
    }

    /// Remove the bind behind `handle`.
    pub fn unregister(&mut self, handle: KeybindHandle) {
        if self.binds.remove(&handle.id).is_some() {
            debug!(name = handle.name.as_str(), "keybind unregistered");
        }
    }

    /// Key currently assigned to the bind.
    pub fn key(&self, handle: &KeybindHandle) -> Option<KeyCode> {
        self.binds.get(&handle.id).map(|bind| bind.key)
    }

    /// Assign a new key to the bind.
    pub fn rebind(&mut self, handle: &KeybindHandle, key: KeyCode) {
        if let Some(bind) = self.binds.get_mut(&handle.id) {
            bind.key = key;
        }
    }

    /// Assign a key by name (`KeyZ`, `F5`, ...). Unknown names keep the current key.
    pub fn rebind_by_name(&mut self, handle: &KeybindHandle, key_name: &str) -> bool {
        match parse_key_code(key_name) {
            Some(key) => {
                self.rebind(handle, key);
                true
            }
            None => {
                warn!(
                    "Unknown key '{}' for keybind '{}'; keeping current key",
                    key_name,
                    handle.name()
                );
                false
            }
        }
    }

    /// Returns true when the bound key was pressed this frame.
    pub fn just_pressed(&self, handle: &KeybindHandle, input: &InputState) -> bool {
        self.key(handle)
            .map(|key| input.key_just_pressed(key))
            .unwrap_or(false)
    }

    /// Number of registered binds.
    pub fn len(&self) -> usize {
        self.binds.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    /// Registered bind names and their keys, in registration order.
    pub fn describe(&self) -> Vec<(String, KeyCode)> {
        self.binds
            .values()
            .map(|bind| (bind.name.clone(), bind.key))
            .collect()
    }
}

/// Parse a key name as written in configuration files.
pub fn parse_key_code(name: &str) -> Option<KeyCode> {
    Some(match name.trim() {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,
        "Space" => KeyCode::Space,
        "Tab" => KeyCode::Tab,
        "Enter" => KeyCode::Enter,
        "Backquote" => KeyCode::Backquote,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ControlLeft" => KeyCode::ControlLeft,
        "AltLeft" => KeyCode::AltLeft,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_bind_fires_on_its_key() {
        let mut registry = KeybindRegistry::new();
        let handle = registry.register("Auto Sleep", KeyCode::KeyZ);
        let mut input = InputState::new();

        assert!(!registry.just_pressed(&handle, &input));
        input.press_key(KeyCode::KeyZ);
        assert!(registry.just_pressed(&handle, &input));
    }

    #[test]
    fn rebind_by_name_keeps_key_on_unknown_name() {
        let mut registry = KeybindRegistry::new();
        let handle = registry.register("Auto Sleep", KeyCode::KeyZ);

        assert!(registry.rebind_by_name(&handle, "F5"));
        assert_eq!(registry.key(&handle), Some(KeyCode::F5));

        assert!(!registry.rebind_by_name(&handle, "NotAKey"));
        assert_eq!(registry.key(&handle), Some(KeyCode::F5));
        assert_eq!(
            registry.describe(),
            vec![("Auto Sleep".to_string(), KeyCode::F5)]
        );
    }

    #[test]
    fn unregister_removes_the_bind() {
        let mut registry = KeybindRegistry::new();
        let keep = registry.register("Inventory", KeyCode::KeyE);
        let handle = registry.register("Auto Sleep", KeyCode::KeyZ);
        assert_eq!(registry.len(), 2);

        registry.unregister(handle);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.describe(),
            vec![("Inventory".to_string(), KeyCode::KeyE)]
        );
        assert_eq!(keep.name(), "Inventory");
    }

    #[test]
    fn parses_key_names() {
        assert_eq!(parse_key_code("KeyZ"), Some(KeyCode::KeyZ));
        assert_eq!(parse_key_code(" Digit3 "), Some(KeyCode::Digit3));
        assert_eq!(parse_key_code("F12"), Some(KeyCode::F12));
        assert_eq!(parse_key_code("z"), None);
    }
}
