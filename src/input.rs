//! Held-key tracking
//!
//! Keyboard events only flip entries in the held set; the frame loop samples
//! it once per frame into a [`TickInput`].

use std::collections::HashSet;

use crate::sim::TickInput;

const LEFT_KEYS: [&str; 2] = ["KeyA", "ArrowLeft"];
const RIGHT_KEYS: [&str; 2] = ["KeyD", "ArrowRight"];
const JUMP_KEYS: [&str; 3] = ["Space", "KeyW", "ArrowUp"];

/// Keys the game reacts to; the browser default is suppressed for these
pub fn is_game_key(code: &str) -> bool {
    LEFT_KEYS
        .iter()
        .chain(RIGHT_KEYS.iter())
        .chain(JUMP_KEYS.iter())
        .any(|k| *k == code)
}

/// Set of currently held `KeyboardEvent.code` values
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    held: HashSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: &str) {
        self.held.insert(code.to_string());
    }

    pub fn release(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Drop everything (window lost focus, keyup events will never arrive)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    fn any_held(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.is_held(c))
    }

    /// Snapshot for one simulation frame
    pub fn sample(&self) -> TickInput {
        TickInput {
            left: self.any_held(&LEFT_KEYS),
            right: self.any_held(&RIGHT_KEYS),
            jump: self.any_held(&JUMP_KEYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_maps_bindings() {
        let mut keys = HeldKeys::new();
        assert_eq!(keys.sample(), TickInput::default());

        keys.press("ArrowLeft");
        keys.press("KeyW");
        let input = keys.sample();
        assert!(input.left);
        assert!(!input.right);
        assert!(input.jump);

        keys.release("ArrowLeft");
        keys.press("KeyD");
        let input = keys.sample();
        assert!(!input.left);
        assert!(input.right);
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let mut keys = HeldKeys::new();
        keys.press("KeyQ");
        keys.press("Enter");
        assert_eq!(keys.sample(), TickInput::default());
        assert!(!is_game_key("KeyQ"));
        assert!(is_game_key("Space"));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut keys = HeldKeys::new();
        keys.press("Space");
        keys.press("KeyD");
        keys.clear();
        assert_eq!(keys.sample(), TickInput::default());
    }

    #[test]
    fn test_release_of_one_binding_keeps_other() {
        let mut keys = HeldKeys::new();
        keys.press("KeyA");
        keys.press("ArrowLeft");
        keys.release("KeyA");
        assert!(keys.sample().left);
    }
}
