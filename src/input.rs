//! Direction input
//!
//! Turns key presses into the single requested direction the simulation
//! consumes. Arrow keys and WASD are equivalent. While several directions
//! are held, the most recent press wins; releasing it falls back to the
//! next most recent one still held.

use crate::sim::Direction;

/// Map a DOM-style key name to a direction (case-insensitive)
pub fn key_to_direction(key: &str) -> Option<Direction> {
    match key.to_ascii_lowercase().as_str() {
        "arrowup" | "w" => Some(Direction::Up),
        "arrowdown" | "s" => Some(Direction::Down),
        "arrowleft" | "a" => Some(Direction::Left),
        "arrowright" | "d" => Some(Direction::Right),
        _ => None,
    }
}

/// Held directions in press order
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: Vec<Direction>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, direction: Direction) {
        if direction == Direction::None {
            return;
        }
        self.held.retain(|&d| d != direction);
        self.held.push(direction);
    }

    pub fn release(&mut self, direction: Direction) {
        self.held.retain(|&d| d != direction);
    }

    /// Returns whether the key is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(direction) = key_to_direction(key) else {
            return false;
        };
        self.press(direction);
        true
    }

    /// Returns whether the key is bound
    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(direction) = key_to_direction(key) else {
            return false;
        };
        self.release(direction);
        true
    }

    /// Drop everything held (focus loss, reset)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Direction to feed the simulation this tick
    pub fn direction(&self) -> Direction {
        self.held.last().copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_equivalent() {
        assert_eq!(key_to_direction("ArrowUp"), Some(Direction::Up));
        assert_eq!(key_to_direction("w"), Some(Direction::Up));
        assert_eq!(key_to_direction("W"), Some(Direction::Up));
        assert_eq!(key_to_direction("ArrowLeft"), key_to_direction("a"));
        assert_eq!(key_to_direction("ArrowDown"), key_to_direction("S"));
        assert_eq!(key_to_direction("ArrowRight"), key_to_direction("d"));
        assert_eq!(key_to_direction("Enter"), None);
    }

    #[test]
    fn test_most_recent_press_wins() {
        let mut input = InputState::new();
        assert_eq!(input.direction(), Direction::None);

        input.key_down("ArrowUp");
        input.key_down("d");
        assert_eq!(input.direction(), Direction::Right);

        input.key_up("D");
        assert_eq!(input.direction(), Direction::Up);

        input.key_up("w");
        assert_eq!(input.direction(), Direction::None);
    }

    #[test]
    fn test_repress_moves_to_front() {
        let mut input = InputState::new();
        input.press(Direction::Left);
        input.press(Direction::Down);
        input.press(Direction::Left);
        assert_eq!(input.direction(), Direction::Left);
        input.release(Direction::Left);
        assert_eq!(input.direction(), Direction::Down);
    }

    #[test]
    fn test_unbound_and_clear() {
        let mut input = InputState::new();
        assert!(!input.key_down("Space"));
        assert!(input.key_down("a"));
        input.clear();
        assert_eq!(input.direction(), Direction::None);
    }
}
