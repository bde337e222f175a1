//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied delta time, split into bounded sub-steps
//! - Seeded RNG only
//! - Stable iteration order (Blinky, Pinky, Inky, Clyde)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod maze;
pub mod movement;
pub mod schedule;
pub mod state;
pub mod tick;

pub use ai::{PacmanView, chase_target, target_tile};
pub use collision::{GhostContact, circles_overlap};
pub use maze::{
    CLASSIC_LAYOUT, GHOST_HOUSE_TILE, GHOST_START_TILES, Maze, PACMAN_START_TILE, SCATTER_CORNERS,
    Tile,
};
pub use schedule::{ModeScheduler, SchedulePhase};
pub use state::{
    Direction, GameEvent, GamePhase, GameState, Ghost, GhostMode, Pacman, Personality, Position,
};
pub use tick::{TickInput, tick};
