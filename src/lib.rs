//! Pac-Man engine - a deterministic arcade maze simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, movement, ghost AI, scoring)
//! - `engine`: Lifecycle, frame loop and snapshot emission
//! - `input`: Key bindings and direction precedence
//! - `persistence`: High score storage
//! - `tuning`: Data-driven game balance
//! - `autopilot`: Demo player for headless runs

pub mod autopilot;
pub mod engine;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use engine::Engine;
pub use highscores::HighScores;
pub use input::InputState;
pub use snapshot::{HudState, Snapshot};
pub use tuning::{ModeWave, Tuning};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Edge length of one maze tile in pixels
    pub const TILE_SIZE: f32 = 24.0;

    /// Maze dimensions in tiles
    pub const MAZE_WIDTH: usize = 28;
    pub const MAZE_HEIGHT: usize = 31;

    /// Maze width in pixels (tunnel wrap boundary)
    pub const MAZE_WIDTH_PX: f32 = MAZE_WIDTH as f32 * TILE_SIZE;

    /// Collision radii
    pub const PACMAN_RADIUS: f32 = 10.0;
    pub const GHOST_RADIUS: f32 = 10.0;

    /// Scoring
    pub const POINTS_DOT: u64 = 10;
    pub const POINTS_POWER_PELLET: u64 = 50;
    /// Doubles per ghost eaten in one power-pellet window: 200, 400, 800, 1600
    pub const POINTS_GHOST_BASE: u64 = 200;

    /// Ghosts re-evaluate direction only within this many pixels of a tile center
    pub const DECISION_TOLERANCE: f32 = 2.0;

    /// Largest simulation sub-step; keeps ghosts from skipping decision points
    pub const MAX_STEP_MS: f64 = 16.0;

    /// Minimum interval between HUD emissions
    pub const HUD_THROTTLE_MS: f64 = 100.0;

    /// Number of frames in the rolling FPS window
    pub const FPS_WINDOW: usize = 60;
}

/// Core error type for the engine's fallible surfaces (config, storage).
#[derive(thiserror::Error, Debug)]
pub enum PacmanError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Storage backend unavailable or rejected the write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Tuning values that would break the simulation
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// Maze layout text could not be parsed
    #[error("Invalid maze layout: {0}")]
    InvalidLayout(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, PacmanError>;

/// Tile containing a pixel coordinate (floor division, may be out of the grid)
#[inline]
pub fn pixel_to_tile(pixel: Vec2) -> IVec2 {
    IVec2::new(
        (pixel.x / consts::TILE_SIZE).floor() as i32,
        (pixel.y / consts::TILE_SIZE).floor() as i32,
    )
}

/// Pixel coordinate of a tile's center
#[inline]
pub fn tile_center(tile: IVec2) -> Vec2 {
    Vec2::new(
        tile.x as f32 * consts::TILE_SIZE + consts::TILE_SIZE / 2.0,
        tile.y as f32 * consts::TILE_SIZE + consts::TILE_SIZE / 2.0,
    )
}

/// Manhattan distance between two tiles
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
