//! Ghost target-tile selection
//!
//! Targets are recomputed every tick but only steer a ghost at its next
//! decision point. Targets may lie outside the maze; only the distance to
//! them matters.

use glam::IVec2;

use super::maze::GHOST_HOUSE_TILE;
use super::state::{Direction, Ghost, GhostMode, Personality, Position};
use crate::consts::TILE_SIZE;

/// Pinky aims this many tiles ahead of Pacman
pub const PINKY_LOOKAHEAD: i32 = 4;
/// Inky pivots this many tiles ahead of Pacman
pub const INKY_LOOKAHEAD: i32 = 2;
/// Clyde chases only beyond this many tiles
pub const CLYDE_SHY_RADIUS_TILES: f32 = 8.0;

/// What a ghost may read about Pacman for targeting
#[derive(Debug, Clone, Copy)]
pub struct PacmanView {
    pub position: Position,
    pub direction: Direction,
}

/// Tile `steps` ahead of Pacman along his facing direction
pub fn tiles_ahead(pacman: &PacmanView, steps: i32) -> IVec2 {
    pacman.position.tile() + pacman.direction.delta() * steps
}

/// Personality-specific Chase target.
///
/// `blinky_tile` feeds Inky's flank; without it Inky falls back to its pivot.
pub fn chase_target(
    personality: Personality,
    ghost_position: &Position,
    pacman: &PacmanView,
    blinky_tile: Option<IVec2>,
) -> IVec2 {
    match personality {
        Personality::Blinky => pacman.position.tile(),
        Personality::Pinky => tiles_ahead(pacman, PINKY_LOOKAHEAD),
        Personality::Inky => {
            let pivot = tiles_ahead(pacman, INKY_LOOKAHEAD);
            match blinky_tile {
                Some(blinky) => blinky + (pivot - blinky) * 2,
                None => pivot,
            }
        }
        Personality::Clyde => {
            let distance = ghost_position.pixel().distance(pacman.position.pixel());
            if distance > CLYDE_SHY_RADIUS_TILES * TILE_SIZE {
                pacman.position.tile()
            } else {
                personality.scatter_corner()
            }
        }
    }
}

/// Target for the ghost's current mode
pub fn target_tile(ghost: &Ghost, pacman: &PacmanView, blinky_tile: Option<IVec2>) -> IVec2 {
    match ghost.mode {
        GhostMode::Scatter => ghost.personality.scatter_corner(),
        GhostMode::Chase => chase_target(ghost.personality, &ghost.position, pacman, blinky_tile),
        // Direction is random; the target just tracks the ghost itself
        GhostMode::Frightened => ghost.position.tile(),
        GhostMode::Eaten => GHOST_HOUSE_TILE,
    }
}
