//! Per-tick entity movement
//!
//! Pacman turns whenever his queued direction is legal and stops at the
//! center of a tile whose exit is blocked. Ghosts are grid-locked: they pick
//! a direction only at tile centers, never reverse voluntarily, and steer
//! greedily toward their target tile.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::ai::{PacmanView, target_tile};
use super::maze::{Maze, Tile};
use super::state::{Direction, Ghost, GhostMode, Pacman, Position};
use crate::consts::{DECISION_TOLERANCE, MAZE_WIDTH_PX, TILE_SIZE};
use crate::tuning::Tuning;
use crate::{manhattan, tile_center};

/// Who is asking: the ghost-house gate only blocks Pacman
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mover {
    Pacman,
    Ghost,
}

/// Whether a mover on `from` may step one tile in `dir`
pub fn can_enter(maze: &Maze, from: IVec2, dir: Direction, mover: Mover) -> bool {
    if dir == Direction::None {
        return false;
    }
    let to = from + dir.delta();
    if !maze.in_bounds(to.x, to.y) {
        return maze.is_tunnel_exit(from, dir);
    }
    match maze.tile_at(to) {
        Tile::Wall => false,
        Tile::GhostHouseGate => mover == Mover::Ghost,
        _ => true,
    }
}

/// Horizontal tunnel wrap: past either edge lands on the opposite one
pub fn wrap_tunnel(mut pixel: Vec2) -> Vec2 {
    if pixel.x < 0.0 {
        pixel.x = MAZE_WIDTH_PX;
    } else if pixel.x > MAZE_WIDTH_PX {
        pixel.x = 0.0;
    }
    pixel
}

/// Whether Pacman may commit to `dir` this tick
fn can_turn(pacman: &Pacman, maze: &Maze, dir: Direction) -> bool {
    if dir == pacman.direction.opposite() && dir != Direction::None {
        return true;
    }
    let offset = pacman.position.center_offset();
    let threshold = TILE_SIZE / 2.0;
    let aligned = if dir.is_vertical() {
        offset.x.abs() <= threshold
    } else {
        offset.y.abs() <= threshold
    };
    aligned && can_enter(maze, pacman.position.tile(), dir, Mover::Pacman)
}

/// Advance Pacman by `dt_ms`: commit buffered input, move, wrap.
pub fn step_pacman(pacman: &mut Pacman, maze: &Maze, dt_ms: f64) {
    pacman.animation_frame = pacman.animation_frame.wrapping_add(1);

    let next = pacman.next_direction;
    if next != Direction::None && can_turn(pacman, maze, next) {
        // Snap onto the tile center across the new axis
        let center = tile_center(pacman.position.tile());
        let mut pixel = pacman.position.pixel();
        if next.is_vertical() {
            pixel.x = center.x;
        } else {
            pixel.y = center.y;
        }
        pacman.position.set_pixel(pixel);
        pacman.direction = next;
        pacman.next_direction = Direction::None;
    }

    let unit = pacman.direction.unit();
    pacman.velocity = unit * pacman.speed;
    if pacman.velocity == Vec2::ZERO {
        return;
    }

    let travel = pacman.speed * (dt_ms / 1000.0) as f32;
    let pixel = pacman.position.pixel();
    let mut moved = pixel + unit * travel;

    let tile = pacman.position.tile();
    if !can_enter(maze, tile, pacman.direction, Mover::Pacman) {
        // Blocked ahead: run up to the center and stop there, keeping the
        // direction so queued input keeps retrying
        let to_center = (tile_center(tile) - pixel).dot(unit);
        if to_center <= travel {
            moved = pixel + unit * to_center.max(0.0);
            pacman.velocity = Vec2::ZERO;
        }
    }

    pacman.position.set_pixel(wrap_tunnel(moved));
}

/// Legal directions from the ghost's tile: open, not a reversal, unless
/// reversing is the only way out.
pub fn legal_directions(maze: &Maze, tile: IVec2, heading: Direction) -> Vec<Direction> {
    let reverse = heading.opposite();
    let mut options: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&dir| dir != reverse && can_enter(maze, tile, dir, Mover::Ghost))
        .collect();

    if options.is_empty() && can_enter(maze, tile, reverse, Mover::Ghost) {
        options.push(reverse);
    }
    options
}

/// Option whose next tile is closest (Manhattan) to `target`; ties keep the
/// first in Up, Down, Left, Right order.
pub fn closest_to_target(options: &[Direction], tile: IVec2, target: IVec2) -> Option<Direction> {
    let mut best: Option<(Direction, i32)> = None;
    for &dir in options {
        let distance = manhattan(tile + dir.delta(), target);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((dir, distance));
        }
    }
    best.map(|(dir, _)| dir)
}

/// Direction a ghost commits to at a decision point
pub fn choose_direction(maze: &Maze, ghost: &Ghost, rng: &mut impl Rng) -> Option<Direction> {
    let tile = ghost.position.tile();
    let options = legal_directions(maze, tile, ghost.direction);
    if options.is_empty() {
        return None;
    }
    if ghost.mode == GhostMode::Frightened {
        return Some(options[rng.random_range(0..options.len())]);
    }
    closest_to_target(&options, tile, ghost.target_tile)
}

/// Movement speed for the ghost's mode and surroundings
pub fn ghost_speed(ghost: &Ghost, maze: &Maze, tuning: &Tuning) -> f32 {
    let tile = ghost.position.tile();
    let in_tunnel = !maze.in_bounds(tile.x, tile.y) || maze.tile_at(tile) == Tile::Tunnel;
    match ghost.mode {
        GhostMode::Eaten => tuning.ghost_eaten_speed,
        _ if in_tunnel => tuning.ghost_tunnel_speed,
        GhostMode::Frightened => tuning.ghost_frightened_speed,
        GhostMode::Chase | GhostMode::Scatter => tuning.ghost_speed,
    }
}

/// True within the decision window of the current tile's center
pub fn at_decision_point(ghost: &Ghost) -> bool {
    let offset = ghost.position.center_offset();
    offset.x.abs() < DECISION_TOLERANCE && offset.y.abs() < DECISION_TOLERANCE
}

/// Advance one ghost by `dt_ms`: retarget, decide at tile centers, move, wrap.
pub fn step_ghost(
    ghost: &mut Ghost,
    maze: &Maze,
    pacman: &PacmanView,
    blinky_tile: Option<IVec2>,
    tuning: &Tuning,
    rng: &mut impl Rng,
    dt_ms: f64,
) {
    ghost.speed = ghost_speed(ghost, maze, tuning);
    ghost.target_tile = target_tile(ghost, pacman, blinky_tile);

    let tile = ghost.position.tile();
    if at_decision_point(ghost) && ghost.last_decision_tile != Some(tile) {
        if let Some(dir) = choose_direction(maze, ghost, rng) {
            if dir != ghost.direction {
                ghost.position = Position::at_tile(tile);
            }
            ghost.direction = dir;
        }
        ghost.last_decision_tile = Some(tile);
    }

    let unit = ghost.direction.unit();
    ghost.velocity = unit * ghost.speed;
    let travel = ghost.speed * (dt_ms / 1000.0) as f32;
    let pixel = ghost.position.pixel();
    let mut moved = pixel + unit * travel;

    if ghost.last_decision_tile != Some(tile) {
        // Stop on the center of an undecided tile so the next step decides there
        let to_center = (tile_center(tile) - pixel).dot(unit);
        if to_center > 0.0 && to_center < travel {
            moved = pixel + unit * to_center;
        }
    }

    ghost.position.set_pixel(wrap_tunnel(moved));

    ghost.time_in_mode_ms += dt_ms;
}
