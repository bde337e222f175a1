//! Demo autopilot
//!
//! Plays the game for headless runs: breadth-first search from Pacman's tile
//! to the nearest dot (or frightened ghost), steering clear of tiles next to
//! dangerous ghosts.

use std::collections::VecDeque;

use glam::IVec2;

use crate::consts::{MAZE_HEIGHT, MAZE_WIDTH};
use crate::manhattan;
use crate::sim::movement::{Mover, can_enter};
use crate::sim::{Direction, GameState, GhostMode, Maze};

/// Wrap tunnel exits back onto the grid
fn wrap(tile: IVec2) -> IVec2 {
    IVec2::new(tile.x.rem_euclid(MAZE_WIDTH as i32), tile.y)
}

fn index(tile: IVec2) -> Option<usize> {
    let on_grid = tile.x >= 0
        && tile.y >= 0
        && (tile.x as usize) < MAZE_WIDTH
        && (tile.y as usize) < MAZE_HEIGHT;
    on_grid.then(|| tile.y as usize * MAZE_WIDTH + tile.x as usize)
}

/// Open neighbours of `tile` for Pacman, with the direction that reaches them
fn neighbours(maze: &Maze, tile: IVec2) -> impl Iterator<Item = (Direction, IVec2)> + '_ {
    Direction::ALL
        .into_iter()
        .filter(move |&dir| can_enter(maze, tile, dir, Mover::Pacman))
        .map(move |dir| (dir, wrap(tile + dir.delta())))
}

/// Direction to request this frame, if any
pub fn next_direction(state: &GameState) -> Option<Direction> {
    let start = wrap(state.pacman.position.tile());

    let threats: Vec<IVec2> = state
        .ghosts
        .iter()
        .filter(|g| matches!(g.mode, GhostMode::Chase | GhostMode::Scatter))
        .map(|g| g.position.tile())
        .collect();
    let prey: Vec<IVec2> = state
        .ghosts
        .iter()
        .filter(|g| g.mode == GhostMode::Frightened)
        .map(|g| g.position.tile())
        .collect();

    let dangerous = |tile: IVec2| threats.iter().any(|&t| manhattan(t, tile) <= 1);
    let is_goal = |tile: IVec2| state.maze.tile_at(tile).is_collectible() || prey.contains(&tile);

    // Each entry remembers the first step taken from the start
    let mut visited = vec![false; MAZE_WIDTH * MAZE_HEIGHT];
    let mut queue = VecDeque::new();
    if let Some(i) = index(start) {
        visited[i] = true;
    }
    for (dir, next) in neighbours(&state.maze, start) {
        if let Some(i) = index(next) {
            if !visited[i] && !dangerous(next) {
                visited[i] = true;
                queue.push_back((next, dir));
            }
        }
    }

    while let Some((tile, first)) = queue.pop_front() {
        if is_goal(tile) {
            return Some(first);
        }
        for (_, next) in neighbours(&state.maze, tile) {
            if let Some(i) = index(next) {
                if !visited[i] && !dangerous(next) {
                    visited[i] = true;
                    queue.push_back((next, first));
                }
            }
        }
    }

    flee(state, start, &threats)
}

/// No safe route: step to the open neighbour farthest from the nearest threat
fn flee(state: &GameState, start: IVec2, threats: &[IVec2]) -> Option<Direction> {
    neighbours(&state.maze, start)
        .max_by_key(|&(_, next)| {
            threats
                .iter()
                .map(|&t| manhattan(t, next))
                .min()
                .unwrap_or(i32::MAX)
        })
        .map(|(dir, _)| dir)
}
