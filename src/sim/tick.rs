//! Simulation tick
//!
//! Advances the game by a host-supplied delta. The delta is split into
//! sub-steps of at most [`MAX_STEP_MS`] so ghosts never skip past a tile
//! center, while timers still advance by exactly the supplied total.

use super::ai::PacmanView;
use super::collision::{self, GhostContact};
use super::maze::GHOST_HOUSE_TILE;
use super::movement;
use super::state::{Direction, GameEvent, GamePhase, GameState, GhostMode};
use crate::consts::MAX_STEP_MS;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Requested direction; `None` keeps whatever is already buffered
    pub direction: Direction,
}

impl TickInput {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }
}

/// Advance the game state by `dt_ms` milliseconds.
///
/// Only `Playing` and `LifeLost` advance; every other phase is frozen.
/// Events accumulate on the state until drained with
/// [`GameState::drain_events`]; hosts driving `tick` without an
/// [`Engine`](crate::Engine) must drain them each frame.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if !dt_ms.is_finite() || dt_ms <= 0.0 {
        return;
    }

    let mut remaining = dt_ms;
    while remaining > 0.0 {
        let dt = remaining.min(MAX_STEP_MS);
        remaining -= dt;

        match state.phase {
            GamePhase::Playing => step(state, input, dt),
            GamePhase::LifeLost => {
                state.life_lost_remaining_ms -= dt;
                if state.life_lost_remaining_ms <= 0.0 {
                    state.life_lost_remaining_ms = 0.0;
                    state.phase = GamePhase::Playing;
                }
            }
            GamePhase::Ready
            | GamePhase::Paused
            | GamePhase::LevelComplete
            | GamePhase::GameOver => return,
        }
    }
}

/// One `Playing` sub-step, in the fixed update order
fn step(state: &mut GameState, input: &TickInput, dt: f64) {
    state.time_ms += dt;

    // 1. Input
    if input.direction != Direction::None {
        state.pacman.set_next_direction(input.direction);
    }

    // 2. Pacman
    movement::step_pacman(&mut state.pacman, &state.maze, dt);
    if state.pacman.decay_power_up(dt) {
        end_frightened(state);
    }

    // 3. Dots and pellets
    collision::collect_at_pacman(state);

    // 4. Mode scheduler
    let any_frightened = state.ghosts.iter().any(|g| g.is_frightened());
    if let Some(phase) = state.scheduler.update(dt, any_frightened) {
        for ghost in &mut state.ghosts {
            if matches!(ghost.mode, GhostMode::Chase | GhostMode::Scatter) {
                ghost.set_mode(phase.mode());
            }
        }
        let wave = state.scheduler.wave_index();
        state.push_event(GameEvent::ModeChanged { phase, wave });
    }

    // 5. Ghosts, Blinky first so Inky sees his fresh tile
    let view = PacmanView {
        position: state.pacman.position,
        direction: state.pacman.direction,
    };
    for i in 0..state.ghosts.len() {
        let blinky_tile = Some(state.ghosts[0].position.tile());
        movement::step_ghost(
            &mut state.ghosts[i],
            &state.maze,
            &view,
            blinky_tile,
            &state.tuning,
            &mut state.rng,
            dt,
        );

        let ghost = &mut state.ghosts[i];
        if ghost.mode == GhostMode::Eaten && ghost.position.tile() == GHOST_HOUSE_TILE {
            ghost.set_mode(state.scheduler.phase().mode());
            let personality = ghost.personality;
            state.push_event(GameEvent::GhostReturned { personality });
        }
    }

    // 6. Pacman against ghosts
    if collision::resolve_ghost_collisions(state) == GhostContact::Caught {
        return;
    }

    // 7. Level clear
    if state.dots_remaining() == 0 {
        state.phase = GamePhase::LevelComplete;
        let level = state.level;
        state.push_event(GameEvent::LevelComplete { level });
    }
}

/// Power-up ran out: frightened ghosts rejoin the schedule's current phase
fn end_frightened(state: &mut GameState) {
    let mode = state.scheduler.phase().mode();
    for ghost in &mut state.ghosts {
        if ghost.is_frightened() {
            ghost.set_mode(mode);
        }
    }
    state.push_event(GameEvent::FrightenedEnded);
}
