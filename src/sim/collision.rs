//! Collision detection and scoring
//!
//! Pacman and ghosts are circles; dots and pellets are eaten by tile
//! occupancy rather than overlap.

use glam::Vec2;

use super::maze::Tile;
use super::state::{GameEvent, GamePhase, GameState, GhostMode};
use crate::consts::{
    GHOST_RADIUS, PACMAN_RADIUS, POINTS_DOT, POINTS_GHOST_BASE, POINTS_POWER_PELLET,
};

/// Strict circle overlap: touching is not a collision
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Points for the `sequence`-th ghost eaten in one power-pellet window
/// (0-based): 200, 400, 800, 1600.
pub fn ghost_points(sequence: u32) -> u64 {
    POINTS_GHOST_BASE.saturating_mul(1u64 << sequence.min(32))
}

/// Add points, keep the running high score, and award the one-off extra
/// life when the threshold is crossed.
pub fn award_points(state: &mut GameState, points: u64) {
    state.score += points;
    state.high_score = state.high_score.max(state.score);

    let threshold = state.tuning.extra_life_score;
    if threshold > 0 && !state.extra_life_awarded && state.score >= threshold {
        state.extra_life_awarded = true;
        let before = state.pacman.lives;
        state.pacman.gain_life(state.tuning.max_lives);
        if state.pacman.lives > before {
            let lives = state.pacman.lives;
            state.push_event(GameEvent::ExtraLife { lives });
        }
    }
}

/// Eat whatever collectible sits on Pacman's tile
pub fn collect_at_pacman(state: &mut GameState) -> Option<Tile> {
    let tile = state.pacman.position.tile();
    match state.maze.consume(tile.x, tile.y) {
        Tile::Dot => {
            award_points(state, POINTS_DOT);
            state.push_event(GameEvent::DotEaten { tile });
            Some(Tile::Dot)
        }
        Tile::PowerPellet => {
            award_points(state, POINTS_POWER_PELLET);
            state.ghosts_eaten_in_sequence = 0;
            state
                .pacman
                .activate_power_up(state.tuning.power_pellet_duration_ms);
            for ghost in &mut state.ghosts {
                if ghost.mode != GhostMode::Eaten {
                    ghost.set_mode(GhostMode::Frightened);
                }
            }
            state.push_event(GameEvent::PowerPelletEaten { tile });
            Some(Tile::PowerPellet)
        }
        _ => None,
    }
}

/// Outcome of Pacman-ghost resolution for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostContact {
    None,
    /// One or more frightened ghosts were eaten
    Ate,
    /// Pacman was caught; the phase has already changed
    Caught,
}

/// Resolve Pacman against each ghost in personality order.
///
/// Frightened ghosts are eaten for escalating points. Any other ghost that is
/// not Eaten catches Pacman; resolution stops there since every entity has
/// been sent back to its start tile.
pub fn resolve_ghost_collisions(state: &mut GameState) -> GhostContact {
    let mut contact = GhostContact::None;

    for i in 0..state.ghosts.len() {
        let pacman = state.pacman.position.pixel();
        let ghost = &state.ghosts[i];
        if !circles_overlap(pacman, PACMAN_RADIUS, ghost.position.pixel(), GHOST_RADIUS) {
            continue;
        }

        let personality = ghost.personality;
        let mode = ghost.mode;
        match mode {
            GhostMode::Frightened => {
                let points = ghost_points(state.ghosts_eaten_in_sequence);
                state.ghosts_eaten_in_sequence += 1;
                state.ghosts[i].set_mode(GhostMode::Eaten);
                award_points(state, points);
                state.push_event(GameEvent::GhostEaten {
                    personality,
                    points,
                });
                contact = GhostContact::Ate;
            }
            GhostMode::Eaten => {}
            GhostMode::Chase | GhostMode::Scatter => {
                state.push_event(GameEvent::PacmanCaught { by: personality });
                lose_life(state);
                return GhostContact::Caught;
            }
        }
    }

    contact
}

/// Take a life, send everyone home, and enter LifeLost or GameOver
pub fn lose_life(state: &mut GameState) {
    state.pacman.lose_life();
    state.respawn_entities();

    let lives_left = state.pacman.lives;
    if lives_left == 0 {
        state.phase = GamePhase::GameOver;
        state.life_lost_remaining_ms = 0.0;
        let score = state.score;
        state.push_event(GameEvent::GameOver { score });
    } else {
        state.phase = GamePhase::LifeLost;
        state.life_lost_remaining_ms = state.tuning.life_lost_delay_ms;
        state.push_event(GameEvent::LifeLost { lives_left });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::Maze;
    use crate::sim::state::{Personality, Position};
    use crate::tuning::Tuning;
    use glam::IVec2;

    fn playing_state() -> GameState {
        let mut state = GameState::new(&Maze::classic(), Tuning::default(), 0);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Vec2::new(0.0, 0.0);
        assert!(!circles_overlap(a, 10.0, Vec2::new(20.0, 0.0), 10.0));
        assert!(circles_overlap(a, 10.0, Vec2::new(19.99, 0.0), 10.0));
        assert!(circles_overlap(Vec2::new(19.99, 0.0), 10.0, a, 10.0));
    }

    #[test]
    fn test_ghost_points_sequence() {
        let points: Vec<u64> = (0..4).map(ghost_points).collect();
        assert_eq!(points, vec![200, 400, 800, 1600]);
    }

    #[test]
    fn test_collect_dot() {
        let mut state = playing_state();
        state.pacman.position = Position::at_tile(IVec2::new(1, 1));

        assert_eq!(collect_at_pacman(&mut state), Some(Tile::Dot));
        assert_eq!(state.score, 10);
        assert_eq!(state.dots_remaining(), 243);
        assert_eq!(collect_at_pacman(&mut state), None);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_power_pellet_frightens_all_but_eaten() {
        let mut state = playing_state();
        state.ghosts_eaten_in_sequence = 3;
        state.ghosts[1].mode = GhostMode::Eaten;
        state.pacman.position = Position::at_tile(IVec2::new(1, 3));

        assert_eq!(collect_at_pacman(&mut state), Some(Tile::PowerPellet));
        assert_eq!(state.score, 50);
        assert_eq!(state.ghosts_eaten_in_sequence, 0);
        assert!(state.pacman.powered_up);
        assert_eq!(
            state.pacman.power_up_remaining_ms,
            state.tuning.power_pellet_duration_ms
        );
        assert_eq!(state.ghosts[0].mode, GhostMode::Frightened);
        assert_eq!(state.ghosts[1].mode, GhostMode::Eaten);
        assert_eq!(state.ghosts[3].mode, GhostMode::Frightened);
    }

    #[test]
    fn test_eating_frightened_ghosts_escalates() {
        let mut state = playing_state();
        let spot = state.pacman.position;
        for ghost in &mut state.ghosts {
            ghost.mode = GhostMode::Frightened;
            ghost.position = spot;
        }

        assert_eq!(resolve_ghost_collisions(&mut state), GhostContact::Ate);
        assert_eq!(state.score, 200 + 400 + 800 + 1600);
        assert!(state.ghosts.iter().all(|g| g.mode == GhostMode::Eaten));

        // Eaten ghosts pass through harmlessly
        assert_eq!(resolve_ghost_collisions(&mut state), GhostContact::None);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_caught_enters_life_lost() {
        let mut state = playing_state();
        state.score = 30;
        state.maze.consume(1, 1);
        let pacman_spot = Position::at_tile(IVec2::new(6, 5));
        state.pacman.position = pacman_spot;
        state.ghost_mut(Personality::Pinky).position = pacman_spot;

        assert_eq!(resolve_ghost_collisions(&mut state), GhostContact::Caught);
        assert_eq!(state.phase, GamePhase::LifeLost);
        assert_eq!(state.pacman.lives, 2);
        assert_eq!(state.life_lost_remaining_ms, state.tuning.life_lost_delay_ms);
        assert_eq!(state.score, 30);
        assert_eq!(state.dots_remaining(), 243);
        assert_eq!(
            state.ghost(Personality::Pinky).position.tile(),
            Personality::Pinky.start_tile()
        );
        assert!(state.events().contains(&GameEvent::LifeLost { lives_left: 2 }));
    }

    #[test]
    fn test_last_life_goes_straight_to_game_over() {
        let mut state = playing_state();
        state.pacman.lives = 1;
        let spot = state.pacman.position;
        state.ghosts[0].position = spot;

        resolve_ghost_collisions(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.pacman.lives, 0);
        assert_eq!(state.life_lost_remaining_ms, 0.0);
    }

    #[test]
    fn test_extra_life_once() {
        let mut state = playing_state();
        award_points(&mut state, 9_990);
        assert_eq!(state.pacman.lives, 3);
        award_points(&mut state, 10);
        assert_eq!(state.pacman.lives, 4);
        assert!(state.events().contains(&GameEvent::ExtraLife { lives: 4 }));
        award_points(&mut state, 20_000);
        assert_eq!(state.pacman.lives, 4);
        assert_eq!(state.high_score, 30_000);
    }

    #[test]
    fn test_extra_life_capped() {
        let mut state = playing_state();
        state.pacman.lives = state.tuning.max_lives;
        award_points(&mut state, 10_000);
        assert_eq!(state.pacman.lives, state.tuning.max_lives);
        assert!(state.extra_life_awarded);
    }
}
