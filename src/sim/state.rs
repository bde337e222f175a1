//! Game state and core simulation types
//!
//! The `GameState` aggregate owns the maze working copy, Pacman, the four
//! ghosts and the mode scheduler. Nothing else writes to them.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::maze::{GHOST_START_TILES, Maze, PACMAN_START_TILE, SCATTER_CORNERS};
use super::schedule::{ModeScheduler, SchedulePhase};
use crate::tuning::Tuning;
use crate::{pixel_to_tile, tile_center};

/// Movement direction; also selects AI target offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Enumeration order doubles as the ghost tie-break order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Tile offset (screen coordinates, y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::None => IVec2::ZERO,
        }
    }

    /// Unit velocity vector
    pub fn unit(self) -> Vec2 {
        self.delta().as_vec2()
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Pixel position with its derived tile.
///
/// The tile is always recomputed from the pixel coordinate; it cannot be set
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pixel: Vec2,
    tile: IVec2,
}

impl Position {
    pub fn from_pixel(pixel: Vec2) -> Self {
        Self {
            pixel,
            tile: pixel_to_tile(pixel),
        }
    }

    /// Centered on the given tile
    pub fn at_tile(tile: IVec2) -> Self {
        Self::from_pixel(tile_center(tile))
    }

    #[inline]
    pub fn pixel(&self) -> Vec2 {
        self.pixel
    }

    #[inline]
    pub fn tile(&self) -> IVec2 {
        self.tile
    }

    pub fn set_pixel(&mut self, pixel: Vec2) {
        *self = Self::from_pixel(pixel);
    }

    /// Offset from the current tile's center
    pub fn center_offset(&self) -> Vec2 {
        self.pixel - tile_center(self.tile)
    }
}

/// The four ghost archetypes; fixed for a ghost's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personality {
    /// Direct pursuit
    Blinky,
    /// Ambush ahead of Pacman
    Pinky,
    /// Flanks using Blinky's position
    Inky,
    /// Shy: chases from afar, retreats up close
    Clyde,
}

impl Personality {
    /// Fixed update order
    pub const ALL: [Personality; 4] = [
        Personality::Blinky,
        Personality::Pinky,
        Personality::Inky,
        Personality::Clyde,
    ];

    pub fn index(self) -> usize {
        match self {
            Personality::Blinky => 0,
            Personality::Pinky => 1,
            Personality::Inky => 2,
            Personality::Clyde => 3,
        }
    }

    pub fn start_tile(self) -> IVec2 {
        GHOST_START_TILES[self.index()]
    }

    pub fn scatter_corner(self) -> IVec2 {
        SCATTER_CORNERS[self.index()]
    }
}

/// Ghost behavioral state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostMode {
    Chase,
    Scatter,
    Frightened,
    Eaten,
}

/// Overall game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for start
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Caught by a ghost; resumes after a delay
    LifeLost,
    /// Every dot eaten
    LevelComplete,
    /// No lives left
    GameOver,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    DotEaten { tile: IVec2 },
    PowerPelletEaten { tile: IVec2 },
    GhostEaten { personality: Personality, points: u64 },
    FrightenedEnded,
    PacmanCaught { by: Personality },
    LifeLost { lives_left: u8 },
    ExtraLife { lives: u8 },
    ModeChanged { phase: SchedulePhase, wave: usize },
    GhostReturned { personality: Personality },
    LevelComplete { level: u32 },
    GameOver { score: u64 },
}

/// The player
#[derive(Debug, Clone, Serialize)]
pub struct Pacman {
    pub position: Position,
    pub velocity: Vec2,
    pub direction: Direction,
    /// Queued input, committed once the turn is legal
    pub next_direction: Direction,
    /// Pixels per second
    pub speed: f32,
    pub lives: u8,
    pub powered_up: bool,
    pub power_up_remaining_ms: f64,
    pub animation_frame: u32,
}

impl Pacman {
    pub fn new(lives: u8, speed: f32) -> Self {
        Self {
            position: Position::at_tile(PACMAN_START_TILE),
            velocity: Vec2::ZERO,
            direction: Direction::None,
            next_direction: Direction::None,
            speed,
            lives,
            powered_up: false,
            power_up_remaining_ms: 0.0,
            animation_frame: 0,
        }
    }

    /// Back to the start tile, standing still, power-up cleared
    pub fn respawn(&mut self) {
        self.position = Position::at_tile(PACMAN_START_TILE);
        self.velocity = Vec2::ZERO;
        self.direction = Direction::None;
        self.next_direction = Direction::None;
        self.powered_up = false;
        self.power_up_remaining_ms = 0.0;
    }

    pub fn set_next_direction(&mut self, direction: Direction) {
        self.next_direction = direction;
    }

    pub fn activate_power_up(&mut self, duration_ms: f64) {
        self.powered_up = true;
        self.power_up_remaining_ms = duration_ms;
    }

    /// Count the power-up down; true on the step it runs out
    pub fn decay_power_up(&mut self, dt_ms: f64) -> bool {
        if !self.powered_up {
            return false;
        }
        self.power_up_remaining_ms -= dt_ms;
        if self.power_up_remaining_ms <= 0.0 {
            self.powered_up = false;
            self.power_up_remaining_ms = 0.0;
            return true;
        }
        false
    }

    /// Only the count; repositioning is the caller's job
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn gain_life(&mut self, max_lives: u8) {
        self.lives = self.lives.saturating_add(1).min(max_lives);
    }
}

/// One of the four ghosts
#[derive(Debug, Clone, Serialize)]
pub struct Ghost {
    pub personality: Personality,
    pub position: Position,
    pub velocity: Vec2,
    pub direction: Direction,
    /// Pixels per second
    pub speed: f32,
    pub mode: GhostMode,
    /// Tile steered toward at the next decision point
    pub target_tile: IVec2,
    pub time_in_mode_ms: f64,
    /// Tile of the last direction decision; one decision per tile visit
    #[serde(skip)]
    pub last_decision_tile: Option<IVec2>,
}

impl Ghost {
    pub fn new(personality: Personality, speed: f32) -> Self {
        Self {
            personality,
            position: Position::at_tile(personality.start_tile()),
            velocity: Vec2::ZERO,
            direction: Direction::Left,
            speed,
            mode: GhostMode::Scatter,
            target_tile: personality.scatter_corner(),
            time_in_mode_ms: 0.0,
            last_decision_tile: None,
        }
    }

    /// Back to the start tile in Scatter, facing left
    pub fn respawn(&mut self, speed: f32) {
        *self = Self::new(self.personality, speed);
    }

    /// Switch mode; every change except entering Eaten reverses direction
    pub fn set_mode(&mut self, mode: GhostMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.time_in_mode_ms = 0.0;
        if mode != GhostMode::Eaten {
            self.reverse();
        }
    }

    pub fn reverse(&mut self) {
        self.direction = self.direction.opposite();
        self.velocity = -self.velocity;
        self.last_decision_tile = None;
    }

    pub fn is_frightened(&self) -> bool {
        self.mode == GhostMode::Frightened
    }
}

/// Complete game aggregate (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// 1-based
    pub level: u32,
    /// Working copy; the template is never mutated
    pub maze: Maze,
    pub pacman: Pacman,
    /// Blinky, Pinky, Inky, Clyde
    pub ghosts: [Ghost; 4],
    pub scheduler: ModeScheduler,
    /// Ghosts eaten in the current power-pellet window
    pub ghosts_eaten_in_sequence: u32,
    /// Countdown until LifeLost resumes play
    pub life_lost_remaining_ms: f64,
    pub extra_life_awarded: bool,
    /// Simulated time while Playing
    pub time_ms: f64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    /// Grows until [`GameState::drain_events`] is called
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh game in `Ready` on a copy of `template`
    pub fn new(template: &Maze, tuning: Tuning, high_score: u64) -> Self {
        let ghosts = Personality::ALL.map(|p| Ghost::new(p, tuning.ghost_speed));
        Self {
            phase: GamePhase::Ready,
            score: 0,
            high_score,
            level: 1,
            maze: template.clone(),
            pacman: Pacman::new(tuning.starting_lives, tuning.pacman_speed),
            ghosts,
            scheduler: ModeScheduler::new(tuning.mode_waves.clone()),
            ghosts_eaten_in_sequence: 0,
            life_lost_remaining_ms: 0.0,
            extra_life_awarded: false,
            time_ms: 0.0,
            rng: Pcg32::seed_from_u64(tuning.seed),
            tuning,
            events: Vec::new(),
        }
    }

    pub fn dots_remaining(&self) -> usize {
        self.maze.remaining_collectibles()
    }

    pub fn ghost(&self, personality: Personality) -> &Ghost {
        &self.ghosts[personality.index()]
    }

    pub fn ghost_mut(&mut self, personality: Personality) -> &mut Ghost {
        &mut self.ghosts[personality.index()]
    }

    /// Put Pacman and every ghost back on their start tiles and restart the
    /// wave schedule. Score, lives and dots are kept.
    pub fn respawn_entities(&mut self) {
        self.pacman.respawn();
        for ghost in &mut self.ghosts {
            ghost.respawn(self.tuning.ghost_speed);
        }
        self.scheduler.reset();
        self.ghosts_eaten_in_sequence = 0;
    }

    /// Start the next level on a fresh copy of `template`
    pub fn next_level(&mut self, template: &Maze) {
        self.level += 1;
        self.maze = template.clone();
        self.respawn_entities();
        self.phase = GamePhase::Ready;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.delta() + dir.opposite().delta(), IVec2::ZERO);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_position_tile_follows_pixel() {
        let mut pos = Position::at_tile(IVec2::new(3, 4));
        assert_eq!(pos.tile(), IVec2::new(3, 4));
        pos.set_pixel(pos.pixel() + Vec2::new(13.0, 0.0));
        assert_eq!(pos.tile(), IVec2::new(4, 4));
        assert_eq!(pos.center_offset(), Vec2::new(-11.0, 0.0));
    }

    #[test]
    fn test_set_mode_reverses_except_eaten() {
        let mut ghost = Ghost::new(Personality::Pinky, 69.0);
        assert_eq!(ghost.direction, Direction::Left);

        ghost.set_mode(GhostMode::Chase);
        assert_eq!(ghost.direction, Direction::Right);

        // Same mode again: no reversal
        ghost.set_mode(GhostMode::Chase);
        assert_eq!(ghost.direction, Direction::Right);

        ghost.set_mode(GhostMode::Eaten);
        assert_eq!(ghost.direction, Direction::Right);
        assert_eq!(ghost.time_in_mode_ms, 0.0);
    }

    #[test]
    fn test_power_up_decay() {
        let mut pacman = Pacman::new(3, 75.0);
        pacman.activate_power_up(100.0);
        assert!(!pacman.decay_power_up(60.0));
        assert!(pacman.powered_up);
        assert!(pacman.decay_power_up(60.0));
        assert!(!pacman.powered_up);
        assert!(!pacman.decay_power_up(60.0));
    }

    #[test]
    fn test_lives_bounds() {
        let mut pacman = Pacman::new(1, 75.0);
        pacman.position = Position::at_tile(IVec2::new(1, 1));
        pacman.lose_life();
        pacman.lose_life();
        assert_eq!(pacman.lives, 0);
        assert_eq!(pacman.position.tile(), IVec2::new(1, 1));
        for _ in 0..10 {
            pacman.gain_life(5);
        }
        assert_eq!(pacman.lives, 5);
    }

    #[test]
    fn test_respawn_entities_keeps_score_and_dots() {
        let template = Maze::classic();
        let mut state = GameState::new(&template, Tuning::default(), 0);
        state.score = 120;
        state.maze.consume(1, 1);
        state.pacman.position = Position::at_tile(IVec2::new(1, 1));
        state.ghosts[2].mode = GhostMode::Frightened;

        state.respawn_entities();

        assert_eq!(state.score, 120);
        assert_eq!(state.dots_remaining(), 243);
        assert_eq!(state.pacman.position.tile(), PACMAN_START_TILE);
        assert_eq!(state.ghosts[2].mode, GhostMode::Scatter);
        assert_eq!(state.ghosts[2].position.tile(), Personality::Inky.start_tile());
    }
}
