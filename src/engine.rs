//! Game loop and lifecycle
//!
//! The engine owns the authoritative [`GameState`] and is its only writer.
//! A host drives it in one of two ways:
//! - `frame(now_ms)` from a display-refresh callback; the engine measures
//!   delta time, tracks FPS, and hands back a throttled [`HudState`]
//! - `update(dt_ms)` directly, for tests and headless runs
//!
//! Lifecycle commands that do not apply to the current phase are no-ops.

use crate::consts::{FPS_WINDOW, HUD_THROTTLE_MS};
use crate::highscores::HighScores;
use crate::input::InputState;
use crate::persistence::ScoreStore;
use crate::platform;
use crate::sim::{Direction, GameEvent, GamePhase, GameState, Maze, TickInput, tick};
use crate::snapshot::{HudState, Snapshot};
use crate::tuning::Tuning;

pub struct Engine {
    /// Pristine layout; each game and level plays on a copy
    template: Maze,
    tuning: Tuning,
    state: GameState,
    input: InputState,

    /// Frame loop requested (start/resume until pause, stop, or game end)
    running: bool,
    destroyed: bool,

    // Frame clock
    last_time: Option<f64>,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,

    // HUD throttle
    last_hud_time: Option<f64>,
    last_hud_phase: GamePhase,

    // Persistence
    stored_high_score: u64,
    new_high_score: Option<u64>,
    high_scores: HighScores,
    store: Option<Box<dyn ScoreStore>>,

    /// Events from the most recent update
    events: Vec<GameEvent>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("phase", &self.state.phase)
            .field("score", &self.state.score)
            .field("level", &self.state.level)
            .field("running", &self.running)
            .field("destroyed", &self.destroyed)
            .field("fps", &self.fps)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Classic maze, with a previously stored high score
    pub fn new(tuning: Tuning, stored_high_score: u64) -> Self {
        Self::with_layout(Maze::classic(), tuning, stored_high_score)
    }

    pub fn with_layout(template: Maze, tuning: Tuning, stored_high_score: u64) -> Self {
        let state = GameState::new(&template, tuning.clone(), stored_high_score);
        let last_hud_phase = state.phase;
        Self {
            template,
            tuning,
            state,
            input: InputState::new(),
            running: false,
            destroyed: false,
            last_time: None,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
            last_hud_time: None,
            last_hud_phase,
            stored_high_score,
            new_high_score: None,
            high_scores: HighScores::new(),
            store: None,
            events: Vec::new(),
        }
    }

    /// Classic maze, leaderboard and high score loaded from `store`.
    ///
    /// A failing store just means an empty leaderboard.
    pub fn with_store(tuning: Tuning, store: Box<dyn ScoreStore>) -> Self {
        let high_scores = HighScores::load_from(store.as_ref());
        let stored = high_scores.top_score().unwrap_or(0);
        let mut engine = Self::new(tuning, stored);
        engine.high_scores = high_scores;
        engine.store = Some(store);
        engine
    }

    // === Lifecycle ===

    /// Ready -> Playing; starts the frame loop
    pub fn start(&mut self) {
        if self.destroyed || self.state.phase != GamePhase::Ready {
            return;
        }
        self.state.phase = GamePhase::Playing;
        self.running = true;
        self.last_time = None;
        log::info!("Level {} started", self.state.level);
    }

    /// Playing -> Paused; stops the frame loop
    pub fn pause(&mut self) {
        if self.destroyed || self.state.phase != GamePhase::Playing {
            return;
        }
        self.state.phase = GamePhase::Paused;
        self.running = false;
        log::info!("Paused");
    }

    /// Paused -> Playing; restarts the frame loop without a catch-up delta
    pub fn resume(&mut self) {
        if self.destroyed || self.state.phase != GamePhase::Paused {
            return;
        }
        self.state.phase = GamePhase::Playing;
        self.running = true;
        self.last_time = None;
        log::info!("Resumed");
    }

    /// Pause when playing, resume when paused
    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Fresh game in Ready. Stops the frame loop before replacing state.
    pub fn reset(&mut self) {
        if self.destroyed {
            return;
        }
        self.running = false;
        self.last_time = None;
        self.state = GameState::new(&self.template, self.tuning.clone(), self.stored_high_score);
        self.input.clear();
        self.events.clear();
        self.last_hud_time = None;
        self.last_hud_phase = self.state.phase;
        log::info!("Game reset");
    }

    /// LevelComplete -> Ready on the next level
    pub fn advance_level(&mut self) {
        if self.destroyed || self.state.phase != GamePhase::LevelComplete {
            return;
        }
        self.state.next_level(&self.template);
        self.running = false;
        self.input.clear();
        log::info!("Advancing to level {}", self.state.level);
    }

    /// Stop for good and drop input, events and the store
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.running = false;
        self.destroyed = true;
        self.input.clear();
        self.events.clear();
        self.store = None;
        log::info!("Engine destroyed");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // === Input ===

    /// Returns whether the key is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        !self.destroyed && self.input.key_down(key)
    }

    /// Returns whether the key is bound
    pub fn key_up(&mut self, key: &str) -> bool {
        !self.destroyed && self.input.key_up(key)
    }

    /// Queue a direction for Pacman directly (touch controls, autopilots)
    pub fn request_direction(&mut self, direction: Direction) {
        if !self.destroyed && direction != Direction::None {
            self.state.pacman.set_next_direction(direction);
        }
    }

    // === Frame loop ===

    /// Advance the simulation by `dt_ms`, then process its events.
    pub fn update(&mut self, dt_ms: f64) {
        if self.destroyed {
            return;
        }
        self.events.clear();

        let input = TickInput::new(self.input.direction());
        tick(&mut self.state, &input, dt_ms);

        let events = self.state.drain_events();
        for event in &events {
            self.handle_event(event);
        }
        self.events = events;

        if matches!(self.state.phase, GamePhase::GameOver | GamePhase::LevelComplete) {
            self.running = false;
        }
    }

    /// One display-refresh callback at host time `now_ms`.
    ///
    /// Returns a HUD update at most every [`HUD_THROTTLE_MS`], and
    /// immediately whenever the phase changes. Does nothing while the loop is
    /// stopped.
    pub fn frame(&mut self, now_ms: f64) -> Option<HudState> {
        if self.destroyed || !self.running {
            return None;
        }

        let dt = self.last_time.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_time = Some(now_ms);
        self.track_fps(now_ms);

        self.update(dt);
        self.poll_hud(now_ms)
    }

    /// Rolling FPS over the last `FPS_WINDOW` frames
    fn track_fps(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_seen = (self.frames_seen + 1).min(FPS_WINDOW);

        if self.frames_seen < FPS_WINDOW {
            return;
        }
        // Oldest sample is the next one to be overwritten
        let oldest_time = self.frame_times[self.frame_index];
        let elapsed = time - oldest_time;
        if elapsed > 0.0 {
            self.fps = (((FPS_WINDOW - 1) as f64 * 1000.0) / elapsed).round() as u32;
        }
    }

    /// HUD state if the throttle allows or the phase changed
    pub fn poll_hud(&mut self, now_ms: f64) -> Option<HudState> {
        let phase_changed = self.state.phase != self.last_hud_phase;
        let due = self
            .last_hud_time
            .is_none_or(|last| now_ms - last >= HUD_THROTTLE_MS);
        if !phase_changed && !due {
            return None;
        }
        self.last_hud_time = Some(now_ms);
        self.last_hud_phase = self.state.phase;
        Some(self.hud())
    }

    fn handle_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::GhostEaten {
                personality,
                points,
            } => log::debug!("{personality:?} eaten for {points}"),
            GameEvent::ModeChanged { phase, wave } => {
                log::debug!("Mode schedule: {phase:?} (wave {wave})")
            }
            GameEvent::GhostReturned { personality } => {
                log::debug!("{personality:?} back in the house")
            }
            GameEvent::FrightenedEnded => log::debug!("Power-up expired"),
            GameEvent::PacmanCaught { by } => log::debug!("Caught by {by:?}"),
            GameEvent::ExtraLife { lives } => log::info!("Extra life ({lives} lives)"),
            GameEvent::LifeLost { lives_left } => {
                log::info!("Life lost, {lives_left} remaining")
            }
            GameEvent::LevelComplete { level } => {
                log::info!("Level {level} complete, score {}", self.state.score)
            }
            GameEvent::GameOver { score } => self.record_game_over(score),
            GameEvent::DotEaten { .. } | GameEvent::PowerPelletEaten { .. } => {}
        }
    }

    fn record_game_over(&mut self, score: u64) {
        log::info!("Game over, final score {score}");

        if score > self.stored_high_score {
            log::info!("New high score {score} (was {})", self.stored_high_score);
            self.stored_high_score = score;
            self.new_high_score = Some(score);
        }

        if let Some(rank) = self
            .high_scores
            .add_score(score, self.state.level, platform::now_ms())
        {
            log::info!("Leaderboard rank #{rank}");
            if let Some(store) = self.store.as_deref_mut() {
                self.high_scores.save_to(store);
            }
        }
    }

    // === Read-only views ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn hud(&self) -> HudState {
        HudState::capture(&self.state, self.fps)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.fps)
    }

    /// Events produced by the most recent update
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// High score the host should persist, once per improvement
    pub fn take_new_high_score(&mut self) -> Option<u64> {
        self.new_high_score.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::Position;
    use glam::IVec2;

    fn engine() -> Engine {
        Engine::new(Tuning::default(), 0)
    }

    /// Put Blinky on top of Pacman so the next step catches him
    fn park_blinky_on_pacman(engine: &mut Engine) {
        let spot = Position::at_tile(IVec2::new(6, 5));
        engine.state.pacman.position = spot;
        engine.state.ghosts[0].position = spot;
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut engine = engine();
        assert_eq!(engine.phase(), GamePhase::Ready);

        engine.resume();
        assert_eq!(engine.phase(), GamePhase::Ready);
        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Ready);

        engine.start();
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert!(engine.is_running());

        engine.start();
        assert_eq!(engine.phase(), GamePhase::Playing);

        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Paused);
        assert!(!engine.is_running());

        engine.toggle_pause();
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert!(engine.is_running());
    }

    #[test]
    fn test_paused_frames_do_nothing() {
        let mut engine = engine();
        engine.start();
        engine.frame(0.0);
        engine.frame(16.0);
        let time = engine.state().time_ms;

        engine.pause();
        assert_eq!(engine.frame(1_000.0), None);
        assert_eq!(engine.state().time_ms, time);

        // No catch-up jump after resuming
        engine.resume();
        engine.frame(5_000.0);
        assert_eq!(engine.state().time_ms, time);
        engine.frame(5_016.0);
        assert_eq!(engine.state().time_ms, time + 16.0);
    }

    #[test]
    fn test_reset_restores_fresh_game() {
        let mut engine = Engine::new(Tuning::default(), 1_000);
        engine.start();
        engine.key_down("ArrowLeft");
        engine.update(1_000.0);
        assert!(engine.score() > 0);

        engine.reset();
        assert_eq!(engine.phase(), GamePhase::Ready);
        assert!(!engine.is_running());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.state().dots_remaining(), 244);
        assert_eq!(engine.state().high_score, 1_000);
        assert_eq!(engine.state().pacman.lives, 3);
    }

    #[test]
    fn test_destroy_is_terminal() {
        let mut engine = engine();
        engine.start();
        engine.destroy();
        assert!(engine.is_destroyed());
        assert!(!engine.is_running());

        engine.reset();
        engine.start();
        assert!(!engine.key_down("w"));
        assert_eq!(engine.frame(100.0), None);
        assert_eq!(engine.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_hud_throttled_but_phase_change_immediate() {
        let mut engine = engine();
        engine.start();

        assert!(engine.frame(0.0).is_some());
        assert!(engine.frame(16.0).is_none());
        assert!(engine.frame(99.0).is_none());
        assert!(engine.frame(100.0).is_some());

        park_blinky_on_pacman(&mut engine);
        let hud = engine.frame(116.0);
        assert_eq!(hud.map(|h| h.phase), Some(GamePhase::LifeLost));
    }

    #[test]
    fn test_fps_window() {
        let mut engine = engine();
        engine.start();
        for i in 0..FPS_WINDOW {
            engine.frame(i as f64 * 20.0);
        }
        assert_eq!(engine.fps(), 50);
    }

    #[test]
    fn test_game_over_emits_high_score_once() {
        let mut engine = Engine::with_store(Tuning::default(), Box::new(MemoryStore::default()));
        engine.start();
        engine.state.score = 1_500;
        engine.state.pacman.lives = 1;
        park_blinky_on_pacman(&mut engine);

        engine.update(16.0);

        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert!(!engine.is_running());
        assert!(
            engine
                .events()
                .contains(&GameEvent::GameOver { score: engine.score() })
        );
        let expected = engine.score();
        assert_eq!(engine.take_new_high_score(), Some(expected));
        assert_eq!(engine.take_new_high_score(), None);
        assert_eq!(engine.high_scores().top_score(), Some(expected));
    }

    #[test]
    fn test_lower_score_does_not_emit() {
        let mut engine = Engine::new(Tuning::default(), 50_000);
        engine.start();
        engine.state.pacman.lives = 1;
        park_blinky_on_pacman(&mut engine);
        engine.update(16.0);

        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.take_new_high_score(), None);
    }

    #[test]
    fn test_failing_store_does_not_interrupt() {
        let mut engine = Engine::with_store(Tuning::default(), Box::new(MemoryStore::failing()));
        assert!(engine.high_scores().is_empty());
        engine.start();
        engine.state.score = 10;
        engine.state.pacman.lives = 1;
        park_blinky_on_pacman(&mut engine);
        engine.update(16.0);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.take_new_high_score(), Some(engine.score()));
    }

    #[test]
    fn test_advance_level_keeps_score() {
        let mut engine = engine();
        engine.advance_level();
        assert_eq!(engine.state().level, 1);

        engine.start();
        let tiles: Vec<IVec2> = engine.state.maze.collectible_tiles().collect();
        for tile in &tiles {
            engine.state.maze.consume(tile.x, tile.y);
        }
        engine.state.score = 2_440;
        engine.update(16.0);
        assert_eq!(engine.phase(), GamePhase::LevelComplete);
        assert!(!engine.is_running());

        engine.advance_level();
        assert_eq!(engine.phase(), GamePhase::Ready);
        assert_eq!(engine.state().level, 2);
        assert_eq!(engine.score(), 2_440);
        assert_eq!(engine.state().dots_remaining(), 244);
    }
}
