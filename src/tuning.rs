//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here so a host can load
//! alternative balance from JSON without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_STEP_MS, TILE_SIZE};
use crate::{PacmanError, Result};

/// One entry of the chase/scatter wave table (durations in ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeWave {
    pub chase_ms: f64,
    pub scatter_ms: f64,
}

impl ModeWave {
    pub const fn new(chase_ms: f64, scatter_ms: f64) -> Self {
        Self {
            chase_ms,
            scatter_ms,
        }
    }
}

/// Classic arcade wave pattern; the last chase is effectively infinite
pub const DEFAULT_MODE_WAVES: [ModeWave; 4] = [
    ModeWave::new(7000.0, 20000.0),
    ModeWave::new(7000.0, 20000.0),
    ModeWave::new(5000.0, 20000.0),
    ModeWave::new(5000.0, 999_999.0),
];

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speeds (pixels per second) ===
    pub pacman_speed: f32,
    pub ghost_speed: f32,
    pub ghost_frightened_speed: f32,
    pub ghost_eaten_speed: f32,
    pub ghost_tunnel_speed: f32,

    // === Timers (ms) ===
    /// How long a power pellet keeps ghosts frightened
    pub power_pellet_duration_ms: f64,
    /// Pause between losing a life and resuming play
    pub life_lost_delay_ms: f64,

    // === Lives ===
    pub starting_lives: u8,
    pub max_lives: u8,
    /// Score that awards one extra life (0 disables)
    pub extra_life_score: u64,

    // === Ghost AI ===
    /// Chase/scatter wave table, indexed by wave
    pub mode_waves: Vec<ModeWave>,

    /// Seed for frightened-mode direction picks
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pacman_speed: 75.0,
            ghost_speed: 69.0,
            ghost_frightened_speed: 45.0,
            ghost_eaten_speed: 120.0,
            ghost_tunnel_speed: 39.0,

            power_pellet_duration_ms: 6000.0,
            life_lost_delay_ms: 2000.0,

            starting_lives: 3,
            max_lives: 5,
            extra_life_score: 10_000,

            mode_waves: DEFAULT_MODE_WAVES.to_vec(),

            seed: 0x9ac3_a11e,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.mode_waves.is_empty() {
            return Err(PacmanError::InvalidTuning("mode wave table is empty".into()));
        }
        if let Some(i) = self
            .mode_waves
            .iter()
            .position(|w| !(w.chase_ms > 0.0 && w.scatter_ms > 0.0))
        {
            return Err(PacmanError::InvalidTuning(format!(
                "wave {i} has a non-positive duration"
            )));
        }
        let speeds = [
            ("pacman_speed", self.pacman_speed),
            ("ghost_speed", self.ghost_speed),
            ("ghost_frightened_speed", self.ghost_frightened_speed),
            ("ghost_eaten_speed", self.ghost_eaten_speed),
            ("ghost_tunnel_speed", self.ghost_tunnel_speed),
        ];
        // One sub-step may not cover half a tile, or Pacman can skip a center
        let max_speed = TILE_SIZE / 2.0 / (MAX_STEP_MS as f32 / 1000.0);
        for (name, speed) in speeds {
            if !(speed > 0.0 && speed < max_speed) {
                return Err(PacmanError::InvalidTuning(format!(
                    "{name} must be in (0, {max_speed}) px/s"
                )));
            }
        }
        if !(self.power_pellet_duration_ms > 0.0) || self.life_lost_delay_ms < 0.0 {
            return Err(PacmanError::InvalidTuning("timer durations out of range".into()));
        }
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(PacmanError::InvalidTuning(format!(
                "starting_lives {} must be in 1..={}",
                self.starting_lives, self.max_lives
            )));
        }
        Ok(())
    }
}
