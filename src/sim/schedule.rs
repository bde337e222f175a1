//! Global chase/scatter wave scheduler
//!
//! One scheduler is shared by all four ghosts. Frightened and Eaten are
//! per-ghost overrides: they suspend the schedule for that ghost without
//! resetting it, and the ghost rejoins whatever phase is active when the
//! override ends.

use serde::{Deserialize, Serialize};

use super::state::GhostMode;
use crate::tuning::{DEFAULT_MODE_WAVES, ModeWave};

/// The scheduler's half of a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulePhase {
    Scatter,
    Chase,
}

impl SchedulePhase {
    pub fn mode(self) -> GhostMode {
        match self {
            SchedulePhase::Scatter => GhostMode::Scatter,
            SchedulePhase::Chase => GhostMode::Chase,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModeScheduler {
    waves: Vec<ModeWave>,
    wave: usize,
    phase: SchedulePhase,
    elapsed_ms: f64,
}

impl Default for ModeScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MODE_WAVES.to_vec())
    }
}

impl ModeScheduler {
    /// Starts at wave 0 in Scatter. An empty table falls back to the default.
    pub fn new(waves: Vec<ModeWave>) -> Self {
        let waves = if waves.is_empty() {
            DEFAULT_MODE_WAVES.to_vec()
        } else {
            waves
        };
        Self {
            waves,
            wave: 0,
            phase: SchedulePhase::Scatter,
            elapsed_ms: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.wave = 0;
        self.phase = SchedulePhase::Scatter;
        self.elapsed_ms = 0.0;
    }

    pub fn phase(&self) -> SchedulePhase {
        self.phase
    }

    pub fn wave_index(&self) -> usize {
        self.wave
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Length of the phase currently running
    pub fn phase_duration_ms(&self) -> f64 {
        let wave = &self.waves[self.wave];
        match self.phase {
            SchedulePhase::Scatter => wave.scatter_ms,
            SchedulePhase::Chase => wave.chase_ms,
        }
    }

    /// Advance the clock. Returns the new phase when it flips.
    ///
    /// The clock does not move while any ghost is frightened. Scatter to
    /// Chase keeps the wave; Chase to Scatter advances it, clamped to the
    /// last entry.
    pub fn update(&mut self, dt_ms: f64, any_frightened: bool) -> Option<SchedulePhase> {
        if any_frightened {
            return None;
        }

        self.elapsed_ms += dt_ms;
        if self.elapsed_ms < self.phase_duration_ms() {
            return None;
        }

        self.phase = match self.phase {
            SchedulePhase::Scatter => SchedulePhase::Chase,
            SchedulePhase::Chase => {
                self.wave = (self.wave + 1).min(self.waves.len() - 1);
                SchedulePhase::Scatter
            }
        };
        self.elapsed_ms = 0.0;
        Some(self.phase)
    }
}
