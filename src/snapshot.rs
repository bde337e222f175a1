//! Read-only views of the game for the presentation layer
//!
//! Snapshots are owned copies; nothing a renderer does to one can reach the
//! simulation.

use serde::Serialize;

use crate::Result;
use crate::sim::{GamePhase, GameState, Ghost, GhostMode, Pacman, Personality, Tile};

/// Numbers for the heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudState {
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    pub level: u32,
    pub phase: GamePhase,
    pub fps: u32,
    pub dots_remaining: usize,
}

impl HudState {
    pub fn capture(state: &GameState, fps: u32) -> Self {
        Self {
            score: state.score,
            high_score: state.high_score,
            lives: state.pacman.lives,
            level: state.level,
            phase: state.phase,
            fps,
            dots_remaining: state.dots_remaining(),
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Row-major, `maze_width` x `maze_height`
    pub tiles: Vec<Tile>,
    pub maze_width: usize,
    pub maze_height: usize,
    pub pacman: Pacman,
    /// Blinky, Pinky, Inky, Clyde
    pub ghosts: [Ghost; 4],
    pub hud: HudState,
    pub time_ms: f64,
}

impl Snapshot {
    pub fn capture(state: &GameState, fps: u32) -> Self {
        Self {
            tiles: state.maze.tiles().to_vec(),
            maze_width: state.maze.width(),
            maze_height: state.maze.height(),
            pacman: state.pacman.clone(),
            ghosts: state.ghosts.clone(),
            hud: HudState::capture(state, fps),
            time_ms: state.time_ms,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Text rendering: `@` is Pacman, ghosts by initial (`f` frightened,
    /// `"` eyes heading home)
    pub fn render_ascii(&self) -> String {
        let mut grid: Vec<Vec<char>> = self
            .tiles
            .chunks(self.maze_width)
            .map(|row| row.iter().map(|t| t.as_char()).collect())
            .collect();

        let mut plot = |x: i32, y: i32, c: char| {
            // Off-grid while wrapping through the tunnel
            if x < 0 || y < 0 {
                return;
            }
            if let Some(cell) = grid
                .get_mut(y as usize)
                .and_then(|row| row.get_mut(x as usize))
            {
                *cell = c;
            }
        };

        for ghost in &self.ghosts {
            let tile = ghost.position.tile();
            let c = match ghost.mode {
                GhostMode::Frightened => 'f',
                GhostMode::Eaten => '"',
                GhostMode::Chase | GhostMode::Scatter => match ghost.personality {
                    Personality::Blinky => 'B',
                    Personality::Pinky => 'P',
                    Personality::Inky => 'I',
                    Personality::Clyde => 'C',
                },
            };
            plot(tile.x, tile.y, c);
        }
        let tile = self.pacman.position.tile();
        plot(tile.x, tile.y, '@');

        let mut out = String::with_capacity(self.maze_height * (self.maze_width + 1));
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAZE_HEIGHT, MAZE_WIDTH};
    use crate::sim::Maze;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_copies_state() {
        let mut state = GameState::new(&Maze::classic(), Tuning::default(), 700);
        let snapshot = Snapshot::capture(&state, 60);
        state.maze.consume(1, 1);

        assert_eq!(snapshot.tiles[MAZE_WIDTH + 1], Tile::Dot);
        assert_eq!(snapshot.hud.lives, 3);
        assert_eq!(snapshot.hud.high_score, 700);
        assert_eq!(snapshot.hud.dots_remaining, 244);
        assert_eq!(snapshot.hud.phase, GamePhase::Ready);
    }

    #[test]
    fn test_ascii_marks_entities() {
        let state = GameState::new(&Maze::classic(), Tuning::default(), 0);
        let text = Snapshot::capture(&state, 0).render_ascii();
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), MAZE_HEIGHT);
        assert_eq!(rows[23].chars().nth(14), Some('@'));
        assert_eq!(rows[11].chars().nth(14), Some('B'));
        assert_eq!(rows[14].chars().nth(16), Some('C'));
    }

    #[test]
    fn test_json_has_hud() {
        let state = GameState::new(&Maze::classic(), Tuning::default(), 0);
        let json = Snapshot::capture(&state, 30).to_json().unwrap();
        assert!(json.contains("\"fps\":30"));
        assert!(json.contains("\"phase\":\"Ready\""));
    }
}
