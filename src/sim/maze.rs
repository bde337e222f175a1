//! Maze model
//!
//! A fixed 28x31 grid of tiles. The classic layout is an immutable template;
//! each game works on its own clone so consumed dots never leak between games.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::state::Direction;
use crate::consts::{MAZE_HEIGHT, MAZE_WIDTH};
use crate::{PacmanError, Result};

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Dot,
    PowerPellet,
    GhostHouseGate,
    Tunnel,
}

impl Tile {
    /// Counts toward the level-clear condition
    pub fn is_collectible(self) -> bool {
        matches!(self, Tile::Dot | Tile::PowerPellet)
    }

    /// Character used by the ASCII layout format
    pub fn as_char(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Dot => '.',
            Tile::PowerPellet => 'o',
            Tile::GhostHouseGate => '=',
            Tile::Tunnel => 'T',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Dot),
            'o' => Some(Tile::PowerPellet),
            '=' => Some(Tile::GhostHouseGate),
            'T' => Some(Tile::Tunnel),
            _ => None,
        }
    }
}

/// Classic arcade layout (244 dots and power pellets)
pub const CLASSIC_LAYOUT: [&str; MAZE_HEIGHT] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###==### ##.######",
    "######.## #      # ##.######",
    "T     .   #      #   .     T",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Pacman's spawn tile
pub const PACMAN_START_TILE: IVec2 = IVec2::new(14, 23);

/// Where eaten ghosts head to recover
pub const GHOST_HOUSE_TILE: IVec2 = IVec2::new(14, 14);

/// Ghost spawn tiles, in personality order (Blinky, Pinky, Inky, Clyde)
pub const GHOST_START_TILES: [IVec2; 4] = [
    IVec2::new(14, 11),
    IVec2::new(14, 14),
    IVec2::new(12, 14),
    IVec2::new(16, 14),
];

/// Scatter corners, in personality order (Blinky, Pinky, Inky, Clyde)
pub const SCATTER_CORNERS: [IVec2; 4] = [
    IVec2::new(25, 0),
    IVec2::new(2, 0),
    IVec2::new(27, 30),
    IVec2::new(0, 30),
];

/// Tile grid plus collectible bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    /// Row-major tiles
    tiles: Vec<Tile>,
    total_collectibles: usize,
    remaining: usize,
}

impl Default for Maze {
    fn default() -> Self {
        Self::classic()
    }
}

impl Maze {
    /// The classic layout
    pub fn classic() -> Self {
        let tiles = CLASSIC_LAYOUT
            .iter()
            .flat_map(|row| row.chars().map(|c| Tile::from_char(c).unwrap_or(Tile::Wall)))
            .collect();
        Self::from_tiles(tiles)
    }

    /// Parse a layout in the ASCII format used by [`CLASSIC_LAYOUT`]
    pub fn parse(rows: &[&str]) -> Result<Self> {
        if rows.len() != MAZE_HEIGHT {
            return Err(PacmanError::InvalidLayout(format!(
                "expected {} rows, got {}",
                MAZE_HEIGHT,
                rows.len()
            )));
        }

        let mut tiles = Vec::with_capacity(MAZE_WIDTH * MAZE_HEIGHT);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != MAZE_WIDTH {
                return Err(PacmanError::InvalidLayout(format!(
                    "row {y}: expected {MAZE_WIDTH} columns"
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let tile = Tile::from_char(c).ok_or_else(|| {
                    PacmanError::InvalidLayout(format!("unknown tile {c:?} at ({x}, {y})"))
                })?;
                tiles.push(tile);
            }
        }

        Ok(Self::from_tiles(tiles))
    }

    fn from_tiles(tiles: Vec<Tile>) -> Self {
        let total = tiles.iter().filter(|t| t.is_collectible()).count();
        Self {
            tiles,
            total_collectibles: total,
            remaining: total,
        }
    }

    pub fn width(&self) -> usize {
        MAZE_WIDTH
    }

    pub fn height(&self) -> usize {
        MAZE_HEIGHT
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < MAZE_WIDTH && (y as usize) < MAZE_HEIGHT
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| y as usize * MAZE_WIDTH + x as usize)
    }

    /// Tile at (x, y); anything off the grid reads as a wall
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map_or(Tile::Wall, |i| self.tiles[i])
    }

    #[inline]
    pub fn tile_at(&self, tile: IVec2) -> Tile {
        self.tile(tile.x, tile.y)
    }

    /// Off-grid tiles are walls
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) == Tile::Wall
    }

    /// A horizontal step off the grid edge, starting from a tunnel tile
    pub fn is_tunnel_exit(&self, from: IVec2, dir: Direction) -> bool {
        if !dir.is_horizontal() {
            return false;
        }
        let to = from + dir.delta();
        let leaves_grid = to.x < 0 || to.x as usize >= MAZE_WIDTH;
        let row_in_range = to.y >= 0 && (to.y as usize) < MAZE_HEIGHT;
        leaves_grid && row_in_range && self.tile_at(from) == Tile::Tunnel
    }

    /// Eat the collectible at (x, y), returning what the tile held before.
    ///
    /// Non-collectible tiles are left untouched.
    pub fn consume(&mut self, x: i32, y: i32) -> Tile {
        let Some(i) = self.index(x, y) else {
            return Tile::Wall;
        };
        let before = self.tiles[i];
        if before.is_collectible() {
            self.tiles[i] = Tile::Empty;
            self.remaining -= 1;
        }
        before
    }

    pub fn remaining_collectibles(&self) -> usize {
        self.remaining
    }

    pub fn total_collectibles(&self) -> usize {
        self.total_collectibles
    }

    /// Row-major tile slice (for rendering)
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Coordinates of every tile still holding a dot or pellet
    pub fn collectible_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.tiles.iter().enumerate().filter_map(|(i, t)| {
            t.is_collectible()
                .then(|| IVec2::new((i % MAZE_WIDTH) as i32, (i / MAZE_WIDTH) as i32))
        })
    }

    /// Render back to the ASCII layout format
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(MAZE_WIDTH)
            .map(|row| row.iter().map(|t| t.as_char()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_counts() {
        let maze = Maze::classic();
        assert_eq!(maze.total_collectibles(), 244);
        assert_eq!(maze.remaining_collectibles(), 244);
        assert_eq!(maze.tiles().len(), MAZE_WIDTH * MAZE_HEIGHT);
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let maze = Maze::classic();
        assert!(maze.is_wall(-1, 5));
        assert!(maze.is_wall(28, 14));
        assert!(maze.is_wall(3, 31));
        assert!(!maze.is_wall(1, 1));
    }

    #[test]
    fn test_consume_dot_then_empty() {
        let mut maze = Maze::classic();
        assert_eq!(maze.consume(1, 1), Tile::Dot);
        assert_eq!(maze.remaining_collectibles(), 243);
        assert_eq!(maze.consume(1, 1), Tile::Empty);
        assert_eq!(maze.remaining_collectibles(), 243);
        assert_eq!(maze.consume(1, 3), Tile::PowerPellet);
        assert_eq!(maze.remaining_collectibles(), 242);
    }

    #[test]
    fn test_consume_ignores_walls_and_bounds() {
        let mut maze = Maze::classic();
        assert_eq!(maze.consume(0, 0), Tile::Wall);
        assert_eq!(maze.consume(-3, 40), Tile::Wall);
        assert_eq!(maze.remaining_collectibles(), 244);
    }

    #[test]
    fn test_copies_do_not_share_state() {
        let template = Maze::classic();
        let mut game = template.clone();
        game.consume(1, 1);
        assert_eq!(template.tile(1, 1), Tile::Dot);
        assert_eq!(template.remaining_collectibles(), 244);
    }

    #[test]
    fn test_tunnel_exit() {
        let maze = Maze::classic();
        assert!(maze.is_tunnel_exit(IVec2::new(0, 14), Direction::Left));
        assert!(maze.is_tunnel_exit(IVec2::new(27, 14), Direction::Right));
        assert!(!maze.is_tunnel_exit(IVec2::new(27, 14), Direction::Left));
        assert!(!maze.is_tunnel_exit(IVec2::new(1, 1), Direction::Left));
    }

    #[test]
    fn test_parse_round_trip_and_errors() {
        let maze = Maze::parse(&CLASSIC_LAYOUT).unwrap();
        assert_eq!(maze, Maze::classic());
        assert_eq!(maze.to_rows()[12], CLASSIC_LAYOUT[12]);

        assert!(Maze::parse(&CLASSIC_LAYOUT[..30]).is_err());
        let mut bad = CLASSIC_LAYOUT;
        bad[5] = "#.........................x#";
        assert!(matches!(Maze::parse(&bad), Err(PacmanError::InvalidLayout(_))));
    }

    #[test]
    fn test_start_tiles_are_open() {
        let maze = Maze::classic();
        assert!(!maze.is_wall(PACMAN_START_TILE.x, PACMAN_START_TILE.y));
        assert!(!maze.is_wall(GHOST_HOUSE_TILE.x, GHOST_HOUSE_TILE.y));
        for tile in GHOST_START_TILES {
            assert!(!maze.is_wall(tile.x, tile.y));
        }
    }
}
