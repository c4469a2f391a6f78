//! ASCII layouts and the tile grid built from them.
//!
//! Layout characters:
//!
//! | char | meaning            |
//! |------|--------------------|
//! | `@`  | wall               |
//! | ` `  | empty floor        |
//! | `P`  | agent spawn point  |
//! | `G`  | green item         |
//! | `R`  | red item           |
//! | `B`  | blue item          |

use crate::error::EnvError;
use crate::types::{Color, Position, Tile};
use std::collections::VecDeque;

/// Map used when no layout is configured.
pub const DEFAULT_LAYOUT: [&str; 8] = [
    "@@@@@@@@@@@@@@@@",
    "@P   G  R   B  @",
    "@  GG    RR  BB@",
    "@    @@@@@     @",
    "@ G  @   @  R  @",
    "@    @ B @     @",
    "@ R    G    B P@",
    "@@@@@@@@@@@@@@@@",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl GridMap {
    /// Parses an ASCII layout into a grid and its spawn points (row-major order).
    /// Spawn points become empty floor.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidLayout`] for an empty layout, ragged rows or
    /// an unknown character.
    pub fn parse<S: AsRef<str>>(layout: &[S]) -> Result<(Self, Vec<Position>), EnvError> {
        let rows = layout.len();
        let cols = layout.first().map_or(0, |r| r.as_ref().chars().count());
        if rows == 0 || cols == 0 {
            return Err(EnvError::InvalidLayout("layout is empty".into()));
        }

        let mut tiles = Vec::with_capacity(rows * cols);
        let mut spawns = Vec::new();
        for (row, line) in layout.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != cols {
                return Err(EnvError::InvalidLayout(format!(
                    "row {row} has {width} columns, expected {cols}"
                )));
            }
            for (col, c) in line.chars().enumerate() {
                let tile = match c {
                    '@' => Tile::Wall,
                    ' ' => Tile::Empty,
                    'P' => {
                        spawns.push(Position::new(row, col));
                        Tile::Empty
                    }
                    other => match Color::from_code(other) {
                        Some(color) => Tile::Item(color),
                        None => {
                            return Err(EnvError::InvalidLayout(format!(
                                "unexpected character {other:?} at row {row}, column {col}"
                            )))
                        }
                    },
                };
                tiles.push(tile);
            }
        }
        Ok((Self { rows, cols, tiles }, spawns))
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.in_bounds(pos).then(|| self.tiles[pos.row * self.cols + pos.col])
    }

    /// Overwrites a tile. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, tile: Tile) {
        if self.in_bounds(pos) {
            self.tiles[pos.row * self.cols + pos.col] = tile;
        }
    }

    /// All positions with their tiles, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &t)| (Position::new(i / self.cols, i % self.cols), t))
    }

    /// Multi-source BFS distance from every cell to the nearest source,
    /// walking only through walkable tiles. Unreachable cells are `None`.
    #[must_use]
    pub fn distance_field(&self, sources: &[Position]) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.tiles.len()];
        let mut queue = VecDeque::new();
        for &s in sources {
            if self.in_bounds(s) {
                dist[s.row * self.cols + s.col] = Some(0);
                queue.push_back(s);
            }
        }
        while let Some(pos) = queue.pop_front() {
            let d = dist[pos.row * self.cols + pos.col].unwrap_or(0);
            for next in crate::types::Action::ALL.iter().filter_map(|&a| pos.offset(a)) {
                let Some(tile) = self.get(next) else { continue };
                let idx = next.row * self.cols + next.col;
                if tile.is_walkable() && dist[idx].is_none() {
                    dist[idx] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_parses() {
        let (map, spawns) = GridMap::parse(&DEFAULT_LAYOUT).unwrap();
        assert_eq!(map.rows(), 8);
        assert_eq!(map.cols(), 16);
        assert_eq!(spawns, vec![Position::new(1, 1), Position::new(6, 14)]);
        assert_eq!(map.get(Position::new(0, 0)), Some(Tile::Wall));
        assert_eq!(map.get(Position::new(1, 5)), Some(Tile::Item(Color::Green)));
        assert_eq!(map.get(Position::new(1, 1)), Some(Tile::Empty));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = GridMap::parse(&["@@@", "@ "]).unwrap_err();
        assert!(matches!(err, EnvError::InvalidLayout(_)));
    }

    #[test]
    fn unknown_character_is_rejected() {
        let err = GridMap::parse(&["@X@"]).unwrap_err();
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn distance_field_goes_around_walls() {
        let (map, _) = GridMap::parse(&["     ", " @@@ ", "     "]).unwrap();
        let dist = map.distance_field(&[Position::new(2, 2)]);
        assert_eq!(dist[0], Some(4));
        assert_eq!(dist[map.cols() + 2], None);
    }
}
