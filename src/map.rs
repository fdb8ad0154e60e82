use crate::errors::MapError;
use schema::TileKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const BUILTIN_OVERWORLD: &str = include_str!("../data/overworld.txt");

/// A grid coordinate. Out-of-range coordinates are valid values; the world
/// treats them as wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Position::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid position '{0}', expected \"x,y\"")]
pub struct ParsePositionError(String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePositionError(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Position::new(x, y))
    }
}

/// A parsed overworld map. Markers for the start position and trainers have
/// already been replaced by plain ground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGrid {
    pub tiles: Vec<Vec<char>>,
    pub width: usize,
    pub height: usize,
    pub start: Position,
    pub trainer_spawns: Vec<Position>,
}

impl MapGrid {
    /// Parse a character grid. Short rows are padded with wall. Without a
    /// start marker the player starts at (0,0); with several, the last wins.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let rows: Vec<Vec<char>> = text.lines().map(|line| line.chars().collect()).collect();
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut start = Position::default();
        let mut trainer_spawns = Vec::new();
        let mut tiles = Vec::with_capacity(height);

        for (y, row) in rows.into_iter().enumerate() {
            let mut parsed = Vec::with_capacity(width);
            for (x, ch) in row.into_iter().enumerate() {
                let position = Position::new(x as i32, y as i32);
                match ch {
                    TileKind::START_CHAR => {
                        start = position;
                        parsed.push(TileKind::GROUND_CHAR);
                    }
                    TileKind::TRAINER_CHAR => {
                        trainer_spawns.push(position);
                        parsed.push(TileKind::GROUND_CHAR);
                    }
                    other => parsed.push(other),
                }
            }
            parsed.resize(width, TileKind::WALL_CHAR);
            tiles.push(parsed);
        }

        Ok(MapGrid {
            tiles,
            width,
            height,
            start,
            trainer_spawns,
        })
    }

    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = fs::read_to_string(path)
            .map_err(|e| MapError::Unreadable(format!("{}: {}", path.display(), e)))?;
        log::info!("Loading map from {}", path.display());
        Self::parse(&text)
    }

    pub fn builtin() -> Result<Self, MapError> {
        Self::parse(BUILTIN_OVERWORLD)
    }
}
