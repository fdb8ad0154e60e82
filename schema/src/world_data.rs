use serde::{Deserialize, Serialize};

fn default_weight() -> f64 {
    1.0
}

/// One row of an area's wild-encounter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterEntry {
    pub species: String,
    pub min_level: u8,
    pub max_level: u8,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// Classification of an overworld tile character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Wall,
    Normal,
    Path,
    Water,
    Cave,
    Start,
    Center,
    Trainer,
}

impl TileKind {
    pub const WALL_CHAR: char = '#';
    pub const GROUND_CHAR: char = '.';
    pub const START_CHAR: char = 'P';
    pub const CENTER_CHAR: char = 'C';
    pub const TRAINER_CHAR: char = 'T';

    /// Classify a tile character. Unknown characters have no kind.
    pub fn from_char(ch: char) -> Option<TileKind> {
        match ch {
            '#' => Some(TileKind::Wall),
            '.' => Some(TileKind::Normal),
            '=' => Some(TileKind::Path),
            '~' => Some(TileKind::Water),
            '^' => Some(TileKind::Cave),
            'P' => Some(TileKind::Start),
            'C' => Some(TileKind::Center),
            'T' => Some(TileKind::Trainer),
            _ => None,
        }
    }

    /// Name used to look up the encounter table for this kind of tile.
    pub fn area_name(self) -> &'static str {
        match self {
            TileKind::Wall => "wall",
            TileKind::Normal => "normal",
            TileKind::Path => "path",
            TileKind::Water => "water",
            TileKind::Cave => "cave",
            TileKind::Start => "start",
            TileKind::Center => "center",
            TileKind::Trainer => "trainer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encounter_weight_defaults_to_one() {
        let entry: EncounterEntry =
            serde_json::from_str(r#"{"species": "Pebbit", "min_level": 2, "max_level": 4}"#)
                .unwrap();
        assert_eq!(entry.weight, 1.0);
    }

    #[test]
    fn test_unknown_tile_has_no_kind() {
        assert_eq!(TileKind::from_char('?'), None);
        assert_eq!(TileKind::from_char('~'), Some(TileKind::Water));
        assert_eq!(TileKind::Water.area_name(), "water");
    }
}
