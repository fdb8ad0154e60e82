use crate::battle::state::TurnRng;
use schema::MoveData;
use serde::{Deserialize, Serialize};

/// Persisted form of a move: its catalog name and remaining PP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSnapshot {
    pub name: String,
    pub current_pp: u8,
}

/// A move known by one monster. The catalog record is copied in at
/// construction; only the PP counter changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub name: String,
    pub data: MoveData,
    current_pp: u8,
}

impl Move {
    /// Create a new move with full PP
    pub fn new(name: impl Into<String>, data: MoveData) -> Self {
        Move {
            name: name.into(),
            current_pp: data.pp,
            data,
        }
    }

    pub fn max_pp(&self) -> u8 {
        self.data.pp
    }

    pub fn current_pp(&self) -> u8 {
        self.current_pp
    }

    /// Roll for accuracy. Moves with accuracy 100 or more never draw.
    pub fn hit(&self, rng: &mut TurnRng) -> bool {
        if self.data.accuracy >= 100 {
            return true;
        }
        let roll = rng.roll_percent("Accuracy Check");
        let hit = roll <= self.data.accuracy;
        log::debug!(
            "{} accuracy roll {} vs {}: {}",
            self.name,
            roll,
            self.data.accuracy,
            if hit { "hit" } else { "miss" }
        );
        hit
    }

    /// Use the move (decrease PP). Returns false and leaves PP untouched when empty.
    pub fn use_pp(&mut self) -> bool {
        if self.current_pp > 0 {
            self.current_pp -= 1;
            true
        } else {
            false
        }
    }

    /// Restore PP to max
    pub fn restore_pp(&mut self) {
        self.current_pp = self.max_pp();
    }

    /// Overwrite PP from saved data, clamped to max.
    pub fn set_current_pp(&mut self, pp: u8) {
        self.current_pp = pp.min(self.max_pp());
    }

    pub fn snapshot(&self) -> MoveSnapshot {
        MoveSnapshot {
            name: self.name.clone(),
            current_pp: self.current_pp,
        }
    }
}
