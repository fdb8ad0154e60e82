use crate::ElementType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Bag items the player can carry. Persisted by their display name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Item {
    Potion,
    NetBall,
}

impl Item {
    /// HP restored when used in battle.
    pub fn heal_amount(self) -> Option<u16> {
        match self {
            Item::Potion => Some(20),
            Item::NetBall => None,
        }
    }

    /// Capture bonus applied when thrown.
    pub fn ball_bonus(self) -> Option<f64> {
        match self {
            Item::Potion => None,
            Item::NetBall => Some(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_atk: u16,
    pub sp_def: u16,
    pub speed: u16,
}

/// Level-scaled stats of a monster, derived from its species' `BaseStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_atk: u16,
    pub sp_def: u16,
    pub speed: u16,
}

/// Catalog entry for a species.
///
/// `moveset` maps move name to the level it is learned at. Entry order is the
/// order in the data file, which breaks ties between moves learned at the same
/// level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub types: Vec<ElementType>,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub moveset: IndexMap<String, u8>,
}

impl SpeciesData {
    /// Moves known at `level`, ordered by ascending learn level.
    pub fn moves_known_at(&self, level: u8) -> Vec<&str> {
        let mut learned: Vec<(&str, u8)> = self
            .moveset
            .iter()
            .filter(|&(_, &learn_level)| learn_level <= level)
            .map(|(name, &learn_level)| (name.as_str(), learn_level))
            .collect();
        // Stable sort keeps data-file order for equal levels.
        learned.sort_by_key(|&(_, learn_level)| learn_level);
        learned.into_iter().map(|(name, _)| name).collect()
    }
}
