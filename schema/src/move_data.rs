use crate::ElementType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MoveCategory {
    #[default]
    Physical,
    Special,
}

/// Secondary effect tag carried by a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MoveEffect {
    #[default]
    None,
    Poison,
}

/// Persistent status condition on a monster. At most one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum StatusCondition {
    Poison,
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusCondition::Poison => "Poison",
        };
        write!(f, "{}", display_name)
    }
}

impl MoveEffect {
    /// The status condition this effect may inflict on the defender, if any.
    pub fn inflicted_status(self) -> Option<StatusCondition> {
        match self {
            MoveEffect::None => None,
            MoveEffect::Poison => Some(StatusCondition::Poison),
        }
    }
}

fn default_accuracy() -> u8 {
    100
}

fn default_pp() -> u8 {
    20
}

/// Catalog entry for a move. Every field falls back to a neutral default
/// when omitted from the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    #[serde(rename = "type", default)]
    pub element: ElementType,
    #[serde(default)]
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u16,
    #[serde(default = "default_accuracy")]
    pub accuracy: u8,
    #[serde(default = "default_pp")]
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub effect: MoveEffect,
}

impl Default for MoveData {
    fn default() -> Self {
        Self {
            element: ElementType::Normal,
            category: MoveCategory::Physical,
            power: 0,
            accuracy: default_accuracy(),
            pp: default_pp(),
            priority: 0,
            effect: MoveEffect::None,
        }
    }
}
