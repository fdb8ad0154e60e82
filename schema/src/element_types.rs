use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub enum ElementType {
    #[default]
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Rock,
    Flying,
    Poison,
    Bug,
    Ground,
    Ice,
    Psychic,
    Fighting,
    Ghost,
    Dragon,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ElementType {
    /// Multiplier for a single attacking type against a single defending type.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective.
    /// Any pair not listed here is neutral.
    pub fn type_effectiveness(attacking: ElementType, defending: ElementType) -> f64 {
        use ElementType::*;

        match (attacking, defending) {
            // Fire
            (Fire, Grass) => 2.0,
            (Fire, Water) | (Fire, Rock) | (Fire, Fire) => 0.5,

            // Water
            (Water, Fire) | (Water, Rock) => 2.0,
            (Water, Water) | (Water, Grass) => 0.5,

            // Grass
            (Grass, Water) | (Grass, Rock) => 2.0,
            (Grass, Grass) | (Grass, Fire) | (Grass, Poison) | (Grass, Flying) => 0.5,

            // Electric
            (Electric, Water) | (Electric, Flying) => 2.0,
            (Electric, Electric) | (Electric, Grass) => 0.5,

            // Rock
            (Rock, Fire) | (Rock, Flying) => 2.0,
            (Rock, Rock) => 0.5,

            // Flying
            (Flying, Grass) => 2.0,
            (Flying, Electric) | (Flying, Rock) | (Flying, Flying) => 0.5,

            // Poison
            (Poison, Grass) => 2.0,
            (Poison, Poison) | (Poison, Rock) => 0.5,

            // Normal
            (Normal, Rock) => 0.5,

            _ => 1.0,
        }
    }

    /// Combined multiplier of an attacking type against every defending type.
    pub fn effectiveness_against(self, defending: &[ElementType]) -> f64 {
        defending
            .iter()
            .map(|&d| Self::type_effectiveness(self, d))
            .product()
    }
}
