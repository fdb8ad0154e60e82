use crate::battle::engine::{shared_party, Battle};
use crate::battle::state::{BattleType, TurnRng};
use crate::catalog::Catalog;
use crate::monster::Monster;
use crate::moves::Move;
use schema::StatusCondition;

// Flat 50 base stats everywhere so damage numbers stay easy to check by hand.
const TEST_SPECIES: &str = r#"{
    "Ignis": (
        types: [Fire],
        base_stats: (hp: 50, attack: 50, defense: 50, sp_atk: 50, sp_def: 50, speed: 50),
        moveset: {"Tackle": 1, "Ember": 1, "Toxin": 8, "WildSwing": 10},
    ),
    "Sprig": (
        types: [Grass],
        base_stats: (hp: 50, attack: 50, defense: 50, sp_atk: 50, sp_def: 50, speed: 50),
        moveset: {"Tackle": 1, "VineLash": 1},
    ),
    "Pebbit": (
        types: [Rock, Ground],
        base_stats: (hp: 50, attack: 50, defense: 50, sp_atk: 50, sp_def: 50, speed: 50),
        moveset: {"Tackle": 1},
    ),
    "Aquill": (
        types: [Water],
        base_stats: (hp: 50, attack: 50, defense: 50, sp_atk: 50, sp_def: 50, speed: 50),
        moveset: {"Tackle": 1, "Splash": 1},
    ),
}"#;

const TEST_MOVES: &str = r#"{
    "Tackle": (type: Normal, category: Physical, power: 40, accuracy: 100, pp: 35),
    "Slam": (type: Normal, category: Physical, power: 100, accuracy: 100, pp: 10),
    "Ember": (type: Fire, category: Special, power: 40, accuracy: 100, pp: 25),
    "VineLash": (type: Grass, category: Physical, power: 45, accuracy: 100, pp: 25),
    "Toxin": (type: Poison, category: Physical, power: 15, accuracy: 100, pp: 10, effect: Poison),
    "WildSwing": (type: Normal, category: Physical, power: 80, accuracy: 70, pp: 5),
    "Splash": (power: 0, pp: 40),
}"#;

const TEST_AREAS: &str = r#"{
    "normal": [
        (species: "Pebbit", min_level: 2, max_level: 4, weight: 3.0),
        (species: "Sprig", min_level: 2, max_level: 3),
    ],
    "water": [
        (species: "Aquill", min_level: 3, max_level: 5),
    ],
}"#;

/// A small, fixed catalog for tests.
pub fn test_catalog() -> Catalog {
    match Catalog::from_ron_strs(TEST_SPECIES, TEST_MOVES, TEST_AREAS) {
        Ok(catalog) => catalog,
        Err(err) => panic!("Test catalog failed to load: {}", err),
    }
}

/// A builder for creating test monsters with common defaults.
///
/// # Example
/// ```ignore
/// let monster = TestMonsterBuilder::new("Ignis", 50)
///     .with_moves(vec!["Slam"])
///     .with_status(StatusCondition::Poison)
///     .build();
/// ```
pub struct TestMonsterBuilder {
    species: String,
    level: u8,
    moves: Option<Vec<String>>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
}

impl TestMonsterBuilder {
    /// Creates a new builder for a given species and level.
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            species: species.to_string(),
            level,
            moves: None,
            status: None,
            current_hp: None,
        }
    }

    /// Replaces the level-gated loadout with these catalog moves.
    pub fn with_moves(mut self, moves: Vec<&str>) -> Self {
        self.moves = Some(moves.into_iter().map(str::to_string).collect());
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> Monster {
        let catalog = test_catalog();
        let mut monster = match catalog.create_monster(&self.species, self.level) {
            Ok(monster) => monster,
            Err(err) => panic!("Failed to build {}: {}", self.species, err),
        };

        if let Some(moves) = self.moves {
            monster.moves = moves
                .iter()
                .map(|name| match catalog.move_data(name) {
                    Ok(data) => Move::new(name.clone(), data.clone()),
                    Err(err) => panic!("Bad test move: {}", err),
                })
                .collect();
        }
        monster.status = self.status;
        if let Some(hp) = self.current_hp {
            monster.set_hp(hp);
        }
        monster
    }
}

/// A battle over two fresh party lists.
pub fn create_test_battle(player: Vec<Monster>, opponent: Vec<Monster>, battle_type: BattleType) -> Battle {
    Battle::new(shared_party(player), shared_party(opponent), battle_type)
}

/// Generous buffer of mid-range draws for tests where outcomes don't matter.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![0.5; 100])
}
