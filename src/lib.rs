//! Dunkemon
//!
//! A small turn-based monster battle game: an overworld grid with wild
//! encounters, trainers and healing centers, one-on-one battles with typed
//! moves and poison, capturing, and local or online saves.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod game_interface;
pub mod map;
pub mod monster;
pub mod moves;
pub mod save;
pub mod world;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, ElementType, EncounterEntry, Item, MoveCategory, MoveData, MoveEffect,
    SpeciesData, Stats, StatusCondition, TileKind,
};

// --- From this crate's modules (`src/`) ---
pub use battle::engine::{shared_party, Battle, SharedParty};
pub use battle::state::{BattleEvent, BattleOutcome, BattleType, EventBus, TurnRng};
pub use battle::turn_orchestrator::{Direction, GameSession, Mode};
pub use catalog::Catalog;
pub use config::{GameConfig, RemoteConfig};
pub use map::{MapGrid, Position};
pub use monster::{Monster, MonsterSnapshot};
pub use moves::Move;
pub use save::{FallbackSaveStore, HttpSaveStore, LocalSaveStore, SaveData, SaveStore};
pub use world::{MoveEvent, Trainer, World};

// Crate-specific error and result types.
pub use errors::{
    CatalogError, CatalogResult, GameError, GameResult, MapError, SaveError, SaveResult,
};
