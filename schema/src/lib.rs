// Dunkemon Schema - Shared reference-data definitions
// This crate contains the catalog records (species, moves, encounter tables)
// and the small static enums that both the core crate and its data files
// agree on. Everything here is plain serde data with no game state.

// Re-export the main types
pub use element_types::*;
pub use move_data::*;
pub use species_data::*;
pub use world_data::*;

pub mod element_types;
pub mod move_data;
pub mod species_data;
pub mod world_data;
