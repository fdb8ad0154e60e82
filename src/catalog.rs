use crate::battle::calculators::generate_monster;
use crate::battle::state::TurnRng;
use crate::errors::{CatalogError, CatalogResult};
use crate::monster::Monster;
use schema::{EncounterEntry, MoveData, SpeciesData};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub type SpeciesCatalog = BTreeMap<String, SpeciesData>;
pub type MoveCatalog = BTreeMap<String, MoveData>;
pub type AreaCatalog = BTreeMap<String, Vec<EncounterEntry>>;

// Embedded reference data, used when no data directory is configured.
const BUILTIN_SPECIES: &str = include_str!("../data/species.ron");
const BUILTIN_MOVES: &str = include_str!("../data/moves.ron");
const BUILTIN_AREAS: &str = include_str!("../data/areas.ron");

/// Immutable reference data for one session: species, moves and the
/// wild-encounter tables keyed by area name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub species: SpeciesCatalog,
    pub moves: MoveCatalog,
    pub areas: AreaCatalog,
}

impl Catalog {
    /// Build and validate a catalog from parsed tables.
    pub fn new(species: SpeciesCatalog, moves: MoveCatalog, areas: AreaCatalog) -> CatalogResult<Self> {
        let catalog = Catalog {
            species,
            moves,
            areas,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn builtin() -> CatalogResult<Self> {
        Self::from_ron_strs(BUILTIN_SPECIES, BUILTIN_MOVES, BUILTIN_AREAS)
    }

    pub fn from_ron_strs(species: &str, moves: &str, areas: &str) -> CatalogResult<Self> {
        Self::new(
            parse_ron("species", species)?,
            parse_ron("moves", moves)?,
            parse_ron("areas", areas)?,
        )
    }

    pub fn from_json_strs(species: &str, moves: &str, areas: &str) -> CatalogResult<Self> {
        Self::new(
            parse_json("species", species)?,
            parse_json("moves", moves)?,
            parse_json("areas", areas)?,
        )
    }

    /// Load `species`, `moves` and `areas` from a directory. Each table may be
    /// either `<name>.ron` or `<name>.json`; RON wins when both exist.
    pub fn load_dir(dir: &Path) -> CatalogResult<Self> {
        Self::new(
            load_table(dir, "species")?,
            load_table(dir, "moves")?,
            load_table(dir, "areas")?,
        )
    }

    /// Check cross-table invariants once, at load time.
    pub fn validate(&self) -> CatalogResult<()> {
        for (name, species) in &self.species {
            if species.types.is_empty() || species.types.len() > 2 {
                return Err(CatalogError::MalformedData(format!(
                    "species '{}' must have one or two types, found {}",
                    name,
                    species.types.len()
                )));
            }
            for move_name in species.moveset.keys() {
                if !self.moves.contains_key(move_name) {
                    log::warn!("Species '{}' lists unknown move '{}'", name, move_name);
                }
            }
        }

        for (name, data) in &self.moves {
            if data.pp == 0 {
                return Err(CatalogError::MalformedData(format!(
                    "move '{}' has no PP",
                    name
                )));
            }
            if data.accuracy == 0 {
                return Err(CatalogError::MalformedData(format!(
                    "move '{}' has zero accuracy",
                    name
                )));
            }
        }

        for (area, entries) in &self.areas {
            for entry in entries {
                if !self.species.contains_key(&entry.species) {
                    return Err(CatalogError::MalformedData(format!(
                        "area '{}' references unknown species '{}'",
                        area, entry.species
                    )));
                }
                if entry.min_level == 0 || entry.min_level > entry.max_level {
                    return Err(CatalogError::MalformedData(format!(
                        "area '{}' has invalid level range {}..={} for '{}'",
                        area, entry.min_level, entry.max_level, entry.species
                    )));
                }
                if !(entry.weight >= 0.0) {
                    return Err(CatalogError::MalformedData(format!(
                        "area '{}' has a negative weight for '{}'",
                        area, entry.species
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn species_data(&self, species: &str) -> CatalogResult<&SpeciesData> {
        self.species
            .get(species)
            .ok_or_else(|| CatalogError::SpeciesNotFound(species.to_string()))
    }

    pub fn move_data(&self, name: &str) -> CatalogResult<&MoveData> {
        self.moves
            .get(name)
            .ok_or_else(|| CatalogError::MoveNotFound(name.to_string()))
    }

    pub fn encounter_table(&self, area: &str) -> Option<&[EncounterEntry]> {
        self.areas.get(area).map(Vec::as_slice)
    }

    /// Create a monster of `species` at exactly `level`.
    pub fn create_monster(&self, species: &str, level: u8) -> CatalogResult<Monster> {
        let data = self.species_data(species)?;
        Ok(Monster::new(species, level, data, &self.moves))
    }

    /// Create a monster of `species` at a random level in `min..=max`.
    pub fn generate_monster(
        &self,
        species: &str,
        min_level: u8,
        max_level: u8,
        rng: &mut TurnRng,
    ) -> CatalogResult<Monster> {
        generate_monster(self, species, min_level, max_level, rng)
    }

    /// Uniform pick over species names in sorted order.
    pub fn random_species(&self, rng: &mut TurnRng) -> CatalogResult<&str> {
        if self.species.is_empty() {
            return Err(CatalogError::MalformedData(
                "species catalog is empty".to_string(),
            ));
        }
        let index = rng.index(self.species.len(), "Random Species");
        self.species
            .keys()
            .nth(index)
            .map(String::as_str)
            .ok_or_else(|| CatalogError::MalformedData("species index out of range".to_string()))
    }
}

fn parse_ron<T: DeserializeOwned>(table: &str, text: &str) -> CatalogResult<T> {
    ron::from_str(text).map_err(|e| CatalogError::Parse(format!("{}: {}", table, e)))
}

fn parse_json<T: DeserializeOwned>(table: &str, text: &str) -> CatalogResult<T> {
    serde_json::from_str(text).map_err(|e| CatalogError::Parse(format!("{}: {}", table, e)))
}

fn load_table<T: DeserializeOwned>(dir: &Path, table: &str) -> CatalogResult<T> {
    let ron_path = dir.join(format!("{}.ron", table));
    let json_path = dir.join(format!("{}.json", table));

    let (path, is_ron) = if ron_path.exists() {
        (ron_path, true)
    } else if json_path.exists() {
        (json_path, false)
    } else {
        return Err(CatalogError::Parse(format!(
            "no {}.ron or {}.json in {}",
            table,
            table,
            dir.display()
        )));
    };

    let text = fs::read_to_string(&path)
        .map_err(|e| CatalogError::Parse(format!("{}: {}", path.display(), e)))?;
    log::info!("Loading {} from {}", table, path.display());
    if is_ron {
        parse_ron(table, &text)
    } else {
        parse_json(table, &text)
    }
}
