use crate::battle::calculators::weighted_choice;
use crate::battle::engine::{shared_party, SharedParty};
use crate::battle::state::TurnRng;
use crate::catalog::Catalog;
use crate::errors::{CatalogResult, SaveError, SaveResult};
use crate::map::{MapGrid, Position};
use crate::monster::Monster;
use crate::save::SaveData;
use schema::{Item, TileKind};
use std::collections::BTreeMap;
use std::rc::Rc;

pub const ENCOUNTER_CHANCE: f64 = 0.10;
pub const TRAINER_PARTY_SIZE: usize = 2;
pub const TRAINER_MIN_LEVEL: u8 = 3;
pub const TRAINER_MAX_LEVEL: u8 = 6;
const DEFAULT_AREA: &str = "normal";

/// An NPC standing on a fixed tile with a party generated at map load.
#[derive(Debug, Clone)]
pub struct Trainer {
    pub position: Position,
    pub party: SharedParty,
    pub defeated: bool,
}

/// What happened when the player stepped onto a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEvent {
    Nothing,
    Healed,
    /// An undefeated trainer stands at this position.
    TrainerChallenge(Position),
}

#[derive(Debug, Clone)]
pub struct World {
    tiles: Vec<Vec<char>>,
    pub width: usize,
    pub height: usize,
    pub player_pos: Position,
    pub player_party: SharedParty,
    pub items: BTreeMap<String, u32>,
    pub trainers: BTreeMap<Position, Trainer>,
    catalog: Rc<Catalog>,
}

impl World {
    /// Build the world from a parsed map, generating every trainer's party.
    /// The player starts with an empty party and no items.
    pub fn from_map(grid: MapGrid, catalog: Rc<Catalog>, rng: &mut TurnRng) -> CatalogResult<Self> {
        let mut trainers = BTreeMap::new();
        for position in &grid.trainer_spawns {
            let mut party = Vec::with_capacity(TRAINER_PARTY_SIZE);
            for _ in 0..TRAINER_PARTY_SIZE {
                let species = catalog.random_species(rng)?;
                party.push(catalog.generate_monster(
                    species,
                    TRAINER_MIN_LEVEL,
                    TRAINER_MAX_LEVEL,
                    rng,
                )?);
            }
            log::debug!("Trainer at {} has {} monsters", position, party.len());
            trainers.insert(
                *position,
                Trainer {
                    position: *position,
                    party: shared_party(party),
                    defeated: false,
                },
            );
        }

        Ok(World {
            tiles: grid.tiles,
            width: grid.width,
            height: grid.height,
            player_pos: grid.start,
            player_party: shared_party(Vec::new()),
            items: BTreeMap::new(),
            trainers,
            catalog,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn cell(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Tile character at (x, y); wall outside the map.
    pub fn tile(&self, x: i32, y: i32) -> char {
        match self.cell(x, y) {
            Some((x, y)) => self.tiles[y][x],
            None => TileKind::WALL_CHAR,
        }
    }

    /// Overwrite a tile. Out-of-range coordinates are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, ch: char) {
        if let Some((x, y)) = self.cell(x, y) {
            self.tiles[y][x] = ch;
        }
    }

    /// Unknown tile characters block movement.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        !matches!(TileKind::from_char(self.tile(x, y)), Some(TileKind::Wall) | None)
    }

    /// Encounter-table key for a tile character. Unknown characters and
    /// tile kinds without a table of their own use the "normal" table.
    pub fn area_key(&self, tile: char) -> &'static str {
        let kind = TileKind::from_char(tile).map_or(DEFAULT_AREA, TileKind::area_name);
        if self.catalog.areas.contains_key(kind) {
            kind
        } else {
            DEFAULT_AREA
        }
    }

    /// Roll for a wild encounter on the player's current tile.
    ///
    /// Draws nothing when the area has no encounter table.
    pub fn maybe_trigger_encounter(&self, rng: &mut TurnRng) -> CatalogResult<Option<Monster>> {
        let key = self.area_key(self.tile(self.player_pos.x, self.player_pos.y));
        let Some(table) = self.catalog.encounter_table(key) else {
            return Ok(None);
        };
        if !rng.chance(ENCOUNTER_CHANCE, "Encounter Check") {
            return Ok(None);
        }
        let Some(entry) = weighted_choice(table, rng) else {
            return Ok(None);
        };
        log::debug!("Encounter in '{}': {}", key, entry.species);
        let monster = self
            .catalog
            .generate_monster(&entry.species, entry.min_level, entry.max_level, rng)?;
        Ok(Some(monster))
    }

    /// Try to move one step. Blocked moves change nothing.
    pub fn move_player(&mut self, dx: i32, dy: i32) -> MoveEvent {
        let target = self.player_pos.offset(dx, dy);
        if !self.is_walkable(target.x, target.y) {
            return MoveEvent::Nothing;
        }
        self.player_pos = target;

        if TileKind::from_char(self.tile(target.x, target.y)) == Some(TileKind::Center) {
            self.heal_party();
            return MoveEvent::Healed;
        }
        match self.trainers.get(&target) {
            Some(trainer) if !trainer.defeated => MoveEvent::TrainerChallenge(target),
            _ => MoveEvent::Nothing,
        }
    }

    pub fn heal_party(&self) {
        for monster in self.player_party.borrow_mut().iter_mut() {
            monster.heal();
        }
    }

    pub fn trainer_party(&self, position: Position) -> Option<SharedParty> {
        self.trainers.get(&position).map(|trainer| Rc::clone(&trainer.party))
    }

    /// Mark a trainer defeated and clear its tile. Returns false if there is
    /// no trainer at `position`.
    pub fn remove_trainer(&mut self, position: Position) -> bool {
        let Some(trainer) = self.trainers.get_mut(&position) else {
            return false;
        };
        trainer.defeated = true;
        log::info!("Trainer at {} defeated", position);
        self.set_tile(position.x, position.y, TileKind::GROUND_CHAR);
        true
    }

    pub fn item_count(&self, item: Item) -> u32 {
        self.items.get(<&'static str>::from(item)).copied().unwrap_or(0)
    }

    pub fn add_item(&mut self, item: Item, count: u32) {
        *self.items.entry(item.to_string()).or_insert(0) += count;
    }

    /// Consume one of `item`. Returns false if none are left.
    pub fn take_item(&mut self, item: Item) -> bool {
        match self.items.get_mut(<&'static str>::from(item)) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> SaveData {
        SaveData {
            player_pos: Some([self.player_pos.x, self.player_pos.y]),
            player_party: Some(
                self.player_party
                    .borrow()
                    .iter()
                    .map(Monster::snapshot)
                    .collect(),
            ),
            items: Some(self.items.clone()),
            trainers: Some(
                self.trainers
                    .iter()
                    .map(|(position, trainer)| (position.to_string(), trainer.defeated))
                    .collect(),
            ),
        }
    }

    /// Apply a save on top of the current world.
    ///
    /// The party is rebuilt in full before anything is touched, so an unknown
    /// species leaves the world exactly as it was. The party list is refilled
    /// in place, keeping any outstanding handles to it valid.
    pub fn restore(&mut self, data: &SaveData) -> SaveResult<()> {
        if let Some([x, y]) = data.player_pos {
            if self.cell(x, y).is_none() {
                return Err(SaveError::MalformedData(format!(
                    "player position {},{} is outside the {}x{} map",
                    x, y, self.width, self.height
                )));
            }
        }
        let party = match &data.player_party {
            Some(snapshots) => {
                let mut party = Vec::with_capacity(snapshots.len());
                for snapshot in snapshots {
                    let species = self.catalog.species_data(&snapshot.species).map_err(|e| {
                        SaveError::MalformedData(format!("party member: {}", e))
                    })?;
                    party.push(Monster::from_snapshot(snapshot, species, &self.catalog.moves));
                }
                Some(party)
            }
            None => None,
        };

        if let Some([x, y]) = data.player_pos {
            self.player_pos = Position::new(x, y);
        }
        if let Some(party) = party {
            *self.player_party.borrow_mut() = party;
        }
        if let Some(items) = &data.items {
            self.items = items.clone();
        }
        if let Some(flags) = &data.trainers {
            for (key, defeated) in flags {
                let position = match key.parse::<Position>() {
                    Ok(position) => position,
                    Err(e) => {
                        log::warn!("Skipping trainer entry: {}", e);
                        continue;
                    }
                };
                if let Some(trainer) = self.trainers.get_mut(&position) {
                    trainer.defeated = *defeated;
                }
            }
        }
        log::info!("Restored world at {}", self.player_pos);
        Ok(())
    }
}
