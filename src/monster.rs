use crate::battle::calculators::calculate_stats;
use crate::battle::state::BattleEvent;
use crate::catalog::MoveCatalog;
use crate::moves::{Move, MoveSnapshot};
use schema::{BaseStats, ElementType, SpeciesData, StatusCondition, Stats};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_MOVES: usize = 4;

fn full_hp() -> u16 {
    u16::MAX
}

/// Persisted form of a monster. Fields missing from older saves fall back to
/// a freshly constructed monster's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    pub species: String,
    pub level: u8,
    #[serde(default = "full_hp")]
    pub current_hp: u16,
    #[serde(default)]
    pub status: Option<StatusCondition>,
    #[serde(default)]
    pub moves: Vec<MoveSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Monster {
    pub species: String,
    pub level: u8,
    pub types: Vec<ElementType>,
    pub base_stats: BaseStats,
    pub stats: Stats,
    current_hp: u16,
    pub status: Option<StatusCondition>,
    pub moves: Vec<Move>,
}

impl Monster {
    /// Create a new monster at full health from its catalog entry.
    ///
    /// The loadout is the species' moves learned at or below `level`, earliest
    /// first, capped at four. Moves missing from `move_catalog` are skipped.
    pub fn new(
        species: impl Into<String>,
        level: u8,
        species_data: &SpeciesData,
        move_catalog: &MoveCatalog,
    ) -> Self {
        let species = species.into();
        let stats = calculate_stats(&species_data.base_stats, level);

        let moves: Vec<Move> = species_data
            .moves_known_at(level)
            .into_iter()
            .filter_map(|name| match move_catalog.get(name) {
                Some(data) => Some(Move::new(name, data.clone())),
                None => {
                    log::warn!("{} knows unknown move '{}', skipping", species, name);
                    None
                }
            })
            .take(MAX_MOVES)
            .collect();

        Monster {
            species,
            level,
            types: species_data.types.clone(),
            base_stats: species_data.base_stats,
            current_hp: stats.hp,
            stats,
            status: None,
            moves,
        }
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    /// Set current HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
    }

    /// Subtract damage, flooring at 0. Returns true if this caused fainting.
    pub fn take_damage(&mut self, damage: u16) -> bool {
        let was_fainted = self.is_fainted();
        self.current_hp = self.current_hp.saturating_sub(damage);
        !was_fainted && self.is_fainted()
    }

    /// Restore up to `amount` HP. Returns the HP actually restored.
    pub fn restore_hp(&mut self, amount: u16) -> u16 {
        let missing = self.max_hp() - self.current_hp;
        let restored = amount.min(missing);
        self.current_hp += restored;
        restored
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Full HP, no status, every move back to max PP.
    pub fn heal(&mut self) {
        self.current_hp = self.max_hp();
        self.status = None;
        for mv in &mut self.moves {
            mv.restore_pp();
        }
    }

    /// Bounds-checked access into the loadout.
    pub fn select_move(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    pub fn select_move_mut(&mut self, index: usize) -> Option<&mut Move> {
        self.moves.get_mut(index)
    }

    /// End-of-turn status tick.
    pub fn apply_status_effects(&mut self) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        match self.status {
            Some(StatusCondition::Poison) => {
                let damage = (self.max_hp() / 8).max(1);
                let fainted = self.take_damage(damage);
                events.push(BattleEvent::StatusDamage {
                    target: self.species.clone(),
                    status: StatusCondition::Poison,
                    damage,
                    remaining_hp: self.current_hp,
                });
                if fainted {
                    events.push(BattleEvent::MonsterFainted {
                        target: self.species.clone(),
                    });
                }
            }
            None => {}
        }
        events
    }

    pub fn snapshot(&self) -> MonsterSnapshot {
        MonsterSnapshot {
            species: self.species.clone(),
            level: self.level,
            current_hp: self.current_hp,
            status: self.status,
            moves: self.moves.iter().map(Move::snapshot).collect(),
        }
    }

    /// Rebuild from a snapshot. HP and PP are clamped to their maxima; saved
    /// moves the rebuilt monster doesn't know are ignored.
    pub fn from_snapshot(
        snapshot: &MonsterSnapshot,
        species_data: &SpeciesData,
        move_catalog: &MoveCatalog,
    ) -> Self {
        let mut monster = Monster::new(
            snapshot.species.clone(),
            snapshot.level,
            species_data,
            move_catalog,
        );
        monster.set_hp(snapshot.current_hp);
        monster.status = snapshot.status;
        for saved in &snapshot.moves {
            match monster.moves.iter_mut().find(|mv| mv.name == saved.name) {
                Some(mv) => mv.set_current_pp(saved.current_pp),
                None => log::warn!(
                    "Saved move '{}' is not known by {}, ignoring",
                    saved.name,
                    monster.species
                ),
            }
        }
        monster
    }
}

impl fmt::Display for Monster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Lv{} HP {}/{}",
            self.species,
            self.level,
            self.current_hp,
            self.max_hp()
        )?;
        if let Some(status) = self.status {
            write!(f, " [{}]", status)?;
        }
        Ok(())
    }
}
