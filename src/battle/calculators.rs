use crate::battle::state::TurnRng;
use crate::catalog::Catalog;
use crate::errors::CatalogResult;
use crate::monster::Monster;
use crate::moves::Move;
use schema::{BaseStats, ElementType, EncounterEntry, MoveCategory, Stats};

pub const STAB_MULTIPLIER: f64 = 1.5;
pub const MIN_RANDOM_FACTOR: f64 = 0.85;
pub const MAX_RANDOM_FACTOR: f64 = 1.0;

/// Derive level-scaled stats from a base-stat table.
///
/// HP = ⌊2·base·level/100⌋ + level + 10, others = ⌊2·base·level/100⌋ + 5.
pub fn calculate_stats(base: &BaseStats, level: u8) -> Stats {
    let level = level as u32;
    let scaled = |base_stat: u16| (2 * base_stat as u32 * level) / 100;
    let other = |base_stat: u16| clamp_stat(scaled(base_stat) + 5);

    Stats {
        hp: clamp_stat(scaled(base.hp) + level + 10),
        attack: other(base.attack),
        defense: other(base.defense),
        sp_atk: other(base.sp_atk),
        sp_def: other(base.sp_def),
        speed: other(base.speed),
    }
}

fn clamp_stat(value: u32) -> u16 {
    value.min(u16::MAX as u32) as u16
}

/// Multiplier for `attacking` against every type in `defending`.
pub fn type_effectiveness(attacking: ElementType, defending: &[ElementType]) -> f64 {
    attacking.effectiveness_against(defending)
}

/// Anything that can be drawn by `weighted_choice`.
pub trait Weighted {
    fn weight(&self) -> f64;
}

impl Weighted for EncounterEntry {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Draw `r` uniformly in `[0, total)` and return the first option whose
/// running weight reaches `r`. Falls back to the last option. Returns None
/// only for an empty slice, without drawing.
pub fn weighted_choice<'a, T: Weighted>(options: &'a [T], rng: &mut TurnRng) -> Option<&'a T> {
    let last = options.last()?;
    let total: f64 = options.iter().map(Weighted::weight).sum();
    let draw = rng.uniform(0.0, total, "Weighted Choice");

    let mut running = 0.0;
    for option in options {
        running += option.weight();
        if running >= draw {
            return Some(option);
        }
    }
    Some(last)
}

/// Damage before STAB, effectiveness and the random factor, in real arithmetic.
pub fn base_damage(attacker: &Monster, defender: &Monster, move_used: &Move) -> f64 {
    let (attack, defense) = match move_used.data.category {
        MoveCategory::Physical => (attacker.stats.attack, defender.stats.defense),
        MoveCategory::Special => (attacker.stats.sp_atk, defender.stats.sp_def),
    };
    let level = attacker.level as f64;
    let power = move_used.data.power as f64;
    let ratio = attack as f64 / defense.max(1) as f64;

    ((2.0 * level / 5.0 + 2.0) * power * ratio / 50.0) + 2.0
}

pub fn stab_multiplier(attacker: &Monster, move_used: &Move) -> f64 {
    if attacker.types.contains(&move_used.data.element) {
        STAB_MULTIPLIER
    } else {
        1.0
    }
}

/// Final damage for a known random factor. Never less than 1.
pub fn damage_with_factor(
    attacker: &Monster,
    defender: &Monster,
    move_used: &Move,
    random_factor: f64,
) -> u16 {
    let effectiveness = type_effectiveness(move_used.data.element, &defender.types);
    let raw = base_damage(attacker, defender, move_used)
        * stab_multiplier(attacker, move_used)
        * effectiveness
        * random_factor;
    let damage = raw.floor().clamp(1.0, u16::MAX as f64) as u16;
    log::debug!(
        "{} -> {} with {}: raw {:.2}, effectiveness {}, factor {:.3}, damage {}",
        attacker.species,
        defender.species,
        move_used.name,
        raw,
        effectiveness,
        random_factor,
        damage
    );
    damage
}

/// Final damage with a random factor drawn from `[0.85, 1.0)`.
pub fn calculate_damage(
    attacker: &Monster,
    defender: &Monster,
    move_used: &Move,
    rng: &mut TurnRng,
) -> u16 {
    let factor = rng.uniform(MIN_RANDOM_FACTOR, MAX_RANDOM_FACTOR, "Damage Random Factor");
    damage_with_factor(attacker, defender, move_used, factor)
}

/// Generate a monster of `species` at a uniformly random level in `min..=max`.
pub fn generate_monster(
    catalog: &Catalog,
    species: &str,
    min_level: u8,
    max_level: u8,
    rng: &mut TurnRng,
) -> CatalogResult<Monster> {
    let data = catalog.species_data(species)?;
    let level = rng.range_inclusive(min_level, max_level, "Monster Level");
    Ok(Monster::new(species, level, data, &catalog.moves))
}
