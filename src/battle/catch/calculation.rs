use crate::battle::state::TurnRng;

pub const MIN_CATCH_PROBABILITY: f64 = 0.05;
pub const MAX_CATCH_PROBABILITY: f64 = 0.95;
const HP_FACTOR: f64 = 0.8;

/// Probability that a thrown ball catches the target.
/// Formula: clamp((1 - current_hp / max_hp) * 0.8 * ball_bonus, 0.05, 0.95)
pub fn catch_probability(current_hp: u16, max_hp: u16, ball_bonus: f64) -> f64 {
    let hp_ratio = current_hp as f64 / max_hp.max(1) as f64;
    let probability = (1.0 - hp_ratio) * HP_FACTOR * ball_bonus;
    // NaN from a nonsense bonus clamps to the floor
    if probability.is_nan() {
        return MIN_CATCH_PROBABILITY;
    }
    probability.clamp(MIN_CATCH_PROBABILITY, MAX_CATCH_PROBABILITY)
}

/// Roll for catch success. Returns true if the catch succeeds
pub fn roll_catch_success(catch_probability: f64, rng: &mut TurnRng) -> bool {
    let roll = rng.next_unit("Catch Roll");
    log::debug!("Catch roll {:.4} vs probability {:.4}", roll, catch_probability);
    roll < catch_probability
}
