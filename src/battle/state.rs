use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{Item, StatusCondition};
use serde::{Deserialize, Serialize};

/// Which side of a battle an event originated from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleType {
    Wild,
    Trainer,
}

/// Terminal state of a battle. A player with no usable monster loses even if
/// the opponent's last monster fainted on the same turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Ongoing,
    PlayerWon,
    PlayerLost,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Monster Actions
    MonsterSwitched {
        old_monster: String,
        new_monster: String,
    },
    MoveUsed {
        side: Side,
        attacker: String,
        move_name: String,
    },
    MoveMissed {
        attacker: String,
        move_name: String,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    MonsterFainted {
        target: String,
    },

    // Status Effects
    StatusApplied {
        target: String,
        status: StatusCondition,
    },
    StatusDamage {
        target: String,
        status: StatusCondition,
        damage: u16,
        remaining_hp: u16,
    },

    // Items
    ItemUsed {
        item: Item,
        target: String,
        amount: u16,
    },
    CatchSucceeded {
        target: String,
    },
    CatchFailed {
        reason: CatchFailureReason,
    },

    // Action Failures
    ActionFailed {
        reason: ActionFailureReason,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            // === Monster Action Events ===
            BattleEvent::MonsterSwitched { new_monster, .. } => {
                Some(format!("You sent out {}!", new_monster))
            }
            BattleEvent::MoveUsed {
                side,
                attacker,
                move_name,
            } => match side {
                Side::Player => Some(format!("{} used {}!", attacker, move_name)),
                Side::Opponent => Some(format!("Foe {} used {}!", attacker, move_name)),
            },
            BattleEvent::MoveMissed { .. } => Some("It missed!".to_string()),
            BattleEvent::DamageDealt { damage, .. } => {
                Some(format!("It dealt {} damage!", damage))
            }
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 => Some("It's not very effective...".to_string()),
                _ => None, // Normal effectiveness, no message
            },
            BattleEvent::MonsterFainted { target } => Some(format!("{} fainted!", target)),

            // === Status Events ===
            BattleEvent::StatusApplied { target, status } => {
                Some(format!("{} {}", target, Self::format_status_applied(status)))
            }
            BattleEvent::StatusDamage { target, status, .. } => {
                Some(format!("{} {}", target, Self::format_status_damage(status)))
            }

            // === Item Events ===
            BattleEvent::ItemUsed { item, amount, .. } => {
                Some(format!("Used {}! Restored {} HP.", item, amount))
            }
            BattleEvent::CatchSucceeded { target } => {
                Some(format!("Gotcha! {} was caught!", target))
            }
            BattleEvent::CatchFailed { reason } => Some(Self::format_catch_failure(reason)),

            // === Action Failure Events ===
            BattleEvent::ActionFailed { reason } => Some(Self::format_action_failure(reason)),
        }
    }

    // --- Private Helper Functions ---

    fn format_status_applied(status: &StatusCondition) -> &'static str {
        match status {
            StatusCondition::Poison => "was poisoned!",
        }
    }

    fn format_status_damage(status: &StatusCondition) -> &'static str {
        match status {
            StatusCondition::Poison => "is hurt by poison!",
        }
    }

    fn format_catch_failure(reason: &CatchFailureReason) -> String {
        match reason {
            CatchFailureReason::TrainerBattle => {
                "You can't capture a trainer's monster!".to_string()
            }
            CatchFailureReason::NoTargetMonster => "There is nothing to capture.".to_string(),
            CatchFailureReason::BrokeFree { .. } => "Oh no! The monster broke free!".to_string(),
        }
    }

    fn format_action_failure(reason: &ActionFailureReason) -> String {
        match reason {
            ActionFailureReason::NoActiveMonster => "There is no one left to battle!".to_string(),
            ActionFailureReason::NoSuchMove { attacker } => {
                format!("{} has no such move!", attacker)
            }
            ActionFailureReason::NoPpRemaining { move_name } => {
                format!("No PP left for {}!", move_name)
            }
            ActionFailureReason::NoMovesLeft { attacker } => {
                format!("{} has no moves left!", attacker)
            }
            ActionFailureReason::HpAlreadyFull => "HP is already full!".to_string(),
            ActionFailureReason::InvalidSwitch => "That monster can't be sent out!".to_string(),
            ActionFailureReason::NotUsableInBattle { item } => {
                format!("{} can't be used like that!", item)
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionFailureReason {
    NoActiveMonster, // Either side has nobody able to act
    NoSuchMove { attacker: String },
    NoPpRemaining { move_name: String },
    NoMovesLeft { attacker: String },
    HpAlreadyFull,
    InvalidSwitch,
    NotUsableInBattle { item: Item },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum CatchFailureReason {
    TrainerBattle,
    NoTargetMonster,
    BrokeFree { catch_probability: f64 },
}

/// Ordered collection of the events produced by one battle operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, other: EventBus) {
        self.events.extend(other.events);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Human-readable log lines, skipping silent events.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl From<Vec<BattleEvent>> for EventBus {
    fn from(events: Vec<BattleEvent>) -> Self {
        Self { events }
    }
}

impl std::fmt::Display for EventBus {
    /// Shows the debug format of every event, one per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Live(StdRng),
    Scripted { outcomes: Vec<f64>, index: usize },
}

/// The randomness source threaded through every battle and world operation.
///
/// All draws derive from a single unit-interval primitive, so a scripted
/// source in tests reads as a list of values in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_random() -> Self {
        Self {
            source: RngSource::Live(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Live(StdRng::seed_from_u64(seed)),
        }
    }

    /// Scripted source for tests. Values are consumed in order.
    ///
    /// # Panics
    /// Drawing past the end of the script panics with the reason of the draw.
    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_unit(&mut self, reason: &str) -> f64 {
        let outcome = match &mut self.source {
            RngSource::Live(rng) => rng.random::<f64>(),
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                outcome
            }
        };
        log::debug!("[RNG] Consumed {:.4} for: {}", outcome, reason);
        outcome
    }

    /// Uniform draw in `[low, high)`.
    pub fn uniform(&mut self, low: f64, high: f64, reason: &str) -> f64 {
        low + self.next_unit(reason) * (high - low)
    }

    /// Uniform integer in `[1, 100]`.
    pub fn roll_percent(&mut self, reason: &str) -> u8 {
        let roll = (self.next_unit(reason) * 100.0) as u8 + 1;
        roll.min(100)
    }

    /// Uniform integer in `[min, max]`.
    pub fn range_inclusive(&mut self, min: u8, max: u8, reason: &str) -> u8 {
        if max <= min {
            return min;
        }
        let span = (max - min) as f64 + 1.0;
        let offset = (self.next_unit(reason) * span) as u8;
        min + offset.min(max - min)
    }

    /// Uniform index into a collection of `len` elements. `len` must be non-zero.
    pub fn index(&mut self, len: usize, reason: &str) -> usize {
        let index = (self.next_unit(reason) * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }

    /// True with probability `probability`.
    pub fn chance(&mut self, probability: f64, reason: &str) -> bool {
        self.next_unit(reason) < probability
    }
}
