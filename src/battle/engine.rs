use crate::battle::calculators::{calculate_damage, type_effectiveness};
use crate::battle::catch::{can_attempt_catch, catch_probability, roll_catch_success};
use crate::battle::state::{
    ActionFailureReason, BattleEvent, BattleOutcome, BattleType, CatchFailureReason, EventBus,
    Side, TurnRng,
};
use crate::monster::Monster;
use schema::Item;
use std::cell::RefCell;
use std::rc::Rc;

/// Chance that a move with a status effect inflicts it on a hit.
pub const SECONDARY_EFFECT_CHANCE: f64 = 0.30;

/// A party list shared between the world and the battle it is fighting in.
/// Captures append to it and switches reorder it in place.
pub type SharedParty = Rc<RefCell<Vec<Monster>>>;

pub fn shared_party(monsters: Vec<Monster>) -> SharedParty {
    Rc::new(RefCell::new(monsters))
}

/// Index of the first monster still standing.
pub fn active_index(party: &[Monster]) -> Option<usize> {
    party.iter().position(|monster| !monster.is_fainted())
}

/// One encounter between the player's party and an opponent's party.
///
/// Both parties are live handles: every mutation is visible to their owners
/// as soon as the operation returns. The two handles must be distinct lists.
#[derive(Debug, Clone)]
pub struct Battle {
    pub player_party: SharedParty,
    pub opponent_party: SharedParty,
    pub battle_type: BattleType,
}

impl Battle {
    pub fn new(player_party: SharedParty, opponent_party: SharedParty, battle_type: BattleType) -> Self {
        log::info!(
            "{:?} battle started: {} vs {} monster(s)",
            battle_type,
            player_party.borrow().len(),
            opponent_party.borrow().len()
        );
        Battle {
            player_party,
            opponent_party,
            battle_type,
        }
    }

    pub fn is_trainer(&self) -> bool {
        self.battle_type == BattleType::Trainer
    }

    pub fn player_active_index(&self) -> Option<usize> {
        active_index(&self.player_party.borrow())
    }

    pub fn opponent_active_index(&self) -> Option<usize> {
        active_index(&self.opponent_party.borrow())
    }

    /// True once either side has nobody left standing.
    pub fn is_over(&self) -> bool {
        self.player_active_index().is_none() || self.opponent_active_index().is_none()
    }

    /// A wiped-out player loses even if the opponent went down on the same turn.
    pub fn outcome(&self) -> BattleOutcome {
        if self.player_active_index().is_none() {
            BattleOutcome::PlayerLost
        } else if self.opponent_active_index().is_none() {
            BattleOutcome::PlayerWon
        } else {
            BattleOutcome::Ongoing
        }
    }

    /// Resolve the player's chosen move against the opponent's active monster.
    pub fn player_attack(&self, move_index: usize, rng: &mut TurnRng) -> EventBus {
        let mut bus = EventBus::new();
        let mut player = self.player_party.borrow_mut();
        let mut opponent = self.opponent_party.borrow_mut();

        let (Some(p_idx), Some(o_idx)) = (active_index(&player), active_index(&opponent)) else {
            bus.push(BattleEvent::ActionFailed {
                reason: ActionFailureReason::NoActiveMonster,
            });
            return bus;
        };

        execute_move(
            &mut player[p_idx],
            move_index,
            &mut opponent[o_idx],
            Side::Player,
            rng,
            &mut bus,
        );
        bus
    }

    /// The opponent picks uniformly among its active monster's moves with PP left.
    pub fn opponent_attack(&self, rng: &mut TurnRng) -> EventBus {
        let mut bus = EventBus::new();
        let mut player = self.player_party.borrow_mut();
        let mut opponent = self.opponent_party.borrow_mut();

        let (Some(o_idx), Some(p_idx)) = (active_index(&opponent), active_index(&player)) else {
            bus.push(BattleEvent::ActionFailed {
                reason: ActionFailureReason::NoActiveMonster,
            });
            return bus;
        };

        let attacker = &mut opponent[o_idx];
        let usable: Vec<usize> = attacker
            .moves
            .iter()
            .enumerate()
            .filter(|(_, mv)| mv.current_pp() > 0)
            .map(|(index, _)| index)
            .collect();

        if usable.is_empty() {
            bus.push(BattleEvent::ActionFailed {
                reason: ActionFailureReason::NoMovesLeft {
                    attacker: attacker.species.clone(),
                },
            });
            return bus;
        }

        let move_index = usable[rng.index(usable.len(), "Opponent Move Choice")];
        execute_move(
            attacker,
            move_index,
            &mut player[p_idx],
            Side::Opponent,
            rng,
            &mut bus,
        );
        bus
    }

    /// End-of-turn status tick for each side's active monster, player first.
    pub fn apply_status_effects(&self) -> EventBus {
        let mut bus = EventBus::new();
        for party in [&self.player_party, &self.opponent_party] {
            let mut party = party.borrow_mut();
            if let Some(index) = active_index(&party) {
                for event in party[index].apply_status_effects() {
                    bus.push(event);
                }
            }
        }
        bus
    }

    /// Throw a ball at the opponent's active monster.
    ///
    /// On success the target joins the player's party with 0 HP, and its
    /// entry in the opponent's party faints too, ending the battle.
    pub fn attempt_capture(&self, ball_bonus: f64, rng: &mut TurnRng) -> (bool, EventBus) {
        let mut bus = EventBus::new();
        let mut opponent = self.opponent_party.borrow_mut();

        let target_index = match can_attempt_catch(self.battle_type, &opponent) {
            Ok(index) => index,
            Err(error) => {
                bus.push(BattleEvent::CatchFailed {
                    reason: error.into(),
                });
                return (false, bus);
            }
        };

        let target = &mut opponent[target_index];
        let probability = catch_probability(target.current_hp(), target.max_hp(), ball_bonus);
        if !roll_catch_success(probability, rng) {
            bus.push(BattleEvent::CatchFailed {
                reason: CatchFailureReason::BrokeFree {
                    catch_probability: probability,
                },
            });
            return (false, bus);
        }

        target.set_hp(0);
        bus.push(BattleEvent::CatchSucceeded {
            target: target.species.clone(),
        });
        log::info!("Caught {}", target.species);
        self.player_party.borrow_mut().push(target.clone());
        (true, bus)
    }

    /// Swap a standing, non-active party member into the active slot.
    pub fn switch_player_monster(&self, party_index: usize) -> (bool, EventBus) {
        let mut bus = EventBus::new();
        let mut player = self.player_party.borrow_mut();

        let valid_target = player
            .get(party_index)
            .is_some_and(|monster| !monster.is_fainted());
        let active = active_index(&player);

        match active {
            Some(active) if valid_target && active != party_index => {
                bus.push(BattleEvent::MonsterSwitched {
                    old_monster: player[active].species.clone(),
                    new_monster: player[party_index].species.clone(),
                });
                player.swap(active, party_index);
                (true, bus)
            }
            _ => {
                bus.push(BattleEvent::ActionFailed {
                    reason: ActionFailureReason::InvalidSwitch,
                });
                (false, bus)
            }
        }
    }

    /// Use a healing item on the player's active monster. Fails without a turn
    /// if the monster is already at full HP.
    pub fn use_healing_item(&self, item: Item) -> (bool, EventBus) {
        let mut bus = EventBus::new();
        let Some(amount) = item.heal_amount() else {
            bus.push(BattleEvent::ActionFailed {
                reason: ActionFailureReason::NotUsableInBattle { item },
            });
            return (false, bus);
        };

        let mut player = self.player_party.borrow_mut();
        let Some(index) = active_index(&player) else {
            bus.push(BattleEvent::ActionFailed {
                reason: ActionFailureReason::NoActiveMonster,
            });
            return (false, bus);
        };

        let monster = &mut player[index];
        if monster.current_hp() >= monster.max_hp() {
            bus.push(BattleEvent::ActionFailed {
                reason: ActionFailureReason::HpAlreadyFull,
            });
            return (false, bus);
        }

        let restored = monster.restore_hp(amount);
        bus.push(BattleEvent::ItemUsed {
            item,
            target: monster.species.clone(),
            amount: restored,
        });
        (true, bus)
    }
}

/// Resolve one move: PP, hit roll, damage, secondary effect, faint check.
fn execute_move(
    attacker: &mut Monster,
    move_index: usize,
    defender: &mut Monster,
    side: Side,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    if attacker.select_move(move_index).is_none() {
        bus.push(BattleEvent::ActionFailed {
            reason: ActionFailureReason::NoSuchMove {
                attacker: attacker.species.clone(),
            },
        });
        return;
    }

    let selected = &mut attacker.moves[move_index];
    if !selected.use_pp() {
        bus.push(BattleEvent::ActionFailed {
            reason: ActionFailureReason::NoPpRemaining {
                move_name: selected.name.clone(),
            },
        });
        return;
    }

    let move_used = &attacker.moves[move_index];
    bus.push(BattleEvent::MoveUsed {
        side,
        attacker: attacker.species.clone(),
        move_name: move_used.name.clone(),
    });

    if !move_used.hit(rng) {
        bus.push(BattleEvent::MoveMissed {
            attacker: attacker.species.clone(),
            move_name: move_used.name.clone(),
        });
        return;
    }

    let damage = calculate_damage(attacker, defender, move_used, rng);
    defender.take_damage(damage);
    bus.push(BattleEvent::DamageDealt {
        target: defender.species.clone(),
        damage,
        remaining_hp: defender.current_hp(),
    });
    bus.push(BattleEvent::AttackTypeEffectiveness {
        multiplier: type_effectiveness(move_used.data.element, &defender.types),
    });

    if let Some(status) = move_used.data.effect.inflicted_status() {
        if rng.chance(SECONDARY_EFFECT_CHANCE, "Secondary Effect") && defender.status.is_none() {
            defender.status = Some(status);
            bus.push(BattleEvent::StatusApplied {
                target: defender.species.clone(),
                status,
            });
        }
    }

    if defender.is_fainted() {
        bus.push(BattleEvent::MonsterFainted {
            target: defender.species.clone(),
        });
    }
}
