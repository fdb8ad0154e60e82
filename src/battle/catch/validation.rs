use crate::battle::state::{BattleType, CatchFailureReason};
use crate::monster::Monster;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchError {
    /// Trainers' monsters can't be caught
    TrainerBattle,
    /// No active monster on the opponent's side
    NoTargetMonster,
}

impl From<CatchError> for CatchFailureReason {
    fn from(error: CatchError) -> Self {
        match error {
            CatchError::TrainerBattle => CatchFailureReason::TrainerBattle,
            CatchError::NoTargetMonster => CatchFailureReason::NoTargetMonster,
        }
    }
}

/// Check if catch attempts are allowed based on battle type
pub fn is_catch_allowed(battle_type: BattleType) -> bool {
    matches!(battle_type, BattleType::Wild)
}

/// Validate a catch attempt and return the index of the target in the
/// opponent's party.
pub fn can_attempt_catch(
    battle_type: BattleType,
    opponent_party: &[Monster],
) -> Result<usize, CatchError> {
    if !is_catch_allowed(battle_type) {
        return Err(CatchError::TrainerBattle);
    }
    opponent_party
        .iter()
        .position(|monster| !monster.is_fainted())
        .ok_or(CatchError::NoTargetMonster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestMonsterBuilder;

    #[test]
    fn test_trainer_battle_rejected_before_target_check() {
        assert_eq!(
            can_attempt_catch(BattleType::Trainer, &[]),
            Err(CatchError::TrainerBattle)
        );
    }

    #[test]
    fn test_target_is_first_standing_monster() {
        let party = vec![
            TestMonsterBuilder::new("Pebbit", 5).with_hp(0).build(),
            TestMonsterBuilder::new("Sprig", 5).build(),
        ];
        assert_eq!(can_attempt_catch(BattleType::Wild, &party), Ok(1));
    }

    #[test]
    fn test_no_target_when_opponent_fainted() {
        let party = vec![TestMonsterBuilder::new("Pebbit", 5).with_hp(0).build()];
        assert_eq!(
            can_attempt_catch(BattleType::Wild, &party),
            Err(CatchError::NoTargetMonster)
        );
    }
}
