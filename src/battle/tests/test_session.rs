use crate::battle::state::TurnRng;
use crate::battle::tests::common::{test_catalog, TestMonsterBuilder};
use crate::battle::turn_orchestrator::{Direction, GameSession};
use crate::config::GameConfig;
use crate::map::{MapGrid, Position};
use crate::monster::Monster;
use crate::save::{FallbackSaveStore, LocalSaveStore};
use crate::world::World;
use pretty_assertions::assert_eq;
use schema::Item;
use std::rc::Rc;

// Start at (1,1); center at (3,1); trainer at (2,2); water at (3,2).
const MAP: &str = "#######\n#P.C..#\n#.T~..#\n#######";

// Both trainer monsters: Sprig (last of four sorted species) at level 3.
const TRAINER_SETUP: [f64; 4] = [0.99, 0.0, 0.99, 0.0];

// Encounter passes, weighted pick lands on Sprig, level 2.
const WILD_SPRIG: [f64; 3] = [0.05, 0.9, 0.0];

fn session(party: Vec<Monster>, script: Vec<f64>) -> GameSession {
    let grid = MapGrid::parse(MAP).unwrap();
    let mut setup = TurnRng::new_for_test(TRAINER_SETUP.to_vec());
    let mut world = World::from_map(grid, Rc::new(test_catalog()), &mut setup).unwrap();
    *world.player_party.borrow_mut() = party;
    world.add_item(Item::Potion, 1);
    world.add_item(Item::NetBall, 1);
    GameSession::new(world, TurnRng::new_for_test(script))
}

fn script(parts: &[&[f64]]) -> Vec<f64> {
    parts.concat()
}

fn ignis(moves: Vec<&str>) -> TestMonsterBuilder {
    TestMonsterBuilder::new("Ignis", 50).with_moves(moves)
}

/// A session already in a wild battle against a level 2 Sprig.
fn wild_battle(party: Vec<Monster>, then: &[f64]) -> GameSession {
    let mut session = session(party, script(&[&WILD_SPRIG, then]));
    let lines = session.step(Direction::Right).unwrap();
    assert_eq!(lines, vec!["A wild Sprig appeared!"]);
    assert!(session.in_battle());
    session
}

#[test]
fn test_wall_blocks_without_rolling() {
    let mut session = session(vec![ignis(vec!["Slam"]).build()], vec![]);
    assert_eq!(session.step(Direction::Up).unwrap(), Vec::<String>::new());
    assert_eq!(session.world().player_pos, Position::new(1, 1));
}

#[test]
fn test_empty_party_never_starts_battles() {
    let mut session = session(vec![], vec![]);
    assert_eq!(session.step(Direction::Right).unwrap(), Vec::<String>::new());
    assert!(!session.in_battle());
}

#[test]
fn test_center_heals() {
    let mut session = session(vec![ignis(vec!["Slam"]).with_hp(1).build()], vec![0.5]);
    session.step(Direction::Right).unwrap();
    let lines = session.step(Direction::Right).unwrap();

    assert_eq!(lines, vec!["Your party was fully healed!"]);
    let party = session.world().player_party.borrow();
    assert_eq!(party[0].current_hp(), party[0].max_hp());
}

#[test]
fn test_cannot_walk_during_battle() {
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).build()], &[]);
    assert_eq!(
        session.step(Direction::Left).unwrap(),
        vec!["You can't walk away from a battle!"]
    );
    assert_eq!(session.world().player_pos, Position::new(2, 1));
}

#[test]
fn test_knockout_wins_without_opponent_turn() {
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).build()], &[0.5]);

    let lines = session.fight(0);

    assert_eq!(lines[0], "Ignis used Slam!");
    assert_eq!(&lines[2..], &["Sprig fainted!", "You won the battle!"]);
    assert!(!session.in_battle());
}

#[test]
fn test_fight_gives_opponent_a_turn() {
    let mut session = wild_battle(vec![ignis(vec!["Splash"]).build()], &[0.5, 0.0, 0.5]);

    let lines = session.fight(0);

    assert_eq!(
        lines,
        vec![
            "Ignis used Splash!",
            "It dealt 1 damage!",
            "Foe Sprig used Tackle!",
            "It dealt 2 damage!",
        ]
    );
    assert!(session.in_battle());
}

#[test]
fn test_refused_move_still_gives_opponent_a_turn() {
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).build()], &[0.0, 0.5]);

    assert_eq!(
        session.fight(3),
        vec!["Ignis has no such move!", "Foe Sprig used Tackle!", "It dealt 2 damage!"]
    );
    assert!(session.in_battle());
}

#[test]
fn test_out_of_pp_in_trainer_battle_ends_in_blackout() {
    let mut stranded = ignis(vec!["Slam"]).with_hp(1).build();
    stranded.moves[0].set_current_pp(0);
    let mut session = session(vec![stranded], vec![0.5, 0.0, 0.5]);
    session.world_mut().take_item(Item::Potion);
    session.world_mut().take_item(Item::NetBall);
    session.step(Direction::Down).unwrap();
    session.step(Direction::Right).unwrap();
    assert!(session.in_battle());

    // Every other way out is closed.
    assert_eq!(session.use_potion(), vec!["You have no Potions left!"]);
    assert_eq!(session.run(), vec!["Can't run from a trainer battle!"]);
    assert_eq!(session.throw_ball(), vec!["You have no NetBalls left!"]);

    let lines = session.fight(0);

    assert_eq!(lines[0], "No PP left for Slam!");
    assert_eq!(
        &lines[lines.len() - 2..],
        &["Ignis fainted!", "You blacked out!"]
    );
    assert!(!session.in_battle());
    assert!(!session.world().trainers[&Position::new(2, 2)].defeated);
}

#[test]
fn test_blackout_heals_and_keeps_position() {
    let mut session = wild_battle(
        vec![ignis(vec!["Splash"]).with_hp(1).build()],
        &[0.5, 0.0, 0.5],
    );

    let lines = session.fight(0);

    assert_eq!(
        &lines[lines.len() - 2..],
        &["Ignis fainted!", "You blacked out!"]
    );
    assert!(!session.in_battle());
    assert_eq!(session.world().player_pos, Position::new(2, 1));
    let party = session.world().player_party.borrow();
    assert_eq!(party[0].current_hp(), party[0].max_hp());
}

#[test]
fn test_fainted_party_blacks_out_on_encounter() {
    let mut session = session(vec![ignis(vec!["Slam"]).with_hp(0).build()], WILD_SPRIG.to_vec());

    let lines = session.step(Direction::Right).unwrap();

    assert_eq!(lines, vec!["A wild Sprig appeared!", "You blacked out!"]);
    assert!(!session.in_battle());
    assert!(!session.world().player_party.borrow()[0].is_fainted());
}

#[test]
fn test_potion_heals_then_opponent_moves() {
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).with_hp(50).build()], &[0.0, 0.5]);

    let lines = session.use_potion();

    assert_eq!(
        lines,
        vec![
            "Used Potion! Restored 20 HP.",
            "Foe Sprig used Tackle!",
            "It dealt 2 damage!",
        ]
    );
    assert_eq!(session.world().item_count(Item::Potion), 0);
    assert_eq!(session.world().player_party.borrow()[0].current_hp(), 68);
    assert_eq!(session.use_potion(), vec!["You have no Potions left!"]);
}

#[test]
fn test_potion_at_full_hp_is_kept() {
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).build()], &[]);
    assert_eq!(session.use_potion(), vec!["HP is already full!"]);
    assert_eq!(session.world().item_count(Item::Potion), 1);
}

#[test]
fn test_ball_catch_ends_battle() {
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).build()], &[0.0]);

    assert_eq!(session.throw_ball(), vec!["Gotcha! Sprig was caught!"]);
    assert!(!session.in_battle());
    assert_eq!(session.world().item_count(Item::NetBall), 0);
    let party = session.world().player_party.borrow();
    assert_eq!(party.len(), 2);
    assert_eq!(party[1].current_hp(), 0);
    drop(party);
    assert_eq!(session.throw_ball(), vec!["You're not in a battle."]);
}

#[test]
fn test_no_balls_left() {
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).build()], &[]);
    session.world_mut().take_item(Item::NetBall);
    assert_eq!(session.throw_ball(), vec!["You have no NetBalls left!"]);
}

#[test]
fn test_run_from_wild_battle() {
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).build()], &[0.7, 0.0, 0.5, 0.2]);

    assert_eq!(
        session.run(),
        vec!["Can't escape!", "Foe Sprig used Tackle!", "It dealt 2 damage!"]
    );
    assert!(session.in_battle());
    assert_eq!(session.run(), vec!["Got away safely!"]);
    assert!(!session.in_battle());
}

#[test]
fn test_switch_gives_opponent_exactly_one_attack() {
    let mut session = wild_battle(
        vec![
            ignis(vec!["Slam"]).build(),
            TestMonsterBuilder::new("Sprig", 50).build(),
        ],
        &[0.0, 0.5],
    );

    let lines = session.switch(1);

    assert_eq!(
        lines,
        vec!["You sent out Sprig!", "Foe Sprig used Tackle!", "It dealt 2 damage!"]
    );
    let party = session.world().player_party.borrow();
    assert_eq!(party[0].species, "Sprig");
    assert_eq!(party[1].species, "Ignis");
    drop(party);
    assert_eq!(session.switch(0), vec!["That monster can't be sent out!"]);
}

#[test]
fn test_trainer_battle_rules() {
    // Step down (no encounter), then the ball's failed throw draws the
    // opponent's move and damage.
    let mut session = session(vec![ignis(vec!["Slam"]).build()], vec![0.5, 0.0, 0.5]);
    session.step(Direction::Down).unwrap();
    let lines = session.step(Direction::Right).unwrap();
    assert_eq!(lines, vec!["A trainer challenges you to a battle!"]);

    assert_eq!(session.run(), vec!["Can't run from a trainer battle!"]);
    let lines = session.throw_ball();
    assert_eq!(lines[0], "You can't capture a trainer's monster!");
    assert_eq!(session.world().item_count(Item::NetBall), 0);
    assert!(session.in_battle());
}

#[test]
fn test_beating_a_trainer_removes_it() {
    let mut session = session(
        vec![ignis(vec!["Slam"]).build()],
        vec![0.5, 0.5, 0.0, 0.5, 0.5, 0.5, 0.5],
    );
    let trainer = Position::new(2, 2);
    session.step(Direction::Down).unwrap();
    session.step(Direction::Right).unwrap();

    let first = session.fight(0);
    assert!(first.contains(&"Sprig fainted!".to_string()));
    assert!(session.in_battle());

    let second = session.fight(0);
    assert_eq!(second.last().map(String::as_str), Some("You won the battle!"));
    assert!(session.world().trainers[&trainer].defeated);

    // Walking back over the spot is an ordinary step now.
    session.step(Direction::Left).unwrap();
    assert_eq!(session.step(Direction::Right).unwrap(), Vec::<String>::new());
    assert!(!session.in_battle());
}

#[test]
fn test_save_and_load_round_trip() {
    let path = std::env::temp_dir().join(format!("dunkemon-session-{}.json", std::process::id()));
    let store = FallbackSaveStore::local_only(Box::new(LocalSaveStore::new(&path)));
    let mut session = session(vec![ignis(vec!["Slam"]).build()], vec![0.5]);

    assert_eq!(session.save(&store).unwrap(), vec!["Game saved."]);
    session.step(Direction::Right).unwrap();
    assert_eq!(session.world().player_pos, Position::new(2, 1));

    assert_eq!(session.load(&store).unwrap(), vec!["Loaded game."]);
    assert_eq!(session.world().player_pos, Position::new(1, 1));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_no_saving_mid_battle() {
    let path = std::env::temp_dir().join(format!("dunkemon-midbattle-{}.json", std::process::id()));
    let store = FallbackSaveStore::local_only(Box::new(LocalSaveStore::new(&path)));
    let mut session = wild_battle(vec![ignis(vec!["Slam"]).build()], &[]);

    assert_eq!(
        session.save(&store).unwrap(),
        vec!["You can't save during a battle."]
    );
    assert!(!path.exists());
}

#[test]
fn test_recent_lines_are_bounded() {
    let mut session = session(vec![ignis(vec!["Slam"]).build()], vec![]);
    for _ in 0..8 {
        session.step(Direction::Up).unwrap();
        session.fight(0);
    }
    assert_eq!(session.recent_lines().count(), 5);
    assert!(session
        .recent_lines()
        .all(|line| line == "You're not in a battle."));
}

#[test]
fn test_new_game_from_builtin_data() {
    let config = GameConfig {
        seed: Some(7),
        ..GameConfig::default()
    };

    let session = GameSession::from_config(&config).unwrap();

    let party = session.world().player_party.borrow();
    assert_eq!(party.len(), 1);
    assert_eq!(party[0].species, "Ignis");
    assert_eq!(party[0].level, 5);
    assert_eq!(session.world().item_count(Item::Potion), 3);
    assert_eq!(session.world().item_count(Item::NetBall), 5);
}

#[test]
fn test_direction_parsing() {
    assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
    assert_eq!("S".parse::<Direction>(), Ok(Direction::Down));
    assert_eq!("west".parse::<Direction>(), Ok(Direction::Left));
    assert!("sideways".parse::<Direction>().is_err());
}
