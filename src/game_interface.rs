//! Text rendering and command handling shared by the terminal client and the
//! MCP server.
//!
//! Every function here returns plain strings; neither binary draws anything
//! itself.

use crate::battle::engine::Battle;
use crate::battle::turn_orchestrator::{Direction, GameSession};
use crate::errors::GameResult;
use crate::map::Position;
use crate::monster::Monster;
use crate::save::FallbackSaveStore;
use crate::world::World;
use schema::{Item, TileKind};

pub const PLAYER_CHAR: char = '@';

/// The overworld grid with the player and undefeated trainers drawn in.
pub fn render_world(world: &World) -> String {
    let mut output = String::with_capacity((world.width + 1) * world.height);
    for y in 0..world.height as i32 {
        for x in 0..world.width as i32 {
            let here = Position::new(x, y);
            let ch = if here == world.player_pos {
                PLAYER_CHAR
            } else if world.trainers.get(&here).is_some_and(|t| !t.defeated) {
                TileKind::TRAINER_CHAR
            } else {
                world.tile(x, y)
            };
            output.push(ch);
        }
        output.push('\n');
    }
    output
}

/// One line per party member, numbered from 1.
pub fn render_party(world: &World) -> String {
    let party = world.player_party.borrow();
    if party.is_empty() {
        return "Party: (empty)\n".to_string();
    }
    let mut output = String::from("Party:\n");
    for (i, monster) in party.iter().enumerate() {
        let fainted = if monster.is_fainted() { " (Fainted)" } else { "" };
        output.push_str(&format!("  {}. {}{}\n", i + 1, monster, fainted));
    }
    output
}

pub fn render_items(world: &World) -> String {
    format!(
        "{}s: {}   {}s: {}\n",
        Item::Potion,
        world.item_count(Item::Potion),
        Item::NetBall,
        world.item_count(Item::NetBall)
    )
}

fn render_moves(monster: &Monster) -> String {
    let mut output = String::new();
    for (i, mv) in monster.moves.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} [{}] PP {}/{}\n",
            i + 1,
            mv.name,
            mv.data.element,
            mv.current_pp(),
            mv.max_pp()
        ));
    }
    output
}

/// Foe and active monster with HP and status, plus the active monster's moves.
pub fn render_battle(battle: &Battle) -> String {
    let mut output = String::new();
    let opponent = battle.opponent_party.borrow();
    if let Some(index) = battle.opponent_active_index() {
        let label = if battle.is_trainer() { "Trainer's" } else { "Wild" };
        output.push_str(&format!("{} {}\n", label, opponent[index]));
    }

    let player = battle.player_party.borrow();
    match battle.player_active_index() {
        Some(index) => {
            output.push_str(&format!("Your {}\n", player[index]));
            output.push_str("Moves:\n");
            output.push_str(&render_moves(&player[index]));
        }
        None => output.push_str("You have no monster able to fight.\n"),
    }
    output.push_str("What will you do? (fight N, potion, ball, switch N, run)\n");
    output
}

/// Whatever the player should be looking at right now.
pub fn render_screen(session: &GameSession) -> String {
    match session.battle() {
        Some(battle) => render_battle(battle),
        None => {
            let world = session.world();
            format!(
                "{}\n{}{}",
                render_world(world),
                render_party(world),
                render_items(world)
            )
        }
    }
}

pub fn help_text() -> String {
    [
        "Commands:",
        "  up | down | left | right   walk one step (u/d/l/r and n/s/e/w also work)",
        "  fight N                    use move N in battle",
        "  potion                     use a Potion on your active monster",
        "  ball                       throw a NetBall",
        "  switch N                   send out party member N",
        "  run                        try to escape a wild battle",
        "  party                      show your party",
        "  save | load                save or load the game",
        "  look                       redraw the screen",
        "  help                       show this text",
        "  quit                       leave the game",
    ]
    .join("\n")
        + "\n"
}

/// A parsed player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Fight(usize),
    Potion,
    Ball,
    Switch(usize),
    Run,
    Party,
    Save,
    Load,
    Look,
    Help,
    Quit,
}

/// Parse one line of input. Move and party numbers are 1-based on input and
/// 0-based in the returned command.
pub fn parse_command(input: &str) -> Result<Command, String> {
    let mut words = input.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Look);
    };
    let verb = verb.to_ascii_lowercase();
    let number = |words: &mut std::str::SplitWhitespace<'_>| -> Result<usize, String> {
        let raw = words
            .next()
            .ok_or_else(|| format!("'{}' needs a number", verb))?;
        match raw.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(format!("'{}' is not a valid number", raw)),
        }
    };

    match verb.as_str() {
        "fight" | "f" | "attack" => number(&mut words).map(Command::Fight),
        "switch" => number(&mut words).map(Command::Switch),
        "potion" | "heal" => Ok(Command::Potion),
        "ball" | "catch" | "throw" => Ok(Command::Ball),
        "run" => Ok(Command::Run),
        "party" | "p" => Ok(Command::Party),
        "save" => Ok(Command::Save),
        "load" => Ok(Command::Load),
        "look" => Ok(Command::Look),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "go" | "move" | "walk" => {
            let direction = words.next().ok_or("Which direction?")?;
            direction.parse().map(Command::Move)
        }
        other => other.parse().map(Command::Move).map_err(|_| {
            format!("Unknown command '{}'. Type 'help' for a list.", other)
        }),
    }
}

/// Run one command against the session and return the lines to show.
/// `Quit` is the caller's business and yields nothing.
pub fn execute_command(
    session: &mut GameSession,
    store: &FallbackSaveStore,
    command: Command,
) -> GameResult<Vec<String>> {
    let lines = match command {
        Command::Move(direction) => session.step(direction)?,
        Command::Fight(index) => session.fight(index),
        Command::Potion => session.use_potion(),
        Command::Ball => session.throw_ball(),
        Command::Switch(index) => session.switch(index),
        Command::Run => session.run(),
        Command::Save => session.save(store)?,
        Command::Load => session.load(store)?,
        Command::Party => vec![render_party(session.world()).trim_end().to_string()],
        Command::Look => Vec::new(),
        Command::Help => vec![help_text().trim_end().to_string()],
        Command::Quit => Vec::new(),
    };
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::TurnRng;
    use crate::battle::tests::common::{test_catalog, TestMonsterBuilder};
    use crate::map::MapGrid;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::rc::Rc;

    fn world() -> World {
        let grid = MapGrid::parse("#####\n#P.T#\n#####").unwrap();
        let mut rng = TurnRng::new_for_test(vec![0.0, 0.0, 0.0, 0.0]);
        let mut world = World::from_map(grid, Rc::new(test_catalog()), &mut rng).unwrap();
        world
            .player_party
            .borrow_mut()
            .push(TestMonsterBuilder::new("Ignis", 5).build());
        world.add_item(Item::Potion, 3);
        world
    }

    #[test]
    fn test_world_shows_player_and_trainers() {
        let mut world = world();
        assert_eq!(render_world(&world), "#####\n#@.T#\n#####\n");

        world.remove_trainer(Position::new(3, 1));
        assert_eq!(render_world(&world), "#####\n#@..#\n#####\n");
    }

    #[test]
    fn test_party_and_items() {
        let world = world();
        assert_eq!(render_party(&world), "Party:\n  1. Ignis Lv5 HP 20/20\n");
        assert_eq!(render_items(&world), "Potions: 3   NetBalls: 0\n");
    }

    #[rstest]
    #[case("up", Command::Move(Direction::Up))]
    #[case("E", Command::Move(Direction::Right))]
    #[case("go west", Command::Move(Direction::Left))]
    #[case("fight 2", Command::Fight(1))]
    #[case("switch 1", Command::Switch(0))]
    #[case("ball", Command::Ball)]
    #[case("", Command::Look)]
    #[case("q", Command::Quit)]
    fn test_parse_command(#[case] input: &str, #[case] expected: Command) {
        assert_eq!(parse_command(input), Ok(expected));
    }

    #[rstest]
    #[case("fight")]
    #[case("fight 0")]
    #[case("switch two")]
    #[case("dance")]
    fn test_parse_command_errors(#[case] input: &str) {
        assert!(parse_command(input).is_err());
    }
}
