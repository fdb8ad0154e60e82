//! Dunkemon terminal client.
//!
//! Line-oriented: type a command, get the resulting messages and the current
//! screen. Usage:
//!   dunkemon
//!   dunkemon --seed 42 --save slot1.json
//!   dunkemon --online --log-level info

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use dunkemon::cli::GameArgs;
use dunkemon::game_interface::{execute_command, help_text, parse_command, render_screen, Command};
use dunkemon::{GameError, GameSession};

#[derive(Parser)]
#[command(name = "dunkemon", about = "Explore, battle and catch monsters")]
struct Cli {
    #[command(flatten)]
    game: GameArgs,
}

fn run(cli: Cli) -> Result<(), GameError> {
    let config = cli.game.to_config();
    let store = config.save_store();
    let mut session = GameSession::from_config(&config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Welcome to Dunkemon!\n");
    println!("{}", help_text());
    print!("{}> ", render_screen(&session));
    let _ = stdout.flush();

    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => match execute_command(&mut session, &store, command) {
                Ok(messages) => {
                    for message in messages {
                        println!("{}", message);
                    }
                }
                // A failed save or load leaves the session as it was.
                Err(e) => println!("Error: {}", e),
            },
            Err(message) => println!("{}", message),
        }
        println!();
        print!("{}> ", render_screen(&session));
        let _ = stdout.flush();
    }
    println!("Goodbye!");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.game.init_logging(tracing_core::Level::WARN);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
