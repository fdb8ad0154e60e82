//! Dunkemon MCP Server
//!
//! A Model Context Protocol server that exposes one Dunkemon game session
//! over JSON-RPC on stdin/stdout, so an LLM can explore and battle through
//! tool calls.

use std::cell::RefCell;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;

use clap::Parser;
use dunkemon::cli::GameArgs;
use dunkemon::game_interface::{execute_command, render_screen, Command};
use dunkemon::{Direction, FallbackSaveStore, GameError, GameSession};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "dunkemon-mcp", about = "Dunkemon as an MCP tool server on stdio")]
struct Cli {
    #[command(flatten)]
    game: GameArgs,
}

fn no_arguments() -> Value {
    json!({ "type": "object", "properties": {} })
}

fn tool(name: &str, description: &str, input_schema: Value) -> Value {
    json!({
        "name": name,
        "description": description,
        "inputSchema": input_schema
    })
}

fn tool_list() -> Value {
    json!({
        "tools": [
            tool("look", "Show the current screen: the map, party and items, or the battle", no_arguments()),
            tool(
                "move",
                "Walk one step on the overworld",
                json!({
                    "type": "object",
                    "properties": {
                        "direction": {
                            "type": "string",
                            "description": "up, down, left or right"
                        }
                    },
                    "required": ["direction"]
                })
            ),
            tool(
                "fight",
                "Use one of the active monster's moves",
                json!({
                    "type": "object",
                    "properties": {
                        "move_index": {
                            "type": "number",
                            "description": "Move number as listed on the battle screen (1-4)"
                        }
                    },
                    "required": ["move_index"]
                })
            ),
            tool("use_potion", "Heal the active monster with a Potion", no_arguments()),
            tool("throw_ball", "Throw a NetBall at the wild monster", no_arguments()),
            tool(
                "switch",
                "Send out a different party member",
                json!({
                    "type": "object",
                    "properties": {
                        "party_index": {
                            "type": "number",
                            "description": "Party member number as listed in the party (starting at 1)"
                        }
                    },
                    "required": ["party_index"]
                })
            ),
            tool("run", "Try to escape from a wild battle", no_arguments()),
            tool("save", "Save the game", no_arguments()),
            tool("load", "Load the last saved game", no_arguments())
        ]
    })
}

struct McpServer {
    session: RefCell<GameSession>,
    store: FallbackSaveStore,
}

impl McpServer {
    fn new(session: GameSession, store: FallbackSaveStore) -> Self {
        Self {
            session: RefCell::new(session),
            store,
        }
    }

    fn handle_request(&self, method: &str, params: &Value) -> Value {
        match method {
            "initialize" => {
                json!({
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": "dunkemon",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                })
            }
            "tools/list" => tool_list(),
            "tools/call" => {
                let tool_name = params["name"].as_str().unwrap_or("");
                let args = &params["arguments"];
                self.handle_tool_call(tool_name, args)
            }
            _ => {
                json!({
                    "error": {
                        "code": -32601,
                        "message": "Method not found"
                    }
                })
            }
        }
    }

    fn handle_tool_call(&self, tool_name: &str, args: &Value) -> Value {
        let text = match tool_command(tool_name, args) {
            Ok(command) => {
                let mut session = self.session.borrow_mut();
                match execute_command(&mut session, &self.store, command) {
                    Ok(lines) => with_screen(&lines, &session),
                    Err(e) => format!("Error: {}\n\n{}", e, render_screen(&session)),
                }
            }
            Err(message) => message,
        };
        json!({
            "content": [{"type": "text", "text": text}]
        })
    }

    fn run(&self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let reader = BufReader::new(stdin.lock());

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let request: Value = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    log::warn!("Ignoring unparseable request: {}", e);
                    continue;
                }
            };

            // Notifications carry no id and get no response.
            let Some(id) = request.get("id").cloned() else {
                continue;
            };
            let method = request["method"].as_str().unwrap_or("");
            let params = &request["params"];
            log::debug!("Request {}: {}", id, method);

            let result = self.handle_request(method, params);

            let response = json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": result
            });

            writeln!(stdout, "{}", response)?;
            stdout.flush()?;
        }

        Ok(())
    }
}

/// Numbers in tool arguments are 1-based, like the rendered lists.
fn one_based(args: &Value, key: &str) -> Result<usize, String> {
    match args[key].as_u64() {
        Some(n) if n >= 1 => Ok(n as usize - 1),
        _ => Err(format!("'{}' must be a number starting at 1", key)),
    }
}

fn tool_command(tool_name: &str, args: &Value) -> Result<Command, String> {
    match tool_name {
        "look" => Ok(Command::Look),
        "move" => {
            let direction = args["direction"].as_str().unwrap_or("");
            direction.parse::<Direction>().map(Command::Move)
        }
        "fight" => one_based(args, "move_index").map(Command::Fight),
        "use_potion" => Ok(Command::Potion),
        "throw_ball" => Ok(Command::Ball),
        "switch" => one_based(args, "party_index").map(Command::Switch),
        "run" => Ok(Command::Run),
        "save" => Ok(Command::Save),
        "load" => Ok(Command::Load),
        _ => Err(format!("Unknown tool: {}", tool_name)),
    }
}

fn with_screen(lines: &[String], session: &GameSession) -> String {
    let screen = render_screen(session);
    if lines.is_empty() {
        screen
    } else {
        format!("{}\n\n{}", lines.join("\n"), screen)
    }
}

fn start(cli: Cli) -> Result<McpServer, GameError> {
    let config = cli.game.to_config();
    let store = config.save_store();
    let session = GameSession::from_config(&config)?;
    Ok(McpServer::new(session, store))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    // stdout carries the protocol, so logs go to stderr only.
    cli.game.init_logging(tracing_core::Level::INFO);

    let server = match start(cli) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match server.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("I/O error: {}", e);
            ExitCode::FAILURE
        }
    }
}
