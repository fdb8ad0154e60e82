use crate::battle::engine::{shared_party, Battle};
use crate::battle::state::{BattleOutcome, BattleType, TurnRng};
use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::errors::GameResult;
use crate::map::Position;
use crate::save::FallbackSaveStore;
use crate::world::{MoveEvent, World};
use schema::Item;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

pub const RUN_CHANCE: f64 = 0.5;
const RECENT_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" | "north" | "n" => Ok(Direction::Up),
            "down" | "d" | "south" | "s" => Ok(Direction::Down),
            "left" | "l" | "west" | "w" => Ok(Direction::Left),
            "right" | "r" | "east" | "e" => Ok(Direction::Right),
            other => Err(format!("Unknown direction '{}'", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

/// The battle in progress and, for trainer battles, where the trainer stands.
#[derive(Debug, Clone)]
pub struct ActiveBattle {
    pub battle: Battle,
    pub trainer: Option<Position>,
}

#[derive(Debug, Clone)]
pub enum Mode {
    Exploring,
    Battling(ActiveBattle),
}

/// Drives one player's game: overworld steps, battle turns and saving.
///
/// Every operation returns the lines to show for it. Expected refusals
/// ("HP is already full!", "Can't run from a trainer battle!") come back
/// as lines too; only catalog and persistence failures are errors.
#[derive(Debug)]
pub struct GameSession {
    world: World,
    rng: TurnRng,
    mode: Mode,
    recent: VecDeque<String>,
}

impl GameSession {
    pub fn new(world: World, rng: TurnRng) -> Self {
        GameSession {
            world,
            rng,
            mode: Mode::Exploring,
            recent: VecDeque::new(),
        }
    }

    /// Load data and map, generate trainers, hand out the starter and items.
    pub fn from_config(config: &GameConfig) -> GameResult<Self> {
        let catalog = Rc::new(config.load_catalog()?);
        let grid = config.load_map()?;
        let mut rng = config.rng();
        let mut world = World::from_map(grid, Rc::clone(&catalog), &mut rng)?;

        let starter = catalog.create_monster(&config.starter_species, config.starter_level)?;
        world.player_party.borrow_mut().push(starter);
        world.items = config.starting_items.clone();

        log::info!(
            "New game at {} with {} (Lv{})",
            world.player_pos,
            config.starter_species,
            config.starter_level
        );
        Ok(GameSession::new(world, rng))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn catalog(&self) -> &Catalog {
        self.world.catalog()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn battle(&self) -> Option<&Battle> {
        match &self.mode {
            Mode::Battling(active) => Some(&active.battle),
            Mode::Exploring => None,
        }
    }

    pub fn in_battle(&self) -> bool {
        self.battle().is_some()
    }

    /// The last few lines produced, oldest first.
    pub fn recent_lines(&self) -> impl Iterator<Item = &String> {
        self.recent.iter()
    }

    fn finish(&mut self, lines: Vec<String>) -> Vec<String> {
        for line in &lines {
            self.recent.push_back(line.clone());
        }
        while self.recent.len() > RECENT_LINES {
            self.recent.pop_front();
        }
        lines
    }

    // --- Overworld ---

    /// Take one step. Wild encounters are only rolled when the player
    /// actually moved onto a tile with nothing else going on.
    pub fn step(&mut self, direction: Direction) -> GameResult<Vec<String>> {
        if self.in_battle() {
            return Ok(self.finish(vec!["You can't walk away from a battle!".to_string()]));
        }

        let before = self.world.player_pos;
        let (dx, dy) = direction.delta();
        let event = self.world.move_player(dx, dy);
        let mut lines = Vec::new();

        match event {
            MoveEvent::Healed => lines.push("Your party was fully healed!".to_string()),
            MoveEvent::TrainerChallenge(position) => {
                if let Some(party) = self.world.trainer_party(position) {
                    if self.can_battle() {
                        lines.push("A trainer challenges you to a battle!".to_string());
                        let battle = Battle::new(
                            Rc::clone(&self.world.player_party),
                            party,
                            BattleType::Trainer,
                        );
                        self.start_battle(battle, Some(position), &mut lines);
                    }
                }
            }
            MoveEvent::Nothing => {
                if self.world.player_pos != before && self.can_battle() {
                    if let Some(wild) = self.world.maybe_trigger_encounter(&mut self.rng)? {
                        lines.push(format!("A wild {} appeared!", wild.species));
                        let battle = Battle::new(
                            Rc::clone(&self.world.player_party),
                            shared_party(vec![wild]),
                            BattleType::Wild,
                        );
                        self.start_battle(battle, None, &mut lines);
                    }
                }
            }
        }
        Ok(self.finish(lines))
    }

    fn can_battle(&self) -> bool {
        !self.world.player_party.borrow().is_empty()
    }

    fn start_battle(&mut self, battle: Battle, trainer: Option<Position>, lines: &mut Vec<String>) {
        self.mode = Mode::Battling(ActiveBattle { battle, trainer });
        // A party with nobody standing blacks out straight away.
        self.check_battle_end(lines);
    }

    // --- Battle actions ---

    pub fn fight(&mut self, move_index: usize) -> Vec<String> {
        let Mode::Battling(active) = &self.mode else {
            return self.not_in_battle();
        };
        // A refused move still hands the opponent its turn.
        let mut lines = active.battle.player_attack(move_index, &mut self.rng).lines();
        if !active.battle.is_over() {
            self.opponent_turn(&mut lines);
        }
        self.check_battle_end(&mut lines);
        self.finish(lines)
    }

    pub fn use_potion(&mut self) -> Vec<String> {
        let Mode::Battling(active) = &self.mode else {
            return self.not_in_battle();
        };
        if self.world.item_count(Item::Potion) == 0 {
            return self.finish(vec!["You have no Potions left!".to_string()]);
        }
        let (used, bus) = active.battle.use_healing_item(Item::Potion);
        let mut lines = bus.lines();
        if !used {
            return self.finish(lines);
        }
        self.world.take_item(Item::Potion);
        self.opponent_turn(&mut lines);
        self.check_battle_end(&mut lines);
        self.finish(lines)
    }

    /// The ball is spent whether or not the throw is allowed.
    pub fn throw_ball(&mut self) -> Vec<String> {
        let Mode::Battling(active) = &self.mode else {
            return self.not_in_battle();
        };
        let ball = Item::NetBall;
        if !self.world.take_item(ball) {
            return self.finish(vec![format!("You have no {}s left!", ball)]);
        }
        let bonus = ball.ball_bonus().unwrap_or(1.0);
        let (caught, bus) = active.battle.attempt_capture(bonus, &mut self.rng);
        let mut lines = bus.lines();
        if caught {
            self.mode = Mode::Exploring;
            return self.finish(lines);
        }
        self.opponent_turn(&mut lines);
        self.check_battle_end(&mut lines);
        self.finish(lines)
    }

    /// Swap `party_index` into the front slot. The opponent gets a free attack.
    pub fn switch(&mut self, party_index: usize) -> Vec<String> {
        let Mode::Battling(active) = &self.mode else {
            return self.not_in_battle();
        };
        let (switched, bus) = active.battle.switch_player_monster(party_index);
        let mut lines = bus.lines();
        if !switched {
            return self.finish(lines);
        }
        self.opponent_turn(&mut lines);
        self.check_battle_end(&mut lines);
        self.finish(lines)
    }

    pub fn run(&mut self) -> Vec<String> {
        let Mode::Battling(active) = &self.mode else {
            return self.not_in_battle();
        };
        if active.battle.is_trainer() {
            return self.finish(vec!["Can't run from a trainer battle!".to_string()]);
        }
        if self.rng.chance(RUN_CHANCE, "Run Away") {
            log::info!("Escaped from wild battle");
            self.mode = Mode::Exploring;
            return self.finish(vec!["Got away safely!".to_string()]);
        }
        let mut lines = vec!["Can't escape!".to_string()];
        self.opponent_turn(&mut lines);
        self.check_battle_end(&mut lines);
        self.finish(lines)
    }

    fn not_in_battle(&mut self) -> Vec<String> {
        self.finish(vec!["You're not in a battle.".to_string()])
    }

    /// Opponent attack followed by the status pass.
    fn opponent_turn(&mut self, lines: &mut Vec<String>) {
        let Mode::Battling(active) = &self.mode else {
            return;
        };
        let mut bus = active.battle.opponent_attack(&mut self.rng);
        bus.extend(active.battle.apply_status_effects());
        lines.extend(bus.lines());
    }

    fn check_battle_end(&mut self, lines: &mut Vec<String>) {
        let Mode::Battling(active) = &self.mode else {
            return;
        };
        match active.battle.outcome() {
            BattleOutcome::Ongoing => return,
            BattleOutcome::PlayerLost => {
                lines.push("You blacked out!".to_string());
                log::info!("Player blacked out at {}", self.world.player_pos);
                self.world.heal_party();
            }
            BattleOutcome::PlayerWon => {
                lines.push("You won the battle!".to_string());
                log::info!("Player won the battle");
                if let Some(position) = active.trainer {
                    self.world.remove_trainer(position);
                }
            }
        }
        self.mode = Mode::Exploring;
    }

    // --- Persistence ---

    pub fn save(&mut self, store: &FallbackSaveStore) -> GameResult<Vec<String>> {
        if self.in_battle() {
            return Ok(self.finish(vec!["You can't save during a battle.".to_string()]));
        }
        let report = store.save(&self.world.snapshot())?;
        Ok(self.finish(report.messages))
    }

    pub fn load(&mut self, store: &FallbackSaveStore) -> GameResult<Vec<String>> {
        if self.in_battle() {
            return Ok(self.finish(vec!["You can't load during a battle.".to_string()]));
        }
        let report = store.load()?;
        if let Some(data) = &report.value {
            self.world.restore(data)?;
        }
        Ok(self.finish(report.messages))
    }
}
