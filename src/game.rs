use std::sync::{
    Mutex, MutexGuard, PoisonError,
    mpsc::{self, Receiver, Sender},
};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    backgammon::{Board, Dice, DiceValues, Move, MoveSequence, Player, legal_moves, rules},
    error::{Illegality, MoveError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the dice and the starting color. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Color to move first instead of a coin flip.
    pub starting_player: Option<Player>,
    /// Consecutive turns without a legal move passed in one go before the
    /// turn is left with a player that can only pass.
    pub max_turn_skips: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            seed: None,
            starting_player: None,
            max_turn_skips: 64,
        }
    }
}

/// A copy of the observable game state at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub dice: Dice,
    pub active: Player,
    pub winner: Option<Player>,
    /// Starts at 1 and grows with every change of the active player.
    pub turn: u32,
}

impl Snapshot {
    pub fn remaining_dice(&self) -> DiceValues {
        self.dice.remaining()
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }
}

/// Sent to every subscriber after a move or a change of turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged;

struct Subscriber {
    color: Option<Player>,
    sender: Sender<StateChanged>,
}

struct GameState {
    board: Board,
    active: Player,
    dice: Dice,
    winner: Option<Player>,
    turn: u32,
    rng: StdRng,
    config: GameConfig,
    subscribers: Vec<Subscriber>,
    closed: bool,
}

impl GameState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            dice: self.dice,
            active: self.active,
            winner: self.winner,
            turn: self.turn,
        }
    }

    fn check_turn(&self, color: Player) -> Result<(), MoveError> {
        if color != self.active {
            return Err(MoveError::NotYourTurn { requested: color, active: self.active });
        }
        if let Some(winner) = self.winner {
            return Err(MoveError::GameOver { winner });
        }
        Ok(())
    }

    fn can_move(&self) -> bool {
        !self.dice.is_used() && rules::has_any_legal_move(&self.board, &self.dice.remaining().to_vec(), self.active)
    }

    fn move_checker(&mut self, color: Player, position: u8, distance: i8) -> Result<(), MoveError> {
        self.check_turn(color)?;
        let die = distance.unsigned_abs();
        if !self.dice.contains(die) {
            return Err(MoveError::DieNotAvailable(die));
        }
        self.step(Move::new(position, distance))?;
        self.settle();
        Ok(())
    }

    fn play(&mut self, color: Player, sequence: &MoveSequence) -> Result<(), MoveError> {
        self.check_turn(color)?;

        let mut board = self.board;
        let mut dice = self.dice;
        for mv in sequence.iter() {
            dice = dice.use_die(mv.die()).ok_or(MoveError::DieNotAvailable(mv.die()))?;
            board = rules::apply(&board, mv.position, mv.distance, color)?;
        }

        let allowed = legal_moves(&self.board, &self.dice.remaining().to_vec(), color)
            .iter()
            .any(|(candidate, result)| candidate.len() == sequence.len() && *result == board);
        if !allowed {
            return Err(Illegality::NotMaximal.into());
        }

        for mv in sequence.iter() {
            self.step(*mv)?;
        }
        self.settle();
        Ok(())
    }

    /// Applies one move for the active player and consumes its die.
    fn step(&mut self, mv: Move) -> Result<(), MoveError> {
        let board = rules::apply(&self.board, mv.position, mv.distance, self.active)?;
        let dice = self.dice.use_die(mv.die()).ok_or(MoveError::DieNotAvailable(mv.die()))?;
        self.board = board;
        self.dice = dice;
        log::trace!("{} played {}", self.active, mv);

        if let Some(winner) = self.board.winner() {
            self.winner = Some(winner);
            log::info!("{} wins on turn {}", winner, self.turn);
        }
        self.notify();
        Ok(())
    }

    /// Hands the turn over once the active player is done.
    fn settle(&mut self) {
        if self.winner.is_none() && !self.can_move() {
            self.pass_turn();
        }
    }

    fn pass_turn(&mut self) {
        for _ in 0..self.config.max_turn_skips {
            self.active = self.active.opposite();
            self.dice = Dice::roll(&mut self.rng);
            self.turn += 1;
            self.notify();
            if self.can_move() {
                return;
            }
            log::debug!("{} rolled {} and cannot move", self.active, self.dice);
        }
        log::warn!(
            "no legal move in {} consecutive turns, {} has to pass",
            self.config.max_turn_skips,
            self.active
        );
    }

    fn notify(&mut self) {
        self.subscribers.retain(|subscriber| {
            let alive = subscriber.sender.send(StateChanged).is_ok();
            if !alive {
                match subscriber.color {
                    Some(color) => log::debug!("dropping {} subscriber", color),
                    None => log::debug!("dropping observer"),
                }
            }
            alive
        });
    }
}

fn random_source(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// A game of backgammon shared between threads.
pub struct Game {
    state: Mutex<GameState>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Standard setup with dice and starting color drawn from the configured
    /// random source.
    pub fn with_config(config: GameConfig) -> Self {
        let mut rng = random_source(config.seed);
        let active = config.starting_player.unwrap_or_else(|| {
            if rng.random_bool(0.5) { Player::White } else { Player::Black }
        });
        let dice = Dice::roll(&mut rng);
        Self::build(Board::new(), active, dice, rng, config)
    }

    /// Starts from an arbitrary position. The seed, if any, drives the dice
    /// of later turns.
    pub fn from_position(board: Board, active: Player, dice: Dice, config: GameConfig) -> Self {
        Self::build(board, active, dice, random_source(config.seed), config)
    }

    fn build(board: Board, active: Player, dice: Dice, rng: StdRng, config: GameConfig) -> Self {
        let mut state = GameState {
            board,
            active,
            dice,
            winner: board.winner(),
            turn: 1,
            rng,
            config,
            subscribers: Vec::new(),
            closed: false,
        };
        state.settle();
        log::debug!("new game, {} to move with {}", state.active, state.dice);
        Game { state: Mutex::new(state) }
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    pub fn winner(&self) -> Option<Player> {
        self.lock().winner
    }

    /// Channel notified of every change, meant for the player of `color`.
    pub fn subscribe(&self, color: Player) -> Receiver<StateChanged> {
        self.add_subscriber(Some(color))
    }

    /// Channel notified of every change, for spectators.
    pub fn observe(&self) -> Receiver<StateChanged> {
        self.add_subscriber(None)
    }

    fn add_subscriber(&self, color: Option<Player>) -> Receiver<StateChanged> {
        let (sender, receiver) = mpsc::channel();
        let mut state = self.lock();
        if !state.closed {
            state.subscribers.push(Subscriber { color, sender });
        }
        receiver
    }

    /// Drops every subscriber channel, waking up whoever blocks on one.
    /// Channels handed out afterwards are disconnected from the start.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.subscribers.clear();
    }

    /// Moves one checker of `color` from `position` by the signed `distance`.
    pub fn move_checker(&self, color: Player, position: u8, distance: i8) -> Result<(), MoveError> {
        self.lock()
            .move_checker(color, position, distance)
            .inspect_err(|err| log::debug!("{} move {} by {} rejected: {}", color, position, distance, err))
    }

    /// Plays a whole turn at once. The sequence has to be one of the turns
    /// [`legal_moves`] allows for the remaining dice.
    pub fn play(&self, color: Player, sequence: &MoveSequence) -> Result<(), MoveError> {
        self.lock()
            .play(color, sequence)
            .inspect_err(|err| log::debug!("{} sequence {} rejected: {}", color, sequence, err))
    }

    pub fn player(&self, color: Player) -> PlayerHandle<'_> {
        PlayerHandle { game: self, color }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Access to a game on behalf of one color.
#[derive(Clone, Copy)]
pub struct PlayerHandle<'a> {
    game: &'a Game,
    color: Player,
}

impl PlayerHandle<'_> {
    pub fn color(&self) -> Player {
        self.color
    }

    /// Moves the checker on `position` by `die` pips in this color's direction.
    pub fn move_checker(&self, position: u8, die: u8) -> Result<(), MoveError> {
        let distance = i8::try_from(die).map_err(|_| MoveError::DieNotAvailable(die))?;
        self.game.move_checker(self.color, position, self.color.sign() * distance)
    }

    pub fn play(&self, sequence: &MoveSequence) -> Result<(), MoveError> {
        self.game.play(self.color, sequence)
    }

    pub fn subscribe(&self) -> Receiver<StateChanged> {
        self.game.subscribe(self.color)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot()
    }

    pub fn is_active(&self) -> bool {
        let snapshot = self.game.snapshot();
        snapshot.active == self.color && !snapshot.is_finished()
    }
}
