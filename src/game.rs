//! Core game state and logic

use crate::board::{Board, Cell};
use crate::generator::PieceGenerator;
use crate::piece::Piece;
use crate::tetromino::Tetromino;
use std::time::Duration;
use tracing::{debug, info};

/// Time between gravity steps. Constant: there is no level speedup.
pub const DROP_INTERVAL: Duration = Duration::from_millis(1000);

/// Game lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Start screen, nothing is simulated
    NotPlaying,
    Playing,
    Paused,
    /// Waiting for the player to acknowledge the loss
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
}

/// Things that happened inside the simulation, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A piece was written into the board
    PieceFixed(Tetromino),
    /// The sweep after a fix removed this many rows
    LinesCleared(usize),
    /// A fix left cells above the top row
    GameOver,
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    /// The game board
    pub board: Board,
    /// Current falling piece
    pub current_piece: Piece,
    /// Current game state
    pub state: GameState,
    /// Piece randomizer
    generator: PieceGenerator,
    /// Time accumulated toward the next gravity step
    drop_counter: Duration,
    /// Events not yet taken by the presentation layer
    events: Vec<GameEvent>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create a new game on the start screen
    pub fn new() -> Self {
        Self::with_generator(PieceGenerator::new())
    }

    /// Create a new game with a fixed piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_generator(PieceGenerator::with_seed(seed))
    }

    fn with_generator(mut generator: PieceGenerator) -> Self {
        let first = generator.next();
        Self {
            board: Board::new(),
            current_piece: Piece::new(first),
            state: GameState::NotPlaying,
            generator,
            drop_counter: Duration::ZERO,
            events: Vec::new(),
        }
    }

    /// Start a fresh round: empty board, new piece, timer reset
    pub fn start(&mut self) {
        self.board = Board::new();
        self.current_piece = Piece::new(self.generator.next());
        self.drop_counter = Duration::ZERO;
        self.events.clear();
        self.state = GameState::Playing;
        info!(piece = ?self.current_piece.kind, "game started");
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
            debug!("game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
            debug!("game resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => self.pause(),
            GameState::Paused => self.resume(),
            _ => {}
        }
    }

    /// Dismiss the game over notice and return to the start screen
    pub fn acknowledge_game_over(&mut self) {
        if self.state == GameState::GameOver {
            self.state = GameState::NotPlaying;
            debug!("game over acknowledged");
        }
    }

    /// Time accumulated toward the next gravity step
    pub fn drop_counter(&self) -> Duration {
        self.drop_counter
    }

    /// Take all events emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Process a player action. Ignored unless the game is running.
    pub fn process_action(&mut self, action: Action) {
        if self.state != GameState::Playing {
            return;
        }
        match action {
            Action::MoveLeft => {
                self.current_piece.move_left(&self.board);
            }
            Action::MoveRight => {
                self.current_piece.move_right(&self.board);
            }
            Action::Rotate => {
                self.current_piece.rotate(&self.board);
            }
            Action::SoftDrop => {
                self.move_down();
            }
            Action::HardDrop => self.hard_drop(),
        }
    }

    /// Advance the drop timer by `elapsed` (call every frame)
    pub fn update(&mut self, elapsed: Duration) {
        if self.state != GameState::Playing {
            return;
        }

        self.drop_counter += elapsed;
        if self.drop_counter > DROP_INTERVAL {
            self.move_down();
            self.drop_counter = Duration::ZERO;
        }
    }

    /// Move the piece down one row. If it lands, fix it and spawn the next one.
    /// Returns true if the piece moved.
    fn move_down(&mut self) -> bool {
        self.current_piece.y += 1;
        if self.current_piece.collides(&self.board) {
            self.current_piece.y -= 1;
            // Spawned into the stack: back off like a hard drop so the fix tops out
            if self.current_piece.collides(&self.board) {
                self.current_piece.y -= 1;
            }
            self.fix_piece();
            self.spawn_piece();
            return false;
        }
        true
    }

    /// Drop the piece straight to the first collision, then fix it
    fn hard_drop(&mut self) {
        while !self.current_piece.collides(&self.board) {
            self.current_piece.y += 1;
        }
        self.current_piece.y -= 1;
        self.fix_piece();
        self.spawn_piece();
    }

    /// Write the current piece into the board and sweep for full rows
    fn fix_piece(&mut self) {
        let piece = &self.current_piece;
        let cell = Cell::Filled(piece.color);
        let mut topped_out = false;

        for (x, y) in piece.cells() {
            if y < 0 {
                topped_out = true;
            } else {
                self.board.set(x, y, cell);
            }
        }

        debug!(piece = ?piece.kind, x = piece.x, y = piece.y, "piece fixed");
        self.events.push(GameEvent::PieceFixed(piece.kind));

        let cleared = self.board.clear_lines();
        if cleared > 0 {
            info!(lines = cleared, "lines cleared");
            self.events.push(GameEvent::LinesCleared(cleared));
        }

        if topped_out {
            info!("game over: piece fixed above the top row");
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
        }
    }

    /// Replace the current piece with a fresh random one.
    /// A spawn that already overlaps the stack is not detected here; the next fix catches it.
    fn spawn_piece(&mut self) {
        self.current_piece = Piece::new(self.generator.next());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
    use ratatui::style::Color;

    const BOTTOM: i32 = BOARD_HEIGHT as i32 - 1;
    const GRAY: Cell = Cell::Filled(Color::Gray);

    fn playing(seed: u64) -> Game {
        let mut game = Game::with_seed(seed);
        game.start();
        game
    }

    fn place(game: &mut Game, kind: Tetromino) {
        game.current_piece = Piece::new(kind);
    }

    #[test]
    fn test_new_game_waits_on_start_screen() {
        let mut game = Game::with_seed(3);
        assert_eq!(game.state, GameState::NotPlaying);

        let before = game.current_piece.clone();
        game.process_action(Action::SoftDrop);
        game.update(Duration::from_secs(10));
        assert_eq!(game.current_piece, before);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_start_resets_board() {
        let mut game = playing(3);
        game.board.set(0, BOTTOM, GRAY);
        game.update(Duration::from_millis(400));
        game.start();

        assert!(game.board.is_empty());
        assert_eq!(game.drop_counter(), Duration::ZERO);
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn test_drop_waits_for_interval() {
        let mut game = playing(5);
        let start_y = game.current_piece.y;

        game.update(Duration::from_millis(600));
        game.update(Duration::from_millis(400));
        // Exactly one interval is not enough
        assert_eq!(game.current_piece.y, start_y);
        assert_eq!(game.drop_counter(), DROP_INTERVAL);

        game.update(Duration::from_millis(16));
        assert_eq!(game.current_piece.y, start_y + 1);
        assert_eq!(game.drop_counter(), Duration::ZERO);
    }

    #[test]
    fn test_one_step_per_update_even_after_long_frame() {
        let mut game = playing(5);
        let start_y = game.current_piece.y;
        game.update(Duration::from_secs(5));
        assert_eq!(game.current_piece.y, start_y + 1);
        assert_eq!(game.drop_counter(), Duration::ZERO);
    }

    #[test]
    fn test_paused_time_is_not_counted() {
        let mut game = playing(5);
        let start_y = game.current_piece.y;

        game.update(Duration::from_millis(900));
        game.pause();
        game.update(Duration::from_secs(30));
        game.process_action(Action::HardDrop);
        assert_eq!(game.current_piece.y, start_y);
        assert!(game.board.is_empty());

        game.resume();
        game.update(Duration::from_millis(50));
        assert_eq!(game.current_piece.y, start_y);
        game.update(Duration::from_millis(60));
        assert_eq!(game.current_piece.y, start_y + 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game = playing(1);
        game.toggle_pause();
        assert_eq!(game.state, GameState::Paused);
        game.toggle_pause();
        assert_eq!(game.state, GameState::Playing);

        let mut idle = Game::with_seed(1);
        idle.toggle_pause();
        assert_eq!(idle.state, GameState::NotPlaying);
    }

    #[test]
    fn test_i_piece_lands_on_bottom_row() {
        let mut game = playing(11);
        place(&mut game, Tetromino::I);

        let mut steps = 0;
        while game.take_events().is_empty() {
            game.process_action(Action::SoftDrop);
            steps += 1;
            assert!(steps <= BOARD_HEIGHT, "piece never landed");
        }

        for x in 10..14 {
            assert_eq!(game.board.get(x, BOTTOM), Some(Cell::Filled(Tetromino::I.color())));
        }
        assert_eq!(game.board.get(9, BOTTOM), Some(Cell::Empty));
        assert_eq!(game.board.get(14, BOTTOM), Some(Cell::Empty));
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn test_fix_that_fills_row_clears_it() {
        let mut game = playing(11);
        for x in 0..BOARD_WIDTH as i32 {
            if !(10..14).contains(&x) {
                game.board.set(x, BOTTOM, GRAY);
            }
        }
        game.board.set(0, BOTTOM - 1, GRAY);
        place(&mut game, Tetromino::I);

        game.process_action(Action::HardDrop);

        let events = game.take_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PieceFixed(Tetromino::I),
                GameEvent::LinesCleared(1)
            ]
        );
        assert_eq!(game.board.get(0, BOTTOM), Some(GRAY));
        assert_eq!(game.board.get(1, BOTTOM), Some(Cell::Empty));
    }

    #[test]
    fn test_hard_drop_matches_repeated_soft_drops() {
        for seed in 0..8 {
            let mut hard = playing(seed);
            let mut soft = playing(seed);
            for game in [&mut hard, &mut soft] {
                game.board.set(11, 30, GRAY);
                game.board.set(3, BOTTOM, GRAY);
            }
            assert_eq!(hard.current_piece, soft.current_piece);

            hard.process_action(Action::HardDrop);
            while soft.take_events().is_empty() {
                soft.process_action(Action::SoftDrop);
            }

            assert_eq!(hard.board, soft.board, "seed {seed}");
            assert_eq!(hard.current_piece, soft.current_piece, "seed {seed}");
        }
    }

    #[test]
    fn test_fix_spawns_replacement() {
        let mut game = playing(9);
        place(&mut game, Tetromino::O);
        game.current_piece.y = BOTTOM - 1;

        game.process_action(Action::SoftDrop);

        assert_eq!(game.current_piece.y, 0);
        assert_eq!(game.current_piece.x, 10);
        assert_eq!(game.board.get(10, BOTTOM), Some(Cell::Filled(Tetromino::O.color())));
    }

    #[test]
    fn test_fix_above_top_is_game_over() {
        let mut game = playing(2);
        // Stack up to row 0 under the spawn columns, leaving the edge column open
        for y in 0..BOARD_HEIGHT as i32 {
            for x in 1..BOARD_WIDTH as i32 {
                game.board.set(x, y, GRAY);
            }
        }
        place(&mut game, Tetromino::I);

        // Spawned on top of the stack: not detected until the fix
        assert!(game.current_piece.collides(&game.board));
        assert_eq!(game.state, GameState::Playing);

        game.process_action(Action::HardDrop);

        assert_eq!(game.state, GameState::GameOver);
        let events = game.take_events();
        assert_eq!(events.first(), Some(&GameEvent::PieceFixed(Tetromino::I)));
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
    }

    #[test]
    fn test_gravity_on_a_full_stack_is_game_over() {
        let mut game = playing(2);
        for y in 0..BOARD_HEIGHT as i32 {
            for x in 1..BOARD_WIDTH as i32 {
                game.board.set(x, y, GRAY);
            }
        }
        place(&mut game, Tetromino::I);
        let stack = game.board.clone();

        game.update(DROP_INTERVAL + Duration::from_millis(1));

        assert_eq!(game.state, GameState::GameOver);
        assert_eq!(game.take_events().last(), Some(&GameEvent::GameOver));
        // The bar backed off to row -1, so none of it was written
        assert_eq!(game.board, stack);
    }

    #[test]
    fn test_soft_drop_on_a_full_stack_is_game_over() {
        for seed in 0..8 {
            let mut game = playing(seed);
            for y in 0..BOARD_HEIGHT as i32 {
                for x in 1..BOARD_WIDTH as i32 {
                    game.board.set(x, y, GRAY);
                }
            }

            game.process_action(Action::SoftDrop);

            assert_eq!(game.state, GameState::GameOver, "seed {seed}");
        }
    }

    #[test]
    fn test_partial_top_out_writes_visible_cells() {
        let mut game = playing(2);
        for x in 0..BOARD_WIDTH as i32 {
            if x != 10 {
                game.board.set(x, 1, GRAY);
            }
        }
        game.board.set(10, 2, GRAY);
        place(&mut game, Tetromino::J);
        // 100 / 111 with its top row above the board; row 1 stops the bottom row
        game.current_piece.y = -1;

        game.process_action(Action::SoftDrop);

        assert_eq!(game.state, GameState::GameOver);
        // The bottom row of the J went into row 0; the cell at row -1 was dropped
        assert_eq!(game.board.get(10, 0), Some(Cell::Filled(Tetromino::J.color())));
        assert_eq!(game.board.get(12, 0), Some(Cell::Filled(Tetromino::J.color())));
    }

    #[test]
    fn test_game_over_blocks_input_until_acknowledged() {
        let mut game = playing(2);
        game.state = GameState::GameOver;
        let before = game.current_piece.clone();

        game.process_action(Action::MoveLeft);
        game.update(Duration::from_secs(2));
        assert_eq!(game.current_piece, before);

        game.acknowledge_game_over();
        assert_eq!(game.state, GameState::NotPlaying);
        game.start();
        assert_eq!(game.state, GameState::Playing);
        assert!(game.board.is_empty());
    }

    #[test]
    fn test_moves_and_rotation_through_actions() {
        let mut game = playing(4);
        place(&mut game, Tetromino::T);
        game.current_piece.y = 10;

        game.process_action(Action::MoveLeft);
        assert_eq!(game.current_piece.x, 9);
        game.process_action(Action::MoveRight);
        game.process_action(Action::MoveRight);
        assert_eq!(game.current_piece.x, 11);
        game.process_action(Action::Rotate);
        assert_eq!(game.current_piece.shape, Tetromino::T.shape().rotated_cw());
        assert!(game.take_events().is_empty());
    }
}
