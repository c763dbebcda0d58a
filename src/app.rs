//! Application controller: owns the game and routes input, frames and
//! simulation events to the right collaborators

use crate::audio::AudioManager;
use crate::background::Background;
use crate::game::{Game, GameEvent, GameState};
use crate::input::{Command, map_key};
use crate::menu::{Menu, MenuAction, MenuChange};
use crate::settings::Settings;
use crate::ui::{self, GameLayout};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Frame, layout::Rect};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Whether the main loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub game: Game,
    pub menu: Menu,
    pub settings: Settings,
    pub audio: AudioManager,
    /// Where the background preference is written; None disables saving
    settings_path: Option<PathBuf>,
    /// Layout for the last known terminal size, used for mouse hit testing
    layout: Option<GameLayout>,
}

impl App {
    pub fn new(
        game: Game,
        settings: Settings,
        audio: AudioManager,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let menu = Menu::new(settings.background(), !audio.is_muted());
        Self {
            game,
            menu,
            settings,
            audio,
            settings_path,
            layout: None,
        }
    }

    pub fn background(&self) -> Background {
        self.settings.background()
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.game.state {
            GameState::NotPlaying => ui::render_start(frame, &self.menu),
            GameState::Playing | GameState::Paused | GameState::GameOver => {
                ui::render_game(frame, &self.game, self.background(), !self.audio.is_muted());
            }
        }
    }

    /// Recompute the layout for a new terminal size
    pub fn resize(&mut self, width: u16, height: u16) {
        self.layout = GameLayout::compute(Rect::new(0, 0, width, height));
        debug!(
            width,
            height,
            block_size = self.layout.as_ref().map_or(0, |l| l.block_size),
            "layout recomputed"
        );
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, elapsed: Duration) {
        self.game.update(elapsed);
        self.dispatch_events();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        match self.game.state {
            GameState::NotPlaying => self.handle_menu_key(key),
            GameState::Playing | GameState::Paused => self.handle_round_key(key),
            GameState::GameOver => self.handle_game_over_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        match key.code {
            KeyCode::Up => self.menu.move_up(),
            KeyCode::Down => self.menu.move_down(),
            KeyCode::Left => {
                let change = self.menu.adjust_left();
                self.apply_menu_change(change);
            }
            KeyCode::Right => {
                let change = self.menu.adjust_right();
                self.apply_menu_change(change);
            }
            KeyCode::Enter => {
                let (action, change) = self.menu.activate();
                self.apply_menu_change(change);
                match action {
                    Some(MenuAction::StartGame) => self.start_game(),
                    Some(MenuAction::Quit) => return Flow::Quit,
                    None => {}
                }
            }
            KeyCode::Char('m') | KeyCode::Char('M') => self.toggle_sound(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    fn handle_round_key(&mut self, key: KeyEvent) -> Flow {
        match map_key(key, true) {
            Some(Command::Game(action)) => {
                self.game.process_action(action);
                self.dispatch_events();
            }
            Some(Command::TogglePause) => self.game.toggle_pause(),
            Some(Command::ToggleSound) => self.toggle_sound(),
            Some(Command::Quit) => return Flow::Quit,
            Some(Command::Confirm) | None => {}
        }
        Flow::Continue
    }

    fn handle_game_over_key(&mut self, key: KeyEvent) -> Flow {
        match map_key(key, false) {
            Some(Command::Confirm) => self.acknowledge_game_over(),
            Some(Command::ToggleSound) => self.toggle_sound(),
            Some(Command::Quit) => return Flow::Quit,
            Some(Command::Game(_) | Command::TogglePause) | None => {}
        }
        Flow::Continue
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let (column, row) = (mouse.column, mouse.row);

        match self.game.state {
            GameState::Playing => {
                let Some(layout) = self.layout.clone() else {
                    return;
                };
                if ui::contains(layout.sound, column, row) {
                    self.toggle_sound();
                } else if let Some(button) = layout.button_at(column, row) {
                    self.game.process_action(button.action());
                    self.dispatch_events();
                } else if ui::contains(layout.board, column, row) {
                    self.game.pause();
                }
            }
            // The pause overlay covers the screen: any click resumes
            GameState::Paused => self.game.resume(),
            GameState::GameOver => self.acknowledge_game_over(),
            GameState::NotPlaying => {}
        }
    }

    fn start_game(&mut self) {
        self.game.start();
        self.audio.start_background();
    }

    fn acknowledge_game_over(&mut self) {
        self.game.acknowledge_game_over();
        self.menu.selected = 0;
    }

    fn toggle_sound(&mut self) {
        let enabled = self.audio.toggle_mute();
        self.menu.sync_sound(enabled);
    }

    fn apply_menu_change(&mut self, change: Option<MenuChange>) {
        match change {
            Some(MenuChange::Background(background)) => self.set_background(background),
            Some(MenuChange::Sound(enabled)) => {
                if enabled == self.audio.is_muted() {
                    self.audio.toggle_mute();
                }
            }
            None => {}
        }
    }

    /// Store the new background and write it out immediately
    fn set_background(&mut self, background: Background) {
        self.settings.set_background(background);
        info!(background = background.id(), "background selected");
        if let Some(path) = &self.settings_path {
            if let Err(e) = self.settings.save_to(path) {
                warn!("Could not save settings: {}", e);
            }
        }
    }

    /// Hand simulation events to the audio layer
    fn dispatch_events(&mut self) {
        for event in self.game.take_events() {
            self.audio.handle_event(&event);
            if event == GameEvent::GameOver {
                self.menu.selected = 0;
            }
        }
    }
}
