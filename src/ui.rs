//! Terminal UI rendering with ratatui
//!
//! The board is drawn as a pixel surface: each terminal cell holds two
//! vertically stacked pixels using the upper half block glyph, and every
//! board block is `block_size` × `block_size` pixels.

use crate::background::Background;
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board, Cell};
use crate::game::{Game, GameState};
use crate::input::ControlButton;
use crate::menu::{Menu, MenuItem, MenuItemType};
use crate::piece::Piece;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Outline drawn around blocks that are big enough to show one
const BLOCK_OUTLINE: Color = Color::Rgb(0x8b, 0x6f, 0x4a);
const HALF_BLOCK: &str = "▀";
/// Each control button is drawn as " ◀ " followed by a one column gap
const BUTTON_WIDTH: u16 = 3;
const BUTTON_GAP: u16 = 1;
const SOUND_LABEL_WIDTH: u16 = 14;

/// Block edge in pixels for a surface of `width` × `height_px` pixels:
/// the largest whole size at which the full board fits.
pub fn block_size(width: u16, height_px: u16) -> u16 {
    (width / BOARD_WIDTH as u16).min(height_px / BOARD_HEIGHT as u16)
}

/// Where everything on the game screen goes for a given terminal area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    pub block_size: u16,
    pub board: Rect,
    pub sound: Rect,
    pub controls: Vec<(ControlButton, Rect)>,
}

impl GameLayout {
    /// Lay out the game screen. Returns None if the terminal cannot fit even
    /// a one-pixel block.
    pub fn compute(area: Rect) -> Option<Self> {
        // One line above the board for the sound label, one below for controls
        let usable_lines = area.height.saturating_sub(2);
        let size = block_size(area.width, usable_lines.saturating_mul(2));
        if size == 0 {
            return None;
        }

        let width = BOARD_WIDTH as u16 * size;
        let height = (BOARD_HEIGHT as u16 * size).div_ceil(2);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + 1 + (usable_lines - height) / 2;
        let board = Rect::new(x, y, width, height);

        let sound = Rect::new(x, y - 1, SOUND_LABEL_WIDTH.min(width), 1);

        let strip = ControlButton::all().len() as u16 * (BUTTON_WIDTH + BUTTON_GAP) - BUTTON_GAP;
        let mut button_x = x + width.saturating_sub(strip) / 2;
        let controls = ControlButton::all()
            .iter()
            .map(|&button| {
                let rect = Rect::new(button_x, board.bottom(), BUTTON_WIDTH, 1);
                button_x += BUTTON_WIDTH + BUTTON_GAP;
                (button, rect)
            })
            .collect();

        Some(Self {
            block_size: size,
            board,
            sound,
            controls,
        })
    }

    /// The control button under a terminal position, if any
    pub fn button_at(&self, column: u16, row: u16) -> Option<ControlButton> {
        self.controls
            .iter()
            .find(|(_, rect)| contains(*rect, column, row))
            .map(|(button, _)| *button)
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// The settled board plus the falling piece, painted as half-block pixels
pub struct BoardView<'a> {
    pub board: &'a Board,
    pub piece: Option<&'a Piece>,
    pub background: Background,
    pub block_size: u16,
}

impl BoardView<'_> {
    /// Block colors with the active piece laid over the settled cells
    fn block_colors(&self) -> [[Option<Color>; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut colors = [[None; BOARD_WIDTH]; BOARD_HEIGHT];
        for (y, row) in self.board.rows() {
            for (x, cell) in row.iter().enumerate() {
                if let Cell::Filled(color) = cell {
                    colors[y][x] = Some(*color);
                }
            }
        }
        if let Some(piece) = self.piece {
            for (x, y) in piece.cells() {
                if (0..BOARD_WIDTH as i32).contains(&x) && (0..BOARD_HEIGHT as i32).contains(&y) {
                    colors[y as usize][x as usize] = Some(piece.color);
                }
            }
        }
        colors
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let size = self.block_size.max(1);
        let width_px = BOARD_WIDTH as u16 * size;
        let height_px = BOARD_HEIGHT as u16 * size;
        let colors = self.block_colors();

        let pixel = |px: u16, py: u16| -> Color {
            if px >= width_px || py >= height_px {
                return Color::Reset;
            }
            match colors[(py / size) as usize][(px / size) as usize] {
                Some(color) => {
                    let (ix, iy) = (px % size, py % size);
                    let edge = ix == 0 || iy == 0 || ix == size - 1 || iy == size - 1;
                    if size >= 3 && edge { BLOCK_OUTLINE } else { color }
                }
                None => self.background.color_at(py, height_px),
            }
        };

        for row in 0..area.height {
            for col in 0..area.width.min(width_px) {
                let top = pixel(col, row * 2);
                let bottom = pixel(col, row * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// Render the start screen
pub fn render_start(frame: &mut Frame, menu: &Menu) {
    let area = frame.area();
    let menu_area = center_rect(area, 40, 16);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(menu_area);

    let title = Paragraph::new(vec![
        Line::raw(""),
        Line::styled("B L O C K F A L L", Style::default().fg(Color::Rgb(0xff, 0x99, 0x66)).bold()),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLOCK_OUTLINE));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = vec![Line::raw("")];
    for (i, item) in menu.items.iter().enumerate() {
        lines.push(render_menu_item(item, i == menu.selected));
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "↑↓ Select  ←→ Change  Enter Confirm",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render a single menu item based on its type
fn render_menu_item(item: &MenuItem, is_selected: bool) -> Line<'static> {
    let prefix = if is_selected { "▶ " } else { "  " };

    let base_style = if is_selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };

    match &item.item_type {
        MenuItemType::Button(_) => Line::styled(format!("{}{}", prefix, item.label), base_style),
        MenuItemType::SoundToggle { value } => {
            let (text, color) = if *value { ("ON", Color::Green) } else { ("OFF", Color::Red) };
            Line::from(vec![
                Span::styled(format!("{}{}: ", prefix, item.label), base_style),
                Span::styled(format!("< {} >", text), Style::default().fg(color).bold()),
            ])
        }
        MenuItemType::BackgroundCycle { current } => {
            let name = Background::all()
                .get(*current)
                .map_or("None", |bg| bg.name());
            Line::from(vec![
                Span::styled(format!("{}{}: ", prefix, item.label), base_style),
                Span::styled(format!("< {} >", name), Style::default().fg(Color::Cyan)),
            ])
        }
    }
}

/// Render the board, the sound label, the control strip and any overlay
pub fn render_game(frame: &mut Frame, game: &Game, background: Background, sound_on: bool) {
    let area = frame.area();
    let Some(layout) = GameLayout::compute(area) else {
        render_too_small(frame, area);
        return;
    };

    let sound_text = if sound_on { "♪ Sound: ON" } else { "♪ Sound: OFF" };
    frame.render_widget(
        Paragraph::new(Line::styled(sound_text, Style::default().fg(Color::Gray))),
        layout.sound,
    );

    let piece = match game.state {
        GameState::Playing | GameState::Paused => Some(&game.current_piece),
        GameState::NotPlaying | GameState::GameOver => None,
    };
    frame.render_widget(
        BoardView {
            board: &game.board,
            piece,
            background,
            block_size: layout.block_size,
        },
        layout.board,
    );

    for (button, rect) in &layout.controls {
        frame.render_widget(
            Paragraph::new(format!(" {} ", button.label()))
                .style(Style::default().fg(Color::Black).bg(Color::Rgb(0xff, 0xcc, 0x99))),
            *rect,
        );
    }

    match game.state {
        GameState::Paused => render_overlay(frame, area, "PAUSED", "Click or press P to resume"),
        GameState::GameOver => {
            render_overlay(frame, area, "Oops, you lost!", "Press Enter or click to continue")
        }
        GameState::Playing | GameState::NotPlaying => {}
    }
}

fn render_too_small(frame: &mut Frame, area: Rect) {
    let min_width = BOARD_WIDTH;
    let min_height = BOARD_HEIGHT / 2 + 2;
    let text = vec![
        Line::styled("Terminal too small", Style::default().fg(Color::Yellow).bold()),
        Line::raw(format!("Need at least {}×{}", min_width, min_height)),
    ];
    let rect = center_rect(area, area.width, 2);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), rect);
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// The rect covered by a centered overlay box
fn overlay_rect(area: Rect) -> Rect {
    center_rect(area, 36, 5)
}

/// Render a centered message box over the board
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let rect = overlay_rect(area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLOCK_OUTLINE));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}
