//! Game board representation and collision detection

use ratatui::style::Color;

/// Board dimensions
pub const BOARD_WIDTH: usize = 22;
pub const BOARD_HEIGHT: usize = 40;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [EMPTY_ROW; BOARD_HEIGHT],
        }
    }

    /// Get the cell at a position (col, row)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self
            .cells
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a block at (x, y) would be obstructed.
    ///
    /// Obstructed means outside the side walls, at or below the floor, or on an
    /// occupied cell. Rows above the top (y < 0) are open as long as x is in bounds.
    pub fn blocks(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
            return true;
        }
        y >= 0 && self.get(x, y).is_some_and(|cell| cell.is_filled())
    }

    /// Remove every fully occupied row, sweeping from the bottom up.
    ///
    /// Each removed row is replaced by an empty row at the top and the same
    /// index is checked again, since the row above has shifted into it.
    /// Returns the number of rows cleared.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut row = BOARD_HEIGHT;

        while row > 0 {
            let y = row - 1;
            if self.is_line_full(y) {
                self.cells.copy_within(0..y, 1);
                self.cells[0] = EMPTY_ROW;
                cleared += 1;
            } else {
                row -= 1;
            }
        }

        cleared
    }

    /// Check if a line is completely filled
    pub fn is_line_full(&self, y: usize) -> bool {
        self.cells[y].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.cells.iter().enumerate()
    }
}
