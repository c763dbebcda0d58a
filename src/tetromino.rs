//! Tetromino definitions and shape matrices
//!
//! Eight fixed shapes, each stored as a small binary matrix whose top-left
//! cell is the piece's anchor on the board.

use ratatui::style::Color;

/// Largest matrix any shape (or its rotation) can occupy
pub const MAX_SHAPE_SIZE: usize = 4;

/// The 8 tetromino kinds, in generator index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,        // long bar
    J,
    L,
    O,        // square
    S,
    Z,
    T,
    Diagonal, // three cells corner to corner
}

impl Tetromino {
    pub const ALL: [Tetromino; 8] = [
        Tetromino::I,
        Tetromino::J,
        Tetromino::L,
        Tetromino::O,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::T,
        Tetromino::Diagonal,
    ];

    /// Pastel color token for this tetromino
    pub fn color(&self) -> Color {
        match self {
            Tetromino::I => Color::Rgb(0xff, 0xff, 0xcc),
            Tetromino::J => Color::Rgb(0xff, 0xcc, 0xcc),
            Tetromino::L => Color::Rgb(0xff, 0xcc, 0x99),
            Tetromino::O => Color::Rgb(0xff, 0x99, 0x99),
            Tetromino::S => Color::Rgb(0xff, 0x99, 0x66),
            Tetromino::Z => Color::Rgb(0xcc, 0xcc, 0xff),
            Tetromino::T => Color::Rgb(0xcc, 0x99, 0x99),
            Tetromino::Diagonal => Color::Rgb(0x99, 0xcc, 0xcc),
        }
    }

    /// The spawn orientation of this tetromino
    pub fn shape(&self) -> Shape {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[1, 1, 1, 1]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1]],
            Tetromino::Diagonal => &[&[0, 0, 1], &[0, 1, 0], &[1, 0, 0]],
        };
        Shape::from_rows(rows)
    }
}

/// A binary shape matrix of `rows` × `cols` cells.
///
/// Cells outside `rows` × `cols` are always false, so two shapes compare
/// equal exactly when their matrices match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Build a shape from rows of 0/1 values. Every row must have the same length.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let cols = rows.first().map_or(0, |row| row.len());
        for (r, row) in rows.iter().enumerate() {
            debug_assert_eq!(row.len(), cols, "ragged shape matrix");
            for (c, &value) in row.iter().enumerate() {
                cells[r][c] = value != 0;
            }
        }
        Self {
            cells,
            rows: rows.len(),
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Offsets (row, col) of every filled cell, row-major
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols)
                .filter(move |&c| self.cells[r][c])
                .map(move |c| (r as i32, c as i32))
        })
    }

    /// Rotate 90° clockwise: transpose, then reverse the row order.
    /// `new[i][j] = old[last_row - j][i]`
    pub fn rotated_cw(&self) -> Shape {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for i in 0..self.cols {
            for j in 0..self.rows {
                cells[i][j] = self.cells[self.rows - 1 - j][i];
            }
        }
        Shape {
            cells,
            rows: self.cols,
            cols: self.rows,
        }
    }
}
