//! Active falling piece logic

use crate::board::{BOARD_WIDTH, Board};
use crate::tetromino::{Shape, Tetromino};
use ratatui::style::Color;

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub kind: Tetromino,
    /// Current orientation of the shape matrix
    pub shape: Shape,
    pub color: Color,
    /// Board position of the shape matrix's top-left cell.
    /// `y` may be negative while the piece is above the top row.
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a new piece at spawn position: horizontally centered, top row
    pub fn new(kind: Tetromino) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            color: kind.color(),
            x: BOARD_WIDTH as i32 / 2 - 1,
            y: 0,
        }
    }

    /// Absolute (x, y) board positions of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled()
            .map(|(row, col)| (self.x + col, self.y + row))
    }

    /// Whether the piece shifted by (dx, dy) would sit in an open position
    pub fn is_valid_move(&self, board: &Board, dx: i32, dy: i32) -> bool {
        self.cells().all(|(x, y)| !board.blocks(x + dx, y + dy))
    }

    /// Whether the piece overlaps a wall, the floor, or a settled block right now
    pub fn collides(&self, board: &Board) -> bool {
        self.cells().any(|(x, y)| board.blocks(x, y))
    }

    /// Whether `candidate` would collide if placed at this piece's position
    pub fn rotation_collides(&self, board: &Board, candidate: &Shape) -> bool {
        candidate
            .filled()
            .any(|(row, col)| board.blocks(self.x + col, self.y + row))
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self, board: &Board) -> bool {
        self.shift(board, -1)
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self, board: &Board) -> bool {
        self.shift(board, 1)
    }

    fn shift(&mut self, board: &Board, dx: i32) -> bool {
        if self.is_valid_move(board, dx, 0) {
            self.x += dx;
            true
        } else {
            false
        }
    }

    /// Try to rotate clockwise in place. There are no kicks: a rotation that
    /// would collide is rejected and the shape is left unchanged.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let rotated = self.shape.rotated_cw();
        if self.rotation_collides(board, &rotated) {
            return false;
        }
        self.shape = rotated;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_HEIGHT, Cell};

    #[test]
    fn test_spawn_position() {
        let piece = Piece::new(Tetromino::T);
        assert_eq!(piece.x, 10);
        assert_eq!(piece.y, 0);
        assert_eq!(piece.color, Tetromino::T.color());
    }

    #[test]
    fn test_cells() {
        let piece = Piece::new(Tetromino::O);
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(10, 0), (11, 0), (10, 1), (11, 1)]);
    }

    #[test]
    fn test_resting_position_is_valid() {
        let board = Board::new();
        for kind in Tetromino::ALL {
            let piece = Piece::new(kind);
            assert!(piece.is_valid_move(&board, 0, 0), "{kind:?}");
            assert!(!piece.collides(&board), "{kind:?}");
        }
    }

    #[test]
    fn test_walls_stop_horizontal_moves() {
        let board = Board::new();
        let mut piece = Piece::new(Tetromino::I);
        while piece.move_left(&board) {}
        assert_eq!(piece.x, 0);
        assert!(!piece.is_valid_move(&board, -1, 0));

        while piece.move_right(&board) {}
        assert_eq!(piece.x, BOARD_WIDTH as i32 - 4);
    }

    #[test]
    fn test_invalid_move_implies_collision() {
        let mut board = Board::new();
        board.set(12, 20, Cell::Filled(Color::Red));
        board.set(0, 5, Cell::Filled(Color::Red));

        for kind in Tetromino::ALL {
            let mut piece = Piece::new(kind);
            for y in -3..BOARD_HEIGHT as i32 + 2 {
                for x in -4..BOARD_WIDTH as i32 + 2 {
                    piece.x = x;
                    piece.y = y;
                    if !piece.is_valid_move(&board, 0, 0) {
                        assert!(piece.collides(&board), "{kind:?} at ({x}, {y})");
                    }
                    let valid = piece.is_valid_move(&board, 1, 1);
                    piece.x += 1;
                    piece.y += 1;
                    assert_eq!(valid, !piece.collides(&board), "{kind:?} at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_rotation_blocked_by_floor_is_rejected() {
        let board = Board::new();
        let mut piece = Piece::new(Tetromino::I);
        piece.y = BOARD_HEIGHT as i32 - 1;
        let before = piece.clone();

        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotation_near_wall_has_no_kick() {
        let board = Board::new();
        let mut piece = Piece::new(Tetromino::I);
        piece.shape = piece.shape.rotated_cw();
        piece.x = BOARD_WIDTH as i32 - 1;
        piece.y = 5;

        // Back to horizontal would poke three cells through the right wall
        assert!(!piece.rotate(&board));
        assert_eq!(piece.x, BOARD_WIDTH as i32 - 1);
        assert_eq!(piece.shape.rows(), 4);
    }

    #[test]
    fn test_rotation_commits_when_clear() {
        let board = Board::new();
        let mut piece = Piece::new(Tetromino::L);
        piece.y = 5;
        assert!(piece.rotate(&board));
        assert_eq!(piece.shape, Tetromino::L.shape().rotated_cw());
    }

    #[test]
    fn test_cells_above_top_do_not_collide() {
        let mut board = Board::new();
        board.set(10, 0, Cell::Filled(Color::Red));
        let mut piece = Piece::new(Tetromino::I);
        piece.y = -1;
        assert!(!piece.collides(&board));
        assert!(!piece.is_valid_move(&board, 0, 1));
    }
}
