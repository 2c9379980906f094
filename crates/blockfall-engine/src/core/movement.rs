//! Collision detection and piece movement against a [`Board`].
//!
//! Every operation is pure: a rejected move or rotation is reported as `None`
//! and the caller keeps its original piece.

use super::{
    board::Board,
    piece::{Piece, RotationDirection},
};

impl Board {
    /// Returns `true` if the piece fits on the board.
    ///
    /// Every occupied cell must lie in `0..width` horizontally and above the
    /// floor (`< height`). There is no upper bound: cells above row 0 are
    /// accepted so pieces may overhang the top edge. Cells on the board must
    /// be empty.
    #[must_use]
    pub fn can_place(&self, piece: &Piece) -> bool {
        piece.cells().all(|(x, y)| {
            let Ok(x) = usize::try_from(x) else {
                return false;
            };
            if x >= self.width() {
                return false;
            }
            match usize::try_from(y) {
                Ok(y) => y < self.height() && self.cell(x, y).is_some_and(|c| c.is_empty()),
                Err(_) => true,
            }
        })
    }
}

impl Piece {
    /// Translates the piece by `(dx, dy)` if the result fits on the board.
    #[must_use]
    pub fn try_move(&self, board: &Board, dx: i16, dy: i16) -> Option<Self> {
        let moved = self.translated(dx, dy);
        board.can_place(&moved).then_some(moved)
    }

    /// Rotates the piece in place if the result fits on the board.
    ///
    /// No wall kicks are attempted: a rotation that collides at the current
    /// position is rejected.
    #[must_use]
    pub fn try_rotate(&self, board: &Board, direction: RotationDirection) -> Option<Self> {
        let rotated = self.rotated(direction);
        board.can_place(&rotated).then_some(rotated)
    }

    /// Returns the lowest position reachable by moving straight down.
    ///
    /// Used both for hard drops and for the ghost preview. Terminates within
    /// `height` steps because every move increases `y` and the floor rejects.
    #[must_use]
    pub fn find_hard_drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while let Some(piece) = dropped.try_move(board, 0, 1) {
            dropped = piece;
        }
        dropped
    }

    /// Returns `true` when the piece rests on the floor or the stack.
    #[must_use]
    pub fn should_lock(&self, board: &Board) -> bool {
        self.try_move(board, 0, 1).is_none()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{
        board::Cell,
        piece::{PieceKind, PiecePosition, PieceRotation},
    };

    use super::*;

    fn piece_at(kind: PieceKind, rotation: i32, x: i16, y: i16) -> Piece {
        Piece::new(kind, PieceRotation::new(rotation), PiecePosition::new(x, y))
    }

    #[test]
    fn test_can_place_bounds() {
        let board = Board::standard();
        // Horizontal I occupies row y + 1, columns x..x + 4
        assert!(board.can_place(&piece_at(PieceKind::I, 0, 0, 0)));
        assert!(board.can_place(&piece_at(PieceKind::I, 0, 6, 0)));
        assert!(!board.can_place(&piece_at(PieceKind::I, 0, -1, 0)));
        assert!(!board.can_place(&piece_at(PieceKind::I, 0, 7, 0)));
        assert!(board.can_place(&piece_at(PieceKind::I, 0, 0, 18)));
        assert!(!board.can_place(&piece_at(PieceKind::I, 0, 0, 19)));
    }

    #[test]
    fn test_can_place_allows_overhang_above_top() {
        let board = Board::standard();
        assert!(board.can_place(&piece_at(PieceKind::I, 1, 0, -3)));
        assert!(board.can_place(&piece_at(PieceKind::T, 0, 3, -5)));
    }

    #[test]
    fn test_can_place_negative_x_with_empty_columns() {
        let board = Board::standard();
        // Vertical I lives in matrix column 2
        assert!(board.can_place(&piece_at(PieceKind::I, 1, -2, 0)));
        assert!(!board.can_place(&piece_at(PieceKind::I, 1, -3, 0)));
    }

    #[test]
    fn test_can_place_detects_overlap() {
        let mut board = Board::standard();
        board.set_cell(4, 19, Cell::Filled(PieceKind::O));
        assert!(!board.can_place(&piece_at(PieceKind::O, 0, 3, 18)));
        assert!(board.can_place(&piece_at(PieceKind::O, 0, 5, 18)));
    }

    #[test]
    fn test_try_move_rejects_and_keeps_original() {
        let board = Board::standard();
        let piece = piece_at(PieceKind::O, 0, 0, 0);

        assert_eq!(piece.try_move(&board, -1, 0), None);
        assert_eq!(piece.try_move(&board, -1, 0), None);
        assert_eq!(piece.position(), PiecePosition::new(0, 0));

        let moved = piece.try_move(&board, 1, 2).unwrap();
        assert_eq!(moved.position(), PiecePosition::new(1, 2));
    }

    #[test]
    fn test_try_rotate_rejects_against_wall() {
        let board = Board::standard();
        // Vertical I hugging the left wall: rotating back to horizontal would
        // put cells at x = -2 and x = -1
        let piece = piece_at(PieceKind::I, 1, -2, 5);
        assert_eq!(piece.try_rotate(&board, RotationDirection::Clockwise), None);
        assert_eq!(
            piece.try_rotate(&board, RotationDirection::CounterClockwise),
            None
        );

        let free = piece_at(PieceKind::I, 1, 3, 5);
        let rotated = free
            .try_rotate(&board, RotationDirection::Clockwise)
            .unwrap();
        assert_eq!(rotated.rotation(), PieceRotation::new(2));
        assert_eq!(rotated.position(), free.position());
    }

    #[test]
    fn test_try_rotate_rejects_against_stack() {
        let mut board = Board::standard();
        let piece = piece_at(PieceKind::T, 0, 3, 10);
        // Clockwise T adds a cell at matrix (1, 2)
        board.set_cell(4, 12, Cell::Filled(PieceKind::Z));
        assert_eq!(piece.try_rotate(&board, RotationDirection::Clockwise), None);
    }

    #[test]
    fn test_hard_drop_on_empty_board() {
        let board = Board::standard();
        let piece = Piece::spawn(PieceKind::I, board.width());
        let dropped = piece.find_hard_drop_position(&board);

        assert_eq!(dropped.position(), PiecePosition::new(3, 18));
        assert!(dropped.should_lock(&board));
        assert!(!piece.should_lock(&board));
    }

    #[test]
    fn test_hard_drop_onto_stack() {
        let mut board = Board::standard();
        board.set_cell(4, 15, Cell::Filled(PieceKind::L));
        let piece = Piece::spawn(PieceKind::O, board.width());
        let dropped = piece.find_hard_drop_position(&board);

        // O occupies matrix rows 0..2, so it rests with its bottom on row 14
        assert_eq!(dropped.position(), PiecePosition::new(3, 13));
        assert!(dropped.should_lock(&board));
    }

    #[test]
    fn test_hard_drop_when_already_resting() {
        let mut board = Board::standard();
        for x in 0..10 {
            board.set_cell(x, 2, Cell::Filled(PieceKind::J));
        }
        let piece = Piece::spawn(PieceKind::T, board.width());
        assert!(piece.should_lock(&board));
        assert_eq!(piece.find_hard_drop_position(&board), piece);
    }
}
