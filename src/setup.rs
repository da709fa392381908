use crate::board::Board;
use crate::coord::Coordinate;
use crate::piece::{Piece, PieceId, initial_kind_and_color};

/// Fill every cell of `board` with its starting piece.
///
/// Each piece's id is the index of the cell it starts on.
pub fn populate(board: &mut Board) {
    for coord in Coordinate::all() {
        let (kind, color) = initial_kind_and_color(coord.x(), coord.y(), coord.z());
        let piece = Piece::new(PieceId(coord.index() as u16), kind, color, coord);
        board.set(coord, piece);
    }
}

/// A fresh, fully populated board.
pub fn standard_board() -> Board {
    let mut board = Board::empty();
    populate(&mut board);
    board
}
