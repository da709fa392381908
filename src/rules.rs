//! Move legality for every piece kind across the stacked layers.
//!
//! Everything here is a pure read of the board. Rule violations come back
//! as `false`, never as errors.

use crate::board::Board;
use crate::coord::{Coordinate, in_bounds};
use crate::piece::{Color, Piece, PieceKind};

/// Is moving `piece` from `from` to `to` legal on `board`?
///
/// Rejects off-board destinations, null moves, a `from` cell that does not
/// hold `piece`, and destinations held by the mover's own color before
/// looking at the piece's movement pattern.
pub fn is_legal(board: &Board, piece: &Piece, from: Coordinate, to: Coordinate) -> bool {
    if !in_bounds(to.x(), to.y(), to.z()) || from == to {
        return false;
    }

    match board.get(from) {
        Some(occupant) if occupant.id() == piece.id() => {}
        _ => return false,
    }

    if let Some(target) = board.get(to) {
        if target.color() == piece.color() {
            return false;
        }
    }

    match piece.kind() {
        PieceKind::Pawn => pawn_move(board, piece.color(), from, to),
        PieceKind::Knight => knight_move(from, to),
        PieceKind::Bishop => bishop_move(board, from, to),
        PieceKind::Rook => rook_move(board, from, to),
        PieceKind::Queen => rook_move(board, from, to) || bishop_move(board, from, to),
        PieceKind::King => king_move(from, to),
    }
}

/// Does the move change layers?
pub fn is_transition(from: Coordinate, to: Coordinate) -> bool {
    from.z() != to.z()
}

/// Every destination `is_legal` accepts for the piece on `from`.
pub fn legal_destinations(board: &Board, from: Coordinate) -> Vec<Coordinate> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    Coordinate::all()
        .filter(|&to| is_legal(board, piece, from, to))
        .collect()
}

/// True iff every cell strictly between `from` and `to` is empty.
///
/// Only meaningful for straight lines and diagonals: each axis steps by the
/// sign of its delta until `to` is reached.
pub fn path_clear(board: &Board, from: Coordinate, to: Coordinate) -> bool {
    let (dx, dy, dz) = from.delta(to);
    let (sx, sy, sz) = (dx.signum(), dy.signum(), dz.signum());
    let steps = dx.abs().max(dy.abs()).max(dz.abs());

    (1..steps).all(|i| board.get_at(from.x() + sx * i, from.y() + sy * i, from.z() + sz * i).is_none())
}

fn pawn_move(board: &Board, color: Color, from: Coordinate, to: Coordinate) -> bool {
    let (dx, dy, dz) = from.delta(to);
    let forward = color.pawn_direction();

    if dz != 0 {
        // Layer switch: straight up or down one layer, whatever is there
        return dx == 0 && dy == 0 && dz.abs() == 1;
    }

    if dy != forward {
        return false;
    }

    match dx.abs() {
        0 => board.is_empty_at(to),
        1 => !board.is_empty_at(to),
        _ => false,
    }
}

fn knight_move(from: Coordinate, to: Coordinate) -> bool {
    let (dx, dy, dz) = from.delta(to);
    let (ax, ay) = (dx.abs(), dy.abs());

    dz.abs() <= 1 && ((ax == 1 && ay == 2) || (ax == 2 && ay == 1))
}

fn bishop_move(board: &Board, from: Coordinate, to: Coordinate) -> bool {
    let (dx, dy, dz) = from.delta(to);
    let (ax, ay, az) = (dx.abs(), dy.abs(), dz.abs());

    if ax == 0 || ax != ay {
        return false;
    }

    if dz == 0 {
        return path_clear(board, from, to);
    }

    // Cross-layer diagonals skip the path check
    az == ax
}

fn rook_move(board: &Board, from: Coordinate, to: Coordinate) -> bool {
    let (dx, dy, dz) = from.delta(to);
    let moving_axes = [dx, dy, dz].iter().filter(|&&d| d != 0).count();

    moving_axes == 1 && path_clear(board, from, to)
}

fn king_move(from: Coordinate, to: Coordinate) -> bool {
    let (dx, dy, dz) = from.delta(to);

    match dz.abs() {
        0 => dx.abs() <= 1 && dy.abs() <= 1,
        1 => dx == 0 && dy == 0,
        _ => false,
    }
}
