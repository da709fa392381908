use serde::{Deserialize, Serialize};

use crate::coord::LAYER_COUNT;
use crate::game::GameState;
use crate::piece::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorCounts {
    pub white: usize,
    pub black: usize,
}

/// Read-only summary of a game, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_pieces: usize,
    pub total_moves: usize,
    pub transition_count: usize,
    /// Layers holding at least one piece.
    pub active_layers: usize,
    pub pieces_per_layer: [usize; LAYER_COUNT],
    pub pieces_by_color: ColorCounts,
}

pub fn summarize(state: &GameState) -> Stats {
    let board = state.board();
    let pieces_per_layer = board.layer_counts();

    let mut pieces_by_color = ColorCounts::default();
    for piece in board.pieces() {
        match piece.color() {
            Color::White => pieces_by_color.white += 1,
            Color::Black => pieces_by_color.black += 1,
        }
    }

    Stats {
        total_pieces: pieces_per_layer.iter().sum(),
        total_moves: state.history().len(),
        transition_count: state.transition_count(),
        active_layers: pieces_per_layer.iter().filter(|&&n| n > 0).count(),
        pieces_per_layer,
        pieces_by_color,
    }
}
