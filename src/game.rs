use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::board::Board;
use crate::coord::{Coordinate, LAYER_COUNT};
use crate::error::MoveError;
use crate::piece::{Color, PieceIdentity};
use crate::rules::{is_legal, is_transition, legal_destinations};
use crate::setup::standard_board;

/// One applied move. Never changed once it is in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceIdentity,
    pub from: Coordinate,
    pub to: Coordinate,
    pub captured: Option<PieceIdentity>,
    pub crossed_layers: bool,
    /// Zero-based position in the history.
    pub sequence: usize,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        if let Some(captured) = &self.captured {
            write!(f, " x{:?}", captured.kind)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    history: Vec<Move>,
    active: Color,
    transition_count: usize,
}

/// Borrowed snapshot of everything a reader may look at.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StateView<'a> {
    pub board: &'a Board,
    pub active: Color,
    pub history: &'a [Move],
    pub transition_count: usize,
    pub layer_counts: [usize; LAYER_COUNT],
}

impl GameState {
    /// Create a new game on the standard layout, White to move.
    pub fn new() -> Self {
        let state = Self::with_board(standard_board());
        info!(pieces = state.board.occupied_count(), "new game created");
        state
    }

    /// Start from an arbitrary position with White to move.
    pub fn with_board(board: Board) -> Self {
        GameState {
            board,
            history: Vec::new(),
            active: Color::White,
            transition_count: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_color(&self) -> Color {
        self.active
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transition_count
    }

    pub fn view(&self) -> StateView<'_> {
        StateView {
            board: &self.board,
            active: self.active,
            history: &self.history,
            transition_count: self.transition_count,
            layer_counts: self.board.layer_counts(),
        }
    }

    /// Validate and apply a move for the player on turn.
    ///
    /// All checks run before the board is touched; on error the state is
    /// exactly as it was.
    pub fn apply_move(&mut self, from: Coordinate, to: Coordinate) -> Result<Move, MoveError> {
        let result = self.try_apply(from, to);
        match &result {
            Ok(mv) => debug!(
                sequence = mv.sequence,
                piece = ?mv.piece.kind,
                color = %mv.piece.color,
                %from,
                %to,
                captured = ?mv.captured.map(|c| c.kind),
                crossed_layers = mv.crossed_layers,
                "move applied"
            ),
            Err(e) => debug!(%from, %to, error = %e, "move rejected"),
        }
        result
    }

    fn try_apply(&mut self, from: Coordinate, to: Coordinate) -> Result<Move, MoveError> {
        let piece = self.board.get(from).ok_or(MoveError::NoPieceAtOrigin(from))?;

        if piece.color() != self.active {
            return Err(MoveError::NotCurrentPlayersTurn(from));
        }

        if !is_legal(&self.board, piece, from, to) {
            return Err(MoveError::IllegalMove { from, to });
        }

        let identity = piece.identity();
        let crossed_layers = is_transition(from, to);

        // Checks passed; everything below mutates
        let captured = self.board.move_piece(from, to)?;
        if let Some(moved) = self.board.get_mut(to) {
            moved.record_move(crossed_layers);
        }
        if crossed_layers {
            self.transition_count += 1;
        }

        let mv = Move {
            piece: identity,
            from,
            to,
            captured: captured.as_ref().map(|p| p.identity()),
            crossed_layers,
            sequence: self.history.len(),
            timestamp: Utc::now(),
        };
        self.history.push(mv.clone());
        self.active = self.active.opponent();

        Ok(mv)
    }

    /// Every legal `(from, to)` pair for the player on turn.
    pub fn legal_moves(&self) -> Vec<(Coordinate, Coordinate)> {
        self.board
            .pieces()
            .filter(|p| p.color() == self.active)
            .flat_map(|p| {
                let from = p.position();
                legal_destinations(&self.board, from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a fresh, fully populated game.
pub fn new_game() -> GameState {
    GameState::new()
}

pub fn apply_move(state: &mut GameState, from: Coordinate, to: Coordinate) -> Result<Move, MoveError> {
    state.apply_move(from, to)
}

pub fn get_state(state: &GameState) -> StateView<'_> {
    state.view()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, PieceId, PieceKind};

    fn at(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(x, y, z).unwrap()
    }

    fn put(board: &mut Board, kind: PieceKind, color: Color, c: Coordinate) {
        board
            .place(c, Piece::new(PieceId(c.index() as u16), kind, color, c))
            .unwrap();
    }

    #[test]
    fn test_new_game_starts_with_white() {
        let game = new_game();
        assert_eq!(game.active_color(), Color::White);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.transition_count(), 0);
        assert_eq!(game.board().occupied_count(), 512);
    }

    #[test]
    fn test_new_game_is_deterministic() {
        assert_eq!(new_game().board(), new_game().board());
    }

    #[test]
    fn test_opening_capture_on_home_layer() {
        let mut game = new_game();

        // White knight on (3,1,0) takes the black bishop on (5,2,0)
        let mv = game.apply_move(at(3, 1, 0), at(5, 2, 0)).unwrap();
        assert_eq!(mv.piece.kind, PieceKind::Knight);
        assert_eq!(mv.captured.map(|c| (c.kind, c.color)), Some((PieceKind::Bishop, Color::Black)));
        assert!(!mv.crossed_layers);
        assert_eq!(mv.sequence, 0);

        assert!(game.board().get(at(3, 1, 0)).is_none());
        let knight = game.board().get(at(5, 2, 0)).unwrap();
        assert_eq!(knight.id(), mv.piece.id);
        assert_eq!(knight.move_count(), 1);
        assert_eq!(game.board().occupied_count(), 511);
        assert_eq!(game.active_color(), Color::Black);
    }

    #[test]
    fn test_layer_switch_counts_transition() {
        let mut game = new_game();

        // White pawn on (0,5,1) drops onto the black knight at (0,5,2)
        let mv = game.apply_move(at(0, 5, 1), at(0, 5, 2)).unwrap();
        assert!(mv.crossed_layers);
        assert_eq!(game.transition_count(), 1);

        let pawn = game.board().get(at(0, 5, 2)).unwrap();
        assert_eq!(pawn.kind(), PieceKind::Pawn);
        assert_eq!(pawn.transition_count(), 1);
        assert_eq!(game.board().layer_count(1), 63);
        assert_eq!(game.board().layer_count(2), 64);
    }

    #[test]
    fn test_no_piece_at_origin() {
        let mut game = GameState::with_board(Board::empty());
        let err = game.apply_move(at(0, 0, 0), at(0, 1, 0)).unwrap_err();
        assert_eq!(err, MoveError::NoPieceAtOrigin(at(0, 0, 0)));
    }

    #[test]
    fn test_wrong_color_is_rejected_without_change() {
        let mut game = new_game();
        let before = game.board().clone();

        // (4,1,0) is a black knight
        let err = game.apply_move(at(4, 1, 0), at(2, 2, 0)).unwrap_err();
        assert_eq!(err, MoveError::NotCurrentPlayersTurn(at(4, 1, 0)));
        assert_eq!(game.board(), &before);
        assert_eq!(game.active_color(), Color::White);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_self_capture_is_illegal_move() {
        let mut game = new_game();
        let before = game.board().clone();

        // (3,1,0) knight to (1,2,0) is an L-shape onto a white bishop
        let err = game.apply_move(at(3, 1, 0), at(1, 2, 0)).unwrap_err();
        assert_eq!(
            err,
            MoveError::IllegalMove {
                from: at(3, 1, 0),
                to: at(1, 2, 0)
            }
        );
        assert_eq!(game.board(), &before);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_turns_alternate_and_history_grows() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, at(0, 0, 0));
        put(&mut board, PieceKind::King, Color::Black, at(7, 7, 7));
        let mut game = GameState::with_board(board);

        let script = [
            (at(0, 0, 0), at(0, 0, 1)),
            (at(7, 7, 7), at(6, 7, 7)),
            (at(0, 0, 1), at(1, 1, 1)),
            (at(6, 7, 7), at(6, 7, 6)),
        ];

        for (n, (from, to)) in script.into_iter().enumerate() {
            let mv = game.apply_move(from, to).unwrap();
            assert_eq!(mv.sequence, n);
            let expected = if (n + 1) % 2 == 0 { Color::White } else { Color::Black };
            assert_eq!(game.active_color(), expected);
        }

        assert_eq!(game.move_count(), 4);
        assert_eq!(game.transition_count(), 2);
        assert!(game.history().windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_legal_moves_only_for_active_color() {
        let mut board = Board::empty();
        put(&mut board, PieceKind::King, Color::White, at(0, 0, 0));
        put(&mut board, PieceKind::Rook, Color::Black, at(7, 7, 7));
        let game = GameState::with_board(board);

        let moves = game.legal_moves();
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|(from, _)| *from == at(0, 0, 0)));
    }

    #[test]
    fn test_view_reflects_state() {
        let mut game = new_game();
        game.apply_move(at(3, 1, 0), at(5, 2, 0)).unwrap();

        let view = get_state(&game);
        assert_eq!(view.active, Color::Black);
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.layer_counts[0], 63);
        assert_eq!(view.layer_counts.iter().sum::<usize>(), view.board.occupied_count());

        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["active"], "Black");
        assert_eq!(json["history"][0]["piece"]["kind"], "Knight");
    }

    #[test]
    fn test_free_apply_move_matches_method() {
        let mut game = new_game();
        let mv = apply_move(&mut game, at(3, 1, 0), at(5, 2, 0)).unwrap();
        assert_eq!(game.history().last(), Some(&mv));
    }
}
