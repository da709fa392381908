use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coord::{Coordinate, LAYER_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Order used by the transit-layer derivation.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn symbol(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Direction of travel along y for pawns.
    pub fn pawn_direction(&self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Stable identity assigned at setup: the cell index the piece started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u16);

/// The immutable part of a piece, as recorded in move history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceIdentity {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
}

/// A piece on the board. Owned by exactly one cell; not `Copy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    position: Coordinate,
    move_count: u32,
    transition_count: u32,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, color: Color, position: Coordinate) -> Self {
        Piece {
            id,
            kind,
            color,
            position,
            move_count: 0,
            transition_count: 0,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn transition_count(&self) -> u32 {
        self.transition_count
    }

    pub fn identity(&self) -> PieceIdentity {
        PieceIdentity {
            id: self.id,
            kind: self.kind,
            color: self.color,
        }
    }

    /// Uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }

    pub(crate) fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }

    pub(crate) fn record_move(&mut self, crossed_layers: bool) {
        self.move_count += 1;
        if crossed_layers {
            self.transition_count += 1;
        }
    }
}

/// Home layers carry the back-rank layout.
pub fn is_home_layer(layer: i32) -> bool {
    layer == 0 || layer == LAYER_COUNT as i32 - 1
}

/// Kind and color of the piece that starts on `(x, y, layer)`.
///
/// Home layers lay out a back rank along y (rook, knight, bishop, queen,
/// king, bishop, knight, rook) with White on `x < 4`. Transit layers derive
/// both from `x + y + layer`, so the whole board is reproducible.
pub fn initial_kind_and_color(x: i32, y: i32, layer: i32) -> (PieceKind, Color) {
    if is_home_layer(layer) {
        let kind = match y {
            0 | 7 => PieceKind::Rook,
            1 | 6 => PieceKind::Knight,
            2 | 5 => PieceKind::Bishop,
            3 => PieceKind::Queen,
            _ => PieceKind::King,
        };
        let color = if x < 4 { Color::White } else { Color::Black };
        return (kind, color);
    }

    let sum = x + y + layer;
    let kind = PieceKind::ALL[sum.rem_euclid(PieceKind::ALL.len() as i32) as usize];
    let color = if sum.rem_euclid(2) == 0 {
        Color::White
    } else {
        Color::Black
    };
    (kind, color)
}
