use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::coord::{BOARD_SIDE, CELL_COUNT, Coordinate, LAYER_COUNT, in_bounds};
use crate::error::{BoardError, MoveError};
use crate::piece::Piece;

/// Dense 8x8x8 occupancy grid. Each cell owns at most one piece.
///
/// `cells` always has exactly `CELL_COUNT` entries; deserialization checks
/// this and rebuilds the layer counters from the cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    cells: Box<[Option<Piece>]>,
    /// Occupied cells per layer, kept in step with `cells`.
    layer_counts: [usize; LAYER_COUNT],
}

/// Wire form of a board. Any serialized `layer_counts` is ignored.
#[derive(Deserialize)]
struct RawBoard {
    cells: Vec<Option<Piece>>,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.cells.len() != CELL_COUNT {
            return Err(BoardError::WrongCellCount {
                found: raw.cells.len(),
                expected: CELL_COUNT,
            });
        }

        let mut layer_counts = [0; LAYER_COUNT];
        let mut seen = HashSet::new();
        for (index, piece) in raw.cells.iter().enumerate() {
            let Some(piece) = piece else { continue };
            let recorded = piece.position();
            if recorded.index() != index {
                return Err(BoardError::MisplacedPiece { index, recorded });
            }
            if !seen.insert(piece.id()) {
                return Err(BoardError::DuplicatePiece { id: piece.id().0 });
            }
            layer_counts[recorded.z() as usize] += 1;
        }

        Ok(Board {
            cells: raw.cells.into_boxed_slice(),
            layer_counts,
        })
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: vec![None; CELL_COUNT].into_boxed_slice(),
            layer_counts: [0; LAYER_COUNT],
        }
    }

    /// Read a cell. Empty and off-board cells both read as `None`.
    pub fn get(&self, coord: Coordinate) -> Option<&Piece> {
        self.cells.get(coord.index()).and_then(Option::as_ref)
    }

    /// Same as `get` for a raw triple; off-board reads as empty.
    pub fn get_at(&self, x: i32, y: i32, z: i32) -> Option<&Piece> {
        Coordinate::new(x, y, z).ok().and_then(|c| self.get(c))
    }

    pub fn is_empty_at(&self, coord: Coordinate) -> bool {
        self.get(coord).is_none()
    }

    /// Put `piece` on `coord`, replacing any occupant. Returns the displaced piece.
    ///
    /// The piece's recorded position is updated to `coord`.
    pub fn place(&mut self, coord: Coordinate, piece: Piece) -> Result<Option<Piece>, MoveError> {
        if !in_bounds(coord.x(), coord.y(), coord.z()) {
            return Err(MoveError::OutOfBounds {
                x: coord.x(),
                y: coord.y(),
                z: coord.z(),
            });
        }
        Ok(self.set(coord, piece))
    }

    /// `place` without the bounds gate, for callers holding a validated coordinate.
    pub(crate) fn set(&mut self, coord: Coordinate, mut piece: Piece) -> Option<Piece> {
        piece.set_position(coord);
        let displaced = self.cells[coord.index()].replace(piece);
        if displaced.is_none() {
            self.layer_counts[coord.z() as usize] += 1;
        }
        displaced
    }

    /// Detach and return the occupant, leaving the cell empty.
    pub fn remove(&mut self, coord: Coordinate) -> Option<Piece> {
        let taken = self.cells.get_mut(coord.index()).and_then(Option::take);
        if taken.is_some() {
            self.layer_counts[coord.z() as usize] -= 1;
        }
        taken
    }

    /// Relocate the piece on `from` to `to`, returning whatever was captured there.
    ///
    /// Both cells are checked before anything is touched, so an error leaves
    /// the board unchanged.
    pub fn move_piece(&mut self, from: Coordinate, to: Coordinate) -> Result<Option<Piece>, MoveError> {
        if self.is_empty_at(from) {
            return Err(MoveError::NoPieceAtOrigin(from));
        }
        if from == to {
            return Ok(None);
        }

        let captured = self.remove(to);
        let Some(mut piece) = self.remove(from) else {
            return Err(MoveError::NoPieceAtOrigin(from));
        };
        piece.set_position(to);

        self.cells[to.index()] = Some(piece);
        self.layer_counts[to.z() as usize] += 1;
        Ok(captured)
    }

    /// Mutable access for the game state's counter bookkeeping.
    pub(crate) fn get_mut(&mut self, coord: Coordinate) -> Option<&mut Piece> {
        self.cells.get_mut(coord.index()).and_then(Option::as_mut)
    }

    pub fn layer_count(&self, layer: usize) -> usize {
        self.layer_counts.get(layer).copied().unwrap_or(0)
    }

    pub fn layer_counts(&self) -> [usize; LAYER_COUNT] {
        self.layer_counts
    }

    /// Number of occupied cells, from the per-layer counters.
    pub fn occupied_count(&self) -> usize {
        self.layer_counts.iter().sum()
    }

    /// Occupied cells in index order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().filter_map(Option::as_ref)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for z in 0..LAYER_COUNT as i32 {
            writeln!(f, "[layer {}]", z)?;
            write!(f, "   ")?;
            for x in 0..BOARD_SIDE {
                write!(f, "{} ", x)?;
            }
            writeln!(f)?;

            // Highest y first so White's pawns advance up the page
            for y in (0..BOARD_SIDE as i32).rev() {
                write!(f, "{:2} ", y)?;
                for x in 0..BOARD_SIDE as i32 {
                    let c = self.get_at(x, y, z).map_or('.', Piece::symbol);
                    write!(f, "{} ", c)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
