use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MoveError;

/// Cells along each axis of a layer.
pub const BOARD_SIDE: usize = 8;
/// Number of stacked layers.
pub const LAYER_COUNT: usize = 8;
/// Total addressable cells.
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE * LAYER_COUNT;

/// True iff every component lies in `[0, 8)`.
///
/// This is the only range check in the crate; everything else goes through
/// `Coordinate::new` or calls this directly.
pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
    let side = BOARD_SIDE as i32;
    let layers = LAYER_COUNT as i32;
    (0..side).contains(&x) && (0..side).contains(&y) && (0..layers).contains(&z)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct RawCoordinate {
    x: i32,
    y: i32,
    z: i32,
}

/// A validated cell address. `z` selects the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    x: u8,
    y: u8,
    z: u8,
}

impl Coordinate {
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self, MoveError> {
        if !in_bounds(x, y, z) {
            return Err(MoveError::OutOfBounds { x, y, z });
        }
        Ok(Coordinate {
            x: x as u8,
            y: y as u8,
            z: z as u8,
        })
    }

    pub fn x(&self) -> i32 {
        self.x as i32
    }

    pub fn y(&self) -> i32 {
        self.y as i32
    }

    pub fn z(&self) -> i32 {
        self.z as i32
    }

    /// Dense index into a 512-cell array (x fastest, then y, then layer).
    pub fn index(&self) -> usize {
        self.x as usize + BOARD_SIDE * (self.y as usize + BOARD_SIDE * self.z as usize)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        Some(Coordinate {
            x: (index % BOARD_SIDE) as u8,
            y: ((index / BOARD_SIDE) % BOARD_SIDE) as u8,
            z: (index / (BOARD_SIDE * BOARD_SIDE)) as u8,
        })
    }

    /// The cell at the given offset, if it is on the board.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Coordinate::new(self.x() + dx, self.y() + dy, self.z() + dz).ok()
    }

    /// Signed component-wise difference `to - self`.
    pub fn delta(&self, to: Coordinate) -> (i32, i32, i32) {
        (to.x() - self.x(), to.y() - self.y(), to.z() - self.z())
    }

    /// Iterate over all 512 cells in index order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..CELL_COUNT).filter_map(Coordinate::from_index)
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = MoveError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.x, raw.y, raw.z)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            x: c.x(),
            y: c.y(),
            z: c.z(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds_edges() {
        assert!(in_bounds(0, 0, 0));
        assert!(in_bounds(7, 7, 7));
        assert!(!in_bounds(8, 0, 0));
        assert!(!in_bounds(0, -1, 0));
        assert!(!in_bounds(0, 0, 8));
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = Coordinate::new(3, 8, 1).unwrap_err();
        assert!(matches!(err, MoveError::OutOfBounds { x: 3, y: 8, z: 1 }));
    }

    #[test]
    fn test_index_matches_from_index() {
        let c = Coordinate::new(5, 2, 6).unwrap();
        assert_eq!(c.index(), 5 + 8 * 2 + 64 * 6);
        assert_eq!(Coordinate::from_index(c.index()), Some(c));
        assert_eq!(Coordinate::from_index(CELL_COUNT), None);
        assert_eq!(Coordinate::all().count(), CELL_COUNT);
    }

    #[test]
    fn test_offset_stays_on_board() {
        let c = Coordinate::new(0, 7, 3).unwrap();
        assert_eq!(c.offset(1, -1, 1), Some(Coordinate::new(1, 6, 4).unwrap()));
        assert_eq!(c.offset(-1, 0, 0), None);
        assert_eq!(c.offset(0, 1, 0), None);
    }

    #[test]
    fn test_deserialize_goes_through_bounds_check() {
        let ok: Coordinate = serde_json::from_str(r#"{"x":1,"y":2,"z":3}"#).unwrap();
        assert_eq!(ok, Coordinate::new(1, 2, 3).unwrap());
        assert!(serde_json::from_str::<Coordinate>(r#"{"x":1,"y":2,"z":9}"#).is_err());
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"x":1,"y":2,"z":3}"#
        );
    }
}
