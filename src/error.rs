use thiserror::Error;

use crate::coord::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Coordinate ({x}, {y}, {z}) is off the board")]
    OutOfBounds { x: i32, y: i32, z: i32 },
    #[error("No piece at {0}")]
    NoPieceAtOrigin(Coordinate),
    #[error("Piece at {0} belongs to the player not on move")]
    NotCurrentPlayersTurn(Coordinate),
    #[error("Illegal move: {from} -> {to}")]
    IllegalMove { from: Coordinate, to: Coordinate },
}

/// Rejections when loading a serialized board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Board has {found} cells, expected {expected}")]
    WrongCellCount { found: usize, expected: usize },
    #[error("Piece in cell {index} records its position as {recorded}")]
    MisplacedPiece { index: usize, recorded: Coordinate },
    #[error("Piece id {id} appears more than once")]
    DuplicatePiece { id: u16 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address {value:?}: {source}")]
    InvalidAddress {
        value: String,
        source: std::net::AddrParseError,
    },
}
