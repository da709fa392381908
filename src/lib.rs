pub mod board;
pub mod config;
pub mod coord;
pub mod error;
pub mod game;
pub mod piece;
pub mod rules;
pub mod setup;
pub mod stats;
pub mod web;

pub use board::*;
pub use config::*;
pub use coord::*;
pub use error::*;
pub use game::*;
pub use piece::*;
pub use rules::*;
pub use setup::*;
pub use stats::*;
