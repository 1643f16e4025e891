//! hatetris core crate - well geometry, piece catalog and board rows.

mod board;
mod config;
mod piece;

pub use board::{Board, BoardError};
pub use config::{ConfigError, Row, WellConfig};
pub use piece::{Mask, Piece, BOX_SIZE};
