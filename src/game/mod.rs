//! The play session tying the board components together.

mod board;

pub use board::Board;
