//! Token movement: hop animation and logical tile stepping.
//!
//! - [`MovementController`]: one movement in flight at a time, stepped per
//!   frame, committing each landed tile to the player state
//! - [`curve`]: the arced hop with its bounce

pub mod curve;
mod controller;

pub use controller::{MoveMode, MovementController, MovementFinished};
pub use curve::{control_point, hop_position, quadratic_bezier};
