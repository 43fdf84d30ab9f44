//! Core board types: errors, configuration, RNG streams, player state.
//!
//! Everything here is independent of how the board is animated or how
//! effects resolve. The session object in [`game`](crate::game) threads
//! these values through the other components.

pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use config::{BoardConfig, CategoryRules, MinigameRewards, MovementConfig};
pub use error::{BoardError, SceneError};
pub use rng::{BoardRng, CATEGORY_STREAM, DICE_STREAM, EFFECT_STREAM};
pub use state::{GamePhase, PlayerState, RollRecord};
