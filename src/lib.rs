//! # rust-pathquest
//!
//! Core of a single-player, turn-based board game played along a linear
//! path of tiles.
//!
//! The player rolls a die and the token hops tile by tile. Tiles carry a
//! category: checkpoints award score, event tiles fire a randomly drawn
//! effect, minigame tiles hand control to an external minigame whose win or
//! loss comes back as score and a tile correction. Reaching the last tile
//! wins; running out of turns loses.
//!
//! ## Design Principles
//!
//! 1. **Cooperative, single-threaded**: the [`Board`] is a state machine
//!    advanced by `tick(dt)`. Delays are queued tasks, never sleeps.
//!
//! 2. **Closed effect set**: effects are one tagged enum, resolved by a
//!    single resolver that returns followups instead of scheduling them.
//!
//! 3. **Deterministic**: every random draw comes from a seeded stream, so a
//!    seed and the same inputs replay the same game.
//!
//! ## Modules
//!
//! - `core`: errors, configuration, RNG streams, player state
//! - `path`: tiles, the ordered path and category distribution
//! - `movement`: hop animation and tile stepping
//! - `effects`: effect variants, the resolver and the weighted table
//! - `dispatch`: what a tile does when the token stops on it
//! - `bridge`: minigame outcome to score and tile deltas
//! - `turns`: turn advance and end conditions
//! - `schedule`: the delayed task queue
//! - `collab`: sound, UI and scene collaborator traits
//! - `game`: the [`Board`] session tying it all together

pub mod bridge;
pub mod collab;
pub mod core;
pub mod dispatch;
pub mod effects;
pub mod game;
pub mod movement;
pub mod path;
pub mod schedule;
pub mod turns;

// Re-export commonly used types
pub use crate::core::{
    BoardConfig, BoardError, BoardRng, CategoryRules, GamePhase, MinigameRewards,
    MovementConfig, PlayerState, SceneError,
};

pub use crate::path::{Path, Tile, TileCategory};

pub use crate::movement::{MoveMode, MovementController, MovementFinished};

pub use crate::effects::{EffectEntry, EffectResolver, EffectTable, Prompt, TileEffect};

pub use crate::dispatch::{Dispatch, MinigameId, MinigameRoster, TileEffectDispatcher};

pub use crate::bridge::{MinigameOutcome, MinigameResultBridge, ReportStatus};

pub use crate::turns::{GameOutcome, TurnScheduler};

pub use crate::collab::{BoardObserver, Collaborators, SceneLoader, SoundPlayer};

pub use crate::game::Board;
