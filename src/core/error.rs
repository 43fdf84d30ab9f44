//! Error types.
//!
//! Configuration and path errors fail fast at build time. Runtime
//! requests that cannot be honoured (moving while already moving, acting
//! after the game ended) are rejected with an error and leave the session
//! untouched. Effects never produce errors; they report
//! [`ResolveResult::Failed`](crate::effects::ResolveResult) instead.

use thiserror::Error;

use crate::dispatch::MinigameId;

/// Errors produced by the board core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A path was built from an empty coordinate list.
    #[error("path has no coordinates")]
    EmptyPath,

    /// A path needs both a start and a finish tile.
    #[error("path needs at least 2 tiles, got {len}")]
    PathTooShort { len: usize },

    /// A tile index outside the path was requested.
    #[error("tile index {index} is out of range for a path of {len} tiles")]
    IndexOutOfRange { index: usize, len: usize },

    /// The start and finish tiles are always checkpoints.
    #[error("tile {index} is a path endpoint and keeps its checkpoint category")]
    ProtectedTile { index: usize },

    /// A movement or teleport was requested while the token is moving.
    #[error("a movement is already in progress")]
    MovementInProgress,

    /// The session is resolving effects, waiting for an answer or away in a minigame.
    #[error("the board is busy resolving the current turn")]
    Busy,

    /// The game already reached victory or defeat.
    #[error("the game is over")]
    GameOver,

    /// An answer was supplied but no quiz or story prompt is open.
    #[error("no prompt is waiting for an answer")]
    NoPendingPrompt,

    /// A story choice index outside the offered choices.
    #[error("choice {index} is not one of the {choices} offered")]
    InvalidChoice { index: usize, choices: usize },

    /// The external minigame scene could not be loaded.
    #[error("failed to load minigame '{minigame}': {source}")]
    MinigameLoad {
        minigame: MinigameId,
        #[source]
        source: SceneError,
    },

    /// A configuration value is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure reported by a [`SceneLoader`](crate::collab::SceneLoader).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// No scene is registered under the requested name.
    #[error("scene '{0}' not found")]
    NotFound(String),

    /// The scene exists but failed while loading.
    #[error("scene failed to load: {0}")]
    LoadFailed(String),
}
