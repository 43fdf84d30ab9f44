//! Minigame identifiers and round-robin selection.

use serde::{Deserialize, Serialize};

use crate::core::PlayerState;

/// Name of an external minigame scene.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinigameId(String);

impl MinigameId {
    /// Create an identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The scene name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MinigameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of minigames handed off to from minigame tiles.
///
/// Selection is round-robin: every minigame is played once, in order,
/// before any repeats. The cursor lives in [`PlayerState`] so it survives
/// scene changes and resets with a new game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinigameRoster {
    games: Vec<MinigameId>,
}

impl Default for MinigameRoster {
    fn default() -> Self {
        Self::new(["quiz", "memory", "falling-objects", "fill-blank"])
    }
}

impl MinigameRoster {
    /// Create a roster from scene names.
    pub fn new<I, S>(games: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            games: games.into_iter().map(MinigameId::new).collect(),
        }
    }

    /// Number of minigames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the roster has no minigames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Iterate in play order.
    pub fn iter(&self) -> impl Iterator<Item = &MinigameId> {
        self.games.iter()
    }

    /// Pick the next minigame, advancing the player's cursor.
    pub fn next(&self, state: &mut PlayerState) -> Option<MinigameId> {
        state
            .next_minigame_slot(self.games.len())
            .map(|slot| self.games[slot].clone())
    }
}
