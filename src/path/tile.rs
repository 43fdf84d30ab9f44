//! Tile records.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What happens when the token stops on a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCategory {
    /// Nothing happens.
    #[default]
    Normal,
    /// Score bonus and respawn reference point.
    Checkpoint,
    /// Triggers a tile effect.
    Event,
    /// Hands control to an external minigame.
    Minigame,
}

impl TileCategory {
    /// Whether landing here dispatches anything.
    #[must_use]
    pub fn is_special(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

impl std::fmt::Display for TileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Checkpoint => "checkpoint",
            Self::Event => "event",
            Self::Minigame => "minigame",
        };
        f.write_str(name)
    }
}

/// One discrete board position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Position in path order.
    pub index: usize,
    /// Rendering coordinate.
    pub position: Vec2,
    /// Dispatch category.
    pub category: TileCategory,
}

impl Tile {
    /// Create a tile.
    #[must_use]
    pub fn new(index: usize, position: Vec2, category: TileCategory) -> Self {
        Self {
            index,
            position,
            category,
        }
    }

    /// Check the tile category.
    #[must_use]
    pub fn is(&self, category: TileCategory) -> bool {
        self.category == category
    }
}
