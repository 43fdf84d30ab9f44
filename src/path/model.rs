//! The ordered tile sequence.

use glam::Vec2;
use serde::Serialize;

use crate::core::BoardError;

use super::{Tile, TileCategory};

/// Ordered, indexable sequence of tiles from start to finish.
///
/// A path always holds at least two tiles and both endpoints are
/// checkpoints. Categories can only change while the path is being set up
/// (the setup methods consume `self`); once handed to a
/// [`Board`](crate::game::Board) it is read-only. Starting a new game with a
/// different layout replaces the path wholesale.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Path {
    tiles: Vec<Tile>,
}

impl Path {
    /// Build a path with one tile per coordinate.
    ///
    /// Endpoints are `Checkpoint`, everything else `Normal`.
    pub fn build(coordinates: &[Vec2]) -> Result<Self, BoardError> {
        match coordinates.len() {
            0 => return Err(BoardError::EmptyPath),
            1 => return Err(BoardError::PathTooShort { len: 1 }),
            _ => {}
        }

        let last = coordinates.len() - 1;
        let tiles = coordinates
            .iter()
            .enumerate()
            .map(|(index, &position)| {
                let category = if index == 0 || index == last {
                    TileCategory::Checkpoint
                } else {
                    TileCategory::Normal
                };
                Tile::new(index, position, category)
            })
            .collect();

        Ok(Self { tiles })
    }

    /// Reassign the category of an interior tile.
    pub fn with_category(mut self, index: usize, category: TileCategory) -> Result<Self, BoardError> {
        let len = self.len();
        if index >= len {
            return Err(BoardError::IndexOutOfRange { index, len });
        }
        if self.is_endpoint(index) {
            return Err(BoardError::ProtectedTile { index });
        }
        self.tiles[index].category = category;
        Ok(self)
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false; a built path has at least two tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Index of the finish tile.
    #[must_use]
    pub fn final_index(&self) -> usize {
        self.tiles.len() - 1
    }

    /// Whether `index` is the start or finish tile.
    #[must_use]
    pub fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || index == self.final_index()
    }

    /// Tile at `index`.
    pub fn tile(&self, index: usize) -> Result<&Tile, BoardError> {
        self.tiles.get(index).ok_or(BoardError::IndexOutOfRange {
            index,
            len: self.tiles.len(),
        })
    }

    /// All tiles in path order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterate over tiles in path order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Next index, clamped to the finish tile (no wraparound).
    #[must_use]
    pub fn next_index(&self, current: usize) -> usize {
        current.saturating_add(1).min(self.final_index())
    }

    /// Previous index, clamped to the start tile.
    #[must_use]
    pub fn previous_index(&self, current: usize) -> usize {
        current.saturating_sub(1).min(self.final_index())
    }

    /// Clamp a signed index into `[0, final_index]`.
    #[must_use]
    pub fn clamp_index(&self, index: i64) -> usize {
        let last = self.final_index();
        if index <= 0 {
            0
        } else {
            usize::try_from(index).map_or(last, |i| i.min(last))
        }
    }

    /// Number of tiles with the given category.
    #[must_use]
    pub fn count(&self, category: TileCategory) -> usize {
        self.tiles.iter().filter(|t| t.category == category).count()
    }

    /// World position of a tile, clamped into the path.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Vec2 {
        self.tiles[index.min(self.final_index())].position
    }

    pub(super) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
