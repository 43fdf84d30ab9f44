//! Coordinate generators for common board shapes.

use glam::Vec2;

use crate::core::BoardError;

use super::{Path, TileCategory};

/// Grid cells of the classic 24-tile board, start to finish.
#[rustfmt::skip]
const CLASSIC_CELLS: [(i32, i32); 24] = [
    (0, 0), (1, 0), (2, 0), (3, 0),
    (3, 1), (3, 2), (3, 3),
    (2, 3), (1, 3), (0, 3),
    (0, 4), (0, 5), (1, 5),
    (2, 5), (3, 5), (4, 5),
    (4, 4), (4, 3), (5, 3),
    (6, 3), (6, 2), (6, 1),
    (6, 0), (7, 0),
];

/// Coordinates of the classic 24-tile board.
#[must_use]
pub fn classic_layout() -> Vec<Vec2> {
    CLASSIC_CELLS
        .iter()
        .map(|&(x, y)| Vec2::new(x as f32, y as f32))
        .collect()
}

/// The classic board with its hand-placed special tiles.
pub fn classic_path() -> Result<Path, BoardError> {
    Path::build(&classic_layout())?
        .with_category(3, TileCategory::Checkpoint)?
        .with_category(9, TileCategory::Event)?
        .with_category(19, TileCategory::Minigame)
}

/// A snake-shaped board: rows of `columns` tiles that alternate direction.
///
/// `columns` of zero is treated as one.
#[must_use]
pub fn serpentine(len: usize, columns: usize, spacing: f32) -> Vec<Vec2> {
    let columns = columns.max(1);
    (0..len)
        .map(|i| {
            let row = i / columns;
            let offset = i % columns;
            let column = if row % 2 == 0 { offset } else { columns - 1 - offset };
            Vec2::new(column as f32 * spacing, row as f32 * spacing)
        })
        .collect()
}
