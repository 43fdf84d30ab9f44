//! Category distribution over a freshly built path.

use tracing::debug;

use crate::core::{BoardRng, CategoryRules};

use super::{Path, TileCategory};

impl Path {
    /// Distribute tile categories according to `rules`.
    ///
    /// Order of precedence at each interior index: checkpoint interval,
    /// minigame interval, then the random event roll. If fewer than
    /// `min_event_tiles` events result, randomly chosen normal tiles are
    /// converted until the minimum is met or no normal tile is left.
    /// Endpoints always stay checkpoints.
    #[must_use]
    pub fn assign_categories(mut self, rules: &CategoryRules, rng: &mut BoardRng) -> Self {
        let last = self.final_index();

        for tile in self.tiles_mut() {
            let i = tile.index;
            tile.category = if i == 0 || i == last {
                TileCategory::Checkpoint
            } else if rules.checkpoint_interval > 0 && i % rules.checkpoint_interval == 0 {
                TileCategory::Checkpoint
            } else if rules.minigame_interval > 0 && i % rules.minigame_interval == 0 {
                TileCategory::Minigame
            } else if rng.chance(rules.event_chance) {
                TileCategory::Event
            } else {
                TileCategory::Normal
            };
        }

        let events = self.count(TileCategory::Event);
        if events < rules.min_event_tiles {
            let mut normal: Vec<usize> = self
                .iter()
                .filter(|t| t.category == TileCategory::Normal)
                .map(|t| t.index)
                .collect();
            rng.shuffle(&mut normal);

            let missing = rules.min_event_tiles - events;
            for index in normal.into_iter().take(missing) {
                self.tiles_mut()[index].category = TileCategory::Event;
            }
        }

        debug!(
            tiles = self.len(),
            checkpoints = self.count(TileCategory::Checkpoint),
            minigames = self.count(TileCategory::Minigame),
            events = self.count(TileCategory::Event),
            "tile_categories_assigned"
        );

        self
    }
}
