//! Tile effect dispatch.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::core::{BoardConfig, BoardRng, PlayerState};
use crate::effects::{EffectEntry, EffectResolver, EffectTable, Resolution, ResolverContext};
use crate::movement::MoveMode;
use crate::path::{Tile, TileCategory};

use super::{MinigameId, MinigameRoster};

/// How the token came to stop on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrivalMode {
    /// A roll, scripted move or teleport. Everything dispatches.
    Roll,
    /// A corrective movement. Minigame tiles are not dispatched.
    Corrective,
}

impl From<MoveMode> for ArrivalMode {
    fn from(mode: MoveMode) -> Self {
        match mode {
            MoveMode::Roll => Self::Roll,
            MoveMode::Corrective => Self::Corrective,
        }
    }
}

/// An event effect that was triggered.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggeredEffect {
    /// Notification title.
    pub name: String,
    /// Notification text.
    pub summary: String,
    /// Whether a notification should be shown.
    pub notify: bool,
    /// Sound to play.
    pub sound: Option<String>,
    /// What the effect did and what is left to do.
    pub resolution: Resolution,
}

/// What dispatching a tile did.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch {
    /// Nothing happens here.
    Nothing,
    /// Landing bonus awarded (after clamping).
    Checkpoint { bonus: i64 },
    /// An event effect triggered.
    Effect(TriggeredEffect),
    /// Control should pass to this minigame.
    Minigame(MinigameId),
}

/// Decides and executes what a tile does when the token stops on it.
///
/// Event tiles use a per-tile override when one is attached, otherwise a
/// weighted draw from the effect table. The finish tile is never
/// dispatched here; the session handles it separately.
#[derive(Clone, Debug)]
pub struct TileEffectDispatcher {
    checkpoint_bonus: i64,
    effects: EffectTable,
    overrides: FxHashMap<usize, EffectEntry>,
    roster: MinigameRoster,
    path_len: usize,
}

impl TileEffectDispatcher {
    /// Create a dispatcher for a path of `path_len` tiles.
    #[must_use]
    pub fn new(config: &BoardConfig, path_len: usize) -> Self {
        Self {
            checkpoint_bonus: config.checkpoint_bonus,
            effects: config.effects.clone(),
            overrides: FxHashMap::default(),
            roster: config.minigames.clone(),
            path_len,
        }
    }

    /// Attach a fixed effect to one tile, replacing the table draw there.
    pub fn attach_effect(&mut self, index: usize, entry: EffectEntry) {
        self.overrides.insert(index, entry);
    }

    /// Remove a tile's fixed effect.
    pub fn detach_effect(&mut self, index: usize) -> Option<EffectEntry> {
        self.overrides.remove(&index)
    }

    /// The minigame roster.
    #[must_use]
    pub fn roster(&self) -> &MinigameRoster {
        &self.roster
    }

    /// Execute the tile's effect on the player.
    pub fn dispatch(
        &self,
        tile: &Tile,
        state: &mut PlayerState,
        rng: &mut BoardRng,
        arrival: ArrivalMode,
    ) -> Dispatch {
        match tile.category {
            TileCategory::Normal => Dispatch::Nothing,

            TileCategory::Checkpoint => {
                let bonus = state.add_score(self.checkpoint_bonus);
                state.last_checkpoint_index = tile.index;
                debug!(index = tile.index, bonus, "checkpoint_landed");
                Dispatch::Checkpoint { bonus }
            }

            TileCategory::Event => {
                let entry = match self.overrides.get(&tile.index) {
                    Some(entry) => entry,
                    None => match self.effects.choose(rng) {
                        Some(entry) => entry,
                        None => {
                            debug!(index = tile.index, "event_without_effect");
                            return Dispatch::Nothing;
                        }
                    },
                };

                let mut context = ResolverContext::new(rng, self.path_len);
                let resolution = EffectResolver::resolve(&entry.effect, state, &mut context);
                debug!(
                    index = tile.index,
                    effect = %entry.meta.name,
                    result = ?resolution.result,
                    "effect_triggered"
                );

                Dispatch::Effect(TriggeredEffect {
                    name: entry.meta.name.clone(),
                    summary: entry.effect.summary(),
                    notify: entry.meta.notify,
                    sound: entry.meta.sound.clone(),
                    resolution,
                })
            }

            TileCategory::Minigame => {
                if arrival == ArrivalMode::Corrective {
                    debug!(index = tile.index, "minigame_skipped_on_correction");
                    return Dispatch::Nothing;
                }
                let Some(minigame) = self.roster.next(state) else {
                    warn!(index = tile.index, "minigame_roster_empty");
                    return Dispatch::Nothing;
                };

                state.last_position = state.current_position;
                state.returning_from_minigame = true;
                debug!(index = tile.index, %minigame, "minigame_selected");
                Dispatch::Minigame(minigame)
            }
        }
    }
}
