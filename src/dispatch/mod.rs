//! Tile dispatch: turning a tile stop into score, effects or a minigame.

mod dispatcher;
mod minigame;

pub use dispatcher::{ArrivalMode, Dispatch, TileEffectDispatcher, TriggeredEffect};
pub use minigame::{MinigameId, MinigameRoster};
