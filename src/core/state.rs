//! Player state: the single mutable record of a play session.
//!
//! ## PlayerState
//!
//! Everything the board needs to remember about the player between
//! frames, effects and scene transitions:
//! - Logical and visual position (tile index, world position)
//! - Score and moves remaining (both clamped at zero)
//! - Turn counter and timed buffs
//! - Transition flags set before a minigame handoff and consumed on return
//!
//! The state is owned by the session ([`Board`](crate::game::Board)) and
//! passed by reference to each component, rather than living in a global.
//! It is in-memory only; [`PlayerState::reset`] restores the documented
//! new-game defaults.

use glam::Vec2;
use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Coarse phase of the current turn, for UI display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a dice roll.
    #[default]
    Roll,
    /// The token is moving.
    Move,
    /// Effects or a minigame are resolving.
    Action,
    /// Victory or defeat was reached.
    End,
}

/// One resolved dice roll, kept in the session history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    /// Turn the roll was made on.
    pub turn: u32,
    /// Dice value.
    pub roll: u32,
    /// Tile the token started from.
    pub from: usize,
    /// Tile the token ended on once the turn resolved.
    pub to: usize,
    /// Score once the turn resolved.
    pub score: i64,
}

/// Mutable record of the player's progress through one play session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    // === Position ===
    /// Logical position on the path.
    pub current_tile_index: usize,

    /// World position of the tile the token last arrived on.
    pub current_position: Vec2,

    /// World position saved before leaving the board for a minigame.
    pub last_position: Vec2,

    /// Most recent checkpoint passed or landed on.
    pub last_checkpoint_index: usize,

    // === Resources ===
    score: i64,
    moves_remaining: i64,

    // === Turns ===
    /// Turn number (starts at 1).
    pub turn: u32,

    /// Coarse turn phase.
    pub phase: GamePhase,

    buffs: FxHashMap<String, u32>,
    buff_magnitudes: FxHashMap<String, i64>,

    // === Transition flags ===
    /// Signed tile delta queued by a minigame result.
    pub pending_tile_adjustment: i64,

    /// Set before a minigame handoff, consumed on board re-entry.
    pub returning_from_minigame: bool,

    /// Set while the final challenge minigame is running.
    pub is_final_challenge: bool,

    /// The final challenge was won.
    pub game_won: bool,

    /// The end panel should be shown on board re-entry.
    pub show_end_game: bool,

    // === Minigame bookkeeping ===
    /// Minigames won this session.
    pub minigame_wins: u32,

    /// Minigames lost this session.
    pub minigame_losses: u32,

    /// Round-robin cursor into the minigame roster.
    pub minigame_cursor: usize,

    /// Resolved rolls, oldest first.
    pub history: Vector<RollRecord>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_tile_index: 0,
            current_position: Vec2::ZERO,
            last_position: Vec2::ZERO,
            last_checkpoint_index: 0,
            score: 0,
            moves_remaining: 0,
            turn: 1,
            phase: GamePhase::Roll,
            buffs: FxHashMap::default(),
            buff_magnitudes: FxHashMap::default(),
            pending_tile_adjustment: 0,
            returning_from_minigame: false,
            is_final_challenge: false,
            game_won: false,
            show_end_game: false,
            minigame_wins: 0,
            minigame_losses: 0,
            minigame_cursor: 0,
            history: Vector::new(),
        }
    }
}

impl PlayerState {
    /// Create a fresh state with new-game defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reinitialise every field to its new-game default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // === Position ===

    /// Record arrival on a tile.
    pub fn arrive_at(&mut self, index: usize, position: Vec2) {
        self.current_tile_index = index;
        self.current_position = position;
    }

    // === Score ===

    /// Current score.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Add `delta` to the score, clamping at zero.
    ///
    /// Returns the change actually applied.
    pub fn add_score(&mut self, delta: i64) -> i64 {
        let before = self.score;
        self.score = before.saturating_add(delta).max(0);
        self.score - before
    }

    /// Set the score directly (negative values clamp to zero).
    pub fn set_score(&mut self, score: i64) {
        self.score = score.max(0);
    }

    // === Moves ===

    /// Moves remaining.
    #[must_use]
    pub fn moves_remaining(&self) -> i64 {
        self.moves_remaining
    }

    /// Add `delta` to moves remaining, clamping at zero.
    ///
    /// Returns the change actually applied.
    pub fn add_moves(&mut self, delta: i64) -> i64 {
        let before = self.moves_remaining;
        self.moves_remaining = before.saturating_add(delta).max(0);
        self.moves_remaining - before
    }

    /// Set moves remaining directly (negative values clamp to zero).
    pub fn set_moves(&mut self, moves: i64) {
        self.moves_remaining = moves.max(0);
    }

    // === Buffs ===

    /// Apply a buff, stacking magnitude onto an existing entry.
    ///
    /// The duration is refreshed to `duration`. A zero duration would expire
    /// before it is ever observed, so it is ignored.
    pub fn add_buff(&mut self, id: &str, magnitude: i64, duration: u32) {
        if duration == 0 {
            return;
        }
        self.buffs.insert(id.to_string(), duration);
        let stacked = self.buff_magnitudes.entry(id.to_string()).or_insert(0);
        *stacked = stacked.saturating_add(magnitude);
    }

    /// Check if a buff is active.
    #[must_use]
    pub fn has_buff(&self, id: &str) -> bool {
        self.buffs.get(id).is_some_and(|&turns| turns > 0)
    }

    /// Remaining turns for a buff.
    #[must_use]
    pub fn buff_duration(&self, id: &str) -> Option<u32> {
        self.buffs.get(id).copied()
    }

    /// Accumulated magnitude for a buff.
    #[must_use]
    pub fn buff_magnitude(&self, id: &str) -> Option<i64> {
        self.buff_magnitudes.get(id).copied()
    }

    /// Number of active buffs.
    #[must_use]
    pub fn buff_count(&self) -> usize {
        self.buffs.len()
    }

    /// Iterate over `(id, remaining_turns)` pairs.
    pub fn buffs(&self) -> impl Iterator<Item = (&str, u32)> {
        self.buffs.iter().map(|(id, &turns)| (id.as_str(), turns))
    }

    /// Decrement every buff by one turn, removing the ones that run out.
    ///
    /// Magnitude entries are removed together with their duration. The
    /// expired ids are returned sorted.
    pub fn decay_buffs(&mut self) -> SmallVec<[String; 4]> {
        let mut expired: SmallVec<[String; 4]> = SmallVec::new();

        for (id, turns) in self.buffs.iter_mut() {
            *turns = turns.saturating_sub(1);
            if *turns == 0 {
                expired.push(id.clone());
            }
        }

        for id in &expired {
            self.buffs.remove(id);
            self.buff_magnitudes.remove(id);
        }

        expired.sort_unstable();
        expired
    }

    // === Transition flags ===

    /// Consume the pending tile adjustment, leaving zero behind.
    pub fn take_pending_adjustment(&mut self) -> i64 {
        std::mem::take(&mut self.pending_tile_adjustment)
    }

    /// Consume the returning-from-minigame flag.
    pub fn take_returning_from_minigame(&mut self) -> bool {
        std::mem::take(&mut self.returning_from_minigame)
    }

    /// Consume the final-challenge flag.
    pub fn take_final_challenge(&mut self) -> bool {
        std::mem::take(&mut self.is_final_challenge)
    }

    /// Consume the show-end-game flag.
    pub fn take_show_end_game(&mut self) -> bool {
        std::mem::take(&mut self.show_end_game)
    }

    /// Advance the round-robin cursor, returning the slot to use.
    pub fn next_minigame_slot(&mut self, roster_len: usize) -> Option<usize> {
        if roster_len == 0 {
            return None;
        }
        let slot = self.minigame_cursor % roster_len;
        self.minigame_cursor = (slot + 1) % roster_len;
        Some(slot)
    }

    /// Append a resolved roll to the history.
    pub fn record_roll(&mut self, record: RollRecord) {
        self.history.push_back(record);
    }
}
