//! Turn scheduling and end-of-game evaluation.
//!
//! The scheduler only reports; disabling roll/move controls once the game
//! ends is the caller's job.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::PlayerState;

/// Terminal result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The finish tile was reached (or the final challenge won).
    Victory,
    /// The turn limit was exceeded.
    Defeat,
}

/// What advancing a turn did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnAdvance {
    /// The new turn number.
    pub turn: u32,
    /// Buffs that ran out, sorted.
    pub expired: SmallVec<[String; 4]>,
}

/// Advances turns, decays buffs and checks end conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnScheduler {
    max_turns: Option<u32>,
    final_challenge: bool,
}

impl TurnScheduler {
    /// Create a scheduler; `None` disables the turn limit.
    #[must_use]
    pub fn new(max_turns: Option<u32>) -> Self {
        Self {
            max_turns,
            final_challenge: false,
        }
    }

    /// Require a won final challenge for victory; standing on the finish
    /// tile is then not enough.
    #[must_use]
    pub fn with_final_challenge(mut self, required: bool) -> Self {
        self.final_challenge = required;
        self
    }

    /// The turn limit.
    #[must_use]
    pub fn max_turns(&self) -> Option<u32> {
        self.max_turns
    }

    /// A dice roll fully resolved: next turn, one turn off every buff.
    pub fn on_dice_resolved(&self, state: &mut PlayerState) -> TurnAdvance {
        state.turn = state.turn.saturating_add(1);
        let expired = state.decay_buffs();

        debug!(turn = state.turn, expired = expired.len(), "turn_advanced");
        TurnAdvance {
            turn: state.turn,
            expired,
        }
    }

    /// Victory if the player won the final challenge, or reached
    /// `final_index` when no final challenge is required; defeat if the turn
    /// limit is exceeded. Victory wins ties.
    #[must_use]
    pub fn check_end_conditions(&self, state: &PlayerState, final_index: usize) -> Option<GameOutcome> {
        let reached_end = !self.final_challenge && state.current_tile_index >= final_index;
        if state.game_won || reached_end {
            return Some(GameOutcome::Victory);
        }
        match self.max_turns {
            Some(max) if state.turn > max => Some(GameOutcome::Defeat),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_increments() {
        let scheduler = TurnScheduler::new(None);
        let mut state = PlayerState::new();

        let advance = scheduler.on_dice_resolved(&mut state);
        assert_eq!(advance.turn, 2);
        assert_eq!(state.turn, 2);
        assert!(advance.expired.is_empty());
    }

    #[test]
    fn test_buff_lasts_exactly_duration() {
        let scheduler = TurnScheduler::new(None);
        let mut state = PlayerState::new();
        state.add_buff("LuckBoost", 1, 3);

        for _ in 0..2 {
            scheduler.on_dice_resolved(&mut state);
            assert!(state.has_buff("LuckBoost"));
        }

        let advance = scheduler.on_dice_resolved(&mut state);
        assert_eq!(advance.expired.as_slice(), &["LuckBoost".to_string()]);
        assert!(!state.has_buff("LuckBoost"));
        assert_eq!(state.buff_magnitude("LuckBoost"), None);
    }

    #[test]
    fn test_victory_on_final_tile() {
        let scheduler = TurnScheduler::new(Some(5));
        let mut state = PlayerState::new();

        assert_eq!(scheduler.check_end_conditions(&state, 9), None);
        state.current_tile_index = 9;
        assert_eq!(scheduler.check_end_conditions(&state, 9), Some(GameOutcome::Victory));
    }

    #[test]
    fn test_victory_on_final_challenge_win() {
        let scheduler = TurnScheduler::new(None);
        let mut state = PlayerState::new();
        state.game_won = true;

        assert_eq!(scheduler.check_end_conditions(&state, 9), Some(GameOutcome::Victory));
    }

    #[test]
    fn test_defeat_after_turn_limit() {
        let scheduler = TurnScheduler::new(Some(3));
        let mut state = PlayerState::new();

        for _ in 0..2 {
            scheduler.on_dice_resolved(&mut state);
        }
        assert_eq!(state.turn, 3);
        assert_eq!(scheduler.check_end_conditions(&state, 9), None);

        scheduler.on_dice_resolved(&mut state);
        assert_eq!(scheduler.check_end_conditions(&state, 9), Some(GameOutcome::Defeat));
    }

    #[test]
    fn test_final_tile_alone_not_enough_with_final_challenge() {
        let scheduler = TurnScheduler::new(Some(5)).with_final_challenge(true);
        let mut state = PlayerState::new();
        state.current_tile_index = 9;

        assert_eq!(scheduler.check_end_conditions(&state, 9), None);

        state.game_won = true;
        assert_eq!(scheduler.check_end_conditions(&state, 9), Some(GameOutcome::Victory));
    }

    #[test]
    fn test_no_limit_never_defeats() {
        let scheduler = TurnScheduler::new(None);
        let mut state = PlayerState::new();
        state.turn = u32::MAX;

        assert_eq!(scheduler.check_end_conditions(&state, 9), None);
    }

    #[test]
    fn test_victory_beats_defeat() {
        let scheduler = TurnScheduler::new(Some(1));
        let mut state = PlayerState::new();
        state.turn = 10;
        state.current_tile_index = 9;

        assert_eq!(scheduler.check_end_conditions(&state, 9), Some(GameOutcome::Victory));
    }
}
