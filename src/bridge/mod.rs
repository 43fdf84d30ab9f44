//! Minigame result bridge.
//!
//! Every minigame reports a single win or loss (and optionally its own
//! score). The bridge converts that into the standard reward/penalty, so
//! the board never needs to know which minigame produced the result.
//!
//! Reports are idempotent per session: the first report for an open
//! session is recorded, anything after it (or with no session open) is
//! ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{MinigameRewards, PlayerState};
use crate::dispatch::MinigameId;

/// Result reported by a minigame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinigameOutcome {
    Win,
    Loss,
}

/// One minigame handoff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinigameSession {
    /// Minigame that was launched.
    pub minigame: MinigameId,
    /// Whether this is the final challenge.
    pub final_challenge: bool,
}

impl MinigameSession {
    /// A regular minigame session.
    #[must_use]
    pub fn regular(minigame: MinigameId) -> Self {
        Self {
            minigame,
            final_challenge: false,
        }
    }

    /// The final challenge session.
    #[must_use]
    pub fn final_challenge(minigame: MinigameId) -> Self {
        Self {
            minigame,
            final_challenge: true,
        }
    }
}

/// Deltas the bridge applied for a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinigameReport {
    pub minigame: MinigameId,
    pub outcome: MinigameOutcome,
    /// Score change actually applied (after clamping).
    pub score_delta: i64,
    /// Signed tiles queued in `pending_tile_adjustment`.
    pub tile_delta: i64,
    pub final_challenge: bool,
}

/// What happened to a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportStatus {
    /// First report for the open session.
    Recorded(MinigameReport),
    /// Duplicate report, or no session open.
    Ignored,
}

/// Converts minigame outcomes into player state deltas.
#[derive(Clone, Debug)]
pub struct MinigameResultBridge {
    rewards: MinigameRewards,
    session: Option<MinigameSession>,
    reported: bool,
}

impl MinigameResultBridge {
    /// Create a bridge with no open session.
    #[must_use]
    pub fn new(rewards: MinigameRewards) -> Self {
        Self {
            rewards,
            session: None,
            reported: false,
        }
    }

    /// Start a session. Replaces any previous one.
    pub fn open(&mut self, session: MinigameSession) {
        debug!(minigame = %session.minigame, final_challenge = session.final_challenge, "minigame_session_opened");
        self.session = Some(session);
        self.reported = false;
    }

    /// End the current session.
    pub fn close(&mut self) {
        self.session = None;
        self.reported = false;
    }

    /// The open session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&MinigameSession> {
        self.session.as_ref()
    }

    /// Whether a session is open and still waiting for its report.
    #[must_use]
    pub fn awaiting_report(&self) -> bool {
        self.session.is_some() && !self.reported
    }

    /// Record the outcome of the open session.
    ///
    /// `score` overrides the configured score delta. A final-challenge win
    /// sets `game_won` and `show_end_game` and moves nowhere; a loss always
    /// retreats at least one tile.
    pub fn report(
        &mut self,
        state: &mut PlayerState,
        outcome: MinigameOutcome,
        score: Option<i64>,
    ) -> ReportStatus {
        let Some(session) = self.session.as_ref().filter(|_| !self.reported) else {
            debug!(?outcome, "minigame_report_ignored");
            return ReportStatus::Ignored;
        };

        let configured = match outcome {
            MinigameOutcome::Win => self.rewards.win_score,
            MinigameOutcome::Loss => self.rewards.loss_score,
        };
        let score_delta = state.add_score(score.unwrap_or(configured));

        let tile_delta = match (outcome, session.final_challenge) {
            (MinigameOutcome::Win, false) => i64::from(self.rewards.win_tiles),
            (MinigameOutcome::Loss, false) => -i64::from(self.rewards.loss_tiles),
            (MinigameOutcome::Win, true) => {
                state.game_won = true;
                state.show_end_game = true;
                0
            }
            (MinigameOutcome::Loss, true) => -i64::from(self.rewards.loss_tiles.max(1)),
        };

        match outcome {
            MinigameOutcome::Win => state.minigame_wins += 1,
            MinigameOutcome::Loss => state.minigame_losses += 1,
        }
        state.pending_tile_adjustment = tile_delta;
        state.returning_from_minigame = true;
        self.reported = true;

        info!(
            minigame = %session.minigame,
            ?outcome,
            score_delta,
            tile_delta,
            final_challenge = session.final_challenge,
            "minigame_reported"
        );

        ReportStatus::Recorded(MinigameReport {
            minigame: session.minigame.clone(),
            outcome,
            score_delta,
            tile_delta,
            final_challenge: session.final_challenge,
        })
    }
}
