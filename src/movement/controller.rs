//! Tile-by-tile token movement, stepped once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{BoardError, MovementConfig, PlayerState};
use crate::path::{Path, TileCategory};

use super::curve::hop_position;

/// Why a movement is happening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveMode {
    /// A dice roll. Stops early on a minigame tile.
    Roll,
    /// A correction (minigame result, effect relocation). Passes over
    /// minigame tiles and never dispatches them.
    Corrective,
}

/// Summary of a completed movement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovementFinished {
    /// Tile the token stopped on.
    pub final_index: usize,
    /// Mode the movement ran in.
    pub mode: MoveMode,
    /// The run ended on the finish tile.
    pub reached_end: bool,
    /// A minigame tile cut the run short.
    pub stopped_at_minigame: bool,
    /// Tiles actually hopped.
    pub steps_taken: u32,
    /// Checkpoints passed through (not stopped on).
    pub checkpoints_passed: SmallVec<[usize; 4]>,
    /// Score awarded for those pass-throughs.
    pub pass_bonus: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Ready,
    Hopping {
        to: usize,
        start: Vec2,
        end: Vec2,
        t: f32,
    },
    Pausing {
        remaining: f32,
    },
}

/// Animates the token along the path one tile at a time.
///
/// At most one movement is in flight. A movement runs as a small state
/// machine (`Ready -> Hopping -> Pausing -> Ready ...`) driven by
/// [`tick`](Self::tick); each hop commits the new tile index to
/// [`PlayerState`] as soon as it lands.
#[derive(Clone, Debug)]
pub struct MovementController {
    config: MovementConfig,
    checkpoint_bonus: i64,
    phase: Phase,
    mode: MoveMode,
    forward: bool,
    remaining: usize,
    steps_taken: u32,
    stopped_at_minigame: bool,
    checkpoints_passed: SmallVec<[usize; 4]>,
    pass_bonus: i64,
    token: Vec2,
}

impl MovementController {
    /// Create an idle controller.
    #[must_use]
    pub fn new(config: MovementConfig, checkpoint_bonus: i64) -> Self {
        Self {
            config,
            checkpoint_bonus,
            phase: Phase::Idle,
            mode: MoveMode::Roll,
            forward: true,
            remaining: 0,
            steps_taken: 0,
            stopped_at_minigame: false,
            checkpoints_passed: SmallVec::new(),
            pass_bonus: 0,
            token: Vec2::ZERO,
        }
    }

    /// Whether a movement is in flight.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Animated token position, bounce included.
    #[must_use]
    pub fn token_position(&self) -> Vec2 {
        self.token
    }

    /// Mode of the movement in flight.
    #[must_use]
    pub fn mode(&self) -> Option<MoveMode> {
        self.is_moving().then_some(self.mode)
    }

    /// Begin moving `steps` tiles (negative moves backwards).
    ///
    /// Zero steps is accepted and does nothing. A request while another
    /// movement is in flight is rejected and changes nothing.
    pub fn start(&mut self, steps: i64, mode: MoveMode) -> Result<(), BoardError> {
        if self.is_moving() {
            debug!(steps, ?mode, "movement_rejected");
            return Err(BoardError::MovementInProgress);
        }
        if steps == 0 {
            return Ok(());
        }

        self.mode = mode;
        self.forward = steps > 0;
        self.remaining = usize::try_from(steps.unsigned_abs()).unwrap_or(usize::MAX);
        self.steps_taken = 0;
        self.stopped_at_minigame = false;
        self.checkpoints_passed.clear();
        self.pass_bonus = 0;
        self.phase = Phase::Ready;

        debug!(steps, ?mode, "movement_started");
        Ok(())
    }

    /// Place the token on a tile without animation.
    pub fn teleport(
        &mut self,
        index: usize,
        path: &Path,
        state: &mut PlayerState,
    ) -> Result<(), BoardError> {
        if self.is_moving() {
            debug!(index, "teleport_rejected");
            return Err(BoardError::MovementInProgress);
        }
        let tile = path.tile(index)?;
        self.token = tile.position;
        state.arrive_at(index, tile.position);
        Ok(())
    }

    /// Snap the token to the player's current tile.
    pub fn sync_token(&mut self, path: &Path, state: &PlayerState) {
        self.token = path.position_of(state.current_tile_index);
    }

    /// Advance the movement by `dt` seconds.
    ///
    /// Returns the summary on the frame the movement completes. Time left
    /// over after a hop lands carries into the next phase, so the result
    /// does not depend on frame rate.
    pub fn tick(
        &mut self,
        dt: f32,
        path: &Path,
        state: &mut PlayerState,
    ) -> Option<MovementFinished> {
        let mut budget = dt.max(0.0);

        loop {
            match self.phase {
                Phase::Idle => return None,

                Phase::Ready => {
                    let current = state.current_tile_index.min(path.final_index());
                    let next = if self.forward {
                        path.next_index(current)
                    } else {
                        path.previous_index(current)
                    };

                    if self.remaining == 0 || next == current {
                        return Some(self.finish(path, state));
                    }

                    self.phase = Phase::Hopping {
                        to: next,
                        start: path.position_of(current),
                        end: path.position_of(next),
                        t: 0.0,
                    };
                }

                Phase::Hopping { to, start, end, t } => {
                    let t = t + budget * self.config.hop_speed;
                    if t < 1.0 {
                        self.token = hop_position(
                            start,
                            end,
                            t,
                            self.config.bounce_amplitude,
                            self.config.bounce_speed,
                        );
                        self.phase = Phase::Hopping { to, start, end, t };
                        return None;
                    }

                    budget = (t - 1.0) / self.config.hop_speed;
                    self.token = end;
                    if self.land(to, path, state) {
                        return Some(self.finish(path, state));
                    }
                    self.phase = Phase::Pausing {
                        remaining: self.config.step_pause,
                    };
                }

                Phase::Pausing { remaining } => {
                    if budget < remaining {
                        self.phase = Phase::Pausing {
                            remaining: remaining - budget,
                        };
                        return None;
                    }
                    budget -= remaining;
                    self.phase = Phase::Ready;
                }
            }
        }
    }

    /// Commit one hop. Returns true if this is the stopping tile.
    fn land(&mut self, index: usize, path: &Path, state: &mut PlayerState) -> bool {
        let position = path.position_of(index);
        state.arrive_at(index, position);
        self.remaining = self.remaining.saturating_sub(1);
        self.steps_taken = self.steps_taken.saturating_add(1);

        let category = path.tiles()[index].category;
        let blocked = if self.forward {
            index == path.final_index()
        } else {
            index == 0
        };
        let minigame_stop = self.mode == MoveMode::Roll && category == TileCategory::Minigame;
        let stopping = self.remaining == 0 || blocked || minigame_stop;

        if category == TileCategory::Checkpoint && !stopping {
            let applied = state.add_score(self.checkpoint_bonus / 2);
            state.last_checkpoint_index = index;
            self.checkpoints_passed.push(index);
            self.pass_bonus += applied;
            debug!(index, bonus = applied, "checkpoint_passed");
        }

        if minigame_stop && self.remaining > 0 {
            debug!(index, skipped = self.remaining, "movement_stopped_at_minigame");
        }
        self.stopped_at_minigame = minigame_stop;

        stopping
    }

    fn finish(&mut self, path: &Path, state: &PlayerState) -> MovementFinished {
        self.phase = Phase::Idle;
        self.remaining = 0;

        let final_index = state.current_tile_index;
        let summary = MovementFinished {
            final_index,
            mode: self.mode,
            reached_end: final_index == path.final_index(),
            stopped_at_minigame: self.stopped_at_minigame,
            steps_taken: self.steps_taken,
            checkpoints_passed: std::mem::take(&mut self.checkpoints_passed),
            pass_bonus: std::mem::take(&mut self.pass_bonus),
        };

        debug!(
            final_index,
            steps = summary.steps_taken,
            reached_end = summary.reached_end,
            "movement_finished"
        );
        summary
    }
}
