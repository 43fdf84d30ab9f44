//! Cooperative task queue for the board's suspension points.
//!
//! Delayed work (dispatch after arrival, relocation after an effect, prompt
//! display, minigame handoff, sequential combo steps) is queued here and
//! released one task at a time as the board ticks.
//!
//! ## Behavior
//!
//! - Tasks run strictly in queue order; only the front task's delay counts
//!   down, so a task never starts before the one ahead of it has run.
//! - `interject` puts work at the front, for consequences that must resolve
//!   before anything already queued.
//! - Tasks belonging to a sequence can be cancelled together.

use std::collections::VecDeque;

use crate::bridge::MinigameSession;
use crate::dispatch::ArrivalMode;
use crate::effects::{Prompt, Relocation, TileEffect};

/// Identifier of a group of sequential tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SequenceId(u32);

/// One unit of deferred board work.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    /// Dispatch the tile the token stopped on.
    Dispatch { index: usize, arrival: ArrivalMode },
    /// Start a corrective movement.
    Relocate(Relocation),
    /// Open a prompt and wait for the answer.
    ShowPrompt(Prompt),
    /// Resolve one step of a sequential combo.
    Resolve {
        effect: TileEffect,
        sequence: SequenceId,
        stop_on_failure: bool,
    },
    /// Hand control to a minigame scene.
    LaunchMinigame(MinigameSession),
}

#[derive(Clone, Debug, PartialEq)]
struct Scheduled {
    remaining: f32,
    task: Task,
}

/// FIFO queue of delayed tasks.
#[derive(Clone, Debug, Default)]
pub struct Sequencer {
    pending: VecDeque<Scheduled>,
    next_sequence: u32,
}

impl Sequencer {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue a task at the back, to run `delay` seconds after it reaches
    /// the front.
    pub fn schedule(&mut self, delay: f32, task: Task) {
        self.pending.push_back(Scheduled {
            remaining: delay.max(0.0),
            task,
        });
    }

    /// Queue a task at the front.
    pub fn interject(&mut self, delay: f32, task: Task) {
        self.pending.push_front(Scheduled {
            remaining: delay.max(0.0),
            task,
        });
    }

    /// Queue several tasks at the front, keeping their relative order.
    pub fn interject_all(&mut self, tasks: impl IntoIterator<Item = (f32, Task)>) {
        let tasks: Vec<_> = tasks.into_iter().collect();
        for (delay, task) in tasks.into_iter().rev() {
            self.interject(delay, task);
        }
    }

    /// Build the tasks of a sequential combo: the first step runs at once,
    /// later steps `delay` seconds apart.
    pub fn sequence(
        &mut self,
        effects: Vec<TileEffect>,
        delay: f32,
        stop_on_failure: bool,
    ) -> Vec<(f32, Task)> {
        let sequence = SequenceId(self.next_sequence);
        self.next_sequence = self.next_sequence.wrapping_add(1);

        effects
            .into_iter()
            .enumerate()
            .map(|(i, effect)| {
                let wait = if i == 0 { 0.0 } else { delay };
                (
                    wait,
                    Task::Resolve {
                        effect,
                        sequence,
                        stop_on_failure,
                    },
                )
            })
            .collect()
    }

    /// Drop every queued step of a sequence. Returns how many were dropped.
    pub fn cancel_sequence(&mut self, sequence: SequenceId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| {
            !matches!(&s.task, Task::Resolve { sequence: id, .. } if *id == sequence)
        });
        before - self.pending.len()
    }

    /// Count down the front task's delay.
    pub fn advance(&mut self, dt: f32) {
        if let Some(front) = self.pending.front_mut() {
            front.remaining = (front.remaining - dt.max(0.0)).max(0.0);
        }
    }

    /// Pop the front task if its delay has elapsed.
    pub fn pop_ready(&mut self) -> Option<Task> {
        if self.pending.front().is_some_and(|s| s.remaining <= 0.0) {
            self.pending.pop_front().map(|s| s.task)
        } else {
            None
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relocate(n: i64) -> Task {
        Task::Relocate(Relocation::By(n))
    }

    #[test]
    fn test_sequencer_new() {
        let sequencer = Sequencer::new();
        assert!(sequencer.is_empty());
        assert_eq!(sequencer.pending_count(), 0);
    }

    #[test]
    fn test_delay_counts_down() {
        let mut sequencer = Sequencer::new();
        sequencer.schedule(0.5, relocate(1));

        sequencer.advance(0.3);
        assert_eq!(sequencer.pop_ready(), None);

        sequencer.advance(0.3);
        assert_eq!(sequencer.pop_ready(), Some(relocate(1)));
        assert!(sequencer.is_empty());
    }

    #[test]
    fn test_only_front_counts_down() {
        let mut sequencer = Sequencer::new();
        sequencer.schedule(0.2, relocate(1));
        sequencer.schedule(0.2, relocate(2));

        sequencer.advance(1.0);
        assert_eq!(sequencer.pop_ready(), Some(relocate(1)));
        assert_eq!(sequencer.pop_ready(), None);

        sequencer.advance(0.2);
        assert_eq!(sequencer.pop_ready(), Some(relocate(2)));
    }

    #[test]
    fn test_interject_all_keeps_order() {
        let mut sequencer = Sequencer::new();
        sequencer.schedule(0.0, relocate(9));
        sequencer.interject_all([(0.0, relocate(1)), (0.0, relocate(2))]);

        assert_eq!(sequencer.pop_ready(), Some(relocate(1)));
        assert_eq!(sequencer.pop_ready(), Some(relocate(2)));
        assert_eq!(sequencer.pop_ready(), Some(relocate(9)));
    }

    #[test]
    fn test_sequence_spacing_and_cancel() {
        let mut sequencer = Sequencer::new();
        let steps = sequencer.sequence(
            vec![TileEffect::score(1), TileEffect::score(2), TileEffect::score(3)],
            0.5,
            true,
        );
        let delays: Vec<f32> = steps.iter().map(|(d, _)| *d).collect();
        assert_eq!(delays, vec![0.0, 0.5, 0.5]);

        sequencer.interject_all(steps);
        sequencer.schedule(0.0, relocate(4));

        let Some(Task::Resolve { sequence, .. }) = sequencer.pop_ready() else {
            panic!("first step should be ready");
        };
        assert_eq!(sequencer.cancel_sequence(sequence), 2);
        assert_eq!(sequencer.pop_ready(), Some(relocate(4)));
    }

    #[test]
    fn test_clear() {
        let mut sequencer = Sequencer::new();
        sequencer.schedule(1.0, relocate(1));
        sequencer.clear();
        assert!(sequencer.is_empty());
    }
}
