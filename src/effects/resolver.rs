//! Effect resolution: applying tile effects to the player state.
//!
//! The `EffectResolver` applies the immediate part of an effect directly to
//! [`PlayerState`] and describes everything that needs time or input as
//! [`Followup`]s. The session schedules followups on its task queue; the
//! resolver itself never waits.

use smallvec::{smallvec, SmallVec};
use tracing::debug;

use crate::core::{BoardRng, PlayerState};

use super::{
    ComboEffect, MovementEffect, QuizEffect, QuizReward, QuizRewardKind, ResourceEffect, Spaces,
    StatusEffect, StoryEffect, TileEffect,
};

/// Context for resolving effects.
pub struct ResolverContext<'a> {
    /// Stream for effect-local randomness.
    pub rng: &'a mut BoardRng,
    /// Number of tiles on the path, for random teleports.
    pub path_len: usize,
}

impl<'a> ResolverContext<'a> {
    /// Create a resolver context.
    pub fn new(rng: &'a mut BoardRng, path_len: usize) -> Self {
        Self { rng, path_len }
    }
}

/// Result of resolving an effect.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolveResult {
    /// Effect applied in full.
    Applied,
    /// Effect did not apply (chance roll missed, requirement unmet).
    Failed(String),
    /// Effect continues through followups.
    Deferred,
}

/// Where a corrective movement should take the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relocation {
    /// Signed tile delta from the current tile.
    By(i64),
    /// A specific tile.
    To(usize),
}

/// A quiz waiting for an answer, with its rewards already fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizPrompt {
    pub correct: QuizReward,
    pub incorrect: QuizReward,
}

/// Input the session must collect from the player.
#[derive(Clone, Debug, PartialEq)]
pub enum Prompt {
    Quiz(QuizPrompt),
    Story(StoryEffect),
}

/// Work left over after an effect's immediate part was applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Followup {
    /// Corrective movement after the effect delay.
    Relocate(Relocation),
    /// Show a prompt after the prompt delay.
    Prompt(Prompt),
    /// Resolve effects one at a time, `delay` seconds apart.
    Sequence {
        effects: Vec<TileEffect>,
        delay: f32,
        stop_on_failure: bool,
    },
}

/// Outcome of one resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub result: ResolveResult,
    pub followups: SmallVec<[Followup; 2]>,
}

impl Resolution {
    /// Applied with nothing left to do.
    #[must_use]
    pub fn applied() -> Self {
        Self {
            result: ResolveResult::Applied,
            followups: SmallVec::new(),
        }
    }

    /// Failed with a reason; nothing was changed.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            result: ResolveResult::Failed(reason.into()),
            followups: SmallVec::new(),
        }
    }

    /// Deferred to a single followup.
    #[must_use]
    pub fn deferred(followup: Followup) -> Self {
        Self {
            result: ResolveResult::Deferred,
            followups: smallvec![followup],
        }
    }

    /// Whether the effect failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.result, ResolveResult::Failed(_))
    }
}

/// Applies effects to the player state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve one effect.
    pub fn resolve(
        effect: &TileEffect,
        state: &mut PlayerState,
        context: &mut ResolverContext,
    ) -> Resolution {
        match effect {
            TileEffect::Resource(e) => Self::resolve_resource(e, state),
            TileEffect::Movement(e) => Self::resolve_movement(e, state, context),
            TileEffect::Status(e) => Self::resolve_status(e, state, context),
            TileEffect::Quiz(e) => Self::resolve_quiz(e, context),
            TileEffect::Combo(e) => Self::resolve_combo(e, state, context),
            TileEffect::Story(e) => {
                if e.choices.is_empty() {
                    Resolution::failed("story event has no choices")
                } else {
                    Resolution::deferred(Followup::Prompt(Prompt::Story(e.clone())))
                }
            }
        }
    }

    /// Pay out the branch of an answered quiz.
    pub fn answer_quiz(prompt: &QuizPrompt, correct: bool, state: &mut PlayerState) -> Resolution {
        let reward = if correct { prompt.correct } else { prompt.incorrect };
        debug!(correct, reward = %reward.describe(), "quiz_answered");
        Self::apply_reward(reward, state)
    }

    /// Apply a quiz reward.
    pub fn apply_reward(reward: QuizReward, state: &mut PlayerState) -> Resolution {
        match reward.kind {
            QuizRewardKind::Points => {
                state.add_score(reward.value);
                Resolution::applied()
            }
            QuizRewardKind::Moves => {
                state.add_moves(reward.value);
                Resolution::applied()
            }
            QuizRewardKind::Tiles if reward.value == 0 => Resolution::applied(),
            QuizRewardKind::Tiles => {
                Resolution::deferred(Followup::Relocate(Relocation::By(reward.value)))
            }
        }
    }

    fn resolve_resource(effect: &ResourceEffect, state: &mut PlayerState) -> Resolution {
        if effect.target.score() {
            let delta = Self::resource_delta(effect.score_change, effect.percentage, state.score());
            state.add_score(delta);
        }
        if effect.target.moves() {
            let delta =
                Self::resource_delta(effect.moves_change, effect.percentage, state.moves_remaining());
            state.add_moves(delta);
        }
        Resolution::applied()
    }

    /// Signed amount a resource change applies.
    ///
    /// A percentage is taken of the current value (rounded half up) and
    /// carries the sign of the configured change.
    #[must_use]
    pub fn resource_delta(change: i64, percentage: Option<u32>, current: i64) -> i64 {
        match percentage {
            None => change,
            Some(pct) => {
                let amount = current
                    .max(0)
                    .saturating_mul(i64::from(pct))
                    .saturating_add(50)
                    / 100;
                if change < 0 {
                    -amount
                } else {
                    amount
                }
            }
        }
    }

    fn resolve_movement(
        effect: &MovementEffect,
        state: &mut PlayerState,
        context: &mut ResolverContext,
    ) -> Resolution {
        let relocation = match effect {
            MovementEffect::Forward { spaces } => {
                Relocation::By(Self::roll_spaces(*spaces, context.rng))
            }
            MovementEffect::Backward { spaces } => {
                Relocation::By(-Self::roll_spaces(*spaces, context.rng))
            }
            MovementEffect::Teleport { target } => {
                let index = match target {
                    Some(index) if *index < context.path_len => *index,
                    _ => context.rng.index(context.path_len).unwrap_or(0),
                };
                Relocation::To(index)
            }
            MovementEffect::ReturnToCheckpoint => Relocation::To(state.last_checkpoint_index),
            MovementEffect::SkipTurn => {
                state.add_moves(-1);
                return Resolution::applied();
            }
            MovementEffect::ExtraTurn => {
                state.add_moves(1);
                return Resolution::applied();
            }
        };

        if relocation == Relocation::By(0) {
            return Resolution::applied();
        }
        Resolution::deferred(Followup::Relocate(relocation))
    }

    fn roll_spaces(spaces: Spaces, rng: &mut BoardRng) -> i64 {
        match spaces {
            Spaces::Fixed(n) => i64::from(n),
            Spaces::Random { min, max } => rng.range_inclusive(i64::from(min), i64::from(max)),
        }
    }

    fn resolve_status(
        effect: &StatusEffect,
        state: &mut PlayerState,
        context: &mut ResolverContext,
    ) -> Resolution {
        if !context.rng.chance(effect.chance) {
            return Resolution::failed(format!("{} chance roll missed", effect.buff_id()));
        }
        if effect.duration == 0 {
            return Resolution::failed(format!("{} has no duration", effect.buff_id()));
        }
        state.add_buff(&effect.buff_id(), effect.signed_magnitude(), effect.duration);
        Resolution::applied()
    }

    fn resolve_quiz(effect: &QuizEffect, context: &mut ResolverContext) -> Resolution {
        let prompt = if effect.randomize_kind {
            let slot = context.rng.index(QuizRewardKind::ALL.len()).unwrap_or(0);
            let kind = QuizRewardKind::ALL[slot];
            let ((lo, hi), (penalty_lo, penalty_hi)) = effect.pool.ranges(kind);
            QuizPrompt {
                correct: QuizReward {
                    kind,
                    value: context.rng.range_inclusive(lo, hi),
                },
                incorrect: QuizReward {
                    kind,
                    value: context.rng.range_inclusive(penalty_lo, penalty_hi),
                },
            }
        } else {
            QuizPrompt {
                correct: effect.on_correct,
                incorrect: effect.on_incorrect,
            }
        };
        Resolution::deferred(Followup::Prompt(Prompt::Quiz(prompt)))
    }

    fn resolve_combo(
        effect: &ComboEffect,
        state: &mut PlayerState,
        context: &mut ResolverContext,
    ) -> Resolution {
        if effect.min_score.is_some_and(|min| state.score() < min)
            || effect.min_moves.is_some_and(|min| state.moves_remaining() < min)
        {
            return Resolution::failed("combo requirements not met");
        }

        let mut effects = effect.effects.clone();
        if effect.randomize_order {
            context.rng.shuffle(&mut effects);
        }

        if effect.sequential {
            if effects.is_empty() {
                return Resolution::applied();
            }
            return Resolution::deferred(Followup::Sequence {
                effects,
                delay: effect.delay,
                stop_on_failure: effect.stop_on_failure,
            });
        }

        let mut combined = Resolution::applied();
        for inner in &effects {
            let resolution = Self::resolve(inner, state, context);
            let failed = resolution.is_failed();
            combined.followups.extend(resolution.followups);
            if failed && effect.stop_on_failure {
                combined.result = resolution.result;
                return combined;
            }
        }
        if !combined.followups.is_empty() {
            combined.result = ResolveResult::Deferred;
        }
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{ResourceTarget, StatusKind, StoryChoice};

    fn resolve(effect: &TileEffect, state: &mut PlayerState) -> Resolution {
        let mut rng = BoardRng::new(42);
        let mut context = ResolverContext::new(&mut rng, 20);
        EffectResolver::resolve(effect, state, &mut context)
    }

    #[test]
    fn test_resource_fixed() {
        let mut state = PlayerState::new();
        state.add_score(100);

        let result = resolve(&TileEffect::score(250), &mut state);
        assert_eq!(result.result, ResolveResult::Applied);
        assert_eq!(state.score(), 350);
    }

    #[test]
    fn test_resource_clamps() {
        let mut state = PlayerState::new();
        state.add_score(30);
        state.add_moves(1);

        resolve(&TileEffect::score(-500), &mut state);
        resolve(&TileEffect::moves(-3), &mut state);

        assert_eq!(state.score(), 0);
        assert_eq!(state.moves_remaining(), 0);
    }

    #[test]
    fn test_resource_percentage_sign() {
        let mut state = PlayerState::new();
        state.add_score(200);

        let effect = TileEffect::Resource(ResourceEffect {
            target: ResourceTarget::Score,
            score_change: -1,
            moves_change: 0,
            percentage: Some(25),
        });
        resolve(&effect, &mut state);
        assert_eq!(state.score(), 150);

        // 10% of 4 rounds to 0, never to a positive amount
        assert_eq!(EffectResolver::resource_delta(-1, Some(10), 4), 0);
        assert_eq!(EffectResolver::resource_delta(-1, Some(15), 10), -2);
        assert_eq!(EffectResolver::resource_delta(5, Some(50), 7), 4);
    }

    #[test]
    fn test_resource_both() {
        let mut state = PlayerState::new();
        let effect = TileEffect::Resource(ResourceEffect {
            target: ResourceTarget::Both,
            score_change: 40,
            moves_change: 2,
            percentage: None,
        });
        resolve(&effect, &mut state);

        assert_eq!(state.score(), 40);
        assert_eq!(state.moves_remaining(), 2);
    }

    #[test]
    fn test_movement_relocations() {
        let mut state = PlayerState::new();
        state.last_checkpoint_index = 4;

        let r = resolve(&TileEffect::forward(3), &mut state);
        assert_eq!(r.result, ResolveResult::Deferred);
        assert_eq!(r.followups[0], Followup::Relocate(Relocation::By(3)));

        let r = resolve(&TileEffect::backward(2), &mut state);
        assert_eq!(r.followups[0], Followup::Relocate(Relocation::By(-2)));

        let r = resolve(&TileEffect::Movement(MovementEffect::ReturnToCheckpoint), &mut state);
        assert_eq!(r.followups[0], Followup::Relocate(Relocation::To(4)));

        let r = resolve(&TileEffect::Movement(MovementEffect::Teleport { target: Some(7) }), &mut state);
        assert_eq!(r.followups[0], Followup::Relocate(Relocation::To(7)));
    }

    #[test]
    fn test_teleport_invalid_target_is_random_valid_index() {
        let mut state = PlayerState::new();
        for target in [None, Some(99)] {
            let r = resolve(&TileEffect::Movement(MovementEffect::Teleport { target }), &mut state);
            match &r.followups[0] {
                Followup::Relocate(Relocation::To(index)) => assert!(*index < 20),
                other => panic!("unexpected followup {other:?}"),
            }
        }
    }

    #[test]
    fn test_skip_and_extra_turn() {
        let mut state = PlayerState::new();

        resolve(&TileEffect::Movement(MovementEffect::SkipTurn), &mut state);
        assert_eq!(state.moves_remaining(), 0);

        resolve(&TileEffect::Movement(MovementEffect::ExtraTurn), &mut state);
        resolve(&TileEffect::Movement(MovementEffect::ExtraTurn), &mut state);
        resolve(&TileEffect::Movement(MovementEffect::SkipTurn), &mut state);
        assert_eq!(state.moves_remaining(), 1);
    }

    #[test]
    fn test_status_stacks() {
        let mut state = PlayerState::new();
        let luck = TileEffect::Status(StatusEffect::new(StatusKind::Luck, 2, 3));

        resolve(&luck, &mut state);
        resolve(&luck, &mut state);

        assert_eq!(state.buff_magnitude("LuckBoost"), Some(4));
        assert_eq!(state.buff_duration("LuckBoost"), Some(3));
    }

    #[test]
    fn test_status_chance_miss_fails_quietly() {
        let mut state = PlayerState::new();
        let never = TileEffect::Status(StatusEffect::new(StatusKind::Protection, 1, 2).with_chance(0.0));

        let r = resolve(&never, &mut state);
        assert!(r.is_failed());
        assert_eq!(state, PlayerState::new());
    }

    #[test]
    fn test_quiz_branches() {
        let mut state = PlayerState::new();
        state.add_score(1000);
        let before = state.clone();

        let r = resolve(&TileEffect::quiz_points(300, -150), &mut state);
        let Followup::Prompt(Prompt::Quiz(prompt)) = r.followups[0].clone() else {
            panic!("quiz should prompt");
        };
        assert_eq!(state, before);

        EffectResolver::answer_quiz(&prompt, true, &mut state);
        assert_eq!(state.score(), 1300);

        EffectResolver::answer_quiz(&prompt, false, &mut state);
        assert_eq!(state.score(), 1150);
    }

    #[test]
    fn test_quiz_tiles_relocate() {
        let mut state = PlayerState::new();
        let prompt = QuizPrompt {
            correct: QuizReward::tiles(2),
            incorrect: QuizReward::tiles(-1),
        };

        let r = EffectResolver::answer_quiz(&prompt, false, &mut state);
        assert_eq!(r.followups[0], Followup::Relocate(Relocation::By(-1)));
    }

    #[test]
    fn test_randomized_quiz_draws_from_pool() {
        let mut state = PlayerState::new();
        let quiz = TileEffect::Quiz(QuizEffect::randomized(Default::default()));

        for seed in 0..20 {
            let mut rng = BoardRng::new(seed);
            let mut context = ResolverContext::new(&mut rng, 20);
            let r = EffectResolver::resolve(&quiz, &mut state, &mut context);
            let Followup::Prompt(Prompt::Quiz(prompt)) = &r.followups[0] else {
                panic!("quiz should prompt");
            };
            assert_eq!(prompt.correct.kind, prompt.incorrect.kind);
            assert!(prompt.correct.value > 0);
            assert!(prompt.incorrect.value < 0);
        }
    }

    #[test]
    fn test_combo_gate_blocks_everything() {
        let mut state = PlayerState::new();
        let combo = TileEffect::Combo(
            ComboEffect::parallel(vec![TileEffect::score(100), TileEffect::moves(1)])
                .requiring(Some(500), None),
        );

        let r = resolve(&combo, &mut state);
        assert!(r.is_failed());
        assert_eq!(state, PlayerState::new());
    }

    #[test]
    fn test_combo_parallel() {
        let mut state = PlayerState::new();
        let combo = TileEffect::Combo(ComboEffect::parallel(vec![
            TileEffect::score(100),
            TileEffect::forward(2),
        ]));

        let r = resolve(&combo, &mut state);
        assert_eq!(r.result, ResolveResult::Deferred);
        assert_eq!(state.score(), 100);
        assert_eq!(r.followups.as_slice(), &[Followup::Relocate(Relocation::By(2))]);
    }

    #[test]
    fn test_combo_parallel_stop_on_failure() {
        let mut state = PlayerState::new();
        let never = TileEffect::Status(StatusEffect::new(StatusKind::Luck, 1, 1).with_chance(0.0));
        let combo = TileEffect::Combo(
            ComboEffect::parallel(vec![TileEffect::score(10), never, TileEffect::score(10)])
                .stop_on_failure(),
        );

        let r = resolve(&combo, &mut state);
        assert!(r.is_failed());
        assert_eq!(state.score(), 10);
    }

    #[test]
    fn test_combo_sequential_defers() {
        let mut state = PlayerState::new();
        let combo = TileEffect::Combo(ComboEffect::sequential(
            vec![TileEffect::score(1), TileEffect::score(2)],
            0.5,
        ));

        let r = resolve(&combo, &mut state);
        assert_eq!(state.score(), 0);
        match &r.followups[0] {
            Followup::Sequence { effects, delay, .. } => {
                assert_eq!(effects.len(), 2);
                assert_eq!(*delay, 0.5);
            }
            other => panic!("unexpected followup {other:?}"),
        }
    }

    #[test]
    fn test_story_prompts() {
        let mut state = PlayerState::new();
        let empty = TileEffect::Story(StoryEffect::new("Nothing", "..."));
        assert!(resolve(&empty, &mut state).is_failed());

        let story = StoryEffect::new("Crossroads", "Pick a path.")
            .with_choice(StoryChoice::new("Left"))
            .with_choice(StoryChoice::new("Right"));
        let r = resolve(&TileEffect::Story(story.clone()), &mut state);
        assert_eq!(r.followups[0], Followup::Prompt(Prompt::Story(story)));
    }
}
