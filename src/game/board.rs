//! The play session.

use glam::Vec2;
use tracing::{debug, error, info, warn};

use crate::bridge::{MinigameOutcome, MinigameResultBridge, MinigameSession, ReportStatus};
use crate::collab::Collaborators;
use crate::core::{
    BoardConfig, BoardError, BoardRng, GamePhase, PlayerState, RollRecord, CATEGORY_STREAM,
    DICE_STREAM, EFFECT_STREAM,
};
use crate::dispatch::{ArrivalMode, Dispatch, TileEffectDispatcher};
use crate::effects::{
    EffectEntry, EffectResolver, Followup, Prompt, Relocation, Resolution, ResolveResult,
    ResolverContext,
};
use crate::movement::{MoveMode, MovementController, MovementFinished};
use crate::path::Path;
use crate::schedule::{Sequencer, Task};
use crate::turns::{GameOutcome, TurnScheduler};

/// A roll whose movement and effects have not fully resolved yet.
#[derive(Clone, Copy, Debug)]
struct OpenTurn {
    roll: u32,
    from: usize,
}

/// One play session: the path, the player and every component acting on
/// them.
///
/// The board is a cooperative state machine. Requests (`roll_dice`,
/// `move_steps`, `answer_quiz`, ...) only start work; [`tick`](Self::tick)
/// advances it one frame at a time in a fixed order: movement, then queued
/// tasks, then turn completion, then the end check.
///
/// ```
/// use rust_pathquest::core::{BoardConfig, CategoryRules};
/// use rust_pathquest::game::Board;
/// use rust_pathquest::path::layout;
///
/// let config = BoardConfig::default().with_categories(CategoryRules::plain());
/// let mut board = Board::generate(&layout::serpentine(10, 5, 1.0), config, 7).unwrap();
///
/// board.play_roll(4).unwrap();
/// board.run_until_settled(1.0 / 30.0, 10_000).unwrap();
///
/// assert_eq!(board.state().current_tile_index, 4);
/// assert_eq!(board.state().turn, 2);
/// ```
#[derive(Debug)]
pub struct Board {
    path: Path,
    config: BoardConfig,
    seed: u64,
    state: PlayerState,
    mover: MovementController,
    dispatcher: TileEffectDispatcher,
    bridge: MinigameResultBridge,
    turns: TurnScheduler,
    sequencer: Sequencer,
    prompt: Option<Prompt>,
    away: bool,
    open_turn: Option<OpenTurn>,
    outcome: Option<GameOutcome>,
    dice: BoardRng,
    effect_rng: BoardRng,
    collab: Collaborators,
    shown_score: Option<i64>,
    shown_turn: Option<u32>,
}

impl Board {
    /// Create a session on a prepared path.
    pub fn new(path: Path, config: BoardConfig, seed: u64) -> Result<Self, BoardError> {
        config.validate()?;

        let rng = BoardRng::new(seed);
        let mut board = Self {
            mover: MovementController::new(config.movement.clone(), config.checkpoint_bonus),
            dispatcher: TileEffectDispatcher::new(&config, path.len()),
            bridge: MinigameResultBridge::new(config.rewards.clone()),
            turns: TurnScheduler::new(config.max_turns)
                .with_final_challenge(config.final_challenge.is_some()),
            sequencer: Sequencer::new(),
            prompt: None,
            away: false,
            open_turn: None,
            outcome: None,
            dice: rng.for_context(DICE_STREAM),
            effect_rng: rng.for_context(EFFECT_STREAM),
            collab: Collaborators::default(),
            shown_score: None,
            shown_turn: None,
            state: PlayerState::new(),
            path,
            config,
            seed,
        };
        board.place_at_start();
        Ok(board)
    }

    /// Build a path from coordinates, distribute categories from the seed's
    /// category stream, and create a session on it.
    pub fn generate(coordinates: &[Vec2], config: BoardConfig, seed: u64) -> Result<Self, BoardError> {
        config.validate()?;
        let mut categories = BoardRng::new(seed).for_context(CATEGORY_STREAM);
        let path = Path::build(coordinates)?.assign_categories(&config.categories, &mut categories);
        Self::new(path, config, seed)
    }

    /// Attach external collaborators.
    #[must_use]
    pub fn with_collaborators(mut self, collab: Collaborators) -> Self {
        self.collab = collab;
        self
    }

    /// Replace external collaborators.
    pub fn set_collaborators(&mut self, collab: Collaborators) {
        self.collab = collab;
    }

    // === Accessors ===

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Mutable player state, for hosts that adjust it outside the board
    /// flow.
    pub fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    /// Terminal result, once reached.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// The open quiz or story prompt.
    #[must_use]
    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// The minigame currently handed off to.
    #[must_use]
    pub fn active_minigame(&self) -> Option<&MinigameSession> {
        self.away.then(|| self.bridge.session()).flatten()
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.mover.is_moving()
    }

    /// Animated token position.
    #[must_use]
    pub fn token_position(&self) -> Vec2 {
        self.mover.token_position()
    }

    /// Waiting on a prompt answer or a minigame report.
    #[must_use]
    pub fn awaiting_input(&self) -> bool {
        self.prompt.is_some() || self.away
    }

    /// Nothing is moving, queued or waiting for input.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        !self.mover.is_moving() && self.sequencer.is_empty() && !self.awaiting_input()
    }

    /// Attach a fixed effect to an event tile.
    pub fn attach_effect(&mut self, index: usize, entry: EffectEntry) -> Result<(), BoardError> {
        self.path.tile(index)?;
        self.dispatcher.attach_effect(index, entry);
        Ok(())
    }

    // === Lifecycle ===

    /// Reset the player and every in-flight operation for a new game.
    pub fn new_game(&mut self) {
        let rng = BoardRng::new(self.seed);
        self.state.reset();
        self.mover = MovementController::new(self.config.movement.clone(), self.config.checkpoint_bonus);
        self.bridge.close();
        self.sequencer.clear();
        self.prompt = None;
        self.away = false;
        self.open_turn = None;
        self.outcome = None;
        self.dice = rng.for_context(DICE_STREAM);
        self.effect_rng = rng.for_context(EFFECT_STREAM);
        self.shown_score = None;
        self.shown_turn = None;
        self.place_at_start();
        self.publish();
        info!(seed = self.seed, tiles = self.path.len(), "new_game");
    }

    fn place_at_start(&mut self) {
        self.state.arrive_at(0, self.path.position_of(0));
        self.mover.sync_token(&self.path, &self.state);
    }

    // === Requests ===

    fn ensure_ready(&self) -> Result<(), BoardError> {
        if self.outcome.is_some() {
            return Err(BoardError::GameOver);
        }
        if self.mover.is_moving() {
            debug!("request_rejected_while_moving");
            return Err(BoardError::MovementInProgress);
        }
        if !self.is_quiescent() || self.open_turn.is_some() {
            return Err(BoardError::Busy);
        }
        Ok(())
    }

    /// Roll the die and start the turn's movement.
    pub fn roll_dice(&mut self) -> Result<u32, BoardError> {
        self.ensure_ready()?;
        let roll = self.dice.roll_die(self.config.dice_sides);
        self.play_roll(roll)?;
        Ok(roll)
    }

    /// Start a turn with a roll decided elsewhere (a physical die, a replay).
    pub fn play_roll(&mut self, roll: u32) -> Result<(), BoardError> {
        self.ensure_ready()?;
        self.mover.start(i64::from(roll), MoveMode::Roll)?;
        self.open_turn = Some(OpenTurn {
            roll,
            from: self.state.current_tile_index,
        });
        self.state.phase = GamePhase::Move;
        self.collab.sound.play("dice");
        info!(turn = self.state.turn, roll, "dice_rolled");
        Ok(())
    }

    /// Move the token `steps` tiles outside of a turn (negative moves back).
    ///
    /// Rejected without side effects while another movement is in flight.
    pub fn move_steps(&mut self, steps: i64) -> Result<(), BoardError> {
        self.ensure_ready()?;
        self.mover.start(steps, MoveMode::Roll)?;
        if self.mover.is_moving() {
            self.state.phase = GamePhase::Move;
        }
        Ok(())
    }

    /// Place the token on a tile without animation, then dispatch it.
    pub fn teleport_to_tile(&mut self, index: usize) -> Result<(), BoardError> {
        if self.outcome.is_some() {
            return Err(BoardError::GameOver);
        }
        if self.mover.is_moving() {
            debug!(index, "teleport_rejected_while_moving");
            return Err(BoardError::MovementInProgress);
        }
        self.path.tile(index)?;
        self.ensure_ready()?;

        self.mover.teleport(index, &self.path, &mut self.state)?;
        self.collab.observer.token_moved(self.mover.token_position());
        self.arrive(index, ArrivalMode::Roll);
        Ok(())
    }

    /// Consume the pending tile adjustment with a corrective movement.
    ///
    /// The target is clamped into the path. Minigame tiles met on the way
    /// or at the end are not dispatched.
    pub fn apply_pending_adjustment(&mut self) -> Result<(), BoardError> {
        if self.mover.is_moving() {
            return Err(BoardError::MovementInProgress);
        }
        let adjustment = self.state.take_pending_adjustment();
        if adjustment != 0 {
            debug!(adjustment, "pending_adjustment_applied");
            self.relocate(Relocation::By(adjustment))?;
        }
        Ok(())
    }

    /// Answer the open quiz.
    pub fn answer_quiz(&mut self, correct: bool) -> Result<(), BoardError> {
        let quiz = match &self.prompt {
            Some(Prompt::Quiz(quiz)) => *quiz,
            _ => return Err(BoardError::NoPendingPrompt),
        };
        self.prompt = None;

        let resolution = EffectResolver::answer_quiz(&quiz, correct, &mut self.state);
        let (title, reward) = if correct {
            ("Correct!", quiz.correct)
        } else {
            ("Wrong answer", quiz.incorrect)
        };
        self.collab.sound.play(if correct { "correct" } else { "wrong" });
        self.collab.observer.notify(title, &reward.describe());
        self.follow_up(resolution);
        self.publish();
        Ok(())
    }

    /// Take one of the open story's choices.
    pub fn choose_story_option(&mut self, index: usize) -> Result<(), BoardError> {
        let story = match self.prompt.take() {
            Some(Prompt::Story(story)) => story,
            other => {
                self.prompt = other;
                return Err(BoardError::NoPendingPrompt);
            }
        };
        let choices = story.choices.len();
        if index >= choices {
            self.prompt = Some(Prompt::Story(story));
            return Err(BoardError::InvalidChoice { index, choices });
        }
        let choice = &story.choices[index];

        debug!(story = %story.title, choice = %choice.label, "story_choice_taken");
        if let Some(text) = &choice.result_text {
            self.collab.observer.notify(&choice.label, text);
        }
        if let Some(effect) = &choice.effect {
            let mut context = ResolverContext::new(&mut self.effect_rng, self.path.len());
            let resolution = EffectResolver::resolve(effect, &mut self.state, &mut context);
            self.follow_up(resolution);
        }
        self.publish();
        Ok(())
    }

    /// Deliver the active minigame's result and return to the board.
    ///
    /// Only the first report of a session counts; later ones are ignored.
    pub fn report_minigame(
        &mut self,
        outcome: MinigameOutcome,
        score: Option<i64>,
    ) -> Result<ReportStatus, BoardError> {
        let status = self.bridge.report(&mut self.state, outcome, score);
        if matches!(status, ReportStatus::Recorded(_)) {
            if let Err(err) = self.collab.scenes.load_board() {
                warn!(error = %err, "board_scene_load_failed");
            }
            self.enter_board()?;
        }
        self.publish();
        Ok(status)
    }

    /// Board scene re-entry: consume the transition flags and apply the
    /// pending adjustment.
    pub fn enter_board(&mut self) -> Result<(), BoardError> {
        self.away = false;
        self.bridge.close();

        let returning = self.state.take_returning_from_minigame();
        let final_challenge = self.state.take_final_challenge();
        let show_end_game = self.state.take_show_end_game();
        debug!(returning, final_challenge, show_end_game, "board_entered");

        self.mover.sync_token(&self.path, &self.state);
        if returning {
            self.apply_pending_adjustment()?;
        }
        Ok(())
    }

    // === Frame loop ===

    /// Advance the session by `dt` seconds.
    ///
    /// Fails only when a minigame scene cannot be loaded; the board then
    /// stays on the board with the handoff undone and the turn completed.
    pub fn tick(&mut self, dt: f32) -> Result<(), BoardError> {
        if self.outcome.is_some() {
            return Ok(());
        }
        let dt = dt.max(0.0);

        if self.mover.is_moving() {
            let finished = self.mover.tick(dt, &self.path, &mut self.state);
            self.collab.observer.token_moved(self.mover.token_position());
            if let Some(done) = finished {
                self.on_movement_finished(done);
            }
        }

        let result = self.run_tasks(dt);

        if self.is_quiescent() {
            self.complete_turn();
            self.check_end();
        }
        self.publish();
        result
    }

    /// Tick until the board settles, needs input, or the game ends.
    ///
    /// Returns the number of frames run.
    pub fn run_until_settled(&mut self, dt: f32, max_frames: usize) -> Result<usize, BoardError> {
        for frame in 1..=max_frames {
            self.tick(dt)?;
            if self.outcome.is_some() || self.awaiting_input() || self.is_quiescent() {
                return Ok(frame);
            }
        }
        Ok(max_frames)
    }

    fn run_tasks(&mut self, dt: f32) -> Result<(), BoardError> {
        if self.mover.is_moving() || self.awaiting_input() {
            return Ok(());
        }
        self.sequencer.advance(dt);

        while !self.mover.is_moving() && !self.awaiting_input() {
            let Some(task) = self.sequencer.pop_ready() else {
                break;
            };
            self.run_task(task)?;
        }
        Ok(())
    }

    fn run_task(&mut self, task: Task) -> Result<(), BoardError> {
        match task {
            Task::Dispatch { index, arrival } => self.dispatch_tile(index, arrival),
            Task::Relocate(relocation) => self.relocate(relocation)?,
            Task::ShowPrompt(prompt) => {
                self.collab.observer.prompt_opened(&prompt);
                self.prompt = Some(prompt);
            }
            Task::Resolve {
                effect,
                sequence,
                stop_on_failure,
            } => {
                let mut context = ResolverContext::new(&mut self.effect_rng, self.path.len());
                let resolution = EffectResolver::resolve(&effect, &mut self.state, &mut context);
                if resolution.is_failed() && stop_on_failure {
                    let dropped = self.sequencer.cancel_sequence(sequence);
                    debug!(dropped, "effect_sequence_stopped");
                }
                self.collab.observer.notify("Combo", &effect.summary());
                self.follow_up(resolution);
            }
            Task::LaunchMinigame(session) => self.launch_minigame(session)?,
        }
        Ok(())
    }

    fn on_movement_finished(&mut self, done: MovementFinished) {
        if done.pass_bonus > 0 {
            self.collab.sound.play("checkpoint");
        }
        // A blocked roll on the finish tile retries a final challenge that
        // never launched.
        if done.steps_taken > 0 || done.final_index == self.path.final_index() {
            self.arrive(done.final_index, done.mode.into());
        }
    }

    /// React to the token stopping on `index`.
    fn arrive(&mut self, index: usize, arrival: ArrivalMode) {
        if index == self.path.final_index() {
            self.reach_final_tile();
            return;
        }
        if self.path.tiles()[index].category.is_special() {
            self.state.phase = GamePhase::Action;
            self.sequencer.interject(
                self.config.movement.arrival_delay,
                Task::Dispatch { index, arrival },
            );
        }
    }

    fn reach_final_tile(&mut self) {
        match &self.config.final_challenge {
            Some(minigame) if !self.state.game_won => {
                self.state.is_final_challenge = true;
                self.state.returning_from_minigame = true;
                self.state.last_position = self.state.current_position;
                self.state.phase = GamePhase::Action;
                info!(%minigame, "final_challenge_started");
                self.sequencer.interject(
                    self.config.movement.minigame_delay,
                    Task::LaunchMinigame(MinigameSession::final_challenge(minigame.clone())),
                );
            }
            _ => {
                self.state.game_won = true;
                self.state.show_end_game = true;
                info!(score = self.state.score(), "final_tile_reached");
            }
        }
    }

    fn dispatch_tile(&mut self, index: usize, arrival: ArrivalMode) {
        let tile = match self.path.tile(index) {
            Ok(tile) => *tile,
            Err(err) => {
                warn!(error = %err, "dispatch_skipped");
                return;
            }
        };

        match self
            .dispatcher
            .dispatch(&tile, &mut self.state, &mut self.effect_rng, arrival)
        {
            Dispatch::Nothing => {}
            Dispatch::Checkpoint { .. } => self.collab.sound.play("checkpoint"),
            Dispatch::Effect(triggered) => {
                if let Some(sound) = &triggered.sound {
                    self.collab.sound.play(sound);
                }
                if triggered.notify {
                    self.collab.observer.notify(&triggered.name, &triggered.summary);
                }
                if let ResolveResult::Failed(reason) = &triggered.resolution.result {
                    debug!(effect = %triggered.name, %reason, "effect_failed");
                }
                self.follow_up(triggered.resolution);
            }
            Dispatch::Minigame(minigame) => {
                self.state.phase = GamePhase::Action;
                self.sequencer.interject(
                    self.config.movement.minigame_delay,
                    Task::LaunchMinigame(MinigameSession::regular(minigame)),
                );
            }
        }
    }

    /// Queue an effect's followups ahead of anything already waiting.
    fn follow_up(&mut self, resolution: Resolution) {
        let movement = &self.config.movement;
        let mut tasks = Vec::with_capacity(resolution.followups.len());

        for followup in resolution.followups {
            match followup {
                Followup::Relocate(relocation) => {
                    tasks.push((movement.effect_delay, Task::Relocate(relocation)));
                }
                Followup::Prompt(prompt) => {
                    tasks.push((movement.prompt_delay, Task::ShowPrompt(prompt)));
                }
                Followup::Sequence {
                    effects,
                    delay,
                    stop_on_failure,
                } => tasks.extend(self.sequencer.sequence(effects, delay, stop_on_failure)),
            }
        }

        if !tasks.is_empty() {
            self.state.phase = GamePhase::Action;
            self.sequencer.interject_all(tasks);
        }
    }

    fn relocate(&mut self, relocation: Relocation) -> Result<(), BoardError> {
        let current = self.state.current_tile_index;
        let target = match relocation {
            Relocation::By(delta) => {
                let current = i64::try_from(current).unwrap_or(i64::MAX);
                self.path.clamp_index(current.saturating_add(delta))
            }
            Relocation::To(index) => index.min(self.path.final_index()),
        };
        if target == current {
            return Ok(());
        }

        let delta = if target > current {
            i64::try_from(target - current).unwrap_or(i64::MAX)
        } else {
            -i64::try_from(current - target).unwrap_or(i64::MAX)
        };
        self.mover.start(delta, MoveMode::Corrective)?;
        self.state.phase = GamePhase::Move;
        Ok(())
    }

    fn launch_minigame(&mut self, session: MinigameSession) -> Result<(), BoardError> {
        self.bridge.open(session.clone());

        match self.collab.scenes.load_minigame(&session.minigame) {
            Ok(()) => {
                self.away = true;
                self.complete_turn();
                self.collab.sound.play("minigame");
                info!(
                    minigame = %session.minigame,
                    final_challenge = session.final_challenge,
                    "minigame_launched"
                );
                Ok(())
            }
            Err(source) => {
                error!(minigame = %session.minigame, error = %source, "minigame_load_failed");
                self.bridge.close();
                self.state.returning_from_minigame = false;
                self.state.is_final_challenge = false;
                Err(BoardError::MinigameLoad {
                    minigame: session.minigame,
                    source,
                })
            }
        }
    }

    fn complete_turn(&mut self) {
        let Some(open) = self.open_turn.take() else {
            return;
        };
        let advance = self.turns.on_dice_resolved(&mut self.state);
        self.state.record_roll(RollRecord {
            turn: advance.turn.saturating_sub(1),
            roll: open.roll,
            from: open.from,
            to: self.state.current_tile_index,
            score: self.state.score(),
        });
        if !advance.expired.is_empty() {
            debug!(expired = ?advance.expired, "buffs_expired");
        }
        if !self.away {
            self.state.phase = GamePhase::Roll;
        }
    }

    fn check_end(&mut self) {
        let Some(outcome) = self
            .turns
            .check_end_conditions(&self.state, self.path.final_index())
        else {
            self.state.phase = GamePhase::Roll;
            return;
        };

        self.outcome = Some(outcome);
        self.state.phase = GamePhase::End;
        info!(?outcome, score = self.state.score(), turn = self.state.turn, "game_ended");

        self.collab.sound.play(match outcome {
            GameOutcome::Victory => "victory",
            GameOutcome::Defeat => "defeat",
        });
        self.collab.observer.game_ended(outcome, self.state.score());
    }

    /// Push score and turn changes to the observer.
    fn publish(&mut self) {
        let score = self.state.score();
        if self.shown_score != Some(score) {
            self.shown_score = Some(score);
            self.collab.observer.score_changed(score);
        }
        let turn = self.state.turn;
        if self.shown_turn != Some(turn) {
            self.shown_turn = Some(turn);
            self.collab.observer.turn_changed(turn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CategoryRules, MovementConfig};
    use crate::dispatch::{MinigameId, MinigameRoster};
    use crate::effects::{EffectTable, QuizReward, TileEffect};
    use crate::path::{layout, TileCategory};

    const DT: f32 = 1.0 / 30.0;

    fn plain_config() -> BoardConfig {
        BoardConfig::default()
            .with_categories(CategoryRules::plain())
            .with_effects(EffectTable::new())
    }

    fn board_with(len: usize, special: &[(usize, TileCategory)], config: BoardConfig) -> Board {
        let mut path = Path::build(&layout::serpentine(len, 5, 1.0)).unwrap();
        for &(i, c) in special {
            path = path.with_category(i, c).unwrap();
        }
        Board::new(path, config, 42).unwrap()
    }

    struct Broken;

    impl crate::collab::SceneLoader for Broken {
        fn load_minigame(&mut self, minigame: &MinigameId) -> Result<(), crate::core::SceneError> {
            Err(crate::core::SceneError::NotFound(minigame.to_string()))
        }

        fn load_board(&mut self) -> Result<(), crate::core::SceneError> {
            Ok(())
        }
    }

    fn settle(board: &mut Board) {
        board.run_until_settled(DT, 100_000).unwrap();
    }

    #[test]
    fn test_new_board_starts_at_tile_zero() {
        let board = board_with(10, &[], plain_config());

        assert_eq!(board.state().current_tile_index, 0);
        assert_eq!(board.state().turn, 1);
        assert!(board.is_quiescent());
        assert_eq!(board.outcome(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let path = Path::build(&layout::serpentine(5, 5, 1.0)).unwrap();
        let config = plain_config().with_dice_sides(0);

        assert!(matches!(Board::new(path, config, 1), Err(BoardError::InvalidConfig(_))));
    }

    #[test]
    fn test_roll_completes_turn() {
        let mut board = board_with(20, &[], plain_config());

        let roll = board.roll_dice().unwrap();
        assert!((1..=12).contains(&roll));
        settle(&mut board);

        assert_eq!(board.state().current_tile_index, roll as usize);
        assert_eq!(board.state().turn, 2);
        assert_eq!(board.state().history.len(), 1);
        assert_eq!(board.state().history[0].roll, roll);
        assert_eq!(board.state().phase, GamePhase::Roll);
    }

    #[test]
    fn test_roll_rejected_while_moving() {
        let mut board = board_with(20, &[], plain_config());

        board.play_roll(3).unwrap();
        board.tick(DT).unwrap();
        let before = board.state().clone();

        assert_eq!(board.play_roll(2), Err(BoardError::MovementInProgress));
        assert_eq!(board.move_steps(2), Err(BoardError::MovementInProgress));
        assert_eq!(board.teleport_to_tile(5), Err(BoardError::MovementInProgress));
        assert_eq!(board.state(), &before);
    }

    #[test]
    fn test_checkpoint_landing_after_delay() {
        let mut board = board_with(10, &[(3, TileCategory::Checkpoint)], plain_config());

        board.play_roll(3).unwrap();
        settle(&mut board);

        assert_eq!(board.state().score(), 100);
        assert_eq!(board.state().last_checkpoint_index, 3);
    }

    #[test]
    fn test_event_effect_with_relocation() {
        let mut board = board_with(12, &[(2, TileCategory::Event)], plain_config());
        board.attach_effect(2, EffectEntry::new("Tailwind", TileEffect::forward(3))).unwrap();

        board.play_roll(2).unwrap();
        settle(&mut board);

        assert_eq!(board.state().current_tile_index, 5);
        assert_eq!(board.state().turn, 2);
        assert_eq!(board.state().history[0].to, 5);
    }

    #[test]
    fn test_quiz_prompt_flow() {
        let mut board = board_with(12, &[(2, TileCategory::Event)], plain_config());
        board
            .attach_effect(2, EffectEntry::new("Quiz", TileEffect::quiz_points(300, -150)))
            .unwrap();

        board.play_roll(2).unwrap();
        settle(&mut board);

        assert!(matches!(board.pending_prompt(), Some(Prompt::Quiz(_))));
        assert_eq!(board.play_roll(1), Err(BoardError::Busy));
        assert_eq!(board.state().turn, 1);

        board.answer_quiz(true).unwrap();
        assert_eq!(board.state().score(), 300);
        assert_eq!(board.answer_quiz(true), Err(BoardError::NoPendingPrompt));

        settle(&mut board);
        assert_eq!(board.state().turn, 2);
    }

    #[test]
    fn test_quiz_tiles_reward_moves_token() {
        let mut board = board_with(12, &[(2, TileCategory::Event)], plain_config());
        let quiz = crate::effects::QuizEffect::new(QuizReward::tiles(2), QuizReward::tiles(-1));
        board.attach_effect(2, EffectEntry::new("Quiz", TileEffect::Quiz(quiz))).unwrap();

        board.play_roll(2).unwrap();
        settle(&mut board);
        board.answer_quiz(false).unwrap();
        settle(&mut board);

        assert_eq!(board.state().current_tile_index, 1);
    }

    #[test]
    fn test_story_choice() {
        use crate::effects::{StoryChoice, StoryEffect};

        let mut board = board_with(12, &[(2, TileCategory::Event)], plain_config());
        let story = StoryEffect::new("Well", "A coin glints below.")
            .with_choice(StoryChoice::new("Leave it"))
            .with_choice(StoryChoice::new("Fish it out").with_effect(TileEffect::score(40)));
        board.attach_effect(2, EffectEntry::new("Well", TileEffect::Story(story))).unwrap();

        board.play_roll(2).unwrap();
        settle(&mut board);

        assert_eq!(
            board.choose_story_option(5),
            Err(BoardError::InvalidChoice { index: 5, choices: 2 })
        );
        assert!(board.pending_prompt().is_some());

        board.choose_story_option(1).unwrap();
        assert_eq!(board.state().score(), 40);
        assert!(board.pending_prompt().is_none());
    }

    #[test]
    fn test_minigame_round_trip() {
        let config = plain_config().with_minigames(MinigameRoster::new(["memory"]));
        let mut board = board_with(20, &[(4, TileCategory::Minigame)], config);

        board.play_roll(6).unwrap();
        settle(&mut board);

        assert_eq!(board.state().current_tile_index, 4);
        assert_eq!(
            board.active_minigame().map(|s| s.minigame.clone()),
            Some(MinigameId::new("memory"))
        );
        assert_eq!(board.state().turn, 2);
        assert!(board.state().returning_from_minigame);

        let status = board.report_minigame(MinigameOutcome::Win, None).unwrap();
        assert!(matches!(status, ReportStatus::Recorded(_)));
        assert!(!board.state().returning_from_minigame);
        assert_eq!(
            board.report_minigame(MinigameOutcome::Loss, None).unwrap(),
            ReportStatus::Ignored
        );

        settle(&mut board);
        assert_eq!(board.state().current_tile_index, 7);
        assert_eq!(board.state().score(), 50);
        assert_eq!(board.state().pending_tile_adjustment, 0);
    }

    #[test]
    fn test_correction_does_not_retrigger_minigame() {
        let config = plain_config().with_minigames(MinigameRoster::new(["memory"]));
        let mut board = board_with(20, &[(4, TileCategory::Minigame), (6, TileCategory::Minigame)], config);

        board.play_roll(4).unwrap();
        settle(&mut board);
        board.report_minigame(MinigameOutcome::Loss, None).unwrap();
        settle(&mut board);

        assert_eq!(board.state().current_tile_index, 2);
        assert!(board.active_minigame().is_none());

        board.state_mut().pending_tile_adjustment = 4;
        board.apply_pending_adjustment().unwrap();
        settle(&mut board);

        assert_eq!(board.state().current_tile_index, 6);
        assert!(board.active_minigame().is_none());
        assert_eq!(board.state().minigame_cursor, 0);
    }

    #[test]
    fn test_minigame_load_failure_falls_back() {
        let config = plain_config().with_minigames(MinigameRoster::new(["memory"]));
        let mut board = board_with(20, &[(4, TileCategory::Minigame)], config)
            .with_collaborators(Collaborators::default().with_scenes(Broken));

        board.play_roll(4).unwrap();
        let err = board.run_until_settled(DT, 100_000).unwrap_err();

        assert!(matches!(err, BoardError::MinigameLoad { .. }));
        assert!(!board.state().returning_from_minigame);
        assert!(board.active_minigame().is_none());
        assert_eq!(board.state().turn, 2);
        assert_eq!(board.state().current_tile_index, 4);

        board.play_roll(1).unwrap();
        settle(&mut board);
        assert_eq!(board.state().current_tile_index, 5);
    }

    #[test]
    fn test_final_challenge_load_failure_does_not_win() {
        let config = plain_config().with_final_challenge(MinigameId::new("boss"));
        let mut board = board_with(6, &[], config)
            .with_collaborators(Collaborators::default().with_scenes(Broken));

        board.play_roll(5).unwrap();
        let err = board.run_until_settled(DT, 100_000).unwrap_err();
        assert!(matches!(err, BoardError::MinigameLoad { .. }));

        settle(&mut board);
        assert_eq!(board.outcome(), None);
        assert!(!board.state().game_won);
        assert!(!board.state().is_final_challenge);
        assert_eq!(board.state().current_tile_index, 5);

        board.set_collaborators(Collaborators::default());
        board.play_roll(1).unwrap();
        settle(&mut board);
        assert_eq!(
            board.active_minigame(),
            Some(&MinigameSession::final_challenge(MinigameId::new("boss")))
        );

        board.report_minigame(MinigameOutcome::Win, None).unwrap();
        settle(&mut board);
        assert_eq!(board.outcome(), Some(GameOutcome::Victory));
    }

    #[test]
    fn test_final_challenge() {
        let config = plain_config().with_final_challenge(MinigameId::new("boss"));
        let mut board = board_with(6, &[], config);

        board.play_roll(5).unwrap();
        settle(&mut board);
        assert!(board.state().is_final_challenge);
        assert_eq!(board.outcome(), None);

        board.report_minigame(MinigameOutcome::Loss, None).unwrap();
        settle(&mut board);
        assert_eq!(board.state().current_tile_index, 3);
        assert!(!board.state().is_final_challenge);

        board.play_roll(4).unwrap();
        settle(&mut board);
        board.report_minigame(MinigameOutcome::Win, None).unwrap();
        settle(&mut board);

        assert!(board.state().game_won);
        assert_eq!(board.outcome(), Some(GameOutcome::Victory));
        assert_eq!(board.roll_dice(), Err(BoardError::GameOver));
    }

    #[test]
    fn test_defeat_on_turn_limit() {
        let config = plain_config().with_max_turns(Some(2));
        let mut board = board_with(40, &[], config);

        for _ in 0..2 {
            board.play_roll(1).unwrap();
            settle(&mut board);
        }

        assert_eq!(board.outcome(), Some(GameOutcome::Defeat));
        assert_eq!(board.move_steps(1), Err(BoardError::GameOver));
    }

    #[test]
    fn test_new_game_resets() {
        let mut board = board_with(10, &[], plain_config());
        board.play_roll(9).unwrap();
        settle(&mut board);
        assert_eq!(board.outcome(), Some(GameOutcome::Victory));

        board.new_game();

        assert_eq!(board.outcome(), None);
        assert_eq!(board.state().current_tile_index, 0);
        assert_eq!(board.state().turn, 1);
        assert!(board.state().history.is_empty());
        assert!(!board.state().game_won);
        assert_eq!(board.token_position(), board.path().position_of(0));
        assert!(board.roll_dice().is_ok());
    }

    #[test]
    fn test_teleport_dispatches_target() {
        let mut board = board_with(10, &[(6, TileCategory::Checkpoint)], plain_config());

        board.teleport_to_tile(6).unwrap();
        assert_eq!(board.state().current_tile_index, 6);
        settle(&mut board);

        assert_eq!(board.state().score(), 100);
        assert_eq!(
            board.teleport_to_tile(10),
            Err(BoardError::IndexOutOfRange { index: 10, len: 10 })
        );
    }

    #[test]
    fn test_zero_delays_settle_quickly() {
        let config = plain_config().with_movement(MovementConfig::default().without_delays());
        let mut board = board_with(10, &[(2, TileCategory::Checkpoint)], config);

        board.play_roll(2).unwrap();
        let frames = board.run_until_settled(0.5, 100).unwrap();

        assert!(frames <= 3, "settled in {frames} frames");
        assert_eq!(board.state().score(), 100);
    }
}
