//! Tile effect definitions.
//!
//! Effects are the building blocks of event tiles. Each variant owns its
//! own configuration and nothing else; all player data lives in
//! [`PlayerState`](crate::core::PlayerState) and is only touched by the
//! [`EffectResolver`](super::EffectResolver).
//!
//! ## Immediate effects
//!
//! - `Resource`: add/subtract score and/or moves (fixed or percentage)
//! - `Status`: timed buff, chance-gated
//! - `Movement` (skip / extra turn): adjust moves remaining
//!
//! ## Deferred effects
//!
//! These need time or player input and resolve through followups:
//! - `Movement` (forward / back / teleport / checkpoint): corrective relocation
//! - `Quiz`: question prompt, reward branch on the answer
//! - `Story`: choice prompt, optional result effect per choice
//! - `Combo` (sequential): effects spaced by a delay

use serde::{Deserialize, Serialize};

/// A configured tile effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileEffect {
    Resource(ResourceEffect),
    Movement(MovementEffect),
    Status(StatusEffect),
    Quiz(QuizEffect),
    Combo(ComboEffect),
    Story(StoryEffect),
}

impl TileEffect {
    /// Fixed score change.
    pub fn score(delta: i64) -> Self {
        Self::Resource(ResourceEffect {
            target: ResourceTarget::Score,
            score_change: delta,
            moves_change: 0,
            percentage: None,
        })
    }

    /// Fixed moves change.
    pub fn moves(delta: i64) -> Self {
        Self::Resource(ResourceEffect {
            target: ResourceTarget::Moves,
            score_change: 0,
            moves_change: delta,
            percentage: None,
        })
    }

    /// Move forward a fixed number of tiles.
    pub fn forward(spaces: u32) -> Self {
        Self::Movement(MovementEffect::Forward {
            spaces: Spaces::Fixed(spaces),
        })
    }

    /// Move backward a fixed number of tiles.
    pub fn backward(spaces: u32) -> Self {
        Self::Movement(MovementEffect::Backward {
            spaces: Spaces::Fixed(spaces),
        })
    }

    /// Quiz with fixed point rewards.
    pub fn quiz_points(correct: i64, incorrect: i64) -> Self {
        Self::Quiz(QuizEffect::new(QuizReward::points(correct), QuizReward::points(incorrect)))
    }

    /// Notification text for this effect.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Resource(e) => e.summary(),
            Self::Movement(e) => e.summary(),
            Self::Status(e) => e.summary(),
            Self::Quiz(e) => e.summary(),
            Self::Combo(e) => e.summary(),
            Self::Story(e) => e.title.clone(),
        }
    }
}

// === Resource ===

/// Which resource a `ResourceEffect` changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTarget {
    Score,
    Moves,
    Both,
}

impl ResourceTarget {
    /// Whether the score is changed.
    #[must_use]
    pub fn score(self) -> bool {
        matches!(self, Self::Score | Self::Both)
    }

    /// Whether moves remaining are changed.
    #[must_use]
    pub fn moves(self) -> bool {
        matches!(self, Self::Moves | Self::Both)
    }
}

/// Add or subtract score and/or moves.
///
/// With `percentage` set, the amount is that percentage of the current
/// value at application time and the configured change only supplies the
/// sign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEffect {
    pub target: ResourceTarget,
    #[serde(default)]
    pub score_change: i64,
    #[serde(default)]
    pub moves_change: i64,
    #[serde(default)]
    pub percentage: Option<u32>,
}

impl ResourceEffect {
    fn part(&self, change: i64, label: &str) -> String {
        match self.percentage {
            Some(pct) => {
                let sign = if change >= 0 { '+' } else { '-' };
                format!("{sign}{pct}% {label}")
            }
            None => format!("{change:+} {label}"),
        }
    }

    /// Notification text.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.target {
            ResourceTarget::Score => self.part(self.score_change, "Score"),
            ResourceTarget::Moves => self.part(self.moves_change, "Moves"),
            ResourceTarget::Both => format!(
                "{}, {}",
                self.part(self.score_change, "Score"),
                self.part(self.moves_change, "Moves")
            ),
        }
    }
}

// === Movement ===

/// A fixed or random tile count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spaces {
    Fixed(u32),
    Random { min: u32, max: u32 },
}

impl std::fmt::Display for Spaces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Random { min, max } => write!(f, "{min}-{max}"),
        }
    }
}

/// Forced movement or turn adjustment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MovementEffect {
    Forward { spaces: Spaces },
    Backward { spaces: Spaces },
    /// Teleport to `target`, or to a random tile if absent or out of range.
    Teleport { target: Option<usize> },
    ReturnToCheckpoint,
    /// Lose one move (floored at zero).
    SkipTurn,
    /// Gain one move.
    ExtraTurn,
}

impl MovementEffect {
    /// Notification text.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Forward { spaces } => format!("Move forward {spaces} tiles"),
            Self::Backward { spaces } => format!("Move back {spaces} tiles"),
            Self::Teleport { target: Some(index) } => format!("Teleport to tile {index}"),
            Self::Teleport { target: None } => "Teleport to a random tile".to_string(),
            Self::ReturnToCheckpoint => "Return to the last checkpoint".to_string(),
            Self::SkipTurn => "Lose a turn".to_string(),
            Self::ExtraTurn => "Extra turn".to_string(),
        }
    }
}

// === Status ===

/// Kind of timed buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Luck,
    DiceBoost,
    DoubleScore,
    Protection,
    ScoreMultiplier,
}

impl StatusKind {
    fn label(self) -> &'static str {
        match self {
            Self::Luck => "Luck",
            Self::DiceBoost => "to Dice Rolls",
            Self::DoubleScore => "Score Doubler",
            Self::Protection => "Negative Effect Protection",
            Self::ScoreMultiplier => "Score Multiplier",
        }
    }
}

/// Apply a named buff for a number of turns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub status: StatusKind,
    #[serde(default = "default_true")]
    pub positive: bool,
    pub magnitude: i64,
    pub duration: u32,
    /// Probability in `[0, 1]` that the buff is applied.
    #[serde(default = "default_chance")]
    pub chance: f64,
}

impl StatusEffect {
    /// A certain buff.
    #[must_use]
    pub fn new(status: StatusKind, magnitude: i64, duration: u32) -> Self {
        Self {
            status,
            positive: true,
            magnitude,
            duration,
            chance: 1.0,
        }
    }

    /// Turn the buff into a penalty.
    #[must_use]
    pub fn negative(mut self) -> Self {
        self.positive = false;
        self
    }

    /// Gate the buff behind a chance roll.
    #[must_use]
    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = chance;
        self
    }

    /// Key the buff is stored under, e.g. `LuckBoost` or `DiceBoostPenalty`.
    #[must_use]
    pub fn buff_id(&self) -> String {
        let suffix = if self.positive { "Boost" } else { "Penalty" };
        format!("{:?}{suffix}", self.status)
    }

    /// Magnitude with the sign applied.
    #[must_use]
    pub fn signed_magnitude(&self) -> i64 {
        if self.positive {
            self.magnitude
        } else {
            -self.magnitude
        }
    }

    /// Notification text.
    #[must_use]
    pub fn summary(&self) -> String {
        let sign = if self.positive { '+' } else { '-' };
        let turns = if self.duration == 1 {
            "1 turn".to_string()
        } else {
            format!("{} turns", self.duration)
        };
        format!("{sign}{} {} for {turns}", self.magnitude, self.status.label())
    }
}

// === Quiz ===

/// What a quiz answer pays out in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizRewardKind {
    Points,
    Moves,
    Tiles,
}

impl QuizRewardKind {
    /// All kinds, in draw order.
    pub const ALL: [Self; 3] = [Self::Points, Self::Moves, Self::Tiles];
}

/// A signed payout for one quiz branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizReward {
    pub kind: QuizRewardKind,
    pub value: i64,
}

impl QuizReward {
    #[must_use]
    pub fn points(value: i64) -> Self {
        Self { kind: QuizRewardKind::Points, value }
    }

    #[must_use]
    pub fn moves(value: i64) -> Self {
        Self { kind: QuizRewardKind::Moves, value }
    }

    #[must_use]
    pub fn tiles(value: i64) -> Self {
        Self { kind: QuizRewardKind::Tiles, value }
    }

    /// Text shown after the answer, e.g. `+300 points`.
    #[must_use]
    pub fn describe(&self) -> String {
        let unit = match self.kind {
            QuizRewardKind::Points => "points",
            QuizRewardKind::Moves => "moves",
            QuizRewardKind::Tiles => "tiles",
        };
        format!("{:+} {unit}", self.value)
    }
}

/// Value ranges used when a quiz draws its reward kind at random.
///
/// Each pair is an inclusive `(min, max)` range. Rewards are drawn from the
/// positive ranges, penalties from the negative ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizRewardPool {
    pub points: (i64, i64),
    pub penalty_points: (i64, i64),
    pub tiles: (i64, i64),
    pub penalty_tiles: (i64, i64),
    pub moves: (i64, i64),
    pub penalty_moves: (i64, i64),
}

impl Default for QuizRewardPool {
    fn default() -> Self {
        Self {
            points: (200, 500),
            penalty_points: (-300, -100),
            tiles: (1, 3),
            penalty_tiles: (-2, -1),
            moves: (1, 2),
            penalty_moves: (-1, -1),
        }
    }
}

impl QuizRewardPool {
    /// Reward and penalty ranges for a kind.
    #[must_use]
    pub fn ranges(&self, kind: QuizRewardKind) -> ((i64, i64), (i64, i64)) {
        match kind {
            QuizRewardKind::Points => (self.points, self.penalty_points),
            QuizRewardKind::Moves => (self.moves, self.penalty_moves),
            QuizRewardKind::Tiles => (self.tiles, self.penalty_tiles),
        }
    }
}

/// Ask a question and pay out on the answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizEffect {
    pub on_correct: QuizReward,
    pub on_incorrect: QuizReward,
    /// Draw the reward kind and values from `pool` when the quiz is shown.
    #[serde(default)]
    pub randomize_kind: bool,
    #[serde(default)]
    pub pool: QuizRewardPool,
}

impl QuizEffect {
    /// A quiz with fixed rewards.
    #[must_use]
    pub fn new(on_correct: QuizReward, on_incorrect: QuizReward) -> Self {
        Self {
            on_correct,
            on_incorrect,
            randomize_kind: false,
            pool: QuizRewardPool::default(),
        }
    }

    /// A quiz that draws its rewards from `pool`.
    #[must_use]
    pub fn randomized(pool: QuizRewardPool) -> Self {
        Self {
            on_correct: QuizReward::points(0),
            on_incorrect: QuizReward::points(0),
            randomize_kind: true,
            pool,
        }
    }

    /// Notification text.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.randomize_kind {
            "Quiz: answer for a random reward".to_string()
        } else {
            format!(
                "Quiz: {} if correct, {} if wrong",
                self.on_correct.describe(),
                self.on_incorrect.describe()
            )
        }
    }
}

// === Combo ===

/// Several effects applied together or in sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboEffect {
    pub effects: Vec<TileEffect>,
    #[serde(default = "default_true")]
    pub sequential: bool,
    /// Seconds between sequential effects.
    #[serde(default = "default_combo_delay")]
    pub delay: f32,
    #[serde(default)]
    pub randomize_order: bool,
    #[serde(default)]
    pub stop_on_failure: bool,
    /// The combo is skipped entirely below this score.
    #[serde(default)]
    pub min_score: Option<i64>,
    /// The combo is skipped entirely below this many moves.
    #[serde(default)]
    pub min_moves: Option<i64>,
}

impl ComboEffect {
    /// Effects applied all at once.
    #[must_use]
    pub fn parallel(effects: Vec<TileEffect>) -> Self {
        Self {
            effects,
            sequential: false,
            delay: 0.0,
            randomize_order: false,
            stop_on_failure: false,
            min_score: None,
            min_moves: None,
        }
    }

    /// Effects applied one after another, `delay` seconds apart.
    #[must_use]
    pub fn sequential(effects: Vec<TileEffect>, delay: f32) -> Self {
        Self {
            sequential: true,
            delay,
            ..Self::parallel(effects)
        }
    }

    /// Stop at the first effect that fails.
    #[must_use]
    pub fn stop_on_failure(mut self) -> Self {
        self.stop_on_failure = true;
        self
    }

    /// Shuffle the effects before applying them.
    #[must_use]
    pub fn randomized(mut self) -> Self {
        self.randomize_order = true;
        self
    }

    /// Require a minimum score and/or moves before anything is applied.
    #[must_use]
    pub fn requiring(mut self, min_score: Option<i64>, min_moves: Option<i64>) -> Self {
        self.min_score = min_score;
        self.min_moves = min_moves;
        self
    }

    /// Notification text.
    #[must_use]
    pub fn summary(&self) -> String {
        let mode = if self.sequential { "sequential" } else { "parallel" };
        let order = if self.randomize_order { ", randomized" } else { "" };
        format!("Combo: {} effects ({mode}{order})", self.effects.len())
    }
}

// === Story ===

/// One option offered by a story event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryChoice {
    pub label: String,
    #[serde(default)]
    pub result_text: Option<String>,
    #[serde(default)]
    pub effect: Option<Box<TileEffect>>,
}

impl StoryChoice {
    /// A choice with no consequence.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            result_text: None,
            effect: None,
        }
    }

    /// Apply `effect` when this choice is taken.
    #[must_use]
    pub fn with_effect(mut self, effect: TileEffect) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }

    /// Text shown after the choice is taken.
    #[must_use]
    pub fn with_result_text(mut self, text: impl Into<String>) -> Self {
        self.result_text = Some(text.into());
        self
    }
}

/// A short narrative with choices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryEffect {
    pub title: String,
    pub text: String,
    pub choices: Vec<StoryChoice>,
}

impl StoryEffect {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_choice(mut self, choice: StoryChoice) -> Self {
        self.choices.push(choice);
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_chance() -> f64 {
    1.0
}

fn default_combo_delay() -> f32 {
    0.5
}
