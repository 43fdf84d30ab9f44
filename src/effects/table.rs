//! Weighted table of event-tile effects.

use serde::{Deserialize, Serialize};

use crate::core::{BoardError, BoardRng};

use super::{
    ComboEffect, MovementEffect, QuizEffect, QuizRewardPool, ResourceEffect, ResourceTarget,
    Spaces, StatusEffect, StatusKind, StoryChoice, StoryEffect, TileEffect,
};

/// Smallest allowed selection weight.
pub const MIN_WEIGHT: u32 = 1;
/// Largest allowed selection weight.
pub const MAX_WEIGHT: u32 = 10;
/// Weight given to entries that do not set one.
pub const DEFAULT_WEIGHT: u32 = 5;

/// Presentation and selection metadata shared by every effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectMeta {
    /// Display name, used as the notification title.
    pub name: String,
    /// Relative selection weight in `MIN_WEIGHT..=MAX_WEIGHT`.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Show a notification when the effect triggers.
    #[serde(default = "default_notify")]
    pub notify: bool,
    /// Sound played when the effect triggers.
    #[serde(default)]
    pub sound: Option<String>,
}

/// One selectable effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
    #[serde(flatten)]
    pub meta: EffectMeta,
    pub effect: TileEffect,
}

impl EffectEntry {
    /// Create an entry with default weight that notifies.
    pub fn new(name: impl Into<String>, effect: TileEffect) -> Self {
        Self {
            meta: EffectMeta {
                name: name.into(),
                weight: DEFAULT_WEIGHT,
                notify: true,
                sound: None,
            },
            effect,
        }
    }

    /// Set the selection weight.
    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.meta.weight = weight;
        self
    }

    /// Set the trigger sound.
    #[must_use]
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.meta.sound = Some(sound.into());
        self
    }

    /// Trigger without a notification.
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.meta.notify = false;
        self
    }
}

/// Effects an event tile draws from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectTable {
    entries: Vec<EffectEntry>,
}

impl Default for EffectTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl EffectTable {
    /// An empty table; event tiles drawing from it do nothing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The stock effect mix.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with(
                EffectEntry::new("Pop Quiz", TileEffect::Quiz(QuizEffect::randomized(QuizRewardPool::default())))
                    .with_weight(6)
                    .with_sound("quiz"),
            )
            .with(EffectEntry::new("Lucky Find", TileEffect::score(200)).with_sound("coin"))
            .with(
                EffectEntry::new(
                    "Tollbooth",
                    TileEffect::Resource(ResourceEffect {
                        target: ResourceTarget::Score,
                        score_change: -1,
                        moves_change: 0,
                        percentage: Some(10),
                    }),
                )
                .with_weight(3),
            )
            .with(
                EffectEntry::new(
                    "Tailwind",
                    TileEffect::Movement(MovementEffect::Forward {
                        spaces: Spaces::Random { min: 1, max: 3 },
                    }),
                )
                .with_weight(4),
            )
            .with(
                EffectEntry::new(
                    "Slippery Path",
                    TileEffect::Movement(MovementEffect::Backward {
                        spaces: Spaces::Random { min: 1, max: 2 },
                    }),
                )
                .with_weight(3),
            )
            .with(EffectEntry::new("Second Wind", TileEffect::Movement(MovementEffect::ExtraTurn)).with_weight(2))
            .with(EffectEntry::new("Detour", TileEffect::Movement(MovementEffect::SkipTurn)).with_weight(2))
            .with(
                EffectEntry::new(
                    "Four-Leaf Clover",
                    TileEffect::Status(StatusEffect::new(StatusKind::Luck, 1, 3).with_chance(0.75)),
                )
                .with_weight(3),
            )
            .with(
                EffectEntry::new(
                    "Treasure Trail",
                    TileEffect::Combo(
                        ComboEffect::sequential(vec![TileEffect::score(100), TileEffect::forward(1)], 0.5)
                            .requiring(Some(100), None),
                    ),
                )
                .with_weight(2),
            )
            .with(
                EffectEntry::new(
                    "Crossroads",
                    TileEffect::Story(
                        StoryEffect::new("Crossroads", "The path splits around an old well.")
                            .with_choice(
                                StoryChoice::new("Take the shortcut")
                                    .with_effect(TileEffect::forward(2))
                                    .with_result_text("You slip through the hedge."),
                            )
                            .with_choice(
                                StoryChoice::new("Rest by the well")
                                    .with_effect(TileEffect::moves(1))
                                    .with_result_text("You feel refreshed."),
                            ),
                    ),
                )
                .with_weight(2),
            )
    }

    /// Add an entry (builder form).
    #[must_use]
    pub fn with(mut self, entry: EffectEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Add an entry.
    pub fn push(&mut self, entry: EffectEntry) {
        self.entries.push(entry);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = &EffectEntry> {
        self.entries.iter()
    }

    /// Draw one entry by weight. `None` for an empty table.
    pub fn choose(&self, rng: &mut BoardRng) -> Option<&EffectEntry> {
        let weights: Vec<u32> = self.entries.iter().map(|e| e.meta.weight).collect();
        rng.choose_weighted(&weights).map(|i| &self.entries[i])
    }

    /// Check weights and effect parameters.
    pub fn validate(&self) -> Result<(), BoardError> {
        for entry in &self.entries {
            let weight = entry.meta.weight;
            if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
                return Err(BoardError::InvalidConfig(format!(
                    "effect '{}' weight must be within {MIN_WEIGHT}..={MAX_WEIGHT}, got {weight}",
                    entry.meta.name
                )));
            }
            validate_effect(&entry.meta.name, &entry.effect)?;
        }
        Ok(())
    }
}

fn validate_effect(name: &str, effect: &TileEffect) -> Result<(), BoardError> {
    match effect {
        TileEffect::Status(status) if !(0.0..=1.0).contains(&status.chance) => {
            Err(BoardError::InvalidConfig(format!(
                "effect '{name}' chance must be within [0, 1], got {}",
                status.chance
            )))
        }
        TileEffect::Combo(combo) => {
            if !(combo.delay.is_finite() && combo.delay >= 0.0) {
                return Err(BoardError::InvalidConfig(format!(
                    "effect '{name}' combo delay must be non-negative"
                )));
            }
            combo.effects.iter().try_for_each(|inner| validate_effect(name, inner))
        }
        TileEffect::Story(story) => story
            .choices
            .iter()
            .filter_map(|choice| choice.effect.as_deref())
            .try_for_each(|inner| validate_effect(name, inner)),
        _ => Ok(()),
    }
}

fn default_weight() -> u32 {
    DEFAULT_WEIGHT
}

fn default_notify() -> bool {
    true
}
