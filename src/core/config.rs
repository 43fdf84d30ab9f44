//! Board configuration types.
//!
//! A session is configured once at startup by providing:
//! - `CategoryRules`: how tile categories are distributed over the path
//! - `MovementConfig`: hop animation and suspension-point timings
//! - `MinigameRewards`: the standard reward/penalty for minigame outcomes
//! - `BoardConfig`: combines the above with the effect table and roster
//!
//! Every field has a default, so a JSON config only needs to name the
//! values it changes.

use serde::{Deserialize, Serialize};

use crate::dispatch::{MinigameId, MinigameRoster};
use crate::effects::EffectTable;

use super::BoardError;

/// Rules for distributing tile categories along a freshly built path.
///
/// Endpoints are always checkpoints. Interval rules take priority over the
/// random event roll at the same index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    /// Every k-th tile becomes a checkpoint (0 disables).
    pub checkpoint_interval: usize,

    /// Every m-th tile becomes a minigame tile (0 disables).
    pub minigame_interval: usize,

    /// Probability that a remaining tile becomes an event tile.
    pub event_chance: f64,

    /// Minimum number of event tiles; normal tiles are converted to reach it.
    pub min_event_tiles: usize,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            checkpoint_interval: 25,
            minigame_interval: 15,
            event_chance: 0.3,
            min_event_tiles: 10,
        }
    }
}

impl CategoryRules {
    /// Rules that leave every interior tile `Normal`.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            checkpoint_interval: 0,
            minigame_interval: 0,
            event_chance: 0.0,
            min_event_tiles: 0,
        }
    }

    /// Set the checkpoint interval.
    #[must_use]
    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval;
        self
    }

    /// Set the minigame interval.
    #[must_use]
    pub fn with_minigame_interval(mut self, interval: usize) -> Self {
        self.minigame_interval = interval;
        self
    }

    /// Set the event chance.
    #[must_use]
    pub fn with_event_chance(mut self, chance: f64) -> Self {
        self.event_chance = chance;
        self
    }

    /// Set the minimum event tile count.
    #[must_use]
    pub fn with_min_event_tiles(mut self, count: usize) -> Self {
        self.min_event_tiles = count;
        self
    }
}

/// Token animation and delay timings, in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Hop progress per second (a hop completes at `1 / hop_speed` seconds).
    pub hop_speed: f32,

    /// Pause between two hops of the same movement.
    pub step_pause: f32,

    /// Height of the sinusoidal bounce layered on the hop.
    pub bounce_amplitude: f32,

    /// Half-periods of bounce per hop.
    pub bounce_speed: f32,

    /// Wait after arrival before the tile is dispatched.
    pub arrival_delay: f32,

    /// Wait before a resolved effect's relocation starts.
    pub effect_delay: f32,

    /// Wait before a quiz or story prompt is shown.
    pub prompt_delay: f32,

    /// Wait before handing off to a minigame scene.
    pub minigame_delay: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            hop_speed: 5.0,
            step_pause: 0.1,
            bounce_amplitude: 0.25,
            bounce_speed: 1.0,
            arrival_delay: 0.5,
            effect_delay: 1.0,
            prompt_delay: 1.0,
            minigame_delay: 1.0,
        }
    }
}

impl MovementConfig {
    /// Zero every delay, keeping the hop animation.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.step_pause = 0.0;
        self.arrival_delay = 0.0;
        self.effect_delay = 0.0;
        self.prompt_delay = 0.0;
        self.minigame_delay = 0.0;
        self
    }

    /// Set the hop speed.
    #[must_use]
    pub fn with_hop_speed(mut self, speed: f32) -> Self {
        self.hop_speed = speed;
        self
    }

    /// Seconds one hop takes.
    #[must_use]
    pub fn hop_duration(&self) -> f32 {
        1.0 / self.hop_speed
    }
}

/// Standard conversion of a minigame outcome into player deltas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinigameRewards {
    /// Score added on a win when the minigame reports no score.
    pub win_score: i64,

    /// Score added on a loss when the minigame reports no score.
    pub loss_score: i64,

    /// Tiles moved forward after a win.
    pub win_tiles: u32,

    /// Tiles moved backward after a loss.
    pub loss_tiles: u32,
}

impl Default for MinigameRewards {
    fn default() -> Self {
        Self {
            win_score: 50,
            loss_score: 0,
            win_tiles: 3,
            loss_tiles: 2,
        }
    }
}

/// Complete session configuration.
///
/// ```
/// use rust_pathquest::core::BoardConfig;
///
/// let config = BoardConfig::default()
///     .with_checkpoint_bonus(200)
///     .with_max_turns(None);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Category distribution rules.
    pub categories: CategoryRules,

    /// Animation and delay timings.
    pub movement: MovementConfig,

    /// Score for landing on a checkpoint. Passing through awards half.
    pub checkpoint_bonus: i64,

    /// Faces on the die used by `roll_dice`.
    pub dice_sides: u32,

    /// Turn limit; exceeding it is a defeat. `None` disables the limit.
    pub max_turns: Option<u32>,

    /// Minigame reward/penalty conversion.
    pub rewards: MinigameRewards,

    /// Minigames handed off to from minigame tiles, in round-robin order.
    pub minigames: MinigameRoster,

    /// Minigame launched on reaching the final tile. `None` wins outright.
    pub final_challenge: Option<MinigameId>,

    /// Weighted effects drawn on event tiles.
    pub effects: EffectTable,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            categories: CategoryRules::default(),
            movement: MovementConfig::default(),
            checkpoint_bonus: 100,
            dice_sides: 12,
            max_turns: Some(20),
            rewards: MinigameRewards::default(),
            minigames: MinigameRoster::default(),
            final_challenge: None,
            effects: EffectTable::default(),
        }
    }
}

impl BoardConfig {
    /// Set category rules.
    #[must_use]
    pub fn with_categories(mut self, rules: CategoryRules) -> Self {
        self.categories = rules;
        self
    }

    /// Set movement timings.
    #[must_use]
    pub fn with_movement(mut self, movement: MovementConfig) -> Self {
        self.movement = movement;
        self
    }

    /// Set the checkpoint landing bonus.
    #[must_use]
    pub fn with_checkpoint_bonus(mut self, bonus: i64) -> Self {
        self.checkpoint_bonus = bonus;
        self
    }

    /// Set the number of die faces.
    #[must_use]
    pub fn with_dice_sides(mut self, sides: u32) -> Self {
        self.dice_sides = sides;
        self
    }

    /// Set or disable the turn limit.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: Option<u32>) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set minigame rewards.
    #[must_use]
    pub fn with_rewards(mut self, rewards: MinigameRewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// Set the minigame roster.
    #[must_use]
    pub fn with_minigames(mut self, roster: MinigameRoster) -> Self {
        self.minigames = roster;
        self
    }

    /// Launch a final challenge minigame on reaching the last tile.
    #[must_use]
    pub fn with_final_challenge(mut self, minigame: MinigameId) -> Self {
        self.final_challenge = Some(minigame);
        self
    }

    /// Set the event effect table.
    #[must_use]
    pub fn with_effects(mut self, effects: EffectTable) -> Self {
        self.effects = effects;
        self
    }

    /// Check every value is usable, failing on the first that is not.
    pub fn validate(&self) -> Result<(), BoardError> {
        let chance = self.categories.event_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(BoardError::InvalidConfig(format!(
                "event_chance must be within [0, 1], got {chance}"
            )));
        }

        if self.dice_sides == 0 {
            return Err(BoardError::InvalidConfig(
                "dice_sides must be at least 1".to_string(),
            ));
        }

        let movement = &self.movement;
        if !(movement.hop_speed.is_finite() && movement.hop_speed > 0.0) {
            return Err(BoardError::InvalidConfig(format!(
                "hop_speed must be positive, got {}",
                movement.hop_speed
            )));
        }

        let delays = [
            ("step_pause", movement.step_pause),
            ("arrival_delay", movement.arrival_delay),
            ("effect_delay", movement.effect_delay),
            ("prompt_delay", movement.prompt_delay),
            ("minigame_delay", movement.minigame_delay),
        ];
        for (name, value) in delays {
            if !(value.is_finite() && value >= 0.0) {
                return Err(BoardError::InvalidConfig(format!(
                    "{name} must be a non-negative number of seconds, got {value}"
                )));
            }
        }

        if !movement.bounce_amplitude.is_finite() || !movement.bounce_speed.is_finite() {
            return Err(BoardError::InvalidConfig(
                "bounce settings must be finite".to_string(),
            ));
        }

        self.effects.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();

        assert_eq!(config.checkpoint_bonus, 100);
        assert_eq!(config.dice_sides, 12);
        assert_eq!(config.max_turns, Some(20));
        assert_eq!(config.categories.checkpoint_interval, 25);
        assert_eq!(config.categories.minigame_interval, 15);
        assert_eq!(config.rewards.win_tiles, 3);
        assert_eq!(config.rewards.loss_tiles, 2);
        assert_eq!(config.minigames.len(), 4);
        assert!(config.final_challenge.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BoardConfig::default()
            .with_checkpoint_bonus(250)
            .with_dice_sides(6)
            .with_max_turns(None)
            .with_final_challenge(MinigameId::new("boss"));

        assert_eq!(config.checkpoint_bonus, 250);
        assert_eq!(config.dice_sides, 6);
        assert_eq!(config.max_turns, None);
        assert_eq!(config.final_challenge, Some(MinigameId::new("boss")));
    }

    #[test]
    fn test_validate_rejects_bad_chance() {
        let config = BoardConfig::default()
            .with_categories(CategoryRules::default().with_event_chance(1.5));

        assert!(matches!(config.validate(), Err(BoardError::InvalidConfig(_))));

        let config = BoardConfig::default()
            .with_categories(CategoryRules::default().with_event_chance(f64::NAN));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_dice_and_bad_timings() {
        assert!(BoardConfig::default().with_dice_sides(0).validate().is_err());

        let movement = MovementConfig::default().with_hop_speed(0.0);
        assert!(BoardConfig::default().with_movement(movement).validate().is_err());

        let movement = MovementConfig {
            arrival_delay: -0.5,
            ..MovementConfig::default()
        };
        let err = BoardConfig::default().with_movement(movement).validate().unwrap_err();
        assert!(err.to_string().contains("arrival_delay"));
    }

    #[test]
    fn test_without_delays() {
        let movement = MovementConfig::default().without_delays();

        assert_eq!(movement.arrival_delay, 0.0);
        assert_eq!(movement.minigame_delay, 0.0);
        assert_eq!(movement.hop_speed, 5.0);
        assert!((movement.hop_duration() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json() {
        let config: BoardConfig =
            serde_json::from_str(r#"{ "checkpoint_bonus": 40, "max_turns": null }"#).unwrap();

        assert_eq!(config.checkpoint_bonus, 40);
        assert_eq!(config.max_turns, None);
        assert_eq!(config.dice_sides, 12);
        assert_eq!(config.categories, CategoryRules::default());
    }

    #[test]
    fn test_serialization() {
        let config = BoardConfig::default().with_checkpoint_bonus(75);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: BoardConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.checkpoint_bonus, 75);
        assert_eq!(deserialized.minigames, config.minigames);
        assert_eq!(deserialized.effects.len(), config.effects.len());
    }
}
