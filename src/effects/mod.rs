//! Tile effects: what event tiles do to the player.
//!
//! Effects are a closed set of variants ([`TileEffect`]) resolved by the
//! [`EffectResolver`]. The resolver applies whatever can happen right
//! away and hands back [`Followup`]s for what needs a delay, a corrective
//! movement or an answer from the player.
//!
//! ## Example
//!
//! ```
//! use rust_pathquest::core::{BoardRng, PlayerState};
//! use rust_pathquest::effects::{EffectResolver, ResolveResult, ResolverContext, TileEffect};
//!
//! let mut state = PlayerState::new();
//! let mut rng = BoardRng::new(1);
//! let mut context = ResolverContext::new(&mut rng, 24);
//!
//! let resolution = EffectResolver::resolve(&TileEffect::score(200), &mut state, &mut context);
//! assert_eq!(resolution.result, ResolveResult::Applied);
//! assert_eq!(state.score(), 200);
//! ```

mod effect;
mod resolver;
mod table;

pub use effect::{
    ComboEffect, MovementEffect, QuizEffect, QuizReward, QuizRewardKind, QuizRewardPool,
    ResourceEffect, ResourceTarget, Spaces, StatusEffect, StatusKind, StoryChoice, StoryEffect,
    TileEffect,
};
pub use resolver::{
    EffectResolver, Followup, Prompt, QuizPrompt, Relocation, Resolution, ResolveResult,
    ResolverContext,
};
pub use table::{EffectEntry, EffectMeta, EffectTable, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};
