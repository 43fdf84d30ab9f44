//! Deterministic random number generation for board setup and play.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical boards and rolls
//! - **Context streams**: Tile layout, dice and effect selection draw from
//!   independent sequences, so adding an effect roll never changes the
//!   board layout produced by the same seed
//!
//! ## Usage
//!
//! ```
//! use rust_pathquest::core::BoardRng;
//!
//! let rng = BoardRng::new(42);
//! let mut dice = rng.for_context("dice");
//!
//! let roll = dice.roll_die(6);
//! assert!((1..=6).contains(&roll));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Stream used for category distribution.
pub const CATEGORY_STREAM: &str = "categories";
/// Stream used for dice rolls.
pub const DICE_STREAM: &str = "dice";
/// Stream used for effect selection and effect-local randomness.
pub const EFFECT_STREAM: &str = "effects";

/// Seeded RNG used by every random decision on the board.
///
/// Uses ChaCha8 for speed while keeping sequences reproducible across
/// platforms.
#[derive(Clone, Debug)]
pub struct BoardRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl BoardRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);

        Self::new(hasher.finish())
    }

    /// Roll a die with `sides` faces, returning a value in `1..=sides`.
    ///
    /// A die with zero sides always rolls 1.
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        if sides <= 1 {
            return 1;
        }
        self.inner.gen_range(1..=sides)
    }

    /// Random integer in the inclusive range `[min, max]`.
    ///
    /// The bounds are swapped if given in the wrong order.
    pub fn range_inclusive(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.inner.gen_range(lo..=hi)
    }

    /// Random index in `0..len`. Returns `None` for an empty range.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..len))
        }
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Chance roll: true with the given probability.
    ///
    /// Probabilities are clamped into `[0, 1]`; NaN counts as 0.
    pub fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.inner.gen_bool(probability)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Choose an index with weighted probability.
    ///
    /// Weights do not need to sum to anything in particular. Returns `None`
    /// if weights are empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut threshold = self.inner.gen_range(0..total);
        for (i, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if threshold < weight {
                return Some(i);
            }
            threshold -= weight;
        }

        None
    }
}
