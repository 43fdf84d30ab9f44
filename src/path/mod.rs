//! Path model: the ordered tiles the token travels along.
//!
//! ## Key Features
//!
//! - **Validated construction**: a path always has a start and a finish,
//!   and both are checkpoints
//! - **Category rules**: interval-placed checkpoints and minigames, random
//!   event tiles with a guaranteed minimum
//! - **Clamped navigation**: index helpers never leave the path
//!
//! ## Usage
//!
//! ```
//! use rust_pathquest::core::{BoardRng, CategoryRules};
//! use rust_pathquest::path::{layout, Path, TileCategory};
//!
//! let mut rng = BoardRng::new(7);
//! let path = Path::build(&layout::serpentine(40, 8, 1.0))
//!     .unwrap()
//!     .assign_categories(&CategoryRules::default(), &mut rng);
//!
//! assert_eq!(path.tile(39).unwrap().category, TileCategory::Checkpoint);
//! ```

mod categories;
pub mod layout;
mod model;
mod tile;

pub use model::Path;
pub use tile::{Tile, TileCategory};
