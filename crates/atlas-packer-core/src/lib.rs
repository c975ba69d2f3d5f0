//! Core library for packing rectangles into growable texture atlases.
//!
//! - Placement: each atlas tracks candidate corner points on a grid of used edges and
//!   grows only when no exact fit exists, choosing the growth with the lowest area penalty.
//! - Orchestration: rectangles go to the cheapest atlas; new atlases open on overflow.
//! - Order search: `pack_with_best_order` tries every [`RectOrder`] and keeps the best fill ratio.
//! - Data model is serde-serializable; exporting is left to callers (see the CLI crate).
//!
//! Quick example:
//! ```
//! use atlas_packer_core::prelude::*;
//!
//! let cfg = PackerConfig::builder().padding(2).max_size(256).build();
//! let rects = vec![
//!     AtlasRect::new("a", 64, 32),
//!     AtlasRect::new("b", 32, 32),
//!     AtlasRect::new("c", 300, 10),
//! ];
//! let best = pack_with_best_order(&rects, &cfg);
//! assert_eq!(best.result.not_packed.len(), 1);
//! println!("atlases: {}, order: {}", best.result.atlases.len(), best.order);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod packer;
pub mod search;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use model::*;
pub use packer::*;
pub use search::*;

/// Convenience prelude for common types and functions.
/// Importing `atlas_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder, RectOrder};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::model::{Atlas, AtlasRect, PackResult, PackStats};
    pub use crate::packer::AtlasPacker;
    pub use crate::search::{BestOrder, pack_with_best_order};
}
