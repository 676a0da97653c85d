//! World Kernel: region coordinate sets, worlds, and the registry of placed worlds.
//!
//! # Invariants
//! - A world always owns at least one region.
//! - Bounding boxes are derived from a coordinate set, never patched in place.
//! - The registry union holds exactly the sum of every accepted world's regions;
//!   no two accepted worlds share a coordinate.

mod coords;
mod error;
mod map;
mod registry;
pub mod world;

pub use coords::{BoundingBox, CoordinateSet};
pub use error::KernelError;
pub use map::{RegionMap, ordinal_token};
pub use registry::WorldRegistry;
pub use world::{World, WorldId};

pub fn crate_info() -> &'static str {
    "worldmerge-kernel v0.1.0"
}
