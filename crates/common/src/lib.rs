//! Shared types for the world merger: region coordinates and offsets.
//!
//! # Invariants
//! - Coordinates are plain integer values; all arithmetic is exact.

mod types;

pub use types::{BLOCKS_PER_CHUNK, BLOCKS_PER_REGION, CHUNKS_PER_REGION, Offset, RegionCoord};
