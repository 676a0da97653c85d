//! Placement: randomized offset search for merging worlds.
//!
//! # Invariants
//! - The destination world is never moved.
//! - A world is only accepted at an offset where none of its regions touch
//!   an already accepted region.
//! - The search is bounded; running out of attempts is an error, not a hang.

mod config;
mod engine;

pub use config::{ConfigError, PlacementConfig};
pub use engine::{Placement, PlacementEngine, PlacementError};

pub fn crate_info() -> &'static str {
    "worldmerge-placement v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("placement"));
    }
}
