//! Persistence: region file discovery, merge plans, and the final copy.
//!
//! # Invariants
//! - Source saves are only ever read.
//! - The destination save only gains files; nothing in it is overwritten.
//! - A failed copy is recorded and never aborts the rest of the batch.
//!
//! # Layout
//! ```text
//! <save>/region/r.<x>.<z>.mca     - region files, the only thing placement reads
//! <save>/poi/r.<x>.<z>.mca        - optional sibling, copied under the new name
//! <save>/entities/r.<x>.<z>.mca   - optional sibling, copied under the new name
//! ```

mod copy;
mod error;
mod plan;
mod scan;

pub use copy::{CopyFailure, CopyReport, SIBLING_DIRS, execute_plan};
pub use error::PersistError;
pub use plan::{MergePlan, RegionMove, WorldMove};
pub use scan::{
    REGION_DIR, RegionFile, RegionFormat, WorldListing, is_region_filename,
    parse_region_filename, region_filename, scan_world,
};

pub fn crate_info() -> &'static str {
    "worldmerge-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }
}
