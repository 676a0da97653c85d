use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use worldmerge_common::Offset;
use worldmerge_kernel::{KernelError, WorldId, WorldRegistry};

use crate::error::PersistError;
use crate::scan::{WorldListing, region_filename};

/// One region file copy: source name in the old save, target name in the
/// destination save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMove {
    pub source: String,
    pub target: String,
}

/// Everything copied out of one source save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldMove {
    pub world: WorldId,
    pub source: PathBuf,
    pub offset: Offset,
    pub regions: Vec<RegionMove>,
}

/// The confirmed result of placement, ready to hand to the copier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePlan {
    pub destination: PathBuf,
    /// Seed the placement ran with, so the plan can be regenerated.
    pub seed: Option<u64>,
    pub moves: Vec<WorldMove>,
}

impl MergePlan {
    /// Build the plan from a fully placed registry and the listing each
    /// world was built from, in the same order.
    pub fn build(
        registry: &WorldRegistry,
        listings: &[WorldListing],
        seed: Option<u64>,
    ) -> Result<Self, PersistError> {
        if registry.len() != listings.len() || registry.is_empty() {
            return Err(PersistError::PlanMismatch {
                worlds: registry.len(),
                listings: listings.len(),
            });
        }

        let mut moves = Vec::with_capacity(registry.placed_count());
        for (world, listing) in registry.worlds().iter().zip(listings).skip(1) {
            let offset = world.offset();
            let regions = listing
                .files
                .iter()
                .map(|f| -> Result<RegionMove, PersistError> {
                    let target = f.coord.translate(offset).ok_or(
                        KernelError::OffsetOutOfRange {
                            world: world.id(),
                            offset,
                        },
                    )?;
                    Ok(RegionMove {
                        source: f.name.clone(),
                        target: region_filename(target),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            moves.push(WorldMove {
                world: world.id(),
                source: listing.path.clone(),
                offset,
                regions,
            });
        }

        Ok(Self {
            destination: listings[0].path.clone(),
            seed,
            moves,
        })
    }

    /// Total region files the plan copies.
    pub fn region_count(&self) -> usize {
        self.moves.iter().map(|m| m.regions.len()).sum()
    }

    /// Save the plan as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a plan written by [`MergePlan::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let file = std::fs::File::open(path)?;
        let plan: Self = serde_json::from_reader(file)?;
        Ok(plan)
    }
}
