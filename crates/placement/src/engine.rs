use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use worldmerge_common::Offset;
use worldmerge_kernel::{KernelError, World, WorldId, WorldRegistry};

use crate::config::{ConfigError, PlacementConfig};

/// Errors from placing worlds.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("no free spot found for world {world} after {attempts} attempts")]
    Exhausted { world: WorldId, attempts: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// The offset chosen for one world. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub world: WorldId,
    pub offset: Offset,
    /// Candidates tried, including the accepted one. Zero for the destination.
    pub attempts: u32,
}

/// Rejection-sampling search for collision-free offsets.
///
/// Each candidate is a point at a random distance and bearing from the
/// origin; it is accepted when the translated world misses every region
/// already in the registry.
pub struct PlacementEngine<R> {
    config: PlacementConfig,
    rng: R,
}

impl PlacementEngine<ChaCha8Rng> {
    /// Engine with a ChaCha8 stream seeded for reproducible plans.
    pub fn seeded(config: PlacementConfig, seed: u64) -> Result<Self, PlacementError> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> PlacementEngine<R> {
    pub fn new(config: PlacementConfig, rng: R) -> Result<Self, PlacementError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Draw one candidate offset for a world placed after `moved` others.
    ///
    /// Components are truncated toward zero.
    pub fn sample_offset(&mut self, moved: usize) -> Offset {
        let base = self.config.base_distance(moved);
        let variance = self.config.move_variance;
        let distance = self
            .rng
            .gen_range(base.saturating_sub(variance)..=base.saturating_add(variance));
        let direction = self.rng.gen_range(0.0..TAU);
        let (sin, cos) = direction.sin_cos();
        Offset::new(
            (f64::from(distance) * sin) as i32,
            (f64::from(distance) * cos) as i32,
        )
    }

    /// Search for an offset where `world` clears everything in `registry`.
    ///
    /// The first world into an empty registry is the destination and gets a
    /// zero offset without searching. Nothing is mutated.
    pub fn find_placement(
        &mut self,
        world: &World,
        registry: &WorldRegistry,
    ) -> Result<Placement, PlacementError> {
        if registry.is_empty() {
            return Ok(Placement {
                world: world.id(),
                offset: Offset::ZERO,
                attempts: 0,
            });
        }

        let moved = registry.placed_count();
        let occupied = registry.union_coordinates();
        for attempt in 1..=self.config.max_attempts {
            let offset = self.sample_offset(moved);
            tracing::trace!(world = %world.id(), attempt, %offset, "candidate sampled");
            let Some(candidate) = world.candidate_set(offset) else {
                tracing::debug!(world = %world.id(), attempt, %offset, "candidate rejected: out of coordinate range");
                continue;
            };
            match candidate.first_overlap(occupied) {
                None => {
                    return Ok(Placement {
                        world: world.id(),
                        offset,
                        attempts: attempt,
                    });
                }
                Some(coord) => {
                    tracing::debug!(world = %world.id(), attempt, %offset, %coord, "candidate rejected: overlap");
                }
            }
        }

        Err(PlacementError::Exhausted {
            world: world.id(),
            attempts: self.config.max_attempts,
        })
    }

    /// Find a placement for `world`, commit its offset, and accept it into
    /// the registry.
    pub fn place(
        &mut self,
        mut world: World,
        registry: &mut WorldRegistry,
    ) -> Result<Placement, PlacementError> {
        let _span = tracing::info_span!("place_world", world = %world.id()).entered();
        let placement = self.find_placement(&world, registry)?;
        world.apply_offset(placement.offset)?;
        let (block_x, block_z) = world.origin_block_coords();
        registry.append(world)?;

        if placement.world.is_destination() {
            tracing::info!(world = %placement.world, "destination world fixed at origin");
        } else {
            tracing::info!(
                world = %placement.world,
                offset = %placement.offset,
                block_x,
                block_z,
                attempts = placement.attempts,
                "world placed"
            );
        }
        Ok(placement)
    }

    /// Place every world in input order into a fresh registry.
    ///
    /// Stops at the first world that cannot be placed.
    pub fn place_all(
        &mut self,
        worlds: impl IntoIterator<Item = World>,
    ) -> Result<(WorldRegistry, Vec<Placement>), PlacementError> {
        let _span = tracing::info_span!("place_all").entered();
        let mut registry = WorldRegistry::new();
        let mut placements = Vec::new();
        for world in worlds {
            placements.push(self.place(world, &mut registry)?);
        }
        Ok((registry, placements))
    }
}
