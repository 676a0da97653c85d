use std::collections::HashSet;
use worldmerge_common::RegionCoord;

use crate::coords::BoundingBox;
use crate::error::KernelError;
use crate::map::RegionMap;
use crate::world::{World, WorldId};

/// Ordered collection of accepted worlds plus the union of their regions.
///
/// Acceptance order is input order and rendering order. The union is grown
/// incrementally on each append and is never rebuilt.
#[derive(Debug, Default)]
pub struct WorldRegistry {
    worlds: Vec<World>,
    union: HashSet<RegionCoord>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accepted worlds, destination included.
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Id the next appended world must carry.
    pub fn next_id(&self) -> WorldId {
        WorldId(self.worlds.len())
    }

    /// Accepted worlds that were moved, i.e. everything but the destination.
    pub fn placed_count(&self) -> usize {
        self.worlds.len().saturating_sub(1)
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn destination(&self) -> Option<&World> {
        self.worlds.first()
    }

    /// Every region occupied by an accepted world, in final coordinates.
    pub fn union_coordinates(&self) -> &HashSet<RegionCoord> {
        &self.union
    }

    /// Accept a world whose offset is final.
    ///
    /// Rejects a destination with a non-zero offset, worlds appended out of
    /// order, and any world that would collide with the union. A rejected
    /// world leaves the registry untouched.
    pub fn append(&mut self, world: World) -> Result<(), KernelError> {
        let expected = self.next_id();
        if world.id() != expected {
            return Err(KernelError::OutOfOrder {
                expected,
                found: world.id(),
            });
        }
        if world.id().is_destination() && !world.offset().is_zero() {
            return Err(KernelError::DestinationOffset { world: world.id() });
        }
        if let Some(coord) = world.current_set().first_overlap(&self.union) {
            return Err(KernelError::Overlap {
                world: world.id(),
                coord,
            });
        }

        self.union.extend(world.current_set().iter().copied());
        tracing::debug!(
            world = %world.id(),
            regions = world.region_count(),
            union = self.union.len(),
            "world accepted into registry"
        );
        self.worlds.push(world);
        Ok(())
    }

    /// Bounds of the union, or `None` while the registry is empty.
    pub fn merged_bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.union)
    }

    /// Grid of every accepted world in final coordinates.
    pub fn render(&self) -> Result<RegionMap, KernelError> {
        let bounds = self.merged_bounds().ok_or(KernelError::EmptyRegistry)?;
        let mut map = RegionMap::new(bounds)?;
        for world in &self.worlds {
            for c in world.current_set() {
                if let Some(previous) = map.mark(*c, world.id()) {
                    tracing::warn!(
                        %c,
                        previous = %previous,
                        world = %world.id(),
                        "render cell claimed by two worlds"
                    );
                }
            }
        }
        Ok(map)
    }
}
