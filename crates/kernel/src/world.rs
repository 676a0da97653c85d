use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use worldmerge_common::{Offset, RegionCoord};

use crate::coords::{BoundingBox, CoordinateSet};
use crate::error::KernelError;
use crate::map::RegionMap;

/// Ordinal of a world in input order. World 0 is the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub usize);

impl WorldId {
    pub const DESTINATION: Self = Self(0);

    pub fn is_destination(self) -> bool {
        self == Self::DESTINATION
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One source save: its region coordinates as found on disk plus the offset
/// chosen for it.
///
/// The current set is rebuilt from the original set whenever the offset
/// changes, so it always equals the original regions shifted by `offset()`.
#[derive(Debug, Clone)]
pub struct World {
    id: WorldId,
    path: PathBuf,
    regions: CoordinateSet,
    offset: Offset,
    current: CoordinateSet,
}

impl World {
    /// Create a world at zero offset from its raw region coordinates.
    pub fn new(
        id: WorldId,
        path: impl Into<PathBuf>,
        coords: impl IntoIterator<Item = RegionCoord>,
    ) -> Result<Self, KernelError> {
        let regions = CoordinateSet::from_coords(coords)?;
        Ok(Self {
            id,
            path: path.into(),
            current: regions.clone(),
            regions,
            offset: Offset::ZERO,
        })
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Save directory this world was read from. Not interpreted here.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Region coordinates as found on disk, before any offset.
    pub fn regions(&self) -> &CoordinateSet {
        &self.regions
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Region coordinates after the current offset.
    pub fn current_set(&self) -> &CoordinateSet {
        &self.current
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Where the regions would land under `offset`, without committing it.
    /// `None` when a region would leave the coordinate range.
    pub fn candidate_set(&self, offset: Offset) -> Option<CoordinateSet> {
        self.regions.translate(offset)
    }

    /// Commit an offset and rebuild the current set from the original regions.
    ///
    /// An offset that pushes a region out of range leaves the world unchanged.
    pub fn apply_offset(&mut self, offset: Offset) -> Result<(), KernelError> {
        self.current = self
            .regions
            .translate(offset)
            .ok_or(KernelError::OffsetOutOfRange {
                world: self.id,
                offset,
            })?;
        self.offset = offset;
        Ok(())
    }

    /// Bounds of the current set.
    pub fn bounding_box(&self) -> BoundingBox {
        self.current.bounding_box()
    }

    /// The applied offset in block coordinates.
    pub fn origin_block_coords(&self) -> (i64, i64) {
        self.offset.to_blocks()
    }

    /// Grid of this world alone, in its current coordinates.
    pub fn render(&self) -> Result<RegionMap, KernelError> {
        let mut map = RegionMap::new(self.bounding_box())?;
        for c in &self.current {
            map.mark(*c, self.id);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(raw: &[(i32, i32)]) -> Vec<RegionCoord> {
        raw.iter().map(|&c| RegionCoord::from(c)).collect()
    }

    #[test]
    fn new_world_starts_at_zero_offset() {
        let w = World::new(WorldId(1), "saves/old", coords(&[(0, 0), (1, 0)])).unwrap();
        assert!(w.offset().is_zero());
        assert_eq!(w.current_set(), w.regions());
        assert_eq!(w.path(), Path::new("saves/old"));
    }

    #[test]
    fn empty_world_is_rejected() {
        let err = World::new(WorldId(0), "saves/empty", Vec::<RegionCoord>::new()).unwrap_err();
        assert!(matches!(err, KernelError::EmptyInput));
    }

    #[test]
    fn duplicate_coordinates_collapse() {
        let w = World::new(WorldId(0), "w", coords(&[(2, 2), (2, 2)])).unwrap();
        assert_eq!(w.region_count(), 1);
    }

    #[test]
    fn apply_offset_rebuilds_current_set() {
        let mut w = World::new(WorldId(1), "w", coords(&[(0, 0), (1, 0)])).unwrap();
        w.apply_offset(Offset::new(10, -3)).unwrap();
        assert!(w.current_set().contains(RegionCoord::new(10, -3)));
        assert!(w.current_set().contains(RegionCoord::new(11, -3)));
        assert!(w.regions().contains(RegionCoord::new(0, 0)));

        // Re-applying starts from the original set, not the shifted one.
        w.apply_offset(Offset::new(1, 1)).unwrap();
        assert_eq!(
            Some(w.current_set()),
            w.regions().translate(Offset::new(1, 1)).as_ref()
        );
    }

    #[test]
    fn bounding_box_follows_offset() {
        let mut w = World::new(WorldId(1), "w", coords(&[(-1, 2), (3, 5)])).unwrap();
        w.apply_offset(Offset::new(2, -7)).unwrap();
        let b = w.bounding_box();
        assert_eq!((b.min_x, b.max_x, b.min_z, b.max_z), (1, 5, -5, -2));
    }

    #[test]
    fn candidate_set_does_not_commit() {
        let w = World::new(WorldId(1), "w", coords(&[(0, 0)])).unwrap();
        let candidate = w.candidate_set(Offset::new(4, 4)).unwrap();
        assert!(candidate.contains(RegionCoord::new(4, 4)));
        assert!(w.offset().is_zero());
    }

    #[test]
    fn origin_in_blocks() {
        let mut w = World::new(WorldId(2), "w", coords(&[(0, 0)])).unwrap();
        w.apply_offset(Offset::new(-30, 4)).unwrap();
        assert_eq!(w.origin_block_coords(), (-15360, 2048));
    }

    #[test]
    fn render_marks_own_shape() {
        let w = World::new(WorldId(3), "w", coords(&[(0, 0), (2, 1)])).unwrap();
        let map = w.render().unwrap();
        assert_eq!(map.to_string(), "|3..|\n|..3|\n");
    }

    #[test]
    fn out_of_range_offset_is_refused() {
        let mut w = World::new(WorldId(1), "w", coords(&[(0, 0), (i32::MAX, 0)])).unwrap();
        assert!(w.candidate_set(Offset::new(1, 0)).is_none());
        assert!(matches!(
            w.apply_offset(Offset::new(1, 0)),
            Err(KernelError::OffsetOutOfRange { world, .. }) if world == WorldId(1)
        ));
        assert!(w.offset().is_zero());
        assert_eq!(w.current_set(), w.regions());
    }

    #[test]
    fn far_apart_regions_skip_the_preview() {
        let w = World::new(WorldId(0), "w", coords(&[(-50_000, -50_000), (50_000, 50_000)]))
            .unwrap();
        assert!(matches!(w.render(), Err(KernelError::MapTooLarge { .. })));
    }
}
