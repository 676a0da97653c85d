use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use worldmerge_common::{Offset, RegionCoord};

use crate::error::KernelError;

/// Inclusive bounds of a set of region coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl BoundingBox {
    /// Box covering a single coordinate.
    pub fn point(c: RegionCoord) -> Self {
        Self {
            min_x: c.x,
            max_x: c.x,
            min_z: c.z,
            max_z: c.z,
        }
    }

    /// Smallest box enclosing every coordinate, or `None` for an empty input.
    pub fn enclosing<'a>(coords: impl IntoIterator<Item = &'a RegionCoord>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = Self::point(*iter.next()?);
        Some(iter.fold(first, |b, c| b.include(*c)))
    }

    fn include(self, c: RegionCoord) -> Self {
        Self {
            min_x: self.min_x.min(c.x),
            max_x: self.max_x.max(c.x),
            min_z: self.min_z.min(c.z),
            max_z: self.max_z.max(c.z),
        }
    }

    /// Number of columns (x extent), bounds inclusive.
    pub fn width(&self) -> usize {
        (i64::from(self.max_x) - i64::from(self.min_x) + 1) as usize
    }

    /// Number of rows (z extent), bounds inclusive.
    pub fn depth(&self) -> usize {
        (i64::from(self.max_z) - i64::from(self.min_z) + 1) as usize
    }

    /// Cells in the box, `width * depth`, without overflow.
    pub fn cell_count(&self) -> u128 {
        self.width() as u128 * self.depth() as u128
    }

    pub fn contains(&self, c: RegionCoord) -> bool {
        (self.min_x..=self.max_x).contains(&c.x) && (self.min_z..=self.max_z).contains(&c.z)
    }
}

/// A non-empty set of unique region coordinates.
///
/// Immutable once built: translation produces a new set, and the bounding box
/// is scanned from the members whenever a set is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSet {
    coords: BTreeSet<RegionCoord>,
    bounds: BoundingBox,
}

impl CoordinateSet {
    /// Build a set from raw coordinates, dropping duplicates.
    pub fn from_coords(coords: impl IntoIterator<Item = RegionCoord>) -> Result<Self, KernelError> {
        let coords: BTreeSet<RegionCoord> = coords.into_iter().collect();
        let bounds = BoundingBox::enclosing(&coords).ok_or(KernelError::EmptyInput)?;
        Ok(Self { coords, bounds })
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn contains(&self, c: RegionCoord) -> bool {
        self.coords.contains(&c)
    }

    /// Members in ascending (x, z) order.
    pub fn iter(&self) -> impl Iterator<Item = &RegionCoord> {
        self.coords.iter()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// A new set with every member shifted by `offset`, or `None` if any
    /// member would leave the `i32` range.
    pub fn translate(&self, offset: Offset) -> Option<Self> {
        let coords: BTreeSet<RegionCoord> = self
            .coords
            .iter()
            .map(|c| c.translate(offset))
            .collect::<Option<_>>()?;
        let bounds = BoundingBox::enclosing(&coords)?;
        Some(Self { coords, bounds })
    }

    /// First member (in set order) also present in `occupied`.
    pub fn first_overlap(&self, occupied: &HashSet<RegionCoord>) -> Option<RegionCoord> {
        self.coords.iter().find(|c| occupied.contains(c)).copied()
    }

    pub fn is_disjoint(&self, occupied: &HashSet<RegionCoord>) -> bool {
        self.first_overlap(occupied).is_none()
    }
}

impl<'a> IntoIterator for &'a CoordinateSet {
    type Item = &'a RegionCoord;
    type IntoIter = std::collections::btree_set::Iter<'a, RegionCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.coords.iter()
    }
}
