use std::fmt;
use worldmerge_common::RegionCoord;

use crate::coords::BoundingBox;
use crate::error::KernelError;
use crate::world::WorldId;

/// Printable single-character token for a world ordinal.
///
/// `0-9`, then `a-z`, then `A-Z`; anything past that shares `#`.
pub fn ordinal_token(id: WorldId) -> char {
    const TOKENS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    TOKENS.get(id.0).map_or('#', |&b| b as char)
}

/// A 2D grid of region cells spanning a bounding box.
///
/// One row per z, one column per x. Cells are empty (`.`) or hold the world
/// that occupies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMap {
    bounds: BoundingBox,
    cells: Vec<Option<WorldId>>,
}

impl RegionMap {
    /// Largest grid that will be allocated, in cells.
    pub const MAX_CELLS: u128 = 1 << 20;

    /// Empty map covering `bounds`. Refuses boxes over [`Self::MAX_CELLS`].
    pub fn new(bounds: BoundingBox) -> Result<Self, KernelError> {
        let cells = bounds.cell_count();
        if cells > Self::MAX_CELLS {
            return Err(KernelError::MapTooLarge {
                cells,
                limit: Self::MAX_CELLS,
            });
        }
        Ok(Self {
            bounds,
            cells: vec![None; bounds.width() * bounds.depth()],
        })
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn index(&self, c: RegionCoord) -> Option<usize> {
        if !self.bounds.contains(c) {
            return None;
        }
        let col = (i64::from(c.x) - i64::from(self.bounds.min_x)) as usize;
        let row = (i64::from(c.z) - i64::from(self.bounds.min_z)) as usize;
        Some(row * self.bounds.width() + col)
    }

    /// Mark a cell as owned by `id`. Returns the previous owner, if any.
    ///
    /// Coordinates outside the bounds are ignored.
    pub fn mark(&mut self, c: RegionCoord, id: WorldId) -> Option<WorldId> {
        let idx = self.index(c)?;
        self.cells[idx].replace(id)
    }

    pub fn get(&self, c: RegionCoord) -> Option<WorldId> {
        self.index(c).and_then(|idx| self.cells[idx])
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Rows from min z to max z, each rendered as tokens without borders.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.chunks(self.bounds.width()).map(|row| {
            row.iter()
                .map(|cell| cell.map_or('.', ordinal_token))
                .collect()
        })
    }
}

impl fmt::Display for RegionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "|{row}|")?;
        }
        Ok(())
    }
}
