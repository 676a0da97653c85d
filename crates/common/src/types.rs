use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Chunks along one axis of a region file.
pub const CHUNKS_PER_REGION: i64 = 32;
/// Blocks along one axis of a chunk.
pub const BLOCKS_PER_CHUNK: i64 = 16;
/// Blocks along one axis of a region file.
pub const BLOCKS_PER_REGION: i64 = CHUNKS_PER_REGION * BLOCKS_PER_CHUNK;

/// Coordinate of one region file, as written in its `r.<x>.<z>.mca` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionCoord {
    pub x: i32,
    pub z: i32,
}

impl RegionCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Shift this coordinate by an offset, or `None` if either axis leaves
    /// the `i32` range.
    pub fn translate(self, offset: Offset) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(offset.dx)?,
            z: self.z.checked_add(offset.dz)?,
        })
    }
}

impl fmt::Display for RegionCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

impl From<(i32, i32)> for RegionCoord {
    fn from((x, z): (i32, i32)) -> Self {
        Self { x, z }
    }
}

/// Translation applied to every region of a world, in region units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dz: i32,
}

impl Offset {
    pub const ZERO: Self = Self { dx: 0, dz: 0 };

    pub fn new(dx: i32, dz: i32) -> Self {
        Self { dx, dz }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// The offset expressed in block coordinates, for reporting.
    pub fn to_blocks(self) -> (i64, i64) {
        (
            i64::from(self.dx) * BLOCKS_PER_REGION,
            i64::from(self.dz) * BLOCKS_PER_REGION,
        )
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            dx: self.dx + rhs.dx,
            dz: self.dz + rhs.dz,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dz)
    }
}
