use worldmerge_common::{Offset, RegionCoord};

use crate::world::WorldId;

/// Errors from building worlds and accepting them into the registry.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("world has no region coordinates")]
    EmptyInput,
    #[error("world {world} overlaps an already placed world at region {coord}")]
    Overlap { world: WorldId, coord: RegionCoord },
    #[error("destination world {world} must keep a zero offset")]
    DestinationOffset { world: WorldId },
    #[error("world {found} appended out of order, expected world {expected}")]
    OutOfOrder { expected: WorldId, found: WorldId },
    #[error("offset {offset} moves world {world} outside the region coordinate range")]
    OffsetOutOfRange { world: WorldId, offset: Offset },
    #[error("map of {cells} cells exceeds the {limit} cell limit")]
    MapTooLarge { cells: u128, limit: u128 },
    #[error("registry has no worlds to render")]
    EmptyRegistry,
}
