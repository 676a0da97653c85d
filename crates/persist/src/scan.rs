use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use worldmerge_common::RegionCoord;
use worldmerge_kernel::{KernelError, World, WorldId};

use crate::error::PersistError;

/// Directory inside a save that holds the overworld region files.
pub const REGION_DIR: &str = "region";

/// On-disk region format, from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionFormat {
    /// `.mca`
    Anvil,
    /// `.mcr`
    McRegion,
}

/// A region file found in a save's region directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFile {
    pub name: String,
    pub coord: RegionCoord,
    pub format: RegionFormat,
}

/// Name a region file gets in the destination save.
pub fn region_filename(coord: RegionCoord) -> String {
    format!("r.{}.{}.mca", coord.x, coord.z)
}

/// Canonical integer text: no leading zeros and no `-0`, so each coordinate
/// has exactly one spelling.
fn is_signed_decimal(s: &str) -> bool {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(d) => (true, d),
        None => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if digits == "0" {
        return !negative;
    }
    !digits.starts_with('0')
}

fn split_region_name(name: &str) -> Option<(&str, &str, RegionFormat)> {
    let rest = name.strip_prefix("r.")?;
    let (rest, format) = match rest.strip_suffix(".mca") {
        Some(r) => (r, RegionFormat::Anvil),
        None => (rest.strip_suffix(".mcr")?, RegionFormat::McRegion),
    };
    let (x, z) = rest.split_once('.')?;
    (is_signed_decimal(x) && is_signed_decimal(z)).then_some((x, z, format))
}

/// Listing filter: `r.<x>.<z>.mca` or `.mcr`, with `x` and `z` written as
/// an optional `-` followed by decimal digits without leading zeros.
pub fn is_region_filename(name: &str) -> bool {
    split_region_name(name).is_some()
}

/// Extract the coordinate from a region filename.
///
/// Fails on names the listing filter rejects and on coordinates that do not
/// fit in an `i32`.
pub fn parse_region_filename(name: &str) -> Result<RegionFile, PersistError> {
    let parse_error = |reason: String| PersistError::FilenameParse {
        name: name.to_string(),
        reason,
    };
    let (x, z, format) = split_region_name(name)
        .ok_or_else(|| parse_error("expected r.<x>.<z>.mca or r.<x>.<z>.mcr".into()))?;
    let x = x.parse::<i32>().map_err(|e| parse_error(format!("x: {e}")))?;
    let z = z.parse::<i32>().map_err(|e| parse_error(format!("z: {e}")))?;
    Ok(RegionFile {
        name: name.to_string(),
        coord: RegionCoord::new(x, z),
        format,
    })
}

/// Region files discovered in one save.
#[derive(Debug, Clone, Default)]
pub struct WorldListing {
    pub path: PathBuf,
    /// One file per coordinate, sorted by coordinate.
    pub files: Vec<RegionFile>,
    /// Names that passed the listing filter but could not be parsed.
    pub skipped: Vec<String>,
}

impl WorldListing {
    pub fn coords(&self) -> impl Iterator<Item = RegionCoord> + '_ {
        self.files.iter().map(|f| f.coord)
    }

    pub fn region_dir(&self) -> PathBuf {
        self.path.join(REGION_DIR)
    }

    /// Build the kernel world for this listing. Fails when no regions were found.
    pub fn to_world(&self, id: WorldId) -> Result<World, KernelError> {
        World::new(id, self.path.clone(), self.coords())
    }
}

/// List the region files of the save at `path`.
///
/// Non-matching names are ignored. A coordinate present as both `.mca` and
/// `.mcr` keeps the `.mca` file.
pub fn scan_world(path: impl AsRef<Path>) -> Result<WorldListing, PersistError> {
    let path = path.as_ref();
    let region_dir = path.join(REGION_DIR);
    if !region_dir.is_dir() {
        return Err(PersistError::MissingRegionDir { path: region_dir });
    }

    let mut by_coord: BTreeMap<RegionCoord, RegionFile> = BTreeMap::new();
    let mut skipped = Vec::new();
    for entry in std::fs::read_dir(&region_dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_region_filename(&name) {
            tracing::trace!(%name, "ignoring non-region file");
            continue;
        }
        match parse_region_filename(&name) {
            Ok(file) => {
                let keep_existing = by_coord
                    .get(&file.coord)
                    .is_some_and(|f| f.format == RegionFormat::Anvil);
                if keep_existing {
                    tracing::debug!(%name, "coordinate already has an .mca file");
                } else {
                    by_coord.insert(file.coord, file);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping region file");
                skipped.push(name);
            }
        }
    }
    skipped.sort();

    tracing::debug!(
        path = %path.display(),
        regions = by_coord.len(),
        skipped = skipped.len(),
        "scanned world"
    );
    Ok(WorldListing {
        path: path.to_path_buf(),
        files: by_coord.into_values().collect(),
        skipped,
    })
}
