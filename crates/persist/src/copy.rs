use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::plan::MergePlan;
use crate::scan::REGION_DIR;

/// Optional per-region directories that follow their region file.
pub const SIBLING_DIRS: [&str; 2] = ["poi", "entities"];

/// A mandatory region file that could not be copied.
#[derive(Debug, Clone, Serialize)]
pub struct CopyFailure {
    pub source: PathBuf,
    pub target: PathBuf,
    pub reason: String,
}

/// Outcome of running a merge plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CopyReport {
    pub regions_copied: usize,
    pub siblings_copied: usize,
    pub siblings_skipped: usize,
    pub failures: Vec<CopyFailure>,
}

impl CopyReport {
    /// True when every region file in the plan was copied.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Copy `source` to a new file at `target`. Fails if `target` exists.
fn copy_new(source: &Path, target: &Path) -> io::Result<u64> {
    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)?;
    match io::copy(&mut reader, &mut writer) {
        Ok(n) => Ok(n),
        Err(e) => {
            drop(writer);
            // Leave no half-written file behind in the destination.
            let _ = std::fs::remove_file(target);
            Err(e)
        }
    }
}

/// Copy every region in `plan` into the destination save.
///
/// Only a missing or uncreatable destination region directory is fatal.
/// Region copy failures are collected in the report; sibling files that are
/// absent, already present, or fail to copy are skipped.
pub fn execute_plan(plan: &MergePlan) -> Result<CopyReport, PersistError> {
    let _span = tracing::info_span!("execute_plan", destination = %plan.destination.display())
        .entered();
    let dest_region = plan.destination.join(REGION_DIR);
    std::fs::create_dir_all(&dest_region)?;

    let mut report = CopyReport::default();
    for world_move in &plan.moves {
        let src_region = world_move.source.join(REGION_DIR);
        for region in &world_move.regions {
            let source = src_region.join(&region.source);
            let target = dest_region.join(&region.target);
            match copy_new(&source, &target) {
                Ok(bytes) => {
                    tracing::trace!(source = %source.display(), target = %target.display(), bytes, "region copied");
                    report.regions_copied += 1;
                }
                Err(e) => {
                    tracing::error!(source = %source.display(), error = %e, "region copy failed");
                    report.failures.push(CopyFailure {
                        source,
                        target,
                        reason: e.to_string(),
                    });
                    continue;
                }
            }

            for sibling in SIBLING_DIRS {
                let source = world_move.source.join(sibling).join(&region.source);
                if !source.is_file() {
                    continue;
                }
                let target_dir = plan.destination.join(sibling);
                let result = std::fs::create_dir_all(&target_dir)
                    .and_then(|()| copy_new(&source, &target_dir.join(&region.target)));
                match result {
                    Ok(_) => report.siblings_copied += 1,
                    Err(e) => {
                        tracing::warn!(source = %source.display(), error = %e, "sibling copy skipped");
                        report.siblings_skipped += 1;
                    }
                }
            }
        }
    }

    tracing::info!(
        regions = report.regions_copied,
        siblings = report.siblings_copied,
        failures = report.failures.len(),
        "merge copy finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{RegionMove, WorldMove};
    use worldmerge_common::Offset;
    use worldmerge_kernel::WorldId;

    fn write(path: &Path, data: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }

    fn plan(dest: &Path, source: &Path, regions: &[(&str, &str)]) -> MergePlan {
        MergePlan {
            destination: dest.to_path_buf(),
            seed: None,
            moves: vec![WorldMove {
                world: WorldId(1),
                source: source.to_path_buf(),
                offset: Offset::new(30, 0),
                regions: regions
                    .iter()
                    .map(|&(s, t)| RegionMove {
                        source: s.into(),
                        target: t.into(),
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn copies_regions_and_siblings_under_new_name() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("dest");
        let old = tmp.path().join("old");
        write(&old.join("region/r.0.0.mca"), b"region-data");
        write(&old.join("poi/r.0.0.mca"), b"poi-data");
        write(&old.join("entities/r.0.0.mca"), b"entity-data");

        let report = execute_plan(&plan(&dest, &old, &[("r.0.0.mca", "r.30.0.mca")])).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.regions_copied, 1);
        assert_eq!(report.siblings_copied, 2);
        assert_eq!(std::fs::read(dest.join("region/r.30.0.mca")).unwrap(), b"region-data");
        assert_eq!(std::fs::read(dest.join("poi/r.30.0.mca")).unwrap(), b"poi-data");
        assert_eq!(std::fs::read(dest.join("entities/r.30.0.mca")).unwrap(), b"entity-data");
        // Source untouched.
        assert!(old.join("region/r.0.0.mca").exists());
    }

    #[test]
    fn missing_region_is_recorded_and_batch_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("dest");
        let old = tmp.path().join("old");
        write(&old.join("region/r.1.0.mca"), b"second");

        let report = execute_plan(&plan(
            &dest,
            &old,
            &[("r.0.0.mca", "r.30.0.mca"), ("r.1.0.mca", "r.31.0.mca")],
        ))
        .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].target, dest.join("region/r.30.0.mca"));
        assert_eq!(report.regions_copied, 1);
        assert!(dest.join("region/r.31.0.mca").exists());
        assert!(!report.is_complete());
    }

    #[test]
    fn existing_destination_file_is_never_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("dest");
        let old = tmp.path().join("old");
        write(&old.join("region/r.0.0.mca"), b"incoming");
        write(&old.join("poi/r.0.0.mca"), b"incoming-poi");
        write(&dest.join("region/r.30.0.mca"), b"original");
        write(&dest.join("poi/r.30.0.mca"), b"original-poi");

        let report = execute_plan(&plan(&dest, &old, &[("r.0.0.mca", "r.30.0.mca")])).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(std::fs::read(dest.join("region/r.30.0.mca")).unwrap(), b"original");
        assert_eq!(std::fs::read(dest.join("poi/r.30.0.mca")).unwrap(), b"original-poi");
    }

    #[test]
    fn existing_sibling_is_skipped_not_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("dest");
        let old = tmp.path().join("old");
        write(&old.join("region/r.0.0.mca"), b"incoming");
        write(&old.join("entities/r.0.0.mca"), b"incoming-entities");
        write(&dest.join("entities/r.30.0.mca"), b"original-entities");

        let report = execute_plan(&plan(&dest, &old, &[("r.0.0.mca", "r.30.0.mca")])).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.siblings_skipped, 1);
        assert_eq!(
            std::fs::read(dest.join("entities/r.30.0.mca")).unwrap(),
            b"original-entities"
        );
    }
}
