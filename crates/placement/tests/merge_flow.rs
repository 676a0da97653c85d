use std::path::Path;

use worldmerge_kernel::WorldId;
use worldmerge_persist::{MergePlan, REGION_DIR, execute_plan, scan_world};
use worldmerge_placement::{PlacementConfig, PlacementEngine};

fn make_save(root: &Path, coords: &[(i32, i32)]) {
    let region = root.join(REGION_DIR);
    std::fs::create_dir_all(&region).unwrap();
    std::fs::write(root.join("level.dat"), b"level").unwrap();
    for (x, z) in coords {
        std::fs::write(region.join(format!("r.{x}.{z}.mca")), format!("{x},{z}")).unwrap();
    }
}

#[test]
fn scan_place_and_copy_three_saves() {
    let tmp = tempfile::tempdir().unwrap();
    let saves = [
        (tmp.path().join("new"), vec![(0, 0), (-1, 0), (0, -1), (-1, -1)]),
        (tmp.path().join("old1"), vec![(0, 0), (1, 0)]),
        (tmp.path().join("old2"), vec![(0, 0), (0, 1), (5, 5)]),
    ];
    for (path, coords) in &saves {
        make_save(path, coords);
    }

    let listings: Vec<_> = saves.iter().map(|(p, _)| scan_world(p).unwrap()).collect();
    let worlds = listings
        .iter()
        .enumerate()
        .map(|(i, l)| l.to_world(WorldId(i)).unwrap());

    let mut engine = PlacementEngine::seeded(PlacementConfig::default(), 11).unwrap();
    let (registry, _) = engine.place_all(worlds).unwrap();
    assert_eq!(registry.union_coordinates().len(), 9);

    let plan = MergePlan::build(&registry, &listings, Some(11)).unwrap();
    assert_eq!(plan.region_count(), 5);

    let report = execute_plan(&plan).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.regions_copied, 5);

    let dest = scan_world(&saves[0].0).unwrap();
    assert_eq!(dest.files.len(), 9);
    let on_disk: std::collections::HashSet<_> = dest.coords().collect();
    assert_eq!(&on_disk, registry.union_coordinates());

    // Copied payloads are the original bytes under the shifted name.
    let moved = &plan.moves[0];
    let first = &moved.regions[0];
    let bytes = std::fs::read(saves[0].0.join(REGION_DIR).join(&first.target)).unwrap();
    let original = std::fs::read(saves[1].0.join(REGION_DIR).join(&first.source)).unwrap();
    assert_eq!(bytes, original);
}
