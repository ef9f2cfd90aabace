// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Loading the bundled checkpoint data.

use stride_tracker::config::Config;
use stride_tracker::services::CheckpointCatalog;

#[test]
fn test_bundled_data_loads() {
    let catalog = CheckpointCatalog::load_from_file(Config::default().checkpoints_path).unwrap();

    // The feature without an id is skipped
    assert_eq!(catalog.len(), 5);

    let bay = catalog.for_event("bay-trail");
    let ids: Vec<&str> = bay.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["bay-1", "bay-2", "bay-3"]);
    assert_eq!(bay[1].points, 25);
    assert_eq!(bay[1].approx_distance, 570.0);

    let bridge = catalog.get("thames-2").unwrap();
    assert_eq!(bridge.name, "Millennium Bridge");
    assert!((bridge.latitude - 51.5081).abs() < 1e-9);
    assert!((bridge.longitude + 0.0990).abs() < 1e-9);
}

#[test]
fn test_unknown_event_is_empty() {
    let catalog = CheckpointCatalog::load_from_file(Config::default().checkpoints_path).unwrap();
    assert!(catalog.for_event("no-such-event").is_empty());
    assert!(catalog.get("bay-9").is_none());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CheckpointCatalog::load_from_file(dir.path().join("absent.geojson")).is_err());
}
