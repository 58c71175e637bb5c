// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tests for route enumeration and page data loading

use mapguide::dataset::Dataset;
use mapguide::routes::{self, RouteError, RouteParams};
use std::collections::HashSet;

#[test]
fn test_one_route_per_location() {
    let dataset = Dataset::bundled().unwrap();
    let params = routes::enumerate_route_params(&dataset);

    assert_eq!(params.len(), dataset.all_locations().len());
    let unique: HashSet<&str> = params.iter().map(|p| p.location.as_str()).collect();
    assert_eq!(unique.len(), params.len());
    for (params, location) in params.iter().zip(dataset.all_locations()) {
        assert_eq!(params.location, location.id);
    }
}

#[test]
fn test_every_enumerated_route_loads() {
    let dataset = Dataset::bundled().unwrap();
    for params in routes::enumerate_route_params(&dataset) {
        let page = routes::load(&dataset, &params).expect("enumerated route should load");
        assert_eq!(page.location.id, params.location);
        assert_eq!(page.places.len(), dataset.places_for(&params.location).len());
    }
}

#[test]
fn test_empty_dataset_has_no_routes() {
    assert!(routes::enumerate_route_params(&Dataset::default()).is_empty());
}

#[test]
fn test_unknown_location_is_not_found() {
    let dataset = Dataset::bundled().unwrap();
    let err = routes::load(&dataset, &RouteParams::new("atlantis")).unwrap_err();
    assert_eq!(err, RouteError::NotFound("atlantis".to_string()));
    assert_eq!(err.to_string(), "location not found: atlantis");
}

#[test]
fn test_unsafe_id_is_rejected_before_lookup() {
    let dataset = Dataset::bundled().unwrap();
    let err = routes::load(&dataset, &RouteParams::new("../piriapolis")).unwrap_err();
    assert_eq!(err, RouteError::InvalidId("../piriapolis".to_string()));
    assert!(routes::is_valid_location_id("piriapolis"));
}
