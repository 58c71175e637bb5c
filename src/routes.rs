// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prerendered routes: one page per location

use crate::dataset::Dataset;
use crate::types::{Location, Place};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

static LOCATION_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

/// Whether `id` can name a route directory: one path segment of ASCII
/// letters, digits, `.`, `_` or `-`, and not `.` or `..`.
pub fn is_valid_location_id(id: &str) -> bool {
    LOCATION_ID_RE.is_match(id) && id != "." && id != ".."
}

/// Parameters of one generated location page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteParams {
    pub location: String,
}

impl RouteParams {
    pub fn new<S: Into<String>>(location: S) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Output file of this route, relative to the site root.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.location).join("index.html")
    }

    /// URL path of this route, relative to the site root.
    pub fn url_path(&self) -> String {
        format!("{}/", self.location)
    }
}

/// Everything a location page renders from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageData<'a> {
    pub location: &'a Location,
    pub places: &'a [Place],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("location not found: {0}")]
    NotFound(String),
    #[error("invalid location id: {0:?}")]
    InvalidId(String),
}

/// One entry per location, in dataset order.
pub fn enumerate_route_params(dataset: &Dataset) -> Vec<RouteParams> {
    dataset
        .all_locations()
        .iter()
        .map(|location| RouteParams::new(location.id.clone()))
        .collect()
}

/// Resolve the data for one route.
///
/// Fails with [`RouteError::InvalidId`] when the id cannot be used as a
/// directory name and [`RouteError::NotFound`] when it is not in the dataset;
/// a location without a places file gets an empty list.
pub fn load<'a>(dataset: &'a Dataset, params: &RouteParams) -> Result<PageData<'a>, RouteError> {
    if !is_valid_location_id(&params.location) {
        return Err(RouteError::InvalidId(params.location.clone()));
    }
    let location = dataset
        .find_location_by_id(&params.location)
        .ok_or_else(|| RouteError::NotFound(params.location.clone()))?;

    Ok(PageData {
        location,
        places: dataset.places_for(&location.id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_paths() {
        let params = RouteParams::new("piriapolis");
        assert_eq!(params.path(), PathBuf::from("piriapolis/index.html"));
        assert_eq!(params.url_path(), "piriapolis/");
    }

    #[test]
    fn location_id_must_be_one_segment() {
        assert!(is_valid_location_id("punta-del-este"));
        assert!(is_valid_location_id("san_jose.2"));
        for bad in ["", ".", "..", "../escaped", "a/b", "a\\b", "con espacio", "ñandú"] {
            assert!(!is_valid_location_id(bad), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn not_found_message() {
        let err = RouteError::NotFound("atlantis".to_string());
        assert_eq!(err.to_string(), "location not found: atlantis");
    }
}
