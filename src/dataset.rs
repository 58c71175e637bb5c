// SPDX-License-Identifier: PMPL-1.0-or-later

//! Read-only view over the guide's dataset
//!
//! A dataset directory looks like:
//!
//! ```text
//! data/
//!   locations.json          [Location, ...]
//!   categories.json         {name: Category, ...}   (optional)
//!   places/<location>.json  [Place, ...]            (optional, one per location)
//! ```
//!
//! Places belong to the location whose id names their file. The default
//! dataset is compiled into the binary; `build.rs` gathers the places files.

use crate::types::{Categories, Category, Location, Place};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const BUNDLED_LOCATIONS: &str = include_str!("../data/locations.json");
const BUNDLED_CATEGORIES: &str = include_str!("../data/categories.json");
const BUNDLED_PLACES: &str = include_str!(concat!(env!("OUT_DIR"), "/bundled_places.json"));

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    locations: Vec<Location>,
    places: BTreeMap<String, Vec<Place>>,
    categories: Categories,
}

impl Dataset {
    pub fn new(
        locations: Vec<Location>,
        places: BTreeMap<String, Vec<Place>>,
        categories: Categories,
    ) -> Self {
        Self {
            locations,
            places,
            categories,
        }
    }

    /// The dataset compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let locations = parse(BUNDLED_LOCATIONS, "bundled locations.json")?;
        let categories = parse(BUNDLED_CATEGORIES, "bundled categories.json")?;
        let places = parse(BUNDLED_PLACES, "bundled places")?;
        Ok(Self::new(locations, places, categories))
    }

    /// Load a dataset directory laid out as described in the module docs.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let locations: Vec<Location> = read_json(&dir.join("locations.json"))?;

        let categories_path = dir.join("categories.json");
        let categories = if categories_path.is_file() {
            read_json(&categories_path)?
        } else {
            tracing::debug!(path = %categories_path.display(), "no categories file");
            Categories::new()
        };

        let mut places = BTreeMap::new();
        let places_dir = dir.join("places");
        if places_dir.is_dir() {
            let entries = fs::read_dir(&places_dir)
                .with_context(|| format!("reading {}", places_dir.display()))?;
            for entry in entries {
                let entry =
                    entry.with_context(|| format!("reading {}", places_dir.display()))?;
                let path = entry.path();
                let is_json = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false);
                if !is_json || path.is_dir() {
                    continue;
                }
                let Some(location_id) = path.file_stem().and_then(|s| s.to_str()) else {
                    tracing::warn!(
                        path = %path.display(),
                        "skipping places file with a non UTF-8 name"
                    );
                    continue;
                };
                let group: Vec<Place> = read_json(&path)?;
                places.insert(location_id.to_string(), group);
            }
        }

        tracing::info!(
            dir = %dir.display(),
            locations = locations.len(),
            place_groups = places.len(),
            "loaded dataset"
        );
        Ok(Self::new(locations, places, categories))
    }

    /// Locations in dataset order.
    pub fn all_locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn find_location_by_id(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    /// Places of a location; empty when the location has none.
    pub fn places_for(&self, location_id: &str) -> &[Place] {
        self.places
            .get(location_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every places group, keyed by the location id it was filed under,
    /// including groups whose location does not exist.
    pub fn place_groups(&self) -> impl Iterator<Item = (&str, &[Place])> {
        self.places
            .iter()
            .map(|(id, places)| (id.as_str(), places.as_slice()))
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }
}

fn parse<T: DeserializeOwned>(content: &str, label: &str) -> Result<T> {
    serde_json::from_str(content).with_context(|| format!("parsing {}", label))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse(&content, &path.display().to_string())
}
