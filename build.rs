// SPDX-License-Identifier: PMPL-1.0-or-later

// Bundles every `data/places/<location-id>.json` into one JSON object keyed by
// location id, so adding a location's places is a data-only change.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    let places_dir = Path::new("data/places");
    let out_path = Path::new(&std::env::var("OUT_DIR")?).join("bundled_places.json");

    println!("cargo:rerun-if-changed=data/places");

    let mut grouped = Map::new();
    if places_dir.is_dir() {
        let mut files: Vec<_> = fs::read_dir(places_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        files.sort();

        for path in files {
            let Some(location_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let places: Value = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            grouped.insert(location_id.to_string(), places);
            println!("cargo:rerun-if-changed={}", path.display());
        }
    } else {
        println!("cargo:warning=No data/places folder found, bundling no places");
    }

    fs::write(out_path, serde_json::to_string(&Value::Object(grouped))?)?;
    Ok(())
}
