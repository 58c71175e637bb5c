// SPDX-License-Identifier: PMPL-1.0-or-later

//! Dataset and catalog checks behind `mapguide check`

use crate::config::SiteConfig;
use crate::dataset::Dataset;
use crate::i18n::Catalog;
use crate::links::normalize_instagram_url;
use crate::routes::is_valid_location_id;
use crate::types::{LatLng, LocalizedText};
use anyhow::{anyhow, Result};
use colored::*;
use std::collections::HashSet;

/// Keys listed per language before the rest are summarized as a count.
const MISSING_KEY_SAMPLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Error,
}

impl Level {
    fn tag(&self) -> ColoredString {
        match self {
            Level::Ok => "OK".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERR".red().bold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub label: &'static str,
    pub level: Level,
    pub detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:22} {}", self.level.tag(), self.label, self.detail);
    }
}

/// Run every check and print the results; fails if any check is an error.
pub fn run(config: &SiteConfig, dataset: &Dataset, catalog: &Catalog) -> Result<()> {
    println!("mapguide {} checks", env!("CARGO_PKG_VERSION"));
    println!();

    let checks = collect(config, dataset, catalog);
    for entry in &checks {
        entry.print();
    }

    let errors = checks.iter().filter(|d| d.level == Level::Error).count();
    let warnings = checks.iter().filter(|d| d.level == Level::Warn).count();
    println!();
    println!("  {} error(s), {} warning(s)", errors, warnings);

    if errors > 0 {
        Err(anyhow!("checks reported {} error(s)", errors))
    } else {
        Ok(())
    }
}

pub fn collect(config: &SiteConfig, dataset: &Dataset, catalog: &Catalog) -> Vec<Diagnostic> {
    let mut checks = Vec::new();
    check_locations(dataset, &mut checks);
    check_places(dataset, &mut checks);
    check_translations(config, catalog, &mut checks);
    checks.push(check_analytics(config));
    checks
}

fn check_locations(dataset: &Dataset, checks: &mut Vec<Diagnostic>) {
    let locations = dataset.all_locations();
    let place_count: usize = dataset.place_groups().map(|(_, places)| places.len()).sum();
    checks.push(Diagnostic::ok(
        "dataset",
        format!("{} locations, {} places", locations.len(), place_count),
    ));

    let mut seen = HashSet::new();
    for location in locations {
        if !seen.insert(location.id.as_str()) {
            checks.push(Diagnostic::error(
                "location ids",
                format!("duplicate location id {:?}", location.id),
            ));
        }
        if !is_valid_location_id(&location.id) {
            checks.push(Diagnostic::error(
                "location ids",
                format!("location id {:?} is not a single path segment", location.id),
            ));
        }
        if !location.description.has_fallback() {
            checks.push(Diagnostic::warning(
                "localized text",
                format!("location {} description has no \"es\" text", location.id),
            ));
        }
        if !in_range(location.center) {
            checks.push(Diagnostic::error(
                "coordinates",
                format!("location {} center is out of range", location.id),
            ));
        }
        if dataset.places_for(&location.id).is_empty() {
            checks.push(Diagnostic::warning(
                "places",
                format!("location {} has no places", location.id),
            ));
        }
    }
}

fn check_places(dataset: &Dataset, checks: &mut Vec<Diagnostic>) {
    for (location_id, places) in dataset.place_groups() {
        if dataset.find_location_by_id(location_id).is_none() {
            checks.push(Diagnostic::error(
                "places",
                format!("places filed under unknown location {:?}", location_id),
            ));
        }

        let mut seen = HashSet::new();
        for place in places {
            let name = format!("{}/{}", location_id, place.id);
            if !seen.insert(place.id.as_str()) {
                checks.push(Diagnostic::warning(
                    "place ids",
                    format!("duplicate place id {}", name),
                ));
            }
            for (field, text) in [("title", &place.title), ("description", &place.description)] {
                if !has_text(text) {
                    checks.push(Diagnostic::warning(
                        "localized text",
                        format!("place {} {} has no \"es\" text", name, field),
                    ));
                }
            }
            if dataset.category(&place.category).is_none() {
                checks.push(Diagnostic::warning(
                    "categories",
                    format!("place {} uses unknown category {:?}", name, place.category),
                ));
            }
            if !in_range(place.coordinates) {
                checks.push(Diagnostic::error(
                    "coordinates",
                    format!("place {} coordinates are out of range", name),
                ));
            }
            if let Some(reference) = &place.instagram {
                if normalize_instagram_url(reference).is_none() {
                    checks.push(Diagnostic::warning(
                        "instagram links",
                        format!("place {} reference {:?} rejected; link omitted", name, reference),
                    ));
                }
            }
        }
    }
}

fn check_translations(config: &SiteConfig, catalog: &Catalog, checks: &mut Vec<Diagnostic>) {
    for lang in &config.languages {
        if *lang == catalog.fallback() {
            continue;
        }
        let missing = catalog.missing_keys(*lang);
        if missing.is_empty() {
            checks.push(Diagnostic::ok(
                "translations",
                format!("{} table complete", lang),
            ));
            continue;
        }

        let mut sample: Vec<&str> = missing
            .iter()
            .take(MISSING_KEY_SAMPLE)
            .map(String::as_str)
            .collect();
        if missing.len() > MISSING_KEY_SAMPLE {
            sample.push("...");
        }
        checks.push(Diagnostic::warning(
            "translations",
            format!(
                "{} missing {} key(s), falling back to {}: {}",
                lang,
                missing.len(),
                catalog.fallback(),
                sample.join(", ")
            ),
        ));
    }
}

fn check_analytics(config: &SiteConfig) -> Diagnostic {
    match config.ga4() {
        Ok(Some(ga4)) => Diagnostic::ok("analytics", format!("GA4 {}", ga4.measurement_id)),
        Ok(None) => Diagnostic::ok("analytics", "disabled (no measurement id)".to_string()),
        Err(err) => Diagnostic::error("analytics", err.to_string()),
    }
}

// Empty plain strings count as missing too.
fn has_text(text: &LocalizedText) -> bool {
    match text {
        LocalizedText::Plain(value) => !value.is_empty(),
        LocalizedText::ByLanguage(_) => text.has_fallback(),
    }
}

fn in_range(point: LatLng) -> bool {
    (-90.0..=90.0).contains(&point.lat) && (-180.0..=180.0).contains(&point.lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Place};
    use std::collections::BTreeMap;

    fn location(id: &str) -> Location {
        Location {
            id: id.into(),
            name: id.into(),
            country: "Uruguay".into(),
            description: LocalizedText::from("x"),
            center: LatLng::new(-34.0, -55.0),
        }
    }

    fn place(id: &str, category: &str, instagram: Option<&str>) -> Place {
        Place {
            id: id.into(),
            title: LocalizedText::by_language([("en", "Only English")]),
            description: LocalizedText::from("text"),
            category: category.into(),
            coordinates: LatLng::new(-34.0, -55.0),
            instagram: instagram.map(str::to_string),
        }
    }

    fn has(checks: &[Diagnostic], level: Level, needle: &str) -> bool {
        checks
            .iter()
            .any(|d| d.level == level && d.detail.contains(needle))
    }

    #[test]
    fn bundled_dataset_has_no_errors() {
        let dataset = Dataset::bundled().unwrap();
        let catalog = Catalog::bundled().unwrap();
        let checks = collect(&SiteConfig::default(), &dataset, &catalog);
        assert!(checks.iter().all(|d| d.level != Level::Error), "{:?}", checks);
        assert!(has(&checks, Level::Warn, "pt missing"));
    }

    #[test]
    fn flags_dataset_problems() {
        let mut places = BTreeMap::new();
        places.insert(
            "a".to_string(),
            vec![
                place("p", "beach", Some("https://evil.com/x")),
                place("p", "casino", None),
            ],
        );
        places.insert("ghost".to_string(), vec![]);
        let mut far = location("b");
        far.center = LatLng::new(120.0, 0.0);
        let locations = vec![location("a"), location("a"), far];
        let dataset = Dataset::new(locations, places, Default::default());
        let checks = collect(&SiteConfig::default(), &dataset, &Catalog::bundled().unwrap());

        assert!(has(&checks, Level::Error, "duplicate location id \"a\""));
        assert!(has(&checks, Level::Error, "unknown location \"ghost\""));
        assert!(has(&checks, Level::Error, "location b center is out of range"));
        assert!(has(&checks, Level::Warn, "duplicate place id a/p"));
        assert!(has(&checks, Level::Warn, "a/p title has no \"es\" text"));
        assert!(has(&checks, Level::Warn, "unknown category \"casino\""));
        assert!(has(&checks, Level::Warn, "rejected; link omitted"));
        assert!(has(&checks, Level::Warn, "location b has no places"));
    }

    #[test]
    fn unsafe_location_ids_are_errors() {
        let dataset = Dataset::new(
            vec![location("../escaped"), location("a/b"), location("ok-id")],
            BTreeMap::new(),
            Default::default(),
        );
        let checks = collect(&SiteConfig::default(), &dataset, &Catalog::bundled().unwrap());

        assert!(has(&checks, Level::Error, "\"../escaped\" is not a single path segment"));
        assert!(has(&checks, Level::Error, "\"a/b\" is not a single path segment"));
        assert!(!has(&checks, Level::Error, "\"ok-id\" is not"));
    }

    #[test]
    fn invalid_measurement_id_is_an_error() {
        let config = SiteConfig {
            ga4_measurement_id: Some("nope".into()),
            ..SiteConfig::default()
        };
        assert_eq!(check_analytics(&config).level, Level::Error);
    }
}
