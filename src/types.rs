// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for mapguide
//!
//! Mirrors the JSON shapes of the bundled dataset: locations, the places
//! (points of interest) shown on each location's map, and the category table
//! used to style markers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Code of the language every localized mapping is expected to carry.
pub const FALLBACK_LANG_CODE: &str = "es";

/// A geographic coordinate, stored in the dataset as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for (f64, f64) {
    fn from(point: LatLng) -> Self {
        (point.lat, point.lng)
    }
}

/// Text that is either language-invariant or given per language code.
///
/// In JSON this is either a plain string or an object such as
/// `{"es": "Playa", "en": "Beach"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    ByLanguage(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Build a per-language mapping from `(code, text)` pairs.
    pub fn by_language<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        LocalizedText::ByLanguage(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether this value can always produce text through the `es` fallback.
    ///
    /// Plain strings always can; mappings need a non-empty `es` entry.
    pub fn has_fallback(&self) -> bool {
        match self {
            LocalizedText::Plain(_) => true,
            LocalizedText::ByLanguage(map) => map
                .get(FALLBACK_LANG_CODE)
                .map(|text| !text.is_empty())
                .unwrap_or(false),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        LocalizedText::Plain(value.to_string())
    }
}

impl Default for LocalizedText {
    fn default() -> Self {
        LocalizedText::Plain(String::new())
    }
}

/// A destination with its own guide page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub country: String,
    pub description: LocalizedText,
    pub center: LatLng,
}

/// A point of interest shown on a location's map.
///
/// Places carry no reference to their location; the dataset groups them by
/// the file they are stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub category: String,
    pub coordinates: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Presentation attributes for a place category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub icon: String,
    pub color: String,
}

/// Category table keyed by category name.
pub type Categories = BTreeMap<String, Category>;
