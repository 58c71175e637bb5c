// SPDX-License-Identifier: PMPL-1.0-or-later

//! mapguide: a prerendered, map-based tourist guide.
//!
//! The dataset (locations, their places, and a category table) is turned
//! into a static site with one page per location and per language.
//!
//! PIPELINE:
//! 1. **Dataset**: bundled at compile time or loaded from a directory;
//!    places are grouped by the file they live in.
//! 2. **Routes**: one route per location id, each resolved back to the
//!    location and its places before rendering.
//! 3. **Render**: HTML pages with the map markers, navigation links, and
//!    analytics hooks, text resolved through the [`i18n`] catalog.
//! 4. **Site**: writes every language tree and a route manifest.

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod i18n;
pub mod links;
pub mod render;
pub mod routes;
pub mod site;
pub mod storage;
pub mod types;
