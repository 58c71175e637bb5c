// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for route listings

use crate::routes::RouteParams;
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RouteOutputFormat {
    Json,
    Yaml,
    Text,
}

/// Listing entry: the route params plus where the page ends up.
#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry<'a> {
    #[serde(flatten)]
    pub params: &'a RouteParams,
    pub path: String,
}

impl RouteOutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RouteOutputFormat::Json => "json",
            RouteOutputFormat::Yaml => "yaml",
            RouteOutputFormat::Text => "txt",
        }
    }

    /// `path` with this format's extension added when it has none.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(self.extension())
        }
    }

    pub fn serialize(&self, routes: &[RouteParams]) -> Result<String> {
        let entries: Vec<RouteEntry<'_>> = routes
            .iter()
            .map(|params| RouteEntry {
                params,
                path: params.path().to_string_lossy().replace('\\', "/"),
            })
            .collect();

        match self {
            RouteOutputFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
            RouteOutputFormat::Yaml => Ok(serde_yaml::to_string(&entries)?),
            // One location id per line, for shell pipelines.
            RouteOutputFormat::Text => Ok(routes
                .iter()
                .map(|params| format!("{}\n", params.location))
                .collect()),
        }
    }
}
