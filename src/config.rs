// SPDX-License-Identifier: PMPL-1.0-or-later

//! Site configuration
//!
//! Settings are layered: built-in defaults, then `mapguide.yaml` (or the file
//! given with `--config`), then `MAPGUIDE_*` environment variables, then
//! command-line flags (applied by the binary).

use crate::analytics::Ga4Config;
use crate::i18n::Lang;
use crate::storage::DEFAULT_PREFERENCES_PATH;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "mapguide.yaml";

pub const ENV_DATA_DIR: &str = "MAPGUIDE_DATA_DIR";
pub const ENV_OUT_DIR: &str = "MAPGUIDE_OUT_DIR";
pub const ENV_GA4_ID: &str = "MAPGUIDE_GA4_ID";
pub const ENV_BASE_URL: &str = "MAPGUIDE_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Dataset directory; the bundled dataset is used when unset.
    pub data_dir: Option<PathBuf>,
    /// Directory with `<code>.json` translation overrides.
    pub translations_dir: Option<PathBuf>,
    pub out_dir: PathBuf,
    /// Copied verbatim into the output directory.
    pub static_dir: Option<PathBuf>,
    pub base_url: String,
    pub default_lang: Lang,
    pub languages: Vec<Lang>,
    pub ga4_measurement_id: Option<String>,
    pub preferences_path: PathBuf,
    /// JSON-lines file receiving analytics events raised by the CLI.
    pub analytics_log: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            translations_dir: None,
            out_dir: PathBuf::from("build"),
            static_dir: None,
            base_url: "/".to_string(),
            default_lang: Lang::Es,
            languages: Lang::all().to_vec(),
            ga4_measurement_id: None,
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
            analytics_log: None,
        }
    }
}

impl SiteConfig {
    /// Defaults overlaid with the config file and the process environment.
    ///
    /// An explicit `path` must exist; without one, `mapguide.yaml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded site config");
        Ok(config)
    }

    /// Apply `MAPGUIDE_*` overrides read through `lookup`. Blank values are
    /// ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = get(ENV_OUT_DIR) {
            self.out_dir = PathBuf::from(dir);
        }
        if let Some(id) = get(ENV_GA4_ID) {
            self.ga4_measurement_id = Some(id);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
    }

    /// Check cross-field constraints. The default language is added to the
    /// language list if it was left out; duplicates are dropped.
    pub fn validate(&mut self) -> Result<()> {
        let mut seen = Vec::new();
        for lang in &self.languages {
            if !seen.contains(lang) {
                seen.push(*lang);
            }
        }
        if !seen.contains(&self.default_lang) {
            seen.insert(0, self.default_lang);
        }
        self.languages = seen;

        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        self.ga4()?;
        Ok(())
    }

    /// Parsed GA4 settings, if a measurement id is configured.
    pub fn ga4(&self) -> Result<Option<Ga4Config>> {
        self.ga4_measurement_id
            .as_deref()
            .map(Ga4Config::parse)
            .transpose()
    }
}
