// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation catalog for mapguide.
//!
//! Each language owns a nested JSON table of user-facing strings, addressed
//! with dotted keys such as `"nav.home"`. The tables for the supported
//! languages are compiled into the binary; a site can override any of them
//! with `<code>.json` files in a translations directory.
//!
//! ## Adding a new language
//!
//! 1. Add a variant to [`Lang`] and its arms in `code()`, `from_code()`,
//!    `native_name()` and `all()`
//! 2. Add `translations/<code>.json` and an arm in `bundled_source()`
//!
//! Keys missing from a new table fall back to Spanish, so a partial table is
//! usable from day one.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Languages the guide can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Es,
    En,
    Pt,
}

impl Lang {
    /// ISO 639-1 two-letter code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::Es => "es",
            Lang::En => "en",
            Lang::Pt => "pt",
        }
    }

    /// Parse a language code into a supported language.
    ///
    /// Accepts surrounding whitespace, any case, and regional tags
    /// (`en-US`, `pt_BR`). Returns `None` for unsupported languages.
    pub fn from_code(code: &str) -> Option<Lang> {
        let lowered = code.trim().to_ascii_lowercase();
        let primary = lowered.split(['-', '_']).next().unwrap_or("");
        match primary {
            "es" => Some(Lang::Es),
            "en" => Some(Lang::En),
            "pt" => Some(Lang::Pt),
            _ => None,
        }
    }

    /// All supported languages, in switcher order.
    pub fn all() -> &'static [Lang] {
        &[Lang::Es, Lang::En, Lang::Pt]
    }

    /// Name of the language in that language, for the language switcher.
    pub fn native_name(&self) -> &'static str {
        match self {
            Lang::Es => "Español",
            Lang::En => "English",
            Lang::Pt => "Português",
        }
    }
}

impl Default for Lang {
    fn default() -> Self {
        Lang::Es
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn bundled_source(lang: Lang) -> &'static str {
    match lang {
        Lang::Es => include_str!("translations/es.json"),
        Lang::En => include_str!("translations/en.json"),
        Lang::Pt => include_str!("translations/pt.json"),
    }
}

/// String tables for every supported language plus the fallback choice.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: HashMap<Lang, Value>,
    fallback: Lang,
}

impl Catalog {
    /// Build a catalog from already-parsed tables. Spanish is the fallback.
    pub fn new(tables: HashMap<Lang, Value>) -> Self {
        Self {
            tables,
            fallback: Lang::Es,
        }
    }

    /// Parse the tables compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let mut tables = HashMap::new();
        for lang in Lang::all() {
            let table: Value = serde_json::from_str(bundled_source(*lang))
                .with_context(|| format!("parsing bundled {} translations", lang))?;
            tables.insert(*lang, table);
        }
        Ok(Self::new(tables))
    }

    /// Load `<code>.json` tables from `dir`, using the bundled table for any
    /// language without a file.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut catalog = Self::bundled()?;
        for lang in Lang::all() {
            let path = dir.join(format!("{}.json", lang.code()));
            if !path.is_file() {
                tracing::debug!(
                    lang = %lang,
                    path = %path.display(),
                    "no override, using bundled table"
                );
                continue;
            }
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let table: Value = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            tracing::debug!(lang = %lang, path = %path.display(), "loaded translation table");
            catalog.tables.insert(*lang, table);
        }
        Ok(catalog)
    }

    pub fn with_fallback(mut self, fallback: Lang) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> Lang {
        self.fallback
    }

    /// Look up a dotted key for `lang`.
    ///
    /// If any segment of the path is absent from the `lang` table the whole
    /// key is looked up again in the fallback table. When that also fails, or
    /// the value found is empty or not text, the key itself is returned so
    /// missing strings stay visible on the page.
    pub fn resolve(&self, lang: Lang, key: &str) -> String {
        let segments: Vec<&str> = key.split('.').collect();
        let found = walk(self.tables.get(&lang), &segments)
            .or_else(|| walk(self.tables.get(&self.fallback), &segments));

        match found.and_then(as_text) {
            Some(text) => text,
            None => key.to_string(),
        }
    }

    /// Leaf keys of the fallback table that `lang` cannot answer on its own.
    pub fn missing_keys(&self, lang: Lang) -> Vec<String> {
        let mut leaves = Vec::new();
        if let Some(table) = self.tables.get(&self.fallback) {
            collect_leaves(table, String::new(), &mut leaves);
        }

        let own = self.tables.get(&lang);
        leaves
            .into_iter()
            .filter(|key| {
                let segments: Vec<&str> = key.split('.').collect();
                walk(own, &segments).and_then(as_text).is_none()
            })
            .collect()
    }
}

fn walk<'a>(table: Option<&'a Value>, segments: &[&str]) -> Option<&'a Value> {
    let mut current = table?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

// Only non-empty text and non-zero numbers count as a translation.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        _ => None,
    }
}

fn collect_leaves(value: &Value, prefix: String, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_leaves(child, path, out);
            }
        }
        _ if !prefix.is_empty() => out.push(prefix),
        _ => {}
    }
}
