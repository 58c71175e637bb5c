// SPDX-License-Identifier: PMPL-1.0-or-later

//! Site build: prerender every page of the guide into an output directory
//!
//! For each configured language the landing page, one page per route, and
//! `404.html` are written; the default language sits at the output root and
//! the others under `<code>/`. A route that fails to load is recorded in the
//! report and skipped, the rest of the build carries on.

use crate::config::SiteConfig;
use crate::dataset::Dataset;
use crate::i18n::{Catalog, Lang, Translator};
use crate::render::{self, RenderContext, RouteOutputFormat, NOT_FOUND_ROUTE};
use crate::routes::{self, RouteParams};
use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Route listing written next to the pages.
pub const ROUTES_MANIFEST: &str = "routes.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedRoute {
    pub location: String,
    pub lang: Lang,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub created_at: String,
    pub out_dir: PathBuf,
    pub languages: Vec<Lang>,
    pub routes: usize,
    pub pages_written: Vec<PathBuf>,
    pub assets_copied: usize,
    pub failed_routes: Vec<FailedRoute>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.failed_routes.is_empty()
    }
}

/// Build every route the dataset defines.
pub fn build(config: &SiteConfig, dataset: &Dataset, catalog: &Catalog) -> Result<BuildReport> {
    let routes = routes::enumerate_route_params(dataset);
    build_routes(config, dataset, catalog, &routes)
}

/// Build the given routes. Ids missing from the dataset are reported as
/// failed routes rather than aborting the build.
pub fn build_routes(
    config: &SiteConfig,
    dataset: &Dataset,
    catalog: &Catalog,
    routes: &[RouteParams],
) -> Result<BuildReport> {
    let mut ctx = RenderContext::new(&config.base_url, config.default_lang);
    ctx.languages = config.languages.clone();
    ctx.ga4 = config.ga4()?;

    let out_dir = &config.out_dir;
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut pages_written = Vec::new();
    let mut failed_routes = Vec::new();

    for lang in &config.languages {
        let tr = Translator::new(catalog, *lang);
        let lang_root = out_dir.join(ctx.lang_prefix(*lang));
        tracing::info!(lang = %lang, root = %lang_root.display(), "rendering language tree");

        write_page(
            &lang_root,
            Path::new("index.html"),
            &render::render_index(&ctx, dataset, &tr),
            &mut pages_written,
        )?;
        write_page(
            &lang_root,
            Path::new(NOT_FOUND_ROUTE),
            &render::render_not_found(&ctx, &tr),
            &mut pages_written,
        )?;

        for params in routes {
            match routes::load(dataset, params) {
                Ok(page) => {
                    let html = render::render_location(&ctx, &page, dataset, &tr);
                    write_page(&lang_root, &params.path(), &html, &mut pages_written)?;
                }
                Err(err) => {
                    tracing::error!(
                        location = %params.location,
                        lang = %lang,
                        error = %err,
                        "route skipped"
                    );
                    failed_routes.push(FailedRoute {
                        location: params.location.clone(),
                        lang: *lang,
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    let manifest = RouteOutputFormat::Json.serialize(routes)?;
    let manifest_path = out_dir.join(ROUTES_MANIFEST);
    fs::write(&manifest_path, manifest)
        .with_context(|| format!("writing {}", manifest_path.display()))?;

    let assets_copied = match &config.static_dir {
        Some(dir) => copy_static(dir, out_dir)?,
        None => 0,
    };

    Ok(BuildReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        out_dir: out_dir.clone(),
        languages: config.languages.clone(),
        routes: routes.len(),
        pages_written,
        assets_copied,
        failed_routes,
    })
}

fn write_page(root: &Path, rel: &Path, html: &str, written: &mut Vec<PathBuf>) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "page written");
    written.push(path);
    Ok(())
}

/// Copy every file under `from` into `to`, keeping relative paths.
fn copy_static(from: &Path, to: &Path) -> Result<usize> {
    if !from.is_dir() {
        anyhow::bail!("static directory not found: {}", from.display());
    }

    let mut copied = 0;
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.with_context(|| format!("walking {}", from.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(from)?;
        let target = to.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("copying {}", entry.path().display()))?;
        copied += 1;
    }
    tracing::info!(from = %from.display(), files = copied, "static assets copied");
    Ok(copied)
}

/// Print a build summary to the terminal
pub fn print_summary(report: &BuildReport) {
    println!("\n{}", "=== BUILD SUMMARY ===".bold().cyan());
    println!("  Output: {}", report.out_dir.display());
    let languages: Vec<&str> = report.languages.iter().map(|l| l.code()).collect();
    println!("  Languages: {}", languages.join(", "));
    println!("  Routes: {}", report.routes);
    println!("  Pages written: {}", report.pages_written.len());
    if report.assets_copied > 0 {
        println!("  Static files copied: {}", report.assets_copied);
    }

    if report.is_clean() {
        println!("  {}", "All routes rendered".green());
    } else {
        println!(
            "  {} {}",
            "Failed routes:".red().bold(),
            report.failed_routes.len()
        );
        for failed in &report.failed_routes {
            println!("    - [{}] {}: {}", failed.lang, failed.location, failed.error);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copies_static_tree() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("img")).unwrap();
        fs::write(src.path().join("style.css"), "body{}").unwrap();
        fs::write(src.path().join("img/pin.svg"), "<svg/>").unwrap();

        let copied = copy_static(src.path(), dst.path()).unwrap();
        assert_eq!(copied, 2);
        assert!(dst.path().join("img/pin.svg").is_file());
    }

    #[test]
    fn missing_static_dir_is_an_error() {
        let dst = TempDir::new().unwrap();
        assert!(copy_static(&dst.path().join("nope"), dst.path()).is_err());
    }
}
