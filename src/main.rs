// SPDX-License-Identifier: PMPL-1.0-or-later

//! mapguide: prerender a map-based tourist guide into a static site
//!
//! Builds one page per location and language from a JSON dataset, and offers
//! a few helpers for inspecting the dataset, the translation tables, and
//! Instagram references.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mapguide::analytics::{self, AnalyticsEvent, JsonLinesSink, NullSink, TrackingSink};
use mapguide::config::SiteConfig;
use mapguide::dataset::Dataset;
use mapguide::diagnostics;
use mapguide::i18n::{Catalog, Lang, LanguageContext};
use mapguide::links;
use mapguide::render::RouteOutputFormat;
use mapguide::routes::{self, RouteParams};
use mapguide::site;
use mapguide::storage::FileStore;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mapguide")]
#[command(version)]
#[command(about = "Prerender a map-based tourist guide into a static site")]
#[command(long_about = None)]
struct Cli {
    /// Site config file (default: ./mapguide.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every page into the output directory
    Build {
        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Dataset directory (default: bundled dataset)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Languages to render, comma separated
        #[arg(short, long, value_delimiter = ',', value_parser = parse_lang)]
        lang: Option<Vec<Lang>>,

        /// Base URL the site is served from
        #[arg(long)]
        base_url: Option<String>,

        /// GA4 measurement id
        #[arg(long)]
        ga4: Option<String>,

        /// Only render these location ids
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<String>>,

        /// Write the build report (JSON) to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List the routes the dataset defines
    Routes {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: RouteOutputFormat,

        /// Write the listing to a file instead of stdout; the format's
        /// extension is added when the path has none
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the dataset, translations, and analytics settings
    Check,

    /// Look up a translation key
    Translate {
        /// Dotted key, e.g. nav.home
        #[arg(value_name = "KEY")]
        key: String,

        /// Language (default: stored preference)
        #[arg(short, long, value_parser = parse_lang)]
        lang: Option<Lang>,
    },

    /// Normalize an Instagram handle or URL
    Link {
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Show or change the stored language preference
    Lang {
        #[command(subcommand)]
        action: LangAction,
    },
}

#[derive(Subcommand)]
enum LangAction {
    /// Print the active language
    Get,
    /// Store a new language preference
    Set {
        #[arg(value_name = "CODE", value_parser = parse_lang)]
        code: Lang,
    },
}

fn parse_lang(value: &str) -> Result<Lang, String> {
    Lang::from_code(value).ok_or_else(|| {
        let supported: Vec<&str> = Lang::all().iter().map(|l| l.code()).collect();
        format!("unsupported language {:?} (supported: {})", value, supported.join(", "))
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "mapguide=debug" } else { "mapguide=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = SiteConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            out,
            data,
            lang,
            base_url,
            ga4,
            only,
            report,
        } => {
            if let Some(out) = out {
                config.out_dir = out;
            }
            if let Some(data) = data {
                config.data_dir = Some(data);
            }
            if let Some(languages) = lang {
                config.languages = languages;
            }
            if let Some(base_url) = base_url {
                config.base_url = base_url;
            }
            if let Some(ga4) = ga4 {
                config.ga4_measurement_id = Some(ga4);
            }
            config.validate()?;

            let dataset = load_dataset(&config)?;
            let catalog = load_catalog(&config)?;
            println!("Building site into: {}", config.out_dir.display());

            let build_report = match only {
                Some(ids) => {
                    let params: Vec<RouteParams> = ids.into_iter().map(RouteParams::new).collect();
                    site::build_routes(&config, &dataset, &catalog, &params)?
                }
                None => site::build(&config, &dataset, &catalog)?,
            };
            site::print_summary(&build_report);

            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&build_report)?;
                fs::write(&path, json)
                    .with_context(|| format!("writing report {}", path.display()))?;
                println!("Report saved to: {}", path.display());
            }

            if !build_report.is_clean() {
                bail!(
                    "{} route(s) could not be rendered",
                    build_report.failed_routes.len()
                );
            }
        }

        Commands::Routes { format, output } => {
            config.validate()?;
            let dataset = load_dataset(&config)?;
            let listing = format.serialize(&routes::enumerate_route_params(&dataset))?;
            match output {
                Some(path) => {
                    let path = format.output_path(&path);
                    fs::write(&path, listing)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Routes saved to: {}", path.display());
                }
                None => print!("{}", listing),
            }
        }

        Commands::Check => {
            // Validation problems are reported by the checks themselves.
            let dataset = load_dataset(&config)?;
            let catalog = load_catalog(&config)?;
            diagnostics::run(&config, &dataset, &catalog)?;
        }

        Commands::Translate { key, lang } => {
            let catalog = load_catalog(&config)?;
            let lang = match lang {
                Some(lang) => lang,
                None => language_context(&config).get(),
            };
            println!("{}", catalog.resolve(lang, &key));
        }

        Commands::Link { value } => match links::normalize_instagram_url(&value) {
            Some(url) => {
                println!("{}", url);
                if let Some(handle) = links::instagram_handle(&url) {
                    println!("@{}", handle);
                }
            }
            None => bail!("not an Instagram handle or URL: {:?}", value),
        },

        Commands::Lang { action } => {
            let mut ctx = language_context(&config);
            match action {
                LangAction::Get => {
                    let lang = ctx.get();
                    println!("{} ({})", lang, lang.native_name());
                }
                LangAction::Set { code } => {
                    let previous = ctx.get();
                    ctx.set(code);
                    if previous != code {
                        let mut sink = tracking_sink(&config);
                        analytics::dispatch(
                            sink.as_mut(),
                            &AnalyticsEvent::LanguageChange { language: code },
                        );
                    }
                    println!("Language set to {} ({})", code, code.native_name());
                }
            }
        }
    }

    Ok(())
}

fn load_dataset(config: &SiteConfig) -> Result<Dataset> {
    match &config.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "loading dataset");
            Dataset::load_dir(dir)
        }
        None => Dataset::bundled(),
    }
}

fn load_catalog(config: &SiteConfig) -> Result<Catalog> {
    let catalog = match &config.translations_dir {
        Some(dir) => Catalog::from_dir(dir)?,
        None => Catalog::bundled()?,
    };
    Ok(catalog)
}

fn language_context(config: &SiteConfig) -> LanguageContext {
    let store = FileStore::new(&config.preferences_path);
    LanguageContext::with_store(Box::new(store), config.default_lang)
}

fn tracking_sink(config: &SiteConfig) -> Box<dyn TrackingSink> {
    match &config.analytics_log {
        Some(path) => Box::new(JsonLinesSink::new(path)),
        None => Box::new(NullSink),
    }
}
