// SPDX-License-Identifier: PMPL-1.0-or-later

//! Usage analytics
//!
//! Named events with small structured payloads, shaped after Google
//! Analytics 4 custom events. The guide hands events to a [`TrackingSink`]
//! and never depends on their delivery.

use crate::i18n::Lang;
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

static MEASUREMENT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^G-[A-Z0-9]{4,}$").unwrap());

/// External services a place links out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationService {
    Waze,
    GoogleMaps,
    AppleMaps,
    Instagram,
}

impl NavigationService {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationService::Waze => "waze",
            NavigationService::GoogleMaps => "google-maps",
            NavigationService::AppleMaps => "apple-maps",
            NavigationService::Instagram => "instagram",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    PageView {
        path: String,
    },
    PlaceView {
        place_name: String,
        category: String,
    },
    LocationView {
        location_name: String,
    },
    LanguageChange {
        language: Lang,
    },
    MarkerClick {
        place_name: String,
        category: String,
    },
    ListExpand {
        place_name: String,
        category: String,
    },
    /// Sent with beacon transport so it survives the page unloading.
    NavigationClick {
        service: NavigationService,
        place_name: Option<String>,
    },
}

impl AnalyticsEvent {
    /// GA4 event name.
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::PageView { .. } => "page_view",
            AnalyticsEvent::PlaceView { .. } => "place_view",
            AnalyticsEvent::LocationView { .. } => "location_view",
            AnalyticsEvent::LanguageChange { .. } => "language_change",
            AnalyticsEvent::MarkerClick { .. } => "marker_click",
            AnalyticsEvent::ListExpand { .. } => "list_expand",
            AnalyticsEvent::NavigationClick { .. } => "navigation_click",
        }
    }

    /// Event payload.
    pub fn params(&self) -> Map<String, Value> {
        let value = match self {
            AnalyticsEvent::PageView { path } => json!({ "page_path": path }),
            AnalyticsEvent::PlaceView {
                place_name,
                category,
            } => json!({ "place_name": place_name, "category": category }),
            AnalyticsEvent::LocationView { location_name } => {
                json!({ "location_name": location_name })
            }
            AnalyticsEvent::LanguageChange { language } => json!({ "language": language.code() }),
            AnalyticsEvent::MarkerClick {
                place_name,
                category,
            } => json!({
                "place_name": place_name,
                "category": category,
                "interaction_type": "map",
            }),
            AnalyticsEvent::ListExpand {
                place_name,
                category,
            } => json!({
                "place_name": place_name,
                "category": category,
                "interaction_type": "list",
            }),
            AnalyticsEvent::NavigationClick {
                service,
                place_name,
            } => json!({
                "service": service.as_str(),
                "place_name": place_name.as_deref().unwrap_or("unknown"),
                "transport_type": "beacon",
            }),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Destination for analytics events.
pub trait TrackingSink {
    fn track(&mut self, event: &AnalyticsEvent) -> Result<()>;
}

/// Hand `event` to `sink`, logging instead of failing when delivery fails.
pub fn dispatch(sink: &mut dyn TrackingSink, event: &AnalyticsEvent) {
    if let Err(err) = sink.track(event) {
        tracing::warn!(event = event.name(), error = %err, "analytics event dropped");
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl TrackingSink for NullSink {
    fn track(&mut self, _event: &AnalyticsEvent) -> Result<()> {
        Ok(())
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AnalyticsEvent>,
}

impl TrackingSink for RecordingSink {
    fn track(&mut self, event: &AnalyticsEvent) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Appends one JSON object per event to a file.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl TrackingSink for JsonLinesSink {
    fn track(&mut self, event: &AnalyticsEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let line = json!({
            "event": event.name(),
            "params": event.params(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// Google Analytics 4 property used by the rendered pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ga4Config {
    pub measurement_id: String,
}

impl Ga4Config {
    /// Accepts measurement ids of the form `G-XXXXXXXXXX`.
    pub fn parse(measurement_id: &str) -> Result<Self> {
        let id = measurement_id.trim();
        if !MEASUREMENT_ID_RE.is_match(id) {
            bail!("invalid GA4 measurement id: {:?} (expected G-XXXXXXXXXX)", id);
        }
        Ok(Self {
            measurement_id: id.to_string(),
        })
    }

    /// gtag bootstrap for the page `<head>`, with IP anonymisation on and
    /// Google signals and ad personalisation off.
    pub fn snippet(&self) -> String {
        let id = &self.measurement_id;
        format!(
            concat!(
                "<script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n",
                "<script>\n",
                "window.dataLayer = window.dataLayer || [];\n",
                "function gtag(){{dataLayer.push(arguments);}}\n",
                "gtag('js', new Date());\n",
                "gtag('config', '{id}', {{anonymize_ip: true, allow_google_signals: false, allow_ad_personalization_signals: false}});\n",
                "</script>"
            ),
            id = id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        let event = AnalyticsEvent::LanguageChange { language: Lang::En };
        assert_eq!(event.name(), "language_change");
        assert_eq!(event.params()["language"], "en");
    }

    #[test]
    fn navigation_click_defaults_place_name() {
        let event = AnalyticsEvent::NavigationClick {
            service: NavigationService::GoogleMaps,
            place_name: None,
        };
        let params = event.params();
        assert_eq!(params["service"], "google-maps");
        assert_eq!(params["place_name"], "unknown");
        assert_eq!(params["transport_type"], "beacon");
    }

    #[test]
    fn interaction_types() {
        let marker = AnalyticsEvent::MarkerClick {
            place_name: "Castillo".into(),
            category: "history".into(),
        };
        let list = AnalyticsEvent::ListExpand {
            place_name: "Castillo".into(),
            category: "history".into(),
        };
        assert_eq!(marker.params()["interaction_type"], "map");
        assert_eq!(list.params()["interaction_type"], "list");
    }

    #[test]
    fn measurement_id_validation() {
        assert!(Ga4Config::parse("G-ABC123XYZ9").is_ok());
        assert_eq!(
            Ga4Config::parse("  G-ABC123XYZ9 ").unwrap().measurement_id,
            "G-ABC123XYZ9"
        );
        assert!(Ga4Config::parse("UA-12345-1").is_err());
        assert!(Ga4Config::parse("G-abc").is_err());
        assert!(Ga4Config::parse("G-ABCD'><script>").is_err());
    }

    #[test]
    fn snippet_is_privacy_preserving() {
        let snippet = Ga4Config::parse("G-TEST1234").unwrap().snippet();
        assert!(snippet.contains("gtag/js?id=G-TEST1234"));
        assert!(snippet.contains("anonymize_ip: true"));
        assert!(snippet.contains("allow_google_signals: false"));
        assert!(snippet.contains("allow_ad_personalization_signals: false"));
    }

    #[test]
    fn recording_and_dispatch() {
        let mut sink = RecordingSink::default();
        dispatch(
            &mut sink,
            &AnalyticsEvent::PageView {
                path: "/piriapolis/".into(),
            },
        );
        assert_eq!(sink.events.len(), 1);
        assert_eq!(sink.events[0].params()["page_path"], "/piriapolis/");
    }

    struct FailingSink;

    impl TrackingSink for FailingSink {
        fn track(&mut self, _event: &AnalyticsEvent) -> Result<()> {
            bail!("sink offline")
        }
    }

    #[test]
    fn dispatch_swallows_sink_errors() {
        dispatch(
            &mut FailingSink,
            &AnalyticsEvent::LocationView {
                location_name: "Piriápolis".into(),
            },
        );
    }

    #[test]
    fn json_lines_sink_appends() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("events/log.jsonl");
        let mut sink = JsonLinesSink::new(&path);
        sink.track(&AnalyticsEvent::LanguageChange { language: Lang::Pt })
            .unwrap();
        sink.track(&AnalyticsEvent::PageView { path: "/".into() })
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "language_change");
        assert_eq!(lines[0]["params"]["language"], "pt");
        assert_eq!(lines[1]["event"], "page_view");
    }
}
