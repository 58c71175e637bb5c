// SPDX-License-Identifier: PMPL-1.0-or-later

//! Static page rendering
//!
//! Every function here is pure: it takes the data for one page plus a
//! translator and returns the finished HTML document.

pub mod html;
pub mod output;

pub use html::{escape, RenderContext};
pub use output::RouteOutputFormat;

use crate::analytics::{AnalyticsEvent, NavigationService};
use crate::dataset::Dataset;
use crate::i18n::Translator;
use crate::links;
use crate::routes::{is_valid_location_id, PageData, RouteParams};
use crate::types::{Category, LatLng, Place};
use html::{page_shell, script_json, track_attrs};
use serde_json::json;

/// Route of the not-found page inside a language tree.
pub const NOT_FOUND_ROUTE: &str = "404.html";

/// Landing page listing every location.
pub fn render_index(ctx: &RenderContext, dataset: &Dataset, tr: &Translator<'_>) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<section class=\"hero\">\n<h1>{}</h1>\n<p>{}</p>\n</section>\n",
        escape(&tr.t("home.heading")),
        escape(&tr.t("site.tagline"))
    ));

    body.push_str("<ul class=\"locations\">\n");
    // Locations that cannot have a page are left off the list.
    for location in dataset
        .all_locations()
        .iter()
        .filter(|location| is_valid_location_id(&location.id))
    {
        let route = RouteParams::new(location.id.clone());
        body.push_str(&format!(
            concat!(
                "<li class=\"location\" id=\"location-{id}\">\n",
                "<h2><a href=\"{href}\">{name}</a></h2>\n",
                "<p class=\"country\">{country}</p>\n",
                "<p class=\"description\">{description}</p>\n",
                "<a class=\"explore\" href=\"{href}\">{explore}</a>\n",
                "</li>\n"
            ),
            id = escape(&location.id),
            href = escape(&ctx.url(tr.lang(), &route.url_path())),
            name = escape(&location.name),
            country = escape(&location.country),
            description = escape(tr.field(&location.description)),
            explore = escape(&tr.t("home.explore")),
        ));
    }
    body.push_str("</ul>\n");

    page_shell(ctx, tr, "", "", &body)
}

/// One location page: description, map markers, and the places list.
pub fn render_location(
    ctx: &RenderContext,
    page: &PageData<'_>,
    dataset: &Dataset,
    tr: &Translator<'_>,
) -> String {
    let location = page.location;
    let route = RouteParams::new(location.id.clone());
    let view_event = AnalyticsEvent::LocationView {
        location_name: location.name.clone(),
    };

    let mut body = String::new();
    body.push_str(&format!(
        concat!(
            "<nav class=\"breadcrumb\"><a href=\"{home}\">{back}</a></nav>\n",
            "<section class=\"location-header\"{track}>\n",
            "<h1>{name}</h1>\n",
            "<p class=\"country\">{country}</p>\n",
            "<p class=\"description\">{description}</p>\n",
            "</section>\n"
        ),
        home = escape(&ctx.url(tr.lang(), "")),
        back = escape(&tr.t("nav.back")),
        track = track_attrs(&view_event),
        name = escape(&location.name),
        country = escape(&location.country),
        description = escape(tr.field(&location.description)),
    ));

    body.push_str(&format!(
        "<section id=\"map\" aria-label=\"{}\" data-center-lat=\"{}\" data-center-lng=\"{}\"></section>\n",
        escape(&tr.t("location.map")),
        location.center.lat,
        location.center.lng
    ));
    body.push_str(&format!(
        "<script type=\"application/json\" id=\"places-data\">{}</script>\n",
        script_json(&markers_json(page.places, dataset, tr))
    ));

    body.push_str(&format!(
        "<section class=\"places\">\n<h2>{}</h2>\n",
        escape(&tr.t("location.places"))
    ));
    if page.places.is_empty() {
        body.push_str(&format!(
            "<p class=\"empty\">{}</p>\n",
            escape(&tr.t("location.empty"))
        ));
    } else {
        for place in page.places {
            body.push_str(&render_place(place, dataset.category(&place.category), tr));
        }
    }
    body.push_str("</section>\n");

    page_shell(ctx, tr, &location.name, &route.url_path(), &body)
}

/// Page served for ids that have no prerendered route.
pub fn render_not_found(ctx: &RenderContext, tr: &Translator<'_>) -> String {
    let body = format!(
        concat!(
            "<section class=\"not-found\">\n",
            "<h1>{title}</h1>\n",
            "<p>{text}</p>\n",
            "<a href=\"{home}\">{back}</a>\n",
            "</section>\n"
        ),
        title = escape(&tr.t("notfound.title")),
        text = escape(&tr.t("notfound.body")),
        home = escape(&ctx.url(tr.lang(), "")),
        back = escape(&tr.t("nav.back")),
    );
    page_shell(ctx, tr, &tr.t("notfound.title"), NOT_FOUND_ROUTE, &body)
}

/// Display name of a category: the translated label if the catalog has one,
/// otherwise the raw category name.
pub fn category_label(tr: &Translator<'_>, category: &str) -> String {
    let key = format!("categories.{}", category);
    let label = tr.t(&key);
    if label == key {
        category.to_string()
    } else {
        label
    }
}

fn render_place(place: &Place, category: Option<&Category>, tr: &Translator<'_>) -> String {
    let title = tr.field(&place.title);
    let expand = AnalyticsEvent::ListExpand {
        place_name: title.to_string(),
        category: place.category.clone(),
    };
    let (icon, color) = category
        .map(|c| (c.icon.as_str(), c.color.as_str()))
        .unwrap_or(("📍", "#64748b"));

    let mut out = format!(
        concat!(
            "<article class=\"place\" id=\"place-{id}\" data-lat=\"{lat}\" data-lng=\"{lng}\"{track}>\n",
            "<h3>{title}</h3>\n",
            "<span class=\"category\" style=\"--category-color: {color}\">{icon} {label}</span>\n",
            "<p class=\"description\">{description}</p>\n",
            "<p class=\"directions\"><span>{directions}</span>\n"
        ),
        id = escape(&place.id),
        lat = place.coordinates.lat,
        lng = place.coordinates.lng,
        track = track_attrs(&expand),
        title = escape(title),
        color = escape(color),
        icon = escape(icon),
        label = escape(&category_label(tr, &place.category)),
        description = escape(tr.field(&place.description)),
        directions = escape(&tr.t("place.directions")),
    );

    for (service, key) in [
        (NavigationService::Waze, "navigation.waze"),
        (NavigationService::GoogleMaps, "navigation.google_maps"),
        (NavigationService::AppleMaps, "navigation.apple_maps"),
    ] {
        out.push_str(&external_link(
            &navigation_url(service, place.coordinates),
            &tr.t(key),
            service,
            title,
        ));
    }
    out.push_str("</p>\n");

    if let Some(url) = place
        .instagram
        .as_deref()
        .and_then(links::normalize_instagram_url)
    {
        // Profile links show the handle; other Instagram URLs the generic label.
        let text = match links::instagram_handle(&url) {
            Some(handle) => format!("@{}", handle),
            None => tr.t("place.instagram"),
        };
        out.push_str(&format!(
            "<p class=\"social\" title=\"{}\">",
            escape(&tr.t("place.instagram"))
        ));
        out.push_str(&external_link(&url, &text, NavigationService::Instagram, title));
        out.push_str("</p>\n");
    }

    out.push_str("</article>\n");
    out
}

fn external_link(href: &str, label: &str, service: NavigationService, place_name: &str) -> String {
    let click = AnalyticsEvent::NavigationClick {
        service,
        place_name: Some(place_name.to_string()).filter(|name| !name.is_empty()),
    };
    format!(
        "<a class=\"{}\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\"{}>{}</a>\n",
        service.as_str(),
        escape(href),
        track_attrs(&click),
        escape(label)
    )
}

/// Turn-by-turn link to `point` in the given navigation app.
pub fn navigation_url(service: NavigationService, point: LatLng) -> String {
    match service {
        NavigationService::Waze => format!(
            "https://waze.com/ul?ll={},{}&navigate=yes",
            point.lat, point.lng
        ),
        NavigationService::GoogleMaps => format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            point.lat, point.lng
        ),
        NavigationService::AppleMaps => {
            format!("https://maps.apple.com/?daddr={},{}", point.lat, point.lng)
        }
        NavigationService::Instagram => "https://www.instagram.com/".to_string(),
    }
}

fn markers_json(places: &[Place], dataset: &Dataset, tr: &Translator<'_>) -> serde_json::Value {
    let markers: Vec<serde_json::Value> = places
        .iter()
        .map(|place| {
            let category = dataset.category(&place.category);
            let title = tr.field(&place.title);
            let marker_click = AnalyticsEvent::MarkerClick {
                place_name: title.to_string(),
                category: place.category.clone(),
            };
            let place_view = AnalyticsEvent::PlaceView {
                place_name: title.to_string(),
                category: place.category.clone(),
            };
            json!({
                "id": place.id,
                "title": title,
                "category": place.category,
                "icon": category.map(|c| c.icon.as_str()),
                "color": category.map(|c| c.color.as_str()),
                "lat": place.coordinates.lat,
                "lng": place.coordinates.lng,
                "instagram": place.instagram.as_deref().and_then(links::normalize_instagram_url),
                "track": {
                    marker_click.name(): marker_click.params(),
                    place_view.name(): place_view.params(),
                },
            })
        })
        .collect();
    serde_json::Value::Array(markers)
}
