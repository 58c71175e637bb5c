// SPDX-License-Identifier: PMPL-1.0-or-later

//! Social profile links
//!
//! Place records may reference an Instagram profile either as a full URL or
//! as a bare handle. Only references that normalize here are ever written
//! into an `href`; everything else is dropped by the renderer.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

const INSTAGRAM_DOMAIN: &str = "instagram.com";

static SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").unwrap());
static HANDLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._]+$").unwrap());

/// Normalize an Instagram reference into a URL safe to link to.
///
/// - `http(s)://` input must parse and point at `instagram.com` or one of its
///   subdomains; it is returned in its parsed form without path rewriting.
/// - Anything else is treated as a handle: one leading `@` and any trailing
///   `/` are stripped, and the rest must be ASCII letters, digits, `.` or `_`.
///   Handles become `https://www.instagram.com/<handle>/`.
///
/// Returns `None` for empty input, foreign hosts, and malformed handles.
pub fn normalize_instagram_url(value: &str) -> Option<String> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    if SCHEME_RE.is_match(raw) {
        let url = Url::parse(raw).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        if !is_instagram_host(&host) {
            tracing::debug!(host = %host, "rejected non-instagram link");
            return None;
        }
        return Some(url.to_string());
    }

    let handle = raw.strip_prefix('@').unwrap_or(raw).trim_end_matches('/');
    if handle.is_empty() || !HANDLE_RE.is_match(handle) {
        return None;
    }

    Some(format!("https://www.{}/{}/", INSTAGRAM_DOMAIN, handle))
}

/// Profile handle for display, taken from the first path segment of a
/// normalized Instagram URL (`https://www.instagram.com/foo/` gives `foo`).
pub fn instagram_handle(normalized: &str) -> Option<String> {
    let url = Url::parse(normalized).ok()?;
    let first = url.path_segments()?.find(|segment| !segment.is_empty())?;
    if HANDLE_RE.is_match(first) {
        Some(first.to_string())
    } else {
        None
    }
}

// Matches on a label boundary so `xinstagram.com` and
// `instagram.com.evil.tld` are not accepted.
fn is_instagram_host(host: &str) -> bool {
    host == INSTAGRAM_DOMAIN
        || host
            .strip_suffix(INSTAGRAM_DOMAIN)
            .map(|prefix| prefix.ends_with('.'))
            .unwrap_or(false)
}
