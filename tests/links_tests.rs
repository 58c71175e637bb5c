// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tests for Instagram reference normalization

use mapguide::links::{instagram_handle, normalize_instagram_url};

#[test]
fn test_handle_with_at_sign() {
    assert_eq!(
        normalize_instagram_url("@my.place").as_deref(),
        Some("https://www.instagram.com/my.place/")
    );
}

#[test]
fn test_handle_with_trailing_slash() {
    assert_eq!(
        normalize_instagram_url("myplace/").as_deref(),
        Some("https://www.instagram.com/myplace/")
    );
    assert_eq!(
        normalize_instagram_url("my_place//").as_deref(),
        Some("https://www.instagram.com/my_place/")
    );
}

#[test]
fn test_full_url_kept_as_is() {
    assert_eq!(
        normalize_instagram_url("https://instagram.com/myplace").as_deref(),
        Some("https://instagram.com/myplace")
    );
    assert_eq!(
        normalize_instagram_url("https://www.instagram.com/cerropandeazucar/").as_deref(),
        Some("https://www.instagram.com/cerropandeazucar/")
    );
}

#[test]
fn test_scheme_is_case_insensitive() {
    let url = normalize_instagram_url("HTTPS://Instagram.com/myplace")
        .expect("uppercase scheme should be accepted");
    assert_eq!(url, "https://instagram.com/myplace");
    assert!(normalize_instagram_url("http://instagram.com/myplace").is_some());
}

#[test]
fn test_subdomains_accepted() {
    assert!(normalize_instagram_url("https://m.instagram.com/myplace").is_some());
    assert!(normalize_instagram_url("https://www.instagram.com/p/abc123/").is_some());
}

#[test]
fn test_foreign_hosts_rejected() {
    assert_eq!(normalize_instagram_url("https://evil.com/x"), None);
    assert_eq!(normalize_instagram_url("https://xinstagram.com/x"), None);
    assert_eq!(normalize_instagram_url("https://instagram.com.evil.tld/x"), None);
    assert_eq!(normalize_instagram_url("https://evil.com/instagram.com"), None);
}

#[test]
fn test_empty_and_blank_rejected() {
    assert_eq!(normalize_instagram_url(""), None);
    assert_eq!(normalize_instagram_url("   "), None);
    assert_eq!(normalize_instagram_url("@"), None);
    assert_eq!(normalize_instagram_url("/"), None);
}

#[test]
fn test_malformed_handles_rejected() {
    assert_eq!(normalize_instagram_url("bad handle!"), None);
    assert_eq!(normalize_instagram_url("javascript:alert(1)"), None);
    assert_eq!(normalize_instagram_url("@@double"), None);
    assert_eq!(normalize_instagram_url("ñandú"), None);
    assert_eq!(normalize_instagram_url("ftp://instagram.com/x"), None);
}

#[test]
fn test_surrounding_whitespace_ignored() {
    assert_eq!(
        normalize_instagram_url("  @argentinohotel \n").as_deref(),
        Some("https://www.instagram.com/argentinohotel/")
    );
}

#[test]
fn test_every_accepted_reference_points_at_instagram() {
    let inputs = [
        "@a",
        "a.b_c",
        "x/",
        "https://instagram.com",
        "https://www.instagram.com/x?igshid=1",
        "https://evil.com",
        "bad handle",
        "",
    ];
    for input in inputs {
        if let Some(url) = normalize_instagram_url(input) {
            let parsed = url::Url::parse(&url).expect("normalized output must parse");
            let host = parsed.host_str().unwrap();
            assert!(
                host == "instagram.com" || host.ends_with(".instagram.com"),
                "{:?} normalized to foreign host {}",
                input,
                host
            );
        }
    }
}

#[test]
fn test_handle_extraction() {
    assert_eq!(
        instagram_handle("https://www.instagram.com/my.place/").as_deref(),
        Some("my.place")
    );
    assert_eq!(instagram_handle("https://instagram.com/"), None);
    assert_eq!(instagram_handle("not a url"), None);
}
