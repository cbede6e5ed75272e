//! Hostname → retailer classification.

use ethiscan_core::Platform;

/// Domain fragments in priority order. The first fragment found anywhere in
/// the hostname decides the platform.
const DOMAIN_FRAGMENTS: &[(&str, Platform)] = &[
    ("amazon", Platform::Amazon),
    ("flipkart", Platform::Flipkart),
    ("myntra", Platform::Myntra),
];

/// Classifies a hostname such as `"www.amazon.in"`.
///
/// Matching is a case-insensitive substring test, so regional and mobile
/// hosts (`"m.flipkart.com"`) resolve too. Anything unrecognized is
/// [`Platform::Generic`]; this never fails.
#[must_use]
pub fn detect_platform(hostname: &str) -> Platform {
    let host = hostname.to_ascii_lowercase();
    DOMAIN_FRAGMENTS
        .iter()
        .find(|(fragment, _)| host.contains(fragment))
        .map_or(Platform::Generic, |(_, platform)| *platform)
}

/// Classifies a full page URL by its host. Unparseable URLs are generic.
#[must_use]
pub fn detect_from_url(url: &str) -> Platform {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(detect_platform))
        .unwrap_or(Platform::Generic)
}
