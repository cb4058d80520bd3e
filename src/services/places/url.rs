//! Place ids embedded in Google Maps links

use once_cell::sync::Lazy;
use regex::Regex;

static CHIJ_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(ChIJ[A-Za-z0-9_-]{16,})").expect("Invalid place id regex"));
static PARAM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"place_id=([A-Za-z0-9_-]+)").expect("Invalid place_id regex"));

/// Whether `place_id` looks like a Places API id (`ChIJ…`, 20 to 35 characters)
pub fn is_valid_place_id(place_id: &str) -> bool {
    place_id.starts_with("ChIJ") && (20..=35).contains(&place_id.len())
}

/// Place id carried by a Google Maps link, if any.
///
/// A `ChIJ…` token anywhere in the link wins (this covers `!1s` segments of
/// `data=` blocks); otherwise a `place_id=` query parameter is used. Hex
/// feature ids (`0x…:0x…`) are never returned.
pub fn extract_place_id(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    CHIJ_PATTERN
        .captures_iter(url)
        .chain(PARAM_PATTERN.captures_iter(url))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|id| is_valid_place_id(id))
        .map(str::to_string)
}
