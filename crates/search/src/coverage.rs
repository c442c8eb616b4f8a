//! Media-type coverage: which release categories a site has for a title.

use tracing::warn;

use tmdbtrack_core::types::NormalizedResult;

/// Category name and the lowercase type strings that count as it.
pub const MEDIA_TYPE_CATEGORIES: &[(&str, &[&str])] = &[
    ("REMUX", &["remux"]),
    ("WEB-DL", &["web-dl"]),
    ("Encode", &["encode", "x264 encode", "x265 encode"]),
    ("Full Disc", &["full disc", "full disk"]),
    ("WEBRip", &["webrip", "web-rip"]),
    ("HDTV", &["hdtv"]),
];

pub fn all_categories() -> Vec<&'static str> {
    MEDIA_TYPE_CATEGORIES.iter().map(|(c, _)| *c).collect()
}

/// Categories matched by a type string (equal to or containing a synonym).
fn categories_of(media_type: &str) -> Vec<&'static str> {
    let media_type = media_type.to_lowercase();
    MEDIA_TYPE_CATEGORIES
        .iter()
        .filter(|(_, synonyms)| synonyms.iter().any(|s| media_type.contains(s)))
        .map(|(c, _)| *c)
        .collect()
}

/// Categories none of `results` fall into, in table order.
pub fn missing_categories(site_key: &str, results: &[NormalizedResult]) -> Vec<&'static str> {
    let mut found = Vec::new();
    let mut unknown = Vec::new();

    for tag in results.iter().filter_map(|r| r.media_type_tag.as_deref()) {
        let cats = categories_of(tag);
        if cats.is_empty() {
            if !unknown.contains(&tag) {
                unknown.push(tag);
            }
        } else {
            found.extend(cats);
        }
    }

    if !unknown.is_empty() {
        warn!(site = %site_key, ?unknown, "unknown media types");
    }

    MEDIA_TYPE_CATEGORIES
        .iter()
        .map(|(c, _)| *c)
        .filter(|c| !found.contains(c))
        .collect()
}
