//! Per-schema mapping from raw site responses to [`NormalizedResult`]s.
//!
//! Each [`SiteSchema`] maps to one [`NormalizeFn`]; adding a site that
//! speaks an existing schema needs no new code here.

use serde_json::Value;
use tmdbtrack_core::types::{MediaKind, NormalizedResult, SiteSchema};

use crate::SiteError;

pub type NormalizeFn = fn(&str, MediaKind, &Value) -> Result<Vec<NormalizedResult>, SiteError>;

pub fn normalizer_for(schema: SiteSchema) -> NormalizeFn {
    match schema {
        SiteSchema::Unit3d => normalize_unit3d,
        SiteSchema::BeyondHd => normalize_beyond_hd,
    }
}

/// Parse a raw body and map it with the site's schema.
pub fn normalize(
    site_key: &str,
    schema: SiteSchema,
    kind: MediaKind,
    raw: &[u8],
) -> Result<Vec<NormalizedResult>, SiteError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| SiteError::Normalize(format!("parse JSON: {e}")))?;
    normalizer_for(schema)(site_key, kind, &value)
}

/// UNIT3D: `{"data": [{"attributes": {...}}]}`.
fn normalize_unit3d(
    site_key: &str,
    kind: MediaKind,
    value: &Value,
) -> Result<Vec<NormalizedResult>, SiteError> {
    let items = value["data"]
        .as_array()
        .ok_or_else(|| SiteError::Normalize("missing `data` array".to_string()))?;

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let attrs = item
            .get("attributes")
            .filter(|a| a.is_object())
            .ok_or_else(|| SiteError::Normalize("item without `attributes`".to_string()))?;
        if let Some(record) = map_record(site_key, kind, attrs, item) {
            results.push(record);
        }
    }
    Ok(results)
}

/// Beyond-HD: `{"status_code": 1, "success": true, "results": [...]}`.
fn normalize_beyond_hd(
    site_key: &str,
    kind: MediaKind,
    value: &Value,
) -> Result<Vec<NormalizedResult>, SiteError> {
    let ok = value["success"].as_bool().unwrap_or(true)
        && value["status_code"].as_i64().is_none_or(|c| c == 1);
    if !ok {
        let message = value["status_message"]
            .as_str()
            .unwrap_or("request rejected");
        return Err(SiteError::Normalize(format!("site reported: {message}")));
    }

    let items = value["results"]
        .as_array()
        .ok_or_else(|| SiteError::Normalize("missing `results` array".to_string()))?;

    Ok(items
        .iter()
        .filter(|item| item.is_object())
        .filter_map(|item| map_record(site_key, kind, item, item))
        .collect())
}

/// Shared field mapping. Returns `None` for items of the other media kind.
fn map_record(
    site_key: &str,
    kind: MediaKind,
    fields: &Value,
    raw: &Value,
) -> Option<NormalizedResult> {
    if let Some(category) = fields["category"].as_str() {
        if category_kind(category).is_some_and(|k| k != kind) {
            return None;
        }
    }

    Some(NormalizedResult {
        source_site: site_key.to_string(),
        name: fields["name"].as_str().unwrap_or("N/A").to_string(),
        size_bytes: as_count(&fields["size"]),
        seeders: as_count(&fields["seeders"]),
        leechers: as_count(&fields["leechers"]),
        freeleech: as_text(&fields["freeleech"]),
        media_type_tag: fields["type"].as_str().map(|s| s.to_string()),
        raw_payload: raw.clone(),
    })
}

fn category_kind(category: &str) -> Option<MediaKind> {
    let category = category.to_lowercase();
    if category.contains("movie") || category.contains("film") {
        Some(MediaKind::Movie)
    } else if category.contains("tv") || category.contains("series") || category.contains("episode")
    {
        Some(MediaKind::Series)
    } else {
        None
    }
}

/// Trackers send counts as integers, floats, or numeric strings.
fn as_count(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
