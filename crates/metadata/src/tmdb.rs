//! TMDB (The Movie Database) provider client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use std::time::Duration;

use tracing::debug;

use tmdbtrack_core::types::{MediaIdentity, MediaKind};

use crate::provider::MetadataProvider;
use crate::{MediaDetails, MetadataError};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, MetadataError> {
        Self::with_timeout(api_key, base_url, REQUEST_TIMEOUT)
    }

    /// Every request fails with `Network` once `timeout` elapses.
    pub fn with_timeout(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, MetadataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MetadataError::Network(e.without_url().to_string()))?;
        Ok(Self::with_client(api_key, base_url, client))
    }

    pub fn with_client(api_key: String, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, MetadataError> {
        let mut all_params = vec![("api_key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            // The request URL carries `api_key`.
            .map_err(|e| MetadataError::Network(e.without_url().to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MetadataError::Provider(
                "TMDB rejected the API key (401 Unauthorized)".to_string(),
            ));
        }

        if !status.is_success() {
            return Err(MetadataError::Provider(format!("TMDB returned {status}")));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {}", e.without_url())))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search(
        &self,
        kind: MediaKind,
        title: &str,
    ) -> Result<Vec<MediaIdentity>, MetadataError> {
        let path = format!("search/{}", kind.tmdb_segment());
        let data = self.get_json(&path, &[("query", title)]).await?;
        let results = data["results"].as_array().cloned().unwrap_or_default();

        Ok(results
            .iter()
            .filter_map(|r| parse_identity(r, kind))
            .collect())
    }

    async fn details(
        &self,
        kind: MediaKind,
        provider_id: u64,
    ) -> Result<MediaDetails, MetadataError> {
        let path = format!("{}/{provider_id}", kind.tmdb_segment());
        let data = self.get_json(&path, &[]).await?;

        parse_details(&data, kind).ok_or_else(|| {
            MetadataError::Provider(format!("TMDB {path} response has no id or title"))
        })
    }
}

/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`.
fn parse_identity(data: &serde_json::Value, kind: MediaKind) -> Option<MediaIdentity> {
    let (title_field, date_field) = match kind {
        MediaKind::Movie => ("title", "release_date"),
        MediaKind::Series => ("name", "first_air_date"),
    };

    let provider_id = data["id"].as_u64()?;
    let title = data[title_field]
        .as_str()
        .or_else(|| data["title"].as_str())
        .or_else(|| data["name"].as_str())?
        .to_string();

    Some(MediaIdentity {
        kind,
        provider_id,
        title,
        year: data[date_field]
            .as_str()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok()),
    })
}

fn parse_details(data: &serde_json::Value, kind: MediaKind) -> Option<MediaDetails> {
    let identity = parse_identity(data, kind)?;

    let runtime_minutes = match kind {
        MediaKind::Movie => data["runtime"].as_i64(),
        MediaKind::Series => data["episode_run_time"]
            .as_array()
            .and_then(|a| a.first())
            .and_then(|v| v.as_i64()),
    }
    .map(|r| r as i32);

    Some(MediaDetails {
        identity,
        genres: data["genres"]
            .as_array()
            .map(|gs| {
                gs.iter()
                    .filter_map(|g| g["name"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default(),
        runtime_minutes,
        overview: data["overview"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
    })
}
