//! Outbound requests to tracker sites.

use std::time::Duration;

use tracing::debug;

use tmdbtrack_core::types::{SearchQuery, SiteConfig, SiteSchema};

use crate::SiteError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches one site's raw search response for a query.
#[async_trait::async_trait]
pub trait SiteBackend: Send + Sync {
    async fn fetch(&self, site: &SiteConfig, query: &SearchQuery) -> Result<Vec<u8>, SiteError>;
}

/// Drops the URL from reqwest errors. Beyond-HD URLs carry the API key.
fn transport(e: reqwest::Error) -> SiteError {
    SiteError::Transport(e.without_url().to_string())
}

pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new() -> Result<Self, SiteError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build_request(&self, site: &SiteConfig, query: &SearchQuery) -> reqwest::RequestBuilder {
        let tmdb_id = query.identity.provider_id.to_string();
        match site.schema {
            SiteSchema::Unit3d => self
                .client
                .get(&site.search_url)
                .bearer_auth(&site.api_key)
                .header(reqwest::header::ACCEPT, "application/json")
                .query(&[("tmdbId", tmdb_id.as_str())]),
            SiteSchema::BeyondHd => {
                let url = format!("{}/{}", site.search_url.trim_end_matches('/'), site.api_key);
                self.client.post(url).json(&serde_json::json!({
                    "action": "search",
                    "tmdb_id": format!("{}/{tmdb_id}", query.kind.tmdb_segment()),
                }))
            }
        }
    }
}

#[async_trait::async_trait]
impl SiteBackend for HttpBackend {
    async fn fetch(&self, site: &SiteConfig, query: &SearchQuery) -> Result<Vec<u8>, SiteError> {
        debug!(site = %site.site_key, url = %site.search_url, schema = %site.schema, "site request");

        let resp = self
            .build_request(site, query)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::Status(status));
        }

        let body = resp
            .bytes()
            .await
            .map_err(transport)?;
        debug!(site = %site.site_key, bytes = body.len(), "site response");
        Ok(body.to_vec())
    }
}
