//! Sequential fan-out of one [`SearchQuery`] to every enabled site.
//!
//! Every site gets exactly one [`SiteOutcome`]. Site errors are recorded
//! as `Failure` and never stop the remaining sites.

use tracing::{info, warn};

use tmdbtrack_core::types::{SearchQuery, SiteConfig, SiteOutcome, SiteOutcomes};

use crate::backend::SiteBackend;
use crate::dump::JsonDump;
use crate::normalize::normalize;

pub struct Dispatcher<B> {
    backend: B,
    dump: Option<JsonDump>,
}

impl<B: SiteBackend> Dispatcher<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            dump: None,
        }
    }

    pub fn with_json_dump(mut self, dump: JsonDump) -> Self {
        self.dump = Some(dump);
        self
    }

    pub async fn dispatch(&self, query: &SearchQuery, sites: &[&SiteConfig]) -> SiteOutcomes {
        let mut outcomes = SiteOutcomes::new();

        for site in sites {
            info!(site = %site.site_key, tmdb_id = query.identity.provider_id, "querying site");
            let outcome = self.dispatch_one(site, query).await;
            match &outcome {
                SiteOutcome::Success(results) => {
                    info!(site = %site.site_key, results = results.len(), "site matched")
                }
                SiteOutcome::EmptyMissingType => {
                    info!(site = %site.site_key, "no matching results on site")
                }
                SiteOutcome::Failure(reason) => {
                    warn!(site = %site.site_key, reason = %reason, "site query failed")
                }
            }
            outcomes.insert(site.site_key.clone(), outcome);
        }

        outcomes
    }

    async fn dispatch_one(&self, site: &SiteConfig, query: &SearchQuery) -> SiteOutcome {
        let body = match self.backend.fetch(site, query).await {
            Ok(body) => body,
            Err(e) => return SiteOutcome::Failure(e.to_string()),
        };

        if let Some(dump) = &self.dump {
            match dump
                .write(&site.site_key, query.identity.provider_id, &body)
                .await
            {
                Ok(path) => info!(site = %site.site_key, path = %path.display(), "saved raw response"),
                Err(e) => warn!(site = %site.site_key, error = %e, "failed to save raw response"),
            }
        }

        let results = match normalize(&site.site_key, site.schema, query.kind, &body) {
            Ok(results) => results,
            Err(e) => return SiteOutcome::Failure(e.to_string()),
        };

        if results.is_empty() {
            return SiteOutcome::EmptyMissingType;
        }

        if !query.has_term_filters() {
            return SiteOutcome::Success(results);
        }

        let total = results.len();
        let filtered: Vec<_> = results
            .into_iter()
            .filter(|r| query.matches_terms(&r.name))
            .collect();
        info!(
            site = %site.site_key,
            total,
            kept = filtered.len(),
            terms = %query.term_label(),
            "applied term filter"
        );

        if filtered.is_empty() {
            SiteOutcome::EmptyMissingType
        } else {
            SiteOutcome::Success(filtered)
        }
    }
}
