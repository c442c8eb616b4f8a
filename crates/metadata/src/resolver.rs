//! Turns a user query into a canonical [`MediaIdentity`].
//!
//! By-ID queries resolve directly. By-name queries resolve when the
//! provider returns exactly one candidate and otherwise hand back a
//! [`DisambiguationSet`] for the caller to choose from.

use std::sync::Arc;

use tracing::{info, warn};

use tmdbtrack_core::error::RunError;
use tmdbtrack_core::types::{MediaIdentity, MediaKind};

use crate::provider::MetadataProvider;
use crate::{MediaDetails, MetadataError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityQuery {
    ByName(String),
    ById(u64),
}

impl IdentityQuery {
    fn describe(&self) -> String {
        match self {
            Self::ByName(name) => format!("'{name}'"),
            Self::ById(id) => format!("TMDb ID {id}"),
        }
    }
}

/// Candidates from a title search, in provider relevance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisambiguationSet {
    pub query: String,
    pub candidates: Vec<MediaIdentity>,
}

impl DisambiguationSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(MediaDetails),
    Ambiguous(DisambiguationSet),
}

pub struct IdentityResolver {
    provider: Arc<dyn MetadataProvider>,
}

impl IdentityResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    pub async fn resolve(
        &self,
        query: &IdentityQuery,
        kind: MediaKind,
    ) -> Result<Resolution, RunError> {
        match query {
            IdentityQuery::ById(id) => {
                info!(tmdb_id = id, %kind, "fetching details by id");
                self.details(kind, *id)
                    .await
                    .map(Resolution::Resolved)
                    .map_err(|e| classify(e, query))
            }
            IdentityQuery::ByName(name) => {
                info!(query = %name, %kind, provider = self.provider.name(), "searching by title");
                let mut candidates = self
                    .provider
                    .search(kind, name)
                    .await
                    .map_err(|e| classify(e, query))?;

                match candidates.len() {
                    0 => {
                        warn!(query = %name, "no results from metadata provider");
                        Err(RunError::NotFound(query.describe()))
                    }
                    1 => {
                        let only = candidates.remove(0);
                        info!(tmdb_id = only.provider_id, title = %only.title, "single candidate");
                        self.details(kind, only.provider_id)
                            .await
                            .map(Resolution::Resolved)
                            .map_err(|e| classify(e, query))
                    }
                    n => {
                        info!(query = %name, candidates = n, "multiple candidates");
                        Ok(Resolution::Ambiguous(DisambiguationSet {
                            query: name.clone(),
                            candidates,
                        }))
                    }
                }
            }
        }
    }

    /// Details for an identity picked from a [`DisambiguationSet`].
    pub async fn details_for(&self, identity: &MediaIdentity) -> Result<MediaDetails, RunError> {
        self.details(identity.kind, identity.provider_id)
            .await
            .map_err(|e| classify(e, &IdentityQuery::ById(identity.provider_id)))
    }

    async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetails, MetadataError> {
        self.provider.details(kind, id).await
    }
}

fn classify(err: MetadataError, query: &IdentityQuery) -> RunError {
    match err {
        MetadataError::NotFound => RunError::NotFound(query.describe()),
        MetadataError::Provider(msg) | MetadataError::Network(msg) => RunError::Provider(msg),
    }
}
