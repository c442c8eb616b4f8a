use tmdbtrack_core::types::{MediaIdentity, MediaKind};

use crate::{MediaDetails, MetadataError};

/// A metadata provider that can search titles and fetch details by ID.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Title search. Candidates come back in the provider's relevance order.
    async fn search(
        &self,
        kind: MediaKind,
        title: &str,
    ) -> Result<Vec<MediaIdentity>, MetadataError>;

    /// Full details for one provider ID. `NotFound` when the provider has
    /// no record for this ID and kind.
    async fn details(
        &self,
        kind: MediaKind,
        provider_id: u64,
    ) -> Result<MediaDetails, MetadataError>;
}
