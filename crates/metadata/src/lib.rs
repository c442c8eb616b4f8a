pub mod provider;
pub mod resolver;
pub mod tmdb;

use thiserror::Error;
use tmdbtrack_core::types::MediaIdentity;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
}

/// Provider details shown once an identity has been picked.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MediaDetails {
    pub identity: MediaIdentity,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<i32>,
    pub overview: Option<String>,
}

impl MediaDetails {
    /// `2h 28m`, or `N/A` when the provider has no runtime.
    pub fn formatted_runtime(&self) -> String {
        match self.runtime_minutes {
            Some(m) if m > 0 => format!("{}h {}m", m / 60, m % 60),
            _ => "N/A".to_string(),
        }
    }
}
