#![allow(clippy::collapsible_if)]
pub mod backend;
pub mod coverage;
pub mod dispatch;
pub mod dump;
pub mod normalize;
pub mod present;
pub mod registry;
pub mod report;
pub mod table;

use thiserror::Error;

/// Why one site's search failed. Converted to a
/// [`SiteOutcome::Failure`](tmdbtrack_core::types::SiteOutcome) by the dispatcher.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid response: {0}")]
    Normalize(String),
}
