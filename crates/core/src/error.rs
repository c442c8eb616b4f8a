use thiserror::Error;

/// Errors that end a run.
///
/// Per-site failures are not here: they are captured as
/// [`SiteOutcome::Failure`](crate::types::SiteOutcome) and reported.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("metadata provider error: {0}")]
    Provider(String),

    #[error("no matching results for {0}")]
    NotFound(String),

    #[error("no suitable result selected")]
    NoSelection,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Provider(_) => "provider_error",
            Self::NotFound(_) => "not_found",
            Self::NoSelection => "no_selection",
            Self::InvalidInput(_) => "invalid_input",
            Self::Config(_) => "config_error",
            Self::Io(_) => "io_error",
        }
    }

    /// Process exit status. Declining every candidate exits cleanly.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoSelection => 0,
            Self::Provider(_) => 3,
            Self::NotFound(_) => 4,
            Self::InvalidInput(_) => 2,
            Self::Config(_) => 78,
            Self::Io(_) => 74,
        }
    }
}
