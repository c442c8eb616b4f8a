use serde::{Deserialize, Serialize};

/// Separator between terms in a `--search` argument.
pub const TERM_DELIMITER: char = '^';

/// Kind of media a run searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    /// Path segment TMDb uses for this kind (`/movie/{id}`, `/tv/{id}`).
    pub fn tmdb_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "tv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Series => "Series",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical identity a user query resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaIdentity {
    pub kind: MediaKind,
    pub provider_id: u64,
    pub title: String,
    pub year: Option<i32>,
}

impl MediaIdentity {
    /// `Title (Year)`, or just the title when the year is unknown.
    pub fn display_title(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({year})", self.title),
            None => self.title.clone(),
        }
    }
}

/// Response layout a site speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteSchema {
    /// UNIT3D `torrents/filter` API.
    Unit3d,
    /// Beyond-HD search API.
    BeyondHd,
}

impl SiteSchema {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unit3d => "unit3d",
            Self::BeyondHd => "beyond_hd",
        }
    }
}

impl std::fmt::Display for SiteSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured tracker site.
#[derive(Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub site_key: String,
    pub name: String,
    pub search_url: String,
    pub api_key: String,
    pub enabled: bool,
    pub schema: SiteSchema,
}

impl SiteConfig {
    /// `Name (KEY)` as shown in logs and tables.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.site_key)
    }
}

// Hand-written so API keys never end up in log output.
impl std::fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteConfig")
            .field("site_key", &self.site_key)
            .field("name", &self.name)
            .field("search_url", &self.search_url)
            .field("api_key", &"<redacted>")
            .field("enabled", &self.enabled)
            .field("schema", &self.schema)
            .finish()
    }
}

/// What gets sent to every site in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub identity: MediaIdentity,
    pub term_filters: Vec<String>,
    pub kind: MediaKind,
}

impl SearchQuery {
    pub fn new(identity: MediaIdentity, term_filters: Vec<String>) -> Self {
        let kind = identity.kind;
        Self {
            identity,
            term_filters,
            kind,
        }
    }

    pub fn has_term_filters(&self) -> bool {
        !self.term_filters.is_empty()
    }

    /// True when `name` contains every term, ignoring case.
    pub fn matches_terms(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.term_filters
            .iter()
            .all(|term| name.contains(&term.to_lowercase()))
    }

    /// The filter as the user typed it, e.g. `2160p^FLUX`.
    pub fn term_label(&self) -> String {
        self.term_filters.join(&TERM_DELIMITER.to_string())
    }
}

/// Split a raw `--search` value into trimmed, non-empty terms.
pub fn parse_terms(raw: &str) -> Vec<String> {
    raw.split(TERM_DELIMITER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A search hit in the common shape shared by every site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub source_site: String,
    pub name: String,
    pub size_bytes: Option<u64>,
    pub seeders: Option<u64>,
    pub leechers: Option<u64>,
    pub freeleech: Option<String>,
    pub media_type_tag: Option<String>,
    pub raw_payload: serde_json::Value,
}

/// Classification of one site's dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteOutcome {
    Success(Vec<NormalizedResult>),
    EmptyMissingType,
    Failure(String),
}

impl SiteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::EmptyMissingType => "empty_missing_type",
            Self::Failure(_) => "failure",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Ordered site-key → outcome mapping, one entry per dispatched site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteOutcomes {
    entries: Vec<(String, SiteOutcome)>,
}

impl SiteOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `site_key`, replacing any earlier one.
    pub fn insert(&mut self, site_key: impl Into<String>, outcome: SiteOutcome) {
        let site_key = site_key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == site_key) {
            Some(entry) => entry.1 = outcome,
            None => self.entries.push((site_key, outcome)),
        }
    }

    pub fn get(&self, site_key: &str) -> Option<&SiteOutcome> {
        self.entries
            .iter()
            .find(|(k, _)| k == site_key)
            .map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SiteOutcome)> {
        self.entries.iter().map(|(k, o)| (k.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_success()).count()
    }
}
