//! `.env`-style configuration: TMDb credentials plus per-site key/URL pairs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use tmdbtrack_core::error::RunError;
use tmdbtrack_core::types::SiteConfig;
use tmdbtrack_metadata::tmdb::DEFAULT_BASE_URL;
use tmdbtrack_search::registry::CATALOG;

pub const DEFAULT_ENV_PATH: &str = "config/.env";

const TMDB_API_KEY: &str = "TMDB_API_KEY";
const TMDB_URL: &str = "TMDB_URL";

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://\S+$").unwrap());

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
    #[error("at least one valid tracker API key and URL pair is required from: {0}")]
    NoEnabledSites(String),
    #[error("{key} is not an http(s) URL: {url}")]
    InvalidUrl { key: String, url: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e.to_string())
    }
}

/// Metadata provider credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub url: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb: ProviderConfig,
    /// Every catalog site, enabled or not, in catalog order.
    pub sites: Vec<SiteConfig>,
}

impl AppConfig {
    /// Read `path`, letting process environment variables override it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut vars: HashMap<String, String> = HashMap::new();
        let iter = dotenvy::from_path_iter(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        for item in iter {
            let (key, value) = item.map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            vars.insert(key, value);
        }

        for key in known_keys() {
            if let Ok(value) = std::env::var(&key) {
                vars.insert(key, value);
            }
        }

        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<String> = [TMDB_API_KEY, TMDB_URL]
            .into_iter()
            .filter(|k| get(*k).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingRequired(missing));
        }

        let tmdb = ProviderConfig {
            api_key: get(TMDB_API_KEY).unwrap_or_default(),
            url: get(TMDB_URL).unwrap_or_default(),
        };
        validate_url(TMDB_URL, &tmdb.url)?;

        let mut sites = Vec::with_capacity(CATALOG.len());
        for entry in CATALOG {
            let url_key = format!("{}_URL", entry.key);
            let api_key = get(&format!("{}_API_KEY", entry.key));
            let url = get(&url_key);
            if let Some(url) = &url {
                validate_url(&url_key, url)?;
            }

            let enabled = api_key.is_some() && url.is_some();
            sites.push(SiteConfig {
                site_key: entry.key.to_string(),
                name: entry.name.to_string(),
                search_url: url.unwrap_or_else(|| entry.default_url.to_string()),
                api_key: api_key.unwrap_or_default(),
                enabled,
                schema: entry.schema,
            });
        }

        let disabled: Vec<String> = sites
            .iter()
            .filter(|s| !s.enabled)
            .map(SiteConfig::label)
            .collect();
        if disabled.len() == sites.len() {
            return Err(ConfigError::NoEnabledSites(disabled.join(", ")));
        }
        if !disabled.is_empty() {
            warn!(sites = %disabled.join(", "), "trackers disabled due to missing or empty values");
        }
        for site in sites.iter().filter(|s| s.enabled) {
            info!(site = %site.label(), url = %site.search_url, "using provided API key");
        }

        Ok(Self { tmdb, sites })
    }
}

fn validate_url(key: &str, url: &str) -> Result<(), ConfigError> {
    if URL_RE.is_match(url) {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            key: key.to_string(),
            url: url.to_string(),
        })
    }
}

fn known_keys() -> Vec<String> {
    let mut keys = vec![TMDB_API_KEY.to_string(), TMDB_URL.to_string()];
    for entry in CATALOG {
        keys.push(format!("{}_API_KEY", entry.key));
        keys.push(format!("{}_URL", entry.key));
    }
    keys
}

/// Template written on first run: empty keys, default URLs.
pub fn default_env_contents() -> String {
    let mut out = String::new();
    out.push_str("# TMDb API Key\n");
    out.push_str(&format!("{TMDB_API_KEY}=\n\n"));
    out.push_str("# TMDb Site URL\n");
    out.push_str(&format!("{TMDB_URL}={DEFAULT_BASE_URL}\n\n"));
    out.push_str("# Site API Keys\n");
    for entry in CATALOG {
        out.push_str(&format!("{}_API_KEY=\n", entry.key));
    }
    out.push_str("\n# Site URLs\n");
    for entry in CATALOG {
        out.push_str(&format!("{}_URL={}\n", entry.key, entry.default_url));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    /// A fresh template was written; the user has to fill it in.
    Created(PathBuf),
    Existing(PathBuf),
}

/// Write the template when `path` is absent or `overwrite` is set.
pub fn ensure_env_file(path: &Path, overwrite: bool) -> Result<EnvFileStatus, ConfigError> {
    if path.exists() && !overwrite {
        info!(path = %path.display(), "env file already exists, skipping creation");
        return Ok(EnvFileStatus::Existing(path.to_path_buf()));
    }

    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, default_env_contents()).map_err(write_err)?;
    info!(path = %path.display(), overwrite, "wrote default env file");
    Ok(EnvFileStatus::Created(path.to_path_buf()))
}
