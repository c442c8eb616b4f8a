use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use tmdbtrack_core::types::{MediaKind, parse_terms};
use tmdbtrack_metadata::resolver::IdentityQuery;

use crate::config::DEFAULT_ENV_PATH;

/// Look a title up on TMDb and search every configured tracker for it.
#[derive(Parser, Debug)]
#[command(name = "tmdbtrack", version, about)]
#[command(group(ArgGroup::new("target").args(["id", "name"])))]
#[command(group(ArgGroup::new("kind").args(["movies", "series"])))]
pub struct Cli {
    /// TMDb ID to search for
    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        required_unless_present_any = ["name", "overwrite"]
    )]
    pub id: Option<u64>,

    /// Title to search for
    #[arg(long, num_args = 1.., value_name = "WORDS")]
    pub name: Vec<String>,

    /// Search movies
    #[arg(
        long,
        visible_alias = "m",
        required_unless_present_any = ["series", "overwrite"]
    )]
    pub movies: bool,

    /// Search TV series
    #[arg(long, visible_alias = "s")]
    pub series: bool,

    /// Only keep releases whose name contains every term, separated by '^'
    #[arg(long, value_name = "TERMS")]
    pub search: Option<String>,

    /// Write each site's raw response under the output directory
    #[arg(long)]
    pub json: bool,

    /// Write logs to a timestamped file under the output directory
    #[arg(long)]
    pub logging: bool,

    /// Verbose logging
    #[arg(long)]
    pub debug: bool,

    /// Replace the env file with a fresh template and exit
    #[arg(long)]
    pub overwrite: bool,

    /// Path to the env file
    #[arg(long, default_value = DEFAULT_ENV_PATH)]
    pub config: PathBuf,

    /// Directory for JSON dumps and log files
    #[arg(long, default_value = "logs")]
    pub output_dir: PathBuf,
}

impl Cli {
    pub fn kind(&self) -> MediaKind {
        if self.series {
            MediaKind::Series
        } else {
            MediaKind::Movie
        }
    }

    pub fn identity_query(&self) -> IdentityQuery {
        match self.id {
            Some(id) => IdentityQuery::ById(id),
            None => IdentityQuery::ByName(self.name.join(" ")),
        }
    }

    pub fn terms(&self) -> Vec<String> {
        self.search.as_deref().map(parse_terms).unwrap_or_default()
    }
}
