use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing::info;

use tmdbtrack_cli::args::Cli;
use tmdbtrack_cli::config::{AppConfig, EnvFileStatus, ensure_env_file};
use tmdbtrack_cli::logging;
use tmdbtrack_cli::pipeline::{Pipeline, RunRequest};
use tmdbtrack_cli::selector::TerminalSelector;
use tmdbtrack_core::error::RunError;
use tmdbtrack_metadata::resolver::IdentityResolver;
use tmdbtrack_metadata::tmdb::TmdbClient;
use tmdbtrack_search::backend::HttpBackend;
use tmdbtrack_search::dispatch::Dispatcher;
use tmdbtrack_search::dump::JsonDump;
use tmdbtrack_search::registry::SiteRegistry;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Some(path) = logging::init(cli.debug, cli.logging, &cli.output_dir)? {
        info!(path = %path.display(), "logging to file");
    }

    let status =
        ensure_env_file(&cli.config, cli.overwrite).context("failed to prepare env file")?;
    if let EnvFileStatus::Created(path) = status {
        println!(
            "{} {}. Fill in TMDB_API_KEY and at least one tracker API key, then run again.",
            style("Wrote default configuration to").green(),
            path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => return Ok(fatal(&RunError::from(e))),
    };

    let registry = SiteRegistry::new(config.sites);
    info!(
        enabled = registry.list_enabled().len(),
        disabled = registry.list_disabled().len(),
        "sites loaded"
    );

    let provider = TmdbClient::new(config.tmdb.api_key, &config.tmdb.url)
        .context("failed to build TMDb client")?;
    let resolver = IdentityResolver::new(Arc::new(provider));

    let backend = HttpBackend::new().context("failed to build HTTP client")?;
    let mut dispatcher = Dispatcher::new(backend);
    if cli.json {
        dispatcher = dispatcher.with_json_dump(JsonDump::new(&cli.output_dir));
    }

    let selector = TerminalSelector::default();
    let pipeline = Pipeline::new(resolver, dispatcher, registry, &selector);
    let request = RunRequest {
        query: cli.identity_query(),
        kind: cli.kind(),
        terms: cli.terms(),
    };

    let mut stdout = std::io::stdout();
    match pipeline.run(&request, &mut stdout).await {
        Ok(summary) => {
            println!(
                "\n{} {} site(s) queried, {} with results, {} failed.",
                style("Done.").green().bold(),
                summary.sites_queried,
                summary.sites_succeeded,
                summary.sites_failed
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(RunError::NoSelection) => {
            println!("Please check the spelling of the title and try again.");
            println!("If you know the TMDb ID, search with --id <ID> instead.");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(fatal(&e)),
    }
}

fn fatal(e: &RunError) -> ExitCode {
    eprintln!("{} {e}", style("Error:").red().bold());
    ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
}
