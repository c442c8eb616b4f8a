//! One run: resolve the identity, dispatch to every enabled site, then
//! report and offer a release to pick.

use std::io::Write;

use console::style;
use tracing::{error, info};

use tmdbtrack_core::error::RunError;
use tmdbtrack_core::types::{MediaIdentity, MediaKind, NormalizedResult, SearchQuery};
use tmdbtrack_metadata::MediaDetails;
use tmdbtrack_metadata::resolver::{IdentityQuery, IdentityResolver, Resolution};
use tmdbtrack_search::backend::SiteBackend;
use tmdbtrack_search::dispatch::Dispatcher;
use tmdbtrack_search::present::{Presenter, ResultGroups, Selector};
use tmdbtrack_search::registry::SiteRegistry;
use tmdbtrack_search::report::OutcomeReporter;
use tmdbtrack_search::table::{Justify, Table, or_na};

use crate::state::{RunState, RunTracker};

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub query: IdentityQuery,
    pub kind: MediaKind,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub identity: MediaIdentity,
    pub sites_queried: usize,
    pub sites_succeeded: usize,
    pub sites_failed: usize,
    pub results: usize,
    pub selected: Option<NormalizedResult>,
    pub states: Vec<RunState>,
}

pub struct Pipeline<'a, B> {
    resolver: IdentityResolver,
    dispatcher: Dispatcher<B>,
    registry: SiteRegistry,
    selector: &'a dyn Selector,
}

impl<'a, B: SiteBackend> Pipeline<'a, B> {
    pub fn new(
        resolver: IdentityResolver,
        dispatcher: Dispatcher<B>,
        registry: SiteRegistry,
        selector: &'a dyn Selector,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            registry,
            selector,
        }
    }

    pub async fn run(
        &self,
        request: &RunRequest,
        out: &mut dyn Write,
    ) -> Result<RunSummary, RunError> {
        let mut tracker = RunTracker::default();
        match self.run_tracked(request, out, &mut tracker).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                tracker.advance(RunState::Aborted(e.code()));
                match &e {
                    RunError::NoSelection => {
                        info!(state = %tracker.current(), "run ended without a selection")
                    }
                    other => error!(state = %tracker.current(), error = %other, "run aborted"),
                }
                Err(e)
            }
        }
    }

    async fn run_tracked(
        &self,
        request: &RunRequest,
        out: &mut dyn Write,
        tracker: &mut RunTracker,
    ) -> Result<RunSummary, RunError> {
        let presenter = Presenter::new(self.selector);

        tracker.advance(RunState::ResolvingIdentity);
        let details = match self.resolver.resolve(&request.query, request.kind).await? {
            Resolution::Resolved(details) => details,
            Resolution::Ambiguous(set) => {
                tracker.advance(RunState::Disambiguating);
                out.flush()?;
                let chosen = presenter.present_identities(&set.query, &set.candidates)?;
                self.resolver.details_for(&chosen).await?
            }
        };
        out.write_all(details_table(&details).render().as_bytes())?;

        tracker.advance(RunState::Dispatching);
        let query = SearchQuery::new(details.identity.clone(), request.terms.clone());
        let sites = self.registry.list_enabled();
        out.write_all(banner(&query, sites.len()).as_bytes())?;
        let outcomes = self.dispatcher.dispatch(&query, &sites).await;

        tracker.advance(RunState::Normalizing);
        let groups = ResultGroups::from_outcomes(&outcomes);

        tracker.advance(RunState::Presenting);
        let reporter = OutcomeReporter::new(&self.registry);
        out.write_all(reporter.render(&groups, &query).as_bytes())?;

        tracker.advance(RunState::Reporting);
        out.flush()?;
        let selected = presenter.present_results(&groups)?;
        if let Some(result) = &selected {
            writeln!(
                out,
                "\n{} {} ({})",
                style("Selected:").green().bold(),
                result.name,
                self.registry.label(&result.source_site)
            )?;
        }

        tracker.advance(RunState::Done);
        let summary = RunSummary {
            identity: details.identity,
            sites_queried: outcomes.len(),
            sites_succeeded: outcomes.success_count(),
            sites_failed: groups.failed.len(),
            results: groups.result_count(),
            selected,
            states: tracker.history().to_vec(),
        };
        info!(
            tmdb_id = summary.identity.provider_id,
            sites = summary.sites_queried,
            succeeded = summary.sites_succeeded,
            failed = summary.sites_failed,
            results = summary.results,
            "run complete"
        );
        Ok(summary)
    }
}

fn details_table(details: &MediaDetails) -> Table {
    let genres = if details.genres.is_empty() {
        "N/A".to_string()
    } else {
        details.genres.join(", ")
    };
    let mut table = Table::new(format!("{} Details", details.identity.kind.label()))
        .column("Title", Justify::Left)
        .column("Release Year", Justify::Center)
        .column("Genres", Justify::Left)
        .column("Runtime", Justify::Center)
        .column("Overview", Justify::Left);
    table.row([
        details.identity.title.clone(),
        or_na(details.identity.year),
        genres,
        details.formatted_runtime(),
        or_na(details.overview.as_deref()),
    ]);
    table
}

fn banner(query: &SearchQuery, site_count: usize) -> String {
    let mut line = format!(
        "\nSearching {site_count} site(s) for {} (TMDb {})",
        query.identity.display_title(),
        query.identity.provider_id
    );
    if query.has_term_filters() {
        line.push_str(&format!(" matching '{}'", query.term_label()));
    }
    format!("{}\n", style(line).cyan())
}
