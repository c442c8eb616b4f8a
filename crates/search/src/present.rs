//! Identity disambiguation and result selection.
//!
//! Prompts go through the [`Selector`] port so the flow can run against a
//! terminal or a script.

use std::cell::RefCell;
use std::collections::VecDeque;

use tracing::info;

use tmdbtrack_core::error::RunError;
use tmdbtrack_core::types::{MediaIdentity, NormalizedResult, SiteOutcome, SiteOutcomes};

use crate::table::{Justify, Table, format_size, or_na};

/// An indexed menu shown before a selection prompt.
#[derive(Debug, Clone)]
pub struct Menu {
    pub table: Table,
    pub prompt: String,
}

impl Menu {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

pub trait Selector {
    /// Zero-based index of the chosen row, or `None` for "none of these".
    fn select(&self, menu: &Menu) -> std::io::Result<Option<usize>>;
}

/// Replays pre-recorded answers; records every menu it was shown.
#[derive(Debug, Default)]
pub struct ScriptedSelector {
    answers: RefCell<VecDeque<Option<usize>>>,
    shown: RefCell<Vec<Menu>>,
}

impl ScriptedSelector {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            shown: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts_shown(&self) -> usize {
        self.shown.borrow().len()
    }

    pub fn menus(&self) -> Vec<Menu> {
        self.shown.borrow().clone()
    }
}

impl Selector for ScriptedSelector {
    fn select(&self, menu: &Menu) -> std::io::Result<Option<usize>> {
        self.shown.borrow_mut().push(menu.clone());
        self.answers.borrow_mut().pop_front().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no scripted answer left")
        })
    }
}

/// Success results per site plus the sites that had nothing or failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultGroups {
    pub matched: Vec<(String, Vec<NormalizedResult>)>,
    pub missing: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl ResultGroups {
    /// Partition outcomes, keeping dispatch order inside each bucket.
    pub fn from_outcomes(outcomes: &SiteOutcomes) -> Self {
        let mut groups = Self::default();
        for (site_key, outcome) in outcomes.iter() {
            match outcome {
                SiteOutcome::Success(results) => {
                    groups.matched.push((site_key.to_string(), results.clone()))
                }
                SiteOutcome::EmptyMissingType => groups.missing.push(site_key.to_string()),
                SiteOutcome::Failure(reason) => {
                    groups.failed.push((site_key.to_string(), reason.clone()))
                }
            }
        }
        groups
    }

    pub fn result_count(&self) -> usize {
        self.matched.iter().map(|(_, r)| r.len()).sum()
    }

    /// All results, ordered by site then by each site's own order.
    pub fn flattened(&self) -> impl Iterator<Item = &NormalizedResult> {
        self.matched.iter().flat_map(|(_, results)| results.iter())
    }
}

pub struct Presenter<'a> {
    selector: &'a dyn Selector,
}

impl<'a> Presenter<'a> {
    pub fn new(selector: &'a dyn Selector) -> Self {
        Self { selector }
    }

    /// Pick one identity: no prompt for a single candidate, `NotFound` for none.
    pub fn present_identities(
        &self,
        query: &str,
        candidates: &[MediaIdentity],
    ) -> Result<MediaIdentity, RunError> {
        match candidates {
            [] => Err(RunError::NotFound(format!("'{query}'"))),
            [only] => {
                info!(tmdb_id = only.provider_id, title = %only.title, "automatically selected");
                Ok(only.clone())
            }
            _ => {
                let mut table = Table::new("Search Results")
                    .column("Index", Justify::Center)
                    .column("Title", Justify::Left)
                    .column("Release Year", Justify::Center)
                    .column("Kind", Justify::Center);
                for (i, c) in candidates.iter().enumerate() {
                    table.row([
                        (i + 1).to_string(),
                        c.title.clone(),
                        or_na(c.year),
                        c.kind.label().to_string(),
                    ]);
                }
                let menu = Menu {
                    table,
                    prompt: "Enter the index of the correct result, or type 'none' if none are correct"
                        .to_string(),
                };

                match self.ask(&menu)? {
                    Some(i) => {
                        let chosen = candidates[i].clone();
                        info!(tmdb_id = chosen.provider_id, title = %chosen.title, "user selected identity");
                        Ok(chosen)
                    }
                    None => {
                        info!("user declined every candidate");
                        Err(RunError::NoSelection)
                    }
                }
            }
        }
    }

    /// Pick one search result across all sites. `None` when there are no
    /// results or the user declines.
    pub fn present_results(
        &self,
        groups: &ResultGroups,
    ) -> Result<Option<NormalizedResult>, RunError> {
        let all: Vec<&NormalizedResult> = groups.flattened().collect();
        match all.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some((*only).clone())),
            _ => {
                let mut table = Table::new("Select a Release")
                    .column("Index", Justify::Center)
                    .column("Site", Justify::Center)
                    .column("Name", Justify::Left)
                    .column("Size", Justify::Center);
                for (i, r) in all.iter().enumerate() {
                    table.row([
                        (i + 1).to_string(),
                        r.source_site.clone(),
                        r.name.clone(),
                        format_size(r.size_bytes),
                    ]);
                }
                let menu = Menu {
                    table,
                    prompt: "Enter the index of a release, or type 'none' to finish".to_string(),
                };
                Ok(self.ask(&menu)?.map(|i| all[i].clone()))
            }
        }
    }

    fn ask(&self, menu: &Menu) -> Result<Option<usize>, RunError> {
        let choice = self
            .selector
            .select(menu)
            .map_err(|e| RunError::InvalidInput(format!("selection prompt failed: {e}")))?;
        match choice {
            Some(i) if i >= menu.len() => Err(RunError::InvalidInput(format!(
                "choice {} is out of range",
                i + 1
            ))),
            other => Ok(other),
        }
    }
}
