//! Final terminal report: per-site result tables, missing media types,
//! failed sites.

use console::style;

use tmdbtrack_core::types::{NormalizedResult, SearchQuery};

use crate::coverage::{all_categories, missing_categories};
use crate::present::ResultGroups;
use crate::registry::SiteRegistry;
use crate::table::{Justify, Table, format_size, or_na};

pub struct OutcomeReporter<'a> {
    registry: &'a SiteRegistry,
}

impl<'a> OutcomeReporter<'a> {
    pub fn new(registry: &'a SiteRegistry) -> Self {
        Self { registry }
    }

    pub fn render(&self, groups: &ResultGroups, query: &SearchQuery) -> String {
        let mut out = String::new();

        for (site_key, results) in &groups.matched {
            out.push_str(&self.results_table(site_key, results).render());
        }

        if query.has_term_filters() {
            if !groups.missing.is_empty() {
                let sites: Vec<String> =
                    groups.missing.iter().map(|k| self.registry.label(k)).collect();
                out.push_str(&format!(
                    "\n{} {}\n",
                    style(format!("No results matching '{}' on:", query.term_label())).yellow(),
                    sites.join(", ")
                ));
            }
        } else {
            let rows = self.missing_media_types(groups);
            if !rows.is_empty() {
                let mut table = Table::new("Missing Media Types")
                    .alert()
                    .column("Site", Justify::Left)
                    .column("Missing Media Types", Justify::Left);
                for (site_key, categories) in rows {
                    table.row([self.registry.label(&site_key), categories.join(", ")]);
                }
                out.push_str(&table.render());
            }
        }

        if !groups.failed.is_empty() {
            let mut table = Table::new("Failed Sites")
                .alert()
                .column("Site", Justify::Left)
                .column("Reason", Justify::Left);
            for (site_key, reason) in &groups.failed {
                table.row([self.registry.label(site_key), reason.clone()]);
            }
            out.push_str(&table.render());
        }

        if groups.matched.is_empty() {
            out.push_str(&format!("\n{}\n", style("No successful queries.").red().bold()));
        }

        out
    }

    /// Per site, the release categories it lacks. Sites with no results at
    /// all lack every category.
    pub fn missing_media_types(&self, groups: &ResultGroups) -> Vec<(String, Vec<&'static str>)> {
        let mut rows = Vec::new();
        for (site_key, results) in &groups.matched {
            let missing = missing_categories(site_key, results);
            if !missing.is_empty() {
                rows.push((site_key.clone(), missing));
            }
        }
        for site_key in &groups.missing {
            rows.push((site_key.clone(), all_categories()));
        }
        rows
    }

    fn results_table(&self, site_key: &str, results: &[NormalizedResult]) -> Table {
        let mut table = Table::new(format!("{} Results", self.registry.label(site_key)))
            .column("Name", Justify::Left)
            .column("Size", Justify::Center)
            .column("Seeders", Justify::Center)
            .column("Leechers", Justify::Center)
            .column("Freeleech", Justify::Center);
        for r in results {
            table.row([
                r.name.clone(),
                format_size(r.size_bytes),
                or_na(r.seeders),
                or_na(r.leechers),
                or_na(r.freeleech.as_deref()),
            ]);
        }
        table
    }
}
