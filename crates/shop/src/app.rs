//! Runtime wiring for the shop binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use prodmgr_catalog::{Item, Rateable};
use prodmgr_infra::simulator::verify;
use prodmgr_infra::store::{all_items, by_id};
use prodmgr_infra::{
    CatalogConfig, CatalogReports, CatalogRepository, CatalogStore, Clock, FileCatalogRepository,
    FormatterRegistry, InMemoryCatalogStore, ReviewSimulator, SimulatorConfig, seed_store,
};
use rust_decimal::Decimal;

use crate::scenario;

/// What a run did, for the final log line and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub seeded: usize,
    pub created: usize,
    pub reports_written: usize,
    pub listing: String,
    pub discounts: Vec<(String, String)>,
    pub simulated_reviews: usize,
    pub simulation_errors: usize,
    pub total_reviews: usize,
}

/// Price above which items make the filtered listing.
fn listing_threshold() -> Decimal {
    Decimal::new(2, 0)
}

/// Rating descending, then price ascending.
fn by_rating_then_price(a: &Item, b: &Item) -> std::cmp::Ordering {
    b.rating()
        .cmp(&a.rating())
        .then_with(|| a.price().cmp(&b.price()))
}

/// Seed, run the walkthrough, write reports, simulate concurrent reviewers and
/// persist the result.
pub fn run(config: &CatalogConfig, clock: Arc<dyn Clock>) -> anyhow::Result<RunSummary> {
    let registry = FormatterRegistry::builtin();
    let repository = FileCatalogRepository::new(&config.data_folder, &config.report_folder);
    let store = Arc::new(InMemoryCatalogStore::new());

    let seeded = seed_store(&store, &repository).context("failed to seed catalog")?;
    let created = scenario::populate(&store, clock.today()).context("walkthrough failed")?;

    let reports = CatalogReports::new(store.clone(), registry.resolve(&config.locale), clock);
    info!(locale = reports.locale(), items = store.len(), "catalog ready");

    let ids: Vec<_> = store
        .snapshot(&all_items, &by_id)
        .iter()
        .map(Item::item_id)
        .collect();
    let reports_written = ids
        .iter()
        .filter(|id| reports.print_report(**id, &repository))
        .count();

    let listing = reports.render_list(|item| item.price() > listing_threshold(), by_rating_then_price);
    let discounts: Vec<(String, String)> = reports.discounts_by_label().into_iter().collect();

    let simulator = ReviewSimulator::new(
        &reports,
        SimulatorConfig::default()
            .with_workers(config.workers)
            .with_reviews_per_worker(config.reviews_per_worker)
            .with_seed(config.seed),
    );
    let outcome = simulator.run(&ids);
    for error in &outcome.errors {
        warn!(error = %error, "simulation error");
    }

    let total_reviews = verify(&store).context("catalog inconsistent after simulation")?;

    for id in &ids {
        let (item, reviews) = store.find_with_reviews(*id)?;
        repository
            .save(&item, &reviews)
            .with_context(|| format!("failed to persist item {id}"))?;
    }

    Ok(RunSummary {
        seeded: seeded.loaded,
        created,
        reports_written,
        listing,
        discounts,
        simulated_reviews: outcome.submitted(),
        simulation_errors: outcome.errors.len(),
        total_reviews,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use prodmgr_infra::{FixedClock, LogFormat};

    fn config(dir: &tempfile::TempDir) -> CatalogConfig {
        CatalogConfig {
            locale: "en-US".to_string(),
            data_folder: dir.path().join("data"),
            report_folder: dir.path().join("reports"),
            workers: 3,
            reviews_per_worker: 4,
            seed: 1,
            log_format: LogFormat::Pretty,
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()))
    }

    #[test]
    fn first_run_builds_and_persists_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&config(&dir), clock()).unwrap();

        assert_eq!(summary.seeded, 0);
        assert_eq!(summary.created, 4);
        assert_eq!(summary.reports_written, 4);
        assert_eq!(summary.simulated_reviews, 12);
        assert_eq!(summary.simulation_errors, 0);
        assert_eq!(summary.total_reviews, 12 + 12);
        assert_eq!(
            summary.listing.lines().next(),
            Some("Cake, Price: $5.99, Rating: ★★★★★, Best Before: 3/15/24")
        );
        assert!(summary.discounts.contains(&("★★★★★".to_string(), "$0.60".to_string())));

        assert!(dir.path().join("data/product103.json").exists());
        assert!(dir.path().join("reports/product104.txt").exists());
    }

    #[test]
    fn second_run_seeds_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let first = run(&config(&dir), clock()).unwrap();
        let second = run(&config(&dir), clock()).unwrap();

        assert_eq!(second.seeded, 4);
        assert_eq!(second.created, 0);
        assert_eq!(second.total_reviews, first.total_reviews + 12);
    }
}
