//! Concurrent client simulator.
//!
//! Drives one shared store from a fixed pool of worker threads. Each worker
//! repeatedly reviews a random item and then renders that item's report.

use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use prodmgr_catalog::{Rateable, Rating, aggregate_rating};
use prodmgr_core::{CatalogError, ItemId};

use crate::reports::CatalogReports;
use crate::store::{CatalogStore, all_items, by_id};

/// Simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Review + report iterations per worker.
    pub reviews_per_worker: usize,
    /// Worker `i` seeds its RNG with `seed + i`.
    pub seed: u64,
    /// Thread name prefix.
    pub name: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            reviews_per_worker: 5,
            seed: 42,
            name: "review-worker".to_string(),
        }
    }
}

impl SimulatorConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_reviews_per_worker(mut self, reviews: usize) -> Self {
        self.reviews_per_worker = reviews;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("no item ids to review")]
    NoItems,

    #[error("failed to spawn worker {worker}: {reason}")]
    Spawn { worker: usize, reason: String },

    #[error("worker {worker}: {source}")]
    Catalog {
        worker: usize,
        #[source]
        source: CatalogError,
    },

    #[error("verification read failed: {0}")]
    Verify(#[source] CatalogError),

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("item {id}: rating {published} does not match its {reviews} reviews (expected {expected})")]
    Inconsistent {
        id: ItemId,
        published: u8,
        expected: u8,
        reviews: usize,
    },
}

/// What one worker did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerLog {
    pub worker: usize,
    /// Successful submissions, in the order this worker made them.
    pub submitted: Vec<(ItemId, Rating)>,
    /// Concatenated reports rendered after each submission.
    pub output: String,
}

#[derive(Debug, Clone, Default)]
pub struct SimulationOutcome {
    pub logs: Vec<WorkerLog>,
    pub errors: Vec<SimulationError>,
}

impl SimulationOutcome {
    /// Total successful submissions across workers.
    pub fn submitted(&self) -> usize {
        self.logs.iter().map(|l| l.submitted.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct ReviewSimulator<'a, S> {
    reports: &'a CatalogReports<S>,
    config: SimulatorConfig,
}

impl<'a, S> ReviewSimulator<'a, S>
where
    S: CatalogStore,
{
    pub fn new(reports: &'a CatalogReports<S>, config: SimulatorConfig) -> Self {
        Self { reports, config }
    }

    /// Run every worker to completion against `ids` and collect their logs and
    /// errors. A failing worker does not stop the others.
    pub fn run(&self, ids: &[ItemId]) -> SimulationOutcome {
        let mut outcome = SimulationOutcome::default();
        if ids.is_empty() {
            outcome.errors.push(SimulationError::NoItems);
            return outcome;
        }

        info!(
            workers = self.config.workers,
            reviews_per_worker = self.config.reviews_per_worker,
            items = ids.len(),
            "simulation started"
        );

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.config.workers);
            for worker in 0..self.config.workers {
                let spawned = thread::Builder::new()
                    .name(format!("{}-{worker}", self.config.name))
                    .spawn_scoped(scope, move || self.work(worker, ids));
                match spawned {
                    Ok(handle) => handles.push((worker, handle)),
                    Err(e) => outcome.errors.push(SimulationError::Spawn {
                        worker,
                        reason: e.to_string(),
                    }),
                }
            }

            for (worker, handle) in handles {
                match handle.join() {
                    Ok((log, errors)) => {
                        outcome.logs.push(log);
                        outcome.errors.extend(errors);
                    }
                    Err(_) => {
                        warn!(worker, "worker panicked");
                        outcome.errors.push(SimulationError::WorkerPanicked { worker });
                    }
                }
            }
        });

        info!(
            submitted = outcome.submitted(),
            errors = outcome.errors.len(),
            "simulation finished"
        );
        outcome
    }

    fn work(&self, worker: usize, ids: &[ItemId]) -> (WorkerLog, Vec<SimulationError>) {
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(worker as u64));
        let mut log = WorkerLog {
            worker,
            ..WorkerLog::default()
        };
        let mut errors = Vec::new();
        let store = self.reports.store();

        for _ in 0..self.config.reviews_per_worker {
            let id = ids[rng.gen_range(0..ids.len())];
            let stars: u8 = rng.gen_range(1..=5);
            let result = Rating::try_from(stars)
                .and_then(|rating| {
                    store
                        .submit_review(id, rating, &format!("worker {worker} says {stars}"))
                        .map(|_| rating)
                })
                .and_then(|rating| {
                    log.submitted.push((id, rating));
                    self.reports.report_for(id)
                });

            match result {
                Ok(report) => log.output.push_str(&report),
                Err(source) => {
                    debug!(worker, item_id = %id, error = %source, "worker step failed");
                    errors.push(SimulationError::Catalog { worker, source });
                }
            }
        }
        (log, errors)
    }
}

/// Check every item's published rating against its stored reviews.
pub fn verify<S>(store: &S) -> Result<usize, SimulationError>
where
    S: CatalogStore + ?Sized,
{
    let mut reviews_seen = 0;
    for item in store.snapshot(&all_items, &by_id) {
        let id = item.item_id();
        let (current, reviews) = store
            .find_with_reviews(id)
            .map_err(SimulationError::Verify)?;
        let expected = aggregate_rating(&reviews);
        if current.rating() != expected {
            return Err(SimulationError::Inconsistent {
                id,
                published: current.rating().value(),
                expected: expected.value(),
                reviews: reviews.len(),
            });
        }
        reviews_seen += reviews.len();
    }
    Ok(reviews_seen)
}
