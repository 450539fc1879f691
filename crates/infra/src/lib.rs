//! Infrastructure layer: the concurrent catalog store, formatting, persistence,
//! configuration and the client simulator.

pub mod clock;
pub mod config;
pub mod format;
pub mod persistence;
pub mod reports;
pub mod simulator;
pub mod store;


pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CatalogConfig, ConfigError, LogFormat};
pub use format::{FormatterRegistry, ItemFormatter, LocaleFormatter, LocaleProfile};
pub use persistence::{
    CatalogRepository, FileCatalogRepository, PersistenceError, ReportSink, seed_store,
};
pub use reports::CatalogReports;
pub use simulator::{ReviewSimulator, SimulationError, SimulationOutcome, SimulatorConfig};
pub use store::{CatalogStore, InMemoryCatalogStore};
