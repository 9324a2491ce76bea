pub mod catalog;
pub mod classifier;
pub mod config;
pub mod discovery;
pub mod metadata;
pub mod probe;
pub mod report;
pub mod reviews;
pub mod rollup;
pub mod scan;
pub mod selector;
pub mod tasks;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod types;

pub use config::{Cli, ScanSettings};
pub use report::{write_reports, ScanReport};
pub use scan::{MarketScan, ScanOutcome, ScanStats};
