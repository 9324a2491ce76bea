use std::path::PathBuf;

use clap::Parser;
use typed_builder::TypedBuilder;

/// Knobs for one scan run.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ScanSettings {
    #[builder(default = "us".to_string(), setter(into))]
    pub country: String,
    #[builder(default = "en".to_string(), setter(into))]
    pub lang: String,
    #[builder(default = 300)]
    pub reviews_per_app: u32,
    /// Zero disables search, leaving only seed packages.
    #[builder(default = 30)]
    pub hits_per_query: usize,
    #[builder(default = 20)]
    pub max_apps: usize,
    #[builder(default = 100_000)]
    pub min_installs: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "market-scan",
    about = "Generate a market intelligence report for blocker and safe-browser competitors"
)]
pub struct Cli {
    /// Play Store country code
    #[arg(long, default_value = "us")]
    pub country: String,

    /// Play Store language code
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Newest reviews sampled per selected app
    #[arg(long, default_value_t = 300)]
    pub reviews_per_app: u32,

    /// Search hits taken per discovery query (0 = seed packages only)
    #[arg(long, default_value_t = 30)]
    pub hits_per_query: usize,

    /// Maximum number of apps selected for review sampling
    #[arg(long, default_value_t = 20)]
    pub apps: usize,

    /// Minimum install count for selection
    #[arg(long, default_value_t = 100_000)]
    pub min_installs: u64,

    /// Output directory
    #[arg(long, default_value = "artifacts/market")]
    pub out_dir: PathBuf,
}

impl Cli {
    pub fn settings(&self) -> ScanSettings {
        ScanSettings::builder()
            .country(self.country.as_str())
            .lang(self.lang.as_str())
            .reviews_per_app(self.reviews_per_app)
            .hits_per_query(self.hits_per_query)
            .max_apps(self.apps)
            .min_installs(self.min_installs)
            .build()
    }
}
