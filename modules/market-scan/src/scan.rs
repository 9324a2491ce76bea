use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::catalog::{SEED_PACKAGE_IDS, SOURCE_URLS};
use crate::config::ScanSettings;
use crate::discovery::{discover_candidates, DiscoveryStats};
use crate::metadata::fetch_records;
use crate::probe::probe_sources;
use crate::report::ScanReport;
use crate::reviews::enrich_with_reviews;
use crate::rollup::category_rollup;
use crate::selector::select_apps;
use crate::tasks::build_priority_tasks;
use crate::traits::{StoreClient, UrlProber};
use crate::types::AppRecord;

/// Stats from a scan run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub sources_probed: u32,
    pub sources_accessible: u32,
    pub queries_run: u32,
    pub queries_failed: u32,
    pub candidates: u32,
    pub metadata_fetched: u32,
    pub metadata_failed: u32,
    pub selected: u32,
    pub reviews_sampled: u32,
    pub review_failures: u32,
    pub tasks: u32,
}

impl std::fmt::Display for ScanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Market Scan Complete ===")?;
        writeln!(
            f,
            "Sources accessible: {}/{}",
            self.sources_accessible, self.sources_probed
        )?;
        writeln!(
            f,
            "Search queries:     {} ({} failed)",
            self.queries_run, self.queries_failed
        )?;
        writeln!(f, "Candidates:         {}", self.candidates)?;
        writeln!(f, "Metadata fetched:   {}", self.metadata_fetched)?;
        writeln!(f, "Metadata failed:    {}", self.metadata_failed)?;
        writeln!(f, "Apps selected:      {}", self.selected)?;
        writeln!(f, "Reviews sampled:    {}", self.reviews_sampled)?;
        if self.review_failures > 0 {
            writeln!(f, "Review failures:    {}", self.review_failures)?;
        }
        writeln!(f, "UI/UX tasks:        {}", self.tasks)?;
        Ok(())
    }
}

/// Everything a run produced: the report payload and its counters.
#[derive(Debug)]
pub struct ScanOutcome {
    pub report: ScanReport,
    pub stats: ScanStats,
}

/// True when nothing came back from the store and every failure was a
/// network error, meaning the store itself was unreachable.
fn store_unreachable(records: &[AppRecord], discovery: &DiscoveryStats) -> bool {
    let searches_dead = discovery.queries_failed == discovery.queries_run;
    let fetches_dead = !records.is_empty()
        && records.iter().all(|r| {
            r.error
                .as_ref()
                .map(|e| e.kind == "network")
                .unwrap_or(false)
        });
    searches_dead && fetches_dead
}

pub struct MarketScan<'a> {
    store: &'a dyn StoreClient,
    prober: &'a dyn UrlProber,
    settings: ScanSettings,
}

impl<'a> MarketScan<'a> {
    pub fn new(store: &'a dyn StoreClient, prober: &'a dyn UrlProber, settings: ScanSettings) -> Self {
        Self {
            store,
            prober,
            settings,
        }
    }

    /// Run every stage in order. Individual network failures are recorded on
    /// rows; the run itself does not fail.
    pub async fn run(&self) -> ScanOutcome {
        let s = &self.settings;
        let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        let mut stats = ScanStats::default();

        info!(country = s.country.as_str(), lang = s.lang.as_str(), "Market scan starting");

        // 1. Reachability
        let sources = probe_sources(self.prober, SOURCE_URLS).await;
        stats.sources_probed = sources.len() as u32;
        stats.sources_accessible = sources.iter().filter(|r| r.data_accessible).count() as u32;

        // 2. Discovery
        let (candidates, discovery) =
            discover_candidates(self.store, SEED_PACKAGE_IDS, s.hits_per_query).await;
        stats.queries_run = discovery.queries_run;
        stats.queries_failed = discovery.queries_failed;
        stats.candidates = candidates.len() as u32;
        let candidate_count = candidates.len();

        // 3. Metadata
        let records = fetch_records(self.store, candidates).await;
        stats.metadata_fetched = records.iter().filter(|r| r.is_ok()).count() as u32;
        stats.metadata_failed = records.len() as u32 - stats.metadata_fetched;

        let mut report = ScanReport {
            generated_at,
            country: s.country.clone(),
            lang: s.lang.clone(),
            reviews_per_app: s.reviews_per_app,
            hits_per_query: s.hits_per_query,
            min_installs: s.min_installs,
            max_apps: s.max_apps,
            sources,
            play_error: String::new(),
            candidate_count,
            fetch_errors: records.iter().filter(|r| !r.is_ok()).cloned().collect(),
            selected_apps: Vec::new(),
            category_rollups: Vec::new(),
            uiux_tasks: Vec::new(),
        };

        if store_unreachable(&records, &discovery) {
            let detail = records
                .iter()
                .find_map(|r| r.error.as_ref())
                .map(|e| e.message.clone())
                .unwrap_or_default();
            warn!(error = detail.as_str(), "Play store unreachable, writing fallback report");
            report.play_error = format!("play store unreachable: {detail}");
            info!("{stats}");
            return ScanOutcome { report, stats };
        }

        // 4. Selection
        let mut selected = select_apps(&records, s.min_installs, s.max_apps);
        stats.selected = selected.len() as u32;
        info!(selected = selected.len(), eligible_from = records.len(), "Selection complete");

        // 5. Reviews
        enrich_with_reviews(self.store, &mut selected, s.reviews_per_app).await;
        stats.reviews_sampled = selected.iter().map(AppRecord::review_sample_size).sum();
        stats.review_failures = selected.iter().filter(|a| !a.is_ok()).count() as u32;

        // 6. Aggregation
        let rollups = category_rollup(&selected);
        let tasks = build_priority_tasks(&rollups);
        stats.tasks = tasks.len() as u32;

        report.selected_apps = selected;
        report.category_rollups = rollups;
        report.uiux_tasks = tasks;

        info!("{stats}");
        ScanOutcome { report, stats }
    }
}
