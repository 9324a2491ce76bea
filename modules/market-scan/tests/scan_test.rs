//! End-to-end scans against the in-memory store and prober.

use market_scan::report::{REPORT_JSON, REPORT_MD, TASKS_MD};
use market_scan::testing::{details, review, MockProber, MockStore};
use market_scan::traits::ProbeFailure;
use market_scan::types::{Category, Segment, Signal};
use market_scan::{write_reports, MarketScan, ScanReport, ScanSettings};
use play_store_client::SearchHit;

const SEED: &str = "io.funswitch.blocker";

fn porn_blocker_store() -> MockStore {
    let mut d = details(SEED, "Porn Blocker Pro", "100,000+");
    d.score = Some(4.2);
    d.description = Some("Block adult sites and stay on track with recovery tools.".to_string());
    MockStore::new().on_app(d).on_reviews(
        SEED,
        vec![
            review(1, "Stopped working after the update, keeps crashing"),
            review(2, "Premium subscription required for everything"),
            review(5, "It works, blocks everything I need"),
            review(4, "Solid app"),
        ],
    )
}

fn prober() -> MockProber {
    MockProber::new()
        .on_get("https://sensortower.com/blog", 200, "https://sensortower.com/blog")
        .on_get("https://appmagic.rocks", 200, "https://appmagic.rocks/login")
        .on_failure("https://www.data.ai", ProbeFailure::Timeout)
}

#[tokio::test]
async fn seed_only_scan_selects_and_samples_seed() {
    let store = porn_blocker_store();
    let prober = prober();
    let settings = ScanSettings::builder().hits_per_query(0).reviews_per_app(50).build();

    let outcome = MarketScan::new(&store, &prober, settings).run().await;
    let report = outcome.report;

    assert!(report.play_error.is_empty());
    assert_eq!(report.candidate_count, market_scan::catalog::SEED_PACKAGE_IDS.len());
    assert_eq!(report.sources.len(), 5);
    assert_eq!(outcome.stats.sources_accessible, 1);
    assert_eq!(outcome.stats.queries_run, 0);

    assert_eq!(report.selected_apps.len(), 1);
    let app = &report.selected_apps[0];
    assert_eq!(app.app_id(), SEED);
    assert!(app.candidate.seed);
    assert_eq!(app.category, Category::PornBlocker);
    assert_eq!(app.installs_count, 100_000);

    let signals = app.review_signals.as_ref().unwrap();
    assert_eq!(signals.total_reviews, 4);
    assert_eq!(signals.low_star_pct, 50.0);
    assert_eq!(signals.pct(Signal::Bugs), 25.0);
    assert_eq!(store.review_requests(SEED), vec![50]);

    assert_eq!(report.category_rollups.len(), 1);
    assert_eq!(report.category_rollups[0].category, Category::PornBlocker);
    assert_eq!(report.uiux_tasks[0].title, "Show protection state on the first screen");
    assert_eq!(outcome.stats.tasks as usize, report.uiux_tasks.len());
}

#[tokio::test]
async fn search_hits_add_segments_to_candidates() {
    let mut hit_details = details("com.example.focus", "Focus Lock", "1,000,000+");
    hit_details.description = Some("Block apps and limit screen time".to_string());
    let store = porn_blocker_store().on_app(hit_details).on_search(
        "app blocker",
        vec![SearchHit {
            app_id: "com.example.focus".to_string(),
            title: Some("Focus Lock".to_string()),
            ..SearchHit::default()
        }],
    );
    let prober = MockProber::new();
    let settings = ScanSettings::builder().hits_per_query(5).reviews_per_app(0).build();

    let outcome = MarketScan::new(&store, &prober, settings).run().await;
    let report = outcome.report;

    assert!(report.play_error.is_empty());
    assert!(outcome.stats.queries_failed < outcome.stats.queries_run);
    assert_eq!(report.candidate_count, market_scan::catalog::SEED_PACKAGE_IDS.len() + 1);

    let focus = report
        .selected_apps
        .iter()
        .find(|a| a.app_id() == "com.example.focus")
        .expect("focus app selected");
    assert!(!focus.candidate.seed);
    assert!(focus.candidate.segments.contains(&Segment::FocusBlocker));
    assert_eq!(focus.category, Category::FocusBlocker);
    // Focus apps outrank the porn seed on installs but porn fills its quota first.
    assert_eq!(report.selected_apps[0].app_id(), SEED);
    assert!(store.review_requests(SEED).is_empty());
}

#[tokio::test]
async fn unreachable_store_writes_fallback_report() {
    let store = MockStore::new().offline();
    let prober = MockProber::new();
    let settings = ScanSettings::default();

    let outcome = MarketScan::new(&store, &prober, settings).run().await;
    let report = outcome.report;
    assert!(!report.play_error.is_empty());
    assert!(report.selected_apps.is_empty());
    assert!(report.uiux_tasks.is_empty());
    assert_eq!(outcome.stats.queries_failed, outcome.stats.queries_run);

    let dir = tempfile::tempdir().unwrap();
    let written = write_reports(dir.path(), &report).unwrap();
    assert_eq!(written.len(), 2);
    assert!(!dir.path().join(TASKS_MD).exists());

    let md = std::fs::read_to_string(dir.path().join(REPORT_MD)).unwrap();
    assert!(md.contains(&report.play_error));

    let raw = std::fs::read_to_string(dir.path().join(REPORT_JSON)).unwrap();
    let parsed: ScanReport = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.play_error, report.play_error);
}

#[tokio::test]
async fn full_run_writes_all_three_files() {
    let store = porn_blocker_store();
    let prober = prober();
    let settings = ScanSettings::builder().hits_per_query(0).build();

    let outcome = MarketScan::new(&store, &prober, settings).run().await;
    let dir = tempfile::tempdir().unwrap();
    let written = write_reports(dir.path(), &outcome.report).unwrap();

    assert_eq!(written.len(), 3);
    let tasks = std::fs::read_to_string(dir.path().join(TASKS_MD)).unwrap();
    assert!(tasks.contains("Show protection state on the first screen"));
    let md = std::fs::read_to_string(dir.path().join(REPORT_MD)).unwrap();
    assert!(md.contains("Porn Blocker Pro"));
}

#[tokio::test]
async fn failed_metadata_rows_reach_report_files() {
    let store = porn_blocker_store()
        .on_app_error("co.blocksite", play_store_client::PlayStoreError::RateLimited(429));
    let prober = prober();
    let settings = ScanSettings::builder().hits_per_query(0).reviews_per_app(10).build();

    let outcome = MarketScan::new(&store, &prober, settings).run().await;
    let report = &outcome.report;

    let blocksite = report
        .fetch_errors
        .iter()
        .find(|r| r.app_id() == "co.blocksite")
        .expect("rate limited row kept");
    assert!(!blocksite.is_ok());
    assert_eq!(blocksite.error.as_ref().unwrap().kind, "rate_limited");
    // Every other seed is unregistered and comes back not_found.
    assert_eq!(
        report.fetch_errors.len(),
        market_scan::catalog::SEED_PACKAGE_IDS.len() - 1
    );
    assert_eq!(outcome.stats.metadata_failed as usize, report.fetch_errors.len());

    let dir = tempfile::tempdir().unwrap();
    write_reports(dir.path(), report).unwrap();
    let raw = std::fs::read_to_string(dir.path().join(REPORT_JSON)).unwrap();
    assert!(raw.contains("co.blocksite"));
    assert!(raw.contains("rate_limited"));
    let md = std::fs::read_to_string(dir.path().join(REPORT_MD)).unwrap();
    assert!(md.contains("`co.blocksite` | rate_limited |"));
}

#[tokio::test]
async fn review_failure_marks_row_and_skips_rollup() {
    let mut d = details(SEED, "Porn Blocker Pro", "100,000+");
    d.description = Some("Block adult sites and stay on track with recovery tools.".to_string());
    let store = MockStore::new().on_app(d).on_review_error(
        SEED,
        play_store_client::PlayStoreError::Network("connection reset".to_string()),
    );
    let prober = MockProber::new();
    let settings = ScanSettings::builder().hits_per_query(0).reviews_per_app(10).build();

    let outcome = MarketScan::new(&store, &prober, settings).run().await;
    let report = outcome.report;

    assert!(report.play_error.is_empty());
    assert_eq!(report.selected_apps.len(), 1);
    let app = &report.selected_apps[0];
    assert!(!app.is_ok());
    assert_eq!(app.error.as_ref().unwrap().kind, "network");
    assert!(app.review_signals.is_none());
    assert_eq!(app.installs_count, 100_000);
    assert!(report.category_rollups.is_empty());
    assert_eq!(outcome.stats.review_failures, 1);
}
