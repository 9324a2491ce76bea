use std::collections::BTreeMap;

use tracing::{info, warn};

use play_store_client::{PlayStoreError, Review, MAX_REVIEWS_PER_PAGE};

use crate::catalog::{signal_keywords, HIGH_STAR_MIN, LOW_STAR_MAX};
use crate::traits::StoreClient;
use crate::types::{AppRecord, FetchError, ReviewSignalSummary, RowStatus, Signal};

/// Percentage rounded to one decimal. A zero denominator yields 0.0.
pub fn safe_pct(numer: u32, denom: u32) -> f64 {
    if denom == 0 {
        return 0.0;
    }
    round1(f64::from(numer) / f64::from(denom) * 100.0)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Trim, lowercase and collapse whitespace runs to a single space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Page through newest reviews until `target` is reached, a page comes back
/// empty, or the store stops returning a cursor.
pub async fn collect_reviews(
    store: &dyn StoreClient,
    app_id: &str,
    target: u32,
) -> Result<Vec<Review>, PlayStoreError> {
    let mut items: Vec<Review> = Vec::new();
    let mut cursor = None;

    while (items.len() as u32) < target {
        let batch = MAX_REVIEWS_PER_PAGE.min(target - items.len() as u32);
        let page = store.reviews(app_id, batch, cursor.as_ref()).await?;
        if page.reviews.is_empty() {
            break;
        }
        items.extend(page.reviews);
        cursor = page.next;
        if cursor.is_none() {
            break;
        }
    }

    items.truncate(target as usize);
    Ok(items)
}

/// Count star buckets and keyword signals across a review sample.
pub fn analyze_review_signals(reviews: &[Review]) -> ReviewSignalSummary {
    let total = reviews.len() as u32;
    let mut counts: BTreeMap<Signal, u32> = Signal::ALL.iter().map(|s| (*s, 0)).collect();
    let mut low_star = 0;
    let mut high_star = 0;

    for review in reviews {
        // Leading space lets keywords anchor on a word start.
        let text = format!(" {}", normalize_text(&review.content));
        if review.score <= LOW_STAR_MAX {
            low_star += 1;
        }
        if review.score >= HIGH_STAR_MIN {
            high_star += 1;
        }
        for signal in Signal::ALL {
            if signal_keywords(signal).iter().any(|kw| text.contains(kw)) {
                *counts.entry(signal).or_insert(0) += 1;
            }
        }
    }

    ReviewSignalSummary {
        total_reviews: total,
        low_star_pct: safe_pct(low_star, total),
        high_star_pct: safe_pct(high_star, total),
        signal_pct: counts
            .into_iter()
            .map(|(signal, n)| (signal, safe_pct(n, total)))
            .collect(),
    }
}

/// Collect and analyze reviews for each selected app in place. A failed
/// collection marks only that row as errored.
pub async fn enrich_with_reviews(store: &dyn StoreClient, apps: &mut [AppRecord], per_app: u32) {
    for app in apps.iter_mut() {
        let app_id = app.app_id().to_string();
        match collect_reviews(store, &app_id, per_app).await {
            Ok(reviews) => {
                let summary = analyze_review_signals(&reviews);
                info!(
                    app_id = app_id.as_str(),
                    sampled = summary.total_reviews,
                    low_star_pct = summary.low_star_pct,
                    "Analyzed review sample"
                );
                app.review_signals = Some(summary);
            }
            Err(e) => {
                warn!(app_id = app_id.as_str(), kind = e.kind(), error = %e, "Review collection failed");
                app.status = RowStatus::Error;
                app.error = Some(FetchError::from(&e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollup::category_rollup;
    use crate::testing::{classified_record, review, MockStore};
    use crate::types::Category;

    #[test]
    fn empty_sample_has_all_zero_percentages() {
        let summary = analyze_review_signals(&[]);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.low_star_pct, 0.0);
        assert_eq!(summary.high_star_pct, 0.0);
        assert_eq!(summary.signal_pct.len(), Signal::ALL.len());
        assert!(summary.signal_pct.values().all(|v| *v == 0.0));
    }

    #[test]
    fn safe_pct_rounds_to_one_decimal() {
        assert_eq!(safe_pct(1, 3), 33.3);
        assert_eq!(safe_pct(2, 3), 66.7);
        assert_eq!(safe_pct(0, 0), 0.0);
        assert_eq!(safe_pct(5, 0), 0.0);
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  Not\n\tWORKING   at all "), "not working at all");
    }

    #[test]
    fn signals_and_star_buckets_are_counted() {
        let reviews = vec![
            review(1, "Crashes constantly. Not\nworking."),
            review(2, "Had to uninstall to get around the premium paywall"),
            review(5, "Works great, helped me focus"),
            review(3, "ok"),
        ];
        let s = analyze_review_signals(&reviews);
        assert_eq!(s.total_reviews, 4);
        assert_eq!(s.low_star_pct, 50.0);
        assert_eq!(s.high_star_pct, 25.0);
        assert_eq!(s.pct(Signal::Bugs), 25.0);
        assert_eq!(s.pct(Signal::Bypass), 25.0);
        assert_eq!(s.pct(Signal::Paywall), 25.0);
        assert_eq!(s.pct(Signal::Effective), 25.0);
        assert_eq!(s.pct(Signal::Privacy), 0.0);
    }

    #[test]
    fn praise_does_not_count_as_ads_or_confusion() {
        let reviews = vec![review(5, "Easy setup, downloads fine and loads fast. Love it")];
        let s = analyze_review_signals(&reviews);
        assert_eq!(s.pct(Signal::Ads), 0.0);
        assert_eq!(s.pct(Signal::UiConfusion), 0.0);
    }

    #[test]
    fn ads_and_confusing_setup_still_match() {
        let reviews = vec![
            review(1, "Ads everywhere and the setup is hard"),
            review(2, "Way too many ads, reads my data"),
        ];
        let s = analyze_review_signals(&reviews);
        assert_eq!(s.pct(Signal::Ads), 100.0);
        assert_eq!(s.pct(Signal::UiConfusion), 50.0);
    }

    #[tokio::test]
    async fn review_failure_marks_only_that_row() {
        let store = MockStore::new()
            .with_review_pool("ok.app", 5)
            .on_review_error("bad.app", PlayStoreError::RateLimited(429));
        let mut apps = vec![
            classified_record("ok.app", Category::FocusBlocker, 100_000),
            classified_record("bad.app", Category::FocusBlocker, 100_000),
        ];

        enrich_with_reviews(&store, &mut apps, 5).await;

        assert!(apps[0].is_ok());
        assert_eq!(apps[0].review_sample_size(), 5);
        assert_eq!(apps[1].status, RowStatus::Error);
        assert_eq!(apps[1].error.as_ref().unwrap().kind, "rate_limited");
        assert!(apps[1].review_signals.is_none());

        let rollups = category_rollup(&apps);
        assert_eq!(rollups.len(), 1);
        assert_eq!(rollups[0].app_count, 1);
        assert_eq!(rollups[0].total_reviews, 5);
    }

    #[tokio::test]
    async fn pagination_requests_min_of_200_and_remaining() {
        let store = MockStore::new().with_review_pool("big.app", 450);
        let reviews = collect_reviews(&store, "big.app", 450).await.unwrap();
        assert_eq!(reviews.len(), 450);
        assert_eq!(store.review_requests("big.app"), vec![200, 200, 50]);
    }

    #[tokio::test]
    async fn pagination_stops_when_pool_runs_dry() {
        let store = MockStore::new().with_review_pool("small.app", 30);
        let reviews = collect_reviews(&store, "small.app", 300).await.unwrap();
        assert_eq!(reviews.len(), 30);
        assert_eq!(store.review_requests("small.app"), vec![200]);
    }

    #[tokio::test]
    async fn zero_target_makes_no_requests() {
        let store = MockStore::new().with_review_pool("a", 10);
        let reviews = collect_reviews(&store, "a", 0).await.unwrap();
        assert!(reviews.is_empty());
        assert!(store.review_requests("a").is_empty());
    }
}
