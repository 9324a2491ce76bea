use tracing::{info, warn};

use play_store_client::{AppDetails, PlayStoreError};

use crate::classifier::{classification_text, infer_primary_category, relevance_score};
use crate::traits::StoreClient;
use crate::types::{AppRecord, Candidate, FetchError, RowStatus};

/// Parse a display install bucket such as "100,000+", "1M+" or "1.5K".
/// Separators and the trailing `+` are dropped; a K/M/B suffix scales the
/// number. Anything unparseable gives 0.
pub fn parse_installs(installs: &str) -> u64 {
    let cleaned: String = installs
        .chars()
        .filter(|c| !matches!(c, ',' | '+' | ' ' | '\u{a0}'))
        .collect();
    let (number, scale) = match cleaned.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('K') => (&cleaned[..cleaned.len() - 1], 1_000.0),
        Some('M') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        Some('B') => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };
    if scale == 1.0 {
        return number.parse().unwrap_or(0);
    }
    number
        .parse::<f64>()
        .map(|n| (n * scale).round() as u64)
        .unwrap_or(0)
}

/// Build a classified record from fetched details.
pub fn build_record(candidate: Candidate, details: AppDetails) -> AppRecord {
    let summary = details.summary.unwrap_or_default();
    let description = details.description.unwrap_or_default();
    let installs = details
        .installs
        .clone()
        .unwrap_or_else(|| "n/a".to_string());
    let installs_count = match parse_installs(&installs) {
        0 => details.min_installs.or(details.real_installs).unwrap_or(0),
        n => n,
    };

    let category = infer_primary_category(
        &details.title,
        &summary,
        &description,
        &candidate.segments,
    );
    let text = classification_text(&details.title, &summary, &description);
    let relevance = relevance_score(&text, &candidate.segments);

    AppRecord {
        candidate,
        status: RowStatus::Ok,
        error: None,
        title: details.title,
        developer: details.developer,
        installs,
        installs_count,
        score: details.score,
        ratings: details.ratings,
        reviews_total: details.reviews,
        genre: details.genre,
        summary,
        description,
        category,
        relevance,
        review_signals: None,
    }
}

/// Fetch metadata for every candidate in order. Failures become error rows.
pub async fn fetch_records(store: &dyn StoreClient, candidates: Vec<Candidate>) -> Vec<AppRecord> {
    let mut records = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let app_id = candidate.app_id.clone();
        match store.app(&app_id).await {
            Ok(details) => {
                let record = build_record(candidate, details);
                info!(
                    app_id = app_id.as_str(),
                    category = %record.category,
                    relevance = record.relevance,
                    installs = record.installs_count,
                    "Fetched app metadata"
                );
                records.push(record);
            }
            Err(e) => {
                log_fetch_error(&app_id, &e);
                records.push(AppRecord::failed(candidate, FetchError::from(&e)));
            }
        }
    }
    records
}

fn log_fetch_error(app_id: &str, err: &PlayStoreError) {
    match err {
        PlayStoreError::NotFound(_) => info!(app_id, "App not listed in this store region"),
        _ => warn!(app_id, kind = err.kind(), error = %err, "App metadata fetch failed"),
    }
}
