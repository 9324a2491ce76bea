// Test mocks for the scan pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockStore (StoreClient): HashMap-based app/search/review responses
// - MockProber (UrlProber): HashMap-based URL to probe outcome
//
// Plus builders for AppDetails, AppRecord, Review and summaries.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use play_store_client::{
    AppDetails, ContinuationToken, PlayStoreError, Review, ReviewPage, SearchHit,
};

use crate::traits::{ProbeFailure, ProbeResponse, StoreClient, UrlProber};
use crate::types::{AppRecord, Candidate, Category, ReviewSignalSummary, RowStatus, Signal};

fn replay_error(err: &PlayStoreError) -> PlayStoreError {
    match err {
        PlayStoreError::NotFound(id) => PlayStoreError::NotFound(id.clone()),
        PlayStoreError::RateLimited(status) => PlayStoreError::RateLimited(*status),
        PlayStoreError::Network(m) => PlayStoreError::Network(m.clone()),
        PlayStoreError::Api { status, message } => PlayStoreError::Api {
            status: *status,
            message: message.clone(),
        },
        PlayStoreError::Parse(m) => PlayStoreError::Parse(m.clone()),
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// In-memory store. Unregistered apps are `NotFound`, unregistered searches
/// and review pools are API errors. `offline()` turns every call into a
/// network error.
pub struct MockStore {
    apps: HashMap<String, AppDetails>,
    app_errors: HashMap<String, PlayStoreError>,
    searches: HashMap<String, Vec<SearchHit>>,
    review_pools: HashMap<String, Vec<Review>>,
    review_errors: HashMap<String, PlayStoreError>,
    offline: bool,
    review_requests: Mutex<HashMap<String, Vec<u32>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            apps: HashMap::new(),
            app_errors: HashMap::new(),
            searches: HashMap::new(),
            review_pools: HashMap::new(),
            review_errors: HashMap::new(),
            offline: false,
            review_requests: Mutex::new(HashMap::new()),
        }
    }

    pub fn on_app(mut self, details: AppDetails) -> Self {
        self.apps.insert(details.app_id.clone(), details);
        self
    }

    pub fn on_app_error(mut self, app_id: &str, err: PlayStoreError) -> Self {
        self.app_errors.insert(app_id.to_string(), err);
        self
    }

    pub fn on_search(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.searches.insert(query.to_string(), hits);
        self
    }

    pub fn on_reviews(mut self, app_id: &str, reviews: Vec<Review>) -> Self {
        self.review_pools.insert(app_id.to_string(), reviews);
        self
    }

    /// Register `size` neutral 3-star reviews for `app_id`.
    pub fn with_review_pool(self, app_id: &str, size: usize) -> Self {
        let pool = (0..size).map(|i| review(3, &format!("review {i}"))).collect();
        self.on_reviews(app_id, pool)
    }

    pub fn on_review_error(mut self, app_id: &str, err: PlayStoreError) -> Self {
        self.review_errors.insert(app_id.to_string(), err);
        self
    }

    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Page sizes requested for `app_id`, in call order.
    pub fn review_requests(&self, app_id: &str) -> Vec<u32> {
        self.review_requests
            .lock()
            .unwrap()
            .get(app_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreClient for MockStore {
    async fn app(&self, app_id: &str) -> Result<AppDetails, PlayStoreError> {
        if self.offline {
            return Err(PlayStoreError::Network("MockStore: offline".to_string()));
        }
        if let Some(err) = self.app_errors.get(app_id) {
            return Err(replay_error(err));
        }
        self.apps
            .get(app_id)
            .cloned()
            .ok_or_else(|| PlayStoreError::NotFound(app_id.to_string()))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, PlayStoreError> {
        if self.offline {
            return Err(PlayStoreError::Network("MockStore: offline".to_string()));
        }
        self.searches
            .get(query)
            .map(|hits| hits.iter().take(limit).cloned().collect())
            .ok_or_else(|| PlayStoreError::Api {
                status: 500,
                message: format!("MockStore: no search registered for {query}"),
            })
    }

    async fn reviews(
        &self,
        app_id: &str,
        count: u32,
        cursor: Option<&ContinuationToken>,
    ) -> Result<ReviewPage, PlayStoreError> {
        self.review_requests
            .lock()
            .unwrap()
            .entry(app_id.to_string())
            .or_default()
            .push(count);

        if self.offline {
            return Err(PlayStoreError::Network("MockStore: offline".to_string()));
        }
        if let Some(err) = self.review_errors.get(app_id) {
            return Err(replay_error(err));
        }
        let pool = self.review_pools.get(app_id).ok_or_else(|| PlayStoreError::Api {
            status: 500,
            message: format!("MockStore: no reviews registered for {app_id}"),
        })?;

        let offset: usize = cursor.and_then(|c| c.0.parse().ok()).unwrap_or(0);
        let end = (offset + count as usize).min(pool.len());
        let reviews = pool.get(offset..end).map(<[Review]>::to_vec).unwrap_or_default();
        let next = (end < pool.len()).then(|| ContinuationToken(end.to_string()));
        Ok(ReviewPage { reviews, next })
    }
}

// ---------------------------------------------------------------------------
// MockProber
// ---------------------------------------------------------------------------

/// HashMap-based prober. Unregistered URLs fail with `ProbeFailure::Other`.
pub struct MockProber {
    outcomes: HashMap<String, Result<ProbeResponse, ProbeFailure>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
        }
    }

    pub fn on_get(mut self, url: &str, status: u16, final_url: &str) -> Self {
        self.outcomes.insert(
            url.to_string(),
            Ok(ProbeResponse {
                status,
                final_url: final_url.to_string(),
            }),
        );
        self
    }

    pub fn on_failure(mut self, url: &str, failure: ProbeFailure) -> Self {
        self.outcomes.insert(url.to_string(), Err(failure));
        self
    }
}

impl Default for MockProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlProber for MockProber {
    async fn get(&self, url: &str) -> Result<ProbeResponse, ProbeFailure> {
        self.outcomes
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(ProbeFailure::Other("unregistered".to_string())))
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Minimal details page with a title and install bucket.
pub fn details(app_id: &str, title: &str, installs: &str) -> AppDetails {
    AppDetails {
        app_id: app_id.to_string(),
        title: title.to_string(),
        installs: Some(installs.to_string()),
        ..AppDetails::default()
    }
}

/// Unclassified ok row (`Category::Other`, relevance 0).
pub fn app_record(app_id: &str, title: &str, installs_count: u64) -> AppRecord {
    AppRecord {
        candidate: Candidate::seed(app_id),
        status: RowStatus::Ok,
        error: None,
        title: title.to_string(),
        developer: None,
        installs: format!("{installs_count}+"),
        installs_count,
        score: None,
        ratings: None,
        reviews_total: None,
        genre: None,
        summary: String::new(),
        description: String::new(),
        category: Category::Other,
        relevance: 0,
        review_signals: None,
    }
}

/// Ok row already classified into `category`, with text that passes the
/// relevance post-filter for that category.
pub fn classified_record(app_id: &str, category: Category, installs_count: u64) -> AppRecord {
    let (title, description) = match category {
        Category::PornBlocker => (format!("Porn Blocker {app_id}"), "Block adult sites, recovery tools"),
        Category::GamblingBlocker => (format!("Gambling Blocker {app_id}"), "Block betting sites and quit gambling"),
        Category::FocusBlocker => (format!("Focus Lock {app_id}"), "Block distracting apps"),
        Category::SafeBrowser => (format!("Safe Browser {app_id}"), "SafeSearch enforced browsing"),
        Category::Other => (format!("Other {app_id}"), ""),
    };
    let mut record = app_record(app_id, &title, installs_count);
    record.description = description.to_string();
    record.category = category;
    record.relevance = 5;
    record
}

pub fn review(score: u8, content: &str) -> Review {
    Review {
        review_id: format!("gp:{}", content.len()),
        content: content.to_string(),
        score,
        ..Review::default()
    }
}

/// Summary with `total` reviews and the given signal percentages (others 0).
pub fn summary_with(total: u32, pcts: &[(Signal, f64)]) -> ReviewSignalSummary {
    let mut signal_pct: BTreeMap<Signal, f64> = Signal::ALL.iter().map(|s| (*s, 0.0)).collect();
    for (signal, pct) in pcts {
        signal_pct.insert(*signal, *pct);
    }
    ReviewSignalSummary {
        total_reviews: total,
        low_star_pct: 0.0,
        high_star_pct: 0.0,
        signal_pct,
    }
}
