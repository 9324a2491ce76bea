use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store listing details for a single app, as rendered on its details page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppDetails {
    pub app_id: String,
    pub title: String,
    pub developer: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Display bucket, e.g. "100,000+".
    pub installs: Option<String>,
    pub min_installs: Option<u64>,
    pub real_installs: Option<u64>,
    pub score: Option<f64>,
    pub ratings: Option<u64>,
    pub reviews: Option<u64>,
    pub genre: Option<String>,
}

/// One result row from a store search. Only `app_id` is guaranteed; the
/// other fields are hints when the result page exposes them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    pub app_id: String,
    pub title: Option<String>,
    pub score: Option<f64>,
    pub installs: Option<u64>,
}

/// A single user review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub user_name: Option<String>,
    pub content: String,
    /// Star rating, 1-5. Zero when the store omitted it.
    pub score: u8,
    pub thumbs_up: u64,
    pub at: Option<DateTime<Utc>>,
    pub app_version: Option<String>,
}

/// Opaque pagination cursor returned by the review RPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationToken(pub String);

/// A page of reviews plus the cursor for the next page, if any.
#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub next: Option<ContinuationToken>,
}
