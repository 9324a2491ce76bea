use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Segments and categories
// ---------------------------------------------------------------------------

/// A topical search bucket driving discovery queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    PornBlocker,
    GamblingBlocker,
    FocusBlocker,
    SafeBrowser,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::PornBlocker,
        Segment::GamblingBlocker,
        Segment::FocusBlocker,
        Segment::SafeBrowser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::PornBlocker => "porn_blocker",
            Segment::GamblingBlocker => "gambling_blocker",
            Segment::FocusBlocker => "focus_blocker",
            Segment::SafeBrowser => "safe_browser",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary market category of an app. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PornBlocker,
    GamblingBlocker,
    FocusBlocker,
    SafeBrowser,
    Other,
}

impl Category {
    /// Categories that take part in selection, in quota-filling priority order.
    pub const TRACKED: [Category; 4] = [
        Category::PornBlocker,
        Category::GamblingBlocker,
        Category::FocusBlocker,
        Category::SafeBrowser,
    ];

    /// Categories aggregated into the blocker-wide task metrics.
    pub const BLOCKERS: [Category; 3] = [
        Category::PornBlocker,
        Category::GamblingBlocker,
        Category::FocusBlocker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PornBlocker => "porn_blocker",
            Category::GamblingBlocker => "gambling_blocker",
            Category::FocusBlocker => "focus_blocker",
            Category::SafeBrowser => "safe_browser",
            Category::Other => "other",
        }
    }

    pub fn is_tracked(&self) -> bool {
        !matches!(self, Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Segment> for Category {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::PornBlocker => Category::PornBlocker,
            Segment::GamblingBlocker => Category::GamblingBlocker,
            Segment::FocusBlocker => Category::FocusBlocker,
            Segment::SafeBrowser => Category::SafeBrowser,
        }
    }
}

// ---------------------------------------------------------------------------
// Review signals
// ---------------------------------------------------------------------------

/// A keyword-membership indicator extracted from review text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Paywall,
    Bugs,
    Bypass,
    Effective,
    UiConfusion,
    Ads,
    Privacy,
    Permissions,
}

impl Signal {
    pub const ALL: [Signal; 8] = [
        Signal::Paywall,
        Signal::Bugs,
        Signal::Bypass,
        Signal::Effective,
        Signal::UiConfusion,
        Signal::Ads,
        Signal::Privacy,
        Signal::Permissions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Signal::Paywall => "Paywall",
            Signal::Bugs => "Bugs",
            Signal::Bypass => "Bypass",
            Signal::Effective => "Effective",
            Signal::UiConfusion => "UI confusion",
            Signal::Ads => "Ads",
            Signal::Privacy => "Privacy",
            Signal::Permissions => "Permissions",
        }
    }
}

/// Per-app summary of the sampled reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSignalSummary {
    pub total_reviews: u32,
    pub low_star_pct: f64,
    pub high_star_pct: f64,
    pub signal_pct: BTreeMap<Signal, f64>,
}

impl ReviewSignalSummary {
    pub fn pct(&self, signal: Signal) -> f64 {
        self.signal_pct.get(&signal).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Candidates and app records
// ---------------------------------------------------------------------------

/// An app sighted during discovery, not yet fetched or classified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub app_id: String,
    pub segments: BTreeSet<Segment>,
    pub seed: bool,
    pub installs_hint: Option<u64>,
    pub title_hint: Option<String>,
    pub score_hint: Option<f64>,
}

impl Candidate {
    pub fn seed(app_id: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            seed: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Ok,
    Error,
}

/// Why a store call failed, recorded on the row it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    /// `not_found`, `network`, `rate_limited`, `parse` or `api`.
    pub kind: String,
    pub message: String,
}

impl From<&play_store_client::PlayStoreError> for FetchError {
    fn from(err: &play_store_client::PlayStoreError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A candidate enriched with store metadata, classification and, once
/// selected, review statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppRecord {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchError>,
    pub title: String,
    pub developer: Option<String>,
    pub installs: String,
    pub installs_count: u64,
    pub score: Option<f64>,
    pub ratings: Option<u64>,
    pub reviews_total: Option<u64>,
    pub genre: Option<String>,
    pub summary: String,
    pub description: String,
    pub category: Category,
    pub relevance: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_signals: Option<ReviewSignalSummary>,
}

impl AppRecord {
    pub fn app_id(&self) -> &str {
        &self.candidate.app_id
    }

    pub fn is_ok(&self) -> bool {
        self.status == RowStatus::Ok
    }

    /// Sampled review count, zero when reviews were never collected.
    pub fn review_sample_size(&self) -> u32 {
        self.review_signals
            .as_ref()
            .map(|s| s.total_reviews)
            .unwrap_or(0)
    }

    /// Row for a candidate whose metadata fetch failed.
    pub fn failed(candidate: Candidate, error: FetchError) -> Self {
        let title = candidate
            .title_hint
            .clone()
            .unwrap_or_else(|| candidate.app_id.clone());
        Self {
            candidate,
            status: RowStatus::Error,
            error: Some(error),
            title,
            developer: None,
            installs: "n/a".to_string(),
            installs_count: 0,
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
}

// ---------------------------------------------------------------------------
// Reachability, rollups and tasks
// ---------------------------------------------------------------------------

/// Result of probing one analytics vendor URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub name: String,
    pub url: String,
    pub status: u16,
    pub reachable: bool,
    pub data_accessible: bool,
    pub final_url: String,
    pub error: String,
}

/// Review-weighted signal aggregate for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRollup {
    pub category: Category,
    pub app_count: u32,
    pub total_reviews: u32,
    pub low_star_pct: f64,
    pub high_star_pct: f64,
    pub signal_pct: BTreeMap<Signal, f64>,
}

impl CategoryRollup {
    pub fn pct(&self, signal: Signal) -> f64 {
        self.signal_pct.get(&signal).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
        };
        f.write_str(s)
    }
}

/// A backlog item derived from rollup thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub priority: Priority,
    pub title: String,
    pub rationale: String,
    pub success_metric: String,
}
