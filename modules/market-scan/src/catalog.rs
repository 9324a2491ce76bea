// Static scan configuration: vendor URLs, discovery queries, seed packages,
// keyword tables and selection/task constants. Immutable for the life of
// the process.

use crate::types::{Category, Segment, Signal};

/// Desktop Chrome user-agent sent with reachability probes.
pub const PROBE_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

pub const PROBE_TIMEOUT_SECS: u64 = 15;

/// Analytics vendor pages checked for reachability on every run.
pub const SOURCE_URLS: &[(&str, &str)] = &[
    ("Sensor Tower Blog", "https://sensortower.com/blog"),
    (
        "Sensor Tower Q2 2025 Digital Market Index",
        "https://sensortower.com/blog/q2-2025-digital-market-index",
    ),
    (
        "Sensor Tower State of Mobile 2026",
        "https://sensortower.com/report/state-of-mobile-2026",
    ),
    ("AppMagic", "https://appmagic.rocks"),
    ("data.ai", "https://www.data.ai"),
];

/// Known competitors, inserted before discovery so they survive search drift.
pub const SEED_PACKAGE_IDS: &[&str] = &[
    "cz.mobilesoft.appblock",
    "co.blocksite",
    "com.burockgames.timeclocker",
    "com.teqtic.lockmeout",
    "cc.forestapp",
    "io.funswitch.blocker",
    "com.gamban.beanstalkhps.gambanapp",
    "com.brave.browser",
    "com.duckduckgo.mobile.android",
];

/// Discovery queries per segment.
pub fn segment_queries(segment: Segment) -> &'static [&'static str] {
    match segment {
        Segment::PornBlocker => &[
            "porn blocker",
            "block adult content",
            "porn addiction recovery",
            "nofap",
        ],
        Segment::GamblingBlocker => &[
            "gambling blocker",
            "block gambling sites",
            "gambling addiction help",
        ],
        Segment::FocusBlocker => &[
            "app blocker",
            "website blocker",
            "focus app blocker",
            "screen time limit",
        ],
        Segment::SafeBrowser => &["safe browser", "family safe browser", "kids safe browser"],
    }
}

// ---------------------------------------------------------------------------
// Classification keywords
// ---------------------------------------------------------------------------

pub const PORN_KEYWORDS: &[&str] = &["porn", "adult content", "nsfw", "nofap", "explicit"];

pub const GAMBLING_KEYWORDS: &[&str] = &["gambling", "gamble", "betting", "bet blocker"];

pub const FOCUS_KEYWORDS: &[&str] = &[
    "app blocker",
    "site blocker",
    "website blocker",
    "focus",
    "screen time",
    "distraction",
    "productivity",
    "block apps",
];

pub const SAFE_BROWSER_KEYWORDS: &[&str] = &[
    "safe browser",
    "safe search",
    "safesearch",
    "family-safe",
    "family safe",
    "kids browser",
    "filtered browser",
];

/// Keyword set for a tracked category. `Other` has none.
pub fn category_keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::PornBlocker => PORN_KEYWORDS,
        Category::GamblingBlocker => GAMBLING_KEYWORDS,
        Category::FocusBlocker => FOCUS_KEYWORDS,
        Category::SafeBrowser => SAFE_BROWSER_KEYWORDS,
        Category::Other => &[],
    }
}

/// Words that signal the app exists to stop a behaviour, not enable it.
pub const STRICT_INTENT_KEYWORDS: &[&str] = &[
    "block",
    "blocker",
    "filter",
    "recovery",
    "quit",
    "addiction",
    "accountability",
    "self-exclusion",
    "nofap",
];

/// Looser intent words accepted for focus tools.
pub const PROTECTION_INTENT_KEYWORDS: &[&str] = &[
    "block",
    "blocker",
    "limit",
    "lock",
    "restrict",
    "self-control",
    "focus mode",
];

/// Marks a gambling operator rather than a gambling blocker.
pub const GAMBLING_OPERATOR_KEYWORDS: &[&str] = &[
    "casino",
    "sportsbook",
    "slots",
    "poker",
    "jackpot",
    "free spins",
    "bet now",
    "odds",
];

/// Lets an app with operator vocabulary through when it is clearly about quitting.
pub const GAMBLING_PROTECTION_KEYWORDS: &[&str] = &[
    "gambling blocker",
    "block gambling",
    "self-exclusion",
    "gambling addiction",
    "quit gambling",
    "stop gambling",
];

/// Characters of the description considered by the classifier.
pub const DESCRIPTION_CHARS: usize = 2000;

/// Minimum relevance score for selection.
pub const MIN_RELEVANCE: i32 = 2;

// ---------------------------------------------------------------------------
// Selection quotas
// ---------------------------------------------------------------------------

/// Guaranteed slots and hard cap per tracked category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryQuota {
    pub category: Category,
    pub quota: usize,
    pub cap: usize,
}

/// Quotas in fill order.
pub const CATEGORY_QUOTAS: [CategoryQuota; 4] = [
    CategoryQuota {
        category: Category::PornBlocker,
        quota: 5,
        cap: 8,
    },
    CategoryQuota {
        category: Category::GamblingBlocker,
        quota: 5,
        cap: 8,
    },
    CategoryQuota {
        category: Category::FocusBlocker,
        quota: 6,
        cap: 10,
    },
    CategoryQuota {
        category: Category::SafeBrowser,
        quota: 3,
        cap: 5,
    },
];

pub fn quota_for(category: Category) -> Option<&'static CategoryQuota> {
    CATEGORY_QUOTAS.iter().find(|q| q.category == category)
}

// ---------------------------------------------------------------------------
// Review signals
// ---------------------------------------------------------------------------

pub fn signal_keywords(signal: Signal) -> &'static [&'static str] {
    match signal {
        Signal::Paywall => &[
            "paywall",
            "premium",
            "subscription",
            "subscribe",
            "too expensive",
            "paid",
        ],
        Signal::Bugs => &[
            "bug",
            "crash",
            "freeze",
            "not working",
            "broken",
            "doesn't work",
            "doesnt work",
        ],
        Signal::Bypass => &[
            "bypass",
            "uninstall",
            "disable",
            "force stop",
            "circumvent",
            "workaround",
        ],
        Signal::Effective => &[
            "works great",
            "helped",
            "effective",
            "focus",
            "productive",
            "clean",
        ],
        Signal::UiConfusion => &[
            "confusing",
            "complicated",
            "hard to use",
            "can't find",
            "cant find",
            "unclear",
            "confusing setup",
            "setup is hard",
            "hard to set up",
        ],
        // Leading space keeps "downloads" and "loads" out.
        Signal::Ads => &[" ads", "advert", "pop-up", "popup"],
        Signal::Privacy => &["privacy", "data collection", "tracking", "spyware", "sell data"],
        Signal::Permissions => &[
            "permission",
            "accessibility",
            "device admin",
            "vpn",
            "battery optimization",
        ],
    }
}

/// Review scores at or below this count as low-star.
pub const LOW_STAR_MAX: u8 = 2;
/// Review scores at or above this count as high-star.
pub const HIGH_STAR_MIN: u8 = 4;

// ---------------------------------------------------------------------------
// Task thresholds (percent of sampled reviews)
// ---------------------------------------------------------------------------

pub const BYPASS_TASK_THRESHOLD: f64 = 6.0;
pub const BUGS_TASK_THRESHOLD: f64 = 6.0;
pub const PAYWALL_TASK_THRESHOLD: f64 = 8.0;
pub const UI_CONFUSION_TASK_THRESHOLD: f64 = 4.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_segment_has_queries() {
        for segment in Segment::ALL {
            assert!(!segment_queries(segment).is_empty(), "{segment} has no queries");
        }
    }

    #[test]
    fn quotas_follow_tracked_priority_order() {
        let order: Vec<_> = CATEGORY_QUOTAS.iter().map(|q| q.category).collect();
        assert_eq!(order, Category::TRACKED.to_vec());
        assert!(CATEGORY_QUOTAS.iter().all(|q| q.cap >= q.quota));
    }

    #[test]
    fn keywords_are_lowercase() {
        let tables = Signal::ALL
            .iter()
            .map(|s| signal_keywords(*s))
            .chain(Category::TRACKED.iter().map(|c| category_keywords(*c)))
            .chain([STRICT_INTENT_KEYWORDS, PROTECTION_INTENT_KEYWORDS]);
        for table in tables {
            for kw in table {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }
}
