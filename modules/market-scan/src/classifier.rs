//! Keyword heuristics that place an app in a market category and score how
//! relevant it is to the scan.
//!
//! Rule order in [`infer_primary_category`] is significant: categories are
//! mutually exclusive and the first matching rule wins.

use std::collections::BTreeSet;

use crate::catalog::{
    category_keywords, DESCRIPTION_CHARS, FOCUS_KEYWORDS, GAMBLING_KEYWORDS,
    GAMBLING_OPERATOR_KEYWORDS, GAMBLING_PROTECTION_KEYWORDS, PORN_KEYWORDS,
    PROTECTION_INTENT_KEYWORDS, SAFE_BROWSER_KEYWORDS, STRICT_INTENT_KEYWORDS,
};
use crate::types::{AppRecord, Category, Segment};

fn has_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

/// Lowercased `title summary description` with the description truncated to
/// [`DESCRIPTION_CHARS`] characters.
pub fn classification_text(title: &str, summary: &str, description: &str) -> String {
    let description: String = description.chars().take(DESCRIPTION_CHARS).collect();
    format!("{title} {summary} {description}").to_lowercase()
}

/// Assign the primary category. Pure function of its inputs.
pub fn infer_primary_category(
    title: &str,
    summary: &str,
    description: &str,
    segments: &BTreeSet<Segment>,
) -> Category {
    let title_l = title.to_lowercase();
    let text = classification_text(title, summary, description);
    let strict = has_any(&text, STRICT_INTENT_KEYWORDS);
    let protective = has_any(&text, PROTECTION_INTENT_KEYWORDS);

    if has_any(&title_l, PORN_KEYWORDS) && strict {
        return Category::PornBlocker;
    }
    if has_any(&title_l, GAMBLING_KEYWORDS) && strict {
        return Category::GamblingBlocker;
    }
    if has_any(&text, SAFE_BROWSER_KEYWORDS) {
        return Category::SafeBrowser;
    }
    if has_any(&text, FOCUS_KEYWORDS) && protective {
        return Category::FocusBlocker;
    }

    // Fall back on which searches surfaced the app.
    if segments.contains(&Segment::PornBlocker) && strict {
        return Category::PornBlocker;
    }
    if segments.contains(&Segment::GamblingBlocker) && strict {
        return Category::GamblingBlocker;
    }
    if segments.contains(&Segment::SafeBrowser) && text.contains("browser") {
        return Category::SafeBrowser;
    }
    if segments.contains(&Segment::FocusBlocker) && protective {
        return Category::FocusBlocker;
    }

    Category::Other
}

/// Heuristic inclusion score; selection requires at least `MIN_RELEVANCE`.
pub fn relevance_score(text: &str, segments: &BTreeSet<Segment>) -> i32 {
    let mut score = 0;
    if !segments.is_empty() {
        score += 3;
    }
    score += Category::TRACKED
        .iter()
        .filter(|c| has_any(text, category_keywords(**c)))
        .count() as i32;
    if text.contains("block") {
        score += 2;
    }
    if text.contains("porn") || text.contains("gambling") {
        score += 3;
    }
    score
}

/// Post-filter that drops false positives the category rules let through.
pub fn is_relevant_row(record: &AppRecord) -> bool {
    let title_l = record.title.to_lowercase();
    let text = classification_text(&record.title, &record.summary, &record.description);
    let vpn_only = text.contains("vpn") && !text.contains("block");

    match record.category {
        Category::PornBlocker => {
            has_any(&title_l, PORN_KEYWORDS)
                && has_any(&text, STRICT_INTENT_KEYWORDS)
                && !vpn_only
        }
        Category::GamblingBlocker => {
            let operator = has_any(&text, GAMBLING_OPERATOR_KEYWORDS)
                && !has_any(&text, GAMBLING_PROTECTION_KEYWORDS);
            has_any(&title_l, GAMBLING_KEYWORDS)
                && has_any(&text, STRICT_INTENT_KEYWORDS)
                && !operator
                && !vpn_only
        }
        Category::FocusBlocker | Category::SafeBrowser => true,
        Category::Other => false,
    }
}
