use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::{quota_for, CATEGORY_QUOTAS, MIN_RELEVANCE};
use crate::classifier::is_relevant_row;
use crate::types::{AppRecord, Category};

/// Whether a record may be selected at all.
pub fn is_eligible(record: &AppRecord, min_installs: u64) -> bool {
    record.is_ok()
        && record.installs_count >= min_installs
        && record.relevance >= MIN_RELEVANCE
        && record.category.is_tracked()
        && is_relevant_row(record)
}

/// Descending by installs, then score, then rating count.
fn popularity_order(a: &AppRecord, b: &AppRecord) -> Ordering {
    b.installs_count
        .cmp(&a.installs_count)
        .then_with(|| {
            let sa = a.score.unwrap_or(0.0);
            let sb = b.score.unwrap_or(0.0);
            sb.partial_cmp(&sa).unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.ratings.unwrap_or(0).cmp(&a.ratings.unwrap_or(0)))
}

/// Pick the apps to review-sample.
///
/// Eligible rows are stably sorted by popularity. Each tracked category first
/// gets up to its quota (in priority order), then remaining slots up to
/// `max_apps` go to leftovers in sort order while the category stays under
/// its cap.
pub fn select_apps(records: &[AppRecord], min_installs: u64, max_apps: usize) -> Vec<AppRecord> {
    let mut eligible: Vec<&AppRecord> = records
        .iter()
        .filter(|r| is_eligible(r, min_installs))
        .collect();
    eligible.sort_by(|a, b| popularity_order(a, b));

    let mut taken = vec![false; eligible.len()];
    let mut per_category: HashMap<Category, usize> = HashMap::new();
    let mut selected: Vec<AppRecord> = Vec::new();

    for quota in &CATEGORY_QUOTAS {
        for (idx, record) in eligible.iter().enumerate() {
            if selected.len() >= max_apps {
                break;
            }
            let count = per_category.entry(quota.category).or_insert(0);
            if *count >= quota.quota {
                break;
            }
            if record.category == quota.category {
                *count += 1;
                taken[idx] = true;
                selected.push((*record).clone());
            }
        }
    }

    for (idx, record) in eligible.iter().enumerate() {
        if selected.len() >= max_apps {
            break;
        }
        if taken[idx] {
            continue;
        }
        let cap = quota_for(record.category).map(|q| q.cap).unwrap_or(0);
        let count = per_category.entry(record.category).or_insert(0);
        if *count < cap {
            *count += 1;
            taken[idx] = true;
            selected.push((*record).clone());
        }
    }

    selected
}
