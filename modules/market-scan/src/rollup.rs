use std::collections::BTreeMap;

use crate::reviews::round1;
use crate::types::{AppRecord, Category, CategoryRollup, Signal};

/// Running weighted sums for one category.
#[derive(Default)]
struct Accumulator {
    apps: u32,
    reviews: u32,
    low_star: f64,
    high_star: f64,
    signals: BTreeMap<Signal, f64>,
}

/// Review-count-weighted signal averages per category.
///
/// Apps with no sampled reviews carry zero weight and are left out entirely,
/// as are categories with no sampled apps. Rollups are ordered by total
/// review count, descending; ties keep category order.
pub fn category_rollup(apps: &[AppRecord]) -> Vec<CategoryRollup> {
    let mut acc: BTreeMap<Category, Accumulator> = BTreeMap::new();

    for app in apps {
        let summary = match &app.review_signals {
            Some(s) if s.total_reviews > 0 => s,
            _ => continue,
        };
        let weight = f64::from(summary.total_reviews);
        let entry = acc.entry(app.category).or_default();
        entry.apps += 1;
        entry.reviews += summary.total_reviews;
        entry.low_star += summary.low_star_pct * weight;
        entry.high_star += summary.high_star_pct * weight;
        for signal in Signal::ALL {
            *entry.signals.entry(signal).or_insert(0.0) += summary.pct(signal) * weight;
        }
    }

    let mut rollups: Vec<CategoryRollup> = acc
        .into_iter()
        .map(|(category, a)| {
            let total = f64::from(a.reviews);
            CategoryRollup {
                category,
                app_count: a.apps,
                total_reviews: a.reviews,
                low_star_pct: round1(a.low_star / total),
                high_star_pct: round1(a.high_star / total),
                signal_pct: a
                    .signals
                    .into_iter()
                    .map(|(s, sum)| (s, round1(sum / total)))
                    .collect(),
            }
        })
        .collect();

    rollups.sort_by(|a, b| b.total_reviews.cmp(&a.total_reviews));
    rollups
}

/// Weighted average of one signal across the given categories' rollups.
/// Zero when none of them has samples.
pub fn weighted_signal(rollups: &[CategoryRollup], categories: &[Category], signal: Signal) -> f64 {
    let (sum, weight) = rollups
        .iter()
        .filter(|r| categories.contains(&r.category))
        .fold((0.0, 0u32), |(sum, weight), r| {
            (sum + r.pct(signal) * f64::from(r.total_reviews), weight + r.total_reviews)
        });
    if weight == 0 {
        return 0.0;
    }
    round1(sum / f64::from(weight))
}
