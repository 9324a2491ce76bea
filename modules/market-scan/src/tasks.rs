use crate::catalog::{
    BUGS_TASK_THRESHOLD, BYPASS_TASK_THRESHOLD, PAYWALL_TASK_THRESHOLD,
    UI_CONFUSION_TASK_THRESHOLD,
};
use crate::rollup::weighted_signal;
use crate::types::{Category, CategoryRollup, Priority, Signal, Task};

fn task(priority: Priority, title: &str, rationale: String, success_metric: &str) -> Task {
    Task {
        priority,
        title: title.to_string(),
        rationale,
        success_metric: success_metric.to_string(),
    }
}

/// Derive the UI/UX backlog from blocker-category rollups.
///
/// One baseline task always leads, threshold-gated tasks follow, and two
/// strategic tasks always close the list.
pub fn build_priority_tasks(rollups: &[CategoryRollup]) -> Vec<Task> {
    let blockers = &Category::BLOCKERS;
    let paywall = weighted_signal(rollups, blockers, Signal::Paywall);
    let bugs = weighted_signal(rollups, blockers, Signal::Bugs);
    let bypass = weighted_signal(rollups, blockers, Signal::Bypass);
    let ui_confusion = weighted_signal(rollups, blockers, Signal::UiConfusion);

    let mut tasks = vec![task(
        Priority::P0,
        "Show protection state on the first screen",
        "Competitor onboarding hides whether blocking is active; users must see lock state, \
         default browser state and the next required action without navigating."
            .to_string(),
        "≥80% of new installs reach 'protection active' within the first session",
    )];

    if bypass >= BYPASS_TASK_THRESHOLD {
        tasks.push(task(
            Priority::P0,
            "Harden tamper-resistance UX",
            format!(
                "{bypass:.1}% of blocker reviews describe bypassing protection (uninstall, force stop, disable); \
                 make lock timing and guard status transparent and uninstall friction explicit."
            ),
            "Bypass-related review mentions below 3% within two releases",
        ));
    }
    if bugs >= BUGS_TASK_THRESHOLD {
        tasks.push(task(
            Priority::P1,
            "Surface reliability status in-app",
            format!(
                "{bugs:.1}% of blocker reviews report crashes or blocking that silently stops working; \
                 show a live health indicator and a one-tap self-check."
            ),
            "Crash-free sessions ≥99.5% and bug mentions below 4% of reviews",
        ));
    }
    if paywall >= PAYWALL_TASK_THRESHOLD {
        tasks.push(task(
            Priority::P1,
            "Keep core protection free before upsell",
            format!(
                "{paywall:.1}% of blocker reviews complain about paywalls or subscriptions; \
                 core blocking must work before any upgrade prompt appears."
            ),
            "Paywall complaints below 5% of reviews; trial-to-paid conversion steady",
        ));
    }
    if ui_confusion >= UI_CONFUSION_TASK_THRESHOLD {
        tasks.push(task(
            Priority::P1,
            "Simplify permission setup flow",
            format!(
                "{ui_confusion:.1}% of blocker reviews find setup confusing; \
                 collapse permission grants into a guided checklist with live status."
            ),
            "Setup completion rate ≥70% among users who start onboarding",
        ));
    }

    tasks.push(task(
        Priority::P2,
        "Draft free vs. premium feature packaging",
        "Competitors gate basic blocking behind subscriptions; a clear free tier with premium \
         accountability and scheduling features differentiates on trust."
            .to_string(),
        "Packaging draft reviewed against the top three competitors' tiers",
    ));
    tasks.push(task(
        Priority::P2,
        "Re-run market scan weekly",
        "Review signals shift with competitor releases; a weekly scan keeps the backlog current."
            .to_string(),
        "Weekly report generated with no missing categories",
    ));

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rollup(category: Category, total: u32, pcts: &[(Signal, f64)]) -> CategoryRollup {
        CategoryRollup {
            category,
            app_count: 1,
            total_reviews: total,
            low_star_pct: 0.0,
            high_star_pct: 0.0,
            signal_pct: pcts.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn no_rollups_yield_baseline_and_strategic_only() {
        let tasks = build_priority_tasks(&[]);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].priority, Priority::P0);
        assert_eq!(tasks[1].priority, Priority::P2);
        assert_eq!(tasks[2].priority, Priority::P2);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let rollups = vec![rollup(
            Category::FocusBlocker,
            100,
            &[
                (Signal::Bypass, 6.0),
                (Signal::Bugs, 5.9),
                (Signal::Paywall, 8.0),
                (Signal::UiConfusion, 4.0),
            ],
        )];
        let titles: Vec<_> = build_priority_tasks(&rollups)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Show protection state on the first screen",
                "Harden tamper-resistance UX",
                "Keep core protection free before upsell",
                "Simplify permission setup flow",
                "Draft free vs. premium feature packaging",
                "Re-run market scan weekly",
            ]
        );
    }

    #[test]
    fn safe_browser_does_not_drive_blocker_tasks() {
        let rollups = vec![
            rollup(Category::SafeBrowser, 1000, &[(Signal::Bypass, 50.0)]),
            rollup(Category::PornBlocker, 10, &[(Signal::Bypass, 1.0)]),
        ];
        let tasks = build_priority_tasks(&rollups);
        assert!(tasks.iter().all(|t| t.title != "Harden tamper-resistance UX"));
    }

    #[test]
    fn rationale_percent_has_one_decimal() {
        let rollups = vec![rollup(Category::PornBlocker, 50, &[(Signal::Bypass, 6.0)])];
        let tasks = build_priority_tasks(&rollups);
        let bypass_task = tasks
            .iter()
            .find(|t| t.title == "Harden tamper-resistance UX")
            .unwrap();
        assert!(bypass_task.rationale.starts_with("6.0% of blocker reviews"));
    }

    #[test]
    fn rationale_carries_weighted_metric() {
        let rollups = vec![
            rollup(Category::PornBlocker, 10, &[(Signal::Bugs, 20.0)]),
            rollup(Category::GamblingBlocker, 30, &[(Signal::Bugs, 4.0)]),
        ];
        let tasks = build_priority_tasks(&rollups);
        let bug_task = tasks
            .iter()
            .find(|t| t.title == "Surface reliability status in-app")
            .unwrap();
        assert!(bug_task.rationale.starts_with("8.0% of blocker reviews"));
    }
}
