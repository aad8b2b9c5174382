use crate::models::{
    ComputedStory, CycleReport, EstimateGroup, InflatedGroup, InflatedStory, ReportOptions,
    StatusShare,
};

/// A story is inflated when its tracked duration exceeds the expected
/// duration `estimate * multiplier` (strictly). With an estimate of 0 the
/// expected duration is 0, so any positive duration qualifies; that is the
/// literal rule and it is kept as-is.
pub fn is_inflated(estimate: f64, total_days: u32, multiplier: f64) -> bool {
    f64::from(total_days) > estimate * multiplier
}

fn percent_over_expected(estimate: f64, total_days: u32, multiplier: f64) -> i64 {
    let expected = estimate * multiplier;
    if expected == 0.0 {
        return 0;
    }
    ((f64::from(total_days) - expected) / expected * 100.0).round() as i64
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Groups computed stories by estimate and derives the per-group summary
/// statistics plus, on request, the inflated-items report.
pub fn aggregate(stories: &[ComputedStory], options: &ReportOptions) -> CycleReport {
    let without_estimate = stories.iter().filter(|s| s.estimate.is_none()).count();

    let estimated: Vec<&ComputedStory> =
        stories.iter().filter(|s| s.estimate.is_some()).collect();

    let inflated: Vec<&ComputedStory> = estimated
        .iter()
        .copied()
        .filter(|s| {
            is_inflated(
                s.estimate.unwrap_or_default(),
                s.result.total_days,
                options.inflation_multiplier,
            )
        })
        .collect();

    let main_set: Vec<&ComputedStory> = if options.exclude_inflated {
        estimated
            .iter()
            .copied()
            .filter(|s| !inflated.iter().any(|i| i.key == s.key))
            .collect()
    } else {
        estimated
    };

    let groups = group_by_estimate(&main_set)
        .into_iter()
        .map(|(estimate, members)| summarize_group(estimate, &members, options))
        .collect();

    let inflated_report = options.include_inflated_report.then(|| {
        group_by_estimate(&inflated)
            .into_iter()
            .map(|(estimate, mut members)| {
                members.sort_by(|a, b| b.result.total_days.cmp(&a.result.total_days));
                InflatedGroup {
                    estimate,
                    stories: members
                        .into_iter()
                        .map(|s| InflatedStory {
                            key: s.key.clone(),
                            summary: s.summary.clone(),
                            estimate,
                            total_days: s.result.total_days,
                            percent_over: percent_over_expected(
                                estimate,
                                s.result.total_days,
                                options.inflation_multiplier,
                            ),
                        })
                        .collect(),
                }
            })
            .collect()
    });

    CycleReport {
        groups,
        without_estimate,
        inflated: inflated_report,
    }
}

/// Buckets by exact estimate value, ascending. Values come from a single
/// source field, so bitwise f64 equality is the grouping key.
fn group_by_estimate<'a>(stories: &[&'a ComputedStory]) -> Vec<(f64, Vec<&'a ComputedStory>)> {
    let mut buckets: Vec<(f64, Vec<&ComputedStory>)> = Vec::new();

    for story in stories {
        let estimate = story.estimate.unwrap_or_default();
        match buckets.iter_mut().find(|(e, _)| *e == estimate) {
            Some((_, members)) => members.push(*story),
            None => buckets.push((estimate, vec![*story])),
        }
    }

    buckets.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    buckets
}

fn summarize_group(
    estimate: f64,
    members: &[&ComputedStory],
    options: &ReportOptions,
) -> EstimateGroup {
    let mut durations: Vec<u32> = members.iter().map(|s| s.result.total_days).collect();
    durations.sort_unstable();

    let count = durations.len();
    let sum: u32 = durations.iter().sum();
    let mean_days = round1(f64::from(sum) / count as f64);
    // Lower-middle pick for even-sized groups, matching the reference
    // behavior rather than an interpolated median.
    let median_days = durations[count / 2];
    let min_days = durations[0];
    let max_days = durations[count - 1];

    let group_total: u32 = members
        .iter()
        .map(|s| s.result.per_status.values().sum::<u32>())
        .sum();

    let status_share = if group_total == 0 {
        Vec::new()
    } else {
        options
            .tracked_statuses
            .iter()
            .filter_map(|status| {
                let status_sum: u32 = members
                    .iter()
                    .filter_map(|s| s.result.per_status.get(status))
                    .sum();
                (status_sum > 0).then(|| StatusShare {
                    status: status.clone(),
                    percent: round1(f64::from(status_sum) / f64::from(group_total) * 100.0),
                })
            })
            .collect()
    };

    EstimateGroup {
        estimate,
        count,
        mean_days,
        median_days,
        min_days,
        max_days,
        status_share,
    }
}
