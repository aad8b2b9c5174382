use crate::console;
use crate::cycle::aggregate::aggregate;
use crate::cycle::tracker::accumulate_tracked_time;
use crate::cycle::transitions::extract_status_transitions;
use crate::exceptions::StintError;
use crate::models::{ChangeGroup, ComputedStory, CycleReport, ReportOptions, Sprint, Story};
use regex::Regex;
use std::collections::HashSet;
use time::OffsetDateTime;

/// The three collaborator operations the report needs from an issue
/// tracker. Implementations paginate fully; callers see complete lists.
#[allow(async_fn_in_trait)]
pub trait IssueTracker {
    async fn list_sprints_matching(&self, pattern: &Regex) -> Result<Vec<Sprint>, StintError>;
    async fn list_issues_for_sprint(&self, sprint_id: u64) -> Result<Vec<Story>, StintError>;
    async fn fetch_change_history(&self, issue_key: &str) -> Result<Vec<ChangeGroup>, StintError>;
}

/// Scans every sprint matching `pattern`, computes cycle time for each
/// unique story, and aggregates the results.
///
/// Sprint and issue listing failures abort the run. A single story's
/// changelog failure does not: the story counts zero days and the run
/// continues, so one flaky fetch cannot sink the whole report.
pub async fn compute_report<T: IssueTracker>(
    tracker: &T,
    pattern: &Regex,
    options: &ReportOptions,
) -> Result<CycleReport, StintError> {
    let sprints = tracker.list_sprints_matching(pattern).await?;
    let stories = collect_unique_stories(tracker, &sprints).await?;
    let computed = compute_stories(tracker, stories, options).await;
    Ok(aggregate(&computed, options))
}

/// First sighting wins: a story appearing in several scanned sprints is
/// represented exactly once, in sighting order.
async fn collect_unique_stories<T: IssueTracker>(
    tracker: &T,
    sprints: &[Sprint],
) -> Result<Vec<Story>, StintError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut stories = Vec::new();

    for sprint in sprints {
        for story in tracker.list_issues_for_sprint(sprint.id).await? {
            if seen.insert(story.key.clone()) {
                stories.push(story);
            }
        }
    }

    Ok(stories)
}

async fn compute_stories<T: IssueTracker>(
    tracker: &T,
    stories: Vec<Story>,
    options: &ReportOptions,
) -> Vec<ComputedStory> {
    let now = OffsetDateTime::now_utc();
    let mut computed = Vec::with_capacity(stories.len());

    for story in stories {
        let changelog = match tracker.fetch_change_history(&story.key).await {
            Ok(groups) => groups,
            Err(e) => {
                console::warn(&format!(
                    "could not fetch history for {}: {}; counting zero days",
                    story.key, e
                ));
                Vec::new()
            }
        };

        let extraction = extract_status_transitions(&changelog);
        for warning in &extraction.warnings {
            console::warn(&format!("{}: {}", story.key, warning));
        }

        let result =
            accumulate_tracked_time(&extraction.transitions, &options.tracked_statuses, now);

        computed.push(ComputedStory {
            key: story.key,
            summary: story.summary,
            estimate: story.estimate,
            result,
        });
    }

    computed
}
