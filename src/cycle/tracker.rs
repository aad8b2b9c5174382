use crate::cycle::workdays::business_days_between;
use crate::models::{StatusTransition, StoryResult};
use time::OffsetDateTime;

/// Where the automaton currently is while replaying a story's history.
#[derive(Debug, Clone, PartialEq)]
enum TrackerState {
    Idle,
    Tracking { status: String, since: OffsetDateTime },
}

/// Replays the ordered transition sequence and accumulates business days
/// spent inside the tracked statuses.
///
/// Each event is a close-then-maybe-reopen step: leaving the currently
/// tracked status closes that interval (whatever the destination), and a
/// destination inside the tracked set opens a fresh one at the event
/// timestamp. Re-entering a status therefore restarts its clock rather
/// than merging intervals. An interval still open after the last event is
/// closed at `now`: work in progress accrues time as of the run.
///
/// Dwell time before the first visible transition is never counted; only
/// explicit transitions are observed.
pub fn accumulate_tracked_time(
    transitions: &[StatusTransition],
    tracked_statuses: &[String],
    now: OffsetDateTime,
) -> StoryResult {
    let mut state = TrackerState::Idle;
    let mut result = StoryResult::default();

    for transition in transitions {
        if let TrackerState::Tracking { status, since } = &state
            && *status != transition.to
        {
            close_interval(&mut result, status, *since, transition.at);
            state = TrackerState::Idle;
        }

        if state == TrackerState::Idle && tracked_statuses.contains(&transition.to) {
            state = TrackerState::Tracking {
                status: transition.to.clone(),
                since: transition.at,
            };
        }
    }

    if let TrackerState::Tracking { status, since } = state {
        close_interval(&mut result, &status, since, now);
    }

    result
}

fn close_interval(result: &mut StoryResult, status: &str, since: OffsetDateTime, until: OffsetDateTime) {
    let days = business_days_between(since, until);
    result.total_days += days;
    *result.per_status.entry(status.to_string()).or_insert(0) += days;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn tracked() -> Vec<String> {
        vec!["In Development".to_string(), "In Review".to_string()]
    }

    fn transition(at: OffsetDateTime, from: &str, to: &str) -> StatusTransition {
        StatusTransition {
            at,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    // All dates below are weekdays in January 2024 (the 1st is a Monday).

    #[test]
    fn test_enter_and_leave_single_interval() {
        let transitions = vec![
            transition(datetime!(2024-01-01 09:00 UTC), "To Do", "In Development"),
            transition(datetime!(2024-01-04 09:00 UTC), "In Development", "Done"),
        ];

        let result = accumulate_tracked_time(&transitions, &tracked(), datetime!(2024-02-01 09:00 UTC));
        assert_eq!(result.total_days, 3);
        assert_eq!(result.per_status.get("In Development"), Some(&3));
        assert_eq!(result.per_status.len(), 1);
    }

    #[test]
    fn test_reentry_accumulates_separate_intervals() {
        let transitions = vec![
            transition(datetime!(2024-01-01 09:00 UTC), "To Do", "In Development"),
            transition(datetime!(2024-01-03 09:00 UTC), "In Development", "Blocked"),
            transition(datetime!(2024-01-08 09:00 UTC), "Blocked", "In Development"),
            transition(datetime!(2024-01-10 09:00 UTC), "In Development", "Done"),
        ];

        let result = accumulate_tracked_time(&transitions, &tracked(), datetime!(2024-02-01 09:00 UTC));
        // Jan 1-2 and Jan 8-9: two intervals of two weekdays each
        assert_eq!(result.total_days, 4);
        assert_eq!(result.per_status.get("In Development"), Some(&4));
    }

    #[test]
    fn test_moving_between_tracked_statuses_closes_and_reopens() {
        let transitions = vec![
            transition(datetime!(2024-01-01 09:00 UTC), "To Do", "In Development"),
            transition(datetime!(2024-01-03 09:00 UTC), "In Development", "In Review"),
            transition(datetime!(2024-01-05 09:00 UTC), "In Review", "Done"),
        ];

        let result = accumulate_tracked_time(&transitions, &tracked(), datetime!(2024-02-01 09:00 UTC));
        assert_eq!(result.per_status.get("In Development"), Some(&2));
        assert_eq!(result.per_status.get("In Review"), Some(&2));
        assert_eq!(result.total_days, 4);
    }

    #[test]
    fn test_untracked_journey_yields_zero_and_empty_breakdown() {
        let transitions = vec![
            transition(datetime!(2024-01-01 09:00 UTC), "To Do", "Ready"),
            transition(datetime!(2024-01-05 09:00 UTC), "Ready", "Done"),
        ];

        let result = accumulate_tracked_time(&transitions, &tracked(), datetime!(2024-02-01 09:00 UTC));
        assert_eq!(result.total_days, 0);
        assert!(result.per_status.is_empty());
    }

    #[test]
    fn test_no_transitions_at_all() {
        let result = accumulate_tracked_time(&[], &tracked(), datetime!(2024-02-01 09:00 UTC));
        assert_eq!(result, StoryResult::default());
    }

    #[test]
    fn test_open_interval_accrues_until_now() {
        let transitions = vec![transition(
            datetime!(2024-01-01 09:00 UTC),
            "To Do",
            "In Development",
        )];

        let now = datetime!(2024-01-08 09:00 UTC);
        let result = accumulate_tracked_time(&transitions, &tracked(), now);
        assert_eq!(result.total_days, 5);
        assert_eq!(result.per_status.get("In Development"), Some(&5));
    }

    #[test]
    fn test_total_equals_sum_of_breakdown() {
        let transitions = vec![
            transition(datetime!(2024-01-01 09:00 UTC), "To Do", "In Development"),
            transition(datetime!(2024-01-03 09:00 UTC), "In Development", "In Review"),
            transition(datetime!(2024-01-09 09:00 UTC), "In Review", "In Development"),
        ];

        let result = accumulate_tracked_time(&transitions, &tracked(), datetime!(2024-01-12 09:00 UTC));
        let sum: u32 = result.per_status.values().sum();
        assert_eq!(result.total_days, sum);
    }

    #[test]
    fn test_repeated_entry_into_same_status_does_not_restart_clock() {
        // A second event landing on the already-tracked status leaves the
        // open interval untouched.
        let transitions = vec![
            transition(datetime!(2024-01-01 09:00 UTC), "To Do", "In Development"),
            transition(datetime!(2024-01-03 09:00 UTC), "Blocked", "In Development"),
            transition(datetime!(2024-01-05 09:00 UTC), "In Development", "Done"),
        ];

        let result = accumulate_tracked_time(&transitions, &tracked(), datetime!(2024-02-01 09:00 UTC));
        assert_eq!(result.total_days, 4);
    }
}
