use crate::models::{ChangeGroup, StatusTransition};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Jira's changelog timestamps use a colonless offset: `2024-01-15T10:30:00.000+0100`.
const JIRA_TIMESTAMP: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory][offset_minute]"
);

pub fn parse_jira_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, JIRA_TIMESTAMP))
        .ok()
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub transitions: Vec<StatusTransition>,
    /// Human-readable notes about entries that had to be skipped.
    pub warnings: Vec<String>,
}

/// Reduces a raw changelog to the ordered status-transition sequence.
///
/// Only items whose field is "status" survive. The result is sorted
/// ascending by timestamp with a stable sort, so entries sharing a
/// timestamp keep their original relative order. Entries with a
/// timestamp that does not parse are dropped with a warning; one bad
/// entry never aborts the story.
pub fn extract_status_transitions(groups: &[ChangeGroup]) -> Extraction {
    let mut extraction = Extraction::default();

    for group in groups {
        let Some(at) = parse_jira_timestamp(&group.created) else {
            extraction.warnings.push(format!(
                "skipping changelog entry with malformed timestamp '{}'",
                group.created
            ));
            continue;
        };

        for item in &group.items {
            if item.field == "status" {
                extraction.transitions.push(StatusTransition {
                    at,
                    from: item.from.clone().unwrap_or_default(),
                    to: item.to.clone().unwrap_or_default(),
                });
            }
        }
    }

    extraction.transitions.sort_by_key(|t| t.at);
    extraction
}
