//! Serde models for the slices of the Jira Agile and Core REST payloads
//! this tool reads. Unknown fields are ignored throughout.

use crate::models::{ChangeGroup, Sprint, Story};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SprintPage {
    #[serde(default)]
    pub values: Vec<ApiSprint>,
    #[serde(rename = "isLast", default)]
    pub is_last: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApiSprint {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: String,
}

impl From<ApiSprint> for Sprint {
    fn from(s: ApiSprint) -> Self {
        Sprint {
            id: s.id,
            name: s.name,
            state: s.state,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssuePage {
    #[serde(default)]
    pub issues: Vec<ApiIssue>,
    #[serde(rename = "startAt", default)]
    pub start_at: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    pub status: ApiStatus,
    /// Everything else, including the instance-specific story-point
    /// custom field.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ApiStatus {
    pub name: String,
}

impl ApiIssue {
    pub fn into_story(self, estimate_field: &str) -> Story {
        let estimate = self
            .fields
            .extra
            .get(estimate_field)
            .and_then(serde_json::Value::as_f64);

        Story {
            key: self.key,
            summary: self.fields.summary,
            estimate,
            status: self.fields.status.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangelogPage {
    #[serde(default)]
    pub values: Vec<ChangeGroup>,
    #[serde(rename = "startAt", default)]
    pub start_at: u64,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_story_reads_estimate_from_custom_field() {
        let raw = json!({
            "key": "PLAT-12",
            "fields": {
                "summary": "Paginate the widget list",
                "status": { "name": "In Development" },
                "customfield_10016": 5.0,
                "labels": []
            }
        });

        let issue: ApiIssue = serde_json::from_value(raw).unwrap();
        let story = issue.into_story("customfield_10016");
        assert_eq!(story.key, "PLAT-12");
        assert_eq!(story.estimate, Some(5.0));
        assert_eq!(story.status, "In Development");
    }

    #[test]
    fn test_into_story_missing_or_null_estimate() {
        let raw = json!({
            "key": "PLAT-13",
            "fields": {
                "summary": "Unestimated chore",
                "status": { "name": "To Do" },
                "customfield_10016": null
            }
        });

        let issue: ApiIssue = serde_json::from_value(raw).unwrap();
        assert_eq!(issue.into_story("customfield_10016").estimate, None);
    }

    #[test]
    fn test_changelog_page_deserializes_histories() {
        let raw = json!({
            "startAt": 0,
            "maxResults": 100,
            "total": 1,
            "values": [{
                "created": "2024-01-15T10:30:00.000+0100",
                "items": [
                    { "field": "status", "fromString": "To Do", "toString": "In Development" }
                ]
            }]
        });

        let page: ChangelogPage = serde_json::from_value(raw).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.values[0].items[0].to.as_deref(), Some("In Development"));
    }
}
