use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

pub const DEFAULT_TRACKED_STATUSES: [&str; 3] = ["In Development", "In Review", "In Testing"];
pub const DEFAULT_INFLATION_MULTIPLIER: f64 = 10.0;

// --- Tracker-side records ---

#[derive(Debug, Clone, Serialize)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone)]
pub struct Story {
    pub key: String,
    pub summary: String,
    pub estimate: Option<f64>,
    pub status: String,
}

/// One changelog entry: everything that changed in a single edit,
/// in the shape Jira's changelog endpoint returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeGroup {
    pub created: String,
    #[serde(default)]
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeItem {
    #[serde(default)]
    pub field: String,
    #[serde(rename = "fromString")]
    pub from: Option<String>,
    #[serde(rename = "toString")]
    pub to: Option<String>,
}

// --- Core types ---

#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub at: OffsetDateTime,
    pub from: String,
    pub to: String,
}

/// Business days a story spent inside tracked statuses. `total_days`
/// always equals the sum of the per-status buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoryResult {
    pub total_days: u32,
    pub per_status: HashMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct ComputedStory {
    pub key: String,
    pub summary: String,
    pub estimate: Option<f64>,
    pub result: StoryResult,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Ordered set of workflow statuses whose dwell time is measured.
    pub tracked_statuses: Vec<String>,
    pub inflation_multiplier: f64,
    pub include_inflated_report: bool,
    pub exclude_inflated: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            tracked_statuses: DEFAULT_TRACKED_STATUSES.map(String::from).to_vec(),
            inflation_multiplier: DEFAULT_INFLATION_MULTIPLIER,
            include_inflated_report: false,
            exclude_inflated: false,
        }
    }
}

// --- Report types ---

#[derive(Debug, Clone, Serialize)]
pub struct StatusShare {
    pub status: String,
    /// Share of the group's total tracked days, one decimal place.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimateGroup {
    pub estimate: f64,
    pub count: usize,
    pub mean_days: f64,
    pub median_days: u32,
    pub min_days: u32,
    pub max_days: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status_share: Vec<StatusShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InflatedStory {
    pub key: String,
    pub summary: String,
    pub estimate: f64,
    pub total_days: u32,
    /// How far past `estimate * multiplier` the story ran, rounded to the
    /// nearest whole percent. 0 when the expected duration is zero.
    pub percent_over: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InflatedGroup {
    pub estimate: f64,
    pub stories: Vec<InflatedStory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub groups: Vec<EstimateGroup>,
    pub without_estimate: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inflated: Option<Vec<InflatedGroup>>,
}
