use crate::config::Config;
use crate::engine::IssueTracker;
use crate::exceptions::StintError;
use crate::jira::api_models::{ApiSprint, ChangelogPage, IssuePage, SprintPage};
use crate::models::{ChangeGroup, Sprint, Story};
use regex::Regex;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const PAGE_SIZE: u64 = 50;
/// Courtesy throttle between changelog pages so bulk runs stay under the
/// instance rate limit. Not required for correctness.
const CHANGELOG_PAGE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct JiraClient {
    http: HttpClient,
    base_url: String,
    email: String,
    api_token: String,
    board_id: u64,
    estimate_field: String,
}

impl JiraClient {
    pub fn new(config: &Config, board_id: u64) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: config.base_url.clone(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            board_id,
            estimate_field: config.estimate_field.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, StintError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| StintError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            let error_msg = if text.trim().is_empty() {
                format!("GET {} failed (Status: {}): [Empty Body]", path, status)
            } else {
                format!("GET {} failed (Status: {}): {}", path, status, text)
            };
            return Err(StintError::Api(error_msg));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StintError::Api(format!("GET {} returned malformed JSON: {}", path, e)))
    }
}

impl IssueTracker for JiraClient {
    /// Walks the board's sprint pages until the `isLast` flag (or an empty
    /// page) and keeps the sprints whose name matches `pattern`.
    async fn list_sprints_matching(&self, pattern: &Regex) -> Result<Vec<Sprint>, StintError> {
        let path = format!("/rest/agile/1.0/board/{}/sprint", self.board_id);
        let mut sprints = Vec::new();
        let mut start_at = 0u64;

        loop {
            let page: SprintPage = self
                .get_json(
                    &path,
                    &[
                        ("startAt", start_at.to_string()),
                        ("maxResults", PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let fetched = page.values.len() as u64;
            sprints.extend(
                page.values
                    .into_iter()
                    .filter(|s: &ApiSprint| pattern.is_match(&s.name))
                    .map(Sprint::from),
            );

            if page.is_last || fetched == 0 {
                break;
            }
            start_at += fetched;
        }

        Ok(sprints)
    }

    /// Issues in a sprint, filtered server-side to stories. The sprint
    /// issue endpoint paginates with `startAt`/`total`.
    async fn list_issues_for_sprint(&self, sprint_id: u64) -> Result<Vec<Story>, StintError> {
        let path = format!("/rest/agile/1.0/sprint/{}/issue", sprint_id);
        let fields = format!("summary,status,{}", self.estimate_field);
        let mut stories = Vec::new();
        let mut start_at = 0u64;

        loop {
            let page: IssuePage = self
                .get_json(
                    &path,
                    &[
                        ("jql", "issuetype=Story".to_string()),
                        ("fields", fields.clone()),
                        ("startAt", start_at.to_string()),
                        ("maxResults", PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let fetched = page.issues.len() as u64;
            stories.extend(
                page.issues
                    .into_iter()
                    .map(|issue| issue.into_story(&self.estimate_field)),
            );

            start_at = page.start_at + fetched;
            if fetched == 0 || start_at >= page.total {
                break;
            }
        }

        Ok(stories)
    }

    /// The full changelog for one issue; no upper bound on the number of
    /// entries is assumed.
    async fn fetch_change_history(&self, issue_key: &str) -> Result<Vec<ChangeGroup>, StintError> {
        let path = format!("/rest/api/2/issue/{}/changelog", issue_key);
        let mut groups = Vec::new();
        let mut start_at = 0u64;

        loop {
            let page: ChangelogPage = self
                .get_json(
                    &path,
                    &[
                        ("startAt", start_at.to_string()),
                        ("maxResults", PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let fetched = page.values.len() as u64;
            groups.extend(page.values);

            start_at = page.start_at + fetched;
            if fetched == 0 || start_at >= page.total {
                break;
            }

            tokio::time::sleep(CHANGELOG_PAGE_DELAY).await;
        }

        Ok(groups)
    }
}
