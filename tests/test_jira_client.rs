use mockito::{Matcher, Server};
use regex::Regex;
use serde_json::json;
use stint::config::Config;
use stint::engine::IssueTracker;
use stint::exceptions::StintError;
use stint::jira::client::JiraClient;

fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.trim_end_matches('/').to_string(),
        email: "dev@example.com".to_string(),
        api_token: "secret-token".to_string(),
        estimate_field: "customfield_10016".to_string(),
    }
}

#[tokio::test]
async fn test_sprint_listing_paginates_until_is_last() {
    let mut server = Server::new_async().await;

    let page1 = json!({
        "isLast": false,
        "values": [
            { "id": 11, "name": "Platform Sprint 1", "state": "closed" },
            { "id": 12, "name": "Mobile Sprint 1", "state": "closed" }
        ]
    });
    let page2 = json!({
        "isLast": true,
        "values": [
            { "id": 13, "name": "Platform Sprint 2", "state": "active" }
        ]
    });

    let m1 = server
        .mock("GET", "/rest/agile/1.0/board/7/sprint")
        .match_query(Matcher::UrlEncoded("startAt".into(), "0".into()))
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .with_body(page1.to_string())
        .create_async()
        .await;
    let m2 = server
        .mock("GET", "/rest/agile/1.0/board/7/sprint")
        .match_query(Matcher::UrlEncoded("startAt".into(), "2".into()))
        .with_body(page2.to_string())
        .create_async()
        .await;

    let client = JiraClient::new(&test_config(&server.url()), 7);
    let pattern = Regex::new("^Platform").unwrap();
    let sprints = client.list_sprints_matching(&pattern).await.unwrap();

    m1.assert_async().await;
    m2.assert_async().await;

    let ids: Vec<u64> = sprints.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![11, 13]);
}

#[tokio::test]
async fn test_issue_listing_paginates_by_start_at_and_total() {
    let mut server = Server::new_async().await;

    let issue = |key: &str, points: Option<f64>| {
        json!({
            "key": key,
            "fields": {
                "summary": format!("summary of {}", key),
                "status": { "name": "Done" },
                "customfield_10016": points
            }
        })
    };

    let page1 = json!({
        "startAt": 0, "maxResults": 2, "total": 3,
        "issues": [issue("PLAT-1", Some(3.0)), issue("PLAT-2", None)]
    });
    let page2 = json!({
        "startAt": 2, "maxResults": 2, "total": 3,
        "issues": [issue("PLAT-3", Some(0.5))]
    });

    let _m1 = server
        .mock("GET", "/rest/agile/1.0/sprint/42/issue")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("startAt".into(), "0".into()),
            Matcher::UrlEncoded("jql".into(), "issuetype=Story".into()),
        ]))
        .with_body(page1.to_string())
        .create_async()
        .await;
    let _m2 = server
        .mock("GET", "/rest/agile/1.0/sprint/42/issue")
        .match_query(Matcher::UrlEncoded("startAt".into(), "2".into()))
        .with_body(page2.to_string())
        .create_async()
        .await;

    let client = JiraClient::new(&test_config(&server.url()), 7);
    let stories = client.list_issues_for_sprint(42).await.unwrap();

    assert_eq!(stories.len(), 3);
    assert_eq!(stories[0].estimate, Some(3.0));
    assert_eq!(stories[1].estimate, None);
    assert_eq!(stories[2].estimate, Some(0.5));
}

#[tokio::test]
async fn test_changelog_pagination_preserves_order() {
    let mut server = Server::new_async().await;

    let entry = |created: &str, to: &str| {
        json!({
            "created": created,
            "items": [{ "field": "status", "fromString": "X", "toString": to }]
        })
    };

    let page1 = json!({
        "startAt": 0, "maxResults": 1, "total": 2,
        "values": [entry("2024-01-01T09:00:00.000+0000", "In Development")]
    });
    let page2 = json!({
        "startAt": 1, "maxResults": 1, "total": 2,
        "values": [entry("2024-01-04T09:00:00.000+0000", "Done")]
    });

    let _m1 = server
        .mock("GET", "/rest/api/2/issue/PLAT-1/changelog")
        .match_query(Matcher::UrlEncoded("startAt".into(), "0".into()))
        .with_body(page1.to_string())
        .create_async()
        .await;
    let _m2 = server
        .mock("GET", "/rest/api/2/issue/PLAT-1/changelog")
        .match_query(Matcher::UrlEncoded("startAt".into(), "1".into()))
        .with_body(page2.to_string())
        .create_async()
        .await;

    let client = JiraClient::new(&test_config(&server.url()), 7);
    let groups = client.fetch_change_history("PLAT-1").await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].created, "2024-01-01T09:00:00.000+0000");
    assert_eq!(groups[1].items[0].to.as_deref(), Some("Done"));
}

#[tokio::test]
async fn test_empty_page_terminates_pagination() {
    let mut server = Server::new_async().await;

    // A server that reports a total it never delivers must not loop.
    let page = json!({ "startAt": 0, "maxResults": 50, "total": 10, "values": [] });
    let _m = server
        .mock("GET", "/rest/api/2/issue/PLAT-9/changelog")
        .match_query(Matcher::Any)
        .with_body(page.to_string())
        .create_async()
        .await;

    let client = JiraClient::new(&test_config(&server.url()), 7);
    let groups = client.fetch_change_history("PLAT-9").await.unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn test_non_success_response_surfaces_status_and_body() {
    let mut server = Server::new_async().await;

    let _m = server
        .mock("GET", "/rest/agile/1.0/board/7/sprint")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("AUTHENTICATED_FAILED")
        .create_async()
        .await;

    let client = JiraClient::new(&test_config(&server.url()), 7);
    let pattern = Regex::new(".").unwrap();
    let err = client.list_sprints_matching(&pattern).await.unwrap_err();

    assert!(matches!(err, StintError::Api(_)));
    let msg = err.to_string();
    assert!(msg.contains("401"), "missing status in: {}", msg);
    assert!(msg.contains("AUTHENTICATED_FAILED"), "missing body in: {}", msg);
}
