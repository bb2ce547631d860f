// Resource codec.
// Decodes REST payloads into records and encodes mutation bodies.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Result;

/// Decode a JSON payload into `T`.
///
/// Field names match case-insensitively, and a `null` member is treated exactly
/// like a missing one so the record's default applies. Malformed JSON and type
/// mismatches are returned as errors.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: Value = serde_json::from_str(body)?;
    decode_value(value)
}

/// Decode an already-parsed JSON tree into `T`, with the same rules as [`decode`].
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(normalize(value))?)
}

/// Encode a request body.
pub fn encode<T: Serialize>(body: &T) -> Result<Value> {
    Ok(serde_json::to_value(body)?)
}

/// Lower-case every object key and drop `null` members, recursively.
///
/// When two keys differ only by case the one appearing last wins.
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut folded = Map::with_capacity(map.len());
            for (key, member) in map {
                if member.is_null() {
                    continue;
                }
                folded.insert(key.to_lowercase(), normalize(member));
            }
            Value::Object(folded)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::GatewayError;
    use crate::github::requests::{IssueState, NewIssueRequest, UpdateIssueRequest};
    use crate::github::types::{Issue, Label, Milestone, PullRequest, Repository, User};

    #[test]
    fn test_case_insensitive_fields() {
        let user: User =
            decode(r#"{"ID": 7, "Login": "octocat", "Name": "Mona", "Public_Repos": 8}"#).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.login, "octocat");
        assert_eq!(user.name, "Mona");
        assert_eq!(user.public_repos, 8);
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let issue: Issue = decode(
            r#"{"id": 1, "number": 42, "title": "Crash", "assignees": null, "body": null}"#,
        )
        .unwrap();
        assert!(issue.assignees.is_empty());
        assert!(issue.labels.is_empty());
        assert_eq!(issue.body, None);
        assert_eq!(issue.state, "");
        assert!(issue.user.is_none());

        let repo: Repository = decode(r#"{"id": 3, "name": "widgets"}"#).unwrap();
        assert_eq!(repo.default_branch, "main");
        assert_eq!(repo.owner, User::default());
    }

    #[test]
    fn test_is_pull_request_follows_reference() {
        let with_ref: Issue = decode(
            r#"{"number": 42, "pull_request": {"url": "https://api/pulls/42", "html_url": "https://web/pull/42"}}"#,
        )
        .unwrap();
        assert!(with_ref.is_pull_request());
        assert_eq!(
            with_ref.pull_request.as_ref().unwrap().html_url,
            "https://web/pull/42"
        );

        let without_ref: Issue = decode(r#"{"number": 42}"#).unwrap();
        assert!(!without_ref.is_pull_request());

        let null_ref: Issue = decode(r#"{"number": 42, "pull_request": null}"#).unwrap();
        assert!(!null_ref.is_pull_request());
    }

    #[test]
    fn test_nested_records() {
        let issue: Issue = decode(
            r#"{
                "number": 5,
                "user": {"login": "alice"},
                "labels": [{"name": "bug", "color": "d73a4a", "default": true}],
                "milestone": {"number": 2, "title": "v1", "due_on": "2026-12-01T00:00:00Z",
                              "creator": {"login": "bob"}, "description": null}
            }"#,
        )
        .unwrap();
        assert_eq!(issue.user.unwrap().login, "alice");
        assert!(issue.labels[0].is_default);
        let milestone = issue.milestone.unwrap();
        assert_eq!(milestone.creator.login, "bob");
        assert_eq!(milestone.description, "");
        assert!(milestone.due_on.is_some());
    }

    #[test]
    fn test_pull_request_branches() {
        let pr: PullRequest = decode(
            r#"{
                "number": 9,
                "user": {"login": "carol"},
                "head": {"ref": "feature", "sha": "abc", "repo": {"full_name": "carol/widgets"}},
                "base": {"ref": "main", "sha": "def", "repo": null},
                "additions": 10, "deletions": 2, "mergeable": null
            }"#,
        )
        .unwrap();
        assert_eq!(pr.head.ref_name, "feature");
        assert_eq!(pr.head_repo().unwrap().full_name, "carol/widgets");
        assert!(pr.base_repo().is_none());
        assert_eq!(pr.mergeable, None);
        assert_eq!(pr.additions, 10);
    }

    #[test]
    fn test_lists_decode() {
        let labels: Vec<Label> =
            decode(r#"[{"name": "bug"}, {"name": "docs", "description": "Docs"}]"#).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].description.as_deref(), Some("Docs"));

        let empty: Vec<Milestone> = decode("[]").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_decode_failures() {
        let malformed = decode::<User>("{not json");
        assert!(matches!(malformed, Err(GatewayError::Json(_))));

        let mismatch = decode::<User>(r#"{"id": "seven"}"#);
        assert!(matches!(mismatch, Err(GatewayError::Json(_))));

        let wrong_shape = decode::<Vec<Label>>(r#"{"message": "Not Found"}"#);
        assert!(wrong_shape.is_err());
    }

    #[test]
    fn test_encode_omits_unset_fields() {
        let body = encode(&NewIssueRequest::new("Crash on start")).unwrap();
        assert_eq!(body, json!({"title": "Crash on start"}));

        let update = UpdateIssueRequest {
            state: Some(IssueState::Closed),
            labels: Some(vec!["bug".to_string()]),
            ..UpdateIssueRequest::default()
        };
        assert_eq!(
            encode(&update).unwrap(),
            json!({"state": "closed", "labels": ["bug"]})
        );
    }

    #[test]
    fn test_cached_record_roundtrip_through_plain_serde() {
        let label: Label = decode(r#"{"Name": "bug", "Default": true}"#).unwrap();
        let stored = serde_json::to_value(&label).unwrap();
        let restored: Label = serde_json::from_value(stored).unwrap();
        assert_eq!(restored, label);
    }
}
