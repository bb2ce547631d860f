// GitHub resource records.
// Plain value snapshots populated by the codec. Every record is `#[serde(default)]`:
// an absent (or null) member takes the declared default, i.e. empty string, empty
// list, zero, `false` or `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub user. Embedded by value wherever another record references a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub login: String,
    /// Display name; empty when the user has not set one.
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: User,
    pub html_url: String,
    pub description: Option<String>,
    pub private: bool,
    pub fork: bool,
    pub archived: bool,
    pub disabled: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    /// Defaults to `main` when the payload omits it.
    pub default_branch: String,
    pub open_issues_count: u64,
    pub forks_count: u64,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub language: Option<String>,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub has_pages: bool,
    pub has_downloads: bool,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            full_name: String::new(),
            owner: User::default(),
            html_url: String::new(),
            description: None,
            private: false,
            fork: false,
            archived: false,
            disabled: false,
            created_at: None,
            updated_at: None,
            pushed_at: None,
            default_branch: "main".to_string(),
            open_issues_count: 0,
            forks_count: 0,
            stargazers_count: 0,
            watchers_count: 0,
            language: None,
            has_issues: false,
            has_projects: false,
            has_wiki: false,
            has_pages: false,
            has_downloads: false,
        }
    }
}

/// Issue label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: u64,
    pub name: String,
    /// Hex colour without the leading `#`.
    pub color: String,
    pub description: Option<String>,
    #[serde(rename = "default")]
    pub is_default: bool,
    pub url: String,
}

/// Repository milestone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub description: String,
    pub creator: User,
    pub open_issues: u64,
    pub closed_issues: u64,
    pub state: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub due_on: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub html_url: String,
}

/// Link from an issue payload to the pull request it represents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestRef {
    pub url: String,
    pub html_url: String,
}

/// GitHub issue. The issues endpoints also return pull requests; those carry a
/// `pull_request` reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub locked: bool,
    pub user: Option<User>,
    pub assignees: Vec<User>,
    pub milestone: Option<Milestone>,
    pub comments: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub body: Option<String>,
    pub labels: Vec<Label>,
    pub closed_by: Option<User>,
    pub pull_request: Option<PullRequestRef>,
    pub html_url: String,
}

impl Issue {
    /// True iff the payload carried a pull request reference.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Head or base side of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchRef {
    /// `owner:branch`
    pub label: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub user: Option<User>,
    /// Absent when the source fork has been deleted.
    pub repo: Option<Repository>,
}

/// GitHub pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub locked: bool,
    pub user: User,
    pub html_url: String,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub merge_commit_sha: Option<String>,
    pub assignee: Option<User>,
    pub assignees: Vec<User>,
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub draft: bool,
    pub head: BranchRef,
    pub base: BranchRef,
    pub merged: bool,
    pub mergeable: Option<bool>,
    pub rebaseable: Option<bool>,
    pub mergeable_state: String,
    pub comments: u64,
    pub review_comments: u64,
    pub commits: u64,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
}

impl PullRequest {
    pub fn head_repo(&self) -> Option<&Repository> {
        self.head.repo.as_ref()
    }

    pub fn base_repo(&self) -> Option<&Repository> {
        self.base.repo.as_ref()
    }
}

/// A user-owned project (v2). Only reachable through the GraphQL API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Opaque node id.
    pub id: String,
    pub title: String,
    pub number: u64,
    pub description: String,
    pub url: String,
    pub closed: bool,
    pub items: Vec<ProjectItem>,
}

/// An issue or pull request placed on a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    /// Opaque node id of the project item itself.
    pub id: String,
    /// Opaque node id of the issue or pull request.
    pub content_id: String,
    pub number: u64,
    pub title: String,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
