// GitHub API endpoint definitions.
// One request constructor per gateway operation: path, query string and body.

use crate::error::Result;

use super::codec;
use super::graph;
use super::requests::{NewIssueRequest, NewLabelRequest, NewMilestoneRequest, UpdateIssueRequest};
use super::transport::ApiRequest;

/// Largest page GitHub serves. Lists are fetched as a single page of this size.
pub const MAX_PAGE_SIZE: &str = "100";

/// Get the authenticated user.
pub fn current_user() -> ApiRequest {
    ApiRequest::get("user")
}

/// Repositories accessible to the authenticated user, most recently updated first.
pub fn user_repos() -> ApiRequest {
    ApiRequest::get("user/repos").with_query(&[("sort", "updated"), ("per_page", MAX_PAGE_SIZE)])
}

/// Open issues for a repository.
pub fn issues(owner: &str, repo: &str) -> ApiRequest {
    ApiRequest::get(format!("repos/{}/{}/issues", owner, repo)).with_query(&[
        ("state", "open"),
        ("sort", "updated"),
        ("per_page", MAX_PAGE_SIZE),
    ])
}

pub fn issue(owner: &str, repo: &str, number: u64) -> ApiRequest {
    ApiRequest::get(format!("repos/{}/{}/issues/{}", owner, repo, number))
}

pub fn create_issue(owner: &str, repo: &str, request: &NewIssueRequest) -> Result<ApiRequest> {
    Ok(ApiRequest::post(
        format!("repos/{}/{}/issues", owner, repo),
        codec::encode(request)?,
    ))
}

pub fn update_issue(
    owner: &str,
    repo: &str,
    number: u64,
    request: &UpdateIssueRequest,
) -> Result<ApiRequest> {
    Ok(ApiRequest::patch(
        format!("repos/{}/{}/issues/{}", owner, repo, number),
        codec::encode(request)?,
    ))
}

/// GraphQL request for a user's project.
pub fn project(owner: &str, number: u64) -> Result<ApiRequest> {
    Ok(ApiRequest::graphql(codec::encode(&graph::project_payload(
        owner, number,
    ))?))
}

/// Open milestones, soonest due date first.
pub fn milestones(owner: &str, repo: &str) -> ApiRequest {
    ApiRequest::get(format!("repos/{}/{}/milestones", owner, repo)).with_query(&[
        ("state", "open"),
        ("sort", "due_on"),
        ("direction", "asc"),
    ])
}

pub fn create_milestone(
    owner: &str,
    repo: &str,
    request: &NewMilestoneRequest,
) -> Result<ApiRequest> {
    Ok(ApiRequest::post(
        format!("repos/{}/{}/milestones", owner, repo),
        codec::encode(request)?,
    ))
}

pub fn labels(owner: &str, repo: &str) -> ApiRequest {
    ApiRequest::get(format!("repos/{}/{}/labels", owner, repo))
        .with_query(&[("per_page", MAX_PAGE_SIZE)])
}

pub fn create_label(owner: &str, repo: &str, request: &NewLabelRequest) -> Result<ApiRequest> {
    Ok(ApiRequest::post(
        format!("repos/{}/{}/labels", owner, repo),
        codec::encode(request)?,
    ))
}

/// Open pull requests for a repository.
pub fn pull_requests(owner: &str, repo: &str) -> ApiRequest {
    ApiRequest::get(format!("repos/{}/{}/pulls", owner, repo)).with_query(&[
        ("state", "open"),
        ("sort", "updated"),
        ("per_page", MAX_PAGE_SIZE),
    ])
}
