// Caching gateway in front of the GitHub API.
// Reads go through the cache; successful writes invalidate the reads they make stale.

mod metrics;
mod outcome;


use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

use crate::cache::{CacheKey, CacheStore};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::github::transport::{ApiRequest, Transport};
use crate::github::{
    HttpTransport, Issue, Label, Milestone, NewIssueRequest, NewLabelRequest,
    NewMilestoneRequest, Project, PullRequest, Repository, UpdateIssueRequest, User, codec,
    endpoints, graph,
};

pub use metrics::{GatewayMetrics, MetricsSnapshot};
pub use outcome::{Failure, Outcome};

type Decoder<T> = fn(&str) -> Result<T>;

/// Single entry point for GitHub resource access.
///
/// Every read consults the cache first and, on a miss, fetches, decodes and stores
/// the record with its fixed TTL. Mutations always hit the API and, once the result
/// has decoded, remove the cache keys they could have made stale. No operation
/// returns an error or panics: failures come back as [`Outcome::Failed`] and are
/// logged.
///
/// Concurrent misses on one key are not coalesced; each fetches and the last store
/// wins.
pub struct Gateway {
    transport: Arc<dyn Transport>,
    cache: Arc<dyn CacheStore>,
    metrics: GatewayMetrics,
}

impl Gateway {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            transport,
            cache,
            metrics: GatewayMetrics::default(),
        }
    }

    /// Gateway over the real GitHub API.
    pub fn github(config: GatewayConfig, cache: Arc<dyn CacheStore>) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?), cache))
    }

    /// Set the bearer token. Call once before the first operation.
    pub fn set_auth_token(&self, token: &str) -> Result<()> {
        self.transport.set_auth_token(token)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// The authenticated user. Never cached.
    #[instrument(skip(self, cancel))]
    pub async fn get_user(&self, cancel: &CancellationToken) -> Outcome<User> {
        match self
            .fetch(Ok(endpoints::current_user()), codec::decode, cancel)
            .await
        {
            Ok(user) => Outcome::Value(user),
            Err(err) => self.fail(err),
        }
    }

    #[instrument(skip(self, cancel))]
    pub async fn list_repositories(&self, cancel: &CancellationToken) -> Outcome<Vec<Repository>> {
        self.read_through(
            CacheKey::Repositories,
            Ok(endpoints::user_repos()),
            codec::decode,
            cancel,
        )
        .await
    }

    #[instrument(skip(self, cancel))]
    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> Outcome<Vec<Issue>> {
        self.read_through(
            CacheKey::Issues { owner, repo },
            Ok(endpoints::issues(owner, repo)),
            codec::decode,
            cancel,
        )
        .await
    }

    #[instrument(skip(self, cancel))]
    pub async fn get_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        cancel: &CancellationToken,
    ) -> Outcome<Issue> {
        self.read_through(
            CacheKey::Issue {
                owner,
                repo,
                number,
            },
            Ok(endpoints::issue(owner, repo, number)),
            codec::decode,
            cancel,
        )
        .await
    }

    /// Create an issue. Invalidates the repository's issue list.
    #[instrument(skip(self, request, cancel))]
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        request: &NewIssueRequest,
        cancel: &CancellationToken,
    ) -> Outcome<Issue> {
        self.mutate(
            endpoints::create_issue(owner, repo, request),
            &[CacheKey::Issues { owner, repo }],
            cancel,
        )
        .await
    }

    /// Update an issue. Invalidates the issue and the repository's issue list.
    #[instrument(skip(self, request, cancel))]
    pub async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &UpdateIssueRequest,
        cancel: &CancellationToken,
    ) -> Outcome<Issue> {
        self.mutate(
            endpoints::update_issue(owner, repo, number, request),
            &[
                CacheKey::Issue {
                    owner,
                    repo,
                    number,
                },
                CacheKey::Issues { owner, repo },
            ],
            cancel,
        )
        .await
    }

    /// A user's project, fetched over GraphQL.
    #[instrument(skip(self, cancel))]
    pub async fn get_project(
        &self,
        owner: &str,
        number: u64,
        cancel: &CancellationToken,
    ) -> Outcome<Project> {
        self.read_through(
            CacheKey::Project { owner, number },
            endpoints::project(owner, number),
            graph::parse_project,
            cancel,
        )
        .await
    }

    /// Open milestones ordered by due date, soonest first.
    #[instrument(skip(self, cancel))]
    pub async fn list_milestones(
        &self,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> Outcome<Vec<Milestone>> {
        self.read_through(
            CacheKey::Milestones { owner, repo },
            Ok(endpoints::milestones(owner, repo)),
            codec::decode,
            cancel,
        )
        .await
    }

    /// Create a milestone. Invalidates the repository's milestone list.
    #[instrument(skip(self, request, cancel))]
    pub async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        request: &NewMilestoneRequest,
        cancel: &CancellationToken,
    ) -> Outcome<Milestone> {
        self.mutate(
            endpoints::create_milestone(owner, repo, request),
            &[CacheKey::Milestones { owner, repo }],
            cancel,
        )
        .await
    }

    #[instrument(skip(self, cancel))]
    pub async fn list_labels(
        &self,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> Outcome<Vec<Label>> {
        self.read_through(
            CacheKey::Labels { owner, repo },
            Ok(endpoints::labels(owner, repo)),
            codec::decode,
            cancel,
        )
        .await
    }

    /// Create a label. Invalidates the repository's label list.
    #[instrument(skip(self, request, cancel))]
    pub async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        request: &NewLabelRequest,
        cancel: &CancellationToken,
    ) -> Outcome<Label> {
        self.mutate(
            endpoints::create_label(owner, repo, request),
            &[CacheKey::Labels { owner, repo }],
            cancel,
        )
        .await
    }

    #[instrument(skip(self, cancel))]
    pub async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> Outcome<Vec<PullRequest>> {
        self.read_through(
            CacheKey::PullRequests { owner, repo },
            Ok(endpoints::pull_requests(owner, repo)),
            codec::decode,
            cancel,
        )
        .await
    }

    async fn read_through<T>(
        &self,
        key: CacheKey<'_>,
        request: Result<ApiRequest>,
        decode: Decoder<T>,
        cancel: &CancellationToken,
    ) -> Outcome<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let cache_key = key.to_string();
        if let Some(value) = self.cached(&cache_key) {
            return Outcome::Value(value);
        }
        self.metrics.miss();
        debug!(key = %cache_key, "cache miss");

        let value = match self.fetch(request, decode, cancel).await {
            Ok(value) => value,
            Err(err) => return self.fail(err),
        };

        match serde_json::to_value(&value) {
            Ok(json) => self.cache.set(&cache_key, json, key.ttl()),
            Err(err) => warn!(key = %cache_key, error = %err, "record could not be cached"),
        }
        Outcome::Value(value)
    }

    /// Stored value for `key`, dropping entries that no longer fit `T`.
    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.cache.get(key)?;
        match serde_json::from_value(json) {
            Ok(value) => {
                self.metrics.hit();
                debug!(key, "cache hit");
                Some(value)
            }
            Err(err) => {
                warn!(key, error = %err, "discarding cached value of unexpected shape");
                self.cache.remove(key);
                None
            }
        }
    }

    /// Write, then invalidate. Nothing is invalidated unless the response decoded.
    async fn mutate<T: DeserializeOwned>(
        &self,
        request: Result<ApiRequest>,
        stale: &[CacheKey<'_>],
        cancel: &CancellationToken,
    ) -> Outcome<T> {
        let record = match self.fetch(request, codec::decode, cancel).await {
            Ok(record) => record,
            Err(err) => return self.fail(err),
        };

        // No await between here and the return: invalidation is all or nothing.
        for key in stale {
            let key = key.to_string();
            self.cache.remove(&key);
            self.metrics.invalidation();
            debug!(key = %key, "invalidated");
        }
        Outcome::Value(record)
    }

    async fn fetch<T>(
        &self,
        request: Result<ApiRequest>,
        decode: Decoder<T>,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let request = request?;
        if cancel.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }

        self.metrics.transport_call();
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            body = self.transport.send(&request) => body?,
        };
        decode(&body)
    }

    fn fail<T>(&self, err: GatewayError) -> Outcome<T> {
        self.metrics.failure();
        match &err {
            GatewayError::Protocol(_) => {
                error!(anomaly = "protocol", error = %err, "graph response broke the project query contract")
            }
            GatewayError::Cancelled => debug!("operation cancelled"),
            GatewayError::NotFound(_) | GatewayError::RateLimited { .. } => {
                warn!(error = %err, "request failed")
            }
            _ => error!(kind = ?err.kind(), error = %err, "request failed"),
        }
        Outcome::Failed(Failure::from(&err))
    }
}
