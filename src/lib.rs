//! Read-through caching gateway for the GitHub API.
//!
//! [`Gateway`] fronts repositories, issues, pull requests, milestones, labels and
//! user projects (the last over GraphQL). Reads are served from an injected
//! [`CacheStore`] with a fixed TTL per resource; successful writes invalidate the
//! cached reads they make stale. Failures never escape the gateway: every
//! operation returns an [`Outcome`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hubgate::{Gateway, GatewayConfig, MemoryCache};
//! use tokio_util::sync::CancellationToken;
//!
//! let gateway = Gateway::github(GatewayConfig::from_env(), Arc::new(MemoryCache::new()))?;
//! gateway.set_auth_token(&hubgate::config::token_from_env()?)?;
//! let issues = gateway
//!     .list_issues("acme", "widgets", &CancellationToken::new())
//!     .await
//!     .unwrap_or_default();
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod github;

pub use cache::{CacheKey, CacheStore, DiskCache, MemoryCache};
pub use config::GatewayConfig;
pub use error::{FailureKind, GatewayError, Result};
pub use gateway::{Failure, Gateway, MetricsSnapshot, Outcome};
