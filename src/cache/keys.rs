// Cache key derivation and the TTL table.

use std::fmt;
use std::time::Duration;

const MINUTE: u64 = 60;

/// Key of a cached read.
///
/// Rendered as `{kind}_{owner}_{repo}[_{identifier}]`. Owner and repo names are
/// not escaped, so a name containing `_` can collide with another key
/// (`a_b`/`c` vs `a`/`b_c`). The authenticated user is never cached and has no key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey<'a> {
    Repositories,
    Issues { owner: &'a str, repo: &'a str },
    Issue { owner: &'a str, repo: &'a str, number: u64 },
    Project { owner: &'a str, number: u64 },
    Milestones { owner: &'a str, repo: &'a str },
    Labels { owner: &'a str, repo: &'a str },
    PullRequests { owner: &'a str, repo: &'a str },
}

impl CacheKey<'_> {
    /// Fixed time-to-live for this kind of entry.
    pub fn ttl(&self) -> Duration {
        let minutes = match self {
            CacheKey::Repositories => 10,
            CacheKey::Issues { .. } => 5,
            CacheKey::Issue { .. } => 5,
            CacheKey::Project { .. } => 10,
            CacheKey::Milestones { .. } => 15,
            CacheKey::Labels { .. } => 60,
            CacheKey::PullRequests { .. } => 5,
        };
        Duration::from_secs(minutes * MINUTE)
    }
}

impl fmt::Display for CacheKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Repositories => write!(f, "user_repositories"),
            CacheKey::Issues { owner, repo } => write!(f, "issues_{}_{}", owner, repo),
            CacheKey::Issue {
                owner,
                repo,
                number,
            } => write!(f, "issue_{}_{}_{}", owner, repo, number),
            CacheKey::Project { owner, number } => write!(f, "project_{}_{}", owner, number),
            CacheKey::Milestones { owner, repo } => write!(f, "milestones_{}_{}", owner, repo),
            CacheKey::Labels { owner, repo } => write!(f, "labels_{}_{}", owner, repo),
            CacheKey::PullRequests { owner, repo } => write!(f, "pulls_{}_{}", owner, repo),
        }
    }
}
