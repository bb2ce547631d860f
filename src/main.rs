// hubgate command line.
// Runs one gateway operation and prints the result as JSON.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use hubgate::config::token_from_env;
use hubgate::github::{
    IssueState, NewIssueRequest, NewLabelRequest, NewMilestoneRequest, UpdateIssueRequest,
};
use hubgate::{CacheStore, DiskCache, Gateway, GatewayConfig, MemoryCache, Outcome};

#[derive(Parser)]
#[command(name = "hubgate", version, about = "Cached access to GitHub issues, projects and more")]
struct Cli {
    /// Keep the cache on disk so it survives between invocations
    #[arg(long)]
    disk_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// The authenticated user
    User,
    /// Repositories of the authenticated user
    Repos,
    /// Open issues of a repository
    Issues { owner: String, repo: String },
    /// A single issue
    Issue { owner: String, repo: String, number: u64 },
    CreateIssue {
        owner: String,
        repo: String,
        title: String,
        #[arg(long)]
        body: Option<String>,
    },
    UpdateIssue {
        owner: String,
        repo: String,
        number: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        close: bool,
        #[arg(long, conflicts_with = "close")]
        reopen: bool,
    },
    /// A user-owned project and its items
    Project { owner: String, number: u64 },
    /// Open milestones, soonest due first
    Milestones { owner: String, repo: String },
    CreateMilestone {
        owner: String,
        repo: String,
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Labels { owner: String, repo: String },
    CreateLabel {
        owner: String,
        repo: String,
        name: String,
        /// Hex colour without '#'
        color: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Open pull requests of a repository
    Pulls { owner: String, repo: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hubgate=info")))
        .init();

    let cli = Cli::parse();

    let cache: Arc<dyn CacheStore> = if cli.disk_cache {
        Arc::new(DiskCache::in_cache_dir()?)
    } else {
        Arc::new(MemoryCache::new())
    };
    let gateway = Gateway::github(GatewayConfig::from_env(), cache)?;
    gateway
        .set_auth_token(&token_from_env()?)
        .context("installing GitHub token")?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    run(&gateway, cli.command, &cancel).await
}

async fn run(gateway: &Gateway, command: Command, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        Command::User => print(gateway.get_user(cancel).await),
        Command::Repos => print(gateway.list_repositories(cancel).await),
        Command::Issues { owner, repo } => print(gateway.list_issues(&owner, &repo, cancel).await),
        Command::Issue {
            owner,
            repo,
            number,
        } => print(gateway.get_issue(&owner, &repo, number, cancel).await),
        Command::CreateIssue {
            owner,
            repo,
            title,
            body,
        } => {
            let mut request = NewIssueRequest::new(title);
            request.body = body;
            print(gateway.create_issue(&owner, &repo, &request, cancel).await)
        }
        Command::UpdateIssue {
            owner,
            repo,
            number,
            title,
            close,
            reopen,
        } => {
            let state = match (close, reopen) {
                (true, _) => Some(IssueState::Closed),
                (_, true) => Some(IssueState::Open),
                _ => None,
            };
            let request = UpdateIssueRequest {
                title,
                state,
                ..UpdateIssueRequest::default()
            };
            print(gateway.update_issue(&owner, &repo, number, &request, cancel).await)
        }
        Command::Project { owner, number } => print(gateway.get_project(&owner, number, cancel).await),
        Command::Milestones { owner, repo } => {
            print(gateway.list_milestones(&owner, &repo, cancel).await)
        }
        Command::CreateMilestone {
            owner,
            repo,
            title,
            description,
        } => {
            let mut request = NewMilestoneRequest::new(title);
            request.description = description;
            print(gateway.create_milestone(&owner, &repo, &request, cancel).await)
        }
        Command::Labels { owner, repo } => print(gateway.list_labels(&owner, &repo, cancel).await),
        Command::CreateLabel {
            owner,
            repo,
            name,
            color,
            description,
        } => {
            let mut request = NewLabelRequest::new(name, color);
            request.description = description;
            print(gateway.create_label(&owner, &repo, &request, cancel).await)
        }
        Command::Pulls { owner, repo } => {
            print(gateway.list_pull_requests(&owner, &repo, cancel).await)
        }
    }
}

fn print<T: Serialize>(outcome: Outcome<T>) -> anyhow::Result<()> {
    match outcome {
        Outcome::Value(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Outcome::Failed(failure) => bail!("{:?}: {}", failure.kind, failure.message),
    }
}
