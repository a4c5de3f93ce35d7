use async_trait::async_trait;
use std::path::Path;

use crate::common::result::ReleaseResult;

/// Git operations the release pipeline performs on its working copies.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Clone `url` into `dest_path`.
    async fn clone_repository(
        &self,
        url: &str,
        dest_path: &Path,
        options: &CloneOptions,
    ) -> ReleaseResult<()>;

    /// Pull the tracked upstream into the working copy.
    async fn pull(&self, repo_path: &Path) -> ReleaseResult<()>;

    /// Discard local modifications, leaving the working copy at `revision`.
    async fn reset_hard(&self, repo_path: &Path, revision: &str) -> ReleaseResult<()>;

    /// Apply a patch file to the working tree.
    async fn apply_patch(&self, repo_path: &Path, patch: &Path) -> ReleaseResult<()>;

    /// Stage every change in the working tree.
    async fn add_all(&self, repo_path: &Path) -> ReleaseResult<()>;

    async fn commit(&self, repo_path: &Path, message: &str) -> ReleaseResult<()>;

    async fn push(&self, repo_path: &Path) -> ReleaseResult<()>;

    /// Full hash of the most recent commit.
    async fn last_commit_sha(&self, repo_path: &Path) -> ReleaseResult<String>;

    /// Message of the most recent commit, without trailing whitespace.
    async fn last_commit_message(&self, repo_path: &Path) -> ReleaseResult<String>;
}

/// Options for cloning repositories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// Branch to check out; the clone then tracks only that branch.
    pub branch: Option<String>,
}

impl CloneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}
