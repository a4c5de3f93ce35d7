use super::scm_interface::{CloneOptions, VersionControl};
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use crate::common::result::{ReleaseResult, ResultExt};
use crate::infrastructure::process::{CommandArgs, CommandProxy, Executable, ProcessRunner, TtyProfile};

/// Git implementation of [`VersionControl`] driving the `git` executable.
#[derive(Debug, Clone)]
pub struct GitScm {
    git_executable: String,
    profile: TtyProfile,
}

impl GitScm {
    pub fn new(profile: TtyProfile) -> Self {
        Self::with_executable("git", profile)
    }

    /// Create a new Git SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>, profile: TtyProfile) -> Self {
        Self {
            git_executable: executable.into(),
            profile,
        }
    }

    /// `git` bound to a working copy.
    fn in_repo(&self, repo_path: &Path) -> CommandProxy {
        CommandProxy::new(
            Executable::OnPath(self.git_executable.clone()),
            repo_path,
            self.profile.clone(),
        )
    }
}

#[async_trait]
impl VersionControl for GitScm {
    async fn clone_repository(
        &self,
        url: &str,
        dest_path: &Path,
        options: &CloneOptions,
    ) -> ReleaseResult<()> {
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent).with_path("Failed to create", parent)?;
        }

        let mut args = CommandArgs::new().arg("clone").arg(url).path_arg(dest_path);
        if let Some(branch) = &options.branch {
            args = args
                .option("branch", branch.as_str())
                .option("single_branch", true);
        }

        debug!(url, dest = %dest_path.display(), branch = ?options.branch, "Cloning");
        ProcessRunner::new(self.git_executable.clone(), self.profile.clone())
            .call(args)
            .await?;
        Ok(())
    }

    async fn pull(&self, repo_path: &Path) -> ReleaseResult<()> {
        self.in_repo(repo_path).verb("pull").call(CommandArgs::new()).await?;
        Ok(())
    }

    async fn reset_hard(&self, repo_path: &Path, revision: &str) -> ReleaseResult<()> {
        self.in_repo(repo_path)
            .verb("reset")
            .call(CommandArgs::new().option("hard", true).arg(revision))
            .await?;
        Ok(())
    }

    async fn apply_patch(&self, repo_path: &Path, patch: &Path) -> ReleaseResult<()> {
        self.in_repo(repo_path)
            .verb("apply")
            .call(CommandArgs::new().path_arg(patch))
            .await?;
        Ok(())
    }

    async fn add_all(&self, repo_path: &Path) -> ReleaseResult<()> {
        self.in_repo(repo_path).verb("add").call(CommandArgs::new().arg(".")).await?;
        Ok(())
    }

    async fn commit(&self, repo_path: &Path, message: &str) -> ReleaseResult<()> {
        self.in_repo(repo_path)
            .verb("commit")
            .call(CommandArgs::new().option("m", message))
            .await?;
        Ok(())
    }

    async fn push(&self, repo_path: &Path) -> ReleaseResult<()> {
        self.in_repo(repo_path).verb("push").call(CommandArgs::new()).await?;
        Ok(())
    }

    async fn last_commit_sha(&self, repo_path: &Path) -> ReleaseResult<String> {
        let output = self
            .in_repo(repo_path)
            .verb("log")
            .call(CommandArgs::new().arg("-1").option("pretty", "%H").capture())
            .await?;
        Ok(output.trimmed_stdout().to_string())
    }

    async fn last_commit_message(&self, repo_path: &Path) -> ReleaseResult<String> {
        let output = self
            .in_repo(repo_path)
            .verb("log")
            .call(CommandArgs::new().arg("-1").option("pretty", "%B").capture())
            .await?;
        Ok(output.trimmed_stdout().to_string())
    }
}
