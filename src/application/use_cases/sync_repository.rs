use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::error::ReleaseError;
use crate::common::result::{ReleaseResult, ResultExt};
use crate::domain::value_objects::RemoteUrl;
use crate::infrastructure::process::ScopedDirectory;
use crate::infrastructure::scm::{CloneOptions, VersionControl};

/// Remote tree and where its working copy lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    pub url: RemoteUrl,
    pub branch: Option<String>,
    pub target: PathBuf,
}

impl RemoteSource {
    pub fn new(url: RemoteUrl, target: impl Into<PathBuf>) -> Self {
        Self {
            url,
            branch: None,
            target: target.into(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    fn clone_options(&self) -> CloneOptions {
        match &self.branch {
            Some(branch) => CloneOptions::new().with_branch(branch.clone()),
            None => CloneOptions::new(),
        }
    }
}

/// What it took to bring a working copy up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Cloned,
    Updated,
    /// The update failed and the tree was cloned from scratch.
    Recloned,
}

/// A synchronized working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// Absolute path of the working copy.
    pub path: PathBuf,
    pub operation: SyncOperation,
}

/// Keeps a local directory mirroring a remote git reference.
pub struct RepositorySync {
    vcs: Arc<dyn VersionControl>,
}

impl RepositorySync {
    pub fn new(vcs: Arc<dyn VersionControl>) -> Self {
        Self { vcs }
    }

    /// Clone when the target is absent, otherwise pull and hard-reset it.
    ///
    /// A failed update wipes the target and clones once more; if that clone
    /// fails too the error is final.
    #[tracing::instrument(level = "debug", skip(self, source), fields(url = %source.url, target = %source.target.display()), err(level = "debug"))]
    pub async fn sync(&self, source: &RemoteSource) -> ReleaseResult<SyncResult> {
        let target = absolute(&source.target)?;

        if !target.exists() {
            self.clone_into(source, &target).await?;
            return Ok(SyncResult {
                path: target,
                operation: SyncOperation::Cloned,
            });
        }

        match self.update(&target).await {
            Ok(()) => Ok(SyncResult {
                path: target,
                operation: SyncOperation::Updated,
            }),
            Err(e) => {
                warn!(target = %target.display(), error = %e, "Update failed, cloning again");
                remove_working_copy(&target)
                    .map_err(|remove| ReleaseError::sync_failed(source.url.as_str(), &target, remove))?;
                self.clone_into(source, &target).await?;
                Ok(SyncResult {
                    path: target,
                    operation: SyncOperation::Recloned,
                })
            }
        }
    }

    async fn clone_into(&self, source: &RemoteSource, target: &Path) -> ReleaseResult<()> {
        debug!(url = %source.url, branch = ?source.branch, "Cloning working copy");
        self.vcs
            .clone_repository(source.url.as_str(), target, &source.clone_options())
            .await
            .map_err(|e| ReleaseError::sync_failed(source.url.as_str(), target, e))
    }

    async fn update(&self, target: &Path) -> ReleaseResult<()> {
        let _scope = ScopedDirectory::enter(target)?;
        self.vcs.pull(target).await?;
        self.vcs.reset_hard(target, "HEAD").await
    }
}

fn absolute(path: &Path) -> ReleaseResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir().with_path("Failed to resolve", path)?.join(path))
}

fn remove_working_copy(target: &Path) -> ReleaseResult<()> {
    if target.is_dir() {
        fs::remove_dir_all(target).with_path("Failed to remove", target)
    } else {
        fs::remove_file(target).with_path("Failed to remove", target)
    }
}
