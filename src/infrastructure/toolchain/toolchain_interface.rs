use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::common::result::ReleaseResult;

/// Inputs of one modpack build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModpackBuild {
    pub builder_jar: PathBuf,
    pub version: String,
    pub input_dir: PathBuf,
    /// Receives the client files and `modpack.json`.
    pub output_dir: PathBuf,
}

impl ModpackBuild {
    pub fn manifest_dest(&self) -> PathBuf {
        self.output_dir.join("modpack.json")
    }
}

/// External build tools the release depends on.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Build every launcher module inside `launcher_dir`.
    async fn build_launcher(&self, launcher_dir: &Path) -> ReleaseResult<()>;

    /// Produce the client distribution of a modpack.
    async fn build_modpack(&self, build: &ModpackBuild) -> ReleaseResult<()>;

    /// Copy the server-side files of `source` into `dest`.
    async fn export_server(&self, builder_jar: &Path, source: &Path, dest: &Path) -> ReleaseResult<()>;

    /// Pack `launcher_jar` into `target`.
    async fn pack_launcher(&self, launcher_jar: &Path, target: &Path) -> ReleaseResult<()>;
}
