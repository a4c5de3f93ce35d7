use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::sync_repository::{RemoteSource, RepositorySync, SyncResult};
use crate::common::error::ReleaseError;
use crate::common::result::{ReleaseResult, ResultExt};
use crate::domain::entities::{
    LauncherArtifacts, LauncherVersion, PackageMetadata, ReleaseManifests, ReleaseMessage,
};
use crate::domain::value_objects::RemoteUrl;
use crate::infrastructure::filesystem::release_files::{
    list_patches, read_patch_version, remove_stale_file, replace_directory, resolve_input_dir,
};
use crate::infrastructure::scm::VersionControl;
use crate::infrastructure::toolchain::{ModpackBuild, Toolchain};

pub const DEFAULT_LAUNCHER_URL: &str = "https://github.com/SKCraft/Launcher.git";
pub const DEFAULT_LAUNCHER_BRANCH: &str = "master";
pub const DEFAULT_DIST_URL: &str = "git@github.com:kenzierocks/Launcher.git";
pub const DEFAULT_DIST_BRANCH: &str = "gh-pages";
pub const DEFAULT_PATCHES_DIR: &str = "patches";
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "http://kenzierocks.github.io/Launcher";

pub const LAUNCHER_DIR: &str = "launcher";
pub const DIST_DIR: &str = "downloads";
pub const CLIENT_OUTPUT_DIR: &str = "output-client";
pub const SERVER_OUTPUT_DIR: &str = "output-server";

/// A remote tree the pipeline keeps a working copy of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    pub url: String,
    pub branch: Option<String>,
    /// Working copy location, relative to the work directory.
    pub dir: PathBuf,
}

impl TreeConfig {
    pub fn new(url: impl Into<String>, branch: Option<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            branch,
            dir: dir.into(),
        }
    }

    fn source(&self, work_dir: &Path) -> ReleaseResult<RemoteSource> {
        let url = RemoteUrl::new(&self.url)
            .map_err(|e| ReleaseError::invalid_argument(e.to_string(), Some(self.url.clone())))?;
        let source = RemoteSource::new(url, work_dir.join(&self.dir));
        Ok(match &self.branch {
            Some(branch) => source.with_branch(branch.clone()),
            None => source,
        })
    }
}

/// Release pipeline settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding both working copies and the build outputs.
    pub work_dir: PathBuf,

    pub launcher: TreeConfig,

    /// Distribution tree (the published site).
    pub dist: TreeConfig,

    /// Patches applied to the launcher, relative to the work directory.
    pub patches_dir: PathBuf,

    /// Modpack sources with `modpack.json` and `version.txt`. When unset the
    /// pipeline asks its [`InputDirProvider`] once both trees are synced.
    pub input_dir: Option<PathBuf>,

    /// Site root the launcher downloads updates from.
    pub download_base_url: String,
}

impl PipelineConfig {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            launcher: TreeConfig::new(
                DEFAULT_LAUNCHER_URL,
                Some(DEFAULT_LAUNCHER_BRANCH.to_string()),
                LAUNCHER_DIR,
            ),
            dist: TreeConfig::new(DEFAULT_DIST_URL, Some(DEFAULT_DIST_BRANCH.to_string()), DIST_DIR),
            patches_dir: PathBuf::from(DEFAULT_PATCHES_DIR),
            input_dir: None,
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
        }
    }

    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(input_dir.into());
        self
    }

    pub fn with_launcher(mut self, url: impl Into<String>, branch: Option<String>) -> Self {
        self.launcher.url = url.into();
        self.launcher.branch = branch;
        self
    }

    pub fn with_dist(mut self, url: impl Into<String>, branch: Option<String>) -> Self {
        self.dist.url = url.into();
        self.dist.branch = branch;
        self
    }

    pub fn with_patches_dir(mut self, patches_dir: impl Into<PathBuf>) -> Self {
        self.patches_dir = patches_dir.into();
        self
    }

    pub fn with_download_base_url(mut self, url: impl Into<String>) -> Self {
        self.download_base_url = url.into();
        self
    }
}

/// Facts gathered by a completed release.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub launcher: SyncResult,
    pub dist: SyncResult,
    pub input_dir: PathBuf,
    pub package: PackageMetadata,
    pub patch_version: String,
    pub launcher_version: LauncherVersion,
    pub message: ReleaseMessage,
    pub artifacts: LauncherArtifacts,
    pub client_output: PathBuf,
    pub server_output: PathBuf,
}

/// Source of the modpack input directory for runs configured without one.
pub trait InputDirProvider: Send + Sync {
    fn input_dir(&self) -> ReleaseResult<PathBuf>;
}

/// Builds a modpack release and publishes it to the distribution tree.
pub struct ReleasePipeline {
    config: PipelineConfig,
    vcs: Arc<dyn VersionControl>,
    toolchain: Arc<dyn Toolchain>,
    input_provider: Option<Arc<dyn InputDirProvider>>,
}

impl ReleasePipeline {
    pub fn new(config: PipelineConfig, vcs: Arc<dyn VersionControl>, toolchain: Arc<dyn Toolchain>) -> Self {
        Self {
            config,
            vcs,
            toolchain,
            input_provider: None,
        }
    }

    pub fn with_input_provider(mut self, provider: Arc<dyn InputDirProvider>) -> Self {
        self.input_provider = Some(provider);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every step in order. Nothing in the distribution tree changes when
    /// its last commit already describes this release.
    pub async fn run(&self) -> ReleaseResult<PipelineState> {
        let work_dir = absolute(&self.config.work_dir)?;
        info!(work_dir = %work_dir.display(), "Starting release");

        // 1-2. working copies
        let sync = RepositorySync::new(self.vcs.clone());
        let launcher = self.sync_tree(&sync, &self.config.launcher, &work_dir).await?;
        let dist = self.sync_tree(&sync, &self.config.dist, &work_dir).await?;

        // 3-4. inputs
        let input_dir = resolve_input_dir(&self.requested_input_dir()?)?;
        println!("{} Loading from {}", "::".blue().bold(), input_dir.display());
        let package = PackageMetadata::discover(&input_dir)?;
        let patches_dir = work_dir.join(&self.config.patches_dir);
        let patch_version = read_patch_version(&patches_dir)?;

        // 5. versioning
        let commit = self.vcs.last_commit_sha(&launcher.path).await?;
        let launcher_version = LauncherVersion::compose(&commit, &patch_version);
        println!("{} Launcher version {}", "::".blue().bold(), launcher_version.to_string().bold());

        // 6. idempotency
        let message = ReleaseMessage::new(&package.version, &launcher_version);
        self.check_for_changes(&dist.path, &message).await?;

        // 7-8. launcher
        self.apply_patches(&launcher.path, &patches_dir).await?;
        let artifacts = self.build_launcher(&launcher.path).await?;
        println!("Found LBO at {}", artifacts.bootstrap.display());
        println!("Found LFA at {}", artifacts.fancy.display());
        println!("Found LBL at {}", artifacts.builder.display());

        // 9. modpack
        let client_output = work_dir.join(CLIENT_OUTPUT_DIR);
        let server_output = work_dir.join(SERVER_OUTPUT_DIR);
        self.build_modpack(&artifacts, &package, &input_dir, &client_output, &server_output)
            .await?;

        // 10-12. distribution tree contents
        let data_dir = dist.path.join("data");
        replace_directory(&client_output, &data_dir.join("dist").join(&package.name))?;
        self.pack_launcher(&artifacts, &launcher_version, &data_dir).await?;
        let written = ReleaseManifests::new(&package, &launcher_version, &self.config.download_base_url)
            .write(&data_dir.join("jsons"))?;
        debug!(files = ?written, "Wrote manifests");

        // 13. publish
        self.publish(&dist.path, &message).await?;
        println!("{} Released {}", "✓".green().bold(), message);

        Ok(PipelineState {
            launcher,
            dist,
            input_dir,
            package,
            patch_version,
            launcher_version,
            message,
            artifacts,
            client_output,
            server_output,
        })
    }

    fn requested_input_dir(&self) -> ReleaseResult<PathBuf> {
        if let Some(dir) = &self.config.input_dir {
            return Ok(dir.clone());
        }
        match &self.input_provider {
            Some(provider) => provider.input_dir(),
            None => Err(ReleaseError::invalid_argument("No input directory given", None)),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, sync, tree), fields(url = %tree.url), err(level = "debug"), ret)]
    async fn sync_tree(&self, sync: &RepositorySync, tree: &TreeConfig, work_dir: &Path) -> ReleaseResult<SyncResult> {
        let source = tree.source(work_dir)?;
        println!(
            "{} Cloning {} to {}",
            "::".blue().bold(),
            source.url,
            source.target.display()
        );
        let result = sync.sync(&source).await?;
        debug!(path = %result.path.display(), operation = ?result.operation, "Synchronized");
        Ok(result)
    }

    #[tracing::instrument(level = "debug", skip(self, message), fields(message = %message), err(level = "debug"))]
    async fn check_for_changes(&self, dist_dir: &Path, message: &ReleaseMessage) -> ReleaseResult<()> {
        let last = self.vcs.last_commit_message(dist_dir).await?;
        if message.matches(&last) {
            return Err(ReleaseError::no_changes(message.as_str(), last.trim()));
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), err(level = "debug"))]
    async fn apply_patches(&self, launcher_dir: &Path, patches_dir: &Path) -> ReleaseResult<()> {
        for patch in list_patches(patches_dir)? {
            let name = patch
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("{} Patching {}", "::".blue().bold(), name);
            self.vcs.apply_patch(launcher_dir, &patch).await?;
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), err(level = "debug"), ret)]
    async fn build_launcher(&self, launcher_dir: &Path) -> ReleaseResult<LauncherArtifacts> {
        self.toolchain.build_launcher(launcher_dir).await?;
        LauncherArtifacts::locate(launcher_dir)
    }

    #[tracing::instrument(level = "debug", skip(self, artifacts, package), fields(version = %package.version), err(level = "debug"))]
    async fn build_modpack(
        &self,
        artifacts: &LauncherArtifacts,
        package: &PackageMetadata,
        input_dir: &Path,
        client_output: &Path,
        server_output: &Path,
    ) -> ReleaseResult<()> {
        let build = ModpackBuild {
            builder_jar: artifacts.builder.clone(),
            version: package.version.clone(),
            input_dir: input_dir.to_path_buf(),
            output_dir: client_output.to_path_buf(),
        };
        self.toolchain.build_modpack(&build).await?;
        self.toolchain
            .export_server(&artifacts.builder, &input_dir.join("src"), server_output)
            .await
    }

    #[tracing::instrument(level = "debug", skip(self, artifacts, launcher_version), fields(launcher_version = %launcher_version), err(level = "debug"))]
    async fn pack_launcher(
        &self,
        artifacts: &LauncherArtifacts,
        launcher_version: &LauncherVersion,
        data_dir: &Path,
    ) -> ReleaseResult<()> {
        std::fs::create_dir_all(data_dir).with_path("Failed to create", data_dir)?;
        let target = data_dir.join(launcher_version.pack_file_name());
        remove_stale_file(&target)?;
        self.toolchain.pack_launcher(&artifacts.fancy, &target).await
    }

    #[tracing::instrument(level = "debug", skip(self, message), fields(message = %message), err(level = "debug"))]
    async fn publish(&self, dist_dir: &Path, message: &ReleaseMessage) -> ReleaseResult<()> {
        self.vcs.add_all(dist_dir).await?;
        self.vcs.commit(dist_dir, message.as_str()).await?;
        self.vcs.push(dist_dir).await
    }
}

fn absolute(path: &Path) -> ReleaseResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir().with_path("Failed to resolve", path)?.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = PipelineConfig::new("/work");
        assert_eq!(config.input_dir, None);
        assert_eq!(config.launcher.url, "https://github.com/SKCraft/Launcher.git");
        assert_eq!(config.launcher.branch.as_deref(), Some("master"));
        assert_eq!(config.dist.url, "git@github.com:kenzierocks/Launcher.git");
        assert_eq!(config.dist.branch.as_deref(), Some("gh-pages"));
        assert_eq!(config.dist.dir, PathBuf::from("downloads"));
        assert_eq!(config.patches_dir, PathBuf::from("patches"));
    }

    #[test]
    fn test_config_builders() {
        let config = PipelineConfig::new("/work")
            .with_input_dir("/in")
            .with_launcher("/srv/launcher", None)
            .with_dist("/srv/site", Some("main".to_string()))
            .with_patches_dir("/srv/patches")
            .with_download_base_url("https://example.com/site");

        assert_eq!(config.input_dir, Some(PathBuf::from("/in")));
        assert_eq!(config.launcher.branch, None);
        assert_eq!(config.dist.branch.as_deref(), Some("main"));
        assert_eq!(config.download_base_url, "https://example.com/site");

        let source = config.dist.source(Path::new("/work")).unwrap();
        assert_eq!(source.target, PathBuf::from("/work/downloads"));
        assert!(source.url.is_local());
    }

    #[test]
    fn test_invalid_remote_is_invalid_argument() {
        let tree = TreeConfig::new("--upload-pack=evil", None, "launcher");
        assert!(matches!(
            tree.source(Path::new("/work")),
            Err(ReleaseError::InvalidArgument { .. })
        ));
    }
}
