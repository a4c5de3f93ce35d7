use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::toolchain_interface::{ModpackBuild, Toolchain};
use crate::common::result::ReleaseResult;
use crate::infrastructure::process::{CommandArgs, CommandProxy, Executable, ProcessRunner, TtyProfile};

pub const SERVER_EXPORT_CLASS: &str = "com.skcraft.launcher.builder.ServerCopyExport";

/// SKCraft launcher tooling: Gradle wrapper, `java` and `pack200`.
#[derive(Debug, Clone)]
pub struct SkcraftToolchain {
    /// Directory the JVM tools run in.
    work_dir: PathBuf,
    profile: TtyProfile,
}

impl SkcraftToolchain {
    pub fn new(work_dir: impl Into<PathBuf>, profile: TtyProfile) -> Self {
        Self {
            work_dir: work_dir.into(),
            profile,
        }
    }

    fn java(&self) -> CommandProxy {
        CommandProxy::new(Executable::OnPath("java".to_string()), &self.work_dir, self.profile.clone())
    }

    pub(crate) fn modpack_command(&self, build: &ModpackBuild) -> CommandProxy {
        self.java()
            .with_base_args(["-jar".to_string(), build.builder_jar.to_string_lossy().into_owned()])
    }

    pub(crate) fn modpack_args(build: &ModpackBuild) -> CommandArgs {
        CommandArgs::new()
            .arg("--version")
            .arg(build.version.as_str())
            .arg("--input")
            .path_arg(&build.input_dir)
            .arg("--output")
            .path_arg(&build.output_dir)
            .arg("--manifest-dest")
            .path_arg(&build.manifest_dest())
    }

    pub(crate) fn server_export_args(source: &Path, dest: &Path) -> CommandArgs {
        CommandArgs::new()
            .arg("--source")
            .path_arg(source)
            .arg("--dest")
            .path_arg(dest)
    }
}

#[async_trait]
impl Toolchain for SkcraftToolchain {
    async fn build_launcher(&self, launcher_dir: &Path) -> ReleaseResult<()> {
        debug!(dir = %launcher_dir.display(), "Building launcher");
        CommandProxy::gradle_wrapper(launcher_dir, self.profile.clone())
            .verb("build")
            .call(CommandArgs::new())
            .await?;
        Ok(())
    }

    async fn build_modpack(&self, build: &ModpackBuild) -> ReleaseResult<()> {
        debug!(version = %build.version, input = %build.input_dir.display(), "Building modpack");
        self.modpack_command(build)
            .call(Self::modpack_args(build))
            .await?;
        Ok(())
    }

    async fn export_server(&self, builder_jar: &Path, source: &Path, dest: &Path) -> ReleaseResult<()> {
        debug!(source = %source.display(), dest = %dest.display(), "Exporting server files");
        self.java()
            .with_base_args(["-cp".to_string(), builder_jar.to_string_lossy().into_owned()])
            .verb(SERVER_EXPORT_CLASS)
            .call(Self::server_export_args(source, dest))
            .await?;
        Ok(())
    }

    async fn pack_launcher(&self, launcher_jar: &Path, target: &Path) -> ReleaseResult<()> {
        debug!(jar = %launcher_jar.display(), target = %target.display(), "Packing launcher");
        ProcessRunner::new("pack200", self.profile.clone())
            .call(
                CommandArgs::new()
                    .arg("--no-gzip")
                    .path_arg(target)
                    .path_arg(launcher_jar),
            )
            .await?;
        Ok(())
    }
}
