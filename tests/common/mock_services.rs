//! Mock services for testing
//!
//! Recording stand-ins for the version control and build tool seams so the
//! release pipeline can run without network access or a JVM.

use async_trait::async_trait;
use skla::common::error::ReleaseError;
use skla::common::result::ReleaseResult;
use skla::infrastructure::scm::{CloneOptions, VersionControl};
use skla::infrastructure::toolchain::{ModpackBuild, Toolchain};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Version control that records every call and keeps the distribution
/// tree's last commit message in memory.
pub struct MockVersionControl {
    /// Call history for verification
    call_history: Arc<Mutex<Vec<String>>>,
    head_sha: String,
    last_message: Arc<Mutex<String>>,
    /// Operation name that fails, e.g. `"pull"`
    failing_operation: Option<String>,
}

impl MockVersionControl {
    pub fn new(head_sha: &str) -> Self {
        Self {
            call_history: Arc::new(Mutex::new(Vec::new())),
            head_sha: head_sha.to_string(),
            last_message: Arc::new(Mutex::new("Initial commit".to_string())),
            failing_operation: None,
        }
    }

    pub fn with_last_message(self, message: &str) -> Self {
        *self.last_message.lock().unwrap() = message.to_string();
        self
    }

    pub fn failing(mut self, operation: &str) -> Self {
        self.failing_operation = Some(operation.to_string());
        self
    }

    /// Get call history
    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    /// Whether any recorded call starts with `operation`
    pub fn was_called(&self, operation: &str) -> bool {
        self.get_call_history().iter().any(|call| call.starts_with(operation))
    }

    fn record(&self, operation: &str, detail: impl AsRef<str>) -> ReleaseResult<()> {
        let detail = detail.as_ref();
        let call = if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{} {}", operation, detail)
        };
        self.call_history.lock().unwrap().push(call);

        if self.failing_operation.as_deref() == Some(operation) {
            return Err(ReleaseError::command_failed(format!("git {}", operation), Some(1)));
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

#[async_trait]
impl VersionControl for MockVersionControl {
    async fn clone_repository(&self, url: &str, dest_path: &Path, options: &CloneOptions) -> ReleaseResult<()> {
        self.record(
            "clone",
            format!("{} {} {}", url, file_name(dest_path), options.branch.as_deref().unwrap_or("-")),
        )?;
        fs::create_dir_all(dest_path.join(".git"))?;
        Ok(())
    }

    async fn pull(&self, repo_path: &Path) -> ReleaseResult<()> {
        self.record("pull", file_name(repo_path))
    }

    async fn reset_hard(&self, repo_path: &Path, revision: &str) -> ReleaseResult<()> {
        self.record("reset", format!("{} {}", file_name(repo_path), revision))
    }

    async fn apply_patch(&self, _repo_path: &Path, patch: &Path) -> ReleaseResult<()> {
        self.record("apply", file_name(patch))
    }

    async fn add_all(&self, repo_path: &Path) -> ReleaseResult<()> {
        self.record("add", file_name(repo_path))
    }

    async fn commit(&self, _repo_path: &Path, message: &str) -> ReleaseResult<()> {
        self.record("commit", message)?;
        *self.last_message.lock().unwrap() = message.to_string();
        Ok(())
    }

    async fn push(&self, repo_path: &Path) -> ReleaseResult<()> {
        self.record("push", file_name(repo_path))
    }

    async fn last_commit_sha(&self, _repo_path: &Path) -> ReleaseResult<String> {
        Ok(format!("{}\n", self.head_sha))
    }

    async fn last_commit_message(&self, _repo_path: &Path) -> ReleaseResult<String> {
        Ok(self.last_message.lock().unwrap().clone())
    }
}

/// Build tools that produce plausible outputs on disk.
#[derive(Default)]
pub struct MockToolchain {
    call_history: Arc<Mutex<Vec<String>>>,
}

impl MockToolchain {
    pub const MODULES: [&'static str; 3] = ["launcher-bootstrap", "launcher-fancy", "launcher-builder"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.call_history.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Toolchain for MockToolchain {
    async fn build_launcher(&self, launcher_dir: &Path) -> ReleaseResult<()> {
        self.record("build".to_string());
        for module in Self::MODULES {
            let libs = launcher_dir.join(module).join("build").join("libs");
            fs::create_dir_all(&libs)?;
            fs::write(libs.join(format!("{}-4.3-sources.jar", module)), "sources")?;
            fs::write(libs.join(format!("{}-4.3-all.jar", module)), module)?;
        }
        Ok(())
    }

    async fn build_modpack(&self, build: &ModpackBuild) -> ReleaseResult<()> {
        self.record(format!("modpack {} {}", build.version, file_name(&build.builder_jar)));
        fs::create_dir_all(build.output_dir.join("objects"))?;
        fs::write(build.manifest_dest(), r#"{"version":"built"}"#)?;
        Ok(())
    }

    async fn export_server(&self, builder_jar: &Path, source: &Path, dest: &Path) -> ReleaseResult<()> {
        self.record(format!("server {} {}", file_name(builder_jar), file_name(source)));
        fs::create_dir_all(dest)?;
        Ok(())
    }

    async fn pack_launcher(&self, launcher_jar: &Path, target: &Path) -> ReleaseResult<()> {
        self.record(format!("pack {} {}", file_name(launcher_jar), file_name(target)));
        fs::write(target, "packed")?;
        Ok(())
    }
}
