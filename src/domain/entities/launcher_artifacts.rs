use std::fs;
use std::path::{Path, PathBuf};

use crate::common::error::ReleaseError;
use crate::common::result::{ReleaseResult, ResultExt};

/// Substring that marks the fat jar among a module's build outputs.
pub const ALL_JAR_MARKER: &str = "all";

/// The three launcher jars a release needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherArtifacts {
    pub bootstrap: PathBuf,
    pub fancy: PathBuf,
    pub builder: PathBuf,
}

impl LauncherArtifacts {
    pub const BOOTSTRAP_MODULE: &'static str = "launcher-bootstrap";
    pub const FANCY_MODULE: &'static str = "launcher-fancy";
    pub const BUILDER_MODULE: &'static str = "launcher-builder";

    /// Find the fat jar of each module under `<module>/build/libs`.
    #[tracing::instrument(level = "debug", err(level = "debug"))]
    pub fn locate(launcher_dir: &Path) -> ReleaseResult<Self> {
        Ok(Self {
            bootstrap: find_all_jar(&Self::libs_dir(launcher_dir, Self::BOOTSTRAP_MODULE))?,
            fancy: find_all_jar(&Self::libs_dir(launcher_dir, Self::FANCY_MODULE))?,
            builder: find_all_jar(&Self::libs_dir(launcher_dir, Self::BUILDER_MODULE))?,
        })
    }

    pub fn libs_dir(launcher_dir: &Path, module: &str) -> PathBuf {
        launcher_dir.join(module).join("build").join("libs")
    }
}

/// First entry of `dir`, in name order, whose file name contains `all`.
pub fn find_all_jar(dir: &Path) -> ReleaseResult<PathBuf> {
    let mut names: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .collect::<Result<Vec<_>, _>>()
            .with_path("Failed to list", dir)?
            .into_iter()
            .map(|entry| entry.path())
            .collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e).with_path("Failed to list", dir),
    };
    names.sort();

    names
        .into_iter()
        .find(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().contains(ALL_JAR_MARKER))
                .unwrap_or(false)
        })
        .ok_or_else(|| ReleaseError::artifact_not_found(dir, ALL_JAR_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_all_jar_is_selected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bootstrap-sources.jar"), "").unwrap();
        fs::write(temp_dir.path().join("bootstrap-all.jar"), "").unwrap();

        let jar = find_all_jar(temp_dir.path()).unwrap();
        assert_eq!(jar, temp_dir.path().join("bootstrap-all.jar"));
    }

    #[test]
    fn test_first_match_in_name_order_wins() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b-all.jar"), "").unwrap();
        fs::write(temp_dir.path().join("a-all.jar"), "").unwrap();

        assert_eq!(find_all_jar(temp_dir.path()).unwrap(), temp_dir.path().join("a-all.jar"));
    }

    #[test]
    fn test_empty_directory_is_artifact_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = find_all_jar(temp_dir.path());
        assert!(matches!(result, Err(ReleaseError::ArtifactNotFound { .. })));
    }

    #[test]
    fn test_missing_directory_is_artifact_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = find_all_jar(&temp_dir.path().join("build").join("libs"));
        assert!(matches!(result, Err(ReleaseError::ArtifactNotFound { .. })));
    }

    #[test]
    fn test_locate_all_modules() {
        let temp_dir = TempDir::new().unwrap();
        for module in ["launcher-bootstrap", "launcher-fancy", "launcher-builder"] {
            let libs = LauncherArtifacts::libs_dir(temp_dir.path(), module);
            fs::create_dir_all(&libs).unwrap();
            fs::write(libs.join(format!("{}-4.0-all.jar", module)), "").unwrap();
        }

        let artifacts = LauncherArtifacts::locate(temp_dir.path()).unwrap();
        assert!(artifacts.fancy.ends_with("launcher-fancy/build/libs/launcher-fancy-4.0-all.jar"));
        assert!(artifacts.builder.to_string_lossy().contains("launcher-builder-4.0-all"));
    }
}
