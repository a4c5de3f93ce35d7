use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::package::PackageMetadata;
use crate::common::result::{ReleaseResult, ResultExt};

/// Launcher build identifier: `<launcher commit>-<patch version>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LauncherVersion(String);

impl LauncherVersion {
    pub fn compose(commit: &str, patch_version: &str) -> Self {
        Self(format!("{}-{}", commit.trim(), patch_version.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the packed launcher for this version.
    pub fn pack_file_name(&self) -> String {
        format!("launcher-{}.jar.pack", self.0)
    }
}

impl fmt::Display for LauncherVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Commit message that identifies one release in the distribution tree.
///
/// The message is deterministic, so comparing it to the last commit tells
/// whether this exact release was already published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMessage(String);

impl ReleaseMessage {
    pub fn new(package_version: &str, launcher_version: &LauncherVersion) -> Self {
        Self(format!(
            "Version {} (launcher: {}), autogenerated.",
            package_version, launcher_version
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, last_commit_message: &str) -> bool {
        self.0 == last_commit_message.trim()
    }
}

impl fmt::Display for ReleaseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `latest.json`: where the current launcher lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestManifest {
    pub version: String,
    pub url: String,
}

/// One entry of `packages.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    pub title: String,
    pub version: String,
    pub location: String,
}

/// `packages.json`: the packages the launcher offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagesManifest {
    pub minimum_version: u32,
    pub packages: Vec<PackageEntry>,
}

/// Both launcher manifests for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseManifests {
    pub latest: LatestManifest,
    pub packages: PackagesManifest,
}

impl ReleaseManifests {
    pub const LATEST_FILE: &'static str = "latest.json";
    pub const PACKAGES_FILE: &'static str = "packages.json";

    pub fn new(
        package: &PackageMetadata,
        launcher_version: &LauncherVersion,
        download_base_url: &str,
    ) -> Self {
        let base = download_base_url.trim_end_matches('/');
        Self {
            latest: LatestManifest {
                version: launcher_version.to_string(),
                url: format!("{}/data/{}", base, launcher_version.pack_file_name()),
            },
            packages: PackagesManifest {
                minimum_version: 1,
                packages: vec![PackageEntry {
                    name: package.name.clone(),
                    title: package.title.clone(),
                    version: package.version.clone(),
                    location: format!("../dist/{}/modpack.json", package.name),
                }],
            },
        }
    }

    /// Write both files into `jsons_dir`, replacing previous contents.
    #[tracing::instrument(level = "debug", skip(self), err(level = "debug"), ret)]
    pub fn write(&self, jsons_dir: &Path) -> ReleaseResult<Vec<PathBuf>> {
        fs::create_dir_all(jsons_dir).with_path("Failed to create", jsons_dir)?;

        let latest_path = jsons_dir.join(Self::LATEST_FILE);
        fs::write(&latest_path, serde_json::to_string(&self.latest)?)
            .with_path("Failed to write", &latest_path)?;

        let packages_path = jsons_dir.join(Self::PACKAGES_FILE);
        fs::write(&packages_path, serde_json::to_string(&self.packages)?)
            .with_path("Failed to write", &packages_path)?;

        Ok(vec![latest_path, packages_path])
    }
}
