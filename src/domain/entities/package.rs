use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::common::error::ReleaseError;
use crate::common::result::{ReleaseResult, ResultExt};

pub const MODPACK_DESCRIPTOR: &str = "modpack.json";
pub const VERSION_FILE: &str = "version.txt";

/// Fields of `modpack.json` the release needs. Everything else in the file is
/// left to the launcher builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModpackDescriptor {
    pub name: String,
    pub title: String,
}

/// Identity and version of the package being released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub title: String,
    pub version: String,
}

impl PackageMetadata {
    /// Read `modpack.json` and `version.txt` from the input directory.
    pub fn discover(input_dir: &Path) -> ReleaseResult<Self> {
        let descriptor_path = input_dir.join(MODPACK_DESCRIPTOR);
        let raw = fs::read_to_string(&descriptor_path).with_path("Failed to read", &descriptor_path)?;
        let descriptor: ModpackDescriptor = serde_json::from_str(&raw).map_err(|e| {
            ReleaseError::serialization_error_with_source(
                format!("Invalid {}", descriptor_path.display()),
                e,
            )
        })?;

        let version = read_trimmed(&input_dir.join(VERSION_FILE))?;

        Ok(Self {
            name: descriptor.name,
            title: descriptor.title,
            version,
        })
    }
}

/// Contents of a one-line text file without surrounding whitespace.
pub fn read_trimmed(path: &Path) -> ReleaseResult<String> {
    let content = fs::read_to_string(path).with_path("Failed to read", path)?;
    Ok(content.trim().to_string())
}
