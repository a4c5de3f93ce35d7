use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::common::error::ReleaseError;
use crate::common::result::{OptionExt, ReleaseResult, ResultExt};
use crate::domain::entities::package::{read_trimmed, VERSION_FILE};

/// Absolute form of the directory holding the modpack sources.
pub fn resolve_input_dir(input: &Path) -> ReleaseResult<PathBuf> {
    if input.as_os_str().is_empty() {
        return Err(ReleaseError::invalid_argument("Input directory is empty", None));
    }

    let absolute = if input.is_absolute() {
        input.to_path_buf()
    } else {
        std::env::current_dir()
            .with_path("Failed to resolve", input)?
            .join(input)
    };

    if !absolute.is_dir() {
        return Err(ReleaseError::invalid_argument(
            "Input directory does not exist",
            Some(absolute.display().to_string()),
        ));
    }
    Ok(absolute)
}

/// Patch counter stored in `<patches>/version.txt`.
#[tracing::instrument(level = "debug", err(level = "debug"), ret)]
pub fn read_patch_version(patches_dir: &Path) -> ReleaseResult<String> {
    let version_file = patches_dir.join(VERSION_FILE);
    if !version_file.is_file() {
        return Err(ReleaseError::config_error(
            format!("Missing patch version file {}", version_file.display()),
            Some(version_file),
        ));
    }
    read_trimmed(&version_file)
}

/// Patch files in name order, without the version file.
pub fn list_patches(patches_dir: &Path) -> ReleaseResult<Vec<PathBuf>> {
    let entries = match fs::read_dir(patches_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ReleaseError::config_error(
                format!("Patches directory {} does not exist", patches_dir.display()),
                Some(patches_dir.to_path_buf()),
            ))
        }
        Err(e) => return Err(e).with_path("Failed to list", patches_dir),
    };

    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_path("Failed to list", patches_dir)?;
    paths.sort();

    let mut patches = Vec::new();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_config_error(format!("Unnamed patch entry {}", path.display()))?;
        if name == VERSION_FILE {
            continue;
        }
        if !path.is_file() {
            return Err(ReleaseError::config_error(
                format!("Non-file in patches: {}", path.display()),
                Some(path),
            ));
        }
        patches.push(path);
    }
    Ok(patches)
}

/// Move `source` to `dest`, replacing whatever `dest` held before.
#[tracing::instrument(level = "debug", err(level = "debug"))]
pub fn replace_directory(source: &Path, dest: &Path) -> ReleaseResult<()> {
    if dest.exists() {
        debug!(dest = %dest.display(), "Removing previous copy");
        fs::remove_dir_all(dest).with_path("Failed to remove", dest)?;
    } else if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_path("Failed to create", parent)?;
    }

    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    // rename fails across filesystems
    debug!(source = %source.display(), dest = %dest.display(), "Copying instead of renaming");
    copy_tree(source, dest)?;
    fs::remove_dir_all(source).with_path("Failed to remove", source)
}

fn copy_tree(source: &Path, dest: &Path) -> ReleaseResult<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            let message = format!("Failed to walk {}: {}", path.display(), e);
            match e.into_io_error() {
                Some(io_error) => ReleaseError::filesystem_error_with_source(message, Some(path), io_error),
                None => ReleaseError::filesystem_error(message, Some(path)),
            }
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| ReleaseError::filesystem_error("Walked outside of the source tree", Some(entry.path().to_path_buf())))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).with_path("Failed to create", &target)?;
        } else {
            fs::copy(entry.path(), &target).with_path("Failed to copy", entry.path())?;
        }
    }
    Ok(())
}

/// Delete `path` if it is a leftover file from an earlier run.
pub fn remove_stale_file(path: &Path) -> ReleaseResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed stale file");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_path("Failed to remove", path),
    }
}
