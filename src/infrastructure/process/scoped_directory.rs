use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::common::error::ReleaseError;
use crate::common::result::{ReleaseResult, ResultExt};

/// Guard that changes the process working directory and restores the
/// previous one when dropped.
///
/// Guards nest like a stack: each one restores the directory that was current
/// when it was entered, not the directory the process started in. The working
/// directory is process-wide, so nothing else may depend on it while a guard
/// is alive.
#[derive(Debug)]
pub struct ScopedDirectory {
    previous: PathBuf,
    target: PathBuf,
}

impl ScopedDirectory {
    /// Enter `target`, remembering the current directory.
    pub fn enter(target: impl AsRef<Path>) -> ReleaseResult<Self> {
        let target = target.as_ref();
        if target.as_os_str().is_empty() {
            return Err(ReleaseError::invalid_argument(
                "Scoped directory target must not be empty",
                None,
            ));
        }

        let previous = env::current_dir().with_path("Failed to read working directory", target)?;
        env::set_current_dir(target).with_path("Failed to enter directory", target)?;
        debug!(from = %previous.display(), to = %target.display(), "Entered directory");

        Ok(Self {
            previous,
            target: target.to_path_buf(),
        })
    }

    /// Directory that will be restored on exit.
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Drop for ScopedDirectory {
    fn drop(&mut self) {
        match env::set_current_dir(&self.previous) {
            Ok(()) => debug!(to = %self.previous.display(), "Restored directory"),
            Err(e) => warn!(
                to = %self.previous.display(),
                error = %e,
                "Failed to restore working directory"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn canonical(path: &Path) -> PathBuf {
        path.canonicalize().unwrap()
    }

    #[test]
    #[serial]
    fn test_enter_and_restore() {
        let temp_dir = TempDir::new().unwrap();
        let before = env::current_dir().unwrap();

        {
            let scope = ScopedDirectory::enter(temp_dir.path()).unwrap();
            assert_eq!(canonical(&env::current_dir().unwrap()), canonical(temp_dir.path()));
            assert_eq!(scope.previous(), before.as_path());
        }

        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_restores_when_body_fails() {
        let temp_dir = TempDir::new().unwrap();
        let before = env::current_dir().unwrap();

        let result: ReleaseResult<()> = (|| {
            let _scope = ScopedDirectory::enter(temp_dir.path())?;
            Err(ReleaseError::config_error("boom", None))
        })();

        assert!(result.is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_nested_scopes_restore_like_a_stack() {
        let outer_dir = TempDir::new().unwrap();
        let inner_dir = TempDir::new().unwrap();
        let before = env::current_dir().unwrap();

        let outer = ScopedDirectory::enter(outer_dir.path()).unwrap();
        {
            let _inner = ScopedDirectory::enter(inner_dir.path()).unwrap();
            assert_eq!(canonical(&env::current_dir().unwrap()), canonical(inner_dir.path()));
        }
        assert_eq!(canonical(&env::current_dir().unwrap()), canonical(outer_dir.path()));
        drop(outer);

        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_empty_target_is_rejected_without_moving() {
        let before = env::current_dir().unwrap();
        let result = ScopedDirectory::enter("");
        assert!(matches!(result, Err(ReleaseError::InvalidArgument { .. })));
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_missing_target_leaves_directory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let before = env::current_dir().unwrap();
        let result = ScopedDirectory::enter(temp_dir.path().join("absent"));
        assert!(matches!(result, Err(ReleaseError::FileSystemError { .. })));
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
