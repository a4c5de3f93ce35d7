use crate::common::error::ReleaseError;
use std::path::Path;

/// Result alias used throughout the crate.
///
/// # Examples
///
/// ```
/// use skla::common::result::ReleaseResult;
/// use skla::common::error::ReleaseError;
///
/// fn example_with_error() -> ReleaseResult<()> {
///     Err(ReleaseError::config_error("No patches", None))
/// }
/// assert!(example_with_error().is_err());
/// ```
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Attach path context to I/O results.
pub trait ResultExt<T> {
    /// Convert an I/O error into a [`ReleaseError::FileSystemError`] naming `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skla::common::result::{ReleaseResult, ResultExt};
    /// use std::path::Path;
    ///
    /// let path = Path::new("/definitely/not/here.txt");
    /// let result: ReleaseResult<String> =
    ///     std::fs::read_to_string(path).with_path("Failed to read", path);
    /// assert!(result.unwrap_err().to_string().contains("Failed to read"));
    /// ```
    fn with_path(self, message: &str, path: &Path) -> ReleaseResult<T>;
}

impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn with_path(self, message: &str, path: &Path) -> ReleaseResult<T> {
        self.map_err(|e| {
            ReleaseError::filesystem_error_with_source(
                format!("{} {}: {}", message, path.display(), e),
                Some(path.to_path_buf()),
                e,
            )
        })
    }
}

/// Helpers for turning missing values into errors.
pub trait OptionExt<T> {
    /// Map `None` to a [`ReleaseError::ConfigurationError`].
    fn ok_or_config_error(self, message: impl Into<String>) -> ReleaseResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_config_error(self, message: impl Into<String>) -> ReleaseResult<T> {
        self.ok_or_else(|| ReleaseError::config_error(message, None))
    }
}
