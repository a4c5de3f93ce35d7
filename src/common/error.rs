use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        message: String,
        value: Option<String>,
    },

    #[error("External command `{command}` failed: {}", describe_exit(.exit_code))]
    ExternalCommandFailed {
        command: String,
        exit_code: Option<i32>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Could not synchronize {url} into {}", .target.display())]
    SyncFailed {
        url: String,
        target: PathBuf,
        #[source]
        source: Box<ReleaseError>,
    },

    #[error("No artifact matching '{pattern}' in {}", .directory.display())]
    ArtifactNotFound { directory: PathBuf, pattern: String },

    #[error("No changes, '{current}' == '{last}'")]
    NoChanges { current: String, last: String },

    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

impl ReleaseError {
    pub fn invalid_argument(message: impl Into<String>, value: Option<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            value,
        }
    }

    pub fn command_failed(command: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::ExternalCommandFailed {
            command: command.into(),
            exit_code,
            source: None,
        }
    }

    pub fn command_failed_with_source(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::ExternalCommandFailed {
            command: command.into(),
            exit_code: None,
            source: Some(source),
        }
    }

    pub fn sync_failed(url: impl Into<String>, target: impl Into<PathBuf>, source: ReleaseError) -> Self {
        Self::SyncFailed {
            url: url.into(),
            target: target.into(),
            source: Box::new(source),
        }
    }

    pub fn artifact_not_found(directory: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self::ArtifactNotFound {
            directory: directory.into(),
            pattern: pattern.into(),
        }
    }

    pub fn no_changes(current: impl Into<String>, last: impl Into<String>) -> Self {
        Self::NoChanges {
            current: current.into(),
            last: last.into(),
        }
    }

    pub fn config_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            path,
        }
    }

    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Exit code of the failed child process, looking through sync failures.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExternalCommandFailed { exit_code, .. } => *exit_code,
            Self::SyncFailed { source, .. } => source.exit_code(),
            _ => None,
        }
    }

    pub fn is_no_changes(&self) -> bool {
        matches!(self, Self::NoChanges { .. })
    }
}

impl From<std::io::Error> for ReleaseError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_json::Error> for ReleaseError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}
