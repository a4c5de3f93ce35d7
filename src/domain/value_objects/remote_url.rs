use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq)]
pub enum RemoteUrlError {
    #[error("Empty remote URL")]
    Empty,

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Invalid characters in URL: {0}")]
    InvalidCharacters(String),
}

/// How git will reach a remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKind {
    /// `scheme://` URL
    Url,
    /// scp-like `user@host:path`
    Scp,
    /// Path on the local filesystem
    Local,
}

/// Location of a remote repository as git understands it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteUrl {
    url: String,
    kind: RemoteKind,
}

const SUPPORTED_SCHEMES: [&str; 6] = ["https", "http", "ssh", "git", "file", "git+ssh"];

fn scp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9.-]+:[^\s]+$").expect("scp pattern is valid")
    })
}

impl RemoteUrl {
    pub fn new(url: &str) -> Result<Self, RemoteUrlError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(RemoteUrlError::Empty);
        }

        if let Some(ch) = trimmed.chars().find(|c| c.is_control()) {
            return Err(RemoteUrlError::InvalidCharacters(format!(
                "Control character detected: {:?}",
                ch
            )));
        }

        // git would read a leading dash as an option
        if trimmed.starts_with('-') {
            return Err(RemoteUrlError::InvalidFormat(format!(
                "URL must not start with '-': {}",
                trimmed
            )));
        }

        let kind = if trimmed.contains("://") {
            let parsed = Url::parse(trimmed)
                .map_err(|e| RemoteUrlError::InvalidFormat(format!("{}: {}", trimmed, e)))?;
            if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
                return Err(RemoteUrlError::UnsupportedScheme(parsed.scheme().to_string()));
            }
            RemoteKind::Url
        } else if scp_pattern().is_match(trimmed) {
            RemoteKind::Scp
        } else {
            RemoteKind::Local
        };

        Ok(Self {
            url: trimmed.to_string(),
            kind,
        })
    }

    /// Remote that is a directory on this machine.
    pub fn local(path: &Path) -> Result<Self, RemoteUrlError> {
        Self::new(&path.to_string_lossy())
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> RemoteKind {
        self.kind
    }

    pub fn is_local(&self) -> bool {
        self.kind == RemoteKind::Local
    }

    /// Filesystem path of a local remote.
    pub fn local_path(&self) -> Option<PathBuf> {
        match self.kind {
            RemoteKind::Local => Some(PathBuf::from(&self.url)),
            _ => None,
        }
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl std::str::FromStr for RemoteUrl {
    type Err = RemoteUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
