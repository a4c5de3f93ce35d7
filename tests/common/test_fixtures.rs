//! Test fixtures for creating test data
//!
//! Release inputs on disk and real git repositories in temporary
//! directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const TEST_AUTHOR: &str = "skla tests";
pub const TEST_EMAIL: &str = "skla@example.com";

/// Run git with a fixed identity, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", TEST_AUTHOR)
        .env("GIT_AUTHOR_EMAIL", TEST_EMAIL)
        .env("GIT_COMMITTER_NAME", TEST_AUTHOR)
        .env("GIT_COMMITTER_EMAIL", TEST_EMAIL)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Bare remote on branch `main` plus a seed working copy that feeds it.
pub struct RemoteFixture {
    pub temp_dir: TempDir,
    pub remote: PathBuf,
    seed: PathBuf,
}

impl RemoteFixture {
    pub const BRANCH: &'static str = "main";

    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let remote = temp_dir.path().join("remote.git");
        let seed = temp_dir.path().join("seed");

        fs::create_dir_all(&remote).unwrap();
        git(&remote, &["init", "--bare", "--quiet"]);
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        fs::create_dir_all(&seed).unwrap();
        git(&seed, &["init", "--quiet"]);
        git(&seed, &["checkout", "--quiet", "-b", Self::BRANCH]);
        git(&seed, &["remote", "add", "origin", &remote.to_string_lossy()]);

        let fixture = Self {
            temp_dir,
            remote,
            seed,
        };
        fixture.commit_file("README.md", "# Launcher\n", "Initial commit");
        fixture
    }

    /// Commit one file in the seed and push it to the remote.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> String {
        fs::write(self.seed.join(name), content).unwrap();
        git(&self.seed, &["add", name]);
        git(&self.seed, &["commit", "--quiet", "-m", message]);
        git(&self.seed, &["push", "--quiet", "origin", "HEAD:main"]);
        self.head()
    }

    /// Commit hash `main` points to on the remote.
    pub fn head(&self) -> String {
        git(&self.remote, &["rev-parse", Self::BRANCH])
    }

    pub fn url(&self) -> String {
        self.remote.to_string_lossy().into_owned()
    }

    /// Location for a working copy inside the fixture sandbox.
    pub fn work_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Work directory laid out the way a release run expects it.
pub struct ReleaseFixture {
    pub temp_dir: TempDir,
}

impl ReleaseFixture {
    /// Package `pack` version `1.2.3`, patch version `7`, no patch files.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        };
        fixture.write_input(r#"{"name":"pack","title":"Pack"}"#, "1.2.3\n");
        fixture.write_patch("version.txt", "7\n");
        fixture
    }

    pub fn work_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn input_dir(&self) -> PathBuf {
        self.temp_dir.path().join("input")
    }

    pub fn patches_dir(&self) -> PathBuf {
        self.temp_dir.path().join("patches")
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.temp_dir.path().join("downloads")
    }

    pub fn write_input(&self, modpack_json: &str, version: &str) {
        let input = self.input_dir();
        fs::create_dir_all(input.join("src")).unwrap();
        fs::write(input.join("modpack.json"), modpack_json).unwrap();
        fs::write(input.join("version.txt"), version).unwrap();
    }

    pub fn write_patch(&self, name: &str, content: &str) -> PathBuf {
        let patches = self.patches_dir();
        fs::create_dir_all(&patches).unwrap();
        let path = patches.join(name);
        fs::write(&path, content).unwrap();
        path
    }
}
