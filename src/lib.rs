//! # skla - SKCraft launcher release pipeline
//!
//! `skla` builds a modpack with the SKCraft launcher toolchain and publishes
//! it to a git-hosted download site. One run:
//!
//! 1. Synchronizes the launcher sources and the download site working copies
//! 2. Derives the launcher version from the launcher commit and the patch counter
//! 3. Stops early when the site's last commit already describes this release
//! 4. Patches and builds the launcher, then builds the client and server files
//! 5. Writes the packed launcher and the JSON manifests into the site
//! 6. Commits and pushes the site
//!
//! ## Quick Start
//!
//! ```bash
//! # patches/version.txt holds the patch counter
//! skla path/to/modpack
//! ```
//!
//! Set `SKLA_TRACING=1` to log every pipeline step.
//!
//! ## Architecture
//!
//! - [`domain`]: Release facts (package metadata, versions, manifests, artifacts)
//! - [`application`]: Repository synchronization and the release pipeline
//! - [`infrastructure`]: External processes, git, build tools and file system
//! - [`presentation`]: CLI interface and user interaction
//! - [`common`]: Shared utilities and error handling
//!
//! ## Error Handling
//!
//! - [`common::error::ReleaseError`]: Main error type with detailed context
//! - [`common::result::ReleaseResult`]: Type alias for `Result<T, ReleaseError>`
//!
//! ## Examples
//!
//! ```rust,no_run
//! use skla::application::use_cases::{PipelineConfig, ReleasePipeline};
//! use skla::infrastructure::{GitScm, SkcraftToolchain, TtyProfile};
//! use std::sync::Arc;
//!
//! # async fn example() -> skla::Result<()> {
//! let profile = TtyProfile::detect();
//! let config = PipelineConfig::new("/srv/release")
//!     .with_input_dir("/srv/modpacks/pack")
//!     .with_dist("git@example.com:site.git", Some("gh-pages".to_string()));
//!
//! let pipeline = ReleasePipeline::new(
//!     config,
//!     Arc::new(GitScm::new(profile.clone())),
//!     Arc::new(SkcraftToolchain::new("/srv/release", profile)),
//! );
//! let state = pipeline.run().await?;
//! println!("Published {}", state.message);
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::ReleaseError;
pub use crate::common::result::ReleaseResult as Result;
