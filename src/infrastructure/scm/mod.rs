//! Version control for the launcher and distribution working copies.
//!
//! The pipeline talks to [`VersionControl`]; [`GitScm`] drives the `git`
//! executable through the process layer.

pub mod git_scm;
pub mod scm_interface;

pub use git_scm::GitScm;
pub use scm_interface::{CloneOptions, VersionControl};
