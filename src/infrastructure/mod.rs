//! Infrastructure layer modules
//!
//! Concrete implementations for everything outside the process:
//! - Process execution (terminal profile, command proxies, directory scoping)
//! - Version control (`git`)
//! - Build tooling (Gradle wrapper, modpack builder, `pack200`)
//! - File system operations (patches, release output)
pub mod filesystem;
pub mod process;
pub mod scm;
pub mod toolchain;

// Re-export commonly used types
pub use process::{CommandArgs, CommandProxy, ProcessRunner, ScopedDirectory, TtyProfile};
pub use scm::{CloneOptions, GitScm, VersionControl};
pub use toolchain::{ModpackBuild, SkcraftToolchain, Toolchain};
