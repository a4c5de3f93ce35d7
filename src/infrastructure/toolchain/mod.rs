//! Build-side tools: the launcher's Gradle build, the modpack builder and
//! `pack200`.

pub mod skcraft_toolchain;
pub mod toolchain_interface;

pub use skcraft_toolchain::SkcraftToolchain;
pub use toolchain_interface::{ModpackBuild, Toolchain};
