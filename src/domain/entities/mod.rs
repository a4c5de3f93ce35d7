pub mod launcher_artifacts;
pub mod package;
pub mod release;

pub use launcher_artifacts::LauncherArtifacts;
pub use package::PackageMetadata;
pub use release::{LauncherVersion, ReleaseManifests, ReleaseMessage};
