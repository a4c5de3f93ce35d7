pub mod publish_release;
pub mod sync_repository;

pub use publish_release::{InputDirProvider, PipelineConfig, PipelineState, ReleasePipeline, TreeConfig};
pub use sync_repository::{RemoteSource, RepositorySync, SyncOperation, SyncResult};
