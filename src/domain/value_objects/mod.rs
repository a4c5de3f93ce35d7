pub mod remote_url;

pub use remote_url::{RemoteKind, RemoteUrl, RemoteUrlError};
