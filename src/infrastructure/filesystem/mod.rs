pub mod release_files;

pub use release_files::{list_patches, read_patch_version, remove_stale_file, replace_directory, resolve_input_dir};
