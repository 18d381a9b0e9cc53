pub mod config;
pub mod convert;
pub mod fetch;
pub mod rotate;
pub mod tree;

// Re-export main types
pub use convert::{classify_index, convert_page, CategoryMarker, IndexKind};
pub use fetch::{fetch_repo, EXTERNAL_REPOS_DIR};
pub use rotate::{rotate, RepoConvention, VersionEntry, DEFAULT_MAX_VERSIONS};
pub use tree::{sync_version, write_versions_manifest};
