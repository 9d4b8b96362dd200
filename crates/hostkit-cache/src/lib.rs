//! Versioned local tool cache for hostkit.
//!
//! Tools are stored as verbatim directory copies under
//! `<cache root>/<tool>/<cleaned version>/`.

pub mod fs;
pub mod provider;
pub mod types;
pub mod version;

pub use fs::{copy_dir_all, remove_dir_with_retry};
pub use provider::ToolCache;
pub use types::CacheOptions;
pub use version::clean_version;
