//! Tool cache lookups and updates.

use crate::fs::{copy_dir_all, remove_dir_with_retry};
use crate::types::CacheOptions;
use crate::version::clean_version;
use hostkit_core::{Error, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Versioned copies of tool directories under a host-provided root.
///
/// Caching is best effort: with no root configured, [`ToolCache::cache_dir`]
/// returns `Ok(None)` and [`ToolCache::find`] reports a miss.
///
/// There is no locking. Two concurrent `cache_dir` calls for the same tool
/// and version race on remove-then-copy and the last writer wins; callers
/// that need exclusivity serialize externally.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: Option<PathBuf>,
    options: CacheOptions,
}

impl ToolCache {
    pub fn new(root: Option<PathBuf>, options: CacheOptions) -> Self {
        Self { root, options }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Copy `source_dir` into the cache as `tool`@`version`, replacing any
    /// existing entry. Returns the entry path, or `None` without a cache root.
    pub async fn cache_dir(
        &self,
        source_dir: &Path,
        tool: &str,
        version: &str,
    ) -> Result<Option<PathBuf>> {
        Error::require("tool", tool)?;
        Error::require("version", version)?;
        Error::require("source_dir", &source_dir.to_string_lossy())?;

        let version = clean_version(version);
        require_component("tool", tool)?;
        require_component("version", &version)?;
        let Some(dest) = self.entry_path(tool, &version) else {
            debug!(tool, %version, "Tool cache root not configured, skipping cache");
            return Ok(None);
        };

        info!(
            tool,
            %version,
            source = %source_dir.display(),
            dest = %dest.display(),
            "Caching tool directory"
        );

        ensure_readable_dir(source_dir).await?;
        remove_dir_with_retry(&dest, self.options.remove_retries, self.options.retry_delay())
            .await?;

        if let Err(e) = copy_dir_all(source_dir, &dest).await {
            // A partial copy must not be reported as a cache hit.
            if let Err(cleanup) =
                remove_dir_with_retry(&dest, self.options.remove_retries, self.options.retry_delay())
                    .await
            {
                warn!(dest = %dest.display(), error = %cleanup, "Failed to remove partial cache entry");
            }
            return Err(e);
        }

        Ok(Some(dest))
    }

    /// Path of the exact cached `tool`@`version_spec`, if present.
    ///
    /// `version_spec` is cleaned but never range-matched.
    pub async fn find(&self, tool: &str, version_spec: &str) -> Result<Option<PathBuf>> {
        Error::require("tool_name", tool)?;
        Error::require("version_spec", version_spec)?;

        let version = clean_version(version_spec);
        require_component("tool_name", tool)?;
        require_component("version_spec", &version)?;
        let Some(path) = self.entry_path(tool, &version) else {
            debug!(tool, %version, "Tool cache root not configured");
            return Ok(None);
        };

        let present = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);

        if present {
            debug!(tool, %version, path = %path.display(), "Found tool in cache");
            Ok(Some(path))
        } else {
            debug!(tool, %version, "Tool not found in cache");
            Ok(None)
        }
    }

    fn entry_path(&self, tool: &str, version: &str) -> Option<PathBuf> {
        self.root.as_ref().map(|root| root.join(tool).join(version))
    }
}

/// Fail with [`Error::InvalidParameter`] unless `value` is exactly one plain
/// path component, so an entry can never resolve outside `<root>/<tool>`.
fn require_component(name: &'static str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c.to_str() == Some(value) => Ok(()),
        _ => Err(Error::InvalidParameter { name }),
    }
}

/// The source must be a directory we can list before the old entry is removed.
async fn ensure_readable_dir(path: &Path) -> Result<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| Error::filesystem(path, e))?;
    if !metadata.is_dir() {
        return Err(Error::filesystem(
            path,
            std::io::Error::new(ErrorKind::NotADirectory, "source is not a directory"),
        ));
    }
    tokio::fs::read_dir(path)
        .await
        .map_err(|e| Error::filesystem(path, e))?;
    Ok(())
}
