//! Filesystem primitives for the tool cache.

use hostkit_core::{Error, Result};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

/// Recursively copy `src` into `dest`, creating `dest` and any intermediate
/// directories. Symlinks are followed.
pub async fn copy_dir_all(src: &Path, dest: &Path) -> Result<()> {
    copy_dir_inner(src.to_path_buf(), dest.to_path_buf()).await
}

fn copy_dir_inner(src: PathBuf, dest: PathBuf) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
    Box::pin(async move {
        tokio::fs::create_dir_all(&dest)
            .await
            .map_err(|e| Error::filesystem(&dest, e))?;

        let mut read_dir = tokio::fs::read_dir(&src)
            .await
            .map_err(|e| Error::filesystem(&src, e))?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| Error::filesystem(&src, e))?
        {
            let from = entry.path();
            let to = dest.join(entry.file_name());
            let metadata = tokio::fs::metadata(&from)
                .await
                .map_err(|e| Error::filesystem(&from, e))?;

            if metadata.is_dir() {
                copy_dir_inner(from, to).await?;
            } else {
                tokio::fs::copy(&from, &to)
                    .await
                    .map_err(|e| Error::filesystem(&from, e))?;
            }
        }
        Ok(())
    })
}

/// Forcefully remove `path` and everything below it.
///
/// A missing target is not an error. Failures are retried `retries` more
/// times with a fixed `delay` before the last error is returned.
pub async fn remove_dir_with_retry(path: &Path, retries: u32, delay: Duration) -> Result<()> {
    let mut attempt = 0;
    loop {
        match remove_path(path).await {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) if attempt < retries => {
                attempt += 1;
                warn!(path = %path.display(), error = %e, attempt, "Remove failed, will retry");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(Error::filesystem(path, e)),
        }
    }
}

async fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = tokio::fs::symlink_metadata(path).await?;
    if metadata.is_dir() {
        debug!(path = %path.display(), "Removing directory");
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_dir_all_copies_nested_tree() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("bin/lib")).unwrap();
        std::fs::write(src.path().join("bin/tool"), b"tool").unwrap();
        std::fs::write(src.path().join("bin/lib/dep.dll"), b"dep").unwrap();

        let dest = tempfile::tempdir().unwrap();
        let target = dest.path().join("a/b/c");
        copy_dir_all(src.path(), &target).await.unwrap();

        assert_eq!(std::fs::read(target.join("bin/tool")).unwrap(), b"tool");
        assert_eq!(std::fs::read(target.join("bin/lib/dep.dll")).unwrap(), b"dep");
    }

    #[tokio::test]
    async fn test_copy_missing_source_fails() {
        let dest = tempfile::tempdir().unwrap();
        let err = copy_dir_all(Path::new("/definitely/not/here"), dest.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        remove_dir_with_retry(&dir.path().join("gone"), 2, Duration::from_millis(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_tree() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("tool/1.0.0");
        std::fs::create_dir_all(target.join("bin")).unwrap();
        std::fs::write(target.join("bin/x"), b"x").unwrap();

        remove_dir_with_retry(&target, 0, Duration::ZERO).await.unwrap();
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remove_retries_then_returns_last_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("locked");
        let target = parent.join("1.0.0");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("x"), b"x").unwrap();
        std::fs::set_permissions(&parent, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores directory permissions, so removal cannot be made to fail.
        if std::fs::write(parent.join("write-check"), b"").is_ok() {
            std::fs::set_permissions(&parent, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let retries = 2;
        let delay = Duration::from_millis(25);
        let started = std::time::Instant::now();
        let result = remove_dir_with_retry(&target, retries, delay).await;
        let elapsed = started.elapsed();

        std::fs::set_permissions(&parent, std::fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(Error::Filesystem { path, source }) => {
                assert_eq!(path, target);
                assert_eq!(source.kind(), ErrorKind::PermissionDenied);
            }
            other => panic!("expected filesystem error, got {other:?}"),
        }
        // One sleep between each of the retries + 1 attempts.
        assert!(elapsed >= delay * retries, "{elapsed:?}");
        assert!(target.exists());
    }
}
