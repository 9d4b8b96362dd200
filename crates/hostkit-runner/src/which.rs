//! Executable lookup on PATH.

use hostkit_core::env::PATH_VAR;
use hostkit_core::{EnvStore, Error, Result, SharedEnv};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";

/// How candidate files in a PATH directory are matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Exact name, must be a regular file with an execute bit.
    Unix,
    /// Name as given or with one of `extensions` appended, compared
    /// case-insensitively against directory entries.
    Windows { extensions: Vec<String> },
}

impl SearchMode {
    /// Mode for the running platform. On Windows the extension list comes
    /// from `PATHEXT`.
    pub fn native(env: &SharedEnv) -> Self {
        if cfg!(windows) {
            let raw = env.get("PATHEXT").unwrap_or_default();
            Self::windows(&raw)
        } else {
            Self::Unix
        }
    }

    /// Windows mode from a `;` or `,` delimited extension list, falling back to
    /// `.COM;.EXE;.BAT;.CMD` when empty.
    pub fn windows(pathext: &str) -> Self {
        let raw = if pathext.trim().is_empty() {
            DEFAULT_PATHEXT
        } else {
            pathext
        };
        let extensions = raw
            .split([';', ','])
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect();
        Self::Windows { extensions }
    }
}

/// Resolves bare executable names against the PATH held in the environment
/// store. Read-only: only existence and metadata are probed.
#[derive(Debug, Clone)]
pub struct ExecutableLocator {
    env: SharedEnv,
    mode: SearchMode,
}

impl ExecutableLocator {
    pub fn new(env: SharedEnv) -> Self {
        let mode = SearchMode::native(&env);
        Self { env, mode }
    }

    pub fn with_mode(env: SharedEnv, mode: SearchMode) -> Self {
        Self { env, mode }
    }

    /// Absolute canonical path of the first match for `tool`.
    pub async fn which(&self, tool: &str) -> Result<PathBuf> {
        Error::require("tool", tool)?;
        let not_found = || Error::ExecutableNotFound {
            tool: tool.to_string(),
        };

        let tool_path = Path::new(tool);
        if tool_path.components().count() > 1 || tool_path.is_absolute() {
            let dir = tool_path.parent().unwrap_or(Path::new(""));
            let name = tool_path.file_name().ok_or_else(not_found)?;
            let dir = hostkit_core::paths::absolutize(dir)?;
            return match self.probe_dir(&dir, &name.to_string_lossy()).await {
                Some(found) => canonical(found).await,
                None => Err(not_found()),
            };
        }

        let path_value = self
            .env
            .get(PATH_VAR)
            .filter(|value| !value.is_empty())
            .ok_or_else(not_found)?;

        for dir in std::env::split_paths(&OsString::from(path_value)) {
            if dir.as_os_str().is_empty() {
                continue;
            }
            if let Some(found) = self.probe_dir(&dir, tool).await {
                debug!(tool, path = %found.display(), "Resolved executable");
                return canonical(found).await;
            }
        }

        Err(not_found())
    }

    async fn probe_dir(&self, dir: &Path, tool: &str) -> Option<PathBuf> {
        match &self.mode {
            SearchMode::Unix => {
                let candidate = dir.join(tool);
                is_executable_file(&candidate).await.then_some(candidate)
            }
            SearchMode::Windows { extensions } => {
                let entries = list_file_names(dir).await;
                candidate_names(tool, extensions)
                    .iter()
                    .find_map(|name| find_entry(&entries, name))
                    .map(|entry| dir.join(entry))
            }
        }
    }
}

/// Names to try, in priority order. A tool that already carries one of the
/// extensions is tried verbatim first.
fn candidate_names(tool: &str, extensions: &[String]) -> Vec<String> {
    let lower = tool.to_lowercase();
    let mut names = Vec::with_capacity(extensions.len() + 1);
    if extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_lowercase()))
    {
        names.push(tool.to_string());
    }
    names.extend(extensions.iter().map(|ext| format!("{tool}{ext}")));
    names
}

fn find_entry<'a>(entries: &'a [String], name: &str) -> Option<&'a String> {
    entries.iter().find(|entry| entry.eq_ignore_ascii_case(name))
}

async fn list_file_names(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(mut read_dir) = tokio::fs::read_dir(dir).await else {
        return names;
    };
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file() || t.is_symlink())
            .unwrap_or(false);
        if is_file {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names
}

#[cfg(unix)]
async fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
async fn is_executable_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn canonical(path: PathBuf) -> Result<PathBuf> {
    tokio::fs::canonicalize(&path)
        .await
        .map_err(|e| Error::filesystem(path, e))
}
