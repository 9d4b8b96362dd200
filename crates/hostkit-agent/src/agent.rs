//! The build agent contract.

use crate::context::{AgentContext, TaskOutcome};
use crate::inputs::{input_key, parse_bool, split_delimited};
use async_trait::async_trait;
use hostkit_cache::ToolCache;
use hostkit_core::env::{PATH_DELIMITER, PATH_VAR};
use hostkit_core::{AgentIdentity, EnvStore, Error, ExecResult, Result, expansion, paths};
use hostkit_runner::ExecutableLocator;
use std::path::{Path, PathBuf};

/// One implementation per CI host.
///
/// Implementors supply the identity, the variable-name transform and the
/// host-native write channels (logging, status, outputs, build number).
/// Input parsing, tool caching, process execution, PATH lookup and expansion
/// are provided here so every host behaves the same way.
#[async_trait]
pub trait BuildAgent: Send + Sync {
    fn identity(&self) -> &AgentIdentity;

    fn context(&self) -> &AgentContext;

    /// Environment key a host variable is stored under.
    fn variable_key(&self, name: &str) -> String {
        name.to_string()
    }

    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Mark the task succeeded. `done` distinguishes terminal from partial
    /// status on hosts that support it.
    fn set_succeeded(&self, message: &str, done: bool);

    fn set_failed(&self, message: &str, done: bool);

    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    fn update_build_number(&self, version: &str);

    /// Make a new PATH entry visible to later steps of the job. Most hosts
    /// only need the process environment, which `add_path` already updates.
    fn persist_path(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn agent_name(&self) -> &str {
        &self.identity().agent_name
    }

    /// Last status reported through `set_succeeded`/`set_failed`.
    fn outcome(&self) -> Option<TaskOutcome> {
        self.context().outcome()
    }

    /// Trimmed value of `name`, empty when unset. The value is logged at
    /// debug level.
    fn get_variable(&self, name: &str) -> String {
        let key = self.variable_key(name);
        let value = self
            .context()
            .env()
            .get(&key)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();
        self.debug(&format!("getVariable - {}: {}", key, value));
        value
    }

    /// Value of `name` as an absolute normalized path, `None` when unset.
    fn get_variable_as_path(&self, name: &str) -> Result<Option<PathBuf>> {
        let value = self.get_variable(name);
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(paths::absolutize(Path::new(&value))?))
    }

    fn get_source_dir(&self) -> Result<Option<PathBuf>> {
        self.get_variable_as_path(&self.identity().source_dir_variable)
    }

    fn get_temp_dir(&self) -> Result<Option<PathBuf>> {
        self.get_variable_as_path(&self.identity().temp_dir_variable)
    }

    fn get_cache_dir(&self) -> Result<Option<PathBuf>> {
        self.get_variable_as_path(&self.identity().cache_dir_variable)
    }

    /// Substitute `$NAME` and `${NAME}` from the environment.
    fn get_expanded_string(&self, pattern: &str) -> String {
        expansion::expand(pattern, &**self.context().env())
    }

    /// Trimmed task input. Empty required inputs fail with
    /// [`Error::MissingRequiredInput`].
    fn get_input(&self, name: &str, required: bool) -> Result<String> {
        let key = input_key(name);
        let value = self.get_variable(&key);
        if required && value.is_empty() {
            return Err(Error::MissingRequiredInput { key });
        }
        Ok(value)
    }

    fn get_boolean_input(&self, name: &str, required: bool) -> Result<bool> {
        Ok(parse_bool(&self.get_input(name, required)?))
    }

    fn get_delimited_input(
        &self,
        name: &str,
        delimiter: &str,
        required: bool,
    ) -> Result<Vec<String>> {
        Ok(split_delimited(&self.get_input(name, required)?, delimiter))
    }

    fn get_list_input(&self, name: &str, required: bool) -> Result<Vec<String>> {
        self.get_delimited_input(name, "\n", required)
    }

    fn tool_cache(&self) -> Result<ToolCache> {
        Ok(ToolCache::new(
            self.get_cache_dir()?,
            self.context().cache_options(),
        ))
    }

    /// Copy `source_dir` into the host tool cache. `None` when the host has
    /// no cache directory configured.
    async fn cache_tool_directory(
        &self,
        source_dir: &Path,
        tool: &str,
        version: &str,
    ) -> Result<Option<PathBuf>> {
        let cached = self
            .tool_cache()?
            .cache_dir(source_dir, tool, version)
            .await?;
        match &cached {
            Some(path) => self.debug(&format!("Cached {} {} to {}", tool, version, path.display())),
            None => self.debug("cache directory not configured, skipping tool cache"),
        }
        Ok(cached)
    }

    /// Exact-version lookup in the host tool cache.
    async fn find_local_tool(&self, tool: &str, version_spec: &str) -> Result<Option<PathBuf>> {
        let found = self.tool_cache()?.find(tool, version_spec).await?;
        match &found {
            Some(path) => self.debug(&format!("Found tool in cache: {}", path.display())),
            None => self.debug(&format!("{} {} not found in cache", tool, version_spec)),
        }
        Ok(found)
    }

    async fn exec(&self, command: &str, args: &[String]) -> ExecResult {
        self.context().executor().exec(command, args).await
    }

    async fn which(&self, tool: &str) -> Result<PathBuf> {
        let locator = ExecutableLocator::new(self.context().env().clone());
        locator.which(tool).await
    }

    /// Prepend `path` to the search path of this process and of later steps.
    fn add_path(&self, path: &Path) -> Result<()> {
        let env = self.context().env();
        let current = env.get(PATH_VAR).unwrap_or_default();
        self.debug(&format!("Path before: {}", current));

        let entry = path.to_string_lossy();
        let updated = if current.is_empty() {
            entry.into_owned()
        } else {
            format!("{}{}{}", entry, PATH_DELIMITER, current)
        };
        env.set(PATH_VAR, &updated);
        env.set("Path", &updated);
        self.debug(&format!("Path after: {}", updated));

        self.persist_path(path)
    }
}
