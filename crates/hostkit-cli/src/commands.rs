//! CLI command definitions.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an executable on PATH
    Which {
        /// Executable name
        tool: String,
    },

    /// Run a command through the platform shell
    Exec {
        /// Command to run
        command: String,

        /// Arguments, joined with spaces and passed unescaped
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read a task input
    Input {
        /// Input name
        name: String,

        /// Fail when the input is empty
        #[arg(short, long)]
        required: bool,

        /// Parse as a boolean
        #[arg(long, conflicts_with_all = ["list", "delimiter"])]
        bool: bool,

        /// Parse as a newline separated list
        #[arg(long, conflicts_with = "delimiter")]
        list: bool,

        /// Parse as a list split on this delimiter
        #[arg(short, long)]
        delimiter: Option<String>,
    },

    /// Expand $NAME and ${NAME} references
    Expand {
        /// Pattern to expand
        pattern: String,
    },

    /// Print the host source, temp and tool cache directories
    Dirs,

    /// Copy a tool directory into the host tool cache
    Cache {
        /// Directory to cache
        dir: PathBuf,

        /// Tool name
        tool: String,

        /// Tool version
        version: String,
    },

    /// Look up an exact tool version in the host tool cache
    Find {
        /// Tool name
        tool: String,

        /// Exact version
        version: String,
    },

    /// Prepend a directory to PATH for this and later steps
    AddPath {
        /// Directory to add
        dir: PathBuf,
    },

    /// Publish a named output value
    Output {
        name: String,
        value: String,
    },

    /// Update the host build number
    BuildNumber {
        value: String,
    },
}
