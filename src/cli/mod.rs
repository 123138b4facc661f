// src/cli/mod.rs

use crate::constants::{ENV_DIALECT, ENV_PLUGIN_DIR};
use clap::Parser;

/// Routes the first argument to an action.
pub mod dispatcher;
/// One handler per action.
pub mod handlers;

/// Printed when pm is called without arguments.
pub const USAGE: &str = "# pm: usage
#   pm [--dialect bash|pwsh|<plugin>] [--plugins DIR] <add|rm|ls|PROJECT|META.yml> [args...]
# examples:
#   pm add ~/repos/subzero/.pm.meta.yml
#   pm ls
#   pm --dialect bash subzero :build -DskipTests :up @base api
";

/// pm: turns a project's meta file into a shell script.
///
/// The script is printed on stdout so it can be evaluated by the calling
/// shell, e.g. `eval "$(pm subzero :build)"`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Script dialect: bash, sh, zsh, pwsh, powershell or an external renderer.
    #[arg(long, env = ENV_DIALECT)]
    pub dialect: Option<String>,

    /// Directory searched for `pm-render-<dialect>` executables.
    #[arg(long, env = ENV_PLUGIN_DIR)]
    pub plugins: Option<String>,

    /// `add META`, `rm NAME`, `ls`, or a project followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
