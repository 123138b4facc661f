// src/system/render.rs

use crate::{
    core::{
        commons::{posix_quote, pwsh_quote},
        paths::PathError,
        plan::{Op, Plan},
    },
    system::plugin,
};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from rendering a plan.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No `pm-render-<dialect>` executable in the plugins directory.
    #[error("Renderer '{dialect}' not found in '{}'.", .dir.display())]
    RendererNotFound {
        /// The requested dialect.
        dialect: String,
        /// The directory that was searched, after expansion.
        dir: PathBuf,
    },
    /// The plugins directory could not be expanded.
    #[error("Invalid plugins directory: {0}")]
    PluginDir(#[from] PathError),
    /// The plan could not be encoded as JSON.
    #[error("Failed to serialize the plan: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Renderer '{}' could not be launched: {source}", .path.display())]
    /// The renderer exists but could not be started.
    Launch {
        /// The renderer executable.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error while talking to renderer '{}': {source}", .path.display())]
    /// Writing the plan or reading the script failed.
    Io {
        /// The renderer executable.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Renderer '{dialect}' exited with a non-zero status ({})", .code.map_or("signal".to_string(), |c| c.to_string()))]
    /// The renderer reported failure.
    NonZeroExit {
        /// The dialect it was asked for.
        dialect: String,
        /// The exit code, `None` when killed by a signal.
        code: Option<i32>,
    },
    #[error("Renderer '{dialect}' produced output that was not valid UTF-8")]
    /// The renderer printed something that is not UTF-8.
    InvalidUtf8 {
        /// The dialect it was asked for.
        dialect: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// A built-in target syntax.
pub trait Dialect {
    /// The canonical name of the dialect.
    fn name(&self) -> &'static str;
    /// Lines opening the script; `root` is the plan's first directory.
    fn begin(&self, root: &str) -> Vec<String>;
    /// One line per operation.
    fn render_op(&self, op: &Op) -> String;
    /// Lines closing the script.
    fn end(&self) -> Vec<String>;
}

/// bash, sh and zsh.
#[derive(Debug)]
pub struct PosixDialect;

impl Dialect for PosixDialect {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn begin(&self, root: &str) -> Vec<String> {
        vec![
            "# pm begin".to_string(),
            self.render_op(&Op::ChangeDir {
                path: root.to_string(),
            }),
        ]
    }

    fn render_op(&self, op: &Op) -> String {
        match op {
            Op::ChangeDir { path } => format!("pushd {} >/dev/null", posix_quote(path)),
            Op::RestoreDir => "popd >/dev/null".to_string(),
            Op::Emit { text } => format!("echo {}", posix_quote(text)),
            Op::Execute { line } => line.clone(),
        }
    }

    fn end(&self) -> Vec<String> {
        vec![self.render_op(&Op::RestoreDir), "# pm end".to_string()]
    }
}

/// pwsh and Windows PowerShell.
#[derive(Debug)]
pub struct PwshDialect;

impl Dialect for PwshDialect {
    fn name(&self) -> &'static str {
        "pwsh"
    }

    fn begin(&self, root: &str) -> Vec<String> {
        vec![
            "# pm begin".to_string(),
            self.render_op(&Op::ChangeDir {
                path: root.to_string(),
            }),
        ]
    }

    fn render_op(&self, op: &Op) -> String {
        match op {
            Op::ChangeDir { path } => format!("Push-Location {}", pwsh_quote(path)),
            Op::RestoreDir => "Pop-Location".to_string(),
            Op::Emit { text } => format!("Write-Host {}", pwsh_quote(text)),
            Op::Execute { line } => line.clone(),
        }
    }

    fn end(&self) -> Vec<String> {
        vec![self.render_op(&Op::RestoreDir), "# pm end".to_string()]
    }
}

/// Looks up a built-in dialect by name.
pub fn builtin(name: &str) -> Option<&'static dyn Dialect> {
    match name {
        "bash" | "sh" | "zsh" => Some(&PosixDialect),
        "pwsh" | "powershell" => Some(&PwshDialect),
        _ => None,
    }
}

/// Renders a plan with a built-in dialect. This cannot fail.
pub fn render_builtin(plan: &Plan, dialect: &dyn Dialect) -> String {
    let mut lines = dialect.begin(plan.root());
    lines.extend(plan.ops().iter().map(|op| dialect.render_op(op)));
    lines.extend(dialect.end());

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Renders a plan as a script in `dialect`.
///
/// Unknown dialects are delegated to an external renderer found in
/// `plugins_dir` (`~` and environment variables are expanded; unset
/// variables expand to nothing).
pub fn render(plan: &Plan, dialect: &str, plugins_dir: &str) -> Result<String, RenderError> {
    match builtin(dialect) {
        Some(builtin) => {
            log::debug!("Rendering with built-in dialect '{}'", builtin.name());
            Ok(render_builtin(plan, builtin))
        }
        None => plugin::render_external(plan, dialect, plugins_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_plan() -> Plan {
        let mut plan = Plan::new();
        plan.push_change_dir("/proj");
        plan.push_execute("echo hi");
        plan.push_restore_dir();
        plan
    }

    #[test]
    fn test_builtin_names() {
        for name in ["bash", "sh", "zsh"] {
            assert_eq!(builtin(name).map(|d| d.name()), Some("bash"));
        }
        for name in ["pwsh", "powershell"] {
            assert_eq!(builtin(name).map(|d| d.name()), Some("pwsh"));
        }
        assert!(builtin("fish").is_none());
    }

    #[test]
    fn test_posix_plan_structure() {
        let script = render_builtin(&scenario_plan(), &PosixDialect);
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines,
            [
                "# pm begin",
                "pushd /proj >/dev/null",
                "pushd /proj >/dev/null",
                "echo hi",
                "popd >/dev/null",
                "popd >/dev/null",
                "# pm end",
            ]
        );
        assert!(script.ends_with('\n'));
    }

    #[test]
    fn test_pwsh_plan_structure() {
        let script = render_builtin(&scenario_plan(), &PwshDialect);
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines,
            [
                "# pm begin",
                "Push-Location '/proj'",
                "Push-Location '/proj'",
                "echo hi",
                "Pop-Location",
                "Pop-Location",
                "# pm end",
            ]
        );
    }

    #[test]
    fn test_directory_quoting_per_dialect() {
        let mut plan = Plan::new();
        plan.push_change_dir("it's here");
        assert!(
            render_builtin(&plan, &PosixDialect).contains("pushd 'it'\"'\"'s here' >/dev/null")
        );
        assert!(render_builtin(&plan, &PwshDialect).contains("Push-Location 'it''s here'"));
    }

    #[test]
    fn test_execute_lines_are_verbatim() {
        let mut plan = Plan::new();
        plan.push_execute("echo 'it's' \"$HOME\"");
        let script = render_builtin(&plan, &PosixDialect);
        assert!(script.lines().any(|l| l == "echo 'it's' \"$HOME\""));
    }

    #[test]
    fn test_emit_is_quoted() {
        let mut plan = Plan::new();
        plan.push_emit("# pm: hello world");
        assert!(render_builtin(&plan, &PosixDialect).contains("echo '# pm: hello world'"));
        assert!(render_builtin(&plan, &PwshDialect).contains("Write-Host '# pm: hello world'"));
    }

    #[test]
    fn test_empty_plan_defaults_root() {
        let script = render_builtin(&Plan::new(), &PosixDialect);
        assert_eq!(script, "# pm begin\npushd . >/dev/null\npopd >/dev/null\n# pm end\n");
    }

    #[test]
    fn test_render_dispatches_builtin() {
        let script = render(&scenario_plan(), "zsh", "/nonexistent").unwrap();
        assert!(script.starts_with("# pm begin\n"));
    }
}
