// src/cli/handlers/commons.rs

// Shared state for every handler.

use anyhow::{Context, Result};

use crate::{cli::Cli, core::paths::PmHome};

/// Everything a handler needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Session {
    /// The pm configuration directory.
    pub home: PmHome,
    /// Target script dialect.
    pub dialect: String,
    /// Where external renderers live, before expansion.
    pub plugins_dir: String,
}

impl Session {
    /// Resolves the pm home and fills in defaults for flags left unset.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let home = PmHome::from_env().context("Could not locate the pm home directory")?;
        let dialect = non_empty(cli.dialect.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| default_dialect().to_string());
        let plugins_dir = non_empty(cli.plugins.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| home.plugins_dir().display().to_string());
        log::debug!(
            "Session: home='{}', dialect='{}', plugins='{}'",
            home.dir().display(),
            dialect,
            plugins_dir
        );
        Ok(Self {
            home,
            dialect,
            plugins_dir,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `pwsh` on Windows, `bash` everywhere else.
pub fn default_dialect() -> &'static str {
    if cfg!(target_os = "windows") {
        "pwsh"
    } else {
        "bash"
    }
}
