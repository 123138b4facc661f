// src/cli/handlers/add.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use super::commons::Session;
use crate::core::registry;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Registers a project from its meta file.")]
struct AddArgs {
    /// Path to the project's meta file (`.yml`, `.yaml` or `.toml`).
    meta: String,
}

/// Registers the project described by a meta file.
pub fn handle(args: Vec<String>, session: &Session, out: &mut dyn Write) -> Result<()> {
    let add_args = AddArgs::try_parse_from(&args)?;
    let entry = registry::add(&session.home, &add_args.meta)
        .with_context(|| format!("Could not register '{}'", add_args.meta))?;
    writeln!(out, "# pm: added project {} ({})", entry.name, entry.root)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::PmHome;
    use tempfile::tempdir;

    #[test]
    fn test_add_requires_meta_argument() {
        let tmp = tempdir().unwrap();
        let session = Session {
            home: PmHome::new(tmp.path().join("pm")),
            dialect: "bash".to_string(),
            plugins_dir: String::new(),
        };
        let mut out = Vec::new();
        assert!(handle(vec![], &session, &mut out).is_err());
        assert!(out.is_empty());
    }
}
