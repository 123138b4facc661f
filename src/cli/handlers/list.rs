// src/cli/handlers/list.rs

use anyhow::Result;
use std::io::Write;

use super::commons::Session;
use crate::core::registry;

/// Prints every registered project.
pub fn handle(_args: Vec<String>, session: &Session, out: &mut dyn Write) -> Result<()> {
    let projects = registry::list(&session.home)?;
    if projects.is_empty() {
        writeln!(out, "# pm: empty. Use: pm add /path/to/.pm.meta.yml")?;
        return Ok(());
    }

    writeln!(out, "# pm: projects\n")?;
    for project in projects {
        writeln!(
            out,
            "- {}\n  meta: {}\n  root: {}",
            project.name, project.meta, project.root
        )?;
    }
    Ok(())
}
