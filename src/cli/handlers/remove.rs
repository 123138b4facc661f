// src/cli/handlers/remove.rs

use anyhow::Result;
use clap::Parser;
use std::io::Write;

use super::commons::Session;
use crate::core::registry;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Removes a project from the registry.")]
struct RemoveArgs {
    /// The registered project name.
    name: String,
}

/// Drops a project from the registry.
pub fn handle(args: Vec<String>, session: &Session, out: &mut dyn Write) -> Result<()> {
    let remove_args = RemoveArgs::try_parse_from(&args)?;
    registry::remove(&session.home, &remove_args.name)?;
    writeln!(out, "# pm: removed project {}", remove_args.name)?;
    Ok(())
}
