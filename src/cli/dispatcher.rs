// src/cli/dispatcher.rs

use anyhow::Result;
use std::io::Write;

use crate::cli::{
    USAGE,
    handlers::{self, commons::Session},
};

// --- Command Definition and Registry ---

/// A registry command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &Session, &mut dyn Write) -> Result<()>,
}

/// Words reserved for registry management. Anything else names a project.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "add",
        aliases: &[],
        handler: handlers::add::handle,
    },
    CommandDefinition {
        name: "rm",
        aliases: &["remove"],
        handler: handlers::remove::handle,
    },
    CommandDefinition {
        name: "ls",
        aliases: &["list"],
        handler: handlers::list::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes the positional arguments to a registry command or to script generation.
pub fn dispatch(all_args: Vec<String>, session: &Session, out: &mut dyn Write) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let Some(first) = all_args.first() else {
        out.write_all(USAGE.as_bytes())?;
        return Ok(());
    };

    match find_command(first) {
        Some(command) => {
            let handler_args = all_args.iter().skip(1).cloned().collect();
            (command.handler)(handler_args, session, out)
        }
        None => handlers::generate::handle(all_args, session, out),
    }
}
