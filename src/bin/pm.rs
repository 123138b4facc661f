// src/bin/pm.rs

//! The `pm` binary: prints the generated script on stdout.
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use colored::*;
use env_logger::Env;
use pm::cli::{Cli, dispatcher, handlers::commons::Session};
use std::io::{self, Write};

/// The main entry point of the `pm` application.
/// Sets up logging, parses arguments and reports any error on stderr.
fn main() {
    // Diagnostics go to stderr; stdout is reserved for the generated script.
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let session = Session::from_cli(&cli)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatcher::dispatch(cli.args, &session, &mut out)?;
    out.flush()?;
    Ok(())
}
