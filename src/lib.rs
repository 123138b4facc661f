//! pm turns a project's meta file into a shell script.
//!
//! A meta file (YAML, or TOML by extension) declares functions, commands and
//! docker groups. pm resolves the project, expands its templates into a
//! [`Plan`](crate::core::plan::Plan) and renders that plan in the dialect of
//! the calling shell, either built in or through an external renderer.
#![cfg_attr(not(test), forbid(unsafe_code))]

/// Command-line parsing, dispatch and the per-action handlers.
pub mod cli;
/// File names, environment variable names and other fixed strings.
pub mod constants;
/// Loading, template expansion and planning. Nothing here spawns a process.
pub mod core;
/// The serde models for meta files, the global file and the registry.
pub mod models;
/// Rendering plans to script text.
pub mod system;
