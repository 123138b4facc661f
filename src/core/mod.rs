// src/core/mod.rs

/// Splits project arguments into `:command` invocations.
pub mod arg_parser;
/// Shell quoting helpers.
pub mod commons;
/// Reads meta and global files.
pub mod config_loader;
/// The built-in `:up` command.
pub mod docker;
/// The staged template engine.
pub mod interpolator;
/// Binds call arguments to function parameters.
pub mod parameters;
/// The pm home layout and path expansion.
pub mod paths;
/// The ordered operations handed to a renderer.
pub mod plan;
/// Builds a plan from a project and its arguments.
pub mod planner;
/// Named projects and how a project argument is resolved.
pub mod registry;
