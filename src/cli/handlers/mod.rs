// src/cli/handlers/mod.rs

// One module per CLI action.

/// `pm add META`.
pub mod add;
/// State shared by every handler.
pub mod commons;
/// `pm PROJECT args...`.
pub mod generate;
/// `pm ls`.
pub mod list;
/// `pm rm NAME`.
pub mod remove;
