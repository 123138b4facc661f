//! # System Interaction Layer
//!
//! Turns a finished [`Plan`](crate::core::plan::Plan) into script text. This is
//! the only place pm crosses a process boundary.
//!
//! ## Modules
//!
//! - **`render`**: the built-in dialects (POSIX shells and PowerShell) and the
//!   entry point that picks between them and an external renderer.
//! - **`plugin`**: locates `pm-render-<dialect>` executables, pipes the JSON
//!   plan document into them and collects the script they print.

/// External renderer discovery and invocation.
pub mod plugin;
/// Built-in dialects and the render entry point.
pub mod render;
