// src/system/plugin.rs

use crate::{
    constants::{RENDERER_PREFIX, RENDER_FLAG},
    core::{
        paths,
        plan::{Plan, PlanDocument},
    },
    system::render::RenderError,
};
use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

/// Locates `<prefix><dialect>` inside the plugins directory.
pub fn find_renderer(plugins_dir: &Path, dialect: &str) -> Option<PathBuf> {
    let candidate = plugins_dir.join(format!("{}{}", RENDERER_PREFIX, dialect));
    if candidate.is_file() {
        return Some(candidate);
    }
    if cfg!(target_os = "windows") {
        let exe = plugins_dir.join(format!("{}{}.exe", RENDERER_PREFIX, dialect));
        if exe.is_file() {
            return Some(exe);
        }
    }
    None
}

/// Renders a plan through an external renderer.
///
/// The plan document is written to the renderer's stdin as JSON and the
/// script is read back from its stdout. Its stderr goes straight to ours.
pub fn render_external(
    plan: &Plan,
    dialect: &str,
    plugins_dir: &str,
) -> Result<String, RenderError> {
    let dir = paths::expand_path_lenient(plugins_dir)?;
    let exe = find_renderer(&dir, dialect).ok_or_else(|| RenderError::RendererNotFound {
        dialect: dialect.to_string(),
        dir: dir.clone(),
    })?;
    let payload = serde_json::to_vec(&PlanDocument::from(plan))?;
    log::debug!(
        "Invoking external renderer '{}' with {} bytes of plan",
        exe.display(),
        payload.len()
    );

    let mut child = Command::new(&exe)
        .arg(RENDER_FLAG)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| RenderError::Launch {
            path: exe.clone(),
            source,
        })?;

    // Feed stdin from another thread so a renderer that writes before it has
    // read everything cannot deadlock against us.
    let writer = child.stdin.take().map(|mut stdin| {
        thread::spawn(move || -> std::io::Result<()> {
            stdin.write_all(&payload)?;
            stdin.flush()
        })
    });

    let output = child.wait_with_output().map_err(|source| RenderError::Io {
        path: exe.clone(),
        source,
    })?;

    if let Some(handle) = writer {
        match handle.join() {
            Ok(Ok(())) => {}
            // The renderer may legitimately exit without reading its input.
            Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                log::debug!("Renderer '{}' closed stdin early", exe.display());
            }
            Ok(Err(source)) => {
                return Err(RenderError::Io {
                    path: exe.clone(),
                    source,
                });
            }
            Err(_) => log::warn!("Stdin writer thread for '{}' panicked", exe.display()),
        }
    }

    if !output.status.success() {
        return Err(RenderError::NonZeroExit {
            dialect: dialect.to_string(),
            code: output.status.code(),
        });
    }

    String::from_utf8(output.stdout).map_err(|source| RenderError::InvalidUtf8 {
        dialect: dialect.to_string(),
        source,
    })
}
