// src/cli/handlers/generate.rs

use anyhow::{Context, Result, anyhow};
use std::io::Write;

use super::commons::Session;
use crate::{
    core::{arg_parser, config_loader, planner, registry},
    system::render,
};

/// Builds and prints the script for `PROJECT [args...]`.
///
/// The script is rendered completely before anything is written, so a failing
/// external renderer leaves stdout empty.
pub fn handle(args: Vec<String>, session: &Session, out: &mut dyn Write) -> Result<()> {
    let (project_ref, tail) = args
        .split_first()
        .ok_or_else(|| anyhow!("No project given."))?;

    let resolved = registry::resolve(&session.home, project_ref)
        .with_context(|| format!("Could not resolve project '{}'", project_ref))?;
    let global = config_loader::load_global(&session.home.global_file())
        .context("Could not load the global configuration")?;

    let invocation = arg_parser::split_invocation(tail);
    let root = resolved.root.display().to_string();
    let outcome = planner::build(&resolved.meta, &root, &global, &invocation);
    for miss in &outcome.misses {
        log::warn!("[{}] {}", resolved.meta.info.name, miss);
    }

    let script = render::render(&outcome.plan, &session.dialect, &session.plugins_dir)
        .with_context(|| format!("Could not render a '{}' script", session.dialect))?;
    out.write_all(script.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::PmHome;
    use std::{fs, path::Path};
    use tempfile::{TempDir, tempdir};

    const META: &str = r#"
info:
  name: subzero
  description: demo service
  root: .
vars:
  port: "8080"
func:
  use-java:
    params:
      version:
        required: true
    script: sdk use java @{version}
commands:
  build:
    description: Build it
    cmd:
      - "_{use-java(version=21.0.8-tem)}"
      - mvn package @{args}
  serve:
    cmd: "_{global.say(text='on #{vars.port}')}"
  greet:
    cmd: "echo #{global.vars.greeting}"
"#;

    const GLOBAL: &str = r#"
vars:
  greeting: hola
  port: "9090"
func:
  say:
    script: echo @{text}
"#;

    struct Fixture {
        _tmp: TempDir,
        session: Session,
        meta: String,
        root: String,
    }

    fn fixture(dialect: &str) -> Fixture {
        let tmp = tempdir().unwrap();
        let home = PmHome::new(tmp.path().join("pm"));
        home.ensure().unwrap();
        fs::write(home.global_file(), GLOBAL).unwrap();

        let proj = tmp.path().join("subzero");
        fs::create_dir_all(&proj).unwrap();
        let meta = proj.join(".pm.meta.yml");
        fs::write(&meta, META).unwrap();
        let root = crate::core::paths::absolutize(&proj, None).unwrap();

        Fixture {
            session: Session {
                plugins_dir: home.plugins_dir().display().to_string(),
                home,
                dialect: dialect.to_string(),
            },
            meta: meta.display().to_string(),
            root: root.display().to_string(),
            _tmp: tmp,
        }
    }

    fn run(fx: &Fixture, tail: &[&str]) -> Result<String> {
        let mut args = vec![fx.meta.clone()];
        args.extend(tail.iter().map(|s| s.to_string()));
        let mut out = Vec::new();
        handle(args, &fx.session, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn body(script: &str) -> Vec<&str> {
        script.lines().collect()
    }

    #[test]
    fn test_bash_script_for_command_sequence() {
        let fx = fixture("bash");
        let script = run(&fx, &[":build", "-DskipTests"]).unwrap();
        assert_eq!(body(&script)[0], "# pm begin");
        assert!(script.contains("sdk use java 21.0.8-tem\nmvn package -DskipTests\n"));
        assert!(script.ends_with("popd >/dev/null\npopd >/dev/null\n# pm end\n"));
        assert!(script.contains(Path::new(&fx.root).file_name().unwrap().to_str().unwrap()));
    }

    #[test]
    fn test_project_and_global_scopes_stay_apart() {
        let fx = fixture("bash");
        let script = run(&fx, &[":serve", ":greet"]).unwrap();
        assert!(body(&script).contains(&"echo on 8080"));
        assert!(body(&script).contains(&"echo hola"));
    }

    #[test]
    fn test_pwsh_script() {
        let fx = fixture("pwsh");
        let script = run(&fx, &["git", "status"]).unwrap();
        let lines = body(&script);
        assert_eq!(lines[1], format!("Push-Location '{}'", fx.root.replace('\'', "''")));
        assert!(lines.contains(&"git status"));
        assert_eq!(lines[lines.len() - 2], "Pop-Location");
    }

    #[test]
    fn test_help_is_rendered_as_echo_lines() {
        let fx = fixture("bash");
        let script = run(&fx, &[":help"]).unwrap();
        assert!(body(&script).contains(&"echo '  :build  - Build it'"));
        assert!(body(&script).contains(&"echo '  :greet  - -'"));
    }

    #[test]
    fn test_missing_renderer_prints_nothing() {
        let fx = fixture("fish");
        let mut out = Vec::new();
        let err = handle(vec![fx.meta.clone(), ":build".to_string()], &fx.session, &mut out)
            .unwrap_err();
        assert!(out.is_empty());
        assert!(format!("{:#}", err).contains("not found"));
    }

    #[test]
    fn test_no_project_is_an_error() {
        let fx = fixture("bash");
        let mut out = Vec::new();
        assert!(handle(vec![], &fx.session, &mut out).is_err());
    }
}
