//! # Config Loader
//!
//! Reads project meta files (YAML, or TOML by extension) and the optional
//! global file. Everything produced here is read-only for the rest of an
//! invocation.

use crate::models::{FuncDef, GlobalConfig, ProjectMeta};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors from loading a meta or global file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The YAML did not match the expected shape.
    #[error("Invalid YAML in '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// The TOML did not match the expected shape.
    #[error("Invalid TOML in '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// The global file's `func` table is malformed.
    #[error("Invalid 'func' section in '{}': {source}", .path.display())]
    GlobalFunctions {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// True for file names pm accepts as project meta files.
pub fn is_meta_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "yml" || ext == "yaml" || ext == "toml"
        })
        .unwrap_or(false)
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a project meta file.
pub fn load_project_meta(path: &Path) -> Result<ProjectMeta, ConfigError> {
    log::debug!("Loading project meta from '{}'", path.display());
    let content = read(path)?;
    parse_project_meta(&content, path)
}

/// Parses meta file content; `origin` selects the format and labels errors.
pub fn parse_project_meta(content: &str, origin: &Path) -> Result<ProjectMeta, ConfigError> {
    if is_toml(origin) {
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: origin.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: origin.to_path_buf(),
            source,
        })
    }
}

#[derive(Deserialize, Default)]
struct GlobalFunctions {
    #[serde(default)]
    func: BTreeMap<String, FuncDef>,
}

/// Loads the global file. A missing file is an empty configuration.
pub fn load_global(path: &Path) -> Result<GlobalConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No global config at '{}'", path.display());
            return Ok(GlobalConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_global(&content, path)
}

/// Parses the global document, keeping it whole for `#{global.*}` lookups.
pub fn parse_global(content: &str, origin: &Path) -> Result<GlobalConfig, ConfigError> {
    let raw: Option<serde_json::Value> =
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: origin.to_path_buf(),
            source,
        })?;
    // An empty file parses as null.
    let raw = match raw {
        Some(value @ serde_json::Value::Object(_)) => value,
        _ => return Ok(GlobalConfig::default()),
    };
    let functions: GlobalFunctions =
        serde_json::from_value(raw.clone()).map_err(|source| ConfigError::GlobalFunctions {
            path: origin.to_path_buf(),
            source,
        })?;
    Ok(GlobalConfig {
        func: functions.func,
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_meta_file() {
        assert!(is_meta_file(Path::new("a/.pm.meta.yml")));
        assert!(is_meta_file(Path::new("meta.YAML")));
        assert!(is_meta_file(Path::new("meta.toml")));
        assert!(!is_meta_file(Path::new("subzero")));
        assert!(!is_meta_file(Path::new("notes.txt")));
    }

    #[test]
    fn test_parse_yaml_meta() {
        let yml = r#"
info:
  name: subzero
  root: /proj
commands:
  build:
    description: Build it
    cmd:
      - "_{use-java(version=21)}"
      - mvn package @{args}
"#;
        let meta = parse_project_meta(yml, Path::new("x.yml")).unwrap();
        assert_eq!(meta.info.name, "subzero");
        assert_eq!(meta.commands["build"].cmd.as_slice().len(), 2);
    }

    #[test]
    fn test_parse_toml_meta() {
        let toml_str = r#"
[info]
name = "tomlproj"
root = "."

[vars]
port = 8080

[func.hello]
script = "echo hello @{who}"
params = { who = { default = "world" } }

[commands.hi]
description = "Say hi"
cmd = ["_{hello()}"]
"#;
        let meta = parse_project_meta(toml_str, Path::new("meta.toml")).unwrap();
        assert_eq!(meta.info.name, "tomlproj");
        assert_eq!(meta.vars["port"], serde_json::json!(8080));
        assert_eq!(meta.func["hello"].params["who"].seed(), Some("world"));
        assert_eq!(meta.commands["hi"].cmd.as_slice(), ["_{hello()}"]);
    }

    #[test]
    fn test_unquoted_colon_line_does_not_reject_meta() {
        let yml = r#"
info:
  name: colons
commands:
  status:
    cmd:
      - echo Status: ok
      - docker ps
  port:
    cmd: 8080
"#;
        let meta = parse_project_meta(yml, Path::new("x.yml")).unwrap();
        assert_eq!(meta.info.name, "colons");
        assert_eq!(meta.commands["status"].cmd.as_slice(), ["docker ps"]);
        assert_eq!(meta.commands["port"].cmd.as_slice(), ["8080"]);
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let err = parse_project_meta("info: [unclosed", Path::new("bad.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert!(err.to_string().contains("bad.yml"));
    }

    #[test]
    fn test_missing_global_is_empty() {
        let tmp = tempdir().unwrap();
        let global = load_global(&tmp.path().join("global.yml")).unwrap();
        assert!(global.func.is_empty());
        assert_eq!(global.raw, serde_json::json!({}));
    }

    #[test]
    fn test_global_keeps_raw_document_and_functions() {
        let yml = r#"
vars:
  x: "42"
func:
  say:
    script: "echo @{text}"
"#;
        let global = parse_global(yml, Path::new("global.yml")).unwrap();
        assert_eq!(global.raw["vars"]["x"], "42");
        assert_eq!(global.func["say"].script.as_slice(), ["echo @{text}"]);
    }

    #[test]
    fn test_empty_global_file() {
        let global = parse_global("", Path::new("global.yml")).unwrap();
        assert_eq!(global, GlobalConfig::default());
    }

    #[test]
    fn test_load_project_meta_from_disk() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(".pm.meta.yml");
        fs::write(&path, "info:\n  name: disk\n  root: .\n").unwrap();
        let meta = load_project_meta(&path).unwrap();
        assert_eq!(meta.info.name, "disk");
    }

    #[test]
    fn test_load_project_meta_missing_file() {
        let err = load_project_meta(Path::new("/definitely/not/here.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
