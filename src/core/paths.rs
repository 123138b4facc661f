// src/core/paths.rs

use crate::constants::{
    ENV_CONFIGS, GLOBAL_CONFIG_FILENAME, PLUGINS_DIRNAME, PM_DIR, REGISTRY_FILENAME,
};
use std::convert::Infallible;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from locating or expanding filesystem paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The user's home directory is unknown.
    #[error("Could not find the home directory.")]
    HomeDirNotFound,
    /// `~` or a variable reference could not be expanded.
    #[error("Failed to expand path '{path}': {reason}")]
    Expansion {
        /// The path as written.
        path: String,
        /// Why expansion failed.
        reason: String,
    },
    /// A directory could not be created.
    #[error("Could not create directory at '{path}': {source}")]
    DirCreation {
        /// The directory pm tried to create.
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The current directory could not be read.
    #[error("Could not make '{path}' absolute: {source}")]
    Absolute {
        /// The relative path.
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a path string.
pub fn expand_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Like [`expand_path`], but an unset variable expands to an empty string
/// instead of failing.
pub fn expand_path_lenient(raw: &str) -> Result<PathBuf, PathError> {
    let home = || dirs::home_dir().map(|h| h.display().to_string());
    let lookup = |name: &str| -> Result<Option<String>, Infallible> {
        Ok(Some(env::var(name).unwrap_or_else(|_| {
            log::debug!("'${}' is not set, expanding it to nothing", name);
            String::new()
        })))
    };
    let expanded =
        shellexpand::full_with_context(raw, home, lookup).map_err(|e| PathError::Expansion {
            path: raw.to_string(),
            reason: e.to_string(),
        })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Returns an absolute, simplified version of `path`, resolving relative paths
/// against `base` (or the current directory when `base` is `None`).
pub fn absolutize(path: &Path, base: Option<&Path>) -> Result<PathBuf, PathError> {
    let joined = match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    };
    let absolute = std::path::absolute(&joined).map_err(|e| PathError::Absolute {
        path: joined.display().to_string(),
        source: e,
    })?;
    Ok(dunce::simplified(&absolute).to_path_buf())
}

/// The pm configuration directory and the files it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmHome {
    dir: PathBuf,
}

impl PmHome {
    /// Uses `dir` as the pm home.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$PM_CONFIGS` when set, otherwise `~/.config/pm`.
    pub fn from_env() -> Result<Self, PathError> {
        if let Ok(custom) = env::var(ENV_CONFIGS)
            && !custom.trim().is_empty()
        {
            return Ok(Self::new(expand_path(&custom)?));
        }
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(Self::new(home.join(".config").join(PM_DIR)))
    }

    /// The pm home directory itself.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if it does not exist yet.
    pub fn ensure(&self) -> Result<(), PathError> {
        if !self.dir.exists() {
            log::debug!("Creating pm home at '{}'", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|e| PathError::DirCreation {
                path: self.dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// `registry.yml` inside the home.
    pub fn registry_file(&self) -> PathBuf {
        self.dir.join(REGISTRY_FILENAME)
    }

    /// `global.yml` inside the home.
    pub fn global_file(&self) -> PathBuf {
        self.dir.join(GLOBAL_CONFIG_FILENAME)
    }

    /// The default external renderer directory.
    pub fn plugins_dir(&self) -> PathBuf {
        self.dir.join(PLUGINS_DIRNAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn test_expand_path_env_var() {
        let home = env::var("HOME").unwrap();
        let path = expand_path("$HOME/plugins").unwrap();
        assert_eq!(path, PathBuf::from(format!("{}/plugins", home)));
    }

    #[test]
    fn test_expand_path_home() {
        let path = expand_path("~/x").unwrap();
        assert!(!path.starts_with("~"));
        assert!(path.ends_with("x"));
    }

    #[test]
    fn test_expand_path_unset_var_is_an_error() {
        assert!(expand_path("$PM_TEST_PATHS_SURELY_UNSET/x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_path_lenient_unset_var_is_empty() {
        let path = expand_path_lenient("$PM_TEST_PATHS_SURELY_UNSET/plugins").unwrap();
        assert_eq!(path, PathBuf::from("/plugins"));
    }

    #[test]
    fn test_expand_path_lenient_expands_home() {
        let path = expand_path_lenient("~/plugins").unwrap();
        assert!(!path.starts_with("~"));
        assert!(path.ends_with("plugins"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolutize_relative_to_base() {
        let base = Path::new("/srv/projects");
        let path = absolutize(Path::new("app"), Some(base)).unwrap();
        assert_eq!(path, PathBuf::from("/srv/projects/app"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolutize_keeps_absolute() {
        let path = absolutize(Path::new("/already/abs"), Some(Path::new("/ignored"))).unwrap();
        assert_eq!(path, PathBuf::from("/already/abs"));
    }

    #[test]
    fn test_home_layout_and_ensure() {
        let tmp = tempdir().unwrap();
        let home = PmHome::new(tmp.path().join("nested").join("pm"));
        home.ensure().unwrap();
        assert!(home.dir().is_dir());
        assert!(home.registry_file().ends_with("registry.yml"));
        assert!(home.global_file().ends_with("global.yml"));
        assert!(home.plugins_dir().ends_with("plugins"));
    }
}
