// src/core/registry.rs

use crate::{
    core::{
        config_loader::{self, ConfigError},
        paths::{self, PathError, PmHome},
    },
    models::{ProjectMeta, RegProject, Registry},
};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Represents errors that can occur while reading or updating the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Reading or writing `registry.yml` failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The pm home could not be created or a path could not be expanded.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// A meta file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// `registry.yml` is not valid YAML for a registry.
    #[error("Registry file is corrupted: {0}")]
    Corrupted(#[source] serde_yaml::Error),
    /// The registry could not be written back as YAML.
    #[error("Failed to serialize the registry: {0}")]
    Serialize(#[source] serde_yaml::Error),
    /// `pm add` was given a path that does not exist.
    #[error("Meta file not found: {}", .0.display())]
    MetaNotFound(PathBuf),
    /// The meta file lacks `info.name` or `info.root`.
    #[error("Meta file '{}' must define both info.name and info.root.", .0.display())]
    IncompleteMeta(PathBuf),
    /// `pm rm` named a project that is not registered.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    /// Neither a registered name nor an existing meta file.
    #[error("Project not found in registry or file does not exist: {0}")]
    Unresolvable(String),
}

type RegistryResult<T> = Result<T, RegistryError>;

/// A project ready for script generation.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    /// The loaded meta file.
    pub meta: ProjectMeta,
    /// Absolute project root.
    pub root: PathBuf,
}

/// Loads the registry, creating an empty one on first use.
pub fn load(home: &PmHome) -> RegistryResult<Registry> {
    let path = home.registry_file();
    match fs::read_to_string(&path) {
        Ok(content) => {
            let registry: Option<Registry> =
                serde_yaml::from_str(&content).map_err(RegistryError::Corrupted)?;
            Ok(registry.unwrap_or_default())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("Registry not found, creating '{}'", path.display());
            let registry = Registry::default();
            save(home, &registry)?;
            Ok(registry)
        }
        Err(e) => Err(e.into()),
    }
}

/// Writes the registry, creating the pm home if needed.
pub fn save(home: &PmHome, registry: &Registry) -> RegistryResult<()> {
    home.ensure()?;
    let content = serde_yaml::to_string(registry).map_err(RegistryError::Serialize)?;
    fs::write(home.registry_file(), content)?;
    Ok(())
}

/// Resolves the root of a project: `~`/env expansion, then made absolute
/// relative to the directory holding the meta file.
fn project_root(meta: &ProjectMeta, meta_path: &Path) -> RegistryResult<PathBuf> {
    let root = paths::expand_path(&meta.info.root)?;
    Ok(paths::absolutize(&root, meta_path.parent())?)
}

/// Registers a project from its meta file, replacing any entry with the same name.
pub fn add(home: &PmHome, meta_path: &str) -> RegistryResult<RegProject> {
    let expanded = paths::expand_path(meta_path)?;
    if !expanded.is_file() {
        return Err(RegistryError::MetaNotFound(expanded));
    }
    let meta_path = paths::absolutize(&expanded, None)?;
    let meta = config_loader::load_project_meta(&meta_path)?;
    if meta.info.name.trim().is_empty() || meta.info.root.trim().is_empty() {
        return Err(RegistryError::IncompleteMeta(meta_path));
    }

    let entry = RegProject {
        name: meta.info.name.clone(),
        meta: meta_path.display().to_string(),
        root: project_root(&meta, &meta_path)?.display().to_string(),
    };

    let mut registry = load(home)?;
    registry.projects.retain(|p| p.name != entry.name);
    registry.projects.push(entry.clone());
    save(home, &registry)?;
    log::debug!("Registered project '{}' -> '{}'", entry.name, entry.root);
    Ok(entry)
}

/// Removes a project by name.
pub fn remove(home: &PmHome, name: &str) -> RegistryResult<()> {
    let mut registry = load(home)?;
    let before = registry.projects.len();
    registry.projects.retain(|p| p.name != name);
    if registry.projects.len() == before {
        return Err(RegistryError::ProjectNotFound(name.to_string()));
    }
    save(home, &registry)
}

/// All registered projects, in registration order.
pub fn list(home: &PmHome) -> RegistryResult<Vec<RegProject>> {
    Ok(load(home)?.projects)
}

/// Resolves a registered project name or a direct path to a meta file.
pub fn resolve(home: &PmHome, name_or_path: &str) -> RegistryResult<ResolvedProject> {
    if let Ok(candidate) = paths::expand_path(name_or_path)
        && candidate.is_file()
        && config_loader::is_meta_file(&candidate)
    {
        let meta_path = paths::absolutize(&candidate, None)?;
        let meta = config_loader::load_project_meta(&meta_path)?;
        let root = project_root(&meta, &meta_path)?;
        return Ok(ResolvedProject { meta, root });
    }

    let registry = load(home)?;
    let entry = registry
        .projects
        .iter()
        .find(|p| p.name == name_or_path)
        .ok_or_else(|| RegistryError::Unresolvable(name_or_path.to_string()))?;
    let meta = config_loader::load_project_meta(Path::new(&entry.meta))?;
    Ok(ResolvedProject {
        meta,
        root: paths::absolutize(Path::new(&entry.root), None)?,
    })
}
