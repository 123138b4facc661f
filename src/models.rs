// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- BODY MODELS ---
// A function script or a command body may be written as one string or as a
// list of strings. Both shapes are normalized into `Lines` while loading, so
// the template engine only ever sees an ordered list of lines. Scalars are
// taken as their text; nested maps and lists are dropped with a warning.

/// The raw, user-facing shape of a body in a meta file.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum Body {
    /// A single line.
    Single(String),
    /// One line per entry.
    Sequence(Vec<serde_json::Value>),
    /// Anything else: a bare number, a boolean, `null` or a map.
    Other(serde_json::Value),
}

/// A normalized body: an ordered list of template lines.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(from = "Body", into = "Vec<String>")]
pub struct Lines(Vec<String>);

impl Lines {
    /// Wraps already normalized lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self(lines)
    }

    /// The lines in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// True when the body has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn scalar_line(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null => None,
        other => {
            log::warn!(
                "Skipping body line that is not text: {} (quote it to keep it)",
                other
            );
            None
        }
    }
}

impl From<Body> for Lines {
    fn from(body: Body) -> Self {
        match body {
            Body::Single(s) => Self(vec![s]),
            Body::Sequence(items) => Self(items.into_iter().filter_map(scalar_line).collect()),
            Body::Other(value) => Self(scalar_line(value).into_iter().collect()),
        }
    }
}

impl From<Lines> for Vec<String> {
    fn from(lines: Lines) -> Self {
        lines.0
    }
}

impl From<&str> for Lines {
    fn from(line: &str) -> Self {
        Self(vec![line.to_string()])
    }
}

// --- FUNCTIONS AND COMMANDS ---

/// Metadata for a single function parameter.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMeta {
    /// A call without a non-empty value for it is skipped.
    #[serde(default)]
    pub required: bool,
    /// Used when the call does not supply the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParamMeta {
    /// The value pre-seeded into a call before its arguments are applied.
    /// An empty default counts as no default at all.
    pub fn seed(&self) -> Option<&str> {
        self.default.as_deref().filter(|d| !d.is_empty())
    }
}

/// A named, reusable text template callable as `_{name(args)}`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncDef {
    /// Declared parameters by name.
    #[serde(default)]
    pub params: BTreeMap<String, ParamMeta>,
    /// The template body; its lines are chained with `&&`.
    #[serde(default)]
    pub script: Lines,
}

/// A user-invocable action, run as `:name` on the command line.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDef {
    /// Shown next to the command in the help listing.
    #[serde(default)]
    pub description: String,
    /// Template lines, each rendered into one script line.
    #[serde(default)]
    pub cmd: Lines,
}

// --- PROJECT META (What is read from `.pm.meta.yml`) ---

/// The `info` section of a meta file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInfo {
    /// The name the project is registered under.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Project root, relative to the meta file when not absolute.
    #[serde(default)]
    pub root: String,
}

/// The `docker` section, used by `:up`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerDef {
    /// Compose file passed to `docker compose -f`.
    #[serde(default)]
    pub compose_file: String,
    /// Named service lists, addressed as `@group`.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

/// Represents the deserialized structure of a project meta file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMeta {
    #[serde(default)]
    pub info: ProjectInfo,
    /// Project functions, called as `_{name(...)}`.
    #[serde(default)]
    pub func: BTreeMap<String, FuncDef>,
    /// Commands by name, without the leading `:`.
    #[serde(default)]
    pub commands: BTreeMap<String, CommandDef>,
    #[serde(default)]
    pub docker: DockerDef,
    /// Free-form data readable from templates as `#{vars.<path>}`.
    #[serde(default)]
    pub vars: BTreeMap<String, serde_json::Value>,
}

impl ProjectMeta {
    /// The fixed projection of the project exposed to `#{...}` lookups:
    /// `info.{name,description,root}` and `vars`.
    pub fn template_view(&self) -> serde_json::Value {
        let vars: serde_json::Map<String, serde_json::Value> = self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::json!({
            "info": {
                "name": self.info.name,
                "description": self.info.description,
                "root": self.info.root,
            },
            "vars": vars,
        })
    }
}

// --- GLOBAL CONFIG (`global.yml`) ---

/// Global functions plus the whole global document, addressable through
/// `#{global.<path>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    /// Functions from the `func` table, called as `_{global.name(...)}`.
    pub func: BTreeMap<String, FuncDef>,
    /// The whole document, or an empty object.
    pub raw: serde_json::Value,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            func: BTreeMap::new(),
            raw: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

// --- REGISTRY (`registry.yml`) ---

/// Every project registered with `pm add`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// In registration order.
    #[serde(default)]
    pub projects: Vec<RegProject>,
}

/// One registry entry.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RegProject {
    /// Unique project name.
    pub name: String,
    /// Absolute path of the meta file.
    pub meta: String,
    /// Absolute project root.
    pub root: String,
}
