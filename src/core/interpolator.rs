// src/core/interpolator.rs

//! Template substitution for command and function bodies.
//!
//! Four reference kinds are expanded, always in this order, each stage scanning
//! the output of the previous one:
//!
//! 1. `${NAME}`: process environment.
//! 2. `@{name}`: invocation parameters.
//! 3. `#{path}`: configuration lookup (`global.` prefix, or leading dots for
//!    enclosing call frames).
//! 4. `_{name(args)}`: function calls, which re-enter all four stages for
//!    every line of the called function's body.
//!
//! Nothing here fails. Every reference that cannot be resolved becomes an
//! empty string and is recorded as a [`ResolutionMiss`].

use crate::{
    core::parameters::parse_call_args,
    models::{FuncDef, GlobalConfig, ProjectMeta},
};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use std::{collections::BTreeMap, env, fmt};

lazy_static! {
    static ref ENV_RE: Regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    static ref PARAM_RE: Regex = Regex::new(r"@\{([A-Za-z0-9_.-]+)\}").unwrap();
    static ref CONFIG_RE: Regex = Regex::new(r"#\{([^}]+)\}").unwrap();
    static ref CALL_RE: Regex = Regex::new(r"_\{([A-Za-z0-9_.-]+)\((.*?)\)\}").unwrap();
}

/// Nested function expansions allowed before a call is abandoned.
const MAX_RECURSION_DEPTH: usize = 32;

const GLOBAL_PREFIX: &str = "global.";

/// A reference that could not be resolved and was replaced by an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionMiss {
    /// `${NAME}` with `NAME` unset.
    EnvVar(String),
    /// `@{name}` with no such parameter.
    Param(String),
    /// `#{a.b}` pointing nowhere.
    ConfigPath(String),
    /// `_{name(...)}` naming no function in either scope.
    UnknownFunction(String),
    /// A call that left a required parameter without a value.
    MissingRequired {
        /// The function that was skipped.
        function: String,
        /// The first required parameter found empty.
        param: String,
    },
    /// A call nested deeper than the engine allows.
    DepthExceeded(String),
}

impl fmt::Display for ResolutionMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar(name) => write!(f, "environment variable '${{{}}}' is not set", name),
            Self::Param(name) => write!(f, "parameter '@{{{}}}' was not supplied", name),
            Self::ConfigPath(path) => write!(f, "config path '#{{{}}}' not found", path),
            Self::UnknownFunction(name) => write!(f, "function '{}' is not defined", name),
            Self::MissingRequired { function, param } => write!(
                f,
                "function '{}' skipped: required parameter '{}' is missing",
                function, param
            ),
            Self::DepthExceeded(name) => write!(
                f,
                "function '{}' skipped: more than {} nested calls",
                name, MAX_RECURSION_DEPTH
            ),
        }
    }
}

/// The output of a render together with everything that resolved to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The expanded text.
    pub text: String,
    /// Misses in the order they were met.
    pub misses: Vec<ResolutionMiss>,
}

/// Renders `text` against both scopes with a caller-supplied context stack.
pub fn render(
    text: &str,
    params: &BTreeMap<String, String>,
    project: &ProjectMeta,
    global: &GlobalConfig,
    context: &[Value],
) -> String {
    Interpolator::new(project, global)
        .render_in(text, params, context)
        .text
}

/// Expands templates against a project scope and the global scope.
///
/// Both scopes are borrowed read-only; the context stack is rebuilt for every
/// call so sibling expansions never observe each other's frames.
#[derive(Debug)]
pub struct Interpolator<'a> {
    project: &'a ProjectMeta,
    global: &'a GlobalConfig,
    project_view: Value,
}

impl<'a> Interpolator<'a> {
    /// Borrows both scopes for the lifetime of the engine.
    pub fn new(project: &'a ProjectMeta, global: &'a GlobalConfig) -> Self {
        Self {
            project,
            global,
            project_view: project.template_view(),
        }
    }

    /// Renders a top-level template, discarding the miss report.
    pub fn render(&self, text: &str, params: &BTreeMap<String, String>) -> String {
        self.render_report(text, params).text
    }

    /// Renders a top-level template with a fresh, empty context stack.
    pub fn render_report(&self, text: &str, params: &BTreeMap<String, String>) -> Rendered {
        self.render_in(text, params, &[])
    }

    /// Renders with an explicit context stack (outermost frame first).
    pub fn render_in(
        &self,
        text: &str,
        params: &BTreeMap<String, String>,
        context: &[Value],
    ) -> Rendered {
        let mut misses = Vec::new();
        let text = self.expand(text, params, context, &mut misses);
        for miss in &misses {
            log::debug!("Unresolved reference: {}", miss);
        }
        Rendered { text, misses }
    }

    fn expand(
        &self,
        text: &str,
        params: &BTreeMap<String, String>,
        context: &[Value],
        misses: &mut Vec<ResolutionMiss>,
    ) -> String {
        // 1. ${ENV}
        let text = ENV_RE.replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            env::var(name).unwrap_or_else(|_| {
                misses.push(ResolutionMiss::EnvVar(name.to_string()));
                String::new()
            })
        });

        // 2. @{param}
        let text = PARAM_RE.replace_all(&text, |caps: &Captures| {
            let name = &caps[1];
            params.get(name).cloned().unwrap_or_else(|| {
                misses.push(ResolutionMiss::Param(name.to_string()));
                String::new()
            })
        });

        // 3. #{config.path}
        let text = CONFIG_RE.replace_all(&text, |caps: &Captures| {
            let path = &caps[1];
            match self.lookup(path, context) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => serde_json::to_string(other).unwrap_or_default(),
                None => {
                    misses.push(ResolutionMiss::ConfigPath(path.to_string()));
                    String::new()
                }
            }
        });

        // 4. _{func(args)}
        CALL_RE
            .replace_all(&text, |caps: &Captures| {
                self.expand_call(&caps[1], &caps[2], context, misses)
            })
            .into_owned()
    }

    /// Resolves a `#{...}` path. `global.` selects the global document, leading
    /// dots select a frame counted from the innermost call, anything else reads
    /// the project view.
    fn lookup<'v>(&'v self, path: &str, context: &'v [Value]) -> Option<&'v Value> {
        if let Some(rest) = path.strip_prefix(GLOBAL_PREFIX) {
            return dig(&self.global.raw, rest);
        }
        let dots = path.len() - path.trim_start_matches('.').len();
        if dots == 0 {
            return dig(&self.project_view, path);
        }
        let index = context.len().checked_sub(dots)?;
        dig(context.get(index)?, &path[dots..])
    }

    fn expand_call(
        &self,
        full_name: &str,
        arg_str: &str,
        context: &[Value],
        misses: &mut Vec<ResolutionMiss>,
    ) -> String {
        let func = match full_name.strip_prefix(GLOBAL_PREFIX) {
            Some(name) => self.global.func.get(name),
            None => self.project.func.get(full_name),
        };
        let Some(func) = func else {
            misses.push(ResolutionMiss::UnknownFunction(full_name.to_string()));
            return String::new();
        };
        if context.len() >= MAX_RECURSION_DEPTH {
            misses.push(ResolutionMiss::DepthExceeded(full_name.to_string()));
            return String::new();
        }

        let mut effective: BTreeMap<String, String> = func
            .params
            .iter()
            .filter_map(|(name, meta)| meta.seed().map(|d| (name.clone(), d.to_string())))
            .collect();
        effective.extend(parse_call_args(arg_str));

        if let Some((param, _)) = func
            .params
            .iter()
            .find(|(name, meta)| meta.required && !effective.contains_key(*name))
        {
            misses.push(ResolutionMiss::MissingRequired {
                function: full_name.to_string(),
                param: param.clone(),
            });
            return String::new();
        }

        let mut inner_context = context.to_vec();
        inner_context.push(call_frame(func));

        func.script
            .as_slice()
            .iter()
            .map(|line| self.expand(line, &effective, &inner_context, misses))
            .collect::<Vec<_>>()
            .join(" && ")
    }
}

fn call_frame(func: &FuncDef) -> Value {
    let mut frame = serde_json::Map::new();
    frame.insert(
        "func".to_string(),
        serde_json::to_value(func).unwrap_or(Value::Null),
    );
    Value::Object(frame)
}

/// Walks a dot-separated key path through nested maps.
/// An empty path yields the root itself.
pub fn dig<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.')
        .try_fold(root, |node, key| node.as_object()?.get(key))
}
