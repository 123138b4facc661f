// src/core/arg_parser.rs

/// A named command with the arguments that followed it, e.g. `:build -DskipTests`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Command name without the leading `:`.
    pub name: String,
    /// Tokens up to the next command, in order.
    pub args: Vec<String>,
}

impl Chunk {
    /// The trailing tokens as the single `args` parameter string.
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }
}

/// What the user asked for after the project reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A sequence of `:name args...` commands (possibly empty).
    Commands(Vec<Chunk>),
    /// Tokens to be run as one literal command line in the project root.
    Raw(Vec<String>),
}

fn is_command_token(token: &str) -> bool {
    token.starts_with(':')
}

/// Splits `[:build, -D, foo, :run, -d]` into `build [-D foo]` and `run [-d]`.
///
/// If the first token is not a `:command`, the whole list is a raw command line.
pub fn split_invocation(args: &[String]) -> Invocation {
    match args.first() {
        Some(first) if !is_command_token(first) => return Invocation::Raw(args.to_vec()),
        _ => {}
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    for token in args {
        if let Some(name) = token.strip_prefix(':') {
            chunks.push(Chunk {
                name: name.to_string(),
                args: Vec::new(),
            });
        } else if let Some(current) = chunks.last_mut() {
            current.args.push(token.clone());
        }
    }
    log::debug!("Split invocation into {} command(s)", chunks.len());
    Invocation::Commands(chunks)
}
