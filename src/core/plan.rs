// src/core/plan.rs

use serde::{Deserialize, Serialize};

/// One abstract step of a generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Enter a working directory.
    #[allow(missing_docs)]
    ChangeDir { path: String },
    /// Leave the most recently entered directory.
    RestoreDir,
    /// A dialect-neutral status line.
    #[allow(missing_docs)]
    Emit { text: String },
    /// A literal command line, emitted verbatim.
    #[allow(missing_docs)]
    Execute { line: String },
}

/// An ordered, append-only transcript of operations.
///
/// The plan does not check that `ChangeDir`/`RestoreDir` are balanced; that
/// discipline belongs to whoever builds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    ops: Vec<Op>,
}

impl Plan {
    /// An empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends [`Op::ChangeDir`].
    pub fn push_change_dir(&mut self, path: impl Into<String>) {
        self.ops.push(Op::ChangeDir { path: path.into() });
    }

    /// Appends [`Op::RestoreDir`].
    pub fn push_restore_dir(&mut self) {
        self.ops.push(Op::RestoreDir);
    }

    /// Appends [`Op::Emit`].
    pub fn push_emit(&mut self, text: impl Into<String>) {
        self.ops.push(Op::Emit { text: text.into() });
    }

    /// Appends [`Op::Execute`].
    pub fn push_execute(&mut self, line: impl Into<String>) {
        self.ops.push(Op::Execute { line: line.into() });
    }

    /// The operations in the order they were pushed.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// True when nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The directory of the first `ChangeDir`, or `.` when there is none.
    pub fn root(&self) -> &str {
        self.ops
            .iter()
            .find_map(|op| match op {
                Op::ChangeDir { path } => Some(path.as_str()),
                _ => None,
            })
            .unwrap_or(".")
    }
}

// --- EXCHANGE FORMAT ---
// The document piped to external renderers. Field names are part of the
// protocol; new optional fields may be appended, existing ones never change.

/// The JSON document an external renderer reads from stdin.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
    /// See [`Plan::root`].
    pub root: String,
    /// The plan's operations, in order.
    pub ops: Vec<WireOp>,
}

/// One operation on the wire, tagged by `kind`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum WireOp {
    Pushd { dir: String },
    Popd,
    Echo { msg: String },
    Run { line: String },
}

impl From<&Plan> for PlanDocument {
    fn from(plan: &Plan) -> Self {
        let ops = plan
            .ops()
            .iter()
            .map(|op| match op {
                Op::ChangeDir { path } => WireOp::Pushd { dir: path.clone() },
                Op::RestoreDir => WireOp::Popd,
                Op::Emit { text } => WireOp::Echo { msg: text.clone() },
                Op::Execute { line } => WireOp::Run { line: line.clone() },
            })
            .collect();
        Self {
            root: plan.root().to_string(),
            ops,
        }
    }
}

impl From<PlanDocument> for Plan {
    fn from(doc: PlanDocument) -> Self {
        let mut plan = Plan::new();
        for op in doc.ops {
            match op {
                WireOp::Pushd { dir } => plan.push_change_dir(dir),
                WireOp::Popd => plan.push_restore_dir(),
                WireOp::Echo { msg } => plan.push_emit(msg),
                WireOp::Run { line } => plan.push_execute(line),
            }
        }
        plan
    }
}
