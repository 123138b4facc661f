// src/core/planner.rs

use crate::{
    core::{
        arg_parser::{Chunk, Invocation},
        docker,
        interpolator::{Interpolator, ResolutionMiss},
        plan::Plan,
    },
    models::{GlobalConfig, ProjectMeta},
};
use std::collections::BTreeMap;

/// Reserved parameter carrying a command's trailing tokens.
const ARGS_PARAM: &str = "args";

/// A finished plan plus every template reference that resolved to nothing.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    /// The operations to render.
    pub plan: Plan,
    /// References that expanded to nothing, for the caller to report.
    pub misses: Vec<ResolutionMiss>,
}

/// Builds the plan for one invocation of a project.
///
/// The plan enters `root` first and leaves it last. Raw invocations run
/// verbatim; `:help` and `:up` are built-ins; everything else is looked up in
/// the project's command table and rendered line by line.
pub fn build(
    project: &ProjectMeta,
    root: &str,
    global: &GlobalConfig,
    invocation: &Invocation,
) -> PlanOutcome {
    let mut outcome = PlanOutcome::default();
    outcome.plan.push_change_dir(root);

    match invocation {
        Invocation::Raw(tokens) => {
            let line = tokens.join(" ");
            if !line.trim().is_empty() {
                outcome.plan.push_execute(line);
            }
        }
        Invocation::Commands(chunks) => {
            let interpolator = Interpolator::new(project, global);
            for chunk in chunks {
                push_chunk(&mut outcome, project, &interpolator, chunk);
            }
        }
    }

    outcome.plan.push_restore_dir();
    outcome
}

fn push_chunk(
    outcome: &mut PlanOutcome,
    project: &ProjectMeta,
    interpolator: &Interpolator,
    chunk: &Chunk,
) {
    match chunk.name.as_str() {
        "help" => push_help(&mut outcome.plan, project),
        "up" => outcome
            .plan
            .push_execute(docker::compose_up(&project.docker, &chunk.args)),
        name => {
            let Some(command) = project.commands.get(name) else {
                log::debug!("Unknown command ':{}'", name);
                outcome
                    .plan
                    .push_emit(format!("# pm: unknown command :{}", name));
                return;
            };
            let params = BTreeMap::from([(ARGS_PARAM.to_string(), chunk.joined_args())]);
            for raw in command.cmd.as_slice() {
                let rendered = interpolator.render_report(raw, &params);
                outcome.misses.extend(rendered.misses);
                if !rendered.text.trim().is_empty() {
                    outcome.plan.push_execute(rendered.text);
                }
            }
        }
    }
}

fn push_help(plan: &mut Plan, project: &ProjectMeta) {
    plan.push_emit("# pm: project commands:");
    for (name, command) in &project.commands {
        let description = match command.description.trim() {
            "" => "-",
            d => d,
        };
        plan.push_emit(format!("  :{}  - {}", name, description));
    }
    plan.push_emit("# pm: built-ins: :up (docker compose up -d ...)");
}
