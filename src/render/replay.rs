use std::collections::BTreeMap;

use crate::{
    compile::{
        pass::Environment,
        recorder::{CompiledSequence, Op},
    },
    foundation::error::{FramepassError, FramepassResult},
    render::resources::{CallbackRef, ShaderRef, SourceRef, TargetRef},
};

enum Step<'a, C> {
    BindTarget(&'a TargetRef<C>),
    BindShader(&'a ShaderRef<C>),
    Upload {
        shader: &'a ShaderRef<C>,
        uniform: &'a str,
        source: &'a SourceRef,
    },
    Draw(&'a CallbackRef<C>),
}

fn lookup<'a, R>(table: &'a BTreeMap<String, R>, kind: &str, name: &str) -> FramepassResult<&'a R> {
    table
        .get(name)
        .ok_or_else(|| FramepassError::replay(format!("{kind} `{name}` is not in the environment")))
}

fn resolve<'a, C>(op: &'a Op, env: &'a Environment<C>) -> FramepassResult<Step<'a, C>> {
    Ok(match op {
        Op::BindTarget { target } => Step::BindTarget(lookup(&env.targets, "target", target)?),
        Op::BindShader { shader } => Step::BindShader(lookup(&env.shaders, "shader", shader)?),
        Op::Upload {
            shader,
            uniform,
            source,
        } => Step::Upload {
            shader: lookup(&env.shaders, "shader", shader)?,
            uniform,
            source: lookup(&env.sources, "data source", source)?,
        },
        Op::Draw { callback, .. } => Step::Draw(lookup(&env.callbacks, "draw callback", callback)?),
    })
}

/// Issue `sequence` against `ctx`, resolving names through `env`.
///
/// Every name is resolved before the first GPU call, so a sequence that does not fit its
/// environment fails without touching `ctx`.
pub fn execute_sequence<C>(
    sequence: &CompiledSequence,
    env: &Environment<C>,
    ctx: &mut C,
) -> FramepassResult<()> {
    let steps = sequence
        .ops
        .iter()
        .map(|op| resolve(op, env))
        .collect::<FramepassResult<Vec<_>>>()?;

    for step in steps {
        match step {
            Step::BindTarget(target) => target.bind(ctx),
            Step::BindShader(shader) => shader.bind(ctx),
            Step::Upload {
                shader,
                uniform,
                source,
            } => shader.upload(ctx, uniform, &source.value()),
            Step::Draw(callback) => callback.draw(ctx),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/replay.rs"]
mod tests;
