use std::{collections::HashMap, fmt};

use crate::{compile::pass::DepointerizedPass, foundation::error::FramepassResult};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
/// Primitive GPU operation. Resources are referenced by environment name.
pub enum Op {
    /// Direct subsequent draws into a target.
    BindTarget {
        /// Target entry.
        target: String,
    },
    /// Make a shader current.
    BindShader {
        /// Shader entry.
        shader: String,
    },
    /// Upload a source's current value into a uniform of the bound shader.
    Upload {
        /// Shader entry.
        shader: String,
        /// Uniform name.
        uniform: String,
        /// Source entry.
        source: String,
    },
    /// Invoke a pass's draw callback.
    Draw {
        /// Pass name.
        pass: String,
        /// Callback entry.
        callback: String,
    },
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::BindTarget { target } => write!(f, "bind target {target}"),
            Op::BindShader { shader } => write!(f, "bind shader {shader}"),
            Op::Upload {
                shader,
                uniform,
                source,
            } => write!(f, "upload {shader}.{uniform} <- {source}"),
            Op::Draw { pass, callback } => write!(f, "draw {callback} ({pass})"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Ordered, replayable list of [`Op`]s.
pub struct CompiledSequence {
    /// Ops in issue order.
    pub ops: Vec<Op>,
}

impl CompiledSequence {
    /// Number of ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether replaying does nothing.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of draw ops.
    pub fn draw_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Draw { .. }))
            .count()
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> FramepassResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for CompiledSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{i:>4}  {op}")?;
        }
        Ok(())
    }
}

/// Emits ops for accepted passes while suppressing redundant state changes.
///
/// Uniform memory is kept per shader: a program retains its uniforms across binds, so
/// rebinding a shader only re-uploads uniforms whose source changed since it was last used.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    ops: Vec<Op>,
    current_target: Option<String>,
    current_shader: Option<String>,
    uploaded: HashMap<String, HashMap<String, String>>,
}

impl Recorder {
    pub(crate) fn record(&mut self, pass: &DepointerizedPass) {
        if let Some(shader) = &pass.shader {
            if self.current_target.as_ref() != Some(&pass.target) {
                self.ops.push(Op::BindTarget {
                    target: pass.target.clone(),
                });
                self.current_target = Some(pass.target.clone());
            }

            if self.current_shader.as_ref() != Some(shader) {
                self.ops.push(Op::BindShader {
                    shader: shader.clone(),
                });
                self.current_shader = Some(shader.clone());
            }

            let memory = self.uploaded.entry(shader.clone()).or_default();
            for (uniform, source) in &pass.uniforms {
                let Some(source) = source else {
                    continue;
                };
                if memory.get(uniform) == Some(source) {
                    continue;
                }
                self.ops.push(Op::Upload {
                    shader: shader.clone(),
                    uniform: uniform.clone(),
                    source: source.clone(),
                });
                memory.insert(uniform.clone(), source.clone());
            }
        }

        self.ops.push(Op::Draw {
            pass: pass.name.clone(),
            callback: pass.draw.clone(),
        });
    }

    pub(crate) fn finish(self) -> CompiledSequence {
        CompiledSequence { ops: self.ops }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/recorder.rs"]
mod tests;
