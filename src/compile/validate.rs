use std::fmt;

use crate::{
    compile::pass::{DepointerizedPass, Environment, PassDesc},
    foundation::gltype::Shape,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Validation progress of one pass.
pub enum PassState {
    /// Not looked at yet.
    Unchecked,
    /// Has a target and a draw callback.
    StructurallyValid,
    /// Every name resolves in the environment.
    CrossReferenceValid,
    /// Passed every check; the pass is recorded.
    Accepted,
    /// Failed a check; the pass is skipped.
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// What is wrong with a pass field.
pub enum DiagnosticKind {
    /// No draw target was given.
    MissingTarget,
    /// No draw callback was given.
    MissingDraw,
    /// The shader name does not resolve.
    UnknownShader {
        /// Unresolved name.
        shader: String,
    },
    /// The target name does not resolve.
    UnknownTarget {
        /// Unresolved name.
        target: String,
    },
    /// The callback name does not resolve.
    UnknownCallback {
        /// Unresolved name.
        callback: String,
    },
    /// A uniform's source name does not resolve.
    UnknownSource {
        /// Unresolved name.
        source: String,
    },
    /// The shader declares a uniform the pass does not bind.
    MissingUniform {
        /// Uniform name.
        uniform: String,
    },
    /// A bound source's shape differs from the uniform's declared shape.
    ShapeMismatch {
        /// Uniform name.
        uniform: String,
        /// Shape the shader declares.
        expected: Shape,
        /// Shape the source holds.
        actual: Shape,
    },
    /// The target reports that it cannot be bound for drawing.
    InvalidTarget {
        /// Target name.
        target: String,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget => f.write_str("no draw target given"),
            Self::MissingDraw => f.write_str("no draw callback given"),
            Self::UnknownShader { shader } => {
                write!(f, "shader `{shader}` is not in the environment")
            }
            Self::UnknownTarget { target } => {
                write!(f, "target `{target}` is not in the environment")
            }
            Self::UnknownCallback { callback } => {
                write!(f, "draw callback `{callback}` is not in the environment")
            }
            Self::UnknownSource { source } => {
                write!(f, "data source `{source}` is not in the environment")
            }
            Self::MissingUniform { uniform } => {
                write!(f, "shader requires uniform `{uniform}` but the pass does not bind it")
            }
            Self::ShapeMismatch {
                uniform,
                expected,
                actual,
            } => write!(
                f,
                "uniform `{uniform}` expects {expected} but its source holds {actual}"
            ),
            Self::InvalidTarget { target } => write!(f, "`{target}` is not a bindable draw target"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One problem found in one field of one pass.
pub struct Diagnostic {
    /// Pass name.
    pub pass: String,
    /// Offending field: `shader`, `target`, `draw`, or `uniforms.<name>`.
    pub field: String,
    /// The problem.
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pass `{}`: {}: {}", self.pass, self.field, self.kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Outcome of validating one pass.
pub struct PassReport {
    /// Pass name.
    pub pass: String,
    /// Last state reached.
    pub state: PassState,
    /// Problems found; empty unless the pass was rejected.
    pub diagnostics: Vec<Diagnostic>,
}

impl PassReport {
    /// An unchecked report for `pass`.
    pub fn new(pass: impl Into<String>) -> Self {
        Self {
            pass: pass.into(),
            state: PassState::Unchecked,
            diagnostics: Vec::new(),
        }
    }

    /// Whether the pass made it into the sequence.
    pub fn is_accepted(&self) -> bool {
        self.state == PassState::Accepted
    }

    /// Whether the pass was skipped.
    pub fn is_rejected(&self) -> bool {
        self.state == PassState::Rejected
    }

    fn push(&mut self, field: impl Into<String>, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic {
            pass: self.pass.clone(),
            field: field.into(),
            kind,
        });
    }

    /// Advance to `next` unless a diagnostic was recorded, in which case the pass is rejected.
    /// Returns whether the gate was passed.
    fn gate(&mut self, next: PassState) -> bool {
        if self.diagnostics.is_empty() {
            self.state = next;
            true
        } else {
            self.state = PassState::Rejected;
            false
        }
    }
}

/// Structural gate: a pass needs a target and a draw callback. The shader is optional and an
/// empty name is legal (resources hinted by it are numbered `0`, `1`, ...).
pub fn check_structure<C>(pass: &PassDesc<C>) -> PassReport {
    let mut report = PassReport::new(pass.name.clone());
    if pass.target.is_none() {
        report.push("target", DiagnosticKind::MissingTarget);
    }
    if pass.draw.is_none() {
        report.push("draw", DiagnosticKind::MissingDraw);
    }
    report.gate(PassState::StructurallyValid);
    report
}

/// Cross-reference and contract checks for depointerized passes.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassValidator;

impl PassValidator {
    /// Run the checks that follow the structural gate.
    ///
    /// Every name the pass mentions must resolve in `env`. The target must be bindable. When
    /// a shader is present, each uniform it declares must be bound (explicit `None` counts)
    /// and each bound source must match the declared shape exactly. Uniforms the shader does
    /// not declare are ignored.
    pub fn check<C>(pass: &DepointerizedPass, env: &Environment<C>) -> PassReport {
        let mut report = PassReport::new(pass.name.clone());
        report.state = PassState::StructurallyValid;

        let shader = match &pass.shader {
            Some(name) => match env.shaders.get(name) {
                Some(shader) => Some(shader),
                None => {
                    report.push("shader", DiagnosticKind::UnknownShader { shader: name.clone() });
                    None
                }
            },
            None => None,
        };
        let target = env.targets.get(&pass.target);
        if target.is_none() {
            report.push(
                "target",
                DiagnosticKind::UnknownTarget {
                    target: pass.target.clone(),
                },
            );
        }
        if !env.callbacks.contains_key(&pass.draw) {
            report.push(
                "draw",
                DiagnosticKind::UnknownCallback {
                    callback: pass.draw.clone(),
                },
            );
        }
        if shader.is_some() {
            for (uniform, source) in &pass.uniforms {
                if let Some(source) = source
                    && !env.sources.contains_key(source)
                {
                    report.push(
                        format!("uniforms.{uniform}"),
                        DiagnosticKind::UnknownSource {
                            source: source.clone(),
                        },
                    );
                }
            }
        }
        if !report.gate(PassState::CrossReferenceValid) {
            return report;
        }

        if let Some(target) = target
            && !target.is_target()
        {
            report.push(
                "target",
                DiagnosticKind::InvalidTarget {
                    target: pass.target.clone(),
                },
            );
        }

        if let Some(shader) = shader {
            for info in shader.uniforms() {
                if !pass.uniforms.contains_key(&info.name) {
                    report.push(
                        format!("uniforms.{}", info.name),
                        DiagnosticKind::MissingUniform {
                            uniform: info.name.clone(),
                        },
                    );
                }
            }

            for (uniform, source) in &pass.uniforms {
                let (Some(info), Some(source)) = (shader.uniform(uniform), source) else {
                    continue;
                };
                let Some(source) = env.sources.get(source) else {
                    continue;
                };
                let expected = info.ty.shape();
                let actual = source.shape();
                if expected != actual {
                    report.push(
                        format!("uniforms.{uniform}"),
                        DiagnosticKind::ShapeMismatch {
                            uniform: uniform.clone(),
                            expected,
                            actual,
                        },
                    );
                }
            }
        }

        report.gate(PassState::Accepted);
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/validate.rs"]
mod tests;
