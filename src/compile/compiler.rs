use crate::{
    compile::{
        dedup::Deduplicator,
        pass::{DepointerizedPass, Environment, PassDesc},
        recorder::{CompiledSequence, Recorder},
        validate::{PassReport, PassState, PassValidator, check_structure},
    },
    foundation::error::FramepassResult,
    render::{
        replay::execute_sequence,
        resources::{CallbackRef, ShaderRef, SourceRef, TargetRef},
    },
};

/// Environment name shared by every canvas target.
pub const CANVAS: &str = "CANVAS";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Compiler configuration.
pub struct CompileOpts {
    /// Log every diagnostic of a rejected pass at `warn` level.
    pub log_diagnostics: bool,
}

impl Default for CompileOpts {
    fn default() -> Self {
        Self {
            log_diagnostics: true,
        }
    }
}

impl CompileOpts {
    /// Parse options from JSON. Missing keys take their default values.
    pub fn from_json(json: &str) -> FramepassResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Output of [`compile_passes`]: the op sequence plus everything it closes over.
pub struct Compiled<C> {
    /// Recorded ops.
    pub sequence: CompiledSequence,
    /// Resources the ops refer to.
    pub env: Environment<C>,
    /// Depointerized form of every pass that made it past the structural gate.
    pub passes: Vec<DepointerizedPass>,
    /// One report per input pass, in input order.
    pub reports: Vec<PassReport>,
}

impl<C> Compiled<C> {
    /// Issue the compiled ops against `ctx`. Can be called any number of times.
    pub fn replay(&self, ctx: &mut C) -> FramepassResult<()> {
        execute_sequence(&self.sequence, &self.env, ctx)
    }

    /// Number of passes recorded into the sequence.
    pub fn accepted(&self) -> usize {
        self.reports.iter().filter(|r| r.is_accepted()).count()
    }

    /// Reports of the skipped passes.
    pub fn rejected(&self) -> impl Iterator<Item = &PassReport> {
        self.reports.iter().filter(|r| r.is_rejected())
    }
}

impl<C> std::fmt::Debug for Compiled<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiled")
            .field("sequence", &self.sequence)
            .field("env", &self.env)
            .field("passes", &self.passes)
            .field("reports", &self.reports)
            .finish()
    }
}

struct Namer<C> {
    shaders: Deduplicator<ShaderRef<C>>,
    targets: Deduplicator<TargetRef<C>>,
    sources: Deduplicator<SourceRef>,
    callbacks: Deduplicator<CallbackRef<C>>,
}

impl<C> Namer<C> {
    fn new() -> Self {
        Self {
            shaders: Deduplicator::new(),
            targets: Deduplicator::with_reserved([CANVAS]),
            sources: Deduplicator::new(),
            callbacks: Deduplicator::new(),
        }
    }

    /// Name every resource of a structurally valid pass.
    fn depointerize(
        &mut self,
        pass: &PassDesc<C>,
        target: &TargetRef<C>,
        draw: &CallbackRef<C>,
    ) -> DepointerizedPass {
        let target = if target.is_canvas() {
            self.targets.reserve(CANVAS, target)
        } else {
            self.targets.add(target, &pass.name)
        };
        let draw = self.callbacks.add(draw, &pass.name);

        let mut out = DepointerizedPass {
            name: pass.name.clone(),
            shader: None,
            target,
            uniforms: Default::default(),
            uniform_types: Default::default(),
            draw,
        };

        let Some(shader) = &pass.shader else {
            if !pass.uniforms.is_empty() {
                tracing::debug!(pass = %pass.name, "uniforms of a pass without shader are ignored");
            }
            return out;
        };

        let hint = if shader.name().is_empty() {
            pass.name.as_str()
        } else {
            shader.name()
        };
        out.shader = Some(self.shaders.add(shader, hint));

        for (uniform, source) in &pass.uniforms {
            let Some(info) = shader.uniform(uniform) else {
                tracing::debug!(
                    pass = %pass.name,
                    uniform = %uniform,
                    "shader does not declare uniform, dropped"
                );
                continue;
            };
            let source = source.as_ref().map(|s| self.sources.add(s, uniform));
            out.uniforms.insert(uniform.clone(), source);
            out.uniform_types.insert(uniform.clone(), info.ty);
        }
        out
    }

    fn into_environment(self) -> Environment<C> {
        Environment {
            shaders: self.shaders.into_table(),
            targets: self.targets.into_table(),
            sources: self.sources.into_table(),
            callbacks: self.callbacks.into_table(),
        }
    }
}

/// Compile `passes` into a minimal op sequence.
///
/// Never fails: passes that do not validate are reported in [`Compiled::reports`] and left
/// out of the sequence, so a list with no valid pass compiles to an empty sequence.
#[tracing::instrument(skip(passes, opts), fields(count = passes.len()))]
pub fn compile_passes<C>(passes: &[PassDesc<C>], opts: &CompileOpts) -> Compiled<C> {
    let mut namer = Namer::new();
    let mut reports = Vec::with_capacity(passes.len());
    let mut depointerized = Vec::with_capacity(passes.len());

    for (idx, pass) in passes.iter().enumerate() {
        let report = check_structure(pass);
        if let (PassState::StructurallyValid, Some(target), Some(draw)) =
            (report.state, &pass.target, &pass.draw)
        {
            depointerized.push((idx, namer.depointerize(pass, target, draw)));
        }
        reports.push(report);
    }

    let env = namer.into_environment();
    let mut recorder = Recorder::default();
    for (idx, pass) in &depointerized {
        let report = PassValidator::check(pass, &env);
        if report.is_accepted() {
            recorder.record(pass);
        }
        reports[*idx] = report;
    }

    if opts.log_diagnostics {
        for report in reports.iter().filter(|r| r.is_rejected()) {
            for diagnostic in &report.diagnostics {
                tracing::warn!("{diagnostic}");
            }
        }
    }

    let sequence = recorder.finish();
    tracing::debug!(
        ops = sequence.len(),
        rejected = reports.iter().filter(|r| r.is_rejected()).count(),
        "compiled pass sequence"
    );

    Compiled {
        sequence,
        env,
        passes: depointerized.into_iter().map(|(_, pass)| pass).collect(),
        reports,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
