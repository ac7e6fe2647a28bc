use std::{collections::BTreeMap, fmt};

use crate::{
    foundation::gltype::{GlType, Shape},
    render::resources::{CallbackRef, ShaderRef, SourceRef, TargetRef, UniformInfo},
};

/// One logical draw: a target, an optional shader, its uniform bindings and a draw callback.
///
/// Any field may be left unset while building; [`crate::check_structure`] decides whether the
/// result is usable. A `None` uniform entry means "leave this uniform as it is".
pub struct PassDesc<C> {
    /// Pass name, also the naming hint for its target and callback.
    pub name: String,
    /// Shader to bind; `None` draws with whatever is bound.
    pub shader: Option<ShaderRef<C>>,
    /// Where the pass draws.
    pub target: Option<TargetRef<C>>,
    /// Uniform name to data source.
    pub uniforms: BTreeMap<String, Option<SourceRef>>,
    /// Draw side effect.
    pub draw: Option<CallbackRef<C>>,
}

impl<C> PassDesc<C> {
    /// An empty pass called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: None,
            target: None,
            uniforms: BTreeMap::new(),
            draw: None,
        }
    }

    /// Set the shader.
    pub fn shader(mut self, shader: ShaderRef<C>) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Set the draw target.
    pub fn target(mut self, target: TargetRef<C>) -> Self {
        self.target = Some(target);
        self
    }

    /// Feed uniform `name` from `source`.
    pub fn uniform(mut self, name: impl Into<String>, source: SourceRef) -> Self {
        self.uniforms.insert(name.into(), Some(source));
        self
    }

    /// Mark `name` as deliberately untouched by this pass.
    pub fn keep_uniform(mut self, name: impl Into<String>) -> Self {
        self.uniforms.insert(name.into(), None);
        self
    }

    /// Set the draw callback.
    pub fn draw(mut self, draw: CallbackRef<C>) -> Self {
        self.draw = Some(draw);
        self
    }
}

impl<C> Clone for PassDesc<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            shader: self.shader.clone(),
            target: self.target.clone(),
            uniforms: self.uniforms.clone(),
            draw: self.draw.clone(),
        }
    }
}

impl<C> fmt::Debug for PassDesc<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassDesc")
            .field("name", &self.name)
            .field("shader", &self.shader)
            .field("target", &self.target)
            .field("uniforms", &self.uniforms)
            .field("draw", &self.draw)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A pass rewritten to reference environment entries by name.
pub struct DepointerizedPass {
    /// Pass name.
    pub name: String,
    /// Shader entry, if the pass has one.
    pub shader: Option<String>,
    /// Target entry.
    pub target: String,
    /// Uniform name to source name; `None` keeps the uniform untouched.
    pub uniforms: BTreeMap<String, Option<String>>,
    /// Declared type of each bound uniform, as reported by the shader.
    #[serde(default)]
    pub uniform_types: BTreeMap<String, GlType>,
    /// Callback entry.
    pub draw: String,
}

/// Named resources a compiled sequence closes over. One namespace per resource kind.
pub struct Environment<C> {
    /// Shaders by name.
    pub shaders: BTreeMap<String, ShaderRef<C>>,
    /// Draw targets by name.
    pub targets: BTreeMap<String, TargetRef<C>>,
    /// Uniform data sources by name.
    pub sources: BTreeMap<String, SourceRef>,
    /// Draw callbacks by name.
    pub callbacks: BTreeMap<String, CallbackRef<C>>,
}

impl<C> Default for Environment<C> {
    fn default() -> Self {
        Self {
            shaders: BTreeMap::new(),
            targets: BTreeMap::new(),
            sources: BTreeMap::new(),
            callbacks: BTreeMap::new(),
        }
    }
}

impl<C> Environment<C> {
    /// Whether every table is empty.
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
            && self.targets.is_empty()
            && self.sources.is_empty()
            && self.callbacks.is_empty()
    }

    /// Serializable description of the environment for debug dumps.
    pub fn manifest(&self) -> EnvironmentManifest {
        EnvironmentManifest {
            shaders: self
                .shaders
                .iter()
                .map(|(name, shader)| (name.clone(), shader.uniforms().to_vec()))
                .collect(),
            targets: self
                .targets
                .iter()
                .map(|(name, target)| (name.clone(), target.is_canvas()))
                .collect(),
            sources: self
                .sources
                .iter()
                .map(|(name, source)| (name.clone(), source.shape()))
                .collect(),
            callbacks: self.callbacks.keys().cloned().collect(),
        }
    }
}

impl<C> fmt::Debug for Environment<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("shaders", &self.shaders.keys())
            .field("targets", &self.targets.keys())
            .field("sources", &self.sources.keys())
            .field("callbacks", &self.callbacks.keys())
            .finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Names (and what is known about them) of an [`Environment`].
pub struct EnvironmentManifest {
    /// Shader name to active uniforms.
    pub shaders: BTreeMap<String, Vec<UniformInfo>>,
    /// Target name to "is the canvas".
    pub targets: BTreeMap<String, bool>,
    /// Source name to current shape.
    pub sources: BTreeMap<String, Shape>,
    /// Callback names.
    pub callbacks: Vec<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/compile/pass.rs"]
mod tests;
