//! Capability contracts implemented by the graphics layer.
//!
//! `C` is the caller's GPU context (a GL wrapper, a command recorder, a test mock). The core
//! never inspects it; it only threads `&mut C` through to the resources during replay.

use std::cell::RefCell;

use crate::foundation::{
    error::{FramepassError, FramepassResult},
    gltype::{GlType, Shape, UniformValue},
    handle::ResourceRef,
};

/// One active uniform reported by shader introspection.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UniformInfo {
    /// Uniform name as declared in shader source.
    pub name: String,
    /// Declared value type.
    pub ty: GlType,
}

impl UniformInfo {
    /// Build an introspection entry.
    pub fn new(name: impl Into<String>, ty: GlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A linked shading program.
pub trait Shader<C: ?Sized> {
    /// Debug name, also used as the environment naming hint.
    fn name(&self) -> &str;

    /// Uniforms the driver reports as active. Every one of them is required by a pass that
    /// uses this shader.
    fn uniforms(&self) -> &[UniformInfo];

    /// Lookup of a single active uniform.
    fn uniform(&self, name: &str) -> Option<&UniformInfo> {
        self.uniforms().iter().find(|u| u.name == name)
    }

    /// Make this program current.
    fn bind(&self, ctx: &mut C);

    /// Upload `value` to `uniform`. Only called while this program is bound.
    fn upload(&self, ctx: &mut C, uniform: &str, value: &UniformValue);
}

/// Something draws can be directed into.
pub trait DrawTarget<C: ?Sized> {
    /// Whether this object is actually bindable as a draw target.
    fn is_target(&self) -> bool {
        true
    }

    /// Whether this is the default (canvas) target. All canvas handles share one
    /// environment entry.
    fn is_canvas(&self) -> bool {
        false
    }

    /// Direct subsequent draws into this target.
    fn bind(&self, ctx: &mut C);
}

/// Contiguous numeric data that can feed a uniform.
pub trait DataSource {
    /// Element type and count of the backing buffer.
    fn shape(&self) -> Shape;

    /// Current contents.
    fn value(&self) -> UniformValue;
}

/// Opaque draw side effect invoked once per pass.
pub trait DrawCallback<C: ?Sized> {
    /// Issue the draw calls.
    fn draw(&self, ctx: &mut C);
}

impl<C: ?Sized, F: Fn(&mut C)> DrawCallback<C> for F {
    fn draw(&self, ctx: &mut C) {
        self(ctx)
    }
}

/// Contexts that can select their default framebuffer.
pub trait CanvasBinding {
    /// Bind the default (canvas) framebuffer.
    fn bind_canvas(&mut self);
}

/// The default draw target. Any number of `Canvas` handles unify to a single
/// environment entry named `"CANVAS"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Canvas;

impl<C: CanvasBinding + ?Sized> DrawTarget<C> for Canvas {
    fn is_canvas(&self) -> bool {
        true
    }

    fn bind(&self, ctx: &mut C) {
        ctx.bind_canvas();
    }
}

/// Interior-mutable uniform data source.
///
/// Application code keeps a handle and mutates it between frames; compiled sequences read
/// the current value at replay time.
#[derive(Debug)]
pub struct UniformVar {
    value: RefCell<UniformValue>,
}

impl UniformVar {
    /// Wrap an initial value.
    pub fn new(value: UniformValue) -> Self {
        Self {
            value: RefCell::new(value),
        }
    }

    /// Zero-filled variable shaped like `ty`.
    pub fn zeroed(ty: GlType) -> Self {
        Self::new(UniformValue::zeroed(ty.shape()))
    }

    /// Float variable holding `data`.
    pub fn from_f32(data: &[f32]) -> Self {
        Self::new(UniformValue::F32(data.iter().copied().collect()))
    }

    /// Integer variable holding `data`.
    pub fn from_i32(data: &[i32]) -> Self {
        Self::new(UniformValue::I32(data.iter().copied().collect()))
    }

    /// Overwrite a float variable. The element count is fixed at construction.
    pub fn set_f32(&self, data: &[f32]) -> FramepassResult<()> {
        let mut value = self.value.borrow_mut();
        match &mut *value {
            UniformValue::F32(v) if v.len() == data.len() => {
                v.copy_from_slice(data);
                Ok(())
            }
            other => Err(FramepassError::validation(format!(
                "cannot store {} f32 values into a {} uniform variable",
                data.len(),
                other.shape()
            ))),
        }
    }

    /// Overwrite an integer variable. The element count is fixed at construction.
    pub fn set_i32(&self, data: &[i32]) -> FramepassResult<()> {
        let mut value = self.value.borrow_mut();
        match &mut *value {
            UniformValue::I32(v) if v.len() == data.len() => {
                v.copy_from_slice(data);
                Ok(())
            }
            other => Err(FramepassError::validation(format!(
                "cannot store {} i32 values into a {} uniform variable",
                data.len(),
                other.shape()
            ))),
        }
    }

    /// Copy of the current value.
    pub fn get(&self) -> UniformValue {
        self.value.borrow().clone()
    }
}

impl DataSource for UniformVar {
    fn shape(&self) -> Shape {
        self.value.borrow().shape()
    }

    fn value(&self) -> UniformValue {
        self.get()
    }
}

/// Shorthand for a shared shader handle.
pub type ShaderRef<C> = ResourceRef<dyn Shader<C>>;
/// Shorthand for a shared draw target handle.
pub type TargetRef<C> = ResourceRef<dyn DrawTarget<C>>;
/// Shorthand for a shared uniform data source handle.
pub type SourceRef = ResourceRef<dyn DataSource>;
/// Shorthand for a shared draw callback handle.
pub type CallbackRef<C> = ResourceRef<dyn DrawCallback<C>>;

impl<C: ?Sized> ResourceRef<dyn Shader<C>> {
    /// Wrap a concrete shader.
    pub fn shader<S: Shader<C> + 'static>(shader: S) -> Self {
        Self::from_rc(std::rc::Rc::new(shader))
    }
}

impl<C: ?Sized> ResourceRef<dyn DrawTarget<C>> {
    /// Wrap a concrete draw target.
    pub fn target<T: DrawTarget<C> + 'static>(target: T) -> Self {
        Self::from_rc(std::rc::Rc::new(target))
    }
}

impl ResourceRef<dyn DataSource> {
    /// Wrap a concrete data source.
    pub fn source<S: DataSource + 'static>(source: S) -> Self {
        Self::from_rc(std::rc::Rc::new(source))
    }
}

impl<C: ?Sized> ResourceRef<dyn DrawCallback<C>> {
    /// Wrap a draw callback (any `Fn(&mut C)` qualifies).
    pub fn callback<F: DrawCallback<C> + 'static>(callback: F) -> Self {
        Self::from_rc(std::rc::Rc::new(callback))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/resources.rs"]
mod tests;
