//! Framepass is the backend of a small real-time rendering engine.
//!
//! It turns a declarative list of render passes into a validated, minimal sequence of GPU state
//! changes, and manages the CPU-side storage of per-vertex / per-instance records that feed
//! those draws.
//!
//! # Pipeline overview
//!
//! 1. **Describe**: build [`PassDesc`] values referencing shared resources ([`ResourceRef`])
//! 2. **Compile**: [`compile_passes`] names every resource into an [`Environment`], validates
//!    each pass ([`PassReport`]) and records a [`CompiledSequence`] that never repeats a
//!    redundant bind or upload
//! 3. **Replay**: [`Compiled::replay`] issues the sequence against the caller's GPU context,
//!    once per frame
//!
//! Record data lives in a [`BufferArena`] laid out by a [`LayoutPlan`]. Each frame, mutate the
//! records, [`BufferArena::sync`] them to GPU memory, then replay.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded**: resources are `Rc`-shared and compared by identity.
//! - **Degrade per pass**: invalid passes are reported and skipped, compilation itself never
//!   fails.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod arena;
mod compile;
mod foundation;
mod layout;
mod render;

pub use arena::buffer::{ArenaOpts, BufferArena, BufferSink, Record, RecordMut, RecordView};
pub use compile::compiler::{CANVAS, CompileOpts, Compiled, compile_passes};
pub use compile::dedup::Deduplicator;
pub use compile::pass::{DepointerizedPass, Environment, EnvironmentManifest, PassDesc};
pub use compile::recorder::{CompiledSequence, Op};
pub use compile::validate::{
    Diagnostic, DiagnosticKind, PassReport, PassState, PassValidator, check_structure,
};
pub use foundation::error::{FramepassError, FramepassResult};
pub use foundation::gltype::{GlType, ScalarKind, Shape, UniformValue};
pub use foundation::handle::ResourceRef;
pub use layout::plan::{AttributePointer, FieldDecl, FieldLayout, LayoutPlan, MAX_STRIDE_BYTES};
pub use render::replay::execute_sequence;
pub use render::resources::{
    CallbackRef, Canvas, CanvasBinding, DataSource, DrawCallback, DrawTarget, Shader, ShaderRef,
    SourceRef, TargetRef, UniformInfo, UniformVar,
};
