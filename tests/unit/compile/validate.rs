use super::*;
use crate::{
    compile::pass::DepointerizedPass,
    foundation::gltype::{GlType, ScalarKind, UniformValue},
    render::resources::{
        CallbackRef, Canvas, CanvasBinding, DrawTarget, Shader, ShaderRef, SourceRef, TargetRef,
        UniformInfo, UniformVar,
    },
};

struct Gpu;

impl CanvasBinding for Gpu {
    fn bind_canvas(&mut self) {}
}

struct Tint {
    uniforms: Vec<UniformInfo>,
}

impl Shader<Gpu> for Tint {
    fn name(&self) -> &str {
        "tint"
    }

    fn uniforms(&self) -> &[UniformInfo] {
        &self.uniforms
    }

    fn bind(&self, _ctx: &mut Gpu) {}

    fn upload(&self, _ctx: &mut Gpu, _uniform: &str, _value: &UniformValue) {}
}

struct Unbindable;

impl DrawTarget<Gpu> for Unbindable {
    fn is_target(&self) -> bool {
        false
    }

    fn bind(&self, _ctx: &mut Gpu) {}
}

fn env() -> Environment<Gpu> {
    let mut env = Environment::default();
    env.shaders.insert(
        "tint".into(),
        ShaderRef::shader(Tint {
            uniforms: vec![
                UniformInfo::new("u_color", GlType::FloatVec3),
                UniformInfo::new("u_time", GlType::Float),
            ],
        }),
    );
    env.targets.insert("CANVAS".into(), TargetRef::target(Canvas));
    env.targets.insert("broken".into(), TargetRef::target(Unbindable));
    env.sources.insert(
        "rgb".into(),
        SourceRef::source(UniformVar::zeroed(GlType::FloatVec3)),
    );
    env.sources.insert(
        "rg".into(),
        SourceRef::source(UniformVar::zeroed(GlType::FloatVec2)),
    );
    env.sources.insert(
        "time".into(),
        SourceRef::source(UniformVar::zeroed(GlType::Float)),
    );
    env.callbacks
        .insert("quad".into(), CallbackRef::callback(|_: &mut Gpu| {}));
    env
}

fn pass(uniforms: &[(&str, Option<&str>)]) -> DepointerizedPass {
    DepointerizedPass {
        name: "main".into(),
        shader: Some("tint".into()),
        target: "CANVAS".into(),
        uniforms: uniforms
            .iter()
            .map(|(u, s)| (u.to_string(), s.map(str::to_owned)))
            .collect(),
        uniform_types: Default::default(),
        draw: "quad".into(),
    }
}

#[test]
fn structure_requires_target_and_draw() {
    let report = check_structure(&PassDesc::<Gpu>::new("main"));
    assert_eq!(report.state, PassState::Rejected);
    let fields: Vec<&str> = report.diagnostics.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, ["target", "draw"]);
}

#[test]
fn structure_accepts_empty_name() {
    let desc = PassDesc::<Gpu>::new("")
        .target(TargetRef::target(Canvas))
        .draw(CallbackRef::callback(|_: &mut Gpu| {}));
    let report = check_structure(&desc);
    assert_eq!(report.state, PassState::StructurallyValid);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn structure_allows_missing_shader() {
    let desc = PassDesc::<Gpu>::new("clear")
        .target(TargetRef::target(Canvas))
        .draw(CallbackRef::callback(|_: &mut Gpu| {}));
    let report = check_structure(&desc);
    assert_eq!(report.state, PassState::StructurallyValid);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn complete_pass_is_accepted() {
    let report = PassValidator::check(
        &pass(&[("u_color", Some("rgb")), ("u_time", Some("time"))]),
        &env(),
    );
    assert_eq!(report.state, PassState::Accepted, "{:?}", report.diagnostics);
}

#[test]
fn null_uniform_entry_satisfies_requirement() {
    let report = PassValidator::check(&pass(&[("u_color", Some("rgb")), ("u_time", None)]), &env());
    assert!(report.is_accepted());
}

#[test]
fn unused_uniforms_are_not_errors() {
    let report = PassValidator::check(
        &pass(&[
            ("u_color", Some("rgb")),
            ("u_time", None),
            ("u_extra", Some("rg")),
        ]),
        &env(),
    );
    assert!(report.is_accepted());
}

#[test]
fn missing_required_uniform_rejects() {
    let report = PassValidator::check(&pass(&[("u_color", Some("rgb"))]), &env());
    assert!(report.is_rejected());
    assert_eq!(
        report.diagnostics[0].kind,
        DiagnosticKind::MissingUniform {
            uniform: "u_time".into()
        }
    );
    assert_eq!(report.diagnostics[0].field, "uniforms.u_time");
}

#[test]
fn shape_mismatch_names_uniform_and_counts() {
    let report = PassValidator::check(&pass(&[("u_color", Some("rg")), ("u_time", None)]), &env());
    assert!(report.is_rejected());
    assert_eq!(
        report.diagnostics[0].kind,
        DiagnosticKind::ShapeMismatch {
            uniform: "u_color".into(),
            expected: Shape::new(ScalarKind::F32, 3),
            actual: Shape::new(ScalarKind::F32, 2),
        }
    );

    let msg = report.diagnostics[0].to_string();
    assert!(msg.contains("pass `main`"));
    assert!(msg.contains("u_color"));
    assert!(msg.contains('3'));
    assert!(msg.contains('2'));
}

#[test]
fn shaderless_pass_skips_uniform_checks() {
    let mut p = pass(&[("u_color", Some("nowhere"))]);
    p.shader = None;
    assert!(PassValidator::check(&p, &env()).is_accepted());
}

#[test]
fn unbindable_target_rejects() {
    let mut p = pass(&[("u_color", Some("rgb")), ("u_time", None)]);
    p.target = "broken".into();
    let report = PassValidator::check(&p, &env());
    assert!(report.is_rejected());
    assert!(matches!(
        &report.diagnostics[0].kind,
        DiagnosticKind::InvalidTarget { target } if target == "broken"
    ));
}

#[test]
fn dangling_names_stop_at_cross_reference_gate() {
    let mut p = pass(&[("u_color", Some("missing"))]);
    p.draw = "gone".into();
    let report = PassValidator::check(&p, &env());

    assert!(report.is_rejected());
    let kinds: Vec<&DiagnosticKind> = report.diagnostics.iter().map(|d| &d.kind).collect();
    assert_eq!(
        kinds,
        [
            &DiagnosticKind::UnknownCallback {
                callback: "gone".into()
            },
            &DiagnosticKind::UnknownSource {
                source: "missing".into()
            },
        ]
    );
}

#[test]
fn unknown_shader_is_reported() {
    let mut p = pass(&[]);
    p.shader = Some("nope".into());
    let report = PassValidator::check(&p, &env());
    assert!(matches!(
        &report.diagnostics[0].kind,
        DiagnosticKind::UnknownShader { shader } if shader == "nope"
    ));
}
