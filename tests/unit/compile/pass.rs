use super::*;
use crate::{
    foundation::gltype::ScalarKind,
    render::resources::{Canvas, CanvasBinding, Shader, UniformVar},
};

struct Gpu;

impl CanvasBinding for Gpu {
    fn bind_canvas(&mut self) {}
}

struct Flat;

impl Shader<Gpu> for Flat {
    fn name(&self) -> &str {
        "flat"
    }

    fn uniforms(&self) -> &[UniformInfo] {
        &[]
    }

    fn bind(&self, _ctx: &mut Gpu) {}

    fn upload(&self, _ctx: &mut Gpu, _uniform: &str, _value: &crate::UniformValue) {}
}

#[test]
fn builder_fills_every_field() {
    let source = SourceRef::source(UniformVar::zeroed(GlType::FloatVec4));
    let pass = PassDesc::<Gpu>::new("main")
        .shader(ShaderRef::shader(Flat))
        .target(TargetRef::target(Canvas))
        .uniform("u_color", source.clone())
        .keep_uniform("u_time")
        .draw(CallbackRef::callback(|_: &mut Gpu| {}));

    assert_eq!(pass.name, "main");
    assert!(pass.shader.is_some());
    assert!(pass.target.is_some());
    assert!(pass.draw.is_some());
    assert_eq!(pass.uniforms.len(), 2);
    assert_eq!(pass.uniforms["u_color"].as_ref(), Some(&source));
    assert!(pass.uniforms["u_time"].is_none());

    let copy = pass.clone();
    assert_eq!(copy.target, pass.target);
}

#[test]
fn manifest_describes_environment() {
    let mut env = Environment::<Gpu>::default();
    assert!(env.is_empty());

    env.shaders.insert("flat".into(), ShaderRef::shader(Flat));
    env.targets.insert("CANVAS".into(), TargetRef::target(Canvas));
    env.sources.insert(
        "u_color".into(),
        SourceRef::source(UniformVar::zeroed(GlType::FloatVec3)),
    );
    env.callbacks
        .insert("main".into(), CallbackRef::callback(|_: &mut Gpu| {}));

    let manifest = env.manifest();
    assert_eq!(manifest.shaders["flat"], Vec::<UniformInfo>::new());
    assert!(manifest.targets["CANVAS"]);
    assert_eq!(manifest.sources["u_color"], Shape::new(ScalarKind::F32, 3));
    assert_eq!(manifest.callbacks, ["main"]);

    let json = serde_json::to_string(&manifest).unwrap();
    let back: EnvironmentManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, manifest);
}

#[test]
fn depointerized_pass_serializes_by_name() {
    let pass = DepointerizedPass {
        name: "blur".into(),
        shader: Some("blur".into()),
        target: "CANVAS".into(),
        uniforms: [("u_radius".to_owned(), Some("u_radius".to_owned()))].into(),
        uniform_types: [("u_radius".to_owned(), GlType::Float)].into(),
        draw: "blur".into(),
    };
    let json = serde_json::to_value(&pass).unwrap();
    assert_eq!(json["target"], "CANVAS");
    assert_eq!(json["uniform_types"]["u_radius"], "FLOAT");
}
