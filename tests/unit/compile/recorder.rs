use std::collections::BTreeMap;

use super::*;

fn pass(
    name: &str,
    shader: Option<&str>,
    target: &str,
    uniforms: &[(&str, Option<&str>)],
) -> DepointerizedPass {
    DepointerizedPass {
        name: name.into(),
        shader: shader.map(str::to_owned),
        target: target.into(),
        uniforms: uniforms
            .iter()
            .map(|(u, s)| (u.to_string(), s.map(str::to_owned)))
            .collect::<BTreeMap<_, _>>(),
        uniform_types: BTreeMap::new(),
        draw: name.into(),
    }
}

fn record(passes: &[DepointerizedPass]) -> CompiledSequence {
    let mut recorder = Recorder::default();
    for p in passes {
        recorder.record(p);
    }
    recorder.finish()
}

#[test]
fn identical_passes_bind_once() {
    let passes: Vec<_> = (0..3)
        .map(|_| pass("p", Some("s"), "CANVAS", &[("u", Some("src"))]))
        .collect();
    let seq = record(&passes);

    assert_eq!(
        seq.ops,
        [
            Op::BindTarget {
                target: "CANVAS".into()
            },
            Op::BindShader { shader: "s".into() },
            Op::Upload {
                shader: "s".into(),
                uniform: "u".into(),
                source: "src".into()
            },
            Op::Draw {
                pass: "p".into(),
                callback: "p".into()
            },
            Op::Draw {
                pass: "p".into(),
                callback: "p".into()
            },
            Op::Draw {
                pass: "p".into(),
                callback: "p".into()
            },
        ]
    );
    assert_eq!(seq.draw_count(), 3);
}

#[test]
fn uniform_memory_is_per_shader() {
    let seq = record(&[
        pass("a1", Some("A"), "CANVAS", &[("u", Some("x"))]),
        pass("b", Some("B"), "CANVAS", &[("u", Some("y"))]),
        pass("a2", Some("A"), "CANVAS", &[("u", Some("x"))]),
    ]);

    let uploads: Vec<String> = seq
        .ops
        .iter()
        .filter(|op| matches!(op, Op::Upload { .. }))
        .map(ToString::to_string)
        .collect();
    assert_eq!(uploads, ["upload A.u <- x", "upload B.u <- y"]);

    let binds = seq
        .ops
        .iter()
        .filter(|op| matches!(op, Op::BindShader { .. }))
        .count();
    assert_eq!(binds, 3);
}

#[test]
fn changed_source_is_uploaded_again() {
    let seq = record(&[
        pass("a", Some("A"), "CANVAS", &[("u", Some("x"))]),
        pass("b", Some("A"), "CANVAS", &[("u", Some("z"))]),
    ]);
    assert_eq!(seq.len(), 6);
    assert_eq!(
        seq.ops[4],
        Op::Upload {
            shader: "A".into(),
            uniform: "u".into(),
            source: "z".into()
        }
    );
}

#[test]
fn null_uniforms_are_never_uploaded() {
    let seq = record(&[pass("a", Some("A"), "CANVAS", &[("u", None)])]);
    assert!(!seq.ops.iter().any(|op| matches!(op, Op::Upload { .. })));
}

#[test]
fn target_change_rebinds_target_only() {
    let seq = record(&[
        pass("a", Some("A"), "CANVAS", &[]),
        pass("b", Some("A"), "fbo", &[]),
    ]);
    let listing = seq.to_string();
    assert_eq!(listing.matches("bind target").count(), 2);
    assert_eq!(listing.matches("bind shader").count(), 1);
}

#[test]
fn shaderless_pass_only_draws() {
    let seq = record(&[pass("clear", None, "fbo", &[("u", Some("x"))])]);
    assert_eq!(
        seq.ops,
        [Op::Draw {
            pass: "clear".into(),
            callback: "clear".into()
        }]
    );
}

#[test]
fn sequence_serializes_with_op_tags() {
    let seq = record(&[pass("a", Some("A"), "CANVAS", &[])]);
    let json = seq.to_json().unwrap();
    assert!(json.contains(r#""op": "bind_target""#));

    let back: CompiledSequence = serde_json::from_str(&json).unwrap();
    assert_eq!(back, seq);
}
