use super::*;

#[test]
fn codes_round_trip_through_the_table() {
    for ty in GlType::ALL {
        assert_eq!(GlType::from_code(ty.code()).unwrap(), ty);
    }
    assert!(GlType::from_code(0xDEAD).is_err());
}

#[test]
fn byte_sizes_match_gl() {
    assert_eq!(GlType::Float.byte_size(), 4);
    assert_eq!(GlType::FloatVec3.byte_size(), 12);
    assert_eq!(GlType::FloatMat3.byte_size(), 36);
    assert_eq!(GlType::FloatMat4.byte_size(), 64);
    assert_eq!(GlType::UnsignedByte.byte_size(), 1);
    assert_eq!(GlType::Short.byte_size(), 2);
}

#[test]
fn bools_and_samplers_are_int_backed() {
    assert_eq!(GlType::BoolVec3.shape(), Shape::new(ScalarKind::I32, 3));
    assert_eq!(GlType::Sampler2d.shape(), Shape::new(ScalarKind::I32, 1));
}

#[test]
fn matrices_span_one_slot_per_column() {
    assert_eq!(GlType::FloatMat2.attribute_slots(), 2);
    assert_eq!(GlType::FloatMat4.attribute_slots(), 4);
    assert_eq!(GlType::FloatVec4.attribute_slots(), 1);
    assert!(GlType::FloatMat3.is_matrix());
}

#[test]
fn uniform_value_reports_shape() {
    let v = UniformValue::zeroed(GlType::FloatMat4.shape());
    assert_eq!(v.len(), 16);
    assert_eq!(v.shape(), GlType::FloatMat4.shape());
    assert!(v.as_f32().is_some());
    assert!(v.as_i32().is_none());
}

#[test]
fn shape_display_is_readable() {
    assert_eq!(Shape::new(ScalarKind::F32, 3).to_string(), "3 x f32");
}
