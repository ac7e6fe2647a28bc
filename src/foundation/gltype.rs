use std::fmt;

use smallvec::SmallVec;

use crate::foundation::error::{FramepassError, FramepassResult};

/// Primitive element type of a shader value or a numeric buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// 32-bit float.
    F32,
    /// 32-bit signed integer.
    I32,
    /// 32-bit unsigned integer.
    U32,
    /// 16-bit signed integer.
    I16,
    /// 16-bit unsigned integer.
    U16,
    /// 8-bit signed integer.
    I8,
    /// 8-bit unsigned integer.
    U8,
}

impl ScalarKind {
    /// Size of one element in bytes.
    pub fn byte_size(self) -> usize {
        match self {
            ScalarKind::F32 | ScalarKind::I32 | ScalarKind::U32 => 4,
            ScalarKind::I16 | ScalarKind::U16 => 2,
            ScalarKind::I8 | ScalarKind::U8 => 1,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScalarKind::F32 => "f32",
            ScalarKind::I32 => "i32",
            ScalarKind::U32 => "u32",
            ScalarKind::I16 => "i16",
            ScalarKind::U16 => "u16",
            ScalarKind::I8 => "i8",
            ScalarKind::U8 => "u8",
        };
        f.write_str(s)
    }
}

/// Element type + element count. Two values are binary-compatible iff their shapes are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    /// Element type.
    pub scalar: ScalarKind,
    /// Element count.
    pub elements: usize,
}

impl Shape {
    /// Build a shape from its parts.
    pub const fn new(scalar: ScalarKind, elements: usize) -> Self {
        Self { scalar, elements }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.elements, self.scalar)
    }
}

/// Shader-visible value types, keyed by their GL enum code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlType {
    /// `BYTE`
    Byte,
    /// `UNSIGNED_BYTE`
    UnsignedByte,
    /// `SHORT`
    Short,
    /// `UNSIGNED_SHORT`
    UnsignedShort,
    /// `INT`
    Int,
    /// `UNSIGNED_INT`
    UnsignedInt,
    /// `FLOAT`
    Float,
    /// `FLOAT_VEC2`
    FloatVec2,
    /// `FLOAT_VEC3`
    FloatVec3,
    /// `FLOAT_VEC4`
    FloatVec4,
    /// `INT_VEC2`
    IntVec2,
    /// `INT_VEC3`
    IntVec3,
    /// `INT_VEC4`
    IntVec4,
    /// `BOOL`
    Bool,
    /// `BOOL_VEC2`
    BoolVec2,
    /// `BOOL_VEC3`
    BoolVec3,
    /// `BOOL_VEC4`
    BoolVec4,
    /// `FLOAT_MAT2`, column-major.
    FloatMat2,
    /// `FLOAT_MAT3`, column-major.
    FloatMat3,
    /// `FLOAT_MAT4`, column-major.
    FloatMat4,
    /// `SAMPLER_2D`, a texture unit index.
    #[serde(rename = "SAMPLER_2D")]
    Sampler2d,
    /// `SAMPLER_CUBE`, a texture unit index.
    SamplerCube,
}

impl GlType {
    /// Every type in the table.
    pub const ALL: [GlType; 22] = [
        GlType::Byte,
        GlType::UnsignedByte,
        GlType::Short,
        GlType::UnsignedShort,
        GlType::Int,
        GlType::UnsignedInt,
        GlType::Float,
        GlType::FloatVec2,
        GlType::FloatVec3,
        GlType::FloatVec4,
        GlType::IntVec2,
        GlType::IntVec3,
        GlType::IntVec4,
        GlType::Bool,
        GlType::BoolVec2,
        GlType::BoolVec3,
        GlType::BoolVec4,
        GlType::FloatMat2,
        GlType::FloatMat3,
        GlType::FloatMat4,
        GlType::Sampler2d,
        GlType::SamplerCube,
    ];

    /// GL enum value (`gl.FLOAT_VEC3 == 0x8B51`, ...).
    pub fn code(self) -> u32 {
        match self {
            GlType::Byte => 0x1400,
            GlType::UnsignedByte => 0x1401,
            GlType::Short => 0x1402,
            GlType::UnsignedShort => 0x1403,
            GlType::Int => 0x1404,
            GlType::UnsignedInt => 0x1405,
            GlType::Float => 0x1406,
            GlType::FloatVec2 => 0x8B50,
            GlType::FloatVec3 => 0x8B51,
            GlType::FloatVec4 => 0x8B52,
            GlType::IntVec2 => 0x8B53,
            GlType::IntVec3 => 0x8B54,
            GlType::IntVec4 => 0x8B55,
            GlType::Bool => 0x8B56,
            GlType::BoolVec2 => 0x8B57,
            GlType::BoolVec3 => 0x8B58,
            GlType::BoolVec4 => 0x8B59,
            GlType::FloatMat2 => 0x8B5A,
            GlType::FloatMat3 => 0x8B5B,
            GlType::FloatMat4 => 0x8B5C,
            GlType::Sampler2d => 0x8B5E,
            GlType::SamplerCube => 0x8B60,
        }
    }

    /// Reverse of [`GlType::code`].
    pub fn from_code(code: u32) -> FramepassResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| FramepassError::validation(format!("unknown GL type code {code:#06x}")))
    }

    /// Name as spelled by the GL API.
    pub fn gl_name(self) -> &'static str {
        match self {
            GlType::Byte => "BYTE",
            GlType::UnsignedByte => "UNSIGNED_BYTE",
            GlType::Short => "SHORT",
            GlType::UnsignedShort => "UNSIGNED_SHORT",
            GlType::Int => "INT",
            GlType::UnsignedInt => "UNSIGNED_INT",
            GlType::Float => "FLOAT",
            GlType::FloatVec2 => "FLOAT_VEC2",
            GlType::FloatVec3 => "FLOAT_VEC3",
            GlType::FloatVec4 => "FLOAT_VEC4",
            GlType::IntVec2 => "INT_VEC2",
            GlType::IntVec3 => "INT_VEC3",
            GlType::IntVec4 => "INT_VEC4",
            GlType::Bool => "BOOL",
            GlType::BoolVec2 => "BOOL_VEC2",
            GlType::BoolVec3 => "BOOL_VEC3",
            GlType::BoolVec4 => "BOOL_VEC4",
            GlType::FloatMat2 => "FLOAT_MAT2",
            GlType::FloatMat3 => "FLOAT_MAT3",
            GlType::FloatMat4 => "FLOAT_MAT4",
            GlType::Sampler2d => "SAMPLER_2D",
            GlType::SamplerCube => "SAMPLER_CUBE",
        }
    }

    /// Element type of the typed array that backs this value.
    ///
    /// Booleans and samplers are uploaded as `i32`.
    pub fn scalar(self) -> ScalarKind {
        match self {
            GlType::Byte => ScalarKind::I8,
            GlType::UnsignedByte => ScalarKind::U8,
            GlType::Short => ScalarKind::I16,
            GlType::UnsignedShort => ScalarKind::U16,
            GlType::UnsignedInt => ScalarKind::U32,
            GlType::Float
            | GlType::FloatVec2
            | GlType::FloatVec3
            | GlType::FloatVec4
            | GlType::FloatMat2
            | GlType::FloatMat3
            | GlType::FloatMat4 => ScalarKind::F32,
            GlType::Int
            | GlType::IntVec2
            | GlType::IntVec3
            | GlType::IntVec4
            | GlType::Bool
            | GlType::BoolVec2
            | GlType::BoolVec3
            | GlType::BoolVec4
            | GlType::Sampler2d
            | GlType::SamplerCube => ScalarKind::I32,
        }
    }

    /// Number of primitive elements (`FLOAT_MAT4` has 16, `FLOAT_VEC3` has 3).
    pub fn elements(self) -> usize {
        match self {
            GlType::FloatVec2 | GlType::IntVec2 | GlType::BoolVec2 => 2,
            GlType::FloatVec3 | GlType::IntVec3 | GlType::BoolVec3 => 3,
            GlType::FloatVec4 | GlType::IntVec4 | GlType::BoolVec4 | GlType::FloatMat2 => 4,
            GlType::FloatMat3 => 9,
            GlType::FloatMat4 => 16,
            _ => 1,
        }
    }

    /// Vertex attribute locations occupied; matrices take one per column.
    pub fn attribute_slots(self) -> usize {
        match self {
            GlType::FloatMat2 => 2,
            GlType::FloatMat3 => 3,
            GlType::FloatMat4 => 4,
            _ => 1,
        }
    }

    /// Size of one value in bytes.
    pub fn byte_size(self) -> usize {
        self.elements() * self.scalar().byte_size()
    }

    /// Element type and count of one value.
    pub fn shape(self) -> Shape {
        Shape::new(self.scalar(), self.elements())
    }

    /// Whether this is one of the `FLOAT_MAT*` types.
    pub fn is_matrix(self) -> bool {
        matches!(self, GlType::FloatMat2 | GlType::FloatMat3 | GlType::FloatMat4)
    }
}

impl fmt::Display for GlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gl_name())
    }
}

/// Snapshot of a uniform's data, read from a [`crate::DataSource`] at upload time.
///
/// Up to a 4x4 matrix stays inline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum UniformValue {
    /// Float payload.
    F32(SmallVec<[f32; 16]>),
    /// Integer payload (also used for booleans and samplers).
    I32(SmallVec<[i32; 16]>),
}

impl UniformValue {
    /// Zero-filled value of the given shape. Non-float shapes get an `I32` payload.
    pub fn zeroed(shape: Shape) -> Self {
        match shape.scalar {
            ScalarKind::F32 => UniformValue::F32(SmallVec::from_elem(0.0, shape.elements)),
            _ => UniformValue::I32(SmallVec::from_elem(0, shape.elements)),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            UniformValue::F32(v) => v.len(),
            UniformValue::I32(v) => v.len(),
        }
    }

    /// Whether the value holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type and count.
    pub fn shape(&self) -> Shape {
        match self {
            UniformValue::F32(v) => Shape::new(ScalarKind::F32, v.len()),
            UniformValue::I32(v) => Shape::new(ScalarKind::I32, v.len()),
        }
    }

    /// Float payload, if this is one.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            UniformValue::F32(v) => Some(v.as_slice()),
            UniformValue::I32(_) => None,
        }
    }

    /// Integer payload, if this is one.
    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            UniformValue::I32(v) => Some(v.as_slice()),
            UniformValue::F32(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/gltype.rs"]
mod tests;
