use std::{collections::HashSet, fmt};

use crate::foundation::{
    error::{FramepassError, FramepassResult},
    gltype::{GlType, ScalarKind},
};

/// Per-record byte limit imposed on attribute strides (about 16 vec4 attributes).
pub const MAX_STRIDE_BYTES: usize = 255;

/// Bytes per backing element. Arena records are stored as `f32`.
const ELEMENT_BYTES: usize = 4;

/// Components one attribute slot can carry.
const MAX_COMPONENTS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One declared record field, in declaration order.
pub struct FieldDecl {
    /// Field name, unique within a layout.
    pub name: String,
    /// Declared type.
    pub ty: GlType,
    /// Number of `f32` elements the field occupies.
    pub elements: usize,
}

impl FieldDecl {
    /// A field sized by its type.
    pub fn new(name: impl Into<String>, ty: GlType) -> Self {
        Self {
            name: name.into(),
            ty,
            elements: ty.elements(),
        }
    }

    /// A field with an explicit element count, for shapes the type table does not name
    /// (for example a `vec2` stored as `[f32; 2]` under `GlType::Float`). The count must split
    /// evenly into the type's attribute slots, with 1 to 4 components per slot.
    pub fn with_count(name: impl Into<String>, ty: GlType, elements: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            elements,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A placed field: where it lives inside one record.
pub struct FieldLayout {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: GlType,
    /// Offset in elements from the start of the record.
    pub offset: usize,
    /// Number of elements.
    pub elements: usize,
}

impl FieldLayout {
    /// Element range inside one record.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.elements
    }

    /// Offset in bytes from the start of the record.
    pub fn byte_offset(&self) -> usize {
        self.offset * ELEMENT_BYTES
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Arguments for one `vertexAttribPointer`-style call.
pub struct AttributePointer {
    /// Shader attribute location.
    pub location: u32,
    /// Components per attribute slot (1..=4).
    pub components: usize,
    /// Component type in the buffer.
    pub scalar: ScalarKind,
    /// Distance between consecutive records.
    pub stride_bytes: usize,
    /// Offset of this slot inside a record.
    pub offset_bytes: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Packed interleaved layout of one record type.
///
/// Fields are laid out back to back in declaration order with no padding; declaration order
/// is also the attribute binding order.
pub struct LayoutPlan {
    fields: Vec<FieldLayout>,
    /// Record stride in elements.
    stride: usize,
}

impl LayoutPlan {
    /// Place `decls` back to back.
    ///
    /// Fails with [`FramepassError::DuplicateField`] on a repeated name,
    /// [`FramepassError::Validation`] when a field's element count does not fit its attribute
    /// slots, and [`FramepassError::LayoutTooWide`] when the stride exceeds
    /// [`MAX_STRIDE_BYTES`].
    pub fn new(decls: impl IntoIterator<Item = FieldDecl>) -> FramepassResult<Self> {
        let mut fields = Vec::<FieldLayout>::new();
        let mut seen = HashSet::<String>::new();
        let mut offset = 0usize;

        for decl in decls {
            if !seen.insert(decl.name.clone()) {
                return Err(FramepassError::DuplicateField(decl.name));
            }
            let slots = decl.ty.attribute_slots();
            let components = decl.elements / slots;
            if decl.elements % slots != 0 || !(1..=MAX_COMPONENTS).contains(&components) {
                return Err(FramepassError::validation(format!(
                    "field `{}` holds {} elements, which do not split into {slots} attribute \
                     slot(s) of 1..={MAX_COMPONENTS} components",
                    decl.name, decl.elements
                )));
            }
            fields.push(FieldLayout {
                name: decl.name,
                ty: decl.ty,
                offset,
                elements: decl.elements,
            });
            offset = offset.saturating_add(decl.elements);
        }

        let stride_bytes = offset.saturating_mul(ELEMENT_BYTES);
        if stride_bytes > MAX_STRIDE_BYTES {
            return Err(FramepassError::LayoutTooWide {
                stride_bytes,
                max_bytes: MAX_STRIDE_BYTES,
            });
        }

        Ok(Self {
            fields,
            stride: offset,
        })
    }

    /// Record stride in elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Record stride in bytes.
    pub fn stride_bytes(&self) -> usize {
        self.stride * ELEMENT_BYTES
    }

    /// Number of elements taken up by `n` records.
    pub fn sizeof(&self, n: usize) -> usize {
        n * self.stride
    }

    /// Placed fields in declaration order.
    pub fn fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declaration position of a field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Attribute pointer setup for a buffer laid out with this plan.
    ///
    /// `locations[i]` is the shader attribute location of field `i`. Matrix fields expand to
    /// one pointer per column at consecutive locations.
    pub fn attribute_pointers(&self, locations: &[u32]) -> FramepassResult<Vec<AttributePointer>> {
        if locations.len() != self.fields.len() {
            return Err(FramepassError::validation(format!(
                "layout has {} fields but {} attribute locations were given",
                self.fields.len(),
                locations.len()
            )));
        }

        let stride_bytes = self.stride_bytes();
        let mut out = Vec::with_capacity(self.fields.len());
        for (field, &location) in self.fields.iter().zip(locations) {
            let slots = field.ty.attribute_slots();
            let components = field.elements / slots;
            for column in 0..slots {
                out.push(AttributePointer {
                    location: location + column as u32,
                    components,
                    scalar: ScalarKind::F32,
                    stride_bytes,
                    offset_bytes: field.byte_offset() + column * components * ELEMENT_BYTES,
                });
            }
        }
        Ok(out)
    }
}

impl fmt::Display for LayoutPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = ["ID", "NAME", "SIZE", "OFFSET", "TYPE"];
        let rows: Vec<[String; 5]> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                [
                    i.to_string(),
                    field.name.clone(),
                    field.elements.to_string(),
                    field.offset.to_string(),
                    field.ty.to_string(),
                ]
            })
            .collect();

        let mut widths = header.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        writeln!(f, "layout (stride {} elements)", self.stride)?;
        for (i, (&w, h)) in widths.iter().zip(header).enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{h:<w$}")?;
        }
        for row in &rows {
            writeln!(f)?;
            for (i, (&w, cell)) in widths.iter().zip(row).enumerate() {
                if i > 0 {
                    f.write_str(" | ")?;
                }
                write!(f, "{cell:>w$}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/plan.rs"]
mod tests;
