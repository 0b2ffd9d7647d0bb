//! Static field-descriptor tables for unmarshal targets.
//!
//! `#[derive(Unmarshal)]` generates one [`Shape`] per struct. Each annotated
//! field becomes a [`FieldDef`] carrying the raw annotation, the field's
//! [`FieldShape`] and a function that writes a decoded value into it.

use core::fmt;

use crate::{Block, Tag, UnmarshalError, ValueError};

/// A type that can be populated from a NewsDoc document or block.
///
/// Implement it with `#[derive(Unmarshal)]`. Every matched block is decoded
/// into a fresh `Default` value, so the target must implement [`Default`].
pub trait Unmarshal: Default + Sized + 'static {
    /// The field table of this type.
    const SHAPE: &'static Shape<Self>;
}

/// The field table of an [`Unmarshal`] type.
pub struct Shape<T: 'static> {
    /// Name of the type, used in error messages.
    pub type_name: &'static str,
    /// Annotated fields, in declaration order.
    pub fields: &'static [FieldDef<T>],
}

/// One annotated field.
pub struct FieldDef<T: 'static> {
    /// Name of the field.
    pub name: &'static str,
    /// The annotation, unparsed: `name[,option]*`.
    pub tag: &'static str,
    /// How to populate the field.
    pub kind: FieldKind<T>,
}

/// Whether a field holds a single value or nested blocks.
pub enum FieldKind<T: 'static> {
    /// The field is read from one attribute.
    Scalar(ScalarField<T>),
    /// The field is read from the blocks of a group.
    Blocks(BlockField<T>),
}

/// Writes a decoded attribute value into a field of `T`.
pub type DecodeFn<T> = fn(&mut T, &str, &Tag) -> Result<(), ValueError>;

/// Unmarshals a block and writes the result into a field of `T`.
pub type AssignFn<T> = fn(&mut T, &Block) -> Result<(), UnmarshalError>;

/// A field read from a single attribute.
pub struct ScalarField<T: 'static> {
    /// Cardinality of the field.
    pub shape: FieldShape,
    /// Decodes and stores the value.
    pub decode: DecodeFn<T>,
}

/// A field read from nested blocks.
pub struct BlockField<T: 'static> {
    /// Cardinality of the field.
    pub shape: FieldShape,
    /// Unmarshals and stores one matched block.
    pub assign: AssignFn<T>,
}

/// The cardinality of a field, as spelled by its Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// A plain `T`: must be present.
    Required,
    /// `Option<T>`: absent leaves `None`.
    Optional,
    /// `Vec<T>`: every matching block is appended.
    Repeated,
    /// `Vec<Option<T>>` or `Vec<Box<T>>`: never valid.
    RepeatedIndirect,
}

impl FieldShape {
    /// Whether the field can be left unset.
    pub fn is_indirect(self) -> bool {
        matches!(self, FieldShape::Optional)
    }

    /// Whether the field collects every match.
    pub fn is_repeated(self) -> bool {
        matches!(self, FieldShape::Repeated | FieldShape::RepeatedIndirect)
    }
}

impl<T: 'static> FieldKind<T> {
    /// The cardinality of the field.
    pub fn shape(&self) -> FieldShape {
        match self {
            FieldKind::Scalar(field) => field.shape,
            FieldKind::Blocks(field) => field.shape,
        }
    }
}

impl<T: 'static> fmt::Debug for Shape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<T: 'static> fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FieldKind::Scalar(_) => "scalar",
            FieldKind::Blocks(_) => "blocks",
        };
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("kind", &kind)
            .field("shape", &self.kind.shape())
            .finish()
    }
}
