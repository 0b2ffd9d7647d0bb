//! The recursive engine: walks a type's [`Shape`] and fills it from a
//! document or block.

use crate::tracing_macros::{trace, trace_span};
use crate::{
    AttributeResolver, Block, BlockAttributes, BlockField, BlockGroup, BlockSelector, Document,
    DocumentAttributes, FieldDef, FieldKind, FieldShape, ScalarField, ShapeViolation, Tag,
    Unmarshal, UnmarshalError,
};

/// Populates `target` from a document.
///
/// Fields are assigned in place and in declaration order. On error the
/// target may be partially populated and should be discarded.
pub fn unmarshal_document<T: Unmarshal>(
    document: &Document,
    target: &mut T,
) -> Result<(), UnmarshalError> {
    unmarshal_with(&DocumentAttributes::new(document), document, target)
}

/// Builds a `T` from a document, starting from `T::default()`.
pub fn from_document<T: Unmarshal>(document: &Document) -> Result<T, UnmarshalError> {
    let mut target = T::default();
    unmarshal_document(document, &mut target)?;
    Ok(target)
}

/// Populates `target` from a single block, treating the block as the root.
pub fn unmarshal_block<T: Unmarshal>(block: &Block, target: &mut T) -> Result<(), UnmarshalError> {
    unmarshal_with(&BlockAttributes::new(block), block, target)
}

/// Builds a `T` from a single block, starting from `T::default()`.
pub fn from_block<T: Unmarshal>(block: &Block) -> Result<T, UnmarshalError> {
    let mut target = T::default();
    unmarshal_block(block, &mut target)?;
    Ok(target)
}

/// Populates `target` from an arbitrary attribute source and block source.
///
/// [`unmarshal_document`] and [`unmarshal_block`] are thin wrappers around
/// this.
pub fn unmarshal_with<T: Unmarshal>(
    attributes: &dyn AttributeResolver,
    blocks: &dyn BlockSelector,
    target: &mut T,
) -> Result<(), UnmarshalError> {
    let shape = T::SHAPE;
    trace_span!("unmarshal", type_name = shape.type_name);

    for field in shape.fields {
        let at = FieldAt {
            type_name: shape.type_name,
            field,
        };

        let tag = Tag::parse(field.tag).map_err(|source| UnmarshalError::TagParse {
            type_name: at.type_name,
            field: at.field.name,
            source,
        })?;
        trace!(field = field.name, tag = field.tag, "dispatching field");

        match (&field.kind, tag.group()) {
            (FieldKind::Scalar(scalar), None) => read_value(&at, attributes, scalar, &tag, target)?,
            (FieldKind::Blocks(def), Some(group)) => {
                let matched = recurse(&at, blocks, group, def, &tag, target)?;
                if !matched && def.shape == FieldShape::Required {
                    return Err(UnmarshalError::MissingRequiredBlock {
                        type_name: at.type_name,
                        field: at.field.name,
                    });
                }
            }
            (FieldKind::Scalar(_), Some(_)) => {
                return Err(at.invalid_shape(ShapeViolation::GroupTagOnScalarField));
            }
            (FieldKind::Blocks(_), None) => {
                return Err(at.invalid_shape(ShapeViolation::ScalarTagOnBlockField));
            }
        }
    }

    Ok(())
}

struct FieldAt<T: 'static> {
    type_name: &'static str,
    field: &'static FieldDef<T>,
}

impl<T: 'static> FieldAt<T> {
    fn invalid_shape(&self, reason: ShapeViolation) -> UnmarshalError {
        UnmarshalError::InvalidFieldShape {
            type_name: self.type_name,
            field: self.field.name,
            reason,
        }
    }
}

fn read_value<T: 'static>(
    at: &FieldAt<T>,
    attributes: &dyn AttributeResolver,
    scalar: &ScalarField<T>,
    tag: &Tag,
    target: &mut T,
) -> Result<(), UnmarshalError> {
    let Some(value) = attributes.attribute(tag.name()) else {
        if scalar.shape.is_indirect() || tag.is_optional() {
            trace!(attribute = tag.name(), "absent, leaving field untouched");
            return Ok(());
        }
        return Err(UnmarshalError::MissingRequiredValue {
            type_name: at.type_name,
            field: at.field.name,
        });
    };

    (scalar.decode)(target, value, tag).map_err(|source| UnmarshalError::Value {
        type_name: at.type_name,
        field: at.field.name,
        source,
    })
}

/// Returns whether any block matched.
fn recurse<T: 'static>(
    at: &FieldAt<T>,
    blocks: &dyn BlockSelector,
    group: BlockGroup,
    def: &BlockField<T>,
    tag: &Tag,
    target: &mut T,
) -> Result<bool, UnmarshalError> {
    if def.shape == FieldShape::RepeatedIndirect {
        return Err(at.invalid_shape(ShapeViolation::IndirectElement));
    }

    let mut matched = false;

    'blocks: for (_index, block) in blocks.blocks(group).iter().enumerate() {
        let attributes = BlockAttributes::new(block);

        for (key, expected) in tag.filters() {
            let actual = attributes.attribute(key).unwrap_or_default();
            if actual != expected {
                trace!(index = _index, key, expected, actual, "filter mismatch");
                continue 'blocks;
            }
        }

        trace!(index = _index, %group, "block matched");
        (def.assign)(target, block).map_err(|source| UnmarshalError::Blocks {
            type_name: at.type_name,
            field: at.field.name,
            source: Box::new(source),
        })?;
        matched = true;

        if !def.shape.is_repeated() {
            break;
        }
    }

    Ok(matched)
}
