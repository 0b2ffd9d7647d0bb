//! Helpers called by code generated by `#[derive(Unmarshal)]`. Not public API.

use crate::{Block, ScalarDecodable, Tag, Unmarshal, UnmarshalError, ValueError, from_block};

pub fn decode_required<V: ScalarDecodable>(
    slot: &mut V,
    value: &str,
    tag: &Tag,
) -> Result<(), ValueError> {
    *slot = V::decode_scalar(value, tag)?;
    Ok(())
}

pub fn decode_optional<V: ScalarDecodable>(
    slot: &mut Option<V>,
    value: &str,
    tag: &Tag,
) -> Result<(), ValueError> {
    *slot = Some(V::decode_scalar(value, tag)?);
    Ok(())
}

pub fn assign_required<B: Unmarshal>(slot: &mut B, block: &Block) -> Result<(), UnmarshalError> {
    *slot = from_block(block)?;
    Ok(())
}

pub fn assign_optional<B: Unmarshal>(
    slot: &mut Option<B>,
    block: &Block,
) -> Result<(), UnmarshalError> {
    *slot = Some(from_block(block)?);
    Ok(())
}

pub fn assign_repeated<B: Unmarshal>(slot: &mut Vec<B>, block: &Block) -> Result<(), UnmarshalError> {
    slot.push(from_block(block)?);
    Ok(())
}

/// Placeholder for `Vec<Option<T>>` and `Vec<Box<T>>` block fields, which
/// the engine rejects before any block is assigned.
pub fn assign_unsupported<S>(_slot: &mut S, _block: &Block) -> Result<(), UnmarshalError> {
    Ok(())
}
