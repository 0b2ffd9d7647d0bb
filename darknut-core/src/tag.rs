//! Parsing of field annotations: `name[,option]*`.
//!
//! The name is either a block group (`meta`, `links`, `content`) or an
//! attribute (`title`, `data.text`, ...). Options are flags (`optional`) or
//! `key=value` pairs. `format=<layout>` picks a timestamp layout, every other
//! pair is a filter that candidate blocks must match.

use crate::{BlockGroup, TagParseError, TagParseErrorReason};

/// Flag that lets a required scalar be absent.
pub const OPTIONAL: &str = "optional";

/// Option key selecting the timestamp layout.
pub const FORMAT: &str = "format";

/// A parsed field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: &'static str,
    options: Vec<TagOption>,
}

/// One option of a [`Tag`], either `key` or `key=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagOption {
    /// The option key.
    pub key: &'static str,
    /// The value after `=`, if there was one. May be empty.
    pub value: Option<&'static str>,
}

impl Tag {
    /// Parses an annotation string.
    pub fn parse(raw: &'static str) -> Result<Self, TagParseError> {
        let mut parts = raw.split(',');

        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(TagParseError {
                raw,
                reason: TagParseErrorReason::EmptyName,
            });
        }

        let mut options = Vec::new();
        for (index, part) in parts.enumerate() {
            if part.is_empty() {
                return Err(TagParseError {
                    raw,
                    reason: TagParseErrorReason::EmptyOption { position: index + 1 },
                });
            }

            let option = match part.split_once('=') {
                Some(("", _)) => {
                    return Err(TagParseError {
                        raw,
                        reason: TagParseErrorReason::EmptyOptionKey { option: part },
                    });
                }
                Some((key, value)) => TagOption {
                    key,
                    value: Some(value),
                },
                None => TagOption {
                    key: part,
                    value: None,
                },
            };
            options.push(option);
        }

        Ok(Tag { name, options })
    }

    /// The target name: an attribute or a block group.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The options, in declaration order.
    pub fn options(&self) -> &[TagOption] {
        &self.options
    }

    /// The block group this annotation recurses into, if any.
    pub fn group(&self) -> Option<BlockGroup> {
        BlockGroup::from_name(self.name)
    }

    /// Whether the bare flag `flag` is present.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.options
            .iter()
            .any(|opt| opt.key == flag && opt.value.is_none())
    }

    /// Whether the `optional` flag is present.
    pub fn is_optional(&self) -> bool {
        self.has_flag(OPTIONAL)
    }

    /// The value of the first `key=value` option with the given key.
    pub fn option(&self, key: &str) -> Option<&'static str> {
        self.options
            .iter()
            .find(|opt| opt.key == key)
            .and_then(|opt| opt.value)
    }

    /// The timestamp layout from `format=<layout>`, if given.
    pub fn format(&self) -> Option<&'static str> {
        self.option(FORMAT)
    }

    /// The block filters: every `key=value` option except `format`.
    pub fn filters(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.options
            .iter()
            .filter(|opt| opt.key != FORMAT)
            .filter_map(|opt| opt.value.map(|value| (opt.key, value)))
    }
}
