//! Attribute resolvers and block selectors over [`Document`] and [`Block`].

use core::fmt;

use crate::{Block, Document};

/// One of the three named block groups of a document or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockGroup {
    /// The `meta` group.
    Meta,
    /// The `links` group.
    Links,
    /// The `content` group.
    Content,
}

impl BlockGroup {
    /// All groups, in the order NewsDoc documents list them.
    pub const ALL: [BlockGroup; 3] = [BlockGroup::Content, BlockGroup::Meta, BlockGroup::Links];

    /// Maps an annotation name to a group, if it names one.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "meta" => Some(BlockGroup::Meta),
            "links" => Some(BlockGroup::Links),
            "content" => Some(BlockGroup::Content),
            _ => None,
        }
    }

    /// The name used for this group in annotations.
    pub fn name(self) -> &'static str {
        match self {
            BlockGroup::Meta => "meta",
            BlockGroup::Links => "links",
            BlockGroup::Content => "content",
        }
    }
}

impl fmt::Display for BlockGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Answers "does attribute `name` exist, and what is its value?".
pub trait AttributeResolver {
    /// Returns the value of the named attribute, or `None` if it doesn't exist.
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// Gives access to the ordered blocks of each [`BlockGroup`].
pub trait BlockSelector {
    /// Returns the blocks of `group`, in document order.
    fn blocks(&self, group: BlockGroup) -> &[Block];
}

impl BlockSelector for Document {
    fn blocks(&self, group: BlockGroup) -> &[Block] {
        match group {
            BlockGroup::Meta => &self.meta,
            BlockGroup::Links => &self.links,
            BlockGroup::Content => &self.content,
        }
    }
}

impl BlockSelector for Block {
    fn blocks(&self, group: BlockGroup) -> &[Block] {
        match group {
            BlockGroup::Meta => &self.meta,
            BlockGroup::Links => &self.links,
            BlockGroup::Content => &self.content,
        }
    }
}

/// Resolves document-level attributes: `uuid`, `type`, `title`, `uri`,
/// `url` and `language`.
///
/// Known attributes always exist, even when empty.
#[derive(Debug, Clone, Copy)]
pub struct DocumentAttributes<'a> {
    document: &'a Document,
}

impl<'a> DocumentAttributes<'a> {
    /// Creates a resolver for `document`.
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }
}

impl AttributeResolver for DocumentAttributes<'_> {
    fn attribute(&self, name: &str) -> Option<&str> {
        let doc = self.document;
        let value = match name {
            "uuid" => &doc.uuid,
            "type" => &doc.r#type,
            "uri" => &doc.uri,
            "url" => &doc.url,
            "title" => &doc.title,
            "language" => &doc.language,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Resolves block-level attributes plus `data.<key>` lookups into the
/// block's data map.
///
/// Known attributes always exist, even when empty. A `data.<key>` attribute
/// exists only if the key is present in the data map.
#[derive(Debug, Clone, Copy)]
pub struct BlockAttributes<'a> {
    block: &'a Block,
}

impl<'a> BlockAttributes<'a> {
    /// Creates a resolver for `block`.
    pub fn new(block: &'a Block) -> Self {
        Self { block }
    }
}

impl AttributeResolver for BlockAttributes<'_> {
    fn attribute(&self, name: &str) -> Option<&str> {
        let block = self.block;

        if let Some(key) = name.strip_prefix("data.") {
            return block.data_value(key);
        }

        let value = match name {
            "id" => &block.id,
            "uuid" => &block.uuid,
            "type" => &block.r#type,
            "uri" => &block.uri,
            "url" => &block.url,
            "title" => &block.title,
            "rel" => &block.rel,
            "name" => &block.name,
            "value" => &block.value,
            "contenttype" => &block.content_type,
            "role" => &block.role,
            _ => return None,
        };
        Some(value.as_str())
    }
}
