//! The NewsDoc document tree that unmarshalling reads from.

use std::collections::BTreeMap;

/// Free-form key/value data carried by a [`Block`].
pub type DataMap = BTreeMap<String, String>;

/// A NewsDoc document: a handful of scalar attributes and three ordered
/// groups of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Document {
    /// Document identifier.
    pub uuid: String,
    /// Content type of the document, e.g. `core/article`.
    pub r#type: String,
    /// Canonical URI.
    pub uri: String,
    /// Public URL.
    pub url: String,
    /// Title.
    pub title: String,
    /// Language code.
    pub language: String,
    /// Content blocks.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_default"))]
    pub content: Vec<Block>,
    /// Metadata blocks.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_default"))]
    pub meta: Vec<Block>,
    /// Links to other resources.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_default"))]
    pub links: Vec<Block>,
}

/// A node in the document tree.
///
/// Blocks have the same three groups as the [`Document`] itself, so they
/// nest to any depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Block {
    /// Block identifier, unique within the document.
    pub id: String,
    /// Identifier of the entity the block refers to.
    pub uuid: String,
    /// URI of the entity the block refers to.
    pub uri: String,
    /// URL of the entity the block refers to.
    pub url: String,
    /// Block type, e.g. `core/description`.
    pub r#type: String,
    /// Title.
    pub title: String,
    /// Free-form data, addressed as `data.<key>`.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_default"))]
    pub data: DataMap,
    /// Relationship of a link to its parent.
    pub rel: String,
    /// Role of the block.
    pub role: String,
    /// Name.
    pub name: String,
    /// Value.
    pub value: String,
    /// Content type of the referenced resource.
    #[cfg_attr(feature = "serde", serde(rename = "contenttype"))]
    pub content_type: String,
    /// Nested links.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_default"))]
    pub links: Vec<Block>,
    /// Nested content.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_default"))]
    pub content: Vec<Block>,
    /// Nested metadata.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "null_as_default"))]
    pub meta: Vec<Block>,
}

impl Block {
    /// Looks up a key in the block's data map.
    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

// NewsDoc producers write `null` for empty groups and data maps.
#[cfg(feature = "serde")]
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    let value = <Option<T> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserializes_newsdoc_json() {
        let json = indoc::indoc! {r#"
            {
                "uuid": "d04e9871-c3df-4fb0-878f-23f8d5ada7c2",
                "type": "core/planning-item",
                "title": "Planning",
                "meta": [
                    {
                        "type": "core/planning-item",
                        "data": {"urgency": "2"},
                        "contenttype": "text/plain",
                        "links": null
                    }
                ],
                "links": null,
                "content": []
            }
        "#};

        let doc: Document = serde_json::from_str(json).unwrap();

        assert_eq!(doc.r#type, "core/planning-item");
        assert_eq!(doc.language, "");
        assert!(doc.links.is_empty());
        assert_eq!(doc.meta.len(), 1);
        assert_eq!(doc.meta[0].content_type, "text/plain");
        assert_eq!(doc.meta[0].data_value("urgency"), Some("2"));
        assert!(doc.meta[0].links.is_empty());
    }

    #[test]
    fn null_data_is_empty() {
        let block: Block = serde_json::from_str(r#"{"rel": "author", "data": null}"#).unwrap();

        assert_eq!(block.rel, "author");
        assert!(block.data.is_empty());
    }
}
