//! Per-tag structural records accumulated by the analyzer

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Records keyed by tag name, in order of first encounter
pub type RecordMap = IndexMap<String, ElementRecord>;

/// Structural summary of every element instance sharing one tag name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    /// Attribute names seen on any instance
    pub attribute_names: IndexSet<String>,
    /// Distinct tag names seen as direct children of any instance
    pub child_tag_names: IndexSet<String>,
    /// True once an instance directly contains non-blank text
    pub has_text: bool,
    /// Children in the order they were first seen; a rendering hint only
    pub child_order: Vec<String>,
}

/// The content model a record maps to when emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentShape {
    /// Plain `xs:string` element, no type definition
    Text,
    /// String content extended with attributes
    TextWithAttributes,
    /// Sequence of child references, mixed when text is present
    Children {
        /// Whether text also appears directly inside the element
        mixed: bool,
    },
    /// Explicitly empty content, attributes allowed
    Empty,
}

impl ContentShape {
    /// Returns true if the shape needs a named complex type
    pub fn needs_type(&self) -> bool {
        !matches!(self, ContentShape::Text)
    }
}

impl ElementRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any attribute was seen
    pub fn has_attributes(&self) -> bool {
        !self.attribute_names.is_empty()
    }

    /// Returns true if any child element was seen
    pub fn has_children(&self) -> bool {
        !self.child_tag_names.is_empty()
    }

    /// Pick the content model for this record
    pub fn shape(&self) -> ContentShape {
        if self.has_children() {
            ContentShape::Children {
                mixed: self.has_text,
            }
        } else if self.has_text && self.has_attributes() {
            ContentShape::TextWithAttributes
        } else if self.has_text {
            ContentShape::Text
        } else {
            ContentShape::Empty
        }
    }

    /// Children in rendering order: `child_order` first, then any child tag
    /// that never made it into the order
    pub fn ordered_children(&self) -> impl Iterator<Item = &str> {
        let extra = self
            .child_tag_names
            .iter()
            .filter(move |name| !self.child_order.contains(*name));
        self.child_order
            .iter()
            .map(String::as_str)
            .chain(extra.map(String::as_str))
    }
}
