//! Structural analyzer
//!
//! Walks an element tree once, depth first, and folds every element instance
//! into the [`ElementRecord`] of its tag name. Instances of the same tag in
//! different positions share one record.

use super::records::{ElementRecord, RecordMap};
use crate::documents::{Element, Node};
use tracing::{debug, trace};

/// Accumulates records during a single traversal
#[derive(Debug, Default)]
pub struct Analyzer {
    records: RecordMap,
}

impl Analyzer {
    /// Create an analyzer with an empty record map
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `root` and all of its descendants into the records
    pub fn visit(&mut self, root: &Element) {
        self.visit_element(root, None);
    }

    /// Consume the analyzer and return the accumulated records
    pub fn into_records(self) -> RecordMap {
        self.records
    }

    fn visit_element(&mut self, element: &Element, parent: Option<&str>) {
        trace!(tag = %element.name, parent = parent.unwrap_or("-"), "visiting element");

        let record = self
            .records
            .entry(element.name.clone())
            .or_insert_with(ElementRecord::new);

        for attr in &element.attributes {
            record.attribute_names.insert(attr.name.clone());
        }

        for child in &element.children {
            match child {
                Node::Element(child) => {
                    record.child_tag_names.insert(child.name.clone());
                    if !record.child_order.contains(&child.name) {
                        record.child_order.push(child.name.clone());
                    }
                }
                Node::Text(text) => {
                    if !text.trim().is_empty() {
                        record.has_text = true;
                    }
                }
                Node::Comment(_) | Node::ProcessingInstruction(_) => {}
            }
        }

        for child in element.child_elements() {
            self.visit_element(child, Some(&element.name));
        }
    }
}

/// Analyze a document tree rooted at `root`
pub fn analyze(root: &Element) -> RecordMap {
    let mut analyzer = Analyzer::new();
    analyzer.visit(root);
    let records = analyzer.into_records();
    debug!(root = %root.name, tags = records.len(), "analyzed document structure");
    records
}
