//! Schema emitter
//!
//! Renders a [`RecordMap`] as an XSD document: one global element declaration
//! per tag, then one named complex type per tag whose [`ContentShape`] needs
//! one. Both passes follow first-encounter order, so identical records always
//! produce identical text.

use super::records::{ContentShape, ElementRecord, RecordMap};
use crate::XSD_NAMESPACE;
use quick_xml::escape::escape;
use std::fmt::Write;
use tracing::debug;

/// Placeholder namespace bound to `targetNamespace` and the `tns` prefix
pub const DEFAULT_TARGET_NAMESPACE: &str = "http://example.com/schema";

/// Suffix appended to a tag name to form its type name
pub const TYPE_SUFFIX: &str = "Type";

/// Rendering options for the emitted schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Namespace URI used for `targetNamespace` and `xmlns:tns`
    target_namespace: String,
    /// Spaces per nesting level
    indent: usize,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            target_namespace: DEFAULT_TARGET_NAMESPACE.to_string(),
            indent: 2,
        }
    }
}

impl SchemaOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the target namespace
    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    /// Get the indentation width
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Set the target namespace
    pub fn with_target_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.target_namespace = namespace.into();
        self
    }

    /// Set the indentation width
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Name of the generated complex type for `tag`
pub fn type_name(tag: &str) -> String {
    format!("{}{}", tag, TYPE_SUFFIX)
}

/// Line-oriented writer with fixed indentation
struct SchemaWriter<'a> {
    out: String,
    options: &'a SchemaOptions,
}

impl<'a> SchemaWriter<'a> {
    fn new(options: &'a SchemaOptions) -> Self {
        Self {
            out: String::new(),
            options,
        }
    }

    fn line(&mut self, level: usize, text: &str) {
        let width = level * self.options.indent;
        // Writing into a String cannot fail
        let _ = writeln!(self.out, "{:width$}{}", "", text, width = width);
    }

    fn attributes(&mut self, level: usize, record: &ElementRecord) {
        for name in &record.attribute_names {
            self.line(
                level,
                &format!(r#"<xs:attribute name="{}" type="xs:string" use="optional"/>"#, name),
            );
        }
    }

    fn element_declaration(&mut self, tag: &str, record: &ElementRecord) {
        let type_ref = if record.shape().needs_type() {
            format!("tns:{}", type_name(tag))
        } else {
            "xs:string".to_string()
        };
        self.line(1, &format!(r#"<xs:element name="{}" type="{}"/>"#, tag, type_ref));
    }

    fn complex_type(&mut self, tag: &str, record: &ElementRecord) {
        let shape = record.shape();
        let name = type_name(tag);

        match shape {
            ContentShape::Text => {}
            ContentShape::TextWithAttributes => {
                self.line(1, &format!(r#"<xs:complexType name="{}">"#, name));
                self.line(2, "<xs:simpleContent>");
                self.line(3, r#"<xs:extension base="xs:string">"#);
                self.attributes(4, record);
                self.line(3, "</xs:extension>");
                self.line(2, "</xs:simpleContent>");
                self.line(1, "</xs:complexType>");
            }
            ContentShape::Children { mixed } => {
                if mixed {
                    self.line(1, &format!(r#"<xs:complexType name="{}" mixed="true">"#, name));
                } else {
                    self.line(1, &format!(r#"<xs:complexType name="{}">"#, name));
                }
                self.line(2, "<xs:sequence>");
                for child in record.ordered_children() {
                    self.line(
                        3,
                        &format!(
                            r#"<xs:element ref="tns:{}" minOccurs="0" maxOccurs="unbounded"/>"#,
                            child
                        ),
                    );
                }
                self.line(2, "</xs:sequence>");
                self.attributes(2, record);
                self.line(1, "</xs:complexType>");
            }
            ContentShape::Empty => {
                self.line(1, &format!(r#"<xs:complexType name="{}">"#, name));
                self.line(2, r#"<xs:sequence minOccurs="0"/>"#);
                self.attributes(2, record);
                self.line(1, "</xs:complexType>");
            }
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Render `records` as an XSD document
pub fn emit(records: &RecordMap, options: &SchemaOptions) -> String {
    let mut writer = SchemaWriter::new(options);
    let namespace = escape(options.target_namespace());

    writer.line(0, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    writer.line(
        0,
        &format!(
            r#"<xs:schema xmlns:xs="{}" targetNamespace="{}" xmlns:tns="{}" elementFormDefault="qualified">"#,
            XSD_NAMESPACE, namespace, namespace
        ),
    );

    for (tag, record) in records {
        writer.element_declaration(tag, record);
    }

    let mut type_count = 0;
    for (tag, record) in records {
        if record.shape().needs_type() {
            writer.complex_type(tag, record);
            type_count += 1;
        }
    }

    writer.line(0, "</xs:schema>");

    debug!(elements = records.len(), types = type_count, "emitted schema");
    writer.finish()
}

/// Render `records` with default options
pub fn emit_default(records: &RecordMap) -> String {
    emit(records, &SchemaOptions::default())
}
