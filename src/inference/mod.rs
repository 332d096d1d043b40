//! Schema inference
//!
//! The pipeline is `text -> TreeParser -> analyze -> emit`:
//!
//! - [`analyzer`] folds the parsed tree into one [`ElementRecord`] per tag name
//! - [`emitter`] renders those records as an XSD document
//!
//! [`SchemaGenerator`] wires the two together behind a replaceable
//! [`TreeParser`].

pub mod analyzer;
pub mod emitter;
pub mod records;

pub use analyzer::{analyze, Analyzer};
pub use emitter::{
    emit, emit_default, type_name, SchemaOptions, DEFAULT_TARGET_NAMESPACE, TYPE_SUFFIX,
};
pub use records::{ContentShape, ElementRecord, RecordMap};

use crate::documents::{create_parser, Element, ParserKind, TreeParser};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::loaders::{Loader, Location};
use std::path::Path;
use tracing::debug;

/// Infers XSD schemas from XML text
pub struct SchemaGenerator {
    parser: Box<dyn TreeParser>,
    /// Set while `parser` is a bundled parser, so it can follow limit changes
    parser_kind: Option<ParserKind>,
    options: SchemaOptions,
    limits: Limits,
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SchemaGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaGenerator")
            .field("parser", &self.parser.name())
            .field("options", &self.options)
            .field("limits", &self.limits)
            .finish()
    }
}

impl SchemaGenerator {
    /// Create a generator using the default parser, options and limits
    pub fn new() -> Self {
        Self {
            parser: create_parser(ParserKind::default(), Limits::default()),
            parser_kind: Some(ParserKind::default()),
            options: SchemaOptions::default(),
            limits: Limits::default(),
        }
    }

    /// Use a specific tree parser
    pub fn with_parser(mut self, parser: Box<dyn TreeParser>) -> Self {
        self.parser = parser;
        self.parser_kind = None;
        self
    }

    /// Use one of the bundled parsers, configured with the current limits
    pub fn with_parser_kind(mut self, kind: ParserKind) -> Self {
        self.parser = create_parser(kind, self.limits.clone());
        self.parser_kind = Some(kind);
        self
    }

    /// Set the schema rendering options
    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the input limits. The size limit applies to every parser; a
    /// bundled parser is rebuilt so it also enforces the depth and attribute
    /// limits. Parsers given to [`with_parser`](Self::with_parser) are kept.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        if let Some(kind) = self.parser_kind {
            self.parser = create_parser(kind, limits.clone());
        }
        self.limits = limits;
        self
    }

    /// Get the rendering options
    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// Parse `xml` and return its root element
    pub fn parse_root(&self, xml: &str) -> Result<Element> {
        self.limits.check_xml_size(xml.len())?;
        let root = self.parser.parse(xml)?.ok_or(Error::NoRootElement)?;
        debug!(parser = self.parser.name(), root = %root.name, "parsed document");
        Ok(root)
    }

    /// Parse `xml` and return the accumulated element records
    pub fn analyze(&self, xml: &str) -> Result<RecordMap> {
        let root = self.parse_root(xml)?;
        Ok(analyze(&root))
    }

    /// Infer a schema for `xml`
    pub fn generate(&self, xml: &str) -> Result<String> {
        let records = self.analyze(xml)?;
        Ok(emit(&records, &self.options))
    }

    /// Infer a schema for the XML document at `location`
    pub fn generate_from(&self, location: &Location) -> Result<String> {
        let xml = Loader::new()
            .with_limits(self.limits.clone())
            .load(location)?;
        self.generate(&xml)
    }
}

/// Infer a schema for `xml` with the default generator
pub fn generate_schema(xml: &str) -> Result<String> {
    SchemaGenerator::new().generate(xml)
}

/// Infer a schema for the XML file at `path` with the default generator
pub fn generate_schema_from_file(path: impl AsRef<Path>) -> Result<String> {
    SchemaGenerator::new().generate_from(&Location::Path(path.as_ref().to_path_buf()))
}
