//! # xmlschema-infer
//!
//! Infers a best-effort XML Schema (XSD) from a single XML document instance.
//!
//! Every element tag seen in the document becomes a global element
//! declaration. Tags with attributes, children or no content at all also get a
//! named complex type. All values are typed `xs:string` and every attribute and
//! child reference is optional, so the result describes what the instance
//! *contains* rather than what it *requires*.
//!
//! ## Example
//!
//! ```rust
//! use xmlschema_infer::generate_schema;
//!
//! let xsd = generate_schema("<root><item>Data</item></root>").unwrap();
//! assert!(xsd.contains(r#"<xs:element name="item" type="xs:string"/>"#));
//! ```
//!
//! The XML parser is pluggable through [`documents::TreeParser`]; see
//! [`inference::SchemaGenerator`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;

pub mod documents;
pub mod loaders;

pub mod inference;

// Re-exports for convenience
pub use documents::{Element, Node, ParserKind, TreeParser};
pub use error::{Error, ParseError, Result};
pub use inference::{
    analyze, emit, generate_schema, generate_schema_from_file, ElementRecord, RecordMap,
    SchemaGenerator, SchemaOptions,
};
pub use limits::Limits;

/// Version of the xmlschema-infer library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace, bound to the `xs` prefix in generated schemas
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
