//! XML document tree and tree parsers
//!
//! Schema inference never tokenizes XML itself. A [`TreeParser`] turns raw
//! text into a tree of [`Element`]s and [`Node`]s, and the analyzer only ever
//! sees that tree. Two parsers are provided: [`QuickXmlParser`] (the default,
//! built on quick-xml events) and [`RoxmlTreeParser`] (built on roxmltree).
//!
//! Names are local names. Prefixes are dropped and `xmlns` declarations are not
//! reported as attributes.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt;
use std::str::FromStr;

/// Attribute of an element, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Local name of the attribute
    pub name: String,
    /// Unescaped attribute value
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A child node of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data (CDATA sections included), possibly whitespace only
    Text(String),
    /// Comment content
    Comment(String),
    /// Processing instruction content
    ProcessingInstruction(String),
}

impl Node {
    /// Returns the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Local name of the element
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
    /// Child nodes in source order
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Add a text node
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Add a comment node
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.children.push(Node::Comment(comment.into()));
        self
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.name
    }

    /// Iterate over the direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

/// Capability of turning XML text into an element tree.
///
/// `Ok(None)` means the text is syntactically acceptable but has no root
/// element (empty, whitespace only, comments only). Syntax failures are
/// reported as [`Error::Parse`] carrying the parser's own diagnostic.
pub trait TreeParser: Send + Sync {
    /// Parse `text` into its root element
    fn parse(&self, text: &str) -> Result<Option<Element>>;

    /// Short name used in diagnostics
    fn name(&self) -> &'static str;
}

/// Parser implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserKind {
    /// Event-driven parser built on quick-xml
    #[default]
    QuickXml,
    /// DOM parser built on roxmltree
    Roxmltree,
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserKind::QuickXml => write!(f, "quick-xml"),
            ParserKind::Roxmltree => write!(f, "roxmltree"),
        }
    }
}

impl FromStr for ParserKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick-xml" | "quickxml" => Ok(ParserKind::QuickXml),
            "roxmltree" => Ok(ParserKind::Roxmltree),
            _ => Err(format!("Unknown parser: {}. Use: quick-xml, roxmltree", s)),
        }
    }
}

/// Create a tree parser by kind
pub fn create_parser(kind: ParserKind, limits: Limits) -> Box<dyn TreeParser> {
    match kind {
        ParserKind::QuickXml => Box::new(QuickXmlParser::new().with_limits(limits)),
        ParserKind::Roxmltree => Box::new(RoxmlTreeParser::new().with_limits(limits)),
    }
}

/// Tree parser driven by quick-xml events
#[derive(Debug, Clone, Default)]
pub struct QuickXmlParser {
    limits: Limits,
}

impl QuickXmlParser {
    /// Create a new parser with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build an element (without children) from a start tag ending at `position`
    fn parse_element(&self, start: &BytesStart, position: usize) -> Result<Element> {
        let name = std::str::from_utf8(start.local_name().as_ref())
            .map_err(|e| syntax_error(format!("Invalid element name: {}", e), position))?
            .to_string();

        let mut element = Element::new(name);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| syntax_error(format!("Failed to parse attribute: {}", e), position))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| syntax_error(format!("Invalid attribute name: {}", e), position))?;
            if attr_name == "xmlns" || attr_name.starts_with("xmlns:") {
                continue;
            }

            let local = std::str::from_utf8(attr.key.local_name().as_ref())
                .map_err(|e| syntax_error(format!("Invalid attribute name: {}", e), position))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| {
                    syntax_error(format!("Failed to unescape attribute value: {}", e), position)
                })?
                .into_owned();

            element.attributes.push(Attribute::new(local, value));
        }

        self.limits.check_attributes(element.attributes.len())?;
        Ok(element)
    }
}

/// Parse error located at a byte offset of the input
fn syntax_error(message: impl Into<String>, position: usize) -> ParseError {
    ParseError::new(message).with_location(format!("byte {}", position))
}

/// Attach a completed element to its parent, or make it the root
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: usize,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_some() {
        return Err(syntax_error(
            format!(
                "Multiple root elements: unexpected <{}> after the root element",
                element.name
            ),
            position,
        )
        .into());
    } else {
        *root = Some(element);
    }
    Ok(())
}

/// Add character data to the open element; outside the root only blank text is allowed
fn push_text(stack: &mut [Element], text: String, position: usize) -> Result<()> {
    match stack.last_mut() {
        Some(current) => {
            current.children.push(Node::Text(text));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(syntax_error("Text content outside of the root element", position).into()),
    }
}

impl TreeParser for QuickXmlParser {
    fn parse(&self, text: &str) -> Result<Option<Element>> {
        let mut reader = Reader::from_reader(text.as_bytes());

        let mut root: Option<Element> = None;
        let mut stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| syntax_error(e.to_string(), reader.buffer_position()))?;
            let position = reader.buffer_position();

            match event {
                Event::Start(e) => {
                    let element = self.parse_element(&e, position)?;
                    if stack.is_empty() && root.is_some() {
                        return Err(syntax_error(
                            format!(
                                "Multiple root elements: unexpected <{}> after the root element",
                                element.name
                            ),
                            position,
                        )
                        .into());
                    }
                    stack.push(element);
                    self.limits.check_xml_depth(stack.len())?;
                }
                Event::Empty(e) => {
                    let element = self.parse_element(&e, position)?;
                    self.limits.check_xml_depth(stack.len() + 1)?;
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::End(e) => {
                    let current = stack.pop().ok_or_else(|| {
                        syntax_error(
                            format!(
                                "Unexpected end tag </{}>",
                                String::from_utf8_lossy(e.name().as_ref())
                            ),
                            position,
                        )
                    })?;
                    attach(&mut stack, &mut root, current, position)?;
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| {
                            syntax_error(format!("Failed to unescape text: {}", e), position)
                        })?
                        .into_owned();
                    push_text(&mut stack, text, position)?;
                }
                Event::CData(e) => {
                    let text = String::from_utf8(e.into_inner().into_owned())
                        .map_err(|e| {
                            syntax_error(format!("Invalid CDATA content: {}", e), position)
                        })?;
                    push_text(&mut stack, text, position)?;
                }
                Event::Comment(e) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .children
                            .push(Node::Comment(String::from_utf8_lossy(&e).into_owned()));
                    }
                }
                Event::PI(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.children.push(Node::ProcessingInstruction(
                            String::from_utf8_lossy(&e).into_owned(),
                        ));
                    }
                }
                Event::Eof => break,
                _ => {} // XML declaration, DOCTYPE
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(syntax_error(
                format!("Unexpected end of input: element <{}> is not closed", open.name),
                text.len(),
            )
            .into());
        }

        Ok(root)
    }

    fn name(&self) -> &'static str {
        "quick-xml"
    }
}

/// Tree parser built on a roxmltree document
#[derive(Debug, Clone, Default)]
pub struct RoxmlTreeParser {
    limits: Limits,
}

impl RoxmlTreeParser {
    /// Create a new parser with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    fn convert(&self, node: roxmltree::Node<'_, '_>, depth: usize) -> Result<Element> {
        self.limits.check_xml_depth(depth)?;

        let mut element = Element::new(node.tag_name().name());
        for attr in node.attributes() {
            element.attributes.push(Attribute::new(attr.name(), attr.value()));
        }
        self.limits.check_attributes(element.attributes.len())?;

        for child in node.children() {
            let converted = match child.node_type() {
                roxmltree::NodeType::Element => Node::Element(self.convert(child, depth + 1)?),
                roxmltree::NodeType::Text => {
                    Node::Text(child.text().unwrap_or_default().to_string())
                }
                roxmltree::NodeType::Comment => {
                    Node::Comment(child.text().unwrap_or_default().to_string())
                }
                roxmltree::NodeType::PI => Node::ProcessingInstruction(
                    child
                        .pi()
                        .map(|pi| match pi.value {
                            Some(value) => format!("{} {}", pi.target, value),
                            None => pi.target.to_string(),
                        })
                        .unwrap_or_default(),
                ),
                roxmltree::NodeType::Root => continue,
            };
            element.children.push(converted);
        }

        Ok(element)
    }
}

impl TreeParser for RoxmlTreeParser {
    fn parse(&self, text: &str) -> Result<Option<Element>> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = match roxmltree::Document::parse_with_options(text, options) {
            Ok(doc) => doc,
            Err(roxmltree::Error::NoRootNode) => return Ok(None),
            Err(e) => return Err(Error::Parse(ParseError::new(e.to_string()))),
        };

        self.convert(doc.root_element(), 1).map(Some)
    }

    fn name(&self) -> &'static str {
        "roxmltree"
    }
}
