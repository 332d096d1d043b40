//! End-to-end tests for schema inference
//!
//! These tests drive the public API from XML text to XSD text and check the
//! shapes produced for each kind of element.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xmlschema_infer::documents::{Element, Node, RoxmlTreeParser};
use xmlschema_infer::inference::SchemaGenerator;
use xmlschema_infer::{analyze, generate_schema, Error, ParserKind};

/// Extract the `<xs:complexType>` block generated for `tag`
fn type_block<'a>(schema: &'a str, tag: &str) -> Option<&'a str> {
    let start = schema.find(&format!(r#"<xs:complexType name="{}Type""#, tag))?;
    let end = schema[start..].find("</xs:complexType>")? + start;
    Some(&schema[start..end])
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_root_with_text_child() {
    let schema = generate_schema("<root><item>Data</item></root>").unwrap();

    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="http://example.com/schema" xmlns:tns="http://example.com/schema" elementFormDefault="qualified">
  <xs:element name="root" type="tns:rootType"/>
  <xs:element name="item" type="xs:string"/>
  <xs:complexType name="rootType">
    <xs:sequence>
      <xs:element ref="tns:item" minOccurs="0" maxOccurs="unbounded"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>
"#;
    assert_eq!(schema, expected);
}

#[test]
fn test_attribute_only_element() {
    let schema = generate_schema(r#"<config active="false"/>"#).unwrap();

    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="http://example.com/schema" xmlns:tns="http://example.com/schema" elementFormDefault="qualified">
  <xs:element name="config" type="tns:configType"/>
  <xs:complexType name="configType">
    <xs:sequence minOccurs="0"/>
    <xs:attribute name="active" type="xs:string" use="optional"/>
  </xs:complexType>
</xs:schema>
"#;
    assert_eq!(schema, expected);
}

#[test]
fn test_empty_element_gets_empty_optional_type() {
    let schema = generate_schema("<doc><br/><hr></hr></doc>").unwrap();

    for tag in ["br", "hr"] {
        assert!(schema.contains(&format!(
            r#"<xs:element name="{}" type="tns:{}Type"/>"#,
            tag, tag
        )));
        let block = type_block(&schema, tag).unwrap();
        assert!(block.contains(r#"<xs:sequence minOccurs="0"/>"#));
    }
}

#[test]
fn test_repeated_children_yield_one_reference() {
    let schema = generate_schema("<list><value>A</value><value>B</value></list>").unwrap();

    let block = type_block(&schema, "list").unwrap();
    assert_eq!(block.matches(r#"ref="tns:value""#).count(), 1);
    assert_eq!(schema.matches(r#"<xs:element name="value""#).count(), 1);
}

#[test]
fn test_text_only_element_has_no_type() {
    let schema = generate_schema("<note><to>Tove</to><from>Jani</from></note>").unwrap();

    assert!(schema.contains(r#"<xs:element name="to" type="xs:string"/>"#));
    assert!(schema.contains(r#"<xs:element name="from" type="xs:string"/>"#));
    assert!(type_block(&schema, "to").is_none());
    assert!(type_block(&schema, "from").is_none());
}

#[test]
fn test_text_with_attributes_uses_simple_content() {
    let xml = r#"<prices><price currency="EUR" vat="yes">10</price><price currency="USD">12</price></prices>"#;
    let schema = generate_schema(xml).unwrap();

    let block = type_block(&schema, "price").unwrap();
    assert!(block.contains("<xs:simpleContent>"));
    assert!(block.contains(r#"<xs:extension base="xs:string">"#));
    assert_eq!(block.matches(r#"name="currency""#).count(), 1);
    assert_eq!(block.matches(r#"name="vat""#).count(), 1);
}

#[test]
fn test_text_and_children_is_mixed() {
    let schema = generate_schema("<p>Hello <b>bold</b> world</p>").unwrap();

    assert!(schema.contains(r#"<xs:complexType name="pType" mixed="true">"#));
    assert!(type_block(&schema, "p").unwrap().contains(r#"ref="tns:b""#));
}

#[test]
fn test_children_and_attributes() {
    let xml = r#"<book id="1"><title>T</title><author>A</author></book>"#;
    let schema = generate_schema(xml).unwrap();

    let block = type_block(&schema, "book").unwrap();
    let sequence_end = block.find("</xs:sequence>").unwrap();
    let attribute = block.find(r#"<xs:attribute name="id""#).unwrap();
    assert!(attribute > sequence_end, "attributes follow the sequence");
    assert!(!block.contains("mixed"));

    let title = block.find(r#"ref="tns:title""#).unwrap();
    let author = block.find(r#"ref="tns:author""#).unwrap();
    assert!(title < author);
}

#[test]
fn test_whitespace_between_children_is_not_text() {
    let xml = "<root>\n  <a>x</a>\n  <b/>\n</root>\n";
    let schema = generate_schema(xml).unwrap();

    assert!(schema.contains(r#"<xs:complexType name="rootType">"#));
    assert!(!schema.contains("mixed"));
}

#[test]
fn test_declarations_precede_types_in_encounter_order() {
    let xml = "<library><shelf><book/></shelf><catalog/></library>";
    let schema = generate_schema(xml).unwrap();

    let positions: Vec<usize> = ["library", "shelf", "book", "catalog"]
        .iter()
        .map(|tag| schema.find(&format!(r#"<xs:element name="{}""#, tag)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let first_type = schema.find("<xs:complexType").unwrap();
    assert!(positions.iter().all(|&p| p < first_type));
}

#[test]
fn test_later_children_are_appended_to_order() {
    let xml = "<r><e><b/><a/></e><e><c/><a/></e></r>";
    let schema = generate_schema(xml).unwrap();

    let block = type_block(&schema, "e").unwrap();
    let b = block.find(r#"ref="tns:b""#).unwrap();
    let a = block.find(r#"ref="tns:a""#).unwrap();
    let c = block.find(r#"ref="tns:c""#).unwrap();
    assert!(b < a && a < c);
}

#[test]
fn test_prolog_comments_and_cdata() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- generated -->
<doc><code><![CDATA[if (a < b) {}]]></code><!-- trailing --></doc>"#;
    let schema = generate_schema(xml).unwrap();

    assert!(schema.contains(r#"<xs:element name="code" type="xs:string"/>"#));
    assert!(schema.contains(r#"<xs:element name="doc" type="tns:docType"/>"#));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_input_has_no_root() {
    for xml in ["", "   \n  ", "<!-- nothing here -->"] {
        let err = generate_schema(xml).unwrap_err();
        assert!(matches!(err, Error::NoRootElement), "input {:?}", xml);
        assert!(err.is_invalid_input());
    }
}

#[test]
fn test_syntax_error_embeds_parser_detail() {
    for xml in ["<root><item></root>", "<root><item>", "<a/><b/>", "<a>text</a> tail"] {
        match generate_schema(xml) {
            Err(Error::Parse(detail)) => {
                let message = Error::Parse(detail.clone()).to_string();
                assert!(!detail.message.is_empty());
                assert!(message.contains(&detail.message), "input {:?}", xml);
            }
            other => panic!("expected parse error for {:?}, got {:?}", xml, other),
        }
    }
}

#[test]
fn test_roxmltree_errors_match_kinds() {
    let generator = SchemaGenerator::new().with_parser_kind(ParserKind::Roxmltree);

    assert!(matches!(generator.generate(""), Err(Error::NoRootElement)));
    assert!(matches!(
        generator.generate("<root><item></root>"),
        Err(Error::Parse(_))
    ));
}

// ============================================================================
// Properties
// ============================================================================

fn arb_tag() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from)
}

fn arb_attributes() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(prop::sample::select(vec!["id", "kind", "lang"]), 0..3)
        .prop_map(|set| set.into_iter().map(String::from).collect())
}

fn arb_element() -> impl Strategy<Value = Element> {
    let leaf = (arb_tag(), arb_attributes(), prop::option::of("[a-z ]{0,6}")).prop_map(
        |(tag, attrs, text)| {
            let mut element = Element::new(tag);
            for attr in attrs {
                element = element.with_attribute(attr, "v");
            }
            if let Some(text) = text {
                element = element.with_text(text);
            }
            element
        },
    );

    leaf.prop_recursive(4, 40, 4, |inner| {
        (
            arb_tag(),
            arb_attributes(),
            prop::collection::vec(inner, 0..4),
            prop::option::of("[a-z]{1,4}"),
        )
            .prop_map(|(tag, attrs, children, text)| {
                let mut element = Element::new(tag);
                for attr in attrs {
                    element = element.with_attribute(attr, "v");
                }
                if let Some(text) = text {
                    element = element.with_text(text);
                }
                for child in children {
                    element = element.with_child(child);
                }
                element
            })
    })
}

fn to_xml(element: &Element) -> String {
    let mut out = format!("<{}", element.name);
    for attr in &element.attributes {
        out.push_str(&format!(r#" {}="{}""#, attr.name, attr.value));
    }
    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(child) => out.push_str(&to_xml(child)),
            Node::Text(text) => out.push_str(text),
            Node::Comment(text) => out.push_str(&format!("<!--{}-->", text)),
            Node::ProcessingInstruction(_) => {}
        }
    }
    out.push_str(&format!("</{}>", element.name));
    out
}

proptest! {
    #[test]
    fn prop_output_is_deterministic(root in arb_element()) {
        let xml = to_xml(&root);
        let first = generate_schema(&xml).unwrap();
        let second = generate_schema(&xml).unwrap();
        prop_assert_eq!(&first, &second);

        let rox = SchemaGenerator::new()
            .with_parser(Box::new(RoxmlTreeParser::new()))
            .generate(&xml)
            .unwrap();
        prop_assert_eq!(first, rox);
    }

    #[test]
    fn prop_one_reference_per_distinct_child(root in arb_element()) {
        let xml = to_xml(&root);
        let schema = generate_schema(&xml).unwrap();
        let records = analyze(&root);

        for (tag, record) in &records {
            prop_assert_eq!(
                schema.matches(&format!(r#"<xs:element name="{}""#, tag)).count(),
                1
            );
            if record.child_tag_names.is_empty() {
                continue;
            }
            let block = type_block(&schema, tag).unwrap();
            prop_assert_eq!(block.matches("ref=").count(), record.child_tag_names.len());
            for child in &record.child_tag_names {
                let reference = format!(r#"ref="tns:{}""#, child);
                prop_assert_eq!(block.matches(reference.as_str()).count(), 1);
            }
        }
    }
}
