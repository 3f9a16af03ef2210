//! XML → [`Node`] tree via `roxmltree`.

use anyhow::{Context, Result};

use super::node::{Element, Node};

/// Parses an XML document and returns its root element.
///
/// CDATA sections become ordinary text nodes. A `<!DOCTYPE>` declaration is
/// accepted and otherwise ignored.
pub fn parse_xml(input: &str) -> Result<Element> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(input, options)
        .context("malformed XML document")?;
    Ok(convert(doc.root_element()))
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut el = Element::new(node.tag_name().name());
    el.attrs = node
        .attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();
    for child in node.children() {
        if child.is_element() {
            el.children.push(Node::Element(convert(child)));
        } else if child.is_text() {
            if let Some(t) = child.text() {
                el.children.push(Node::Text(t.to_string()));
            }
        }
    }
    el
}
