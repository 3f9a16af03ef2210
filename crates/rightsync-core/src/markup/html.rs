//! HTML → [`Node`] tree via `scraper` (html5ever).
//!
//! HTML parsing never fails: the html5ever tree builder recovers from any
//! input, and inserts implied elements such as `<tbody>` the way a browser
//! would.

use scraper::{ElementRef, Html};

use super::node::{Element, Node};

/// Parses an HTML fragment (e.g. an XHR response). The returned root is the
/// `html` element html5ever wraps every fragment in.
pub fn parse_html(input: &str) -> Element {
    let html = Html::parse_fragment(input);
    convert(html.root_element())
}

fn convert(el: ElementRef<'_>) -> Element {
    let value = el.value();
    let mut out = Element::new(value.name());
    out.attrs = value
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            out.children.push(Node::Element(convert(child_el)));
        } else if let Some(t) = child.value().as_text() {
            out.children.push(Node::Text((**t).to_owned()));
        }
    }
    out
}
