//! Node tree and structural queries.

/// A node in a parsed document. Comments, doctypes and processing
/// instructions are dropped at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name without namespace prefix.
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str, value: &str) -> bool {
        self.attr(name) == Some(value)
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Direct child elements with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First direct child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Direct child element matching `name` whose attribute `attr` equals `value`.
    pub fn child_with_attr(&self, name: &str, attr: &str, value: &str) -> Option<&Element> {
        self.elements()
            .find(|e| e.name == name && e.has_attr(attr, value))
    }

    /// Concatenated direct text children (not descendants). Mirrors a
    /// `name/text()` query: text inside nested elements is not included.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Trimmed direct text of the first child named `name`; empty when absent.
    pub fn child_text(&self, name: &str) -> String {
        self.child(name)
            .map(|e| e.text().trim().to_string())
            .unwrap_or_default()
    }

    /// All descendant elements (depth-first, document order) matching `pred`.
    pub fn descendants_where<'a, F>(&'a self, pred: F) -> Vec<&'a Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut out = Vec::new();
        collect_descendants(self, &pred, &mut out);
        out
    }
}

fn collect_descendants<'a, F>(el: &'a Element, pred: &F, out: &mut Vec<&'a Element>)
where
    F: Fn(&Element) -> bool,
{
    for child in el.elements() {
        if pred(child) {
            out.push(child);
        }
        collect_descendants(child, pred, out);
    }
}
