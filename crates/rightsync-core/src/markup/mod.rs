//! Generic markup tree.
//!
//! Both remote document shapes (the XML listing and the HTML attachment
//! fragment) are converted into [`Node`] trees so extraction code only depends
//! on this small query surface, never on a parser's own API.

mod html;
mod node;
mod xml;

pub use html::parse_html;
pub use node::{Element, Node};
pub use xml::parse_xml;
