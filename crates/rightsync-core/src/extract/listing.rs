//! `right_scripts.xml` → [`Resource`] records.

use anyhow::Result;

use super::leading_int;
use crate::markup::{self, Element};
use crate::model::Resource;

/// Parses the XML listing and extracts its resources.
pub fn parse_listing(xml: &str) -> Result<Vec<Resource>> {
    let root = markup::parse_xml(xml)?;
    Ok(extract_resources(&root))
}

/// Walks `/right-scripts[@type="array"]/right-script` in document order.
///
/// A root that is not an array-typed `right-scripts` element yields no
/// records.
pub fn extract_resources(root: &Element) -> Vec<Resource> {
    if root.name != "right-scripts" || !root.has_attr("type", "array") {
        tracing::warn!(root = %root.name, "listing root is not a right-scripts array");
        return Vec::new();
    }
    root.children_named("right-script").map(resource_from).collect()
}

fn resource_from(el: &Element) -> Resource {
    let href = el.child_text("href");
    Resource {
        id: id_from_href(&href),
        name: el.child_text("name"),
        version: leading_int(&el.child_text("version")),
        content: el.child_text("script"),
        description: el.child_text("description"),
        created_at: el.child_text("created-at"),
        updated_at: el.child_text("updated-at"),
        is_head_version: el.child_text("is-head-version").eq_ignore_ascii_case("true"),
        source_uri: href,
    }
}

/// Integer after the last `/` of a reference URL.
fn id_from_href(href: &str) -> i64 {
    let tail = href.rsplit('/').next().unwrap_or(href);
    leading_int(tail)
}
