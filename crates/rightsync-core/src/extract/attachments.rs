//! `script_attachments` HTML fragment → [`Attachment`] records.

use crate::markup::{self, Element};
use crate::model::Attachment;

/// `id` of the dashboard table listing a script's attachments.
pub const ATTACHMENT_TABLE_ID: &str = "right_scripts_show_script_attachments";

const COLUMN_ATTR: &str = "data-column_name";

pub fn parse_attachment_fragment(html: &str) -> Vec<Attachment> {
    extract_attachments(&markup::parse_html(html))
}

/// Walks `table#right_scripts_show_script_attachments > tbody > tr`.
///
/// Rows without a filename (headers, separators, "no attachments" rows) are
/// skipped.
pub fn extract_attachments(root: &Element) -> Vec<Attachment> {
    let tables =
        root.descendants_where(|e| e.name == "table" && e.has_attr("id", ATTACHMENT_TABLE_ID));

    let mut out = Vec::new();
    for table in tables {
        for tbody in table.children_named("tbody") {
            out.extend(tbody.children_named("tr").filter_map(attachment_from_row));
        }
    }
    out
}

fn attachment_from_row(row: &Element) -> Option<Attachment> {
    let anchor = cell(row, "Filename").and_then(|td| td.child("a"));
    let filename = anchor.map(|a| a.text().trim().to_string()).unwrap_or_default();
    if filename.is_empty() {
        return None;
    }
    let uri = anchor
        .and_then(|a| a.attr("href"))
        .map(|h| h.trim().to_string())
        .unwrap_or_default();

    Some(Attachment {
        filename,
        uri,
        size: cell_text(row, "Size"),
        created_at: cell_text(row, "Created At"),
        updated_at: cell_text(row, "Updated At"),
        content_hash: cell_text(row, "md5sum"),
    })
}

fn cell<'a>(row: &'a Element, column: &str) -> Option<&'a Element> {
    row.child_with_attr("td", COLUMN_ATTR, column)
}

fn cell_text(row: &Element, column: &str) -> String {
    cell(row, column)
        .map(|td| td.text().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = r#"
<div class="attachments">
<table id="right_scripts_show_script_attachments" class="data">
  <thead><tr><th>Filename</th><th>Size</th></tr></thead>
  <tbody>
    <tr>
      <td data-column_name="Filename"><a href="/acct/1/right_scripts/42/script_attachments/9/download">data.csv</a></td>
      <td data-column_name="Size"> 1.2 KB </td>
      <td data-column_name="Created At">2011/12/01 00:00:00 +0000</td>
      <td data-column_name="Updated At">2012/01/01 00:00:00 +0000</td>
      <td data-column_name="md5sum">abc123</td>
    </tr>
    <tr><td colspan="5"></td></tr>
    <tr>
      <td data-column_name="Filename"><a href="https://cdn.example.com/b.tgz"> b.tgz </a></td>
      <td data-column_name="md5sum">ffee</td>
    </tr>
  </tbody>
</table>
<table id="other"><tbody><tr><td data-column_name="Filename"><a href="/x">nope.txt</a></td></tr></tbody></table>
</div>"#;

    #[test]
    fn extracts_rows_with_filenames() {
        let atts = parse_attachment_fragment(FRAGMENT);
        assert_eq!(atts.len(), 2);
        let a = &atts[0];
        assert_eq!(a.filename, "data.csv");
        assert_eq!(a.uri, "/acct/1/right_scripts/42/script_attachments/9/download");
        assert_eq!(a.size, "1.2 KB");
        assert_eq!(a.created_at, "2011/12/01 00:00:00 +0000");
        assert_eq!(a.updated_at, "2012/01/01 00:00:00 +0000");
        assert_eq!(a.content_hash, "abc123");
    }

    #[test]
    fn missing_cells_become_empty() {
        let b = &parse_attachment_fragment(FRAGMENT)[1];
        assert_eq!(b.filename, "b.tgz");
        assert_eq!(b.uri, "https://cdn.example.com/b.tgz");
        assert_eq!(b.size, "");
        assert_eq!(b.created_at, "");
        assert_eq!(b.content_hash, "ffee");
    }

    #[test]
    fn empty_filename_rows_are_skipped() {
        let html = r#"<table id="right_scripts_show_script_attachments"><tbody>
            <tr><td data-column_name="Filename"><a href="/x">   </a></td></tr>
            <tr><td data-column_name="Filename">no anchor</td></tr>
            <tr><td>No attachments</td></tr>
        </tbody></table>"#;
        assert!(parse_attachment_fragment(html).is_empty());
    }

    #[test]
    fn rows_without_explicit_tbody() {
        let html = r#"<table id="right_scripts_show_script_attachments">
            <tr><td data-column_name="Filename"><a href="/f">f.bin</a></td></tr>
        </table>"#;
        let atts = parse_attachment_fragment(html);
        assert_eq!(atts.len(), 1);
        assert_eq!(atts[0].filename, "f.bin");
    }

    #[test]
    fn no_table_no_attachments() {
        assert!(parse_attachment_fragment("<p>Nothing here</p>").is_empty());
        assert!(parse_attachment_fragment("").is_empty());
    }
}
