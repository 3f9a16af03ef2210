//! Record extraction from the two remote document shapes.
//!
//! Extraction never fails on missing data: absent fields become empty strings
//! (or 0 for numeric fields). Only a document that cannot be parsed at all is
//! an error, and only for the XML listing.

mod attachments;
mod listing;

pub use attachments::{extract_attachments, parse_attachment_fragment, ATTACHMENT_TABLE_ID};
pub use listing::{extract_resources, parse_listing};

/// Integer prefix of `s` after trimming, the way a lenient `to_i` reads it:
/// optional sign followed by digits; anything else (or overflow) yields 0.
pub(crate) fn leading_int(s: &str) -> i64 {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => 0,
    }
}
