use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

lazy_static! {
    // Canonical hyphenated UUID text, the form the store hands out.
    static ref DOCUMENT_ID_REGEX: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
}

/// Returns `true` if `raw` has the store's identifier format.
///
/// This is a format check only; it says nothing about whether a document with
/// that id exists.
pub fn is_valid_id(raw: &str) -> bool {
    DOCUMENT_ID_REGEX.is_match(raw)
}

/// Parses a path segment into a document id, or `None` if it is malformed.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    if !is_valid_id(raw) {
        return None;
    }
    Uuid::parse_str(raw).ok()
}
