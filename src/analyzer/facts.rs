//! Single-fact extractors
//!
//! Pure functions over a [`Document`]. Each walks the tree depth-first in
//! document order and never mutates it.

use crate::analyzer::model::HeadingCount;
use crate::document::{Document, NodeKind, NodeRef};

/// Marker returned when no doctype can be found or recognised
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Marker for the modern `<!DOCTYPE html>` form
pub const HTML5: &str = "HTML5";

/// Marker for an `html` doctype whose public identifier is not recognised
pub const UNKNOWN_DOCTYPE: &str = "HTML (Unknown Doctype)";

/// Known legacy public identifiers, most specific first
const LEGACY_DOCTYPES: &[(&str, Option<&str>, &str)] = &[
    ("XHTML 1.1", None, "XHTML 1.1"),
    ("XHTML 1.0", Some("STRICT"), "XHTML 1.0 Strict"),
    ("XHTML 1.0", Some("TRANSITIONAL"), "XHTML 1.0 Transitional"),
    ("XHTML 1.0", Some("FRAMESET"), "XHTML 1.0 Frameset"),
    ("HTML 4.01", Some("STRICT"), "HTML 4.01 Strict"),
    ("HTML 4.01", Some("TRANSITIONAL"), "HTML 4.01 Transitional"),
    ("HTML 4.01", Some("FRAMESET"), "HTML 4.01 Frameset"),
    ("HTML 3.2", None, "HTML 3.2"),
    ("HTML 2.0", None, "HTML 2.0"),
];

/// Detects the markup version from the first doctype in the document
///
/// # Examples
///
/// ```
/// use page_lens::analyzer::detect_html_version;
/// use page_lens::document::Document;
///
/// let doc = Document::parse("<!DOCTYPE html><html></html>");
/// assert_eq!(detect_html_version(&doc), "HTML5");
/// ```
pub fn detect_html_version(document: &Document) -> String {
    let Some((name, public_id, system_id)) = document.descendants().find_map(|node| {
        match node.kind() {
            NodeKind::Doctype {
                name,
                public_id,
                system_id,
            } => Some((name, public_id, system_id)),
            _ => None,
        }
    }) else {
        return UNKNOWN_VERSION.to_string();
    };

    let name = name.trim().to_ascii_lowercase();
    let public_id = public_id.trim();

    if name == "html" && public_id.is_empty() && system_id.trim().is_empty() {
        return HTML5.to_string();
    }

    let pid = public_id.to_ascii_uppercase();
    let legacy = LEGACY_DOCTYPES.iter().find(|(version, variant, _)| {
        pid.contains(version) && variant.map_or(true, |v| pid.contains(v))
    });

    match legacy {
        Some((_, _, label)) => label.to_string(),
        None if name == "html" => UNKNOWN_DOCTYPE.to_string(),
        None => UNKNOWN_VERSION.to_string(),
    }
}

/// Returns the text of the first `<title>` with a non-empty leading text
/// node, exactly as written, or an empty string
pub fn extract_title(document: &Document) -> String {
    document
        .descendants()
        .filter(|node| node.is_element("title"))
        .filter_map(|node| node.first_child().and_then(|child| child.text()))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Counts visible headings per level
///
/// Native `h1`..`h6` elements count at their own level. Other elements count
/// when they carry `role="heading"` and an `aria-level` between 1 and 6.
/// Elements marked `hidden` or `aria-hidden="true"` are skipped.
///
/// The result always has six entries, levels 1 through 6 in order.
pub fn count_headings(document: &Document) -> Vec<HeadingCount> {
    let mut counts = [0usize; 6];

    for node in document.descendants() {
        if let Some(level) = heading_level(&node) {
            counts[usize::from(level) - 1] += 1;
        }
    }

    counts
        .iter()
        .zip(1u8..)
        .map(|(&count, level)| HeadingCount { level, count })
        .collect()
}

fn heading_level(node: &NodeRef<'_>) -> Option<u8> {
    let tag = node.element_name()?;

    if is_hidden(node) {
        return None;
    }

    if let Some(level) = native_heading_level(tag) {
        return Some(level);
    }

    let is_heading_role = node
        .attr("role")
        .is_some_and(|role| role.trim().eq_ignore_ascii_case("heading"));
    if !is_heading_role {
        return None;
    }

    node.attr("aria-level")
        .and_then(|level| level.trim().parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

fn native_heading_level(tag: &str) -> Option<u8> {
    let digits = tag.strip_prefix('h').or_else(|| tag.strip_prefix('H'))?;
    digits
        .parse::<u8>()
        .ok()
        .filter(|level| (1..=6).contains(level))
}

fn is_hidden(node: &NodeRef<'_>) -> bool {
    if node.has_attr("hidden") {
        return true;
    }
    node.attr("aria-hidden").is_some_and(|value| {
        let value = value.trim();
        value.eq_ignore_ascii_case("true") || value == "1"
    })
}

/// Returns true if any `<form>` contains a password input
pub fn has_login_form(document: &Document) -> bool {
    document
        .descendants()
        .filter(|node| node.is_element("form"))
        .any(|form| contains_password_input(&form))
}

fn contains_password_input(form: &NodeRef<'_>) -> bool {
    form.descendants().any(|node| {
        node.is_element("input")
            && node
                .attr("type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("password"))
    })
}
