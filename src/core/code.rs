//! # Composite Codes
//!
//! A composite code is the ordered list of segments chosen along a path,
//! joined with [`SEPARATOR`]:
//!
//! ```text
//! NZ . 014 . 1898 . ~errors
//! └┬┘  └┬┘   └┬─┘   └──┬──┘
//! root series year  side-category
//! ```
//!
//! Side-category segments start with [`SIDE_MARKER`]; linear segments never
//! do, so the two can not produce the same code.
//!
//! Everything here is pure. Segments are canonicalised once, when they are
//! appended, so every consumer of a code sees the same value.

use crate::catalogue::CatalogueOption;
use crate::core::step::{SideCategory, StepKind};

pub const SEPARATOR: char = '.';

/// Leads every side-category segment.
pub const SIDE_MARKER: char = '~';

/// Stands in for a separator that appears inside a provider token.
const SEPARATOR_SUBSTITUTE: char = ',';

/// Stands in for a side marker that leads a provider token.
const SIDE_MARKER_SUBSTITUTE: char = '-';

/// Canonical form of a raw provider token for a step of `kind`.
///
/// Missing, blank and literal `"null"` tokens become the kind's placeholder.
/// Embedded separators are replaced so the token stays a single segment, and
/// a leading side marker is replaced so it can not pass for a side-category.
pub fn canonical_segment(kind: StepKind, raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return kind.placeholder_segment().to_string();
    }
    let segment = trimmed.replace(SEPARATOR, &SEPARATOR_SUBSTITUTE.to_string());
    match segment.strip_prefix(SIDE_MARKER) {
        Some(rest) => format!("{SIDE_MARKER_SUBSTITUTE}{rest}"),
        None => segment,
    }
}

/// The segment that opens `category`.
pub fn side_segment(category: SideCategory) -> String {
    format!("{SIDE_MARKER}{}", category.slug())
}

/// The side-category a segment opens, if it is a side-category segment.
pub fn parse_side_segment(segment: &str) -> Option<SideCategory> {
    segment
        .strip_prefix(SIDE_MARKER)
        .and_then(SideCategory::from_slug)
}

/// Appends an already canonical segment to `parent`.
pub fn append_segment(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}{SEPARATOR}{segment}")
    }
}

/// The code reached by choosing `option` as a step of `kind` beneath `parent`.
pub fn build_code(parent: &str, kind: StepKind, option: &CatalogueOption) -> String {
    append_segment(parent, &canonical_segment(kind, option.segment.as_deref()))
}

/// Splits a code into its segments. The empty code has none.
pub fn segments(code: &str) -> Vec<&str> {
    if code.is_empty() {
        Vec::new()
    } else {
        code.split(SEPARATOR).collect()
    }
}

/// Rebuilds a code from its segments.
pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

pub fn last_segment(code: &str) -> Option<&str> {
    if code.is_empty() {
        None
    } else {
        code.rsplit(SEPARATOR).next()
    }
}

/// The code one step up, or `None` for a root code.
pub fn parent_code(code: &str) -> Option<&str> {
    code.rfind(SEPARATOR).map(|pos| &code[..pos])
}

/// True when `child` is `parent` extended by exactly one non-empty segment.
pub fn is_child_code(parent: &str, child: &str) -> bool {
    if parent.is_empty() {
        return is_root_code(child);
    }
    child
        .strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
        .is_some_and(|segment| !segment.is_empty() && !segment.contains(SEPARATOR))
}

/// A root code is exactly one non-empty segment.
pub fn is_root_code(code: &str) -> bool {
    !code.is_empty() && !code.contains(SEPARATOR)
}
