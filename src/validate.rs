//! Structural validation.
//!
//! Validation never fails the call: a malformed-but-parseable tree produces
//! a report with `valid: false` and explanatory errors, so callers can keep
//! an incomplete document open for editing.

use log::debug;

use crate::constants::{ALTO_TAG, LAYOUT_TAG, PAGE_TAG, PRINT_SPACE_TAG};
use crate::tree::Element;

/// Result of a structural validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn ok() -> ValidationReport {
        ValidationReport {
            valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(error: String) -> ValidationReport {
        ValidationReport {
            valid: false,
            errors: vec![error],
        }
    }
}

/// Validates the required containment chain of a document tree.
///
/// Checks run in order and short-circuit at the first missing link, so the
/// report names exactly the first structural element that is absent. Known
/// major schema versions dispatch to their own check set; unknown versions
/// fall back to the base checks.
pub fn validate(root: &Element, version: Option<&str>) -> ValidationReport {
    match version {
        Some(v) if v.starts_with('2') => validate_v2(root),
        Some(v) if v.starts_with('3') => validate_v3(root),
        Some(v) if v.starts_with('4') => validate_v4(root),
        Some(v) => {
            debug!("unknown schema version {v:?}, using base checks");
            validate_base(root)
        }
        None => validate_base(root),
    }
}

// The v2-v4 schemas require nothing structural beyond the base chain.
fn validate_v2(root: &Element) -> ValidationReport {
    validate_base(root)
}

fn validate_v3(root: &Element) -> ValidationReport {
    validate_base(root)
}

fn validate_v4(root: &Element) -> ValidationReport {
    validate_base(root)
}

fn validate_base(root: &Element) -> ValidationReport {
    if root.name() != ALTO_TAG {
        return ValidationReport::fail(format!(
            "missing <{ALTO_TAG}> root element (found <{}>)",
            root.name()
        ));
    }

    let Some(layout) = root.first_child(LAYOUT_TAG) else {
        return ValidationReport::fail(format!("missing <{LAYOUT_TAG}> element"));
    };

    let pages = layout.children_of(PAGE_TAG);
    if pages.is_empty() {
        return ValidationReport::fail(format!(
            "missing <{PAGE_TAG}> element: the layout holds no pages"
        ));
    }

    for (i, page) in pages.iter().enumerate() {
        if page.first_child(PRINT_SPACE_TAG).is_none() {
            return ValidationReport::fail(format!(
                "missing <{PRINT_SPACE_TAG}> element on page {}",
                i + 1
            ));
        }
    }

    ValidationReport::ok()
}
