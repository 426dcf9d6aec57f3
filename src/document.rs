//! Document wrapper and layout navigation.
//!
//! A [`Document`] owns one parsed, identity-tagged element tree plus the
//! schema version detected at parse time. Mutation never happens in place:
//! the editing API in [`crate::edit`] returns new `Document` values and the
//! caller drops or keeps snapshots as it sees fit.

use crate::constants::{
    ALTO_TAG, COMPOSED_BLOCK_TAG, DESCRIPTION_TAG, GRAPHICAL_ELEMENT_TAG, ILLUSTRATION_TAG,
    LAYOUT_TAG, MEASUREMENT_UNIT_TAG, PAGE_TAG, PRINT_SPACE_TAG, SCHEMA_VERSION_ATTR,
    TEXT_BLOCK_TAG, XMLNS_ATTR,
};
use crate::error::Result;
use crate::geometry::MeasurementUnit;
use crate::ident;
use crate::styles::{self, StyleTable};
use crate::tree::Element;
use crate::validate::{self, ValidationReport};
use crate::xml;

/// Kinds of block (region) containers. `Composed` blocks may nest further
/// blocks of any kind, including other `Composed` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    Illustration,
    Graphic,
    Composed,
}

impl BlockKind {
    /// Classifies a block element name. Returns `None` for non-block names.
    pub fn from_name(name: &str) -> Option<BlockKind> {
        match name {
            TEXT_BLOCK_TAG => Some(BlockKind::Text),
            ILLUSTRATION_TAG => Some(BlockKind::Illustration),
            GRAPHICAL_ELEMENT_TAG => Some(BlockKind::Graphic),
            COMPOSED_BLOCK_TAG => Some(BlockKind::Composed),
            _ => None,
        }
    }

    /// Returns the element name for this block kind.
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Text => TEXT_BLOCK_TAG,
            BlockKind::Illustration => ILLUSTRATION_TAG,
            BlockKind::Graphic => GRAPHICAL_ELEMENT_TAG,
            BlockKind::Composed => COMPOSED_BLOCK_TAG,
        }
    }
}

/// An in-memory document: the root element tree plus the schema version
/// detected from the root element. `None` means legacy/unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
    pub schema_version: Option<String>,
}

impl Document {
    /// Parses markup text into a tagged document.
    ///
    /// Fails only for malformed markup; structurally incomplete documents
    /// parse fine and report their problems through [`Document::validation`].
    pub fn parse(text: &str) -> Result<Document> {
        let root = xml::parse_str(text)?;
        let schema_version = detect_version(&root);
        Ok(Document {
            root: ident::tag(root),
            schema_version,
        })
    }

    /// Serializes the document back to markup text.
    ///
    /// Synthetic identity keys are stripped from a working copy first; the
    /// document itself keeps its keys.
    pub fn to_xml(&self) -> Result<String> {
        xml::serialize(&ident::untag(self.root.clone()))
    }

    /// Serializes with indentation.
    pub fn to_xml_pretty(&self) -> Result<String> {
        xml::serialize_pretty(&ident::untag(self.root.clone()))
    }

    /// Runs the structural validator against the current tree.
    pub fn validation(&self) -> ValidationReport {
        validate::validate(&self.root, self.schema_version.as_deref())
    }

    /// Extracts the style table. Recomputed from the tree on each call; the
    /// result is a snapshot, read-only to consumers.
    pub fn styles(&self) -> StyleTable {
        styles::style_table(&self.root)
    }

    /// Returns the document-level measurement unit (default: pixels).
    pub fn measurement_unit(&self) -> MeasurementUnit {
        self.root
            .first_child(DESCRIPTION_TAG)
            .and_then(|d| d.first_child(MEASUREMENT_UNIT_TAG))
            .and_then(|u| u.text())
            .and_then(MeasurementUnit::parse)
            .unwrap_or_default()
    }

    /// Returns the pages of the layout, in document order.
    pub fn pages(&self) -> &[Element] {
        self.root
            .first_child(LAYOUT_TAG)
            .map_or(&[], |layout| layout.children_of(PAGE_TAG))
    }

    /// Returns the print area of the given page, if present.
    pub fn print_space(&self, page: usize) -> Option<&Element> {
        self.pages().get(page)?.first_child(PRINT_SPACE_TAG)
    }
}

/// Best-effort schema version detection from the root element.
///
/// Prefers the explicit version attribute; falls back to the `ns-v<N>#`
/// suffix convention of the default namespace. Absence is a representable
/// state, not an error.
fn detect_version(root: &Element) -> Option<String> {
    if root.name() != ALTO_TAG {
        return None;
    }
    if let Some(version) = root.attr(SCHEMA_VERSION_ATTR) {
        return Some(version.to_string());
    }
    root.attr(XMLNS_ATTR).and_then(version_from_namespace)
}

fn version_from_namespace(ns: &str) -> Option<String> {
    let rest = &ns[ns.rfind("ns-v")? + 4..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}
