//! Style table extraction and reference resolution.

use rustc_hash::FxHashMap;

use crate::constants::{FONT_FAMILY_ATTR, FONT_SIZE_ATTR, ID_ATTR, STYLES_TAG, TEXT_STYLE_TAG};
use crate::tree::Element;

/// A text style row from the document's style table.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
}

/// Flat mapping from style identifier to text style.
pub type StyleTable = FxHashMap<String, TextStyle>;

/// Builds the style table from the document's `Styles` section.
///
/// Rows without an `ID` are skipped; a repeated `ID` keeps the last row, as
/// the serialized table is a flat keyed list.
pub fn style_table(root: &Element) -> StyleTable {
    let mut table = StyleTable::default();
    if let Some(styles) = root.first_child(STYLES_TAG) {
        for row in styles.children_of(TEXT_STYLE_TAG) {
            if let Some(id) = row.attr(ID_ATTR) {
                table.insert(
                    id.to_string(),
                    TextStyle {
                        font_family: row.attr(FONT_FAMILY_ATTR).map(str::to_string),
                        font_size: row.attr(FONT_SIZE_ATTR).and_then(|v| v.parse().ok()),
                    },
                );
            }
        }
    }
    table
}

/// Resolves a space-separated style reference list against the table.
///
/// The first id found in the table wins; styles are not merged.
pub fn resolve_style<'a>(table: &'a StyleTable, refs: &str) -> Option<&'a TextStyle> {
    refs.split_whitespace().find_map(|id| table.get(id))
}
