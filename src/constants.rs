//! ALTO vocabulary and reserved names used throughout alto-edit.

/// Reserved attribute carrying the synthetic node identity key.
///
/// `$` is not an XML NameStartChar, so no parsed document can collide with
/// this name. The key is attached by [`crate::ident::tag`] and must never
/// reach serialized output.
pub const NODE_ID_ATTR: &str = "$nodeId$";

/// Root element of an ALTO document.
pub const ALTO_TAG: &str = "alto";

/// Document metadata section.
pub const DESCRIPTION_TAG: &str = "Description";
/// Geometry unit declaration inside `Description`.
pub const MEASUREMENT_UNIT_TAG: &str = "MeasurementUnit";

/// Style table section.
pub const STYLES_TAG: &str = "Styles";
/// A single text style row.
pub const TEXT_STYLE_TAG: &str = "TextStyle";

/// Layout section holding the pages.
pub const LAYOUT_TAG: &str = "Layout";
/// A physical page.
pub const PAGE_TAG: &str = "Page";
/// The printable area of a page.
pub const PRINT_SPACE_TAG: &str = "PrintSpace";

/// Page margin containers. Margins can carry text blocks too.
pub const TOP_MARGIN_TAG: &str = "TopMargin";
pub const LEFT_MARGIN_TAG: &str = "LeftMargin";
pub const RIGHT_MARGIN_TAG: &str = "RightMargin";
pub const BOTTOM_MARGIN_TAG: &str = "BottomMargin";

/// Block (region) element names.
pub const TEXT_BLOCK_TAG: &str = "TextBlock";
pub const ILLUSTRATION_TAG: &str = "Illustration";
pub const GRAPHICAL_ELEMENT_TAG: &str = "GraphicalElement";
/// Composite region; may nest further `ComposedBlock`s to any depth.
pub const COMPOSED_BLOCK_TAG: &str = "ComposedBlock";

/// Line and token element names.
pub const TEXT_LINE_TAG: &str = "TextLine";
pub const STRING_TAG: &str = "String";
pub const SP_TAG: &str = "SP";
pub const HYP_TAG: &str = "HYP";

/// Attribute names.
pub const ID_ATTR: &str = "ID";
pub const CONTENT_ATTR: &str = "CONTENT";
pub const STYLEREFS_ATTR: &str = "STYLEREFS";
pub const SCHEMA_VERSION_ATTR: &str = "SCHEMAVERSION";
pub const XMLNS_ATTR: &str = "xmlns";
pub const FONT_FAMILY_ATTR: &str = "FONTFAMILY";
pub const FONT_SIZE_ATTR: &str = "FONTSIZE";
pub const HPOS_ATTR: &str = "HPOS";
pub const VPOS_ATTR: &str = "VPOS";
pub const WIDTH_ATTR: &str = "WIDTH";
pub const HEIGHT_ATTR: &str = "HEIGHT";

/// `MeasurementUnit` character content values.
pub const UNIT_PIXEL: &str = "pixel";
pub const UNIT_MM10: &str = "mm10";
pub const UNIT_INCH1200: &str = "inch1200";

/// Pixel density assumed when a caller converts physical units without
/// scanner metadata.
pub const DEFAULT_DPI: f64 = 300.0;
