//! Page geometry: measurement units and position/size accessors.
//!
//! Every positioned node carries `HPOS`/`VPOS`/`WIDTH`/`HEIGHT` attributes,
//! expressed in the document-level measurement unit. All consumers convert
//! through [`to_pixels`]; there is no second conversion path.

use crate::constants::{
    DEFAULT_DPI, HEIGHT_ATTR, HPOS_ATTR, UNIT_INCH1200, UNIT_MM10, UNIT_PIXEL, VPOS_ATTR,
    WIDTH_ATTR,
};
use crate::tree::Element;

/// Unit of the geometry attributes, declared per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeasurementUnit {
    /// Raw pixels of the scanned image.
    #[default]
    Pixel,
    /// Tenths of a millimeter.
    Mm10,
    /// 1/1200 of an inch.
    Inch1200,
}

impl MeasurementUnit {
    /// Parses the `MeasurementUnit` declaration value.
    pub fn parse(s: &str) -> Option<MeasurementUnit> {
        match s.trim() {
            UNIT_PIXEL => Some(MeasurementUnit::Pixel),
            UNIT_MM10 => Some(MeasurementUnit::Mm10),
            UNIT_INCH1200 => Some(MeasurementUnit::Inch1200),
            _ => None,
        }
    }

    /// Returns the declaration value for this unit.
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementUnit::Pixel => UNIT_PIXEL,
            MeasurementUnit::Mm10 => UNIT_MM10,
            MeasurementUnit::Inch1200 => UNIT_INCH1200,
        }
    }
}

/// Converts a geometry value to pixels at the given pixel density.
///
/// The shared conversion function for all geometry consumers. Pixel values
/// pass through unchanged regardless of `dpi`; see
/// [`DEFAULT_DPI`] for callers without scanner metadata.
pub fn to_pixels(value: f64, unit: MeasurementUnit, dpi: f64) -> f64 {
    match unit {
        MeasurementUnit::Pixel => value,
        // value/10 mm = value/254 inch
        MeasurementUnit::Mm10 => value / 254.0 * dpi,
        MeasurementUnit::Inch1200 => value / 1200.0 * dpi,
    }
}

/// Position and size of a node, in the document's measurement unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub hpos: f64,
    pub vpos: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Reads the geometry attributes of a positioned element.
    ///
    /// Returns `None` unless all four attributes are present and numeric.
    pub fn of(el: &Element) -> Option<Rect> {
        let get = |name: &str| el.attr(name)?.parse::<f64>().ok();
        Some(Rect {
            hpos: get(HPOS_ATTR)?,
            vpos: get(VPOS_ATTR)?,
            width: get(WIDTH_ATTR)?,
            height: get(HEIGHT_ATTR)?,
        })
    }

    /// Converts this rect to pixel space through [`to_pixels`].
    pub fn to_pixels(self, unit: MeasurementUnit, dpi: f64) -> Rect {
        Rect {
            hpos: to_pixels(self.hpos, unit, dpi),
            vpos: to_pixels(self.vpos, unit, dpi),
            width: to_pixels(self.width, unit, dpi),
            height: to_pixels(self.height, unit, dpi),
        }
    }
}
