//! Immutable physical geometry of a label template.

use crate::error::TemplateError;
use labelsmith_types::{Size, mm_to_pt, px_to_mm};
use serde::{Deserialize, Serialize};

/// Margins from the layout edge to the print area, in millimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            bottom: mm,
            left: mm,
            right: mm,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Validated template geometry. Constructed once from its inputs (or probed
/// from artwork) and never mutated afterwards; every instance satisfies the
/// invariants `print <= layout` and `margins + print <= layout` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemplateGeometry {
    print: Size,
    layout: Size,
    margins: Margins,
    dpi: u32,
}

impl TemplateGeometry {
    /// Small tolerance so that `5 + 5 + 50 <= 60` style sums survive f32
    /// rounding.
    const EPSILON: f32 = 1e-4;

    pub fn new(
        print: Size,
        layout: Size,
        margins: Margins,
        dpi: u32,
    ) -> Result<Self, TemplateError> {
        for dim in [print.width, print.height, layout.width, layout.height] {
            if dim <= 0.0 {
                return Err(TemplateError::NonPositiveDimension(dim));
            }
        }
        for margin in [margins.top, margins.bottom, margins.left, margins.right] {
            if margin < 0.0 {
                return Err(TemplateError::NegativeMargin(margin));
            }
        }
        if dpi == 0 {
            return Err(TemplateError::ZeroDpi);
        }
        if print.width > layout.width + Self::EPSILON {
            return Err(TemplateError::PrintWidthExceedsLayout {
                print: print.width,
                layout: layout.width,
            });
        }
        if print.height > layout.height + Self::EPSILON {
            return Err(TemplateError::PrintHeightExceedsLayout {
                print: print.height,
                layout: layout.height,
            });
        }
        let h_margins = margins.left + margins.right;
        if h_margins + print.width > layout.width + Self::EPSILON {
            return Err(TemplateError::HorizontalOverflow {
                margins: h_margins,
                print: print.width,
                layout: layout.width,
            });
        }
        let v_margins = margins.top + margins.bottom;
        if v_margins + print.height > layout.height + Self::EPSILON {
            return Err(TemplateError::VerticalOverflow {
                margins: v_margins,
                print: print.height,
                layout: layout.height,
            });
        }
        Ok(Self {
            print,
            layout,
            margins,
            dpi,
        })
    }

    /// Geometry derived from artwork pixel dimensions: print and layout match
    /// the artwork at the given DPI and the margins are zero. This replaces
    /// the legacy detect-then-resave pattern with a single construction step.
    pub fn from_pixels(width_px: u32, height_px: u32, dpi: u32) -> Result<Self, TemplateError> {
        let size = Size::new(px_to_mm(width_px, dpi), px_to_mm(height_px, dpi));
        Self::new(size, size, Margins::zero(), dpi)
    }

    /// Print area in millimeters.
    pub fn print(&self) -> Size {
        self.print
    }

    /// Full page (layout) area in millimeters.
    pub fn layout(&self) -> Size {
        self.layout
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Page size in points; pages are sized to the layout area, not the
    /// print area.
    pub fn page_size_pt(&self) -> Size {
        Size::new(mm_to_pt(self.layout.width), mm_to_pt(self.layout.height))
    }
}
