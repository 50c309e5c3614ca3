//! PDF document assembly.
//!
//! One instance per generation run. Pages are appended one at a time from
//! positioned elements; the prepared background is replayed on every page.
//! Raster backgrounds are registered as a single XObject and reused, so the
//! artwork bytes land in the file once regardless of page count.

use crate::background::PageBackground;
use crate::element::{ElementContent, ImageContent, PositionedElement, TextBlock};
use crate::error::RenderError;
use crate::text::{aligned_x, measure_text_width};
use labelsmith_template::TemplateGeometry;
use printpdf::matrix::TextMatrix;
use printpdf::ops::Op;
use printpdf::text::TextItem;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{BuiltinFont, Layer, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, XObjectId};
use std::io;

/// Fraction of the font size between the top of the line box and the
/// baseline.
const BASELINE_FACTOR: f32 = 0.8;

pub struct LabelDocumentRenderer {
    document: PdfDocument,
    geometry: TemplateGeometry,
    page_width_pt: f32,
    page_height_pt: f32,
    /// Per-page ops replaying the background, built once up front.
    background_ops: Vec<Op>,
}

impl LabelDocumentRenderer {
    pub fn new(
        title: &str,
        geometry: &TemplateGeometry,
        background: &PageBackground,
    ) -> Result<Self, RenderError> {
        let mut document = PdfDocument::new(title);
        let page = geometry.page_size_pt();

        let background_ops = match background {
            PageBackground::None => Vec::new(),
            PageBackground::Vector(ops) => ops.clone(),
            PageBackground::Raster(image) => {
                let (xobj_id, dims) = register_image(&mut document, image)?;
                vec![Op::UseXobject {
                    id: xobj_id,
                    transform: XObjectTransform {
                        translate_x: Some(Pt(0.0)),
                        translate_y: Some(Pt(0.0)),
                        scale_x: Some(page.width / dims.0 as f32),
                        scale_y: Some(page.height / dims.1 as f32),
                        rotate: None,
                        dpi: Some(72.0),
                    },
                }]
            }
        };

        Ok(Self {
            document,
            geometry: geometry.clone(),
            page_width_pt: page.width,
            page_height_pt: page.height,
            background_ops,
        })
    }

    pub fn page_count(&self) -> usize {
        self.document.pages.len()
    }

    /// Appends one page built from `elements`, background first.
    pub fn render_page(&mut self, elements: &[PositionedElement]) -> Result<(), RenderError> {
        let mut page_ops = PageOps::new(self.page_height_pt);
        for element in elements {
            match &element.content {
                ElementContent::Text(text) => page_ops.write_text(text, element),
                ElementContent::Image(image) => {
                    let placed = register_image(&mut self.document, image)?;
                    page_ops.place_image(placed, element, self.geometry.dpi());
                }
            }
        }

        let page_num = self.document.pages.len() + 1;
        let layer = Layer::new(&format!("Page {page_num} Layer 1"));
        let layer_id = self.document.add_layer(&layer);

        let mut ops = vec![Op::BeginLayer { layer_id }];
        ops.extend(self.background_ops.iter().cloned());
        ops.extend(page_ops.into_ops());

        let width_mm = Mm::from(Pt(self.page_width_pt));
        let height_mm = Mm::from(Pt(self.page_height_pt));
        self.document.pages.push(PdfPage::new(width_mm, height_mm, ops));
        Ok(())
    }

    pub fn finalize<W: io::Write>(self, writer: &mut W) -> Result<(), RenderError> {
        let mut warnings = Vec::new();
        self.document
            .save_writer(writer, &PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("PDF writer reported {} warnings", warnings.len());
        }
        Ok(())
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.finalize(&mut bytes)?;
        Ok(bytes)
    }
}

fn register_image(
    document: &mut PdfDocument,
    image: &ImageContent,
) -> Result<(XObjectId, (u32, u32)), RenderError> {
    let mut warnings = Vec::new();
    let raw = printpdf::image::RawImage::decode_from_bytes(&image.png, &mut warnings)
        .map_err(|e| RenderError::Pdf(format!("failed to decode image content: {e}")))?;
    let dims = (raw.width as u32, raw.height as u32);
    let xobj_id = XObjectId::new();
    document
        .resources
        .xobjects
        .map
        .insert(xobj_id.clone(), XObject::Image(raw));
    Ok((xobj_id, dims))
}

fn builtin_font(family: &str, bold: bool, italic: bool) -> BuiltinFont {
    let family = family.to_ascii_lowercase();
    if family.contains("times") {
        match (bold, italic) {
            (true, true) => BuiltinFont::TimesBoldItalic,
            (true, false) => BuiltinFont::TimesBold,
            (false, true) => BuiltinFont::TimesItalic,
            (false, false) => BuiltinFont::TimesRoman,
        }
    } else if family.contains("courier") {
        match (bold, italic) {
            (true, true) => BuiltinFont::CourierBoldOblique,
            (true, false) => BuiltinFont::CourierBold,
            (false, true) => BuiltinFont::CourierOblique,
            (false, false) => BuiltinFont::Courier,
        }
    } else {
        match (bold, italic) {
            (true, true) => BuiltinFont::HelveticaBoldOblique,
            (true, false) => BuiltinFont::HelveticaBold,
            (false, true) => BuiltinFont::HelveticaOblique,
            (false, false) => BuiltinFont::Helvetica,
        }
    }
}

/// Op accumulator for a single page. Tracks text-section and font state so
/// consecutive text elements don't repeat setup ops.
struct PageOps {
    page_height_pt: f32,
    ops: Vec<Op>,
    is_text_section_open: bool,
    current_font: Option<(BuiltinFont, f32)>,
    fill_color_set: bool,
}

impl PageOps {
    fn new(page_height_pt: f32) -> Self {
        Self {
            page_height_pt,
            ops: Vec::new(),
            is_text_section_open: false,
            current_font: None,
            fill_color_set: false,
        }
    }

    fn into_ops(mut self) -> Vec<Op> {
        self.close_text_section_if_open();
        self.ops
    }

    fn close_text_section_if_open(&mut self) {
        if self.is_text_section_open {
            self.ops.push(Op::EndTextSection);
            self.is_text_section_open = false;
        }
    }

    fn write_text(&mut self, text: &TextBlock, positioned: &PositionedElement) {
        if text.content.is_empty() {
            return;
        }
        let font = builtin_font(&text.font_family, text.bold, text.italic);

        if !self.is_text_section_open {
            self.ops.push(Op::StartTextSection);
            self.is_text_section_open = true;
        }
        if !self.fill_color_set {
            self.ops.push(Op::SetFillColor {
                col: printpdf::color::Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
            });
            self.fill_color_set = true;
        }
        if self.current_font != Some((font, text.font_size)) {
            self.ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(text.font_size),
                font,
            });
            self.current_font = Some((font, text.font_size));
        }

        let text_width = measure_text_width(&text.content, text.font_size);
        let x = aligned_x(positioned.x, positioned.width, text_width, text.alignment);
        let baseline_y = positioned.y + text.font_size * BASELINE_FACTOR;
        let pdf_y = self.page_height_pt - baseline_y;

        self.ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(x), Pt(pdf_y)),
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.content.clone())],
            font,
        });
    }

    fn place_image(
        &mut self,
        (xobj_id, dims): (XObjectId, (u32, u32)),
        positioned: &PositionedElement,
        dpi: u32,
    ) {
        self.close_text_section_if_open();
        // Without a declared box the image is placed at its native size,
        // reading its pixels at the template DPI.
        let px_to_pt = 72.0 / dpi as f32;
        let width = positioned.width.unwrap_or(dims.0 as f32 * px_to_pt);
        let height = positioned.height.unwrap_or(dims.1 as f32 * px_to_pt);
        let pdf_y = self.page_height_pt - (positioned.y + height);

        self.ops.push(Op::UseXobject {
            id: xobj_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(positioned.x)),
                translate_y: Some(Pt(pdf_y)),
                scale_x: Some(width / dims.0 as f32),
                scale_y: Some(height / dims.1 as f32),
                rotate: None,
                dpi: Some(72.0),
            },
        });
    }
}
