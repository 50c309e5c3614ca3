//! Vector (SVG) background handling.
//!
//! The happy path walks the parsed SVG tree and re-emits its paths as scaled
//! PDF drawing commands, so the background stays resolution independent. Any
//! construct that cannot be expressed that way (gradients, patterns, embedded
//! rasters, text) aborts the walk and the caller falls back to rasterization.

use crate::element::ImageContent;
use crate::error::RenderError;
use labelsmith_template::TemplateGeometry;
use labelsmith_types::{Size, center_offset, fit_scale};
use printpdf::Pt;
use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::ops::Op;
use resvg::tiny_skia;
use resvg::usvg::{self, tiny_skia_path::PathSegment};

/// Resolution multiplier for the raster fallback.
const FALLBACK_MULTIPLIER: f32 = 3.0;

/// Subdivision steps when flattening quadratic/cubic curve segments.
const CURVE_STEPS: u32 = 8;

pub(crate) fn parse(bytes: &[u8]) -> Result<usvg::Tree, RenderError> {
    usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| RenderError::Vector(e.to_string()))
}

/// Maps SVG user space onto the page: uniform fit scale, centered, with the
/// Y axis flipped into PDF's bottom-left origin.
struct PageMap {
    scale: f32,
    off_x: f32,
    off_y: f32,
    page_h: f32,
}

impl PageMap {
    fn map(&self, transform: usvg::Transform, x: f32, y: f32) -> (f32, f32) {
        let ax = transform.sx * x + transform.kx * y + transform.tx;
        let ay = transform.ky * x + transform.sy * y + transform.ty;
        (
            self.off_x + ax * self.scale,
            self.page_h - (self.off_y + ay * self.scale),
        )
    }
}

/// Emits the SVG as drawing commands in page space.
pub(crate) fn vector_ops(
    tree: &usvg::Tree,
    geometry: &TemplateGeometry,
) -> Result<Vec<Op>, RenderError> {
    let page = geometry.page_size_pt();
    let svg_size = Size::new(tree.size().width(), tree.size().height());
    let scale = fit_scale(svg_size, page);
    let (off_x, off_y) = center_offset(svg_size, scale, page);
    let map = PageMap {
        scale,
        off_x,
        off_y,
        page_h: page.height,
    };

    let mut ops = Vec::new();
    walk(tree.root(), &map, &mut ops)?;
    Ok(ops)
}

fn walk(group: &usvg::Group, map: &PageMap, ops: &mut Vec<Op>) -> Result<(), RenderError> {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => walk(g, map, ops)?,
            usvg::Node::Path(p) => draw_path(p, map, ops)?,
            usvg::Node::Image(_) => {
                return Err(RenderError::VectorUnsupported("embedded raster image"));
            }
            usvg::Node::Text(_) => return Err(RenderError::VectorUnsupported("text element")),
        }
    }
    Ok(())
}

fn paint_color(paint: &usvg::Paint) -> Result<printpdf::color::Color, RenderError> {
    match paint {
        usvg::Paint::Color(c) => Ok(printpdf::color::Color::Rgb(printpdf::Rgb::new(
            c.red as f32 / 255.0,
            c.green as f32 / 255.0,
            c.blue as f32 / 255.0,
            None,
        ))),
        usvg::Paint::LinearGradient(_) | usvg::Paint::RadialGradient(_) => {
            Err(RenderError::VectorUnsupported("gradient paint"))
        }
        usvg::Paint::Pattern(_) => Err(RenderError::VectorUnsupported("pattern paint")),
    }
}

fn draw_path(path: &usvg::Path, map: &PageMap, ops: &mut Vec<Op>) -> Result<(), RenderError> {
    let fill = path.fill().map(|f| (paint_color(f.paint()), f.rule()));
    let stroke = path
        .stroke()
        .map(|s| (paint_color(s.paint()), s.width().get()));

    let (fill_color, winding) = match fill {
        Some((color, rule)) => (
            Some(color?),
            match rule {
                usvg::FillRule::NonZero => WindingOrder::NonZero,
                usvg::FillRule::EvenOdd => WindingOrder::EvenOdd,
            },
        ),
        None => (None, WindingOrder::EvenOdd),
    };
    let stroke_parts = match stroke {
        Some((color, width)) => Some((color?, width)),
        None => None,
    };
    if fill_color.is_none() && stroke_parts.is_none() {
        return Ok(());
    }

    let transform = path.abs_transform();
    let line_point = |x: f32, y: f32| {
        let (px, py) = map.map(transform, x, y);
        LinePoint {
            p: Point {
                x: Pt(px),
                y: Pt(py),
            },
            bezier: false,
        }
    };

    let mut rings: Vec<PolygonRing> = Vec::new();
    let mut points: Vec<LinePoint> = Vec::new();
    let mut last = (0.0f32, 0.0f32);
    let mut ring_start = last;

    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                if points.len() > 1 {
                    rings.push(PolygonRing {
                        points: std::mem::take(&mut points),
                    });
                } else {
                    points.clear();
                }
                points.push(line_point(p.x, p.y));
                last = (p.x, p.y);
                ring_start = last;
            }
            PathSegment::LineTo(p) => {
                points.push(line_point(p.x, p.y));
                last = (p.x, p.y);
            }
            PathSegment::QuadTo(c, p) => {
                for step in 1..=CURVE_STEPS {
                    let t = step as f32 / CURVE_STEPS as f32;
                    let mt = 1.0 - t;
                    let x = mt * mt * last.0 + 2.0 * mt * t * c.x + t * t * p.x;
                    let y = mt * mt * last.1 + 2.0 * mt * t * c.y + t * t * p.y;
                    points.push(line_point(x, y));
                }
                last = (p.x, p.y);
            }
            PathSegment::CubicTo(c1, c2, p) => {
                for step in 1..=CURVE_STEPS {
                    let t = step as f32 / CURVE_STEPS as f32;
                    let mt = 1.0 - t;
                    let x = mt * mt * mt * last.0
                        + 3.0 * mt * mt * t * c1.x
                        + 3.0 * mt * t * t * c2.x
                        + t * t * t * p.x;
                    let y = mt * mt * mt * last.1
                        + 3.0 * mt * mt * t * c1.y
                        + 3.0 * mt * t * t * c2.y
                        + t * t * t * p.y;
                    points.push(line_point(x, y));
                }
                last = (p.x, p.y);
            }
            PathSegment::Close => {
                points.push(line_point(ring_start.0, ring_start.1));
                last = ring_start;
            }
        }
    }
    if points.len() > 1 {
        rings.push(PolygonRing { points });
    }
    if rings.is_empty() {
        return Ok(());
    }

    let mode = match (&fill_color, &stroke_parts) {
        (Some(_), Some(_)) => PaintMode::FillStroke,
        (Some(_), None) => PaintMode::Fill,
        _ => PaintMode::Stroke,
    };
    if let Some(color) = fill_color {
        ops.push(Op::SetFillColor { col: color });
    }
    if let Some((color, width)) = stroke_parts {
        ops.push(Op::SetOutlineColor { col: color });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(width * map.scale),
        });
    }
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings,
            mode,
            winding_order: winding,
        },
    });
    Ok(())
}

/// Rasterizes the SVG at `FALLBACK_MULTIPLIER` times its native size and
/// composes the result like any raster background.
pub(crate) fn rasterize(
    tree: &usvg::Tree,
    geometry: &TemplateGeometry,
) -> Result<ImageContent, RenderError> {
    let width = (tree.size().width() * FALLBACK_MULTIPLIER).round().max(1.0) as u32;
    let height = (tree.size().height() * FALLBACK_MULTIPLIER).round().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Vector("pixmap allocation failed".to_string()))?;
    // White base so transparent regions match the page.
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(FALLBACK_MULTIPLIER, FALLBACK_MULTIPLIER),
        &mut pixmap.as_mut(),
    );
    let png = pixmap
        .encode_png()
        .map_err(|e| RenderError::Vector(e.to_string()))?;
    super::raster::compose(&png, geometry)
}
