//! Geometric primitives: rectangles, circles, highlights, blurs, connectors

use crate::model::{AnnotationFields, Point};
use crate::render::{
    color::{resolve_color, resolve_color_or},
    markup::{Attr, Fragment, Num, RenderContext, dash_attr},
};

pub const DEFAULT_RECT_SIZE: f64 = 100.0;
pub const DEFAULT_CIRCLE_RADIUS: f64 = 30.0;
pub const DEFAULT_HIGHLIGHT_OPACITY: f64 = 0.35;
pub const DEFAULT_BLUR_RADIUS: f64 = 10.0;
/// Flat fill under the blur filter
pub const BLUR_FILL: &str = "#9E9E9E";

/// Top-left anchored area shared by rect, highlight and blur
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x:      f64,
    pub y:      f64,
    pub width:  f64,
    pub height: f64,
}

impl Area {
    fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            x:      fields.x.unwrap_or(0.0),
            y:      fields.y.unwrap_or(0.0),
            width:  fields.width.unwrap_or(DEFAULT_RECT_SIZE).max(0.0),
            height: fields.height.unwrap_or(DEFAULT_RECT_SIZE).max(0.0),
        }
    }

    fn attrs(&self) -> String {
        format!(
            r#"x="{}" y="{}" width="{}" height="{}""#,
            Num(self.x),
            Num(self.y),
            Num(self.width),
            Num(self.height)
        )
    }
}

/// Optional fill shared by rect and circle outlines
fn fill_attrs(fill: Option<&str>, opacity: f64) -> String {
    match fill {
        Some(fill) if opacity < 1.0 => format!(r#"fill="{}" fill-opacity="{}""#, Attr(fill), Num(opacity)),
        Some(fill) => format!(r#"fill="{}""#, Attr(fill)),
        None => r#"fill="none""#.to_string(),
    }
}

fn optional_fill(fields: &AnnotationFields) -> Option<String> {
    fields
        .background
        .as_deref()
        .filter(|bg| !bg.trim().is_empty())
        .map(|bg| resolve_color(Some(bg)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectSpec {
    pub area:          Area,
    pub color:         String,
    pub stroke_width:  f64,
    pub fill:          Option<String>,
    pub opacity:       f64,
    pub corner_radius: f64,
    pub dashed:        bool,
    pub shadow:        bool,
}

impl RectSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            area:          Area::from_fields(fields),
            color:         resolve_color(fields.color.as_deref()),
            stroke_width:  fields.stroke_width.unwrap_or(3.0).abs(),
            fill:          optional_fill(fields),
            opacity:       fields.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
            corner_radius: fields.corner_radius.unwrap_or(0.0).max(0.0),
            dashed:        fields.is_dashed(),
            shadow:        fields.shadow.unwrap_or(false),
        }
    }
}

pub fn compile_rect(spec: &RectSpec, ctx: &mut RenderContext) -> Fragment {
    let (defs, filter) = ctx.optional_shadow(spec.shadow);
    let rx = if spec.corner_radius > 0.0 {
        format!(r#" rx="{}""#, Num(spec.corner_radius))
    } else {
        String::new()
    };
    let element = format!(
        r#"<rect {}{} {} stroke="{}" stroke-width="{}"{}{}/>"#,
        spec.area.attrs(),
        rx,
        fill_attrs(spec.fill.as_deref(), spec.opacity),
        Attr(&spec.color),
        Num(spec.stroke_width),
        dash_attr(spec.dashed, spec.stroke_width),
        filter
    );
    Fragment::new(defs, element)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleSpec {
    pub cx:           f64,
    pub cy:           f64,
    pub radius:       f64,
    pub color:        String,
    pub stroke_width: f64,
    pub fill:         Option<String>,
    pub opacity:      f64,
    pub dashed:       bool,
    pub shadow:       bool,
}

impl CircleSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            cx:           fields.x.unwrap_or(0.0),
            cy:           fields.y.unwrap_or(0.0),
            radius:       fields.radius.unwrap_or(DEFAULT_CIRCLE_RADIUS).abs(),
            color:        resolve_color(fields.color.as_deref()),
            stroke_width: fields.stroke_width.unwrap_or(3.0).abs(),
            fill:         optional_fill(fields),
            opacity:      fields.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
            dashed:       fields.is_dashed(),
            shadow:       fields.shadow.unwrap_or(false),
        }
    }
}

pub fn compile_circle(spec: &CircleSpec, ctx: &mut RenderContext) -> Fragment {
    let (defs, filter) = ctx.optional_shadow(spec.shadow);
    let element = format!(
        r#"<circle cx="{}" cy="{}" r="{}" {} stroke="{}" stroke-width="{}"{}{}/>"#,
        Num(spec.cx),
        Num(spec.cy),
        Num(spec.radius),
        fill_attrs(spec.fill.as_deref(), spec.opacity),
        Attr(&spec.color),
        Num(spec.stroke_width),
        dash_attr(spec.dashed, spec.stroke_width),
        filter
    );
    Fragment::new(defs, element)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSpec {
    pub area:          Area,
    pub color:         String,
    pub opacity:       f64,
    pub corner_radius: f64,
}

impl HighlightSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            area:          Area::from_fields(fields),
            color:         resolve_color_or(fields.color.as_deref(), "yellow"),
            opacity:       fields
                .opacity
                .unwrap_or(DEFAULT_HIGHLIGHT_OPACITY)
                .clamp(0.0, 1.0),
            corner_radius: fields.corner_radius.unwrap_or(0.0).max(0.0),
        }
    }
}

pub fn compile_highlight(spec: &HighlightSpec, _ctx: &mut RenderContext) -> Fragment {
    Fragment::element(format!(
        r#"<rect {} rx="{}" fill="{}" fill-opacity="{}"/>"#,
        spec.area.attrs(),
        Num(spec.corner_radius),
        Attr(&spec.color),
        Num(spec.opacity)
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlurSpec {
    pub area:          Area,
    /// Gaussian standard deviation
    pub radius:        f64,
    pub corner_radius: f64,
}

impl BlurSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            area:          Area::from_fields(fields),
            radius:        fields.radius.unwrap_or(DEFAULT_BLUR_RADIUS).abs(),
            corner_radius: fields.corner_radius.unwrap_or(0.0).max(0.0),
        }
    }
}

/// Blurred flat patch covering the area
///
/// The overlay never sees the screenshot pixels, so the redaction is an
/// opaque gray patch with softened edges rather than a blur of the content.
pub fn compile_blur(spec: &BlurSpec, ctx: &mut RenderContext) -> Fragment {
    let id = ctx.next_id("blur");
    let defs = format!(
        r#"<filter id="{}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{}"/></filter>"#,
        id,
        Num(spec.radius)
    );
    let element = format!(
        r#"<rect {} rx="{}" fill="{}" filter="url(#{})"/>"#,
        spec.area.attrs(),
        Num(spec.corner_radius),
        BLUR_FILL,
        id
    );
    Fragment::new(defs, element)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorSpec {
    pub from:         Point,
    pub to:           Point,
    pub color:        String,
    pub stroke_width: f64,
    pub dashed:       bool,
}

impl ConnectorSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            from:         fields.from.unwrap_or([0.0, 0.0]),
            to:           fields.to.unwrap_or([0.0, 0.0]),
            color:        resolve_color_or(fields.color.as_deref(), "gray"),
            stroke_width: fields.stroke_width.unwrap_or(2.0).abs(),
            dashed:       fields.is_dashed(),
        }
    }
}

pub fn compile_connector(spec: &ConnectorSpec, _ctx: &mut RenderContext) -> Fragment {
    Fragment::element(format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-linecap="round"{}/>"#,
        Num(spec.from[0]),
        Num(spec.from[1]),
        Num(spec.to[0]),
        Num(spec.to[1]),
        Attr(&spec.color),
        Num(spec.stroke_width),
        dash_attr(spec.dashed, spec.stroke_width)
    ))
}
