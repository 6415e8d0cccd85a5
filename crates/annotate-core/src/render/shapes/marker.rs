//! Numbered step markers

use crate::model::AnnotationFields;
use crate::render::{
    color::{GRADIENT_DARKEN_DELTA, darken, resolve_color},
    markup::{Attr, Fragment, Num, RenderContext},
};

/// Default marker diameter
pub const DEFAULT_SIZE: f64 = 32.0;

/// Marker render style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Circle with a top-to-bottom gradient
    Filled,
    /// White circle with a colored ring and colored digits
    Outline,
    /// Pill that widens with the digit count
    Badge,
}

impl MarkerStyle {
    /// Parses a style name; anything unrecognized is `Filled`
    pub fn parse(style: Option<&str>) -> MarkerStyle {
        match style.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("outline" | "outlined") => MarkerStyle::Outline,
            Some("badge" | "pill") => MarkerStyle::Badge,
            _ => MarkerStyle::Filled,
        }
    }
}

/// Resolved marker parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub x:         f64,
    pub y:         f64,
    pub number:    u32,
    pub size:      f64,
    pub font_size: f64,
    pub color:     String,
    pub style:     MarkerStyle,
    pub shadow:    bool,
}

impl MarkerSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        let size = fields.size.unwrap_or(DEFAULT_SIZE).abs().max(1.0);
        Self {
            x: fields.x.unwrap_or(0.0),
            y: fields.y.unwrap_or(0.0),
            number: fields.number.unwrap_or(1),
            size,
            font_size: fields.font_size.unwrap_or(size * 0.5),
            color: resolve_color(fields.color.as_deref()),
            style: MarkerStyle::parse(fields.style.as_deref()),
            shadow: fields.shadow.unwrap_or(false),
        }
    }
}

/// Per-character width used to size badge pills
///
/// Two or more digits pack tighter than a lone digit.
pub fn badge_char_width(digits: usize, font_size: f64) -> f64 {
    let factor = if digits >= 2 { 0.55 } else { 0.7 };
    factor * font_size
}

/// Pill width for a badge marker, never narrower than its height
pub fn badge_width(number: u32, size: f64, font_size: f64) -> f64 {
    let digits = number.to_string().len();
    (digits as f64 * badge_char_width(digits, font_size) + font_size).max(size)
}

pub fn compile(spec: &MarkerSpec, ctx: &mut RenderContext) -> Fragment {
    let MarkerSpec {
        x,
        y,
        number,
        size,
        font_size,
        ..
    } = *spec;
    let radius = size / 2.0;
    let (mut defs, filter) = ctx.optional_shadow(spec.shadow);

    let (shape, text_color) = match spec.style {
        MarkerStyle::Filled => {
            let gradient_id = ctx.next_id("grad");
            defs.push_str(&format!(
                r#"<linearGradient id="{}" x1="0" y1="0" x2="0" y2="1"><stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/></linearGradient>"#,
                gradient_id,
                Attr(&spec.color),
                Attr(&darken(&spec.color, GRADIENT_DARKEN_DELTA))
            ));
            (
                format!(
                    r##"<circle cx="{}" cy="{}" r="{}" fill="url(#{})" stroke="#FFFFFF" stroke-width="2"/>"##,
                    Num(x),
                    Num(y),
                    Num(radius),
                    gradient_id
                ),
                "#FFFFFF".to_string(),
            )
        }
        MarkerStyle::Outline => {
            let ring = (size / 10.0).max(2.0);
            (
                format!(
                    r##"<circle cx="{}" cy="{}" r="{}" fill="#FFFFFF" stroke="{}" stroke-width="{}"/>"##,
                    Num(x),
                    Num(y),
                    Num(radius - ring / 2.0),
                    Attr(&spec.color),
                    Num(ring)
                ),
                spec.color.clone(),
            )
        }
        MarkerStyle::Badge => {
            let width = badge_width(number, size, font_size);
            (
                format!(
                    r##"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="#FFFFFF" stroke-width="2"/>"##,
                    Num(x - width / 2.0),
                    Num(y - radius),
                    Num(width),
                    Num(size),
                    Num(radius),
                    Attr(&spec.color)
                ),
                "#FFFFFF".to_string(),
            )
        }
    };

    let element = format!(
        r#"<g{}>{}<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="{}" font-weight="bold" fill="{}">{}</text></g>"#,
        filter,
        shape,
        Num(x),
        Num(y + font_size * 0.35),
        ctx.font_family(),
        Num(font_size),
        Attr(&text_color),
        number
    );

    Fragment::new(defs, element)
}
