//! Speech-bubble callouts
//!
//! The anchor (`x`, `y`) is where the tail points; the box is laid out on
//! the opposite side of the tail.

use crate::model::AnnotationFields;
use crate::render::{
    color::{contrasting_text_color, resolve_color, resolve_color_or},
    markup::{Attr, Fragment, Num, RenderContext, escape_xml},
};

pub const DEFAULT_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_CORNER_RADIUS: f64 = 8.0;
const PADDING: f64 = 10.0;
const LINE_HEIGHT: f64 = 1.4;
const CHAR_WIDTH: f64 = 0.6;
const TAIL_LENGTH: f64 = 12.0;
const TAIL_HALF_WIDTH: f64 = 8.0;

/// Side of the box the tail leaves from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Top,
    Bottom,
    Left,
    Right,
}

impl Pointer {
    /// Parses a pointer side; unknown values fall back to `Bottom`
    pub fn parse(pointer: Option<&str>) -> Pointer {
        match pointer.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("top") => Pointer::Top,
            Some("left") => Pointer::Left,
            Some("right") => Pointer::Right,
            _ => Pointer::Bottom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalloutSpec {
    pub x:             f64,
    pub y:             f64,
    pub lines:         Vec<String>,
    pub pointer:       Pointer,
    pub font_size:     f64,
    pub width:         Option<f64>,
    pub border:        String,
    pub background:    String,
    pub corner_radius: f64,
    pub stroke_width:  f64,
    pub shadow:        bool,
}

impl CalloutSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        let text = fields.text.as_deref().unwrap_or_default();
        Self {
            x:             fields.x.unwrap_or(0.0),
            y:             fields.y.unwrap_or(0.0),
            lines:         text.split('\n').map(|line| line.trim_end_matches('\r').to_string()).collect(),
            pointer:       Pointer::parse(fields.pointer.as_deref()),
            font_size:     fields.font_size.unwrap_or(DEFAULT_FONT_SIZE).abs().max(1.0),
            width:         fields.width.filter(|w| *w > 0.0),
            border:        resolve_color(fields.color.as_deref()),
            background:    resolve_color_or(fields.background.as_deref(), "white"),
            corner_radius: fields.corner_radius.unwrap_or(DEFAULT_CORNER_RADIUS).max(0.0),
            stroke_width:  fields.stroke_width.unwrap_or(2.0).abs(),
            shadow:        fields.shadow.unwrap_or(false),
        }
    }

    /// Box size derived from the text, honoring an explicit width
    pub fn box_size(&self) -> (f64, f64) {
        let longest = self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let auto_width = longest as f64 * self.font_size * CHAR_WIDTH + PADDING * 2.0;
        let width = self.width.unwrap_or(auto_width);
        let height = self.lines.len().max(1) as f64 * self.font_size * LINE_HEIGHT + PADDING * 2.0;
        (width, height)
    }

    /// Top-left corner of the box
    fn box_origin(&self, width: f64, height: f64) -> (f64, f64) {
        match self.pointer {
            Pointer::Bottom => (self.x - width / 2.0, self.y - TAIL_LENGTH - height),
            Pointer::Top => (self.x - width / 2.0, self.y + TAIL_LENGTH),
            Pointer::Left => (self.x + TAIL_LENGTH, self.y - height / 2.0),
            Pointer::Right => (self.x - TAIL_LENGTH - width, self.y - height / 2.0),
        }
    }

    /// Tail triangle: anchor tip plus two base points on the box edge
    fn tail_points(&self) -> [(f64, f64); 3] {
        let (x, y) = (self.x, self.y);
        let (w, l) = (TAIL_HALF_WIDTH, TAIL_LENGTH);
        // base points reach one unit into the box to hide the border seam
        match self.pointer {
            Pointer::Bottom => [(x, y), (x - w, y - l - 1.0), (x + w, y - l - 1.0)],
            Pointer::Top => [(x, y), (x - w, y + l + 1.0), (x + w, y + l + 1.0)],
            Pointer::Left => [(x, y), (x + l + 1.0, y - w), (x + l + 1.0, y + w)],
            Pointer::Right => [(x, y), (x - l - 1.0, y - w), (x - l - 1.0, y + w)],
        }
    }
}

pub fn compile(spec: &CalloutSpec, ctx: &mut RenderContext) -> Fragment {
    let (defs, filter) = ctx.optional_shadow(spec.shadow);
    let (width, height) = spec.box_size();
    let (bx, by) = spec.box_origin(width, height);
    let text_color = contrasting_text_color(&spec.background);

    let tail = spec
        .tail_points()
        .iter()
        .map(|(px, py)| format!("{},{}", Num(*px), Num(*py)))
        .collect::<Vec<_>>()
        .join(" ");

    let line_height = spec.font_size * LINE_HEIGHT;
    let tspans: String = spec
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let baseline = by + PADDING + line_height * i as f64 + line_height / 2.0 + spec.font_size * 0.35;
            format!(
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                Num(bx + PADDING),
                Num(baseline),
                escape_xml(line)
            )
        })
        .collect();

    let element = format!(
        concat!(
            r#"<g{}>"#,
            r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            r#"<text font-family="{}" font-size="{}" fill="{}">{}</text>"#,
            r#"</g>"#
        ),
        filter,
        tail,
        Attr(&spec.background),
        Attr(&spec.border),
        Num(spec.stroke_width),
        Num(bx),
        Num(by),
        Num(width),
        Num(height),
        Num(spec.corner_radius),
        Attr(&spec.background),
        Attr(&spec.border),
        Num(spec.stroke_width),
        ctx.font_family(),
        Num(spec.font_size),
        text_color,
        tspans
    );

    Fragment::new(defs, element)
}
