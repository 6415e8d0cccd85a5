//! Status icons: a colored disc with a white glyph

use crate::model::AnnotationFields;
use crate::render::{
    color::resolve_color_or,
    markup::{Attr, Fragment, Num, RenderContext},
};

pub const DEFAULT_SIZE: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Check,
    Cross,
    Warning,
    Info,
    Question,
}

impl Glyph {
    /// Parses a glyph name; unknown names render as `Info`
    pub fn parse(name: Option<&str>) -> Glyph {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("check" | "checkmark" | "ok") => Glyph::Check,
            Some("cross" | "x" | "error") => Glyph::Cross,
            Some("warning" | "warn") => Glyph::Warning,
            Some("question" | "help") => Glyph::Question,
            _ => Glyph::Info,
        }
    }

    /// Palette color used when the caller gives none
    pub fn default_color(self) -> &'static str {
        match self {
            Glyph::Check => "green",
            Glyph::Cross => "red",
            Glyph::Warning => "orange",
            Glyph::Info => "blue",
            Glyph::Question => "purple",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    pub x:      f64,
    pub y:      f64,
    pub glyph:  Glyph,
    pub size:   f64,
    pub color:  String,
    pub shadow: bool,
}

impl IconSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        let glyph = Glyph::parse(fields.icon.as_deref());
        Self {
            x: fields.x.unwrap_or(0.0),
            y: fields.y.unwrap_or(0.0),
            glyph,
            size: fields.size.unwrap_or(DEFAULT_SIZE).abs().max(1.0),
            color: resolve_color_or(fields.color.as_deref(), glyph.default_color()),
            shadow: fields.shadow.unwrap_or(false),
        }
    }
}

/// Glyph strokes in a unit box centered on the origin, scaled by `r`
fn glyph_markup(glyph: Glyph, x: f64, y: f64, r: f64) -> String {
    let p = |dx: f64, dy: f64| format!("{},{}", Num(x + dx * r), Num(y + dy * r));
    let stroke = format!(
        r##"fill="none" stroke="#FFFFFF" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""##,
        Num((r * 0.18).max(1.5))
    );
    let dot = |dy: f64| {
        format!(
            r##"<circle cx="{}" cy="{}" r="{}" fill="#FFFFFF"/>"##,
            Num(x),
            Num(y + dy * r),
            Num((r * 0.11).max(1.0))
        )
    };

    match glyph {
        Glyph::Check => format!(
            r#"<path d="M{} L{} L{}" {}/>"#,
            p(-0.45, 0.0),
            p(-0.12, 0.35),
            p(0.45, -0.3),
            stroke
        ),
        Glyph::Cross => format!(
            r#"<path d="M{} L{} M{} L{}" {}/>"#,
            p(-0.35, -0.35),
            p(0.35, 0.35),
            p(0.35, -0.35),
            p(-0.35, 0.35),
            stroke
        ),
        Glyph::Warning => format!(
            r#"<path d="M{} L{}" {}/>{}"#,
            p(0.0, -0.5),
            p(0.0, 0.12),
            stroke,
            dot(0.45)
        ),
        Glyph::Info => format!(
            r#"{}<path d="M{} L{}" {}/>"#,
            dot(-0.45),
            p(0.0, -0.1),
            p(0.0, 0.5),
            stroke
        ),
        Glyph::Question => format!(
            r#"<path d="M{} Q{} {} Q{} {} L{}" {}/>{}"#,
            p(-0.3, -0.25),
            p(-0.3, -0.55),
            p(0.0, -0.55),
            p(0.35, -0.55),
            p(0.3, -0.2),
            p(0.0, 0.12),
            stroke,
            dot(0.45)
        ),
    }
}

pub fn compile(spec: &IconSpec, ctx: &mut RenderContext) -> Fragment {
    let (defs, filter) = ctx.optional_shadow(spec.shadow);
    let r = spec.size / 2.0;
    let element = format!(
        r#"<g{}><circle cx="{}" cy="{}" r="{}" fill="{}"/>{}</g>"#,
        filter,
        Num(spec.x),
        Num(spec.y),
        Num(r),
        Attr(&spec.color),
        glyph_markup(spec.glyph, spec.x, spec.y, r)
    );
    Fragment::new(defs, element)
}
