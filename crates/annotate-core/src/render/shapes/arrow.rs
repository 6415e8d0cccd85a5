//! Straight and curved arrows

use crate::model::{AnnotationFields, Point};
use crate::render::{
    color::resolve_color,
    markup::{Attr, Fragment, Num, RenderContext, dash_attr},
};

pub const DEFAULT_STROKE_WIDTH: f64 = 4.0;
pub const DEFAULT_CURVE: f64 = 50.0;
const MIN_HEAD_SIZE: f64 = 10.0;

/// Arrowhead style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadStyle {
    /// Solid triangle
    Filled,
    /// Open chevron
    Open,
}

impl HeadStyle {
    pub fn parse(style: Option<&str>) -> HeadStyle {
        match style.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("open" | "outline" | "line") => HeadStyle::Open,
            _ => HeadStyle::Filled,
        }
    }
}

/// Arrowhead size for a given stroke width
pub fn head_size(stroke_width: f64) -> f64 {
    (stroke_width * 3.0).max(MIN_HEAD_SIZE)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowSpec {
    pub from:         Point,
    pub to:           Point,
    pub color:        String,
    pub stroke_width: f64,
    pub head:         HeadStyle,
    pub dashed:       bool,
    pub shadow:       bool,
}

impl ArrowSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            from:         fields.from.unwrap_or([0.0, 0.0]),
            to:           fields.to.unwrap_or([0.0, 0.0]),
            color:        resolve_color(fields.color.as_deref()),
            stroke_width: fields.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH).abs(),
            head:         HeadStyle::parse(fields.style.as_deref()),
            dashed:       fields.is_dashed(),
            shadow:       fields.shadow.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurvedArrowSpec {
    pub arrow: ArrowSpec,
    /// Signed offset of the control point from the chord midpoint
    pub curve: f64,
}

impl CurvedArrowSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            arrow: ArrowSpec::from_fields(fields),
            curve: fields.curve.unwrap_or(DEFAULT_CURVE),
        }
    }
}

/// Quadratic control point: chord midpoint pushed along the left normal
///
/// Degenerate (zero-length) chords get the midpoint itself.
pub fn control_point(from: Point, to: Point, curve: f64) -> Point {
    let [x1, y1] = from;
    let [x2, y2] = to;
    let (dx, dy) = (x2 - x1, y2 - y1);
    let mid = [(x1 + x2) / 2.0, (y1 + y2) / 2.0];
    let len = dx.hypot(dy);
    if len == 0.0 {
        return mid;
    }
    [mid[0] + (-dy / len) * curve, mid[1] + (dx / len) * curve]
}

/// Unit vector from `a` toward `b`, zero for coincident points
fn unit(a: Point, b: Point) -> (f64, f64) {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len = dx.hypot(dy);
    if len == 0.0 { (0.0, 0.0) } else { (dx / len, dy / len) }
}

/// `<marker>` definition for the head, plus the distance the shaft must stop
/// short of the tip so its stroke stays hidden under a filled head
fn arrowhead(id: &str, spec: &ArrowSpec) -> (String, f64) {
    let size = head_size(spec.stroke_width);
    match spec.head {
        // Anchor at x=3 so the shaft end sits inside the triangle body.
        HeadStyle::Filled => (
            format!(
                r#"<marker id="{}" viewBox="0 0 10 10" refX="3" refY="5" markerWidth="{}" markerHeight="{}" markerUnits="userSpaceOnUse" orient="auto"><path d="M0,0 L10,5 L0,10 Z" fill="{}"/></marker>"#,
                id,
                Num(size),
                Num(size),
                Attr(&spec.color)
            ),
            size * 0.7,
        ),
        HeadStyle::Open => (
            format!(
                r#"<marker id="{}" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="{}" markerHeight="{}" markerUnits="userSpaceOnUse" orient="auto"><path d="M1,1 L9,5 L1,9" fill="none" stroke="{}" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"/></marker>"#,
                id,
                Num(size),
                Num(size),
                Attr(&spec.color)
            ),
            0.0,
        ),
    }
}

pub fn compile(spec: &ArrowSpec, ctx: &mut RenderContext) -> Fragment {
    let (mut defs, filter) = ctx.optional_shadow(spec.shadow);
    let head_id = ctx.next_id("arrowhead");
    let (head_defs, inset) = arrowhead(&head_id, spec);
    defs.push_str(&head_defs);

    let (ux, uy) = unit(spec.from, spec.to);
    let end = [spec.to[0] - ux * inset, spec.to[1] - uy * inset];

    let element = format!(
        r#"<g{}><line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-linecap="round"{} marker-end="url(#{})"/></g>"#,
        filter,
        Num(spec.from[0]),
        Num(spec.from[1]),
        Num(end[0]),
        Num(end[1]),
        Attr(&spec.color),
        Num(spec.stroke_width),
        dash_attr(spec.dashed, spec.stroke_width),
        head_id
    );

    Fragment::new(defs, element)
}

pub fn compile_curved(spec: &CurvedArrowSpec, ctx: &mut RenderContext) -> Fragment {
    let arrow = &spec.arrow;
    let (mut defs, filter) = ctx.optional_shadow(arrow.shadow);
    let head_id = ctx.next_id("arrowhead");
    let (head_defs, inset) = arrowhead(&head_id, arrow);
    defs.push_str(&head_defs);

    let ctrl = control_point(arrow.from, arrow.to, spec.curve);
    let (ux, uy) = unit(ctrl, arrow.to);
    let end = [arrow.to[0] - ux * inset, arrow.to[1] - uy * inset];

    let element = format!(
        r#"<g{}><path d="M{},{} Q{},{} {},{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round"{} marker-end="url(#{})"/></g>"#,
        filter,
        Num(arrow.from[0]),
        Num(arrow.from[1]),
        Num(ctrl[0]),
        Num(ctrl[1]),
        Num(end[0]),
        Num(end[1]),
        Attr(&arrow.color),
        Num(arrow.stroke_width),
        dash_attr(arrow.dashed, arrow.stroke_width),
        head_id
    );

    Fragment::new(defs, element)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(from: Point, to: Point) -> AnnotationFields {
        AnnotationFields {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }

    #[test]
    fn test_head_size_has_floor() {
        assert_eq!(head_size(2.0), 10.0);
        assert_eq!(head_size(4.0), 12.0);
        assert_eq!(head_size(6.0), 18.0);
    }

    #[test]
    fn test_filled_arrow_shortens_shaft_under_head() {
        let spec = ArrowSpec::from_fields(&fields([0.0, 0.0], [100.0, 0.0]));
        let mut ctx = RenderContext::default();
        let fragment = compile(&spec, &mut ctx);

        assert!(fragment.defs.contains(r#"<marker id="arrowhead-1""#));
        assert!(fragment.defs.contains(r#"markerWidth="12""#));
        // 12 * 0.7 = 8.4 short of the tip
        assert!(fragment.element.contains(r#"x2="91.6" y2="0""#));
        assert!(fragment.element.contains(r#"marker-end="url(#arrowhead-1)""#));
        assert!(!fragment.element.contains("stroke-dasharray"));
    }

    #[test]
    fn test_open_arrow_keeps_full_shaft() {
        let mut f = fields([0.0, 0.0], [0.0, 50.0]);
        f.style = Some("open".to_string());
        let spec = ArrowSpec::from_fields(&f);
        let fragment = compile(&spec, &mut RenderContext::default());
        assert!(fragment.defs.contains(r#"fill="none""#));
        assert!(fragment.element.contains(r#"x2="0" y2="50""#));
    }

    #[test]
    fn test_dashed_arrow() {
        let mut f = fields([0.0, 0.0], [10.0, 10.0]);
        f.dashed = Some(true);
        f.stroke_width = Some(2.0);
        let fragment = compile(&ArrowSpec::from_fields(&f), &mut RenderContext::default());
        assert!(fragment.element.contains(r#"stroke-dasharray="6,4""#));
    }

    #[test]
    fn test_zero_length_arrow_does_not_produce_nan() {
        let spec = ArrowSpec::from_fields(&fields([5.0, 5.0], [5.0, 5.0]));
        let fragment = compile(&spec, &mut RenderContext::default());
        assert!(!fragment.element.contains("NaN"));
        assert!(fragment.element.contains(r#"x2="5" y2="5""#));
    }

    #[test]
    fn test_control_point_offsets_along_normal() {
        assert_eq!(control_point([0.0, 0.0], [100.0, 0.0], 50.0), [50.0, 50.0]);
        assert_eq!(control_point([0.0, 0.0], [100.0, 0.0], -50.0), [50.0, -50.0]);
        assert_eq!(control_point([0.0, 0.0], [0.0, 100.0], 20.0), [-20.0, 50.0]);
        assert_eq!(control_point([3.0, 3.0], [3.0, 3.0], 50.0), [3.0, 3.0]);
    }

    #[test]
    fn test_curved_arrow_uses_quadratic_path() {
        let spec = CurvedArrowSpec::from_fields(&fields([0.0, 0.0], [100.0, 0.0]));
        assert_eq!(spec.curve, DEFAULT_CURVE);
        let fragment = compile_curved(&spec, &mut RenderContext::default());
        assert!(fragment.element.contains(r#"d="M0,0 Q50,50 "#));
        assert!(fragment.element.contains(r#"fill="none""#));
    }
}
