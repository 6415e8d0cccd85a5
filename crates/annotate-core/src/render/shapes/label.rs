//! Free-standing text labels with an optional plate

use crate::model::AnnotationFields;
use crate::render::{
    color::resolve_color,
    markup::{Attr, Fragment, Num, RenderContext, escape_xml},
};

pub const DEFAULT_FONT_SIZE: f64 = 16.0;
const CHAR_WIDTH: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    /// Top-left corner of the label box
    pub x:             f64,
    pub y:             f64,
    pub text:          String,
    pub font_size:     f64,
    pub color:         String,
    pub background:    Option<String>,
    pub opacity:       f64,
    pub corner_radius: f64,
    pub shadow:        bool,
}

impl LabelSpec {
    pub fn from_fields(fields: &AnnotationFields) -> Self {
        Self {
            x:             fields.x.unwrap_or(0.0),
            y:             fields.y.unwrap_or(0.0),
            text:          fields.text.clone().unwrap_or_default().replace(['\r', '\n'], " "),
            font_size:     fields.font_size.unwrap_or(DEFAULT_FONT_SIZE).abs().max(1.0),
            color:         resolve_color(fields.color.as_deref()),
            background:    fields
                .background
                .as_deref()
                .filter(|bg| !bg.trim().is_empty())
                .map(|bg| resolve_color(Some(bg))),
            opacity:       fields.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
            corner_radius: fields.corner_radius.unwrap_or(4.0).max(0.0),
            shadow:        fields.shadow.unwrap_or(false),
        }
    }

    fn padding(&self) -> f64 {
        self.font_size * 0.4
    }

    /// Plate size around the text
    pub fn plate_size(&self) -> (f64, f64) {
        let pad = self.padding();
        let chars = self.text.chars().count() as f64;
        (chars * self.font_size * CHAR_WIDTH + pad * 2.0, self.font_size + pad * 2.0)
    }
}

pub fn compile(spec: &LabelSpec, ctx: &mut RenderContext) -> Fragment {
    let (defs, filter) = ctx.optional_shadow(spec.shadow);
    let pad = spec.padding();

    let plate = match &spec.background {
        Some(background) => {
            let (width, height) = spec.plate_size();
            let opacity = if spec.opacity < 1.0 {
                format!(r#" fill-opacity="{}""#, Num(spec.opacity))
            } else {
                String::new()
            };
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"{}/>"#,
                Num(spec.x),
                Num(spec.y),
                Num(width),
                Num(height),
                Num(spec.corner_radius),
                Attr(background),
                opacity
            )
        }
        None => String::new(),
    };

    let element = format!(
        r#"<g{}>{}<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="bold" fill="{}">{}</text></g>"#,
        filter,
        plate,
        Num(spec.x + pad),
        Num(spec.y + pad + spec.font_size * 0.85),
        ctx.font_family(),
        Num(spec.font_size),
        Attr(&spec.color),
        escape_xml(&spec.text)
    );

    Fragment::new(defs, element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_label_has_no_plate() {
        let spec = LabelSpec::from_fields(&AnnotationFields {
            x: Some(10.0),
            y: Some(20.0),
            text: Some("Save".to_string()),
            ..Default::default()
        });
        let fragment = compile(&spec, &mut RenderContext::default());
        assert!(!fragment.element.contains("<rect"));
        // 10 + 6.4, 20 + 6.4 + 13.6
        assert!(fragment.element.contains(r#"<text x="16.4" y="40""#));
        assert!(fragment.element.contains(">Save</text>"));
    }

    #[test]
    fn test_plate_wraps_text() {
        let spec = LabelSpec::from_fields(&AnnotationFields {
            text: Some("Save".to_string()),
            background: Some("red".to_string()),
            color: Some("white".to_string()),
            ..Default::default()
        });
        // 4 * 16 * 0.6 + 12.8 = 51.2; 16 + 12.8 = 28.8
        let (w, h) = spec.plate_size();
        assert!((w - 51.2).abs() < 1e-9);
        assert!((h - 28.8).abs() < 1e-9);

        let fragment = compile(&spec, &mut RenderContext::default());
        assert!(fragment.element.contains(r##"width="51.2" height="28.8" rx="4" fill="#E53935"/>"##));
        assert!(fragment.element.contains(r##"fill="#FFFFFF">Save"##));
    }

    #[test]
    fn test_newlines_flatten() {
        let spec = LabelSpec::from_fields(&AnnotationFields {
            text: Some("a\nb".to_string()),
            ..Default::default()
        });
        assert_eq!(spec.text, "a b");
    }
}
