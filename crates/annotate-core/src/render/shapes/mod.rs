//! Per-kind annotation compilers
//!
//! Each kind resolves its loosely-typed [`AnnotationFields`] into a typed
//! spec with every default applied, then compiles that spec into a
//! [`Fragment`]. Compilers are pure apart from id allocation on the
//! [`RenderContext`].

pub mod arrow;
pub mod basic;
pub mod callout;
pub mod icon;
pub mod label;
pub mod marker;

use crate::model::{AnnotationFields, AnnotationKind};
use crate::render::markup::{Fragment, RenderContext};

/// A fully-resolved annotation
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Marker(marker::MarkerSpec),
    Arrow(arrow::ArrowSpec),
    CurvedArrow(arrow::CurvedArrowSpec),
    Callout(callout::CalloutSpec),
    Rect(basic::RectSpec),
    Circle(basic::CircleSpec),
    Label(label::LabelSpec),
    Highlight(basic::HighlightSpec),
    Blur(basic::BlurSpec),
    Connector(basic::ConnectorSpec),
    Icon(icon::IconSpec),
}

impl Shape {
    /// Resolves fields for `kind` into a typed shape
    pub fn resolve(kind: AnnotationKind, fields: &AnnotationFields) -> Shape {
        match kind {
            AnnotationKind::Marker => Shape::Marker(marker::MarkerSpec::from_fields(fields)),
            AnnotationKind::Arrow => Shape::Arrow(arrow::ArrowSpec::from_fields(fields)),
            AnnotationKind::CurvedArrow => Shape::CurvedArrow(arrow::CurvedArrowSpec::from_fields(fields)),
            AnnotationKind::Callout => Shape::Callout(callout::CalloutSpec::from_fields(fields)),
            AnnotationKind::Rect => Shape::Rect(basic::RectSpec::from_fields(fields)),
            AnnotationKind::Circle => Shape::Circle(basic::CircleSpec::from_fields(fields)),
            AnnotationKind::Label => Shape::Label(label::LabelSpec::from_fields(fields)),
            AnnotationKind::Highlight => Shape::Highlight(basic::HighlightSpec::from_fields(fields)),
            AnnotationKind::Blur => Shape::Blur(basic::BlurSpec::from_fields(fields)),
            AnnotationKind::Connector => Shape::Connector(basic::ConnectorSpec::from_fields(fields)),
            AnnotationKind::Icon => Shape::Icon(icon::IconSpec::from_fields(fields)),
        }
    }

    pub fn compile(&self, ctx: &mut RenderContext) -> Fragment {
        match self {
            Shape::Marker(spec) => marker::compile(spec, ctx),
            Shape::Arrow(spec) => arrow::compile(spec, ctx),
            Shape::CurvedArrow(spec) => arrow::compile_curved(spec, ctx),
            Shape::Callout(spec) => callout::compile(spec, ctx),
            Shape::Rect(spec) => basic::compile_rect(spec, ctx),
            Shape::Circle(spec) => basic::compile_circle(spec, ctx),
            Shape::Label(spec) => label::compile(spec, ctx),
            Shape::Highlight(spec) => basic::compile_highlight(spec, ctx),
            Shape::Blur(spec) => basic::compile_blur(spec, ctx),
            Shape::Connector(spec) => basic::compile_connector(spec, ctx),
            Shape::Icon(spec) => icon::compile(spec, ctx),
        }
    }
}

/// Resolves and compiles one annotation
pub fn compile(kind: AnnotationKind, fields: &AnnotationFields, ctx: &mut RenderContext) -> Fragment {
    Shape::resolve(kind, fields).compile(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_compiles_with_empty_fields() {
        let mut ctx = RenderContext::default();
        for kind in AnnotationKind::ALL {
            let fragment = compile(kind, &AnnotationFields::default(), &mut ctx);
            assert!(!fragment.element.is_empty(), "{kind} produced no element");
            assert!(!fragment.element.contains("NaN"), "{kind}");
        }
    }

    #[test]
    fn test_ids_never_collide_across_shapes() {
        let mut ctx = RenderContext::default();
        let fields = AnnotationFields {
            shadow: Some(true),
            ..Default::default()
        };
        let a = compile(AnnotationKind::Marker, &fields, &mut ctx);
        let b = compile(AnnotationKind::Marker, &fields, &mut ctx);
        assert!(a.defs.contains(r#"id="shadow-1""#));
        assert!(a.defs.contains(r#"id="grad-2""#));
        assert!(b.defs.contains(r#"id="shadow-3""#));
        assert!(b.defs.contains(r#"id="grad-4""#));
    }
}
