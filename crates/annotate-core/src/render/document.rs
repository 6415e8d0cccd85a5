//! Document assembly
//!
//! Turns an ordered annotation list into one SVG overlay sized to the
//! canvas. Each build owns a fresh [`RenderContext`], so definition ids
//! restart at 1 per document.

use tracing::{debug, warn};

use crate::config::DEFAULT_FONT_FAMILY;
use crate::model::{AnnotationDescriptor, AnnotationKind, SkippedAnnotation};
use crate::render::{
    markup::{Fragment, RenderContext},
    shapes,
    theme::{Theme, merge_with_theme},
};

/// An assembled overlay plus a per-annotation report
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    /// Complete `<svg>` markup
    pub markup:   String,
    /// Canvas width in pixels
    pub width:    u32,
    /// Canvas height in pixels
    pub height:   u32,
    /// Annotations that produced markup
    pub rendered: usize,
    /// Annotations skipped for an unknown type
    pub skipped:  Vec<SkippedAnnotation>,
}

/// Builds SVG documents with a fixed font stack and optional theme
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    font_family: String,
    theme:       Option<Theme>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY)
    }
}

impl DocumentBuilder {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
            theme:       None,
        }
    }

    /// Sets the theme by name
    ///
    /// Unknown names log a warning and leave the builder unthemed.
    pub fn with_theme_name(mut self, name: Option<&str>) -> Self {
        self.theme = name.and_then(|name| {
            let theme = Theme::named(name);
            if theme.is_none() {
                warn!("Unknown theme '{}', rendering without theme defaults", name);
            }
            theme
        });
        self
    }

    pub fn with_theme(mut self, theme: Option<Theme>) -> Self {
        self.theme = theme;
        self
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Compiles `annotations` onto a `width` x `height` canvas
    ///
    /// Elements keep input order, which is paint order. Unknown types are
    /// skipped and reported, never fatal.
    pub fn build(&self, width: u32, height: u32, annotations: &[AnnotationDescriptor]) -> SvgDocument {
        let mut ctx = RenderContext::new(self.font_family.clone());
        let mut fragments: Vec<Fragment> = Vec::with_capacity(annotations.len());
        let mut skipped = Vec::new();

        for (index, descriptor) in annotations.iter().enumerate() {
            let Some(kind) = AnnotationKind::parse(&descriptor.kind) else {
                warn!(index, type_name = %descriptor.kind, "Skipping annotation with unknown type");
                skipped.push(SkippedAnnotation {
                    index,
                    type_name: descriptor.kind.clone(),
                });
                continue;
            };

            let merged = merge_with_theme(descriptor, self.theme.as_ref());
            debug!(index, %kind, "Compiling annotation");
            fragments.push(shapes::compile(kind, &merged.fields, &mut ctx));
        }

        SvgDocument {
            markup: assemble(width, height, &fragments),
            width,
            height,
            rendered: fragments.len(),
            skipped,
        }
    }
}

/// Wraps fragments in the `<svg>` envelope: one `<defs>` block, then the
/// elements in order
fn assemble(width: u32, height: u32, fragments: &[Fragment]) -> String {
    let defs: String = fragments.iter().map(|f| f.defs.as_str()).collect();
    let elements: String = fragments.iter().map(|f| f.element.as_str()).collect::<Vec<_>>().join("\n");

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    svg.push('\n');
    svg.push_str("<defs>");
    svg.push_str(&defs);
    svg.push_str("</defs>\n");
    if !elements.is_empty() {
        svg.push_str(&elements);
        svg.push('\n');
    }
    svg.push_str("</svg>\n");
    svg
}

/// Builds a document with the default font stack
///
/// # Examples
///
/// ```
/// use annotate_core::model::{AnnotationDescriptor, AnnotationFields};
/// use annotate_core::render::build_document;
///
/// let circle = AnnotationDescriptor::new(
///     "circle",
///     AnnotationFields { x: Some(50.0), y: Some(50.0), ..Default::default() },
/// );
/// let svg = build_document(100, 100, &[circle], None);
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains(r#"viewBox="0 0 100 100""#));
/// ```
pub fn build_document(
    width: u32,
    height: u32,
    annotations: &[AnnotationDescriptor],
    theme: Option<&str>,
) -> String {
    DocumentBuilder::default()
        .with_theme_name(theme)
        .build(width, height, annotations)
        .markup
}
