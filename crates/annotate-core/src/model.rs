//! Data models for annotation requests and results
//!
//! This module defines the boundary types shared by the compiler, the
//! orchestrator and the MCP layer:
//! - [`AnnotationDescriptor`]: one caller-supplied annotation (`type` + fields)
//! - [`AnnotationFields`]: the common optional-fields record
//! - [`AnnotationKind`]: the closed set of supported annotation kinds
//! - [`ImageMetadata`] and [`AnnotateSummary`]: compositor and orchestrator
//!   results

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnnotateError, AnnotateResult};

/// A 2D point as an `[x, y]` pair
pub type Point = [f64; 2];

/// Optional fields shared by every annotation kind
///
/// Each kind reads the subset it understands; the rest are ignored. Field
/// names are camelCase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationFields {
    /// X coordinate (center for marker/circle/icon, anchor for callout,
    /// top-left otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x:             Option<f64>,
    /// Y coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y:             Option<f64>,
    /// Number shown in a marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number:        Option<u32>,
    /// Text for callouts and labels (newlines split callout lines)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text:          Option<String>,
    /// Start point for arrows and connectors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from:          Option<Point>,
    /// End point for arrows and connectors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to:            Option<Point>,
    /// Width of a rectangular area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width:         Option<f64>,
    /// Height of a rectangular area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height:        Option<f64>,
    /// Circle radius, or blur intensity for blur annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius:        Option<f64>,
    /// Palette name or CSS color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color:         Option<String>,
    /// Fill or plate color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background:    Option<String>,
    /// Diameter of markers and icons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size:          Option<f64>,
    /// Font size in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size:     Option<f64>,
    /// Stroke width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width:  Option<f64>,
    /// Kind-specific style (marker: filled/outline/badge, arrow: filled/open)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style:         Option<String>,
    /// Callout tail side: top, bottom, left or right
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer:       Option<String>,
    /// Icon glyph: check, cross, warning, info or question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon:          Option<String>,
    /// Drop shadow toggle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow:        Option<bool>,
    /// Curvature offset for curved arrows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve:         Option<f64>,
    /// Corner radius for rectangles and callout boxes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    /// Fill opacity (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity:       Option<f64>,
    /// Dashed stroke toggle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashed:        Option<bool>,
}

macro_rules! merge_fields {
    ($primary:expr, $fallback:expr; $($field:ident),+ $(,)?) => {
        AnnotationFields {
            $($field: $primary.$field.clone().or_else(|| $fallback.$field.clone()),)+
        }
    };
}

impl AnnotationFields {
    /// Shallow merge: every field set on `self` wins, unset fields are taken
    /// from `defaults`.
    pub fn or(&self, defaults: &AnnotationFields) -> AnnotationFields {
        merge_fields!(self, defaults;
            x, y, number, text, from, to, width, height, radius, color, background,
            size, font_size, stroke_width, style, pointer, icon, shadow, curve,
            corner_radius, opacity, dashed,
        )
    }

    /// Whether a dash pattern was requested via `dashed` or `style: "dashed"`
    pub fn is_dashed(&self) -> bool {
        self.dashed.unwrap_or(false)
            || self
                .style
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("dashed"))
    }
}

/// One caller-supplied annotation
///
/// # Examples
///
/// ```
/// use annotate_core::model::AnnotationDescriptor;
///
/// let json = r#"{"type":"marker","x":10,"y":20,"number":3,"color":"blue"}"#;
/// let descriptor: AnnotationDescriptor = serde_json::from_str(json).unwrap();
/// assert_eq!(descriptor.kind, "marker");
/// assert_eq!(descriptor.fields.number, Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationDescriptor {
    /// Annotation type discriminant (see [`AnnotationKind`])
    #[serde(rename = "type")]
    pub kind:   String,
    /// Geometry and style fields
    #[serde(flatten)]
    pub fields: AnnotationFields,
}

impl AnnotationDescriptor {
    /// Creates a descriptor of the given type with the given fields
    pub fn new(kind: impl Into<String>, fields: AnnotationFields) -> Self {
        Self {
            kind: kind.into(),
            fields,
        }
    }

    /// Parses one descriptor from a JSON value, tagging failures with `index`
    pub fn from_value(index: usize, value: serde_json::Value) -> AnnotateResult<Self> {
        serde_json::from_value(value).map_err(|e| AnnotateError::InvalidDescriptor {
            index,
            reason: e.to_string(),
        })
    }

    /// Parses a JSON array of descriptors
    ///
    /// Every element is validated before any of them is returned, so a
    /// malformed entry fails the whole request up front.
    pub fn parse_list(json: &str) -> AnnotateResult<Vec<Self>> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(|e| AnnotateError::InvalidDescriptor {
                index:  0,
                reason: format!("expected a JSON array of annotations: {}", e),
            })?;

        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Self::from_value(index, value))
            .collect()
    }
}

/// The closed set of annotation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationKind {
    /// Numbered badge
    Marker,
    /// Straight arrow
    Arrow,
    /// Quadratic-curve arrow
    CurvedArrow,
    /// Text box with a pointer tail
    Callout,
    /// Rectangle outline / fill
    Rect,
    /// Circle outline / fill
    Circle,
    /// Text with optional plate
    Label,
    /// Translucent rectangle
    Highlight,
    /// Gray blurred redaction box
    Blur,
    /// Plain line
    Connector,
    /// Glyph badge
    Icon,
}

impl AnnotationKind {
    /// Every kind, in documentation order
    pub const ALL: [AnnotationKind; 11] = [
        AnnotationKind::Marker,
        AnnotationKind::Arrow,
        AnnotationKind::CurvedArrow,
        AnnotationKind::Callout,
        AnnotationKind::Rect,
        AnnotationKind::Circle,
        AnnotationKind::Label,
        AnnotationKind::Highlight,
        AnnotationKind::Blur,
        AnnotationKind::Connector,
        AnnotationKind::Icon,
    ];

    /// Alternative `type` spellings and the kind they map to
    pub const ALIASES: [(&'static str, AnnotationKind); 8] = [
        ("number", AnnotationKind::Marker),
        ("curved_arrow", AnnotationKind::CurvedArrow),
        ("curve", AnnotationKind::CurvedArrow),
        ("box", AnnotationKind::Rect),
        ("rectangle", AnnotationKind::Rect),
        ("text", AnnotationKind::Label),
        ("redact", AnnotationKind::Blur),
        ("line", AnnotationKind::Connector),
    ];

    /// Resolves a `type` string (canonical name or alias, case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use annotate_core::model::AnnotationKind;
    ///
    /// assert_eq!(AnnotationKind::parse("box"), Some(AnnotationKind::Rect));
    /// assert_eq!(AnnotationKind::parse("Curved-Arrow"), Some(AnnotationKind::CurvedArrow));
    /// assert_eq!(AnnotationKind::parse("sparkle"), None);
    /// ```
    pub fn parse(type_name: &str) -> Option<AnnotationKind> {
        let normalized = type_name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .or_else(|| {
                Self::ALIASES
                    .into_iter()
                    .find(|(alias, _)| *alias == normalized)
                    .map(|(_, kind)| kind)
            })
    }

    /// Returns the canonical `type` name
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Marker => "marker",
            AnnotationKind::Arrow => "arrow",
            AnnotationKind::CurvedArrow => "curved-arrow",
            AnnotationKind::Callout => "callout",
            AnnotationKind::Rect => "rect",
            AnnotationKind::Circle => "circle",
            AnnotationKind::Label => "label",
            AnnotationKind::Highlight => "highlight",
            AnnotationKind::Blur => "blur",
            AnnotationKind::Connector => "connector",
            AnnotationKind::Icon => "icon",
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An annotation the assembler could not dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedAnnotation {
    /// Position in the input list
    pub index:     usize,
    /// The unrecognized `type` value
    pub type_name: String,
}

/// Source image properties reported by the compositor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width:  u32,
    /// Height in pixels
    pub height: u32,
    /// Lowercase format name (e.g. "png")
    pub format: String,
}

/// Per-request options for [`crate::composite::Annotator::annotate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateOptions {
    /// Theme name; `None` uses the configured default theme
    pub theme: Option<String>,
}

impl AnnotateOptions {
    /// Options with an explicit theme
    pub fn with_theme(theme: impl Into<String>) -> Self {
        Self {
            theme: Some(theme.into()),
        }
    }
}

/// Result of a successful annotate call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateSummary {
    /// Where the annotated image was written
    pub output_path:      PathBuf,
    /// Canvas width (source image width)
    pub width:            u32,
    /// Canvas height (source image height)
    pub height:           u32,
    /// Number of annotations in the request
    pub annotation_count: usize,
    /// Number of annotations that produced markup
    pub rendered:         usize,
    /// Annotations skipped because of an unknown type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped:          Vec<SkippedAnnotation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_deserialization_camel_case() {
        let json = r#"{
            "type": "arrow",
            "from": [10, 20],
            "to": [30.5, 40],
            "strokeWidth": 6,
            "cornerRadius": 4,
            "fontSize": 12
        }"#;
        let d: AnnotationDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.kind, "arrow");
        assert_eq!(d.fields.from, Some([10.0, 20.0]));
        assert_eq!(d.fields.to, Some([30.5, 40.0]));
        assert_eq!(d.fields.stroke_width, Some(6.0));
        assert_eq!(d.fields.corner_radius, Some(4.0));
        assert_eq!(d.fields.font_size, Some(12.0));
    }

    #[test]
    fn test_descriptor_ignores_unknown_fields() {
        let json = r#"{"type":"circle","x":1,"y":2,"sparkle":true,"zIndex":9}"#;
        let d: AnnotationDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.kind, "circle");
        assert_eq!(d.fields.x, Some(1.0));
    }

    #[test]
    fn test_descriptor_serialization_skips_unset_fields() {
        let d = AnnotationDescriptor::new(
            "label",
            AnnotationFields {
                text: Some("hi".to_string()),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["type"], "label");
        assert_eq!(value["text"], "hi");
        assert!(value.get("x").is_none());
    }

    #[test]
    fn test_parse_list_reports_bad_index() {
        let json = r#"[{"type":"marker","x":1,"y":1},{"type":"arrow","from":"nope"}]"#;
        let err = AnnotationDescriptor::parse_list(json).unwrap_err();
        match err {
            AnnotateError::InvalidDescriptor { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_requires_type() {
        let err = AnnotationDescriptor::parse_list(r#"[{"x":1}]"#).unwrap_err();
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn test_parse_list_rejects_non_array() {
        assert!(AnnotationDescriptor::parse_list(r#"{"type":"marker"}"#).is_err());
    }

    #[test]
    fn test_fields_merge_prefers_self() {
        let explicit = AnnotationFields {
            color: Some("red".to_string()),
            ..Default::default()
        };
        let defaults = AnnotationFields {
            color: Some("green".to_string()),
            size: Some(40.0),
            ..Default::default()
        };
        let merged = explicit.or(&defaults);
        assert_eq!(merged.color.as_deref(), Some("red"));
        assert_eq!(merged.size, Some(40.0));
        // Inputs untouched
        assert_eq!(explicit.size, None);
        assert_eq!(defaults.color.as_deref(), Some("green"));
    }

    #[test]
    fn test_is_dashed() {
        let mut fields = AnnotationFields::default();
        assert!(!fields.is_dashed());
        fields.style = Some("Dashed".to_string());
        assert!(fields.is_dashed());
        fields.style = None;
        fields.dashed = Some(true);
        assert!(fields.is_dashed());
    }

    #[test]
    fn test_kind_parse_canonical_and_aliases() {
        for kind in AnnotationKind::ALL {
            assert_eq!(AnnotationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(AnnotationKind::parse("box"), Some(AnnotationKind::Rect));
        assert_eq!(AnnotationKind::parse("text"), Some(AnnotationKind::Label));
        assert_eq!(AnnotationKind::parse("line"), Some(AnnotationKind::Connector));
        assert_eq!(AnnotationKind::parse("number"), Some(AnnotationKind::Marker));
        assert_eq!(AnnotationKind::parse(" ARROW "), Some(AnnotationKind::Arrow));
        assert_eq!(AnnotationKind::parse("sparkle"), None);
        assert_eq!(AnnotationKind::parse(""), None);
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&AnnotationKind::CurvedArrow).unwrap(),
            r#""curved-arrow""#
        );
        assert_eq!(format!("{}", AnnotationKind::Highlight), "highlight");
    }

    #[test]
    fn test_summary_serialization_camel_case() {
        let summary = AnnotateSummary {
            output_path:      PathBuf::from("/tmp/out.png"),
            width:            100,
            height:           80,
            annotation_count: 2,
            rendered:         2,
            skipped:          Vec::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["outputPath"], "/tmp/out.png");
        assert_eq!(json["annotationCount"], 2);
        assert!(json.get("skipped").is_none());
    }

    #[test]
    fn test_json_schema_generation() {
        let _descriptor_schema = schemars::schema_for!(AnnotationDescriptor);
        let _summary_schema = schemars::schema_for!(AnnotateSummary);
        let _metadata_schema = schemars::schema_for!(ImageMetadata);
    }
}
