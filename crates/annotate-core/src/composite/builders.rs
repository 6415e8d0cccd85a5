//! Convenience builders for common annotation sets
//!
//! Each builder produces a plain descriptor list that goes through the
//! same assembler as hand-written annotations, so themes still apply.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AnnotateError, AnnotateResult},
    model::{AnnotationDescriptor, AnnotationFields},
};

/// Horizontal gap between a step marker's edge and its label
const STEP_LABEL_GAP: f64 = 8.0;
/// Step marker diameter, pinned so label placement holds under every theme
const STEP_MARKER_SIZE: f64 = 32.0;
/// Vertical space reserved above an area for its label
const AREA_LABEL_OFFSET: f64 = 34.0;

/// One step of a step guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Step {
    /// Marker center X
    pub x:    f64,
    /// Marker center Y
    pub y:    f64,
    /// Optional label shown beside the marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A rectangular region in source pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Region {
    pub x:      f64,
    pub y:      f64,
    pub width:  f64,
    pub height: f64,
}

impl Region {
    fn validate(&self) -> AnnotateResult<()> {
        for (parameter, value) in [("width", self.width), ("height", self.height)] {
            if !(value > 0.0) {
                return Err(AnnotateError::InvalidParameter {
                    parameter: parameter.to_string(),
                    reason:    format!("must be greater than 0, got {}", value),
                });
            }
        }
        Ok(())
    }
}

/// Shape drawn around a highlighted area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AreaShape {
    /// Stroked rectangle
    #[default]
    Rect,
    /// Stroked circle around the area
    Circle,
    /// Translucent fill
    Highlight,
}

/// Numbered markers, optional labels and optional dashed connectors
///
/// Connectors are emitted first so the markers paint over them.
pub fn step_guide(steps: &[Step], connect: bool, color: Option<&str>) -> Vec<AnnotationDescriptor> {
    let color = color.map(str::to_string);
    let mut annotations = Vec::with_capacity(steps.len() * 3);

    if connect {
        annotations.extend(steps.windows(2).map(|pair| {
            AnnotationDescriptor::new("connector", AnnotationFields {
                from: Some([pair[0].x, pair[0].y]),
                to: Some([pair[1].x, pair[1].y]),
                color: color.clone(),
                dashed: Some(true),
                ..Default::default()
            })
        }));
    }

    for (i, step) in steps.iter().enumerate() {
        annotations.push(AnnotationDescriptor::new("marker", AnnotationFields {
            x: Some(step.x),
            y: Some(step.y),
            number: Some(i as u32 + 1),
            color: color.clone(),
            size: Some(STEP_MARKER_SIZE),
            ..Default::default()
        }));

        if let Some(text) = step.text.as_deref().filter(|t| !t.trim().is_empty()) {
            annotations.push(AnnotationDescriptor::new("label", AnnotationFields {
                x: Some(step.x + STEP_MARKER_SIZE / 2.0 + STEP_LABEL_GAP),
                y: Some(step.y - STEP_MARKER_SIZE / 2.0),
                text: Some(text.to_string()),
                background: color.clone(),
                color: color.as_ref().map(|_| "white".to_string()),
                ..Default::default()
            }));
        }
    }

    annotations
}

/// Emphasizes one area with a rect, circle or highlight plus an optional
/// label above it (below it when there is no room above)
pub fn highlight_area(
    region: Region,
    shape: AreaShape,
    label: Option<&str>,
    color: Option<&str>,
) -> AnnotateResult<Vec<AnnotationDescriptor>> {
    region.validate()?;
    let color = color.map(str::to_string);

    let mut annotations = vec![match shape {
        AreaShape::Rect => AnnotationDescriptor::new("rect", AnnotationFields {
            x: Some(region.x),
            y: Some(region.y),
            width: Some(region.width),
            height: Some(region.height),
            color: color.clone(),
            ..Default::default()
        }),
        AreaShape::Circle => AnnotationDescriptor::new("circle", AnnotationFields {
            x: Some(region.x + region.width / 2.0),
            y: Some(region.y + region.height / 2.0),
            radius: Some(region.width.max(region.height) / 2.0),
            color: color.clone(),
            ..Default::default()
        }),
        AreaShape::Highlight => AnnotationDescriptor::new("highlight", AnnotationFields {
            x: Some(region.x),
            y: Some(region.y),
            width: Some(region.width),
            height: Some(region.height),
            color: color.clone(),
            ..Default::default()
        }),
    }];

    if let Some(text) = label.filter(|t| !t.trim().is_empty()) {
        let y = if region.y >= AREA_LABEL_OFFSET {
            region.y - AREA_LABEL_OFFSET
        } else {
            region.y + region.height + 4.0
        };
        annotations.push(AnnotationDescriptor::new("label", AnnotationFields {
            x: Some(region.x),
            y: Some(y),
            text: Some(text.to_string()),
            background: color.clone(),
            color: color.as_ref().map(|_| "white".to_string()),
            ..Default::default()
        }));
    }

    Ok(annotations)
}

/// A single callout pointing at (x, y)
pub fn callout(
    x: f64,
    y: f64,
    text: &str,
    pointer: Option<&str>,
    color: Option<&str>,
    background: Option<&str>,
) -> AnnotationDescriptor {
    AnnotationDescriptor::new("callout", AnnotationFields {
        x: Some(x),
        y: Some(y),
        text: Some(text.to_string()),
        pointer: pointer.map(str::to_string),
        color: color.map(str::to_string),
        background: background.map(str::to_string),
        ..Default::default()
    })
}

/// One blur annotation per region; `intensity` becomes the blur radius
pub fn blur_regions(regions: &[Region], intensity: Option<f64>) -> AnnotateResult<Vec<AnnotationDescriptor>> {
    if regions.is_empty() {
        return Err(AnnotateError::InvalidParameter {
            parameter: "regions".to_string(),
            reason:    "at least one region is required".to_string(),
        });
    }

    regions
        .iter()
        .map(|region| {
            region.validate()?;
            Ok(AnnotationDescriptor::new("blur", AnnotationFields {
                x: Some(region.x),
                y: Some(region.y),
                width: Some(region.width),
                height: Some(region.height),
                radius: intensity,
                ..Default::default()
            }))
        })
        .collect()
}
