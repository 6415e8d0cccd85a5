//! MCP service implementation with tool routing
//!
//! This module provides the annotate-mcp server: tools that draw
//! annotations onto screenshots, the convenience builders on top of them,
//! and pure SVG rendering for previews.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use annotate_core::{
    composite::{
        Annotator, ImageCompositor,
        builders::{self, AreaShape, Region, Step},
        mock::MockCompositor,
    },
    config::RenderConfig,
    error::{AnnotateError, AnnotateResult},
    model::{AnnotateOptions, AnnotationDescriptor, AnnotationKind},
    render::{
        THEME_NAMES,
        color::{DEFAULT_COLOR, PALETTE},
    },
};
use rmcp::{
    ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ErrorData as McpError, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mcp_content::{build_annotate_result, build_image_info_result};

/// Callout pointer directions accepted by `add_callout`
const POINTERS: [&str; 4] = ["top", "bottom", "left", "right"];
/// Marker `style` values
const MARKER_STYLES: [&str; 3] = ["filled", "outline", "badge"];
/// Icon glyph names
const ICONS: [&str; 5] = ["check", "cross", "warning", "info", "question"];

/// Parameters for the `annotate_screenshot` tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateScreenshotParams {
    /// Path of the source screenshot (PNG, JPEG or WebP)
    pub input_path:   String,
    /// Output path; defaults to `<name>-annotated.<ext>` next to the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path:  Option<String>,
    /// Annotation objects, each with a `type` field (see `list_styles`)
    pub annotations:  Vec<serde_json::Value>,
    /// Theme name: default, minimal, bold or dark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme:        Option<String>,
    /// Also return the annotated image inline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_image: Option<bool>,
}

/// Parameters for the `create_step_guide` tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepGuideParams {
    pub input_path:   String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path:  Option<String>,
    /// Steps in order; each gets a numbered marker and an optional label
    pub steps:        Vec<Step>,
    /// Draw dashed connectors between consecutive steps (default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect:      Option<bool>,
    /// Marker and connector color (palette name or hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color:        Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme:        Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_image: Option<bool>,
}

/// Parameters for the `highlight_area` tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighlightAreaParams {
    pub input_path:   String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path:  Option<String>,
    /// Left edge of the area (pixels)
    pub x:            f64,
    /// Top edge of the area (pixels)
    pub y:            f64,
    pub width:        f64,
    pub height:       f64,
    /// rect (default), circle or highlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape:        Option<AreaShape>,
    /// Text shown above the area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label:        Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color:        Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme:        Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_image: Option<bool>,
}

/// Parameters for the `add_callout` tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCalloutParams {
    pub input_path:   String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path:  Option<String>,
    /// Point the callout tail touches
    pub x:            f64,
    pub y:            f64,
    /// Callout text; newlines start new lines
    pub text:         String,
    /// Tail direction: top, bottom (default), left or right
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer:      Option<String>,
    /// Border color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color:        Option<String>,
    /// Box fill color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background:   Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme:        Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_image: Option<bool>,
}

/// Parameters for the `blur_regions` tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlurRegionsParams {
    pub input_path:   String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path:  Option<String>,
    /// Regions to redact
    pub regions:      Vec<Region>,
    /// Blur strength (default 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity:    Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_image: Option<bool>,
}

/// Parameters for the `get_image_info` tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfoParams {
    /// Path of the image to inspect
    pub path: String,
}

/// Parameters for the `render_svg` tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderSvgParams {
    /// Canvas width in pixels
    pub width:       u32,
    /// Canvas height in pixels
    pub height:      u32,
    pub annotations: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme:       Option<String>,
}

/// Converts an [`AnnotateError`] into an MCP error
///
/// Caller mistakes map to `invalid_params`, everything else to
/// `internal_error`. The remediation hint and category travel in `data`.
pub fn convert_annotate_error_to_mcp(error: AnnotateError) -> McpError {
    let data = Some(serde_json::json!({
        "category": error.category(),
        "hint": error.remediation_hint(),
    }));
    match &error {
        AnnotateError::InputNotFound { .. }
        | AnnotateError::InvalidDescriptor { .. }
        | AnnotateError::InvalidParameter { .. } => McpError::invalid_params(error.to_string(), data),
        AnnotateError::ImageIo { .. } | AnnotateError::IoError(_) | AnnotateError::Render(_) => {
            McpError::internal_error(error.to_string(), data)
        }
    }
}

fn parse_annotations(values: Vec<serde_json::Value>) -> Result<Vec<AnnotationDescriptor>, McpError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| AnnotationDescriptor::from_value(index, value))
        .collect::<AnnotateResult<Vec<_>>>()
        .map_err(convert_annotate_error_to_mcp)
}

/// Screenshot annotation MCP server
///
/// # Tools
///
/// - `annotate_screenshot`: draw arbitrary annotations onto an image
/// - `create_step_guide`, `highlight_area`, `add_callout`, `blur_regions`:
///   common annotation sets
/// - `get_image_info`: image dimensions and format
/// - `render_svg`: the overlay SVG without touching any file
/// - `list_styles`: palette, themes and annotation types
#[derive(Clone)]
pub struct AnnotateMcpServer {
    tool_router: ToolRouter<Self>,
    annotator:   Arc<Annotator>,
}

impl std::fmt::Debug for AnnotateMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotateMcpServer")
            .field("annotator", &self.annotator)
            .finish_non_exhaustive()
    }
}

#[tool_router]
impl AnnotateMcpServer {
    /// Creates a server around an [`Annotator`]
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use annotate_core::{
    ///     composite::{Annotator, mock::MockCompositor},
    ///     config::RenderConfig,
    /// };
    /// use annotate_mcp_server::mcp::AnnotateMcpServer;
    ///
    /// let annotator = Annotator::new(Arc::new(MockCompositor::new()), RenderConfig::default());
    /// let server = AnnotateMcpServer::new(annotator);
    /// ```
    pub fn new(annotator: Annotator) -> Self {
        Self {
            tool_router: Self::tool_router(),
            annotator:   Arc::new(annotator),
        }
    }

    /// Creates a server backed by any compositor with the given config
    pub fn with_compositor(compositor: Arc<dyn ImageCompositor>, config: RenderConfig) -> Self {
        Self::new(Annotator::new(compositor, config))
    }

    /// Creates a server with a [`MockCompositor`] and default config
    ///
    /// Useful for tests: nothing is decoded or written.
    pub fn new_with_mock() -> Self {
        Self::with_compositor(Arc::new(MockCompositor::new()), RenderConfig::default())
    }

    /// The annotator every tool delegates to
    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    async fn run_annotate(
        &self,
        input_path: &str,
        output_path: Option<&str>,
        annotations: &[AnnotationDescriptor],
        theme: Option<String>,
        return_image: bool,
    ) -> Result<CallToolResult, McpError> {
        let input = PathBuf::from(input_path);
        let output = output_path.map(PathBuf::from);
        let options = AnnotateOptions { theme };

        let summary = self
            .annotator
            .annotate(&input, output.as_deref(), annotations, &options)
            .await
            .map_err(convert_annotate_error_to_mcp)?;

        if return_image {
            let bytes = read_output(&summary.output_path).await?;
            Ok(build_annotate_result(&summary, bytes.len() as u64, Some(&bytes)))
        } else {
            let size = tokio::fs::metadata(&summary.output_path)
                .await
                .map(|m| m.len())
                .unwrap_or(0);
            Ok(build_annotate_result(&summary, size, None))
        }
    }

    /// Draws a list of annotations onto a screenshot
    ///
    /// Annotation coordinates are source pixels. Unknown `type` values are
    /// skipped and reported in the summary; malformed annotation objects
    /// fail the call with `invalid_params` naming their index.
    ///
    /// # Examples
    ///
    /// Request:
    /// ```json
    /// {
    ///   "method": "tools/call",
    ///   "params": {
    ///     "name": "annotate_screenshot",
    ///     "arguments": {
    ///       "inputPath": "/tmp/login.png",
    ///       "annotations": [
    ///         {"type": "marker", "x": 120, "y": 80, "number": 1},
    ///         {"type": "arrow", "from": [300, 200], "to": [140, 90]}
    ///       ]
    ///     }
    ///   }
    /// }
    /// ```
    #[tool(
        description = "Draw annotations (markers, arrows, callouts, shapes, labels, highlights, \
                       blur, icons) onto a screenshot and save the result"
    )]
    pub async fn annotate_screenshot(
        &self,
        Parameters(params): Parameters<AnnotateScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        let annotations = parse_annotations(params.annotations)?;
        self.run_annotate(
            &params.input_path,
            params.output_path.as_deref(),
            &annotations,
            params.theme,
            params.return_image.unwrap_or(false),
        )
        .await
    }

    #[tool(description = "Add numbered step markers with optional labels and connecting lines")]
    pub async fn create_step_guide(
        &self,
        Parameters(params): Parameters<StepGuideParams>,
    ) -> Result<CallToolResult, McpError> {
        if params.steps.is_empty() {
            return Err(McpError::invalid_params(
                "Invalid parameter 'steps': at least one step is required",
                None,
            ));
        }
        let annotations = builders::step_guide(
            &params.steps,
            params.connect.unwrap_or(true),
            params.color.as_deref(),
        );
        debug!("Step guide: {} steps -> {} annotations", params.steps.len(), annotations.len());

        self.run_annotate(
            &params.input_path,
            params.output_path.as_deref(),
            &annotations,
            params.theme,
            params.return_image.unwrap_or(false),
        )
        .await
    }

    #[tool(description = "Emphasize one area with a rectangle, circle or highlight and an optional label")]
    pub async fn highlight_area(
        &self,
        Parameters(params): Parameters<HighlightAreaParams>,
    ) -> Result<CallToolResult, McpError> {
        let region = Region {
            x:      params.x,
            y:      params.y,
            width:  params.width,
            height: params.height,
        };
        let annotations = builders::highlight_area(
            region,
            params.shape.unwrap_or_default(),
            params.label.as_deref(),
            params.color.as_deref(),
        )
        .map_err(convert_annotate_error_to_mcp)?;

        self.run_annotate(
            &params.input_path,
            params.output_path.as_deref(),
            &annotations,
            params.theme,
            params.return_image.unwrap_or(false),
        )
        .await
    }

    #[tool(description = "Add a text callout box pointing at a location")]
    pub async fn add_callout(
        &self,
        Parameters(params): Parameters<AddCalloutParams>,
    ) -> Result<CallToolResult, McpError> {
        let annotation = builders::callout(
            params.x,
            params.y,
            &params.text,
            params.pointer.as_deref(),
            params.color.as_deref(),
            params.background.as_deref(),
        );

        self.run_annotate(
            &params.input_path,
            params.output_path.as_deref(),
            std::slice::from_ref(&annotation),
            params.theme,
            params.return_image.unwrap_or(false),
        )
        .await
    }

    #[tool(description = "Cover sensitive regions of a screenshot with blurred redaction boxes")]
    pub async fn blur_regions(
        &self,
        Parameters(params): Parameters<BlurRegionsParams>,
    ) -> Result<CallToolResult, McpError> {
        let annotations = builders::blur_regions(&params.regions, params.intensity)
            .map_err(convert_annotate_error_to_mcp)?;

        self.run_annotate(
            &params.input_path,
            params.output_path.as_deref(),
            &annotations,
            None,
            params.return_image.unwrap_or(false),
        )
        .await
    }

    /// Reports `{width, height, format}` for an image
    #[tool(description = "Get the dimensions and format of an image")]
    pub async fn get_image_info(
        &self,
        Parameters(params): Parameters<ImageInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        let meta = self
            .annotator
            .image_info(Path::new(&params.path))
            .await
            .map_err(convert_annotate_error_to_mcp)?;
        Ok(build_image_info_result(&meta))
    }

    /// Compiles annotations to SVG text for a canvas of the given size
    ///
    /// No file is read or written; the result is the raw document.
    #[tool(description = "Render annotations to an SVG overlay without touching any image")]
    pub async fn render_svg(
        &self,
        Parameters(params): Parameters<RenderSvgParams>,
    ) -> Result<CallToolResult, McpError> {
        let annotations = parse_annotations(params.annotations)?;
        let document = self
            .annotator
            .render_svg(params.width, params.height, &annotations, params.theme.as_deref())
            .map_err(convert_annotate_error_to_mcp)?;
        Ok(CallToolResult::success(vec![Content::text(document.markup)]))
    }

    /// Lists every style name a caller can use
    ///
    /// Response:
    /// ```json
    /// {
    ///   "palette": [{"name": "red", "hex": "#E53935"}, ...],
    ///   "defaultColor": "#E53935",
    ///   "themes": ["default", "minimal", "bold", "dark"],
    ///   "defaultTheme": "default",
    ///   "annotationTypes": ["marker", "arrow", ...],
    ///   "aliases": {"box": "rect", ...}
    /// }
    /// ```
    #[tool(description = "List colors, themes, annotation types and their aliases")]
    pub async fn list_styles(&self) -> Result<CallToolResult, McpError> {
        let palette: Vec<_> = PALETTE
            .iter()
            .map(|(name, hex)| serde_json::json!({"name": name, "hex": hex}))
            .collect();
        let types: Vec<_> = AnnotationKind::ALL.iter().map(AnnotationKind::as_str).collect();
        let aliases: serde_json::Map<String, serde_json::Value> = AnnotationKind::ALIASES
            .iter()
            .map(|(alias, kind)| (alias.to_string(), serde_json::Value::from(kind.as_str())))
            .collect();

        let styles = serde_json::json!({
            "palette": palette,
            "defaultColor": DEFAULT_COLOR,
            "themes": THEME_NAMES,
            "defaultTheme": self.annotator.config().default_theme,
            "annotationTypes": types,
            "aliases": aliases,
            "pointers": POINTERS,
            "markerStyles": MARKER_STYLES,
            "icons": ICONS,
        });

        let json_str = serde_json::to_string(&styles).map_err(|e| {
            McpError::internal_error(format!("Failed to serialize style list: {}", e), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(json_str)]))
    }
}

async fn read_output(path: &Path) -> Result<Vec<u8>, McpError> {
    tokio::fs::read(path).await.map_err(|e| {
        McpError::internal_error(
            format!("Failed to read annotated image {}: {}", path.display(), e),
            None,
        )
    })
}

impl Default for AnnotateMcpServer {
    fn default() -> Self {
        Self::new_with_mock()
    }
}

#[tool_handler]
impl ServerHandler for AnnotateMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Annotate screenshots: call list_styles for colors, themes and annotation types, \
                 then annotate_screenshot (or one of the convenience tools) with an inputPath."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
