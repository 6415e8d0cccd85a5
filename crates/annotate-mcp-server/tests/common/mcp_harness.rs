//! MCP Server Test Harness
//!
//! Reusable fixtures for exercising the annotation MCP server end to end
//! with a real `ResvgCompositor` and temporary source images.
//!
//! # Usage
//!
//! ```rust
//! use common::mcp_harness::{ContentValidator, McpTestContext};
//!
//! #[tokio::test]
//! async fn test_annotate() {
//!     let ctx = McpTestContext::with_source(200, 100);
//!     let result = ctx.annotate(single_circle(), true).await.unwrap();
//!     let parts = ContentValidator::validate_annotate_result(&result, true).unwrap();
//!     assert!(ContentValidator::is_valid_png(&parts.image_bytes.unwrap()));
//! }
//! ```

use std::{path::PathBuf, sync::Arc};

use annotate_core::{
    composite::{Annotator, ResvgCompositor},
    config::RenderConfig,
};
use annotate_mcp_server::mcp::{AnnotateMcpServer, AnnotateScreenshotParams};
use annotate_test_utils::fixtures::FixtureImage;
use base64::{Engine, engine::general_purpose::STANDARD};
use resvg::usvg;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorData},
};

/// Test fixture for MCP server integration tests
///
/// Owns a server with a real compositor (no system fonts, so runs are
/// deterministic) and a temp directory holding one white source image.
pub struct McpTestContext {
    pub server:  AnnotateMcpServer,
    pub fixture: FixtureImage,
}

impl McpTestContext {
    /// Context with a `width` x `height` PNG source
    pub fn with_source(width: u32, height: u32) -> Self {
        Self::with_named_source("source.png", width, height)
    }

    /// Context whose source format follows `name`'s extension
    pub fn with_named_source(name: &str, width: u32, height: u32) -> Self {
        let fontdb = Arc::new(usvg::fontdb::Database::new());
        let compositor = Arc::new(ResvgCompositor::with_fontdb(fontdb));
        let server = AnnotateMcpServer::new(Annotator::new(compositor, RenderConfig::default()));
        Self {
            server,
            fixture: FixtureImage::with_name(name, width, height),
        }
    }

    /// Source image path as the string a client would send
    pub fn input_path(&self) -> String {
        self.fixture.path().to_string_lossy().into_owned()
    }

    /// A path inside the fixture directory
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.fixture.output(name)
    }

    // --- Tool invocation helpers ---

    /// Calls annotate_screenshot on the fixture image
    pub async fn annotate(
        &self,
        annotations: serde_json::Value,
        return_image: bool,
    ) -> Result<CallToolResult, ErrorData> {
        self.annotate_with(AnnotateScreenshotParams {
            input_path:   self.input_path(),
            output_path:  None,
            annotations:  serde_json::from_value(annotations).expect("annotations must be an array"),
            theme:        None,
            return_image: Some(return_image),
        })
        .await
    }

    /// Calls annotate_screenshot with full parameters
    pub async fn annotate_with(
        &self,
        params: AnnotateScreenshotParams,
    ) -> Result<CallToolResult, ErrorData> {
        self.server.annotate_screenshot(Parameters(params)).await
    }
}

// ============================================================================
// Content Validators
// ============================================================================

/// Parsed components of an annotate result
#[derive(Debug)]
pub struct AnnotateResultParts {
    /// Decoded inline image, when requested
    pub image_bytes: Option<Vec<u8>>,
    /// file:// URI extracted from the file reference
    pub file_uri:    String,
    /// Parsed summary JSON
    pub summary:     serde_json::Value,
}

/// Validation utilities for MCP tool responses
pub struct ContentValidator;

impl ContentValidator {
    /// Decodes the inline image (first content item) and checks its MIME type
    pub fn validate_base64_image(
        result: &CallToolResult,
        expected_mime: &str,
    ) -> Result<Vec<u8>, String> {
        let image = result
            .content
            .first()
            .ok_or("Missing image content")?
            .as_image()
            .ok_or("First content is not an image")?;

        if image.mime_type != expected_mime {
            return Err(format!(
                "Expected MIME type '{}', got '{}'",
                expected_mime, image.mime_type
            ));
        }

        STANDARD
            .decode(&image.data)
            .map_err(|e| format!("Invalid base64: {}", e))
    }

    /// Extracts the file:// URI from the text item at `index`
    pub fn validate_file_uri(result: &CallToolResult, index: usize) -> Result<String, String> {
        let text = result
            .content
            .get(index)
            .ok_or("Missing file reference content")?
            .as_text()
            .ok_or("File reference is not text")?;

        let uri_start = text
            .text
            .find("file://")
            .ok_or("File reference missing file:// URI")?;

        let rest = &text.text[uri_start..];
        let uri_end = rest
            .find(')')
            .or_else(|| rest.find('\n'))
            .unwrap_or(rest.len());

        Ok(rest[..uri_end].to_string())
    }

    /// Parses the fenced JSON block of the last content item
    pub fn validate_summary(result: &CallToolResult) -> Result<serde_json::Value, String> {
        let text = result
            .content
            .last()
            .ok_or("Missing summary content")?
            .as_text()
            .ok_or("Summary is not text")?;

        let start = text.text.find("```json").ok_or("No JSON block in summary")? + 7;
        let end = text.text[start..]
            .find("```")
            .map(|i| start + i)
            .ok_or("Unclosed JSON code block")?;

        serde_json::from_str(text.text[start..end].trim()).map_err(|e| format!("Invalid JSON: {}", e))
    }

    /// Validates the full annotate result layout
    ///
    /// With an image: image, file reference, summary. Without: file
    /// reference, summary.
    pub fn validate_annotate_result(
        result: &CallToolResult,
        expect_image: bool,
    ) -> Result<AnnotateResultParts, String> {
        let expected_len = if expect_image { 3 } else { 2 };
        if result.content.len() != expected_len {
            return Err(format!(
                "Expected {} content items, got {}",
                expected_len,
                result.content.len()
            ));
        }

        if result.is_error.unwrap_or(false) {
            return Err("Result is marked as error".to_string());
        }

        let summary = Self::validate_summary(result)?;
        let format = summary["format"].as_str().ok_or("Missing format field")?;
        let mime = format!("image/{}", format);

        let image_bytes = if expect_image {
            Some(Self::validate_base64_image(result, &mime)?)
        } else {
            None
        };
        let file_uri = Self::validate_file_uri(result, expected_len - 2)?;

        Ok(AnnotateResultParts {
            image_bytes,
            file_uri,
            summary,
        })
    }

    /// PNG files start with: 0x89 0x50 0x4E 0x47 0x0D 0x0A 0x1A 0x0A
    pub fn is_valid_png(bytes: &[u8]) -> bool {
        bytes.len() >= 8 && bytes.starts_with(&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a])
    }

    /// JPEG files start with the SOI marker 0xFF 0xD8
    pub fn is_valid_jpeg(bytes: &[u8]) -> bool {
        bytes.starts_with(&[0xff, 0xd8])
    }
}

/// Parses a single-JSON-text tool response (get_image_info, list_styles)
pub fn parse_json_text(result: &CallToolResult) -> Result<serde_json::Value, String> {
    let text = result
        .content
        .first()
        .and_then(|c| c.as_text())
        .ok_or("Missing text content")?;

    serde_json::from_str(&text.text).map_err(|e| format!("Invalid JSON: {}", e))
}
