//! MCP content builders for annotation results
//!
//! Converts an [`AnnotateSummary`] into an MCP tool result: an optional
//! inline image (for immediate preview), a file reference for the written
//! output and a JSON summary block.
//!
//! # Examples
//!
//! ```
//! use std::path::PathBuf;
//!
//! use annotate_core::model::AnnotateSummary;
//! use annotate_mcp_server::mcp_content::build_annotate_result;
//!
//! let summary = AnnotateSummary {
//!     output_path:      PathBuf::from("/tmp/shot-annotated.png"),
//!     width:            1920,
//!     height:           1080,
//!     annotation_count: 3,
//!     rendered:         3,
//!     skipped:          vec![],
//! };
//!
//! let result = build_annotate_result(&summary, 4096, None);
//! assert!(!result.is_error.unwrap_or(false));
//! assert_eq!(result.content.len(), 2); // ResourceLink + Summary
//! ```

use std::path::Path;

use annotate_core::{
    model::{AnnotateSummary, ImageMetadata},
    util::encode::OutputFormat,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rmcp::model::{CallToolResult, Content};

/// Builds MCP image content from encoded image bytes
///
/// # Examples
///
/// ```
/// use annotate_mcp_server::mcp_content::build_image_content;
///
/// let png_data = vec![137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13];
/// let content = build_image_content(&png_data, "image/png");
/// assert!(content.as_image().is_some());
/// ```
pub fn build_image_content(data: &[u8], mime_type: &str) -> Content {
    Content::image(STANDARD.encode(data), mime_type)
}

/// Builds a markdown file reference for a written image
///
/// Contains a `file://` URI, the file name, an RFC 3339 timestamp, the
/// size and the MIME type.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
///
/// use annotate_mcp_server::mcp_content::build_resource_link;
///
/// let path = PathBuf::from("/tmp/login-annotated.png");
/// let content = build_resource_link(&path, "image/png", 12345);
/// assert!(content.as_text().unwrap().text.contains("file:///tmp/"));
/// ```
pub fn build_resource_link(path: &Path, mime_type: &str, size: u64) -> Content {
    let path_str = path.to_string_lossy();

    #[cfg(target_os = "windows")]
    let uri = format!("file:///{}", path_str.replace('\\', "/"));

    #[cfg(not(target_os = "windows"))]
    let uri = format!("file://{}", path_str);

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("annotated.png");

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    Content::text(format!(
        "## Annotated Image\n\n**File:** [{}]({})\n**Timestamp:** {}\n**Size:** {} \
         bytes\n**MIME Type:** {}\n\n_The annotated image has been saved to the path above._",
        filename, uri, timestamp, size, mime_type
    ))
}

fn json_block(title: &str, value: &serde_json::Value) -> Content {
    let body = serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| r#"{"error": "Failed to serialize summary"}"#.to_string());
    Content::text(format!("## {}\n\n```json\n{}\n```", title, body))
}

/// Builds the result of an annotating tool call
///
/// Content order: inline image (only when `image_data` is given), file
/// reference, summary JSON. The MIME type follows the output extension.
pub fn build_annotate_result(
    summary: &AnnotateSummary,
    file_size: u64,
    image_data: Option<&[u8]>,
) -> CallToolResult {
    let format = OutputFormat::from_path(&summary.output_path);
    let mime_type = format.mime_type();

    let mut content = Vec::with_capacity(3);
    if let Some(data) = image_data {
        content.push(build_image_content(data, mime_type));
    }
    content.push(build_resource_link(&summary.output_path, mime_type, file_size));

    let skipped: Vec<_> = summary
        .skipped
        .iter()
        .map(|s| serde_json::json!({"index": s.index, "type": s.type_name}))
        .collect();

    let metadata = serde_json::json!({
        "outputPath": summary.output_path.to_string_lossy(),
        "dimensions": [summary.width, summary.height],
        "width": summary.width,
        "height": summary.height,
        "format": format.as_str(),
        "sizeBytes": file_size,
        "annotationCount": summary.annotation_count,
        "rendered": summary.rendered,
        "skipped": skipped,
    });
    content.push(json_block("Annotation Summary", &metadata));

    CallToolResult::success(content)
}

/// Builds the `get_image_info` result: a single JSON text block
pub fn build_image_info_result(meta: &ImageMetadata) -> CallToolResult {
    let json = serde_json::to_string(meta)
        .unwrap_or_else(|_| r#"{"error": "Failed to serialize image info"}"#.to_string());
    CallToolResult::success(vec![Content::text(json)])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use annotate_core::model::SkippedAnnotation;

    fn summary(path: &str) -> AnnotateSummary {
        AnnotateSummary {
            output_path:      PathBuf::from(path),
            width:            800,
            height:           600,
            annotation_count: 4,
            rendered:         3,
            skipped:          vec![SkippedAnnotation {
                index:     2,
                type_name: "sparkle".to_string(),
            }],
        }
    }

    fn summary_json(result: &CallToolResult) -> serde_json::Value {
        let text = &result.content.last().unwrap().as_text().unwrap().text;
        let start = text.find("```json").unwrap() + 7;
        let end = start + text[start..].find("```").unwrap();
        serde_json::from_str(text[start..end].trim()).unwrap()
    }

    #[test]
    fn test_build_image_content_base64_encoding() {
        let data = b"test data";
        let content = build_image_content(data, "image/png");

        let image = content.as_image().unwrap();
        assert_eq!(STANDARD.decode(&image.data).unwrap(), data);
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_build_resource_link_contents() {
        let path = PathBuf::from("/tmp/login-annotated.webp");
        let content = build_resource_link(&path, "image/webp", 54321);
        let text = &content.as_text().unwrap().text;

        #[cfg(not(target_os = "windows"))]
        assert!(text.contains("file:///tmp/login-annotated.webp"));
        assert!(text.contains("login-annotated.webp"));
        assert!(text.contains("image/webp"));
        assert!(text.contains("54321"));
        assert!(text.starts_with("##"));
    }

    #[test]
    fn test_annotate_result_without_image() {
        let result = build_annotate_result(&summary("/tmp/out.png"), 100, None);

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.content.len(), 2);
        assert!(result.content[0].as_text().is_some());
        assert!(result.content.iter().all(|c| c.as_image().is_none()));
    }

    #[test]
    fn test_annotate_result_with_image_comes_first() {
        let result = build_annotate_result(&summary("/tmp/out.jpg"), 3, Some(&[1, 2, 3]));

        assert_eq!(result.content.len(), 3);
        let image = result.content[0].as_image().unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_annotate_result_summary_fields() {
        let result = build_annotate_result(&summary("/tmp/out.webp"), 2048, None);
        let json = summary_json(&result);

        assert_eq!(json["width"], 800);
        assert_eq!(json["height"], 600);
        assert_eq!(json["annotationCount"], 4);
        assert_eq!(json["rendered"], 3);
        assert_eq!(json["format"], "webp");
        assert_eq!(json["sizeBytes"], 2048);
        assert_eq!(json["skipped"][0]["type"], "sparkle");
        assert_eq!(json["skipped"][0]["index"], 2);
    }

    #[test]
    fn test_image_info_result_is_plain_json() {
        let meta = ImageMetadata {
            width:  320,
            height: 200,
            format: "png".to_string(),
        };
        let result = build_image_info_result(&meta);
        let parsed: ImageMetadata =
            serde_json::from_str(&result.content[0].as_text().unwrap().text).unwrap();
        assert_eq!(parsed, meta);
    }
}
