//! SVG markup primitives shared by the shape compilers
//!
//! - [`Fragment`]: the `(defs, element)` pair every compiler returns
//! - [`RenderContext`]: per-document id allocation and font settings
//! - [`escape_xml`] and [`Num`]: text escaping and compact number output

use std::fmt;

use crate::config::DEFAULT_FONT_FAMILY;

/// Compiled output of one annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Reusable definitions (gradients, filters, markers); may be empty
    pub defs:    String,
    /// Drawable elements
    pub element: String,
}

impl Fragment {
    /// A fragment with definitions
    pub fn new(defs: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            defs:    defs.into(),
            element: element.into(),
        }
    }

    /// A fragment with no definitions
    pub fn element(element: impl Into<String>) -> Self {
        Self {
            defs:    String::new(),
            element: element.into(),
        }
    }
}

/// State threaded through one document build
///
/// Owns the id counter, so ids restart at 1 for every document and never
/// leak between builds.
#[derive(Debug, Clone)]
pub struct RenderContext {
    next_id:     u32,
    font_family: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY)
    }
}

impl RenderContext {
    /// Creates a context whose text elements use `font_family`
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            next_id:     0,
            font_family: font_family.into(),
        }
    }

    /// Returns a fresh `prefix-N` id, unique within this document
    ///
    /// # Examples
    ///
    /// ```
    /// use annotate_core::render::markup::RenderContext;
    ///
    /// let mut ctx = RenderContext::default();
    /// assert_eq!(ctx.next_id("shadow"), "shadow-1");
    /// assert_eq!(ctx.next_id("grad"), "grad-2");
    /// ```
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    /// Restarts id allocation at 1
    pub fn reset(&mut self) {
        self.next_id = 0;
    }

    /// Font stack for text elements, already attribute-escaped
    pub fn font_family(&self) -> String {
        escape_xml(&self.font_family)
    }

    /// Emits a drop-shadow filter definition and returns `(defs, filter_attr)`
    ///
    /// `filter_attr` is ` filter="url(#id)"` with a leading space, ready to
    /// be spliced into an element.
    pub fn drop_shadow(&mut self) -> (String, String) {
        let id = self.next_id("shadow");
        let defs = format!(
            r##"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="2" dy="2" stdDeviation="2" flood-color="#000000" flood-opacity="0.35"/></filter>"##
        );
        (defs, format!(r#" filter="url(#{id})""#))
    }

    /// Same as [`drop_shadow`](Self::drop_shadow) but empty when `enabled`
    /// is false
    pub fn optional_shadow(&mut self, enabled: bool) -> (String, String) {
        if enabled {
            self.drop_shadow()
        } else {
            (String::new(), String::new())
        }
    }
}

/// Escapes text for embedding in element content or attribute values
///
/// Control characters that XML 1.0 forbids are dropped; tab, LF and CR
/// are kept.
///
/// # Examples
///
/// ```
/// use annotate_core::render::markup::escape_xml;
///
/// assert_eq!(escape_xml("<A & B>"), "&lt;A &amp; B&gt;");
/// ```
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            // not allowed anywhere in an XML 1.0 document
            c if c < '\u{20}' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Caller-supplied string written into an attribute value, escaped
///
/// Colors pass through resolution verbatim, so anything that reaches an
/// attribute goes through this wrapper.
///
/// ```
/// use annotate_core::render::markup::Attr;
///
/// assert_eq!(format!(r#"fill="{}""#, Attr("red\" x=\"1")), r#"fill="red&quot; x=&quot;1""#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr<'a>(pub &'a str);

impl fmt::Display for Attr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape_xml(self.0))
    }
}

/// Compact number formatting for coordinates
///
/// Integers print without a fractional part, everything else with at most
/// two decimals and no trailing zeros. Non-finite values print as `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.0.is_finite() { self.0 } else { 0.0 };
        let rounded = (value * 100.0).round() / 100.0;
        if rounded.fract() == 0.0 {
            // -0.0 prints as "0"
            write!(f, "{}", rounded as i64)
        } else {
            let text = format!("{:.2}", rounded);
            write!(f, "{}", text.trim_end_matches('0'))
        }
    }
}

/// `stroke-dasharray` attribute (with leading space) scaled to the stroke
/// width, or an empty string when `dashed` is false
pub fn dash_attr(dashed: bool, stroke_width: f64) -> String {
    if dashed {
        format!(
            r#" stroke-dasharray="{},{}""#,
            Num(stroke_width * 3.0),
            Num(stroke_width * 2.0)
        )
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml_all_entities() {
        assert_eq!(escape_xml(r#"a&b<c>"d"'e'"#), "a&amp;b&lt;c&gt;&quot;d&quot;&apos;e&apos;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_escape_xml_drops_forbidden_control_chars() {
        assert_eq!(escape_xml("tab\u{1}bell\u{7}"), "tabbell");
        assert_eq!(escape_xml("a\tb\nc\rd"), "a\tb\nc\rd");
        assert_eq!(escape_xml("x\u{FFFF}y\u{FFFE}\u{0}"), "xy");
    }

    #[test]
    fn test_attr_escapes_quotes() {
        assert_eq!(Attr(r#"rgb(1,2,3)" x="1"#).to_string(), "rgb(1,2,3)&quot; x=&quot;1");
        assert_eq!(Attr("#E53935").to_string(), "#E53935");
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(Num(50.0).to_string(), "50");
        assert_eq!(Num(12.5).to_string(), "12.5");
        assert_eq!(Num(1.0 / 3.0).to_string(), "0.33");
        assert_eq!(Num(-4.25).to_string(), "-4.25");
        assert_eq!(Num(-0.001).to_string(), "0");
        assert_eq!(Num(f64::NAN).to_string(), "0");
        assert_eq!(Num(2.999).to_string(), "3");
    }

    #[test]
    fn test_ids_are_sequential_and_resettable() {
        let mut ctx = RenderContext::default();
        assert_eq!(ctx.next_id("grad"), "grad-1");
        assert_eq!(ctx.next_id("grad"), "grad-2");
        ctx.reset();
        assert_eq!(ctx.next_id("arrowhead"), "arrowhead-1");
    }

    #[test]
    fn test_drop_shadow_references_its_filter() {
        let mut ctx = RenderContext::default();
        let (defs, attr) = ctx.drop_shadow();
        assert!(defs.contains(r#"<filter id="shadow-1""#));
        assert!(defs.contains("feDropShadow"));
        assert_eq!(attr, r#" filter="url(#shadow-1)""#);
    }

    #[test]
    fn test_optional_shadow_disabled_allocates_nothing() {
        let mut ctx = RenderContext::default();
        let (defs, attr) = ctx.optional_shadow(false);
        assert!(defs.is_empty());
        assert!(attr.is_empty());
        assert_eq!(ctx.next_id("x"), "x-1");
    }

    #[test]
    fn test_dash_attr() {
        assert_eq!(dash_attr(true, 2.0), r#" stroke-dasharray="6,4""#);
        assert_eq!(dash_attr(false, 2.0), "");
    }

    #[test]
    fn test_font_family_is_escaped() {
        let ctx = RenderContext::new(r#""Fira Sans", sans-serif"#);
        assert_eq!(ctx.font_family(), "&quot;Fira Sans&quot;, sans-serif");
    }
}
