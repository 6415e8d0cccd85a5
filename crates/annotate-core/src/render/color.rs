//! Color resolution
//!
//! Maps symbolic palette names to hex values. Resolution never fails:
//! unrecognized names and literal colors pass through unchanged, and a
//! missing reference resolves to [`DEFAULT_COLOR`].

/// Color used when no reference is given
pub const DEFAULT_COLOR: &str = "#E53935";

/// Symbolic palette, name to `#RRGGBB`
pub const PALETTE: [(&str, &str); 13] = [
    ("red", "#E53935"),
    ("blue", "#1E88E5"),
    ("green", "#43A047"),
    ("yellow", "#FDD835"),
    ("orange", "#FB8C00"),
    ("purple", "#8E24AA"),
    ("pink", "#D81B60"),
    ("teal", "#00897B"),
    ("cyan", "#00ACC1"),
    ("gray", "#757575"),
    ("grey", "#757575"),
    ("black", "#212121"),
    ("white", "#FFFFFF"),
];

/// Per-channel amount subtracted for gradient end colors
pub const GRADIENT_DARKEN_DELTA: u8 = 0x30;

/// Looks up a palette name (case-insensitive)
pub fn palette_lookup(name: &str) -> Option<&'static str> {
    let name = name.trim();
    PALETTE
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, hex)| *hex)
}

/// Resolves a color reference to a renderable color string
///
/// # Examples
///
/// ```
/// use annotate_core::render::color::resolve_color;
///
/// assert_eq!(resolve_color(Some("blue")), "#1E88E5");
/// assert_eq!(resolve_color(Some("#123456")), "#123456");
/// assert_eq!(resolve_color(None), "#E53935");
/// ```
pub fn resolve_color(reference: Option<&str>) -> String {
    match reference.map(str::trim) {
        None | Some("") => DEFAULT_COLOR.to_string(),
        Some(value) => palette_lookup(value)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
    }
}

/// Resolves `reference`, or `fallback` when the reference is absent
pub fn resolve_color_or(reference: Option<&str>, fallback: &str) -> String {
    match reference.map(str::trim) {
        None | Some("") => resolve_color(Some(fallback)),
        other => resolve_color(other),
    }
}

/// Parses `#RGB` or `#RRGGBB` into channels
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some((
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let expand = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

/// Darkens a hex color by `delta` per channel (saturating)
///
/// Non-hex colors (named CSS colors, `rgb()`, ...) are returned unchanged.
///
/// # Examples
///
/// ```
/// use annotate_core::render::color::darken;
///
/// assert_eq!(darken("#1E88E5", 0x30), "#0058B5");
/// assert_eq!(darken("tomato", 0x30), "tomato");
/// ```
pub fn darken(color: &str, delta: u8) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => format!(
            "#{:02X}{:02X}{:02X}",
            r.saturating_sub(delta),
            g.saturating_sub(delta),
            b.saturating_sub(delta)
        ),
        None => color.to_string(),
    }
}

/// Picks a readable text color for the given background
///
/// Uses Rec. 601 luma; unparseable backgrounds get dark text.
pub fn contrasting_text_color(background: &str) -> &'static str {
    match parse_hex(background) {
        Some((r, g, b)) => {
            let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
            if luma < 140.0 { "#FFFFFF" } else { "#212121" }
        }
        None => "#212121",
    }
}
