//! Theme profiles: per-kind default fields
//!
//! A theme never overrides what a caller sets explicitly; it only fills
//! fields the descriptor leaves unset. Four themes are built in:
//! `default`, `minimal`, `bold` and `dark`.

use crate::model::{AnnotationDescriptor, AnnotationFields, AnnotationKind};

/// Names of the built-in themes
pub const THEME_NAMES: [&str; 4] = ["default", "minimal", "bold", "dark"];

/// A named table of per-kind defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    name:    &'static str,
    entries: Vec<(AnnotationKind, AnnotationFields)>,
}

impl Theme {
    /// Looks up a built-in theme by name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use annotate_core::render::theme::Theme;
    ///
    /// assert!(Theme::named("dark").is_some());
    /// assert!(Theme::named("neon").is_none());
    /// ```
    pub fn named(name: &str) -> Option<Theme> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Some(default_theme()),
            "minimal" => Some(minimal_theme()),
            "bold" => Some(bold_theme()),
            "dark" => Some(dark_theme()),
            _ => None,
        }
    }

    /// Builds a theme from an explicit table (used by tests and callers
    /// that ship their own profiles)
    pub fn custom(name: &'static str, entries: Vec<(AnnotationKind, AnnotationFields)>) -> Theme {
        Theme { name, entries }
    }

    /// Theme name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Defaults for `kind`, if this theme defines any
    pub fn defaults_for(&self, kind: AnnotationKind) -> Option<&AnnotationFields> {
        self.entries
            .iter()
            .find(|(entry_kind, _)| *entry_kind == kind)
            .map(|(_, fields)| fields)
    }
}

/// Applies theme defaults to a descriptor
///
/// Returns a new descriptor: theme fields first, then every field present
/// on the input overwrites them. Unknown types and kinds without an entry
/// come back unchanged.
///
/// # Examples
///
/// ```
/// use annotate_core::{
///     model::{AnnotationDescriptor, AnnotationFields},
///     render::theme::{merge_with_theme, Theme},
/// };
///
/// let marker = AnnotationDescriptor::new(
///     "marker",
///     AnnotationFields { color: Some("red".into()), ..Default::default() },
/// );
/// let merged = merge_with_theme(&marker, Theme::named("bold").as_ref());
/// assert_eq!(merged.fields.color.as_deref(), Some("red"));
/// assert_eq!(merged.fields.style.as_deref(), Some("badge"));
/// ```
pub fn merge_with_theme(
    descriptor: &AnnotationDescriptor,
    theme: Option<&Theme>,
) -> AnnotationDescriptor {
    let defaults = theme.and_then(|theme| {
        AnnotationKind::parse(&descriptor.kind).and_then(|kind| theme.defaults_for(kind))
    });

    match defaults {
        Some(defaults) => AnnotationDescriptor {
            kind:   descriptor.kind.clone(),
            fields: descriptor.fields.or(defaults),
        },
        None => descriptor.clone(),
    }
}

/// Builder for theme table rows
#[derive(Default)]
struct Defaults(AnnotationFields);

impl Defaults {
    fn color(mut self, value: &str) -> Self {
        self.0.color = Some(value.to_string());
        self
    }

    fn background(mut self, value: &str) -> Self {
        self.0.background = Some(value.to_string());
        self
    }

    fn style(mut self, value: &str) -> Self {
        self.0.style = Some(value.to_string());
        self
    }

    fn size(mut self, value: f64) -> Self {
        self.0.size = Some(value);
        self
    }

    fn font_size(mut self, value: f64) -> Self {
        self.0.font_size = Some(value);
        self
    }

    fn stroke_width(mut self, value: f64) -> Self {
        self.0.stroke_width = Some(value);
        self
    }

    fn opacity(mut self, value: f64) -> Self {
        self.0.opacity = Some(value);
        self
    }

    fn curve(mut self, value: f64) -> Self {
        self.0.curve = Some(value);
        self
    }

    fn radius(mut self, value: f64) -> Self {
        self.0.radius = Some(value);
        self
    }

    fn shadow(mut self, value: bool) -> Self {
        self.0.shadow = Some(value);
        self
    }

    fn row(self, kind: AnnotationKind) -> (AnnotationKind, AnnotationFields) {
        (kind, self.0)
    }
}

fn d() -> Defaults {
    Defaults::default()
}

fn default_theme() -> Theme {
    use AnnotationKind::*;
    Theme::custom("default", vec![
        d().color("red").style("filled").size(32.0).shadow(true).row(Marker),
        d().color("red").stroke_width(4.0).style("filled").shadow(true).row(Arrow),
        d().color("red").stroke_width(4.0).curve(50.0).shadow(true).row(CurvedArrow),
        d().color("red").background("white").font_size(14.0).shadow(true).row(Callout),
        d().color("red").stroke_width(3.0).row(Rect),
        d().color("red").stroke_width(3.0).row(Circle),
        d().color("white").background("red").font_size(16.0).row(Label),
        d().color("yellow").opacity(0.35).row(Highlight),
        d().radius(10.0).row(Blur),
        d().color("gray").stroke_width(2.0).row(Connector),
        d().size(32.0).shadow(true).row(Icon),
    ])
}

fn minimal_theme() -> Theme {
    use AnnotationKind::*;
    Theme::custom("minimal", vec![
        d().color("black").style("outline").size(28.0).shadow(false).row(Marker),
        d().color("black").stroke_width(2.0).style("open").shadow(false).row(Arrow),
        d().color("black").stroke_width(2.0).style("open").curve(40.0).shadow(false).row(CurvedArrow),
        d().color("black").background("white").font_size(13.0).shadow(false).row(Callout),
        d().color("black").stroke_width(2.0).shadow(false).row(Rect),
        d().color("black").stroke_width(2.0).shadow(false).row(Circle),
        d().color("black").font_size(14.0).row(Label),
        d().color("yellow").opacity(0.25).row(Highlight),
        d().radius(8.0).row(Blur),
        d().color("gray").stroke_width(1.0).row(Connector),
        d().size(24.0).shadow(false).row(Icon),
    ])
}

fn bold_theme() -> Theme {
    use AnnotationKind::*;
    Theme::custom("bold", vec![
        d().color("orange").style("badge").size(40.0).shadow(true).row(Marker),
        d().color("orange").stroke_width(6.0).style("filled").shadow(true).row(Arrow),
        d().color("orange").stroke_width(6.0).curve(60.0).shadow(true).row(CurvedArrow),
        d().color("orange").background("#FFF8E1").font_size(16.0).shadow(true).row(Callout),
        d().color("orange").stroke_width(5.0).shadow(true).row(Rect),
        d().color("orange").stroke_width(5.0).shadow(true).row(Circle),
        d().color("white").background("orange").font_size(18.0).row(Label),
        d().color("orange").opacity(0.3).row(Highlight),
        d().radius(14.0).row(Blur),
        d().color("orange").stroke_width(3.0).row(Connector),
        d().size(40.0).shadow(true).row(Icon),
    ])
}

fn dark_theme() -> Theme {
    use AnnotationKind::*;
    Theme::custom("dark", vec![
        d().color("cyan").style("filled").size(32.0).shadow(true).row(Marker),
        d().color("cyan").stroke_width(4.0).style("filled").shadow(true).row(Arrow),
        d().color("cyan").stroke_width(4.0).curve(50.0).shadow(true).row(CurvedArrow),
        d().color("cyan").background("#263238").font_size(14.0).shadow(true).row(Callout),
        d().color("cyan").stroke_width(3.0).row(Rect),
        d().color("cyan").stroke_width(3.0).row(Circle),
        d().color("white").background("#263238").font_size(16.0).row(Label),
        d().color("cyan").opacity(0.25).row(Highlight),
        d().radius(10.0).row(Blur),
        d().color("white").stroke_width(2.0).row(Connector),
        d().size(32.0).shadow(true).row(Icon),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_named_themes_exist() {
        for name in THEME_NAMES {
            let theme = Theme::named(name).expect("built-in theme should exist");
            assert_eq!(theme.name(), name);
        }
        assert!(Theme::named("DARK").is_some());
        assert!(Theme::named("sparkly").is_none());
    }

    #[test]
    fn test_every_theme_covers_every_kind() {
        for name in THEME_NAMES {
            let theme = Theme::named(name).unwrap();
            for kind in AnnotationKind::ALL {
                assert!(theme.defaults_for(kind).is_some(), "{name} is missing {kind}");
            }
        }
    }

    #[test]
    fn test_explicit_field_wins_over_theme() {
        let theme = Theme::custom("test", vec![(AnnotationKind::Marker, AnnotationFields {
            color: Some("green".to_string()),
            ..Default::default()
        })]);
        let input = AnnotationDescriptor::new("marker", AnnotationFields {
            x: Some(0.0),
            y: Some(0.0),
            number: Some(1),
            color: Some("red".to_string()),
            ..Default::default()
        });

        let merged = merge_with_theme(&input, Some(&theme));
        assert_eq!(merged.fields.color.as_deref(), Some("red"));
    }

    #[test]
    fn test_theme_fills_unset_fields_without_mutating_input() {
        let theme = Theme::named("default").unwrap();
        let input = AnnotationDescriptor::new("arrow", AnnotationFields {
            from: Some([0.0, 0.0]),
            to: Some([10.0, 10.0]),
            ..Default::default()
        });

        let merged = merge_with_theme(&input, Some(&theme));
        assert_eq!(merged.fields.stroke_width, Some(4.0));
        assert_eq!(merged.fields.color.as_deref(), Some("red"));
        assert_eq!(input.fields.stroke_width, None);
        assert_eq!(merged.fields.from, Some([0.0, 0.0]));
    }

    #[test]
    fn test_alias_uses_canonical_theme_entry() {
        let theme = Theme::named("bold").unwrap();
        let input = AnnotationDescriptor::new("box", AnnotationFields::default());
        let merged = merge_with_theme(&input, Some(&theme));
        assert_eq!(merged.kind, "box");
        assert_eq!(merged.fields.stroke_width, Some(5.0));
    }

    #[test]
    fn test_unknown_type_and_missing_theme_pass_through() {
        let theme = Theme::named("default").unwrap();
        let sparkle = AnnotationDescriptor::new("sparkle", AnnotationFields::default());
        assert_eq!(merge_with_theme(&sparkle, Some(&theme)), sparkle);

        let marker = AnnotationDescriptor::new("marker", AnnotationFields::default());
        assert_eq!(merge_with_theme(&marker, None), marker);
    }
}
