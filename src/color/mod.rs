//! Color normalization and the monochrome/multicolor verdict.
//!
//! An icon is safe to recolor through `currentColor` only if everything it
//! paints uses a single color. [`analyze`] walks the tree, normalizes every
//! `fill`/`stroke` it finds (attributes and inline `style` declarations) to a
//! [`HexColor`] and reports the distinct set in a [`ColorVerdict`].
//!
//! Gradients and patterns always make an icon multicolor, whatever literal
//! colors they use.
//!
//! # Example
//!
//! ```
//! use svgaze::color::{analyze_text, HexColor};
//!
//! let verdict = analyze_text(r#"<svg><path fill="red"/><path stroke="rgb(255, 0, 0)"/></svg>"#);
//! assert!(verdict.is_monochrome);
//! assert!(verdict.colors.contains(&HexColor::new(255, 0, 0)));
//! ```

pub mod rewrite;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use palette::Srgb;
use regex::Regex;
use tracing::warn;

use crate::document::{Element, SvgDocument, Visit};

pub use rewrite::{apply_current_color, with_current_color};

/// Elements whose presence forces a multicolor verdict.
const COMPLEX_PAINT_TAGS: &[&str] = &["linearGradient", "radialGradient", "pattern"];

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+)\s*[,\s]\s*(\d+)\s*[,\s]\s*(\d+)")
        .expect("rgb() pattern is a valid regex")
});

static STYLE_PAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*(fill|stroke)\s*:\s*([^;]+)")
        .expect("style declaration pattern is a valid regex")
});

// ============================================================================
// HexColor
// ============================================================================

/// An opaque sRGB color, displayed as uppercase `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalizes a CSS color value.
    ///
    /// Understands CSS named colors, `#rgb`/`#rrggbb` hex (an alpha digit
    /// group is ignored) and `rgb()`/`rgba()` with integer channels. Returns
    /// `None` for anything else, including `none`, `transparent` and
    /// `currentColor`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if value.is_empty() {
            return None;
        }

        if let Some(hex) = value.strip_prefix('#') {
            if !hex.is_ascii() {
                return None;
            }
            let hex = match hex.len() {
                4 => hex.get(..3)?,
                8 => hex.get(..6)?,
                _ => hex,
            };
            return Srgb::<u8>::from_str(hex).ok().map(Self::from);
        }

        if value.starts_with("rgb") {
            let captures = RGB_FUNCTION.captures(&value)?;
            let channel = |index: usize| -> Option<u8> {
                let raw: u32 = captures.get(index)?.as_str().parse().ok()?;
                Some(raw.min(255) as u8)
            };
            return Some(Self::new(channel(1)?, channel(2)?, channel(3)?));
        }

        palette::named::from_str(&value).map(Self::from)
    }

    /// Shortest hex form: `#abc` when every channel repeats a digit.
    pub fn to_short_hex(self) -> String {
        let shortenable = [self.r, self.g, self.b]
            .iter()
            .all(|channel| channel >> 4 == channel & 0x0f);
        if shortenable {
            format!("#{:x}{:x}{:x}", self.r & 0x0f, self.g & 0x0f, self.b & 0x0f)
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }
}

impl From<Srgb<u8>> for HexColor {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

impl From<HexColor> for Srgb<u8> {
    fn from(color: HexColor) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Returns false for paint values that draw nothing or defer to `color`.
pub(crate) fn is_literal_paint(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !["none", "transparent", "currentcolor"]
            .iter()
            .any(|keyword| value.eq_ignore_ascii_case(keyword))
}

/// `fill`/`stroke` declarations of an inline `style` attribute.
pub(crate) fn style_paint(style: &str) -> impl Iterator<Item = (&str, &str)> {
    STYLE_PAINT.captures_iter(style).filter_map(|captures| {
        let property = captures.get(1)?.as_str();
        let value = captures.get(2)?.as_str().trim();
        Some((property, value))
    })
}

// ============================================================================
// Analysis
// ============================================================================

/// The outcome of color analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorVerdict {
    /// True when the icon can be recolored through `currentColor`.
    pub is_monochrome: bool,
    /// Every distinct literal paint color found.
    pub colors: BTreeSet<HexColor>,
    /// A gradient or pattern was present.
    pub has_complex_paint: bool,
}

impl ColorVerdict {
    /// The verdict used when analysis cannot run.
    pub fn fallback() -> Self {
        Self {
            is_monochrome: true,
            ..Default::default()
        }
    }
}

/// Classifies the tree under `root` as monochrome or multicolor.
pub fn analyze(root: &Element) -> ColorVerdict {
    if root.contains_any(COMPLEX_PAINT_TAGS) {
        return ColorVerdict {
            is_monochrome: false,
            colors: collect_colors(root),
            has_complex_paint: true,
        };
    }

    let colors = collect_colors(root);
    ColorVerdict {
        is_monochrome: colors.len() <= 1,
        colors,
        has_complex_paint: false,
    }
}

/// Parses `svg_text` and runs [`analyze`] on it.
///
/// Text that does not parse is logged and treated as monochrome.
pub fn analyze_text(svg_text: &str) -> ColorVerdict {
    match SvgDocument::parse(svg_text) {
        Ok(doc) => analyze(&doc.root),
        Err(err) => {
            warn!(error = %err, "color analysis skipped, assuming monochrome");
            ColorVerdict::fallback()
        }
    }
}

fn collect_colors(root: &Element) -> BTreeSet<HexColor> {
    let mut colors = BTreeSet::new();
    root.walk(&mut |el, _| {
        let attributes = ["fill", "stroke"]
            .into_iter()
            .filter_map(|name| el.attr(name));
        let declarations = el
            .attr("style")
            .into_iter()
            .flat_map(|style| style_paint(style).map(|(_, value)| value));

        colors.extend(
            attributes
                .chain(declarations)
                .filter(|value| is_literal_paint(value))
                .filter_map(HexColor::parse),
        );
        Visit::Continue
    });
    colors
}
