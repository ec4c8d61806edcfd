//! Visual style guess from how an icon's shapes are painted.

use crate::document::Element;

/// Shape elements that count towards the fill/stroke ratios.
const VISUAL_TAGS: &[&str] = &[
    "path", "circle", "rect", "ellipse", "polygon", "polyline", "line",
];

/// Style inferred from SVG content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStyle {
    Outline,
    Solid,
    Duotone,
}

impl ContentStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outline => "Outline",
            Self::Solid => "Solid",
            Self::Duotone => "Duotone",
        }
    }

    /// Classifies an icon by the share of filled and stroked shapes.
    ///
    /// A shape is filled unless `fill` is `none`/`transparent` (an absent
    /// fill paints black), and stroked when `stroke` is present and not
    /// `none`/`transparent`. Returns `None` when nothing decisive is found,
    /// including for icons with no shapes.
    pub fn detect(root: &Element) -> Option<Self> {
        let mut total = 0usize;
        let mut filled = 0usize;
        let mut stroked = 0usize;

        for el in root
            .descendants()
            .skip(1)
            .filter(|el| VISUAL_TAGS.iter().any(|tag| el.is(tag)))
        {
            total += 1;
            if el.attr("fill").is_none_or(is_painted) {
                filled += 1;
            }
            if el.attr("stroke").is_some_and(is_painted) {
                stroked += 1;
            }
        }

        if total == 0 {
            return None;
        }

        let fill_ratio = filled as f64 / total as f64;
        let stroke_ratio = stroked as f64 / total as f64;

        if stroke_ratio > 0.5 && fill_ratio < 0.3 {
            Some(Self::Outline)
        } else if fill_ratio > 0.5 {
            Some(Self::Solid)
        } else if fill_ratio > 0.0 && stroke_ratio > 0.0 {
            Some(Self::Duotone)
        } else {
            None
        }
    }
}

/// String form of [`ContentStyle::detect`]: `"Outline"`, `"Solid"`,
/// `"Duotone"` or `""`.
pub fn detect_style(root: &Element) -> &'static str {
    ContentStyle::detect(root).map_or("", ContentStyle::as_str)
}

fn is_painted(value: &str) -> bool {
    let value = value.trim();
    !value.eq_ignore_ascii_case("none") && !value.eq_ignore_ascii_case("transparent")
}
