//! Raster previews of icon trees using resvg/usvg.
//!
//! Display trees use `currentColor` for their paint, so a preview sets the
//! root `color` attribute and lets the renderer resolve it, the same way a
//! browser resolves the CSS `color` property.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Rect, Tree};
use tracing::debug;

use crate::color::HexColor;
use crate::document::{Element, Layout};
use crate::error::SvgError;

/// View box used when nothing else gives the icon a size.
const FALLBACK_VIEW_BOX: &str = "0 0 100 100";

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// Theme
// ============================================================================

/// Background theme of the surface the icon is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The color `currentColor` resolves to on this theme.
    pub fn default_color(self) -> HexColor {
        match self {
            Theme::Light => HexColor::BLACK,
            Theme::Dark => HexColor::WHITE,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders an icon tree to a `size x size` bounded RGBA image.
///
/// The tree is cloned, its root `color` set to `color`, and the result
/// scaled to fit while preserving aspect ratio (the larger dimension will be
/// `size`).
pub fn render_icon(root: &Element, size: u32, color: HexColor) -> Result<RgbaImage, SvgError> {
    let mut svg = root.clone();
    svg.set_attr("color", color.to_string());
    ensure_view_box(&mut svg);

    let tree = parse_tree(&svg)?;

    let svg_size = tree.size();
    let scale = (size as f32) / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| SvgError::Render(format!("cannot allocate a {width}x{height} pixmap")))?;
    let transform = Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Gives the root a `viewBox` when it has none.
///
/// Uses `0 0 width height` when both dimensions are plain numbers, else the
/// rendered bounds of the content, else [`FALLBACK_VIEW_BOX`].
pub fn ensure_view_box(root: &mut Element) {
    if root.has_attr("viewBox") {
        return;
    }

    let dimension = |name: &str| {
        root.attr(name)
            .map(|value| value.trim().trim_end_matches("px"))
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| *value > 0.0)
    };
    let view_box = match (dimension("width"), dimension("height")) {
        (Some(width), Some(height)) => format!("0 0 {width} {height}"),
        _ => match content_bounds(root) {
            Some(bounds) => format!(
                "{} {} {} {}",
                bounds.x(),
                bounds.y(),
                bounds.width(),
                bounds.height()
            ),
            None => FALLBACK_VIEW_BOX.to_string(),
        },
    };
    debug!(%view_box, "Added missing viewBox");
    root.set_attr("viewBox", view_box);
}

/// usvg only accepts a root in the SVG namespace.
fn parse_tree(root: &Element) -> Result<Tree, SvgError> {
    let text = if root.has_attr("xmlns") {
        root.serialize(Layout::Preserve)
    } else {
        root.clone()
            .with_attr("xmlns", SVG_NAMESPACE)
            .serialize(Layout::Preserve)
    };
    let opts = Options::default();
    Tree::from_str(&text, &opts)
        .map_err(|err| SvgError::Render(err.to_string()))
}

/// Union of the stroke bounds of the top-level content.
fn content_bounds(root: &Element) -> Option<Rect> {
    let tree = parse_tree(root).ok()?;
    let mut bounds: Option<Rect> = None;
    for node in tree.root().children() {
        let rect = node.stroke_bounding_box();
        bounds = match bounds {
            Some(existing) => Rect::from_ltrb(
                existing.left().min(rect.left()),
                existing.top().min(rect.top()),
                existing.right().max(rect.right()),
                existing.bottom().max(rect.bottom()),
            ),
            None => Some(rect),
        };
    }
    bounds.filter(|rect| rect.width() > 0.0 && rect.height() > 0.0)
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (pixel, out) in pixmap.pixels().iter().zip(img.pixels_mut()) {
        // tiny_skia uses premultiplied alpha, we need to unpremultiply
        let color = pixel.demultiply();
        *out = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }

    img
}
