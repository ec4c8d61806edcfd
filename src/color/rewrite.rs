//! `currentColor` rewriting for monochrome icons.
//!
//! Rewriting the paint of a monochrome icon to `currentColor` lets the host
//! recolor it by setting the CSS `color` of its container. Multicolor icons
//! are left exactly as they are.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::{analyze, style_paint};
use crate::document::{Element, Visit};

const CURRENT_COLOR: &str = "currentColor";

/// Elements that never paint directly; their subtrees are left alone.
const SKIPPED_SUBTREES: &[&str] = &[
    "style",
    "metadata",
    "title",
    "desc",
    "clipPath",
    "mask",
    "pattern",
    "linearGradient",
    "radialGradient",
];

/// Tags that get an explicit `fill` when they have none.
const SHAPE_TAGS: &[&str] = &["path", "circle", "rect", "ellipse", "polygon", "polyline"];

static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("CSS comment pattern is a valid regex"));

static CSS_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{}]+)\{([^}]*)\}").expect("CSS rule pattern is a valid regex"));

static CLASS_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.(-?[_a-zA-Z][_a-zA-Z0-9-]*)$").expect("class selector pattern is a valid regex")
});

static STYLE_PAINT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)((?:^|;)\s*(?:fill|stroke)\s*:\s*)([^;]+)")
        .expect("style paint pattern is a valid regex")
});

/// Rewrites a monochrome icon's paint to `currentColor`, in place.
///
/// Steps, in order:
///
/// 1. `fill`/`stroke` declared through simple `.class` rules in embedded
///    `<style>` blocks become attributes, and the resolved class names are
///    dropped from `class`.
/// 2. If the result is multicolor, nothing is changed at all.
/// 3. A `fill="none"` on the root `<svg>` is removed so fills can inherit.
/// 4. Every painted `fill`/`stroke` becomes `currentColor`, and shapes
///    without a fill of their own (nor an inherited one) get `fill="none"` if
///    they are stroked, `fill="currentColor"` otherwise.
///
/// Applying it twice gives the same tree as applying it once.
pub fn apply_current_color(root: &mut Element) {
    let mut resolved = root.clone();
    resolve_class_paint(&mut resolved);

    let verdict = analyze(&resolved);
    if !verdict.is_monochrome {
        debug!(colors = verdict.colors.len(), "multicolor icon left untouched");
        return;
    }

    *root = resolved;
    if root.attr("fill").is_some_and(|fill| fill.trim().eq_ignore_ascii_case("none")) {
        root.remove_attr("fill");
    }
    recolor(root);
}

/// Copy-returning form of [`apply_current_color`].
pub fn with_current_color(root: &Element) -> Element {
    let mut copy = root.clone();
    apply_current_color(&mut copy);
    copy
}

/// Paint inherited from ancestors.
#[derive(Debug, Clone, Copy, Default)]
struct Inherited {
    /// Some ancestor sets `fill`, whatever its value.
    fill: bool,
    /// The effective stroke paints something.
    stroke: bool,
}

fn recolor(root: &mut Element) {
    let mut ancestors: Vec<Inherited> = Vec::new();

    root.walk_mut(&mut |el| {
        ancestors.truncate(el.depth());
        let parent = ancestors.last().copied().unwrap_or_default();

        if SKIPPED_SUBTREES.iter().any(|tag| el.is(tag)) {
            return Visit::SkipChildren;
        }
        if el.is("defs") {
            // Definitions inherit from wherever they are used.
            ancestors.push(Inherited::default());
            return Visit::Continue;
        }

        let style = el.get("style").map(str::to_string);
        let declared = |property: &str| {
            style
                .as_deref()
                .and_then(|style| {
                    style_paint(style)
                        .filter(|(name, _)| name.eq_ignore_ascii_case(property))
                        .last()
                        .map(|(_, value)| value.to_string())
                })
        };
        let style_fill = declared("fill");
        let style_stroke = declared("stroke");

        let stroke = style_stroke.or_else(|| el.get("stroke").map(str::to_string));
        let stroke_active = stroke.as_deref().map_or(parent.stroke, is_painted);
        if el.get("stroke").is_some_and(is_painted) {
            el.set("stroke", CURRENT_COLOR);
        }

        let has_fill = style_fill.is_some() || el.has("fill");
        if el.get("fill").is_some_and(is_painted) {
            el.set("fill", CURRENT_COLOR);
        } else if !has_fill && !parent.fill && SHAPE_TAGS.iter().any(|tag| el.is(tag)) {
            el.set("fill", if stroke_active { "none" } else { CURRENT_COLOR });
        }

        if let Some(style) = style {
            let rewritten = rewrite_style_paint(&style);
            if rewritten != style {
                el.set("style", rewritten);
            }
        }

        ancestors.push(Inherited {
            fill: parent.fill || has_fill,
            stroke: stroke_active,
        });
        Visit::Continue
    });
}

fn rewrite_style_paint(style: &str) -> String {
    STYLE_PAINT_VALUE
        .replace_all(style, |captures: &Captures<'_>| {
            let value = &captures[2];
            if is_painted(value) {
                format!("{}{CURRENT_COLOR}", &captures[1])
            } else {
                captures[0].to_string()
            }
        })
        .into_owned()
}

fn is_painted(value: &str) -> bool {
    let value = value.trim();
    !value.eq_ignore_ascii_case("none") && !value.eq_ignore_ascii_case("transparent")
}

// ============================================================================
// Class resolution
// ============================================================================

/// Paint declarations per class name, in source order.
fn class_paint_rules(css: &str) -> BTreeMap<String, Vec<(String, String)>> {
    let css = CSS_COMMENT.replace_all(css, "");
    let mut rules: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();

    for rule in CSS_RULE.captures_iter(&css) {
        let declarations: Vec<(String, String)> = style_paint(&rule[2])
            .map(|(property, value)| (property.to_ascii_lowercase(), value.to_string()))
            .collect();
        if declarations.is_empty() {
            continue;
        }
        for selector in rule[1].split(',') {
            if let Some(class) = CLASS_SELECTOR.captures(selector.trim()) {
                rules
                    .entry(class[1].to_string())
                    .or_default()
                    .extend(declarations.iter().cloned());
            }
        }
    }
    rules
}

fn resolve_class_paint(root: &mut Element) {
    let css: Vec<String> = root.find_all("style").map(Element::text_content).collect();
    let rules = class_paint_rules(&css.join("\n"));
    if rules.is_empty() {
        return;
    }

    root.walk_mut(&mut |el| {
        let Some(class) = el.get("class").map(str::to_string) else {
            return Visit::Continue;
        };

        let mut remaining = Vec::new();
        let mut resolved = false;
        for name in class.split_whitespace() {
            match rules.get(name) {
                Some(declarations) => {
                    for (property, value) in declarations {
                        el.set(property.as_str(), value.as_str());
                    }
                    resolved = true;
                }
                None => remaining.push(name),
            }
        }

        if resolved {
            if remaining.is_empty() {
                el.remove("class");
            } else {
                el.set("class", remaining.join(" "));
            }
        }
        Visit::Continue
    });
}
