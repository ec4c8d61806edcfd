//! Tree-level reductions: stripping markup that does not render and
//! simplifying attribute values.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::color::{style_paint, HexColor};
use crate::document::{collapse_whitespace, local_name, Element, Node, PrologItem, SvgDocument, Visit};

/// Namespaces written by editors and asset pipelines, never needed to render.
const EDITOR_NAMESPACES: &[&str] = &[
    "http://creativecommons.org/ns#",
    "http://inkscape.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://ns.adobe.com/AdobeIllustrator/10.0/",
    "http://ns.adobe.com/AdobeSVGViewerExtensions/3.0/",
    "http://ns.adobe.com/Extensibility/1.0/",
    "http://ns.adobe.com/Flows/1.0/",
    "http://ns.adobe.com/GenericCustomNamespace/1.0/",
    "http://ns.adobe.com/Graphs/1.0/",
    "http://ns.adobe.com/ImageReplacement/1.0/",
    "http://ns.adobe.com/SaveForWeb/1.0/",
    "http://ns.adobe.com/Variables/1.0/",
    "http://ns.adobe.com/XPath/1.0/",
    "http://purl.org/dc/elements/1.1/",
    "http://schemas.microsoft.com/visio/2003/SVGExtensions/",
    "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://taptrix.com/vectorillustrator/svg_extensions",
    "http://www.bohemiancoding.com/sketch/ns",
    "http://www.figma.com/figma/ns",
    "http://www.inkscape.org/namespaces/inkscape",
    "http://www.serif.com/",
    "http://www.vector.evaxdesign.sk",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
];

/// Content of these elements is rendered from elsewhere (`<use>`, paint
/// servers, markers), so it cannot rely on the surrounding inheritance.
const REFERENCED_CONTENT: &[&str] = &["defs", "symbol", "clipPath", "mask", "pattern", "marker"];

/// Containers removed when they end up without element children.
const CONTAINERS: &[&str] = &["g", "defs"];

/// Attributes holding a single paint color.
const COLOR_ATTRIBUTES: &[&str] = &[
    "fill",
    "stroke",
    "stop-color",
    "color",
    "flood-color",
    "lighting-color",
];

/// Attributes whose digits are identifiers rather than geometry.
const NON_NUMERIC_ATTRIBUTES: &[&str] = &["id", "class", "href", "version", "style"];

/// Unsigned numbers, matched whole so a compact `2.5.00001` splits into
/// `2.5` and `.00001`.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d*)?|\.\d+)([eE][-+]?\d+)?").expect("number pattern is a valid regex")
});

static RGB_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*\)$").expect("rgb() pattern is a valid regex")
});

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex pattern is a valid regex")
});

// ============================================================================
// Prolog
// ============================================================================

pub(super) fn remove_doctype(doc: &mut SvgDocument) {
    doc.prolog.retain(|item| !matches!(item, PrologItem::Doctype(_)));
}

pub(super) fn remove_xml_declaration(doc: &mut SvgDocument) {
    doc.prolog.retain(|item| !item.is_xml_declaration());
}

pub(super) fn remove_comments(doc: &mut SvgDocument) {
    let is_comment = |item: &PrologItem| matches!(item, PrologItem::Comment(_));
    doc.prolog.retain(|item| !is_comment(item));
    doc.epilog.retain(|item| !is_comment(item));
    doc.root
        .retain_nodes(&mut |node| !matches!(node, Node::Comment(_)));
}

// ============================================================================
// Elements
// ============================================================================

/// Removes every element with the given tag, subtree included.
pub(super) fn remove_elements(root: &mut Element, tag: &str) {
    root.retain_nodes(&mut |node| !matches!(node, Node::Element(el) if el.is(tag)));
}

/// Drops editor namespace declarations and every element and attribute in
/// those namespaces.
pub(super) fn remove_editors_ns_data(root: &mut Element) {
    let mut prefixes = BTreeSet::new();
    for el in root.descendants() {
        for (name, value) in &el.attributes {
            if let Some(prefix) = name.strip_prefix("xmlns:") {
                if EDITOR_NAMESPACES.contains(&value.trim()) {
                    prefixes.insert(prefix.to_string());
                }
            }
        }
    }
    if prefixes.is_empty() {
        return;
    }

    let in_editor_namespace = |name: &str| {
        name.split_once(':')
            .is_some_and(|(prefix, _)| prefixes.contains(prefix))
    };
    root.retain_nodes(&mut |node| {
        !matches!(node, Node::Element(el) if in_editor_namespace(&el.name))
    });
    root.walk_mut(&mut |el| {
        el.retain(|name, _| {
            let declared = name
                .strip_prefix("xmlns:")
                .is_some_and(|prefix| prefixes.contains(prefix));
            !declared && !in_editor_namespace(name)
        });
        Visit::Continue
    });
}

/// Removes elements that can never be displayed.
///
/// `display="none"` elements go unless they sit inside `<defs>` or carry an
/// `id` another element may reference. `visibility="hidden"` elements go
/// only when no descendant turns visibility back on.
pub(super) fn remove_hidden_elems(root: &mut Element) {
    fn is_hidden(el: &Element, in_defs: bool) -> bool {
        let display_none = el.attr("display").is_some_and(|v| v.trim() == "none");
        if display_none && !in_defs && !el.has_attr("id") {
            return true;
        }
        el.attr("visibility").is_some_and(|v| v.trim() == "hidden")
            && !el.descendants().skip(1).any(|d| d.has_attr("visibility"))
    }

    fn visit(el: &mut Element, in_defs: bool) {
        el.children.retain(|node| match node {
            Node::Element(child) => !is_hidden(child, in_defs),
            _ => true,
        });
        for child in el.elements_mut() {
            let in_defs = in_defs || child.is("defs");
            visit(child, in_defs);
        }
    }

    visit(root, false);
}

pub(super) fn remove_empty_text(root: &mut Element) {
    root.retain_nodes(&mut |node| match node {
        Node::Element(el) if el.is("text") || el.is("tspan") => {
            !el.text_content().trim().is_empty()
        }
        _ => true,
    });
}

/// Removes `g`/`defs` without element children, innermost first so that
/// groups holding only empty groups go too. Groups with a `filter` are kept.
pub(super) fn remove_empty_containers(root: &mut Element) {
    for child in root.elements_mut() {
        remove_empty_containers(child);
    }
    root.children.retain(|node| match node {
        Node::Element(el) => {
            let container = CONTAINERS.iter().any(|tag| el.is(tag));
            !container || el.has_attr("filter") || el.elements().next().is_some()
        }
        _ => true,
    });
}

// ============================================================================
// Attributes
// ============================================================================

/// Paint inherited from ancestors, `None` meaning the initial value.
///
/// Inline `style` declarations take precedence over presentation attributes.
#[derive(Debug, Clone, Default)]
struct InheritedPaint {
    fill: Option<String>,
    stroke: Option<String>,
    /// Inside content rendered from a reference; nothing is removed there.
    referenced: bool,
}

/// Trims attribute values and drops `fill`/`stroke` that only restate what
/// the element inherits anyway (`fill` black, `stroke` none).
///
/// Paint is never dropped from a document with a `<style>` sheet, since its
/// rules may set what an element inherits.
pub(super) fn cleanup_attrs(root: &mut Element) {
    let styled = root.contains_any(&["style"]);
    let mut ancestors: Vec<InheritedPaint> = Vec::new();

    root.walk_mut(&mut |el| {
        ancestors.truncate(el.depth());
        let parent = ancestors.last().cloned().unwrap_or_default();

        let mut trimmed = Vec::new();
        el.retain(|name, value| {
            let clean = collapse_whitespace(value.trim());
            if clean != value {
                trimmed.push((name.to_string(), clean.into_owned()));
            }
            true
        });
        for (name, value) in trimmed {
            el.set(name, value);
        }

        if !parent.referenced && !styled {
            let inherited_fill_black = parent
                .fill
                .as_deref()
                .is_none_or(|fill| HexColor::parse(fill) == Some(HexColor::BLACK));
            if inherited_fill_black
                && el.get("fill").and_then(HexColor::parse) == Some(HexColor::BLACK)
            {
                el.remove("fill");
            }

            let inherited_stroke_none = parent.stroke.as_deref().is_none_or(|s| s == "none");
            if inherited_stroke_none && el.get("stroke") == Some("none") {
                el.remove("stroke");
            }
        }

        let declared = |property: &str| {
            el.get("style")
                .and_then(|style| {
                    style_paint(style)
                        .filter(|(name, _)| name.eq_ignore_ascii_case(property))
                        .last()
                })
                .map(|(_, value)| value)
                .or_else(|| el.get(property))
                .map(str::to_string)
        };
        let fill = declared("fill").or(parent.fill);
        let stroke = declared("stroke").or(parent.stroke);
        let referenced = parent.referenced || REFERENCED_CONTENT.iter().any(|tag| el.is(tag));
        ancestors.push(InheritedPaint {
            fill,
            stroke,
            referenced,
        });
        Visit::Continue
    });
}

/// Rewrites colors to their shortest equivalent: `rgb()` and long hex to
/// short hex, names only where the hex form is shorter.
pub(super) fn convert_colors(root: &mut Element) {
    root.walk_mut(&mut |el| {
        for name in COLOR_ATTRIBUTES {
            let shorter = el.get(name).and_then(shortest_color);
            if let Some(shorter) = shorter {
                el.set(*name, shorter);
            }
        }
        Visit::Continue
    });
}

fn shortest_color(value: &str) -> Option<String> {
    let value = value.trim();
    let is_rgb = RGB_COLOR.is_match(value);
    let is_hex = HEX_COLOR.is_match(value);
    let is_name = value.bytes().all(|byte| byte.is_ascii_alphabetic());
    if !(is_rgb || is_hex || is_name) {
        return None;
    }

    let candidate = HexColor::parse(value)?.to_short_hex();
    let better = if is_name {
        candidate.len() < value.len()
    } else {
        candidate.len() <= value.len() && candidate != value
    };
    better.then_some(candidate)
}

/// Rounds numbers with four or more decimals to three.
pub(super) fn cleanup_numeric_values(root: &mut Element) {
    root.walk_mut(&mut |el| {
        let mut rounded = Vec::new();
        el.retain(|name, value| {
            let local = local_name(name);
            let skip = NON_NUMERIC_ATTRIBUTES.contains(&local)
                || name == "xmlns"
                || name.starts_with("xmlns:");
            if !skip {
                let replaced = round_decimals(value);
                if replaced != value {
                    rounded.push((name.to_string(), replaced));
                }
            }
            true
        });
        for (name, value) in rounded {
            el.set(name, value);
        }
        Visit::Continue
    });
}

/// Rounds every long decimal in `text`, inserting a space wherever the
/// shorter number would otherwise merge with a neighbouring compact operand
/// (`1.00001.5` becomes `1 .5`, not `1.5`).
fn round_decimals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for captures in NUMBER.captures_iter(text) {
        let (Some(whole), Some(digits)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let long_fraction = digits
            .as_str()
            .split_once('.')
            .is_some_and(|(_, fraction)| fraction.len() >= 4);
        if !long_fraction || captures.get(2).is_some() {
            continue;
        }
        let Ok(value) = digits.as_str().parse::<f64>() else {
            continue;
        };
        let formatted = super::path::format_number(value);
        let rounded = match formatted.strip_prefix("0.") {
            Some(fraction) if digits.as_str().starts_with('.') => format!(".{fraction}"),
            _ => formatted,
        };

        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();
        out.push_str(&text[last..whole.start()]);
        if before.is_some_and(|c| c.is_ascii_digit() || c == '.') && !rounded.starts_with('.') {
            out.push(' ');
        }
        out.push_str(&rounded);
        if after.is_some_and(|c| c.is_ascii_digit() || (c == '.' && !rounded.contains('.'))) {
            out.push(' ');
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(svg: &str) -> Element {
        SvgDocument::parse(svg).unwrap().root
    }

    #[test]
    fn editor_namespaces_are_removed() {
        let mut el = root(
            r#"<svg xmlns="http://www.w3.org/2000/svg"
                xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
                xmlns:xlink="http://www.w3.org/1999/xlink" sodipodi:docname="a.svg">
                <sodipodi:namedview/><path d="M0 0" sodipodi:nodetypes="cc"/></svg>"#,
        );
        remove_editors_ns_data(&mut el);
        assert!(!el.has_attr("xmlns:sodipodi"));
        assert!(!el.has_attr("sodipodi:docname"));
        assert!(el.has_attr("xmlns:xlink"));
        assert_eq!(el.descendants().count(), 2);
        assert_eq!(el.find_all("path").next().unwrap().attributes.len(), 1);
    }

    #[test]
    fn hidden_elements_are_removed() {
        let mut el = root(
            r#"<svg><path display="none"/><path id="ref" display="none"/>
                <defs><path display="none"/></defs>
                <g visibility="hidden"><path/></g>
                <g visibility="hidden"><path visibility="visible"/></g></svg>"#,
        );
        remove_hidden_elems(&mut el);
        assert_eq!(el.find_all("path").count(), 3);
        assert_eq!(el.find_all("g").count(), 1);
    }

    #[test]
    fn empty_text_and_containers_are_removed() {
        let mut el = root(
            r#"<svg><text> </text><text>A</text><g><g><text/></g></g><g filter="url(#f)"/><defs/></svg>"#,
        );
        remove_empty_text(&mut el);
        remove_empty_containers(&mut el);
        let tags: Vec<_> = el.descendants().map(Element::tag).collect();
        assert_eq!(tags, ["svg", "text", "g"]);
    }

    #[test]
    fn redundant_paint_is_removed() {
        let mut el = root(
            r##"<svg><path fill="black" stroke="none"/>
                <g fill="red"><path fill="#000"/></g>
                <g stroke="blue"><path stroke="none"/></g>
                <defs><path fill="black"/></defs>
                <rect width=" 10 "/></svg>"##,
        );
        cleanup_attrs(&mut el);
        let paths: Vec<_> = el.find_all("path").collect();
        assert!(paths[0].attributes.is_empty());
        assert_eq!(paths[1].attr("fill"), Some("#000"));
        assert_eq!(paths[2].attr("stroke"), Some("none"));
        assert_eq!(paths[3].attr("fill"), Some("black"));
        assert_eq!(el.find_all("rect").next().unwrap().attr("width"), Some("10"));
    }

    #[test]
    fn inline_style_paint_is_inherited() {
        let mut el = root(
            r#"<svg><g style="fill:red"><path fill="black"/></g>
                <g style="stroke: blue"><path stroke="none"/></g>
                <g fill="red" style="fill:black"><path fill="black"/></g></svg>"#,
        );
        cleanup_attrs(&mut el);
        let paths: Vec<_> = el.find_all("path").collect();
        assert_eq!(paths[0].attr("fill"), Some("black"));
        assert_eq!(paths[1].attr("stroke"), Some("none"));
        assert_eq!(paths[2].attr("fill"), None);
    }

    #[test]
    fn style_sheets_keep_paint() {
        let mut el = root(
            r#"<svg><style>.red { fill: red }</style><g class="red"><path fill="black"/></g></svg>"#,
        );
        cleanup_attrs(&mut el);
        assert_eq!(el.find_all("path").next().unwrap().attr("fill"), Some("black"));
    }

    #[test]
    fn colors_are_shortened() {
        assert_eq!(shortest_color("rgb(255, 0, 0)").as_deref(), Some("#f00"));
        assert_eq!(shortest_color("#AABBCC").as_deref(), Some("#abc"));
        assert_eq!(shortest_color("#123456"), None);
        assert_eq!(shortest_color("black").as_deref(), Some("#000"));
        assert_eq!(shortest_color("white").as_deref(), Some("#fff"));
        assert_eq!(shortest_color("red"), None);
        assert_eq!(shortest_color("rgba(0, 0, 0, 0.5)"), None);
        assert_eq!(shortest_color("currentColor"), None);
        assert_eq!(shortest_color("none"), None);
    }

    #[test]
    fn rounded_numbers_stay_separate_from_compact_neighbours() {
        assert_eq!(round_decimals("M1.00001.5L4 4"), "M1 .5L4 4");
        assert_eq!(round_decimals("M2.5.00001L4 4"), "M2.5 0L4 4");
        assert_eq!(round_decimals("M2.5.12345.5"), "M2.5.123.5");
        assert_eq!(round_decimals("M1.23456.5"), "M1.235.5");
    }

    #[test]
    fn long_decimals_are_rounded() {
        assert_eq!(round_decimals("M1.23456 .00049L2.5 3"), "M1.235 0L2.5 3");
        assert_eq!(round_decimals("0 0 24.00001 .12345"), "0 0 24 .123");
        assert_eq!(round_decimals("1.00001e5"), "1.00001e5");

        let mut el = root(r#"<svg id="a1.00001"><circle r="2.00049"/></svg>"#);
        cleanup_numeric_values(&mut el);
        assert_eq!(el.attr("id"), Some("a1.00001"));
        assert_eq!(el.find_all("circle").next().unwrap().attr("r"), Some("2"));
    }
}
