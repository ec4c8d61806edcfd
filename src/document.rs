//! In-memory SVG document tree.
//!
//! Icons are parsed once into an owned tree of [`Element`]s. Everything
//! downstream (classification, color analysis, recoloring, optimization)
//! works on this tree or a clone of it, never on the raw text.
//!
//! Tree walks come in two flavors: [`Element::walk`] for read-only visits and
//! [`Element::walk_mut`], whose visitor only sees an element's attributes
//! ([`AttrsMut`]). Structural edits (removing nodes) go through
//! [`Element::retain_nodes`] instead, so a walk can never invalidate its own
//! traversal order.

use std::borrow::Cow;
use std::fmt;

use quick_xml::escape::{escape, partial_escape, resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::SvgError;

/// Elements whose text children are rendered, so whitespace inside them matters.
const TEXT_CONTENT_TAGS: &[&str] = &["text", "tspan", "textPath"];

/// Elements stripped by [`sanitize`] together with their subtree.
const UNSAFE_TAGS: &[&str] = &["script", "foreignObject", "iframe"];

// ============================================================================
// Nodes
// ============================================================================

/// A child node of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

impl Node {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// Markup that may appear before or after the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrologItem {
    /// `<?target ...?>`, which includes the `<?xml ...?>` declaration.
    Instruction(String),
    /// `<!DOCTYPE ...>` contents.
    Doctype(String),
    Comment(String),
}

impl PrologItem {
    /// Returns true for the `<?xml version=...?>` declaration itself.
    pub fn is_xml_declaration(&self) -> bool {
        matches!(self, Self::Instruction(body) if body.split_whitespace().next() == Some("xml"))
    }

    fn write(&self, out: &mut String) {
        match self {
            Self::Instruction(body) => {
                out.push_str("<?");
                out.push_str(body);
                out.push_str("?>");
            }
            Self::Doctype(body) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(body);
                out.push('>');
            }
            Self::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
        }
    }
}

/// Result of a visitor callback during a tree walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the element's children.
    Continue,
    /// Do not visit this element's descendants.
    SkipChildren,
}

/// Output layout for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Keep every text node as parsed.
    #[default]
    Preserve,
    /// Drop insignificant whitespace between tags and collapse whitespace
    /// runs in text. Attribute values are written as they are.
    Compact,
}

// ============================================================================
// Element
// ============================================================================

/// An element with ordered attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified name as written in the source (e.g. `path`, `sodipodi:namedview`).
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text appender.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// The local part of the tag name (after any namespace prefix).
    pub fn tag(&self) -> &str {
        local_name(&self.name)
    }

    /// Case-insensitive tag comparison against a local name.
    pub fn is(&self, tag: &str) -> bool {
        self.tag().eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        attr_in(&self.attributes, name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        set_attr_in(&mut self.attributes, name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        remove_attr_in(&mut self.attributes, name)
    }

    /// Element children, in document order.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Pre-order iterator over this element and all of its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All descendants (including `self`) with the given tag.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |el| el.is(tag))
    }

    /// Returns true if any descendant (or `self`) has one of the tags.
    pub fn contains_any(&self, tags: &[&str]) -> bool {
        self.descendants()
            .any(|el| tags.iter().any(|tag| el.is(tag)))
    }

    /// Concatenated text and CDATA content of the whole subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Read-only pre-order walk. The visitor receives each element and its depth.
    pub fn walk<F>(&self, visitor: &mut F)
    where
        F: FnMut(&Element, usize) -> Visit,
    {
        fn go<F>(el: &Element, depth: usize, visitor: &mut F)
        where
            F: FnMut(&Element, usize) -> Visit,
        {
            if visitor(el, depth) == Visit::SkipChildren {
                return;
            }
            for child in el.elements() {
                go(child, depth + 1, visitor);
            }
        }
        go(self, 0, visitor)
    }

    /// Pre-order walk that may change attributes but not the tree shape.
    pub fn walk_mut<F>(&mut self, visitor: &mut F)
    where
        F: FnMut(&mut AttrsMut<'_>) -> Visit,
    {
        fn go<F>(el: &mut Element, depth: usize, visitor: &mut F)
        where
            F: FnMut(&mut AttrsMut<'_>) -> Visit,
        {
            let Element {
                name,
                attributes,
                children,
            } = el;
            let mut view = AttrsMut {
                name,
                attributes,
                depth,
            };
            if visitor(&mut view) == Visit::SkipChildren {
                return;
            }
            for child in children.iter_mut() {
                if let Node::Element(child) = child {
                    go(child, depth + 1, visitor);
                }
            }
        }
        go(self, 0, visitor)
    }

    /// Removes every descendant node for which `keep` returns false.
    ///
    /// A removed node takes its subtree with it; kept elements are then
    /// filtered recursively.
    pub fn retain_nodes<F>(&mut self, keep: &mut F)
    where
        F: FnMut(&Node) -> bool,
    {
        self.children.retain(|node| keep(node));
        for child in self.elements_mut() {
            child.retain_nodes(keep);
        }
    }

    /// Serializes the subtree with the given layout.
    pub fn serialize(&self, layout: Layout) -> String {
        let mut out = String::new();
        self.write(&mut out, layout, false);
        out
    }

    fn write(&self, out: &mut String, layout: Layout, in_text: bool) {
        let in_text = in_text || TEXT_CONTENT_TAGS.iter().any(|tag| self.is(tag));

        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        let mut children = self
            .children
            .iter()
            .filter(|node| layout == Layout::Preserve || !is_insignificant(node, in_text))
            .peekable();

        if children.peek().is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        for child in children {
            match child {
                Node::Element(el) => el.write(out, layout, in_text),
                Node::Text(text) => {
                    let text = match (layout, in_text) {
                        (Layout::Preserve, _) => Cow::Borrowed(text.as_str()),
                        (Layout::Compact, true) => collapse_whitespace(text),
                        (Layout::Compact, false) => collapse_whitespace(text.trim()),
                    };
                    out.push_str(&partial_escape(text.as_ref()));
                }
                Node::CData(text) => {
                    out.push_str("<![CDATA[");
                    out.push_str(text);
                    out.push_str("]]>");
                }
                Node::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(Layout::Preserve))
    }
}

/// Mutable view of one element's attributes during [`Element::walk_mut`].
pub struct AttrsMut<'a> {
    name: &'a str,
    attributes: &'a mut Vec<(String, String)>,
    depth: usize,
}

impl AttrsMut<'_> {
    pub fn tag(&self) -> &str {
        local_name(self.name)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag().eq_ignore_ascii_case(tag)
    }

    /// Depth below the element the walk started from (0 for the start element).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        attr_in(self.attributes, name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        set_attr_in(self.attributes, name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        remove_attr_in(self.attributes, name)
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.attributes.retain(|(name, value)| keep(name, value));
    }
}

/// Pre-order iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        self.stack.extend(el.elements().rev());
        Some(el)
    }
}

// ============================================================================
// Document
// ============================================================================

/// A parsed SVG file: the root `<svg>` element plus surrounding markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    pub prolog: Vec<PrologItem>,
    pub root: Element,
    pub epilog: Vec<PrologItem>,
}

impl SvgDocument {
    /// Parses SVG text into a document tree.
    ///
    /// Fails with [`SvgError::Parse`] on malformed XML and with
    /// [`SvgError::MissingRoot`] when the root element is not `<svg>`.
    pub fn parse(text: &str) -> Result<Self, SvgError> {
        let mut reader = Reader::from_str(text);
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                SvgError::Parse(format!("{e} at position {}", reader.error_position()))
            })?;
            match event {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let el = element_from_start(&start)?;
                    attach(Node::Element(el), &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| SvgError::Parse("unexpected closing tag".into()))?;
                    attach(Node::Element(el), &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    let text = unescape(utf8(&text)?).map_err(SvgError::parse)?;
                    push_text(&mut stack, &text);
                }
                Event::GeneralRef(reference) => {
                    let name = utf8(&reference)?;
                    let resolved = resolve_reference(name).ok_or_else(|| {
                        SvgError::Parse(format!("unknown entity reference &{name};"))
                    })?;
                    push_text(&mut stack, &resolved);
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::CData(utf8(&data)?.to_string()));
                    }
                }
                Event::Comment(comment) => {
                    let body = utf8(&comment)?.to_string();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Comment(body)),
                        None if root.is_some() => epilog.push(PrologItem::Comment(body)),
                        None => prolog.push(PrologItem::Comment(body)),
                    }
                }
                Event::Decl(decl) => {
                    prolog.push(PrologItem::Instruction(utf8(&decl)?.to_string()));
                }
                Event::PI(pi) => {
                    let body = PrologItem::Instruction(utf8(&pi)?.to_string());
                    if root.is_some() {
                        epilog.push(body);
                    } else {
                        prolog.push(body);
                    }
                }
                Event::DocType(doctype) => {
                    prolog.push(PrologItem::Doctype(utf8(&doctype)?.trim().to_string()));
                }
                Event::Eof => break,
                #[allow(unreachable_patterns)]
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(SvgError::Parse(format!("unclosed element <{}>", open.name)));
        }

        let root = root.ok_or(SvgError::MissingRoot)?;
        if !root.is("svg") {
            return Err(SvgError::MissingRoot);
        }

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Parses and [`sanitize`]s the document, as done for every loaded icon.
    pub fn parse_sanitized(text: &str) -> Result<Self, SvgError> {
        let mut doc = Self::parse(text)?;
        sanitize(&mut doc.root);
        Ok(doc)
    }

    /// Serializes the whole document with the given layout.
    pub fn serialize(&self, layout: Layout) -> String {
        let separator = match layout {
            Layout::Preserve => "\n",
            Layout::Compact => "",
        };
        let mut out = String::new();
        for item in &self.prolog {
            item.write(&mut out);
            out.push_str(separator);
        }
        self.root.write(&mut out, layout, false);
        for item in &self.epilog {
            out.push_str(separator);
            item.write(&mut out);
        }
        out
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(Layout::Preserve))
    }
}

// ============================================================================
// Sanitizing
// ============================================================================

/// Strips active content from an untrusted SVG tree.
///
/// Removes scripts, `foreignObject`/`iframe` subtrees, `on*` event handler
/// attributes, `javascript:` links and externally hosted `<image>`s, and
/// defaults `preserveAspectRatio` on the root.
pub fn sanitize(root: &mut Element) {
    root.retain_nodes(&mut |node| match node {
        Node::Element(el) => {
            !UNSAFE_TAGS.iter().any(|tag| el.is(tag)) && !is_external_image(el)
        }
        _ => true,
    });

    root.walk_mut(&mut |el| {
        el.retain(|name, value| !is_event_handler(name) && !is_script_link(name, value));
        Visit::Continue
    });

    if !root.has_attr("preserveAspectRatio") {
        root.set_attr("preserveAspectRatio", "xMidYMid meet");
    }
}

fn is_event_handler(name: &str) -> bool {
    let name = local_name(name);
    name.len() > 2 && name[..2].eq_ignore_ascii_case("on")
}

fn is_script_link(name: &str, value: &str) -> bool {
    local_name(name) == "href" && value.to_ascii_lowercase().contains("javascript:")
}

fn is_external_image(el: &Element) -> bool {
    if !el.is("image") {
        return false;
    }
    let href = el
        .attr("href")
        .or_else(|| el.attr("xlink:href"))
        .unwrap_or_default()
        .trim_start()
        .to_ascii_lowercase();
    href.starts_with("http://") || href.starts_with("https://")
}

// ============================================================================
// Helpers
// ============================================================================

/// Strips a namespace prefix (`xlink:href` -> `href`).
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn attr_in<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn set_attr_in(attributes: &mut Vec<(String, String)>, name: String, value: String) {
    match attributes.iter_mut().find(|(key, _)| *key == name) {
        Some((_, existing)) => *existing = value,
        None => attributes.push((name, value)),
    }
}

fn remove_attr_in(attributes: &mut Vec<(String, String)>, name: &str) -> Option<String> {
    let index = attributes.iter().position(|(key, _)| key == name)?;
    Some(attributes.remove(index).1)
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Element(child) => collect_text(child, out),
            Node::Text(text) | Node::CData(text) => out.push_str(text),
            Node::Comment(_) => {}
        }
    }
}

fn is_insignificant(node: &Node, in_text: bool) -> bool {
    matches!(node, Node::Text(text) if !in_text && text.trim().is_empty())
}

/// Collapses every whitespace run into a single space.
pub(crate) fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    let needs_work = text
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0].is_ascii_whitespace() && pair[1].is_ascii_whitespace())
        || text.chars().any(|c| c.is_whitespace() && c != ' ');
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    Cow::Owned(out)
}

fn utf8(bytes: &[u8]) -> Result<&str, SvgError> {
    std::str::from_utf8(bytes).map_err(SvgError::parse)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, SvgError> {
    let mut el = Element::new(utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(SvgError::parse)?;
        let name = utf8(attr.key.as_ref())?.to_string();
        let value = unescape(utf8(&attr.value)?)
            .map_err(SvgError::parse)?
            .into_owned();
        el.attributes.push((name, value));
    }
    Ok(el)
}

fn attach(node: Node, stack: &mut [Element], root: &mut Option<Element>) -> Result<(), SvgError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    match (node, root.is_some()) {
        (Node::Element(el), false) => {
            *root = Some(el);
            Ok(())
        }
        (Node::Element(_), true) => Err(SvgError::Parse("multiple root elements".into())),
        _ => Ok(()),
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if let Some(Node::Text(last)) = parent.children.last_mut() {
        last.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}

fn resolve_reference(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported -->
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <g fill="#000">
    <path d="M0 0h24v24H0z"/>
    <circle cx="12" cy="12" r="4"/>
  </g>
  <text x="1">A &amp; B</text>
</svg>"##;

    #[test]
    fn parse_builds_tree_and_prolog() {
        let doc = SvgDocument::parse(ICON).unwrap();
        assert_eq!(doc.prolog.len(), 2);
        assert!(doc.prolog[0].is_xml_declaration());
        assert_eq!(doc.root.tag(), "svg");
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 24 24"));

        let tags: Vec<_> = doc.root.descendants().map(|el| el.tag().to_string()).collect();
        assert_eq!(tags, ["svg", "g", "path", "circle", "text"]);
    }

    #[test]
    fn entity_references_are_resolved() {
        let doc = SvgDocument::parse(ICON).unwrap();
        let text = doc.root.find_all("text").next().unwrap();
        assert_eq!(text.text_content(), "A & B");
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = SvgDocument::parse("<svg><g></svg>").unwrap_err();
        assert!(matches!(err, SvgError::Parse(_)));

        let err = SvgDocument::parse("<svg><g>").unwrap_err();
        assert!(matches!(err, SvgError::Parse(_)));
    }

    #[test]
    fn non_svg_root_is_missing_root() {
        assert_eq!(
            SvgDocument::parse("<html><body/></html>").unwrap_err(),
            SvgError::MissingRoot
        );
        assert_eq!(SvgDocument::parse("   ").unwrap_err(), SvgError::MissingRoot);
    }

    #[test]
    fn compact_layout_drops_whitespace_between_tags() {
        let doc = SvgDocument::parse(ICON).unwrap();
        let compact = doc.root.serialize(Layout::Compact);
        assert!(compact.starts_with("<svg xmlns="));
        assert!(compact.contains(r##"<g fill="#000"><path d="M0 0h24v24H0z"/><circle"##));
        assert!(compact.contains("<text x=\"1\">A &amp; B</text>"));
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn preserve_layout_reparses_to_same_tree() {
        let doc = SvgDocument::parse(ICON).unwrap();
        let again = SvgDocument::parse(&doc.to_string()).unwrap();
        assert_eq!(doc.root, again.root);
    }

    #[test]
    fn walk_mut_can_skip_subtrees() {
        let mut root = Element::new("svg")
            .with_child(Element::new("mask").with_child(Element::new("path")))
            .with_child(Element::new("path"));

        root.walk_mut(&mut |el| {
            if el.is("mask") {
                return Visit::SkipChildren;
            }
            el.set("data-seen", el.depth().to_string());
            Visit::Continue
        });

        let mask = root.elements().next().unwrap();
        assert!(!mask.elements().next().unwrap().has_attr("data-seen"));
        assert_eq!(root.elements().nth(1).unwrap().attr("data-seen"), Some("1"));
    }

    #[test]
    fn sanitize_removes_active_content() {
        let mut doc = SvgDocument::parse(
            r#"<svg onload="alert(1)"><script>alert(2)</script>
                <a href="javascript:alert(3)"><path d="M0 0" onclick="x()"/></a>
                <image href="https://tracker.example/p.png"/>
                <image href="data:image/png;base64,AAAA"/>
                <foreignObject><div/></foreignObject></svg>"#,
        )
        .unwrap();
        sanitize(&mut doc.root);

        assert!(!doc.root.has_attr("onload"));
        assert!(!doc.root.contains_any(&["script", "foreignObject"]));
        assert_eq!(doc.root.find_all("image").count(), 1);
        let link = doc.root.find_all("a").next().unwrap();
        assert!(!link.has_attr("href"));
        assert!(!link.elements().next().unwrap().has_attr("onclick"));
        assert_eq!(doc.root.attr("preserveAspectRatio"), Some("xMidYMid meet"));
    }

    #[test]
    fn retain_nodes_removes_whole_subtrees() {
        let mut root = Element::new("svg")
            .with_child(Element::new("metadata").with_child(Element::new("rdf")))
            .with_child(Element::new("path"));
        root.retain_nodes(&mut |node| !matches!(node, Node::Element(el) if el.is("metadata")));
        assert_eq!(root.descendants().count(), 2);
    }

    #[test]
    fn collapse_whitespace_borrows_when_clean() {
        assert!(matches!(collapse_whitespace("a b"), Cow::Borrowed(_)));
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
    }
}
