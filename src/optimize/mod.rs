//! SVG size optimization.
//!
//! [`optimize`] runs a fixed pipeline of passes over a parsed copy of the
//! input, each gated by a [`Plugin`] flag in an [`OptimizerConfig`]:
//!
//! 1. markup that never renders is stripped (doctype, XML declaration,
//!    comments, metadata, editor data, hidden and empty elements),
//! 2. attribute values are simplified (redundant paint, colors, numbers),
//! 3. path data is rewritten geometrically: bezier circles and rounded
//!    corners become arcs, absolute lines become relative.
//!
//! The output never has whitespace between tags. Geometric rewrites only
//! fire when the input provably matches the shape being replaced; a path
//! that does not match keeps its `d` byte for byte.
//!
//! # Example
//!
//! ```
//! use svgaze::optimize::{optimize, OptimizerConfig};
//!
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
//!   <!-- circle -->
//!   <path d="M16 8C16 12.418 12.418 16 8 16C3.582 16 0 12.418 0 8C0 3.582 3.582 0 8 0C12.418 0 16 3.582 16 8Z"/>
//! </svg>"#;
//!
//! let result = optimize(svg, &OptimizerConfig::default());
//! assert!(result.data.contains(r#"d="M16 8A8 8 0 1 1 0 8a8 8 0 0 1 16 0z""#));
//! assert!(result.optimized_size < result.original_size);
//! ```

pub mod arc;
pub mod path;
mod structure;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{Element, Layout, SvgDocument, Visit};

use self::path::PathData;

// ============================================================================
// Plugins
// ============================================================================

/// A single optimization pass that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Plugin {
    RemoveDoctype,
    #[serde(rename = "removeXMLProcInst")]
    RemoveXmlProcInst,
    RemoveComments,
    RemoveMetadata,
    RemoveTitle,
    RemoveDesc,
    #[serde(rename = "removeEditorsNSData")]
    RemoveEditorsNsData,
    RemoveHiddenElems,
    RemoveEmptyText,
    RemoveEmptyContainers,
    CleanupAttrs,
    CleanupNumericValues,
    ConvertColors,
    ConvertPathData,
    ConvertRoundedCorners,
    ConvertRelativeLines,
}

impl Plugin {
    /// Every plugin, in pipeline order.
    pub const ALL: [Plugin; 16] = [
        Plugin::RemoveDoctype,
        Plugin::RemoveXmlProcInst,
        Plugin::RemoveComments,
        Plugin::RemoveMetadata,
        Plugin::RemoveTitle,
        Plugin::RemoveDesc,
        Plugin::RemoveEditorsNsData,
        Plugin::RemoveHiddenElems,
        Plugin::RemoveEmptyText,
        Plugin::RemoveEmptyContainers,
        Plugin::CleanupAttrs,
        Plugin::CleanupNumericValues,
        Plugin::ConvertColors,
        Plugin::ConvertPathData,
        Plugin::ConvertRoundedCorners,
        Plugin::ConvertRelativeLines,
    ];

    /// Wire name, as used in profiles.
    pub fn as_str(self) -> &'static str {
        match self {
            Plugin::RemoveDoctype => "removeDoctype",
            Plugin::RemoveXmlProcInst => "removeXMLProcInst",
            Plugin::RemoveComments => "removeComments",
            Plugin::RemoveMetadata => "removeMetadata",
            Plugin::RemoveTitle => "removeTitle",
            Plugin::RemoveDesc => "removeDesc",
            Plugin::RemoveEditorsNsData => "removeEditorsNSData",
            Plugin::RemoveHiddenElems => "removeHiddenElems",
            Plugin::RemoveEmptyText => "removeEmptyText",
            Plugin::RemoveEmptyContainers => "removeEmptyContainers",
            Plugin::CleanupAttrs => "cleanupAttrs",
            Plugin::CleanupNumericValues => "cleanupNumericValues",
            Plugin::ConvertColors => "convertColors",
            Plugin::ConvertPathData => "convertPathData",
            Plugin::ConvertRoundedCorners => "convertRoundedCorners",
            Plugin::ConvertRelativeLines => "convertRelativeLines",
        }
    }

    /// `<title>` and `<desc>` carry accessible names, so they stay by default.
    pub fn enabled_by_default(self) -> bool {
        !matches!(self, Plugin::RemoveTitle | Plugin::RemoveDesc)
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which plugins run.
///
/// Serializes as a map from plugin name to flag. Plugins missing from the
/// map use their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct OptimizerConfig {
    plugins: BTreeMap<Plugin, bool>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            plugins: Plugin::ALL
                .into_iter()
                .map(|plugin| (plugin, plugin.enabled_by_default()))
                .collect(),
        }
    }
}

impl OptimizerConfig {
    /// A configuration with every plugin off.
    pub fn none() -> Self {
        Self {
            plugins: Plugin::ALL.into_iter().map(|plugin| (plugin, false)).collect(),
        }
    }

    pub fn is_enabled(&self, plugin: Plugin) -> bool {
        self.plugins
            .get(&plugin)
            .copied()
            .unwrap_or_else(|| plugin.enabled_by_default())
    }

    /// Sets a plugin's flag. Returns whether it changed.
    pub fn set_enabled(&mut self, plugin: Plugin, enabled: bool) -> bool {
        let changed = self.is_enabled(plugin) != enabled;
        self.plugins.insert(plugin, enabled);
        changed
    }

    /// Builder-style [`set_enabled`](Self::set_enabled).
    pub fn with(mut self, plugin: Plugin, enabled: bool) -> Self {
        self.set_enabled(plugin, enabled);
        self
    }

    /// Restores the default flags.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Enabled plugins, in pipeline order.
    pub fn enabled(&self) -> impl Iterator<Item = Plugin> + '_ {
        Plugin::ALL
            .into_iter()
            .filter(|plugin| self.is_enabled(*plugin))
    }
}

// ============================================================================
// Result
// ============================================================================

/// Optimized SVG text with its before and after sizes in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimized {
    pub data: String,
    pub original_size: usize,
    pub optimized_size: usize,
}

impl Optimized {
    /// Size reduction in percent; negative if the output grew.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.optimized_size as f64 / self.original_size as f64) * 100.0
    }

    /// `"1.2 KB → 640 B (-48.0%)"`, or `(+5.0%)` when the output grew.
    pub fn summary(&self) -> String {
        let change = 0.0 - self.reduction_percent();
        format!(
            "{} → {} ({change:+.1}%)",
            format_bytes(self.original_size),
            format_bytes(self.optimized_size),
        )
    }
}

/// Human-readable byte count with one decimal: `0 B`, `512 B`, `1.5 KB`.
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["B", "KB", "MB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded} {}", UNITS[unit])
}

// ============================================================================
// Pipeline
// ============================================================================

/// Optimizes SVG text.
///
/// Never fails: input that does not parse comes back unchanged.
pub fn optimize(svg_text: &str, config: &OptimizerConfig) -> Optimized {
    let original_size = svg_text.len();

    let data = match SvgDocument::parse(svg_text) {
        Ok(mut doc) => {
            optimize_document(&mut doc, config);
            doc.serialize(Layout::Compact).trim().to_string()
        }
        Err(err) => {
            debug!(error = %err, "optimizer input did not parse, returning it unchanged");
            svg_text.to_string()
        }
    };

    let optimized_size = data.len();
    Optimized {
        data,
        original_size,
        optimized_size,
    }
}

/// Runs the enabled passes over a parsed document.
pub fn optimize_document(doc: &mut SvgDocument, config: &OptimizerConfig) {
    let enabled = |plugin| config.is_enabled(plugin);

    if enabled(Plugin::RemoveDoctype) {
        structure::remove_doctype(doc);
    }
    if enabled(Plugin::RemoveXmlProcInst) {
        structure::remove_xml_declaration(doc);
    }
    if enabled(Plugin::RemoveComments) {
        structure::remove_comments(doc);
    }

    let root = &mut doc.root;
    for (plugin, tag) in [
        (Plugin::RemoveMetadata, "metadata"),
        (Plugin::RemoveTitle, "title"),
        (Plugin::RemoveDesc, "desc"),
    ] {
        if enabled(plugin) {
            structure::remove_elements(root, tag);
        }
    }
    if enabled(Plugin::RemoveEditorsNsData) {
        structure::remove_editors_ns_data(root);
    }
    if enabled(Plugin::RemoveHiddenElems) {
        structure::remove_hidden_elems(root);
    }
    if enabled(Plugin::RemoveEmptyText) {
        structure::remove_empty_text(root);
    }
    if enabled(Plugin::CleanupAttrs) {
        structure::cleanup_attrs(root);
    }
    if enabled(Plugin::ConvertColors) {
        structure::convert_colors(root);
    }

    let paths = optimize_paths(root, config);
    if paths > 0 {
        debug!(paths, "rewrote path data");
    }

    if enabled(Plugin::CleanupNumericValues) {
        structure::cleanup_numeric_values(root);
    }
    if enabled(Plugin::RemoveEmptyContainers) {
        structure::remove_empty_containers(root);
    }
}

/// Rewrites every `d` attribute in the tree. Returns how many changed.
fn optimize_paths(root: &mut Element, config: &OptimizerConfig) -> usize {
    let mut changed = 0;
    root.walk_mut(&mut |el| {
        let rewritten = el.get("d").and_then(|d| optimize_path_data(d, config));
        if let Some(d) = rewritten {
            el.set("d", d);
            changed += 1;
        }
        Visit::Continue
    });
    changed
}

/// Applies the enabled geometric rewrites to one path.
///
/// Returns `None` when nothing fired (or the data does not parse), so the
/// caller keeps the original string.
pub fn optimize_path_data(d: &str, config: &OptimizerConfig) -> Option<String> {
    let mut path = PathData::parse(d)?;

    if config.is_enabled(Plugin::ConvertPathData) {
        if let Some(arcs) = arc::circle_to_arcs(&path) {
            return Some(arcs);
        }
    }

    let mut rewrites = 0;
    if config.is_enabled(Plugin::ConvertRoundedCorners) {
        rewrites += arc::convert_rounded_corners(&mut path);
    }
    if config.is_enabled(Plugin::ConvertRelativeLines) {
        rewrites += arc::convert_relative_lines(&mut path);
    }

    (rewrites > 0).then(|| path.to_string())
}
