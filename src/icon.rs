//! Icon item types.
//!
//! An [`IconInput`] is what the host hands over for each file: where it lives
//! and its raw text. Loading turns it into an [`IconItem`], which owns both
//! the untouched source and a parsed, sanitized tree.

use serde::Serialize;

use crate::classify::{path_segments, ClassificationResult};
use crate::document::Element;

/// A single SVG file as provided by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconInput {
    /// Path relative to the chosen library folder, file name included.
    pub relative_path: String,
    pub file_name: String,
    pub svg_text: String,
}

impl IconInput {
    pub fn new(
        relative_path: impl Into<String>,
        file_name: impl Into<String>,
        svg_text: impl Into<String>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            file_name: file_name.into(),
            svg_text: svg_text.into(),
        }
    }

    /// Creates an input whose file name is the last segment of `relative_path`.
    pub fn from_path(relative_path: impl Into<String>, svg_text: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let file_name = path_segments(&relative_path)
            .next_back()
            .unwrap_or_default()
            .to_string();
        Self {
            relative_path,
            file_name,
            svg_text: svg_text.into(),
        }
    }
}

/// A loaded icon.
///
/// `svg_text` is the original source and is never modified. Display and
/// optimization work on clones of `svg`, so the item itself stays as loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconItem {
    pub category: String,
    /// Visual style; empty when neither the folders nor the content say.
    pub style: String,
    pub subcategory: String,
    pub full_path: String,
    /// Path as given at load time. Unique within a library.
    pub original_path: String,
    pub file_name: String,
    pub svg_text: String,
    #[serde(skip)]
    pub svg: Element,
    /// Byte length of `svg_text`.
    pub file_size: usize,
}

impl IconItem {
    /// Builds an item from its classification and parsed tree.
    ///
    /// When the classification carries no style, the one detected from the
    /// tree's paint is used instead.
    pub fn new(input: IconInput, classification: ClassificationResult, svg: Element) -> Self {
        let ClassificationResult {
            category,
            style,
            subcategory,
            full_path,
            original_path,
        } = classification;
        let style = if style.is_empty() {
            crate::classify::detect_style(&svg).to_string()
        } else {
            style
        };
        Self {
            category,
            style,
            subcategory,
            full_path,
            original_path,
            file_name: input.file_name,
            file_size: input.svg_text.len(),
            svg_text: input.svg_text,
            svg,
        }
    }

    /// File name without a trailing `.svg`, any case.
    pub fn display_name(&self) -> &str {
        strip_svg_extension(&self.file_name)
    }
}

/// Strips a trailing `.svg` extension, ignoring case.
pub(crate) fn strip_svg_extension(file_name: &str) -> &str {
    let split = file_name.len().saturating_sub(4);
    match file_name.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(".svg") => &file_name[..split],
        _ => file_name,
    }
}
