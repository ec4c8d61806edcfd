//! Error types shared by the parsing and rendering entry points.

use thiserror::Error;

/// Errors produced while turning SVG text into something usable.
///
/// Per-value problems (an unrecognized color, a path that is not a circle)
/// are never errors; only whole-document failures surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvgError {
    /// The text is not well-formed XML.
    #[error("malformed SVG: {0}")]
    Parse(String),

    /// The document parsed but has no `<svg>` root element.
    #[error("no <svg> root element found")]
    MissingRoot,

    /// The document could not be rasterized.
    #[error("failed to render SVG: {0}")]
    Render(String),
}

impl SvgError {
    pub(crate) fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }
}
