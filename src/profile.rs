//! Serializable library settings.
//!
//! A [`LibraryProfile`] captures the user-editable settings of an
//! [`IconLibrary`](crate::IconLibrary) in a JSON-friendly form, so a host can
//! persist them between sessions and restore them on the next load.
//!
//! # Example
//!
//! ```
//! use svgaze::{LibraryProfile, OptimizerConfig, Plugin};
//!
//! let profile = LibraryProfile::new()
//!     .with_style_folders(["outline", "solid", "glyph"])
//!     .with_optimizer(OptimizerConfig::default().with(Plugin::RemoveTitle, true))
//!     .with_favorite("icons/home.svg");
//!
//! let json = profile.to_json().unwrap();
//! let restored = LibraryProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```

use serde::{Deserialize, Serialize};

use crate::optimize::OptimizerConfig;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Types whose settings can be loaded from and saved to a [`LibraryProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &LibraryProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> LibraryProfile;
}

// ============================================================================
// LibraryProfile
// ============================================================================

/// A serializable profile with all library settings.
///
/// # JSON Format
///
/// ```json
/// {
///   "styleFolders": ["outline", "solid"],
///   "optimizer": { "removeTitle": true, "convertPathData": false },
///   "favorites": ["Outline/Brands/comment.svg"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct LibraryProfile {
    /// Style folder names. `None` means the built-in list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_folders: Option<Vec<String>>,

    /// Optimizer plugin flags. `None` means the defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerConfig>,

    /// Original paths of favorited icons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub favorites: Vec<String>,
}

impl LibraryProfile {
    /// Creates an empty profile that leaves every setting at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the style folder names.
    pub fn with_style_folders<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.style_folders = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the optimizer flags.
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Adds a favorite path.
    pub fn with_favorite(mut self, path: impl Into<String>) -> Self {
        self.favorites.push(path.into());
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
