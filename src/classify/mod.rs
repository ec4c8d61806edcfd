//! Folder-path classification.
//!
//! Icon packs encode their taxonomy in the directory layout:
//! `Outline/Brands/comment.svg`, `icons/Call - Bold/phone.svg`. The
//! [`PathClassifier`] turns such a relative path into a category, a visual
//! style and a subcategory.
//!
//! Each folder segment is one of:
//!
//! - a **root folder** (`icons`, `assets`, ...): a container that carries no
//!   meaning and resets where semantic folders may start,
//! - a **style folder** (`outline`, `bold`, ...): matched exactly against the
//!   configured [`StyleFolders`],
//! - a **semantic folder**: everything else after the last root folder. A
//!   semantic folder may still carry an embedded style suffix such as
//!   `Call - Bold`.
//!
//! # Example
//!
//! ```
//! use svgaze::classify::PathClassifier;
//!
//! let classifier = PathClassifier::default();
//! let result = classifier.classify("icons/Call - Bold/phone.svg", "phone.svg");
//!
//! assert_eq!(result.category, "Call");
//! assert_eq!(result.style, "Bold");
//! ```

pub mod content;

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::Serialize;

pub use content::{detect_style, ContentStyle};

/// Category assigned when a path has no usable folder.
pub const ROOT_CATEGORY: &str = "Root";

/// Separator used when joining folder names for display.
pub const PATH_SEPARATOR: &str = " › ";

/// Style folder names recognized out of the box.
pub const DEFAULT_STYLE_FOLDERS: &[&str] = &[
    "outline", "solid", "fill", "filled", "line", "linear", "duotone", "bold", "regular", "light",
    "thin", "sharp", "rounded", "straight",
];

/// Container folder names that never become categories.
pub const DEFAULT_ROOT_FOLDERS: &[&str] = &["icons", "svg", "svgs", "assets", "images", "hicon"];

/// Non-empty segments of a relative path. Both `/` and `\` separate folders.
pub fn path_segments(relative_path: &str) -> impl DoubleEndedIterator<Item = &str> {
    relative_path
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
}

/// Separators tried, in order, when looking for an embedded style suffix.
const STYLE_SEPARATORS: &[&str] = &[" - ", " – ", " — ", " | ", " _ ", "- ", "_"];

// ============================================================================
// Style Folders
// ============================================================================

/// The set of folder names treated as visual styles.
///
/// Matching is case-insensitive; the casing a name was added with is kept
/// for display.
#[derive(Debug, Clone)]
pub struct StyleFolders {
    entries: BTreeMap<String, StyleEntry>,
}

#[derive(Debug, Clone)]
struct StyleEntry {
    display: String,
    /// Whole-word matcher, `None` only if the pattern exceeded regex limits.
    word: Option<Regex>,
}

impl StyleEntry {
    fn new(display: &str) -> Self {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(&display.to_lowercase()));
        Self {
            display: display.to_string(),
            word: Regex::new(&pattern).ok(),
        }
    }
}

impl StyleFolders {
    /// The default style folder set.
    pub fn new() -> Self {
        Self::from_names(DEFAULT_STYLE_FOLDERS.iter().copied())
    }

    /// A set with no style folders at all.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut folders = Self::empty();
        for name in names {
            folders.add(name.as_ref());
        }
        folders
    }

    /// Adds a style name. Returns false if it was blank or already present.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let key = name.to_lowercase();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, StyleEntry::new(name));
        true
    }

    /// Removes a style name. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(&name.trim().to_lowercase()).is_some()
    }

    /// Restores the default set.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.trim().to_lowercase())
    }

    /// Display names, ordered by their lowercase form.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.display.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if any style name appears in `text` as a whole word.
    fn mentioned_in(&self, text: &str) -> bool {
        self.entries
            .values()
            .filter_map(|entry| entry.word.as_ref())
            .any(|word| word.is_match(text))
    }
}

impl Default for StyleFolders {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for StyleFolders {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((a, x), (b, y))| a == b && x.display == y.display)
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Everything the classifier needs to know about folder names.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub style_folders: StyleFolders,
    /// Lowercase root folder names.
    pub root_folders: BTreeSet<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            style_folders: StyleFolders::new(),
            root_folders: DEFAULT_ROOT_FOLDERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Where an icon belongs, derived purely from its relative path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: String,
    /// Empty when the path names no style.
    pub style: String,
    /// Semantic folders after the category, joined by [`PATH_SEPARATOR`].
    pub subcategory: String,
    /// Display path: folders after the last root folder, or the file name.
    pub full_path: String,
    /// The relative path as given, used as the icon's identity.
    pub original_path: String,
}

/// Classifies icon paths against a [`ClassifierConfig`].
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    config: ClassifierConfig,
}

/// Folder segments of one path, sorted into their roles.
struct FolderScan<'a> {
    folders: Vec<&'a str>,
    root_index: Option<usize>,
    style_folders: Vec<&'a str>,
    semantic_folders: Vec<String>,
    embedded_style: Option<String>,
}

impl FolderScan<'_> {
    /// Index of the first folder after the last root folder.
    fn start(&self) -> usize {
        self.root_index.map_or(0, |index| index + 1)
    }
}

type CategoryStrategy = fn(&FolderScan<'_>) -> Option<String>;

/// Category resolution, tried in order until one yields a name.
const CATEGORY_STRATEGIES: &[CategoryStrategy] = &[
    first_semantic_folder,
    last_style_folder,
    first_folder_after_root,
];

fn first_semantic_folder(scan: &FolderScan<'_>) -> Option<String> {
    scan.semantic_folders.first().cloned()
}

fn last_style_folder(scan: &FolderScan<'_>) -> Option<String> {
    scan.style_folders.last().map(|name| name.to_string())
}

fn first_folder_after_root(scan: &FolderScan<'_>) -> Option<String> {
    scan.folders.get(scan.start()).map(|name| name.to_string())
}

impl PathClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Mutable access to the style set, the only runtime-configurable part.
    pub fn style_folders_mut(&mut self) -> &mut StyleFolders {
        &mut self.config.style_folders
    }

    /// Classifies `relative_path` (e.g. `Outline/Brands/comment.svg`).
    ///
    /// The last path segment is the file itself and is ignored; `file_name`
    /// is only used as the display path when no folder remains.
    pub fn classify(&self, relative_path: &str, file_name: &str) -> ClassificationResult {
        let mut folders: Vec<&str> = path_segments(relative_path).collect();
        folders.pop();

        if folders.is_empty() {
            return ClassificationResult {
                category: ROOT_CATEGORY.to_string(),
                full_path: file_name.to_string(),
                original_path: relative_path.to_string(),
                ..Default::default()
            };
        }

        let scan = self.scan(folders);

        let category = CATEGORY_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(&scan))
            .unwrap_or_else(|| ROOT_CATEGORY.to_string());

        let subcategory = scan
            .semantic_folders
            .get(1..)
            .map(|rest| rest.join(PATH_SEPARATOR))
            .unwrap_or_default();

        let style = scan
            .style_folders
            .first()
            .map(|name| name.to_string())
            .or_else(|| scan.embedded_style.clone())
            .unwrap_or_default();

        let relevant = &scan.folders[scan.start().min(scan.folders.len())..];
        let full_path = if relevant.is_empty() {
            file_name.to_string()
        } else {
            relevant.join(PATH_SEPARATOR)
        };

        ClassificationResult {
            category,
            style,
            subcategory,
            full_path,
            original_path: relative_path.to_string(),
        }
    }

    fn scan<'a>(&self, folders: Vec<&'a str>) -> FolderScan<'a> {
        let lower: Vec<String> = folders.iter().map(|folder| folder.to_lowercase()).collect();
        let root_index = lower
            .iter()
            .rposition(|folder| self.config.root_folders.contains(folder));

        let mut scan = FolderScan {
            folders,
            root_index,
            style_folders: Vec::new(),
            semantic_folders: Vec::new(),
            embedded_style: None,
        };

        for (index, lower) in lower.iter().enumerate() {
            let folder = scan.folders[index];
            if self.config.root_folders.contains(lower) {
                continue;
            }
            if self.config.style_folders.contains(lower) {
                scan.style_folders.push(folder);
                continue;
            }
            if root_index.is_some_and(|root| index < root) {
                continue;
            }

            let embedded = if scan.embedded_style.is_none() {
                self.extract_embedded_style(folder)
            } else {
                None
            };
            match embedded {
                Some((clean_name, style)) => {
                    scan.embedded_style = Some(style);
                    scan.semantic_folders.push(clean_name);
                }
                None => scan.semantic_folders.push(folder.to_string()),
            }
        }

        scan
    }

    /// Splits `Call - Bold` into `("Call", "Bold")` when the trailing part
    /// names a known style, exactly or as a whole word (`Linear (Border)`).
    fn extract_embedded_style(&self, folder: &str) -> Option<(String, String)> {
        let styles = &self.config.style_folders;
        STYLE_SEPARATORS.iter().find_map(|separator| {
            let (head, tail) = folder.rsplit_once(separator)?;
            let (head, tail) = (head.trim(), tail.trim());
            if head.is_empty() || tail.is_empty() {
                return None;
            }
            (styles.contains(tail) || styles.mentioned_in(tail))
                .then(|| (head.to_string(), tail.to_string()))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str) -> ClassificationResult {
        let name = path.rsplit('/').next().unwrap();
        PathClassifier::default().classify(path, name)
    }

    #[test]
    fn file_without_folders_is_root() {
        let result = classify("icon.svg");
        assert_eq!(result.category, "Root");
        assert_eq!(result.style, "");
        assert_eq!(result.subcategory, "");
        assert_eq!(result.full_path, "icon.svg");
        assert_eq!(result.original_path, "icon.svg");
    }

    #[test]
    fn backslash_separates_folders() {
        let result = PathClassifier::default().classify("Outline\\Brands\\Comment.svg", "Comment.svg");
        assert_eq!(result.category, "Brands");
        assert_eq!(result.style, "Outline");
        assert_eq!(result.full_path, "Outline › Brands");
    }

    #[test]
    fn exact_style_folder_is_not_a_category() {
        let result = classify("Outline/Brands/Comment.svg");
        assert_eq!(result.category, "Brands");
        assert_eq!(result.style, "Outline");
        assert_eq!(result.subcategory, "");
        assert_eq!(result.full_path, "Outline › Brands");
    }

    #[test]
    fn embedded_style_is_split_off() {
        let result = classify("Icons/Call - Bold/phone.svg");
        assert_eq!(result.category, "Call");
        assert_eq!(result.style, "Bold");
        assert_eq!(result.full_path, "Call - Bold");
    }

    #[test]
    fn embedded_style_matches_whole_words() {
        let result = classify("pack/Arrows - Linear (Border)/up.svg");
        assert_eq!(result.category, "pack");
        assert_eq!(result.subcategory, "Arrows");
        assert_eq!(result.style, "Linear (Border)");

        // "Boldly" is not the word "bold".
        let result = classify("Boldly - Boldly/x.svg");
        assert_eq!(result.category, "Boldly - Boldly");
        assert_eq!(result.style, "");
    }

    #[test]
    fn only_first_embedded_style_is_used() {
        let result = classify("Call - Bold/Chat - Light/x.svg");
        assert_eq!(result.category, "Call");
        assert_eq!(result.style, "Bold");
        assert_eq!(result.subcategory, "Chat - Light");
    }

    #[test]
    fn extra_semantic_folders_become_subcategory() {
        let result = classify("svg/Devices/Phones/Android/x.svg");
        assert_eq!(result.category, "Devices");
        assert_eq!(result.subcategory, "Phones › Android");
        assert_eq!(result.full_path, "Devices › Phones › Android");
    }

    #[test]
    fn folders_before_last_root_are_ignored() {
        let result = classify("Vendor/icons/Media/x.svg");
        assert_eq!(result.category, "Media");
        assert_eq!(result.full_path, "Media");
    }

    #[test]
    fn fallback_chain() {
        // Only style folders: the last one becomes the category.
        let result = classify("Solid/Bold/x.svg");
        assert_eq!(result.category, "Bold");
        assert_eq!(result.style, "Solid");

        // Only a root folder: nothing after it, so Root.
        let result = classify("icons/x.svg");
        assert_eq!(result.category, "Root");
        assert_eq!(result.full_path, "x.svg");
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = PathClassifier::default();
        let a = classifier.classify("assets/Weather - Thin/Sun/x.svg", "x.svg");
        let b = classifier.classify("assets/Weather - Thin/Sun/x.svg", "x.svg");
        assert_eq!(a, b);
    }

    #[test]
    fn style_folders_are_configurable() {
        let mut classifier = PathClassifier::default();
        assert_eq!(classifier.classify("Glyph/Home/x.svg", "x.svg").category, "Glyph");

        assert!(classifier.style_folders_mut().add("Glyph"));
        assert!(!classifier.style_folders_mut().add("glyph"));
        let result = classifier.classify("Glyph/Home/x.svg", "x.svg");
        assert_eq!(result.category, "Home");
        assert_eq!(result.style, "Glyph");

        assert!(classifier.style_folders_mut().remove("GLYPH"));
        assert_eq!(classifier.classify("Glyph/Home/x.svg", "x.svg").category, "Glyph");
    }

    #[test]
    fn style_folder_set_operations() {
        let mut folders = StyleFolders::new();
        assert_eq!(folders.len(), DEFAULT_STYLE_FOLDERS.len());
        assert!(folders.contains("OUTLINE"));

        folders.add("Two Tone");
        assert!(folders.names().any(|name| name == "Two Tone"));
        assert!(!folders.add("   "));

        folders.reset();
        assert_eq!(folders, StyleFolders::new());
        assert!(StyleFolders::empty().is_empty());
    }
}
