//! The icon library.
//!
//! [`IconLibrary`] is the entry point for a host application: it loads a
//! batch of SVG files, classifies them, and serves the filtered, display-ready
//! views on top of the loaded set.
//!
//! # Loading
//!
//! Each input runs through parse, sanitize, classify and content style
//! detection independently, in parallel. Files that fail to parse are
//! reported and skipped; the rest are sorted and the category icons are
//! computed once for the full set.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregate::{self, CategoryIconSelection, CategoryIcons, CategoryStats};
use crate::classify::{ClassifierConfig, PathClassifier, StyleFolders};
use crate::color::with_current_color;
use crate::document::{Element, SvgDocument};
use crate::error::SvgError;
use crate::icon::{IconInput, IconItem};
use crate::optimize::{self, Optimized, OptimizerConfig};
use crate::profile::{Configurable, LibraryProfile};

// ============================================================================
// Load Report
// ============================================================================

/// A file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: String,
    pub error: SvgError,
}

/// Outcome of [`IconLibrary::load`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Number of items added.
    pub loaded: usize,
    /// Inputs ignored because they are not `.svg` files.
    pub skipped: usize,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Active browsing filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    /// Case-insensitive text matched against name, path, subcategory and style.
    pub search: String,
    pub category: Option<String>,
    pub style: Option<String>,
    pub favorites_only: bool,
}

impl Filters {
    fn matches(&self, item: &IconItem, query: &str, favorite: bool) -> bool {
        if self.category.as_deref().is_some_and(|category| item.category != category) {
            return false;
        }
        if self.style.as_deref().is_some_and(|style| item.style != style) {
            return false;
        }
        if !query.is_empty() {
            let haystack = format!(
                "{} {} {} {}",
                item.file_name, item.original_path, item.subcategory, item.style
            )
            .to_lowercase();
            if !haystack.contains(query) {
                return false;
            }
        }
        !self.favorites_only || favorite
    }
}

// ============================================================================
// IconLibrary
// ============================================================================

/// A loaded set of icons with its browsing state.
#[derive(Debug, Clone, Default)]
pub struct IconLibrary {
    classifier: PathClassifier,
    optimizer: OptimizerConfig,
    items: Vec<IconItem>,
    /// Original paths of `items` in the order they were loaded.
    load_order: Vec<String>,
    favorites: BTreeSet<String>,
    category_icons: CategoryIcons,

    /// Filters applied by [`filtered_items`](Self::filtered_items).
    pub filters: Filters,
}

impl IconLibrary {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            classifier: PathClassifier::new(config),
            ..Default::default()
        }
    }

    /// Replaces the library contents with `inputs`.
    ///
    /// Inputs whose file name does not end in `.svg` are skipped. Favorites
    /// survive a reload, since they are keyed by path.
    pub fn load(&mut self, inputs: Vec<IconInput>) -> LoadReport {
        let (svgs, others): (Vec<IconInput>, Vec<IconInput>) = inputs
            .into_iter()
            .partition(|input| input.file_name.to_lowercase().ends_with(".svg"));
        if !others.is_empty() {
            debug!(count = others.len(), "Skipping non-SVG files");
        }

        let classifier = &self.classifier;
        let results: Vec<Result<IconItem, LoadFailure>> = svgs
            .into_par_iter()
            .map(|input| load_item(classifier, input))
            .collect();

        let mut report = LoadReport {
            skipped: others.len(),
            ..Default::default()
        };
        let mut items = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(item) => items.push(item),
                Err(failure) => {
                    warn!(path = %failure.path, error = %failure.error, "Failed to load SVG");
                    report.failures.push(failure);
                }
            }
        }
        report.loaded = items.len();
        self.load_order = items.iter().map(|item| item.original_path.clone()).collect();
        sort_for_display(&mut items);

        self.items = items;
        self.refresh_category_icons();

        let stats = self.stats();
        info!(
            loaded = report.loaded,
            failed = report.failures.len(),
            categories = stats.total_categories,
            styles = stats.total_styles,
            "Icon library loaded"
        );
        report
    }

    /// Classifies every loaded item again with the current configuration.
    ///
    /// Call after changing the style folders; category icons are regenerated.
    pub fn reclassify(&mut self) {
        for item in &mut self.items {
            let result = self.classifier.classify(&item.original_path, &item.file_name);
            let input = IconInput {
                relative_path: item.original_path.clone(),
                file_name: std::mem::take(&mut item.file_name),
                svg_text: std::mem::take(&mut item.svg_text),
            };
            *item = IconItem::new(input, result, std::mem::take(&mut item.svg));
        }
        sort_for_display(&mut self.items);
        self.refresh_category_icons();
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    /// All items, sorted by category, style, subcategory and file name.
    pub fn items(&self) -> &[IconItem] {
        &self.items
    }

    /// The item loaded from `path`.
    pub fn item(&self, path: &str) -> Option<&IconItem> {
        self.items.iter().find(|item| item.original_path == path)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items passing [`filters`](Self::filters), favorites first.
    pub fn filtered_items(&self) -> Vec<&IconItem> {
        let query = self.filters.search.trim().to_lowercase();
        let mut items: Vec<&IconItem> = self
            .items
            .iter()
            .filter(|item| {
                self.filters
                    .matches(item, &query, self.is_favorite(&item.original_path))
            })
            .collect();

        items.sort_by(|a, b| {
            let favorite = |item: &IconItem| !self.is_favorite(&item.original_path);
            favorite(a)
                .cmp(&favorite(b))
                .then_with(|| a.category.cmp(&b.category))
                .then_with(|| a.file_name.cmp(&b.file_name))
                .then_with(|| a.style.cmp(&b.style))
                .then_with(|| a.subcategory.cmp(&b.subcategory))
        });
        items
    }

    /// Copy of an item's tree with single-color paint set to `currentColor`.
    pub fn display_svg(&self, path: &str) -> Option<Element> {
        self.item(path).map(|item| with_current_color(&item.svg))
    }

    /// Optimizes an item's original source. The item is not modified.
    pub fn optimize_item(&self, path: &str, config: &OptimizerConfig) -> Option<Optimized> {
        self.item(path)
            .map(|item| optimize::optimize(&item.svg_text, config))
    }

    // ------------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------------

    /// Flips the favorite flag of `path`. Returns the new state.
    pub fn toggle_favorite(&mut self, path: &str) -> bool {
        if self.favorites.remove(path) {
            false
        } else {
            self.favorites.insert(path.to_string());
            true
        }
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.favorites.contains(path)
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
    }

    pub fn favorites(&self) -> impl Iterator<Item = &str> {
        self.favorites.iter().map(String::as_str)
    }

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    /// The cached representative icon of `category`.
    pub fn category_icon(&self, category: &str) -> Option<&CategoryIconSelection> {
        self.category_icons.get(category)
    }

    /// The library-wide style the category icons were picked by, or
    /// `"Default"` when no item has a style.
    pub fn category_icon_style(&self) -> &str {
        self.category_icons.style_label()
    }

    pub fn regenerate_category_icons(&mut self) {
        self.refresh_category_icons();
    }

    /// Recomputes the category icons with the dominant style counted in load
    /// order, so a tie goes to the style loaded first rather than the one
    /// that sorts first.
    fn refresh_category_icons(&mut self) {
        let by_path: BTreeMap<&str, &IconItem> = self
            .items
            .iter()
            .map(|item| (item.original_path.as_str(), item))
            .collect();
        let dominant = aggregate::dominant_style(
            self.load_order
                .iter()
                .filter_map(|path| by_path.get(path.as_str()).copied()),
        )
        .map(str::to_string);
        self.category_icons
            .regenerate_with_style(&self.items, dominant.as_deref());
    }

    /// Categories with `Root` last.
    pub fn categories(&self) -> Vec<&str> {
        aggregate::unique_categories(&self.items)
    }

    pub fn styles(&self) -> Vec<&str> {
        aggregate::unique_styles(&self.items)
    }

    pub fn stats(&self) -> CategoryStats {
        CategoryStats::collect(&self.items)
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Style folders used for classification. Takes effect on the next
    /// [`load`](Self::load) or [`reclassify`](Self::reclassify).
    pub fn style_folders_mut(&mut self) -> &mut StyleFolders {
        self.classifier.style_folders_mut()
    }

    pub fn optimizer(&self) -> &OptimizerConfig {
        &self.optimizer
    }

    pub fn optimizer_mut(&mut self) -> &mut OptimizerConfig {
        &mut self.optimizer
    }
}

fn load_item(classifier: &PathClassifier, input: IconInput) -> Result<IconItem, LoadFailure> {
    let document = SvgDocument::parse_sanitized(&input.svg_text).map_err(|error| LoadFailure {
        path: input.relative_path.clone(),
        error,
    })?;
    let classification = classifier.classify(&input.relative_path, &input.file_name);
    Ok(IconItem::new(input, classification, document.root))
}

fn sort_for_display(items: &mut [IconItem]) {
    items.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.style.cmp(&b.style))
            .then_with(|| a.subcategory.cmp(&b.subcategory))
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
}

impl Configurable for IconLibrary {
    /// Applies style folders, optimizer flags and favorites.
    ///
    /// Loaded items are reclassified when the style folders change.
    fn apply_profile(&mut self, profile: &LibraryProfile) {
        let style_folders = match &profile.style_folders {
            Some(names) => StyleFolders::from_names(names),
            None => StyleFolders::default(),
        };
        if *self.classifier.style_folders_mut() != style_folders {
            *self.classifier.style_folders_mut() = style_folders;
            self.reclassify();
        }

        self.optimizer = profile.optimizer.clone().unwrap_or_default();
        self.favorites = profile.favorites.iter().cloned().collect();
    }

    fn export_profile(&self) -> LibraryProfile {
        let style_folders = &self.classifier.config().style_folders;
        LibraryProfile {
            style_folders: (*style_folders != StyleFolders::default())
                .then(|| style_folders.names().map(str::to_string).collect()),
            optimizer: (self.optimizer != OptimizerConfig::default()).then(|| self.optimizer.clone()),
            favorites: self.favorites.iter().cloned().collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: &str = r##"<svg viewBox="0 0 24 24" fill="none"><path d="M4 4h16v16H4z" fill="none" stroke="#000"/></svg>"##;
    const SOLID: &str = r##"<svg viewBox="0 0 24 24"><path d="M4 4h16v16H4z" fill="#333"/></svg>"##;

    fn library() -> (IconLibrary, LoadReport) {
        let mut library = IconLibrary::default();
        let report = library.load(vec![
            IconInput::from_path("Outline/Brands/comment.svg", OUTLINE),
            IconInput::from_path("icons/Call - Bold/phone.svg", SOLID),
            IconInput::from_path("Arrows/left.svg", SOLID),
            IconInput::from_path("Arrows/right.svg", OUTLINE),
            IconInput::from_path("icon.svg", SOLID),
            IconInput::from_path("Arrows/broken.svg", "<svg><path></svg>"),
            IconInput::from_path("readme.txt", "hello"),
        ]);
        (library, report)
    }

    fn paths(items: &[&IconItem]) -> Vec<String> {
        items.iter().map(|item| item.original_path.clone()).collect()
    }

    #[test]
    fn load_classifies_and_reports_failures() {
        let (library, report) = library();

        assert_eq!(report.loaded, 5);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "Arrows/broken.svg");
        assert!(matches!(report.failures[0].error, SvgError::Parse(_)));

        let comment = library.item("Outline/Brands/comment.svg").unwrap();
        assert_eq!((comment.category.as_str(), comment.style.as_str()), ("Brands", "Outline"));
        let phone = library.item("icons/Call - Bold/phone.svg").unwrap();
        assert_eq!((phone.category.as_str(), phone.style.as_str()), ("Call", "Bold"));
        assert_eq!(library.item("icon.svg").unwrap().category, "Root");
        // No style folder: detected from the content.
        assert_eq!(library.item("Arrows/right.svg").unwrap().style, "Outline");
    }

    #[test]
    fn items_are_sorted_for_display() {
        let (library, _) = library();
        let order: Vec<&str> = library.items().iter().map(|item| item.original_path.as_str()).collect();
        assert_eq!(
            order,
            [
                "Arrows/right.svg",
                "Arrows/left.svg",
                "Outline/Brands/comment.svg",
                "icons/Call - Bold/phone.svg",
                "icon.svg",
            ]
        );
        assert_eq!(library.categories(), ["Arrows", "Brands", "Call", "Root"]);
    }

    #[test]
    fn filters_and_favorites() {
        let (mut library, _) = library();
        assert!(library.toggle_favorite("Arrows/right.svg"));

        library.filters.category = Some("Arrows".into());
        assert_eq!(paths(&library.filtered_items()), ["Arrows/right.svg", "Arrows/left.svg"]);

        library.filters = Filters {
            search: "PHONE".into(),
            ..Default::default()
        };
        assert_eq!(paths(&library.filtered_items()), ["icons/Call - Bold/phone.svg"]);

        library.filters = Filters {
            favorites_only: true,
            ..Default::default()
        };
        assert_eq!(paths(&library.filtered_items()), ["Arrows/right.svg"]);

        assert!(!library.toggle_favorite("Arrows/right.svg"));
        assert!(library.filtered_items().is_empty());
    }

    #[test]
    fn display_svg_leaves_the_item_alone() {
        let (library, _) = library();
        let display = library.display_svg("Arrows/left.svg").unwrap();

        assert_eq!(display.find_all("path").next().unwrap().attr("fill"), Some("currentColor"));
        let item = library.item("Arrows/left.svg").unwrap();
        assert_eq!(item.svg.find_all("path").next().unwrap().attr("fill"), Some("#333"));
        assert_eq!(item.svg_text, SOLID);
    }

    #[test]
    fn optimize_item_reports_sizes() {
        let (library, _) = library();
        let result = library
            .optimize_item("Arrows/left.svg", library.optimizer())
            .unwrap();
        assert_eq!(result.original_size, SOLID.len());
        assert!(result.optimized_size <= result.original_size);
        assert!(library.optimize_item("missing.svg", library.optimizer()).is_none());
    }

    #[test]
    fn category_icons_cover_every_category() {
        let (mut library, _) = library();
        for category in ["Arrows", "Brands", "Call", "Root"] {
            assert!(library.category_icon(category).is_some(), "{category}");
        }
        let before = library.category_icon("Arrows").cloned();
        library.regenerate_category_icons();
        assert_eq!(library.category_icon("Arrows").cloned(), before);
    }

    #[test]
    fn category_icons_follow_the_library_wide_style() {
        let mut library = IconLibrary::default();
        library.load(vec![
            IconInput::from_path("Bold/A/a.svg", SOLID),
            IconInput::from_path("Outline/A/z.svg", OUTLINE),
            IconInput::from_path("Outline/B/1.svg", OUTLINE),
            IconInput::from_path("Outline/B/2.svg", OUTLINE),
        ]);
        assert_eq!(library.category_icon("A").unwrap().item_path, "Outline/A/z.svg");
        assert_eq!(library.category_icon_style(), "Outline");
    }

    #[test]
    fn dominant_style_ties_go_to_the_first_loaded() {
        let mut library = IconLibrary::default();
        library.load(vec![
            IconInput::from_path("Outline/A/z.svg", OUTLINE),
            IconInput::from_path("Bold/A/a.svg", SOLID),
        ]);
        // Sorted for display, Bold comes first; the tie still goes to Outline.
        assert_eq!(library.items()[0].original_path, "Bold/A/a.svg");
        assert_eq!(library.category_icon("A").unwrap().item_path, "Outline/A/z.svg");

        library.regenerate_category_icons();
        assert_eq!(library.category_icon_style(), "Outline");
    }

    #[test]
    fn profile_roundtrip() {
        let (mut library, _) = library();
        library.toggle_favorite("icon.svg");
        assert_eq!(library.export_profile(), LibraryProfile::new().with_favorite("icon.svg"));

        let profile = LibraryProfile::new()
            .with_style_folders(["brands"])
            .with_optimizer(OptimizerConfig::none());
        library.apply_profile(&profile);

        assert_eq!(library.favorites().count(), 0);
        assert_eq!(library.optimizer(), &OptimizerConfig::none());
        // "Outline" is no longer a style folder and "Brands" now is.
        let comment = library.item("Outline/Brands/comment.svg").unwrap();
        assert_eq!((comment.category.as_str(), comment.style.as_str()), ("Outline", "Brands"));

        let exported = library.export_profile();
        assert_eq!(exported.style_folders, Some(vec!["brands".to_string()]));
        assert_eq!(exported.optimizer, Some(OptimizerConfig::none()));
    }
}
