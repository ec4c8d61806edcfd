//! Category aggregation.
//!
//! Groups loaded items by category and style, computes library statistics,
//! and picks one representative icon per category for navigation.
//!
//! Representative selection is deterministic: the same items in the same
//! order always produce the same icons.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::classify::ROOT_CATEGORY;
use crate::document::Element;
use crate::icon::{strip_svg_extension, IconItem};

/// Label shown for a selection whose icon has no style.
pub const DEFAULT_STYLE_LABEL: &str = "Default";

// ============================================================================
// Grouping
// ============================================================================

/// Items keyed by category, each group in input order.
pub fn group_by_category(items: &[IconItem]) -> BTreeMap<&str, Vec<&IconItem>> {
    let mut groups: BTreeMap<&str, Vec<&IconItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.category.as_str()).or_default().push(item);
    }
    groups
}

/// Distinct categories, sorted, with `Root` last.
pub fn unique_categories(items: &[IconItem]) -> Vec<&str> {
    let set: BTreeSet<&str> = items.iter().map(|item| item.category.as_str()).collect();
    let (mut named, root): (Vec<&str>, Vec<&str>) =
        set.into_iter().partition(|category| *category != ROOT_CATEGORY);
    named.extend(root);
    named
}

/// Distinct non-empty styles among `items`, sorted.
pub fn styles_for_category<'a, I>(items: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a IconItem>,
{
    let set: BTreeSet<&str> = items
        .into_iter()
        .map(|item| item.style.as_str())
        .filter(|style| !style.is_empty())
        .collect();
    set.into_iter().collect()
}

/// Distinct non-empty styles across the whole library, sorted.
pub fn unique_styles(items: &[IconItem]) -> Vec<&str> {
    styles_for_category(items)
}

/// Items in `category` (all when `None`), optionally narrowed to one style.
pub fn filter_by_category<'a>(
    items: &'a [IconItem],
    category: Option<&str>,
    style: Option<&str>,
) -> Vec<&'a IconItem> {
    items
        .iter()
        .filter(|item| category.is_none_or(|category| item.category == category))
        .filter(|item| style.is_none_or(|style| item.style == style))
        .collect()
}

// ============================================================================
// Statistics
// ============================================================================

/// Per-category counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CategorySummary {
    pub count: usize,
    pub styles: BTreeSet<String>,
}

/// Library-wide counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub total_items: usize,
    pub total_categories: usize,
    pub total_styles: usize,
    pub categories: BTreeMap<String, CategorySummary>,
}

impl CategoryStats {
    pub fn collect(items: &[IconItem]) -> Self {
        let mut categories: BTreeMap<String, CategorySummary> = BTreeMap::new();
        let mut styles = BTreeSet::new();

        for item in items {
            let summary = categories.entry(item.category.clone()).or_default();
            summary.count += 1;
            if !item.style.is_empty() {
                summary.styles.insert(item.style.clone());
                styles.insert(item.style.as_str());
            }
        }

        Self {
            total_items: items.len(),
            total_categories: categories.len(),
            total_styles: styles.len(),
            categories,
        }
    }
}

// ============================================================================
// Representative icons
// ============================================================================

/// The icon chosen to stand for a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryIconSelection {
    /// Copy of the chosen item's tree.
    pub icon: Element,
    pub style: String,
    pub file_name: String,
    /// `original_path` of the chosen item.
    pub item_path: String,
}

impl CategoryIconSelection {
    fn from_item(item: &IconItem) -> Self {
        Self {
            icon: item.svg.clone(),
            style: item.style.clone(),
            file_name: item.file_name.clone(),
            item_path: item.original_path.clone(),
        }
    }

    /// The style, or [`DEFAULT_STYLE_LABEL`] when it is empty.
    pub fn style_label(&self) -> &str {
        if self.style.is_empty() {
            DEFAULT_STYLE_LABEL
        } else {
            &self.style
        }
    }
}

/// Most frequent non-empty style. On a tie the style seen first wins.
pub fn dominant_style<'a, I>(items: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a IconItem>,
{
    // Insertion-ordered so that ties resolve by first occurrence.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for item in items {
        if item.style.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(style, _)| *style == item.style) {
            Some((_, count)) => *count += 1,
            None => counts.push((item.style.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (style, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((style, count));
        }
    }
    best.map(|(style, _)| style)
}

type SelectionStrategy = for<'a> fn(&str, &[&'a IconItem]) -> Option<&'a IconItem>;

/// Tried in order; the first hit is the representative.
const SELECTION_STRATEGIES: &[SelectionStrategy] = &[
    exact_name_match,
    partial_name_match,
    first_word_match,
    alphabetical_first,
];

/// Picks the icon that best represents `category`.
///
/// Only items of the category are considered; when any of them has
/// `dominant_style`, the pool narrows to those. Returns `None` for a
/// category with no items.
pub fn select_representative_icon(
    category: &str,
    items: &[IconItem],
    dominant_style: Option<&str>,
) -> Option<CategoryIconSelection> {
    let in_category: Vec<&IconItem> = items.iter().filter(|item| item.category == category).collect();
    if in_category.is_empty() {
        return None;
    }

    let pool = match dominant_style {
        Some(style) if in_category.iter().any(|item| item.style == style) => in_category
            .into_iter()
            .filter(|item| item.style == style)
            .collect(),
        _ => in_category,
    };

    SELECTION_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(category, &pool))
        .map(CategoryIconSelection::from_item)
}

/// Lowercase alphanumerics only, without the `.svg` extension.
fn normalize(name: &str) -> String {
    strip_svg_extension(name)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn exact_name_match<'a>(category: &str, pool: &[&'a IconItem]) -> Option<&'a IconItem> {
    let target = normalize(category);
    pool.iter().copied().find(|item| normalize(&item.file_name) == target)
}

fn partial_name_match<'a>(category: &str, pool: &[&'a IconItem]) -> Option<&'a IconItem> {
    let category = category.to_lowercase();
    pool.iter().copied().find(|item| {
        let base = strip_svg_extension(&item.file_name).to_lowercase();
        !base.is_empty() && (category.contains(&base) || base.contains(&category))
    })
}

fn first_word_match<'a>(category: &str, pool: &[&'a IconItem]) -> Option<&'a IconItem> {
    let category = category.to_lowercase();
    let word = category
        .split(|c: char| c.is_whitespace() || c == '-')
        .next()
        .filter(|word| word.chars().count() > 2)?;
    pool.iter()
        .copied()
        .find(|item| item.file_name.to_lowercase().contains(word))
}

fn alphabetical_first<'a>(_category: &str, pool: &[&'a IconItem]) -> Option<&'a IconItem> {
    pool.iter().copied().min_by(|a, b| {
        a.file_name
            .to_lowercase()
            .cmp(&b.file_name.to_lowercase())
            .then_with(|| a.file_name.cmp(&b.file_name))
            .then_with(|| a.original_path.cmp(&b.original_path))
    })
}

// ============================================================================
// Cache
// ============================================================================

/// Representative icons for every category, computed once per load.
///
/// Every category is narrowed by the same library-wide dominant style, so
/// the icons shown side by side share one look. The selections stay fixed
/// while the user filters and browses; they only change through
/// [`CategoryIcons::regenerate`].
#[derive(Debug, Clone, Default)]
pub struct CategoryIcons {
    selections: BTreeMap<String, CategoryIconSelection>,
    dominant_style: Option<String>,
    initialized: bool,
}

impl CategoryIcons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the selections from the full item set, with the dominant
    /// style counted over `items` in slice order.
    ///
    /// Does nothing when already initialized.
    pub fn initialize(&mut self, items: &[IconItem]) {
        self.initialize_with_style(items, dominant_style(items));
    }

    /// Like [`initialize`](Self::initialize), with the dominant style given
    /// by the caller. Use it when `items` has been reordered since loading
    /// and ties must still go to the first style loaded.
    pub fn initialize_with_style(&mut self, items: &[IconItem], dominant: Option<&str>) {
        if self.initialized {
            return;
        }
        for category in group_by_category(items).into_keys() {
            if let Some(selection) = select_representative_icon(category, items, dominant) {
                self.selections.insert(category.to_string(), selection);
            }
        }
        self.dominant_style = dominant.map(str::to_string);
        self.initialized = true;
        debug!(
            categories = self.selections.len(),
            dominant_style = ?self.dominant_style,
            "Category icons initialized"
        );
    }

    /// Drops the cached selections and computes them again.
    pub fn regenerate(&mut self, items: &[IconItem]) {
        self.clear();
        self.initialize(items);
    }

    /// [`regenerate`](Self::regenerate) with a caller-supplied dominant style.
    pub fn regenerate_with_style(&mut self, items: &[IconItem], dominant: Option<&str>) {
        self.clear();
        self.initialize_with_style(items, dominant);
    }

    pub fn clear(&mut self) {
        self.selections.clear();
        self.dominant_style = None;
        self.initialized = false;
    }

    /// The library-wide style the selections were narrowed by.
    pub fn dominant_style(&self) -> Option<&str> {
        self.dominant_style.as_deref()
    }

    /// The dominant style, or [`DEFAULT_STYLE_LABEL`] when no item has one.
    pub fn style_label(&self) -> &str {
        self.dominant_style().unwrap_or(DEFAULT_STYLE_LABEL)
    }

    pub fn get(&self, category: &str) -> Option<&CategoryIconSelection> {
        self.selections.get(category)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryIconSelection)> {
        self.selections.iter().map(|(category, selection)| (category.as_str(), selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: &str, style: &str, path: &str) -> IconItem {
        let file_name = path.rsplit('/').next().unwrap().to_string();
        IconItem {
            category: category.to_string(),
            style: style.to_string(),
            subcategory: String::new(),
            full_path: category.to_string(),
            original_path: path.to_string(),
            file_name,
            svg_text: "<svg/>".to_string(),
            svg: Element::new("svg").with_attr("id", path),
            file_size: 6,
        }
    }

    #[test]
    fn dominant_style_counts_and_breaks_ties_by_first_seen() {
        let items = [
            item("A", "Bold", "A/1.svg"),
            item("A", "Outline", "A/2.svg"),
            item("A", "Outline", "A/3.svg"),
            item("A", "", "A/4.svg"),
        ];
        assert_eq!(dominant_style(&items), Some("Outline"));

        let tied = [item("A", "Solid", "A/1.svg"), item("A", "Bold", "A/2.svg")];
        assert_eq!(dominant_style(&tied), Some("Solid"));
        assert_eq!(dominant_style(&[item("A", "", "A/1.svg")]), None);
    }

    #[test]
    fn exact_name_beats_alphabetical() {
        let items = [
            item("Arrows", "", "Arrows/alpha.svg"),
            item("Arrows", "", "Arrows/arrows.svg"),
        ];
        let selection = select_representative_icon("Arrows", &items, None).unwrap();
        assert_eq!(selection.file_name, "arrows.svg");
        assert_eq!(selection.style_label(), DEFAULT_STYLE_LABEL);
    }

    #[test]
    fn normalized_names_match() {
        let items = [
            item("Social Media", "", "s/a.svg"),
            item("Social Media", "", "s/social-media.svg"),
        ];
        let selection = select_representative_icon("Social Media", &items, None).unwrap();
        assert_eq!(selection.file_name, "social-media.svg");
    }

    #[test]
    fn partial_and_first_word_matches() {
        let partial = [item("Weather", "", "w/b.svg"), item("Weather", "", "w/weather-sun.svg")];
        let selection = select_representative_icon("Weather", &partial, None).unwrap();
        assert_eq!(selection.file_name, "weather-sun.svg");

        let word = [item("Files Folders", "", "f/a.svg"), item("Files Folders", "", "f/my-files.svg")];
        let selection = select_representative_icon("Files Folders", &word, None).unwrap();
        assert_eq!(selection.file_name, "my-files.svg");
    }

    #[test]
    fn dominant_style_narrows_the_pool() {
        let items = [
            item("Home", "Bold", "Bold/Home/home.svg"),
            item("Home", "Outline", "Outline/Home/home.svg"),
            item("Home", "Outline", "Outline/Home/house.svg"),
        ];
        let selection = select_representative_icon("Home", &items, Some("Outline")).unwrap();
        assert_eq!(selection.item_path, "Outline/Home/home.svg");
        assert_eq!(selection.style_label(), "Outline");

        // A style nobody in the category has leaves the pool alone.
        let selection = select_representative_icon("Home", &items, Some("Thin")).unwrap();
        assert_eq!(selection.item_path, "Bold/Home/home.svg");
    }

    #[test]
    fn alphabetical_fallback_is_deterministic() {
        let items = [
            item("Misc", "", "b/Zeta.svg"),
            item("Misc", "", "b/beta.svg"),
            item("Misc", "", "a/beta.svg"),
        ];
        let first = select_representative_icon("Misc", &items, None).unwrap();
        let reversed: Vec<IconItem> = items.iter().rev().cloned().collect();
        let second = select_representative_icon("Misc", &reversed, None).unwrap();
        assert_eq!(first.item_path, "a/beta.svg");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_category_has_no_icon() {
        assert_eq!(select_representative_icon("None", &[item("A", "", "A/a.svg")], None), None);
    }

    #[test]
    fn root_sorts_last() {
        let items = [
            item("Root", "", "x.svg"),
            item("Zoo", "", "Zoo/a.svg"),
            item("Arrows", "Bold", "Arrows/a.svg"),
        ];
        assert_eq!(unique_categories(&items), vec!["Arrows", "Zoo", "Root"]);
        assert_eq!(unique_styles(&items), vec!["Bold"]);
    }

    #[test]
    fn filters_by_category_and_style() {
        let items = [
            item("A", "Bold", "A/1.svg"),
            item("A", "Thin", "A/2.svg"),
            item("B", "Bold", "B/3.svg"),
        ];
        assert_eq!(filter_by_category(&items, Some("A"), None).len(), 2);
        assert_eq!(filter_by_category(&items, None, Some("Bold")).len(), 2);
        assert_eq!(filter_by_category(&items, Some("A"), Some("Thin"))[0].original_path, "A/2.svg");
        assert_eq!(styles_for_category(group_by_category(&items)["A"].iter().copied()), vec!["Bold", "Thin"]);
    }

    #[test]
    fn stats_count_categories_and_styles() {
        let items = [
            item("A", "Bold", "A/1.svg"),
            item("A", "", "A/2.svg"),
            item("B", "Thin", "B/3.svg"),
        ];
        let stats = CategoryStats::collect(&items);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_categories, 2);
        assert_eq!(stats.total_styles, 2);
        assert_eq!(stats.categories["A"].count, 2);
        assert_eq!(stats.categories["A"].styles.len(), 1);
    }

    #[test]
    fn cache_uses_the_library_wide_dominant_style() {
        // Category A alone would pick Bold; across the library Outline wins.
        let items = vec![
            item("A", "Bold", "Bold/A/a.svg"),
            item("A", "Outline", "Outline/A/z.svg"),
            item("B", "Outline", "Outline/B/1.svg"),
            item("B", "Outline", "Outline/B/2.svg"),
        ];
        let mut icons = CategoryIcons::new();
        icons.initialize(&items);

        assert_eq!(icons.get("A").unwrap().item_path, "Outline/A/z.svg");
        assert_eq!(icons.dominant_style(), Some("Outline"));
        assert_eq!(icons.style_label(), "Outline");

        icons.regenerate_with_style(&items, Some("Bold"));
        assert_eq!(icons.get("A").unwrap().item_path, "Bold/A/a.svg");
        assert_eq!(icons.get("B").unwrap().item_path, "Outline/B/1.svg");

        icons.regenerate(&[item("C", "", "C/c.svg")]);
        assert_eq!(icons.style_label(), DEFAULT_STYLE_LABEL);
    }

    #[test]
    fn cache_is_stable_until_regenerated() {
        let items = vec![item("A", "", "A/b.svg"), item("B", "", "B/c.svg")];
        let mut icons = CategoryIcons::new();
        icons.initialize(&items);
        assert_eq!(icons.get("A").unwrap().file_name, "b.svg");

        let more = vec![item("A", "", "A/a.svg"), items[0].clone(), items[1].clone()];
        icons.initialize(&more);
        assert_eq!(icons.get("A").unwrap().file_name, "b.svg");

        icons.regenerate(&more);
        assert_eq!(icons.get("A").unwrap().file_name, "a.svg");
        assert_eq!(icons.iter().count(), 2);
    }
}
