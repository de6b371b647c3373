//! Folder listing and the browser's multi-selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::{Category, key_category};

/// Category name → ordered folder-item names, as returned by `/folders/all`.
///
/// Names the client does not know are kept so totals stay honest, but the
/// browser only renders [`Category::all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderListing(BTreeMap<String, Vec<String>>);

impl FolderListing {
    /// A listing with every known category mapped to no items.
    pub fn empty() -> Self {
        Self(
            Category::all()
                .iter()
                .map(|c| (c.name().to_string(), Vec::new()))
                .collect(),
        )
    }

    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }

    pub fn insert(&mut self, category: Category, items: Vec<String>) {
        self.0.insert(category.name().to_string(), items);
    }

    /// Items of a category, empty if the backend did not mention it.
    pub fn items(&self, category: Category) -> &[String] {
        self.0
            .get(category.name())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of items across every key, known or not.
    pub fn total_items(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Composite `"<category>/<item>"` keys chosen in the browser, in the order
/// they were first toggled on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    keys: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the key if absent, remove it if present.
    pub fn toggle(&mut self, key: &str) {
        if let Some(pos) = self.keys.iter().position(|k| k == key) {
            self.keys.remove(pos);
        } else {
            self.keys.push(key.to_string());
        }
    }

    pub fn toggle_item(&mut self, category: Category, item: &str) {
        self.toggle(&category.item_key(item));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn contains_item(&self, category: Category, item: &str) -> bool {
        self.contains(&category.item_key(item))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Keys belonging to a category the extraction backend understands,
    /// in selection order.
    pub fn extractable_keys(&self) -> Vec<String> {
        self.keys
            .iter()
            .filter(|k| key_category(k).is_some_and(Category::is_extractable))
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_original() {
        let mut sel = SelectionSet::new();
        sel.toggle_item(Category::Cde, "doc1");
        let before = sel.clone();

        sel.toggle_item(Category::ForeignTrial, "paper");
        sel.toggle_item(Category::ForeignTrial, "paper");
        assert_eq!(sel, before);

        sel.toggle_item(Category::Cde, "doc1");
        sel.toggle_item(Category::Cde, "doc1");
        assert_eq!(sel, before);
    }

    #[test]
    fn extractable_keys_filters_other_categories() {
        let mut sel = SelectionSet::new();
        sel.toggle_item(Category::Label, "insert");
        sel.toggle_item(Category::ForeignTrial, "b");
        sel.toggle("garbage-key");
        sel.toggle_item(Category::Cde, "a");

        assert_eq!(
            sel.extractable_keys(),
            vec![
                "国外试验文献调研/b".to_string(),
                "CDE同类品种-临床备案公示平台试验信息/a".to_string(),
            ]
        );
    }

    #[test]
    fn only_disabled_categories_yields_nothing_to_extract() {
        let mut sel = SelectionSet::new();
        sel.toggle_item(Category::Regulation, "guide");
        sel.toggle_item(Category::Label, "insert");
        assert!(!sel.is_empty());
        assert!(sel.extractable_keys().is_empty());
    }

    #[test]
    fn empty_listing_has_all_categories_and_no_items() {
        let listing = FolderListing::empty();
        assert_eq!(listing.total_items(), 0);
        assert_eq!(listing.iter().count(), Category::all().len());
        assert!(listing.items(Category::Cde).is_empty());
    }

    #[test]
    fn listing_counts_unknown_keys() {
        let json = r#"{"说明书": ["a"], "somewhere-else": ["x", "y"]}"#;
        let listing: FolderListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.total_items(), 3);
        assert_eq!(listing.items(Category::Label), ["a".to_string()]);
        assert!(listing.items(Category::Cde).is_empty());
    }
}
