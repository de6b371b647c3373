use trialdesk_core::{Category, FolderListing};

/// One selectable line of the folder browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserEntry {
    pub category: Category,
    pub name: String,
}

impl BrowserEntry {
    pub fn key(&self) -> String {
        self.category.item_key(&self.name)
    }
}

/// Cursor over the folder items of every known category, in display order.
/// Categories with no items contribute no entries.
#[derive(Debug, Clone, Default)]
pub struct BrowserState {
    pub entries: Vec<BrowserEntry>,
    pub cursor: usize,
}

impl BrowserState {
    pub fn from_listing(listing: &FolderListing) -> Self {
        let entries = Category::all()
            .iter()
            .flat_map(|&category| {
                listing.items(category).iter().map(move |name| BrowserEntry {
                    category,
                    name: name.clone(),
                })
            })
            .collect();
        Self { entries, cursor: 0 }
    }

    pub fn current(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.cursor)
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = self.entries.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    pub fn go_top(&mut self) {
        self.cursor = 0;
    }

    pub fn go_bottom(&mut self) {
        self.cursor = self.entries.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn entries_follow_category_order() {
        let mut map = BTreeMap::new();
        map.insert(Category::Label.name().to_string(), vec!["insert".to_string()]);
        map.insert(
            Category::Cde.name().to_string(),
            vec!["a".to_string(), "b".to_string()],
        );
        map.insert("unknown".to_string(), vec!["z".to_string()]);
        let state = BrowserState::from_listing(&FolderListing::from_map(map));

        let names: Vec<&str> = state.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "insert"]);
        assert_eq!(state.entries[2].category, Category::Label);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut listing = FolderListing::empty();
        listing.insert(Category::Cde, vec!["a".into(), "b".into()]);
        let mut state = BrowserState::from_listing(&listing);
        state.move_by(-3);
        assert_eq!(state.cursor, 0);
        state.move_by(10);
        assert_eq!(state.cursor, 1);
        assert_eq!(state.current().map(BrowserEntry::key).as_deref(), Some("CDE同类品种-临床备案公示平台试验信息/b"));
    }
}
