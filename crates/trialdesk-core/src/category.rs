//! The fixed set of literature categories shown in the folder browser.

/// Default directory on the backend host that holds one sub-directory per category.
pub const DEFAULT_DATA_ROOT: &str = "E:\\temp\\氨氯地平缬沙坦氢氯噻嗪片-demo";

/// A literature category. Closed set; the backend never invents new ones for
/// the folder listing, and extraction only understands the first two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Domestic registry entries for same-class products.
    Cde,
    /// Foreign clinical-trial publications.
    ForeignTrial,
    /// Regulations, guidelines and treatment guides.
    Regulation,
    /// Package inserts.
    Label,
}

impl Category {
    /// All categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Cde,
            Category::ForeignTrial,
            Category::Regulation,
            Category::Label,
        ]
    }

    /// Categories whose items can be sent to the extraction backend.
    pub fn extractable() -> &'static [Category] {
        &[Category::Cde, Category::ForeignTrial]
    }

    /// The backend's name for this category (also its directory name).
    pub fn name(self) -> &'static str {
        match self {
            Self::Cde => "CDE同类品种-临床备案公示平台试验信息",
            Self::ForeignTrial => "国外试验文献调研",
            Self::Regulation => "法规_指导原则_用药指南",
            Self::Label => "说明书",
        }
    }

    /// Parse a backend category name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Category> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    /// Whether items in this category can be selected in the browser.
    pub fn enabled(self) -> bool {
        matches!(self, Self::Cde | Self::ForeignTrial)
    }

    pub fn is_extractable(self) -> bool {
        Self::extractable().contains(&self)
    }

    /// Full backend path of this category under `data_root`.
    pub fn path(self, data_root: &str) -> String {
        let root = data_root.trim_end_matches(['\\', '/']);
        format!("{}\\{}", root, self.name())
    }

    /// Composite selection key for an item in this category.
    pub fn item_key(self, item: &str) -> String {
        format!("{}/{}", self.name(), item)
    }
}

/// Split a composite `"<category>/<item>"` key. The item part may itself contain `/`.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once('/')
}

/// The category of a composite key, if it names a known category.
pub fn key_category(key: &str) -> Option<Category> {
    split_key(key).and_then(|(section, _)| Category::from_name(section))
}
