use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural bucket that variation matches are counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TagCategory {
    H2,
    H3,
    H4,
    /// `<p>` and `<li>` elements.
    BodyText,
}

impl TagCategory {
    /// Every category, in presentation order.
    pub const ALL: [TagCategory; 4] = [
        TagCategory::H2,
        TagCategory::H3,
        TagCategory::H4,
        TagCategory::BodyText,
    ];

    /// Map an element's local name to the category it feeds, if any.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h2" => Some(TagCategory::H2),
            "h3" => Some(TagCategory::H3),
            "h4" => Some(TagCategory::H4),
            "p" | "li" => Some(TagCategory::BodyText),
            _ => None,
        }
    }

    /// Short label used in reports ("H2", "H3", "H4", "P").
    pub fn label(self) -> &'static str {
        match self {
            TagCategory::H2 => "H2",
            TagCategory::H3 => "H3",
            TagCategory::H4 => "H4",
            TagCategory::BodyText => "P",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            TagCategory::H2 => 0,
            TagCategory::H3 => 1,
            TagCategory::H4 => 2,
            TagCategory::BodyText => 3,
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Visible text of one tracked element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TextBlock {
    pub category: TagCategory,
    /// Whitespace-collapsed text with its original case.
    pub text: String,
}

impl TextBlock {
    pub(crate) fn new(category: TagCategory, text: String) -> Self {
        Self { category, text }
    }

    /// Lower-cased text used for matching.
    pub fn match_text(&self) -> String {
        self.text.to_lowercase()
    }
}
