//! Course modules: one renewable-energy topic and its content lists.

use serde::{Deserialize, Serialize};

use super::content::{ContentItem, ContentType};

/// A top-level course unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Emoji shown on the module card
    #[serde(default)]
    pub icon: String,

    /// CSS color or gradient for the module card
    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub videos: Vec<ContentItem>,

    #[serde(default)]
    pub textbooks: Vec<ContentItem>,

    #[serde(default)]
    pub projects: Vec<ContentItem>,

    #[serde(default)]
    pub assignments: Vec<ContentItem>,

    #[serde(default)]
    pub quizzes: Vec<ContentItem>,
}

impl Module {
    /// Create a module with empty content lists
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            color: color.into(),
            videos: Vec::new(),
            textbooks: Vec::new(),
            projects: Vec::new(),
            assignments: Vec::new(),
            quizzes: Vec::new(),
        }
    }

    /// The list for a content type
    pub fn items(&self, content_type: ContentType) -> &[ContentItem] {
        match content_type {
            ContentType::Videos => &self.videos,
            ContentType::Textbooks => &self.textbooks,
            ContentType::Projects => &self.projects,
            ContentType::Assignments => &self.assignments,
            ContentType::Quizzes => &self.quizzes,
        }
    }

    pub fn items_mut(&mut self, content_type: ContentType) -> &mut Vec<ContentItem> {
        match content_type {
            ContentType::Videos => &mut self.videos,
            ContentType::Textbooks => &mut self.textbooks,
            ContentType::Projects => &mut self.projects,
            ContentType::Assignments => &mut self.assignments,
            ContentType::Quizzes => &mut self.quizzes,
        }
    }

    /// Add an item to the end of a list (builder form, used by the seed)
    pub fn with_item(mut self, content_type: ContentType, item: ContentItem) -> Self {
        self.items_mut(content_type).push(item);
        self
    }

    /// Number of items per content type, in display order
    pub fn content_counts(&self) -> Vec<(ContentType, usize)> {
        ContentType::ALL
            .iter()
            .map(|&ct| (ct, self.items(ct).len()))
            .collect()
    }

    /// Total number of items across all lists
    pub fn total_items(&self) -> usize {
        ContentType::ALL.iter().map(|&ct| self.items(ct).len()).sum()
    }
}
