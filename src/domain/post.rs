use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::document::RichTextBlock;

/// Average reading speed used for the reading-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub published_at: Option<DateTime<FixedOffset>>,
    /// `published_at` rendered in the deployment locale, e.g. "19 Mai 2021".
    pub published_label: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            published_at: None,
            published_label: None,
            title: String::new(),
            subtitle: String::new(),
            author: String::new(),
        }
    }

    /// Date text for templates; empty rather than a placeholder when unpublished.
    pub fn display_date(&self) -> &str {
        self.published_label.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body_blocks: Vec<RichTextBlock>,
}

impl Section {
    pub fn word_count(&self) -> usize {
        self.body_blocks
            .iter()
            .map(|block| block.text().split_whitespace().count())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub summary: PostSummary,
    pub banner_url: String,
    pub sections: Vec<Section>,
}

impl PostDetail {
    pub fn word_count(&self) -> usize {
        self.sections.iter().map(Section::word_count).sum()
    }

    /// Estimated minutes to read the body, rounded up.
    pub fn reading_time_minutes(&self) -> usize {
        reading_time(self.word_count())
    }
}

pub fn reading_time(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE)
}
