//! Wire shapes of the CMS REST API, decoded as-is before normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of query results as the CMS returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPage {
    pub results: Vec<RawDocument>,
    /// Absolute URL of the following page, `null` on the last one.
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: Option<String>,
    pub uid: Option<String>,
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub data: RawPostData,
}

impl RawDocument {
    /// Stable list key: the document `uid`, or its CMS `id` when it has none.
    pub fn key(&self) -> Option<&str> {
        self.uid
            .as_deref()
            .filter(|uid| !uid.is_empty())
            .or_else(|| self.id.as_deref().filter(|id| !id.is_empty()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPostData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub banner: Option<RawImage>,
    #[serde(default)]
    pub content: Vec<RawSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawImage {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSection {
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

/// A rich-text block kept opaque; only its plain text is ever inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichTextBlock(pub Value);

impl RichTextBlock {
    pub fn paragraph(text: &str) -> Self {
        Self(serde_json::json!({ "type": "paragraph", "text": text, "spans": [] }))
    }

    pub fn text(&self) -> &str {
        self.0.get("text").and_then(Value::as_str).unwrap_or("")
    }
}
