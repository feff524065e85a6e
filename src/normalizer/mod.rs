pub mod date;

use chrono::Locale;

use crate::app::{BlogError, Result};
use crate::domain::{PostDetail, PostSummary, RawDocument, RawPostData, Section};

/// Turns raw CMS documents into the shapes the pages render.
#[derive(Clone)]
pub struct Normalizer {
    locale: Locale,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::with_locale(Locale::pt_BR)
    }

    pub fn with_locale(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn from_locale_name(name: &str) -> Result<Self> {
        date::parse_locale(name).map(Self::with_locale)
    }

    pub fn normalize_summary(&self, raw: &RawDocument) -> Result<PostSummary> {
        let id = raw
            .key()
            .ok_or_else(|| BlogError::MalformedDocument("document has neither uid nor id".into()))?;

        Ok(self.summary(id, raw.first_publication_date.as_deref(), &raw.data))
    }

    pub fn normalize_detail(&self, raw: RawDocument) -> Result<PostDetail> {
        let summary = self.normalize_summary(&raw)?;
        let data = raw.data;

        let sections = data
            .content
            .into_iter()
            .map(|section| Section {
                heading: section.heading.unwrap_or_default(),
                body_blocks: section.body,
            })
            .collect();

        Ok(PostDetail {
            summary,
            banner_url: data.banner.and_then(|b| b.url).unwrap_or_default(),
            sections,
        })
    }

    /// Normalizes every document of a page, failing on the first bad one.
    pub fn normalize_page(&self, raw: &[RawDocument]) -> Result<Vec<PostSummary>> {
        raw.iter().map(|doc| self.normalize_summary(doc)).collect()
    }

    fn summary(&self, id: &str, first_publication_date: Option<&str>, data: &RawPostData) -> PostSummary {
        let published_at = first_publication_date.and_then(|s| {
            let parsed = date::parse_timestamp(s);
            if parsed.is_none() {
                tracing::warn!("Unparseable publication date {:?} on {}", s, id);
            }
            parsed
        });

        PostSummary {
            id: id.to_string(),
            published_label: published_at.as_ref().map(|d| date::format_label(d, self.locale)),
            published_at,
            title: data.title.clone().unwrap_or_default(),
            subtitle: data.subtitle.clone().unwrap_or_default(),
            author: data.author.clone().unwrap_or_default(),
        }
    }
}
