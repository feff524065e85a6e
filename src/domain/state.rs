use std::collections::HashSet;
use std::fmt;

use crate::domain::PostSummary;

/// Opaque handle on the next page. In practice an absolute CMS URL, but
/// nothing outside the fetcher looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationCursor {
    Next(PageToken),
    /// No further pages exist.
    End,
}

impl PaginationCursor {
    /// Maps the CMS `next_page` field; `null` and empty strings both end the list.
    pub fn from_next_page(next_page: Option<String>) -> Self {
        match next_page {
            Some(url) if !url.is_empty() => PaginationCursor::Next(PageToken::new(url)),
            _ => PaginationCursor::End,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, PaginationCursor::End)
    }

    pub fn token(&self) -> Option<&PageToken> {
        match self {
            PaginationCursor::Next(token) => Some(token),
            PaginationCursor::End => None,
        }
    }
}

/// Result of merging one fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub skipped: usize,
}

/// Accumulated post list plus the cursor for the page after it.
///
/// `items` never holds two posts with the same id; the first occurrence wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    items: Vec<PostSummary>,
    cursor: PaginationCursor,
}

impl PaginationState {
    pub fn new(items: Vec<PostSummary>, cursor: PaginationCursor) -> Self {
        let mut state = Self {
            items: Vec::with_capacity(items.len()),
            cursor: PaginationCursor::End,
        };
        state.merge_page(items, cursor);
        state
    }

    pub fn items(&self) -> &[PostSummary] {
        &self.items
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    pub fn has_more(&self) -> bool {
        !self.cursor.is_end()
    }

    /// Appends the posts whose id is not already listed, in page order, and
    /// moves the cursor forward. Items and cursor change together.
    pub fn merge_page(&mut self, page: Vec<PostSummary>, next: PaginationCursor) -> MergeStats {
        let mut seen: HashSet<String> = self.items.iter().map(|p| p.id.clone()).collect();
        let total = page.len();

        let fresh: Vec<PostSummary> = page
            .into_iter()
            .filter(|post| {
                let new = seen.insert(post.id.clone());
                if !new {
                    tracing::debug!("Skipping duplicate post {}", post.id);
                }
                new
            })
            .collect();
        let stats = MergeStats {
            added: fresh.len(),
            skipped: total - fresh.len(),
        };

        self.items.extend(fresh);
        self.cursor = next;
        stats
    }
}
