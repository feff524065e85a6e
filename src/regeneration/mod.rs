//! Boundary with the static regeneration process.
//!
//! Regeneration happens elsewhere, on a fixed cadence; this module only turns
//! the payload it produces into the starting state of a page.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::app::{BlogError, Result};
use crate::config::RegenerationConfig;
use crate::domain::{PaginationCursor, PaginationState, PostDetail, RawDocument, RawPage};
use crate::normalizer::Normalizer;

/// First page of the listing as produced by a regeneration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPayload {
    #[serde(deserialize_with = "nullable")]
    pub next_page: Option<String>,
    pub results: Vec<RawDocument>,
    #[serde(default)]
    pub preview: bool,
    /// Reference of the unpublished snapshot; only meaningful with `preview`.
    #[serde(default)]
    pub preview_ref: Option<String>,
}

// Requires the key to be present while still allowing `null`.
fn nullable<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

impl SeedPayload {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| BlogError::MalformedSeed(e.to_string()))
    }

    /// A published seed built from a first page fetched directly from the CMS.
    pub fn from_page(page: RawPage) -> Self {
        Self {
            next_page: page.next_page,
            results: page.results,
            preview: false,
            preview_ref: None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        match (self.preview, &self.preview_ref) {
            (true, Some(reference)) => Snapshot::Preview {
                reference: reference.clone(),
            },
            _ => Snapshot::Published,
        }
    }
}

/// Which CMS content a regenerated page was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    Published,
    Preview { reference: String },
}

impl Snapshot {
    pub fn is_preview(&self) -> bool {
        matches!(self, Snapshot::Preview { .. })
    }
}

/// Turns a regeneration payload into the initial pagination state.
///
/// Every seeded record must normalize; an empty `results` is a valid, empty
/// listing.
pub fn seed_from_initial_payload(normalizer: &Normalizer, payload: SeedPayload) -> Result<PaginationState> {
    let items = normalizer
        .normalize_page(&payload.results)
        .map_err(|e| BlogError::MalformedSeed(e.to_string()))?;

    tracing::debug!(
        "Seeded {} posts ({:?}), more pages: {}",
        items.len(),
        payload.snapshot(),
        payload.next_page.is_some()
    );

    Ok(PaginationState::new(
        items,
        PaginationCursor::from_next_page(payload.next_page),
    ))
}

/// How often the regeneration process refreshes each kind of page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenerationSchedule {
    pub listing: Duration,
    pub post: Duration,
}

impl Default for RegenerationSchedule {
    fn default() -> Self {
        Self {
            listing: Duration::from_secs(60 * 60 * 24),
            post: Duration::from_secs(60 * 60),
        }
    }
}

impl From<&RegenerationConfig> for RegenerationSchedule {
    fn from(config: &RegenerationConfig) -> Self {
        Self {
            listing: Duration::from_secs(config.listing_secs),
            post: Duration::from_secs(config.post_secs),
        }
    }
}

/// Renders a regeneration interval in its largest whole unit ("1d", "90m").
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 86_400 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs >= 3_600 && secs % 3_600 == 0 {
        format!("{}h", secs / 3_600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// A single post as regenerated, with the snapshot it came from.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub post: PostDetail,
    pub snapshot: Snapshot,
}

impl PostPage {
    pub fn new(normalizer: &Normalizer, raw: RawDocument, snapshot: Snapshot) -> Result<Self> {
        Ok(Self {
            post: normalizer.normalize_detail(raw)?,
            snapshot,
        })
    }

    /// Preview pages carry a control to leave preview mode.
    pub fn shows_exit_preview(&self) -> bool {
        self.snapshot.is_preview()
    }
}
