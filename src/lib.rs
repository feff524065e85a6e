//! # spacetraveling
//!
//! Front end of a statically generated blog backed by a headless CMS.
//!
//! ## Architecture
//!
//! ```text
//! Regeneration seed → Accumulator ⇄ Fetcher → Normalizer → render
//! ```
//!
//! The listing page starts from a seed produced by the static regeneration
//! process. "Load more" fetches the page behind the current cursor,
//! normalizes its documents and merges them into the list without duplicates.
//!
//! ## Quick Start
//!
//! ```bash
//! # List the seeded posts and load two more pages
//! spacetraveling posts seed.json --pages 2
//!
//! # Start from the CMS directly and load everything
//! spacetraveling posts "https://blog.cdn.prismic.io/api/v2/documents/search?ref=...&page=1" --all
//!
//! # Show one post, as a preview
//! spacetraveling post post.json --preview-ref YKx1~draft
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the
/// configuration, fetcher and normalizer.
pub mod app;

/// Command-line interface using clap.
///
/// - `posts <seed-or-url> [--pages N | --all]` - List posts
/// - `post <file> [--preview-ref REF]` - Show a single post
pub mod cli;

/// utterances comments widget mount point.
pub mod comments;

/// Configuration loaded from `~/.config/spacetraveling/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`PostSummary`](domain::PostSummary) / [`PostDetail`](domain::PostDetail)
/// - [`PaginationState`](domain::PaginationState) and its cursor
/// - Raw CMS wire shapes
pub mod domain;

/// Page fetching.
///
/// - [`PageFetcher`](fetcher::PageFetcher): Async trait resolving a page token
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// CMS document normalization, publication dates and reading time.
pub mod normalizer;

/// "Load more" pagination state machine.
pub mod pagination;

/// Seeds, snapshots and cadence of the static regeneration process.
pub mod regeneration;
