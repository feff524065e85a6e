use std::path::Path;

use crate::app::{AppContext, BlogError, Result};
use crate::domain::{PageToken, PostSummary, RawDocument};
use crate::pagination::LoadOutcome;
use crate::regeneration::{format_interval, seed_from_initial_payload, PostPage, SeedPayload, Snapshot};

/// How many pages `posts` should load past the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBudget {
    Pages(usize),
    All,
}

async fn load_seed(ctx: &AppContext, source: &str) -> Result<SeedPayload> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let page = ctx.fetcher.fetch_page(&PageToken::new(source)).await?;
        Ok(SeedPayload::from_page(page))
    } else {
        let bytes = std::fs::read(source)?;
        SeedPayload::from_json(&bytes)
    }
}

pub async fn list_posts(ctx: &AppContext, source: &str, budget: PageBudget) -> Result<()> {
    print!("{}", build_listing(ctx, source, budget).await?);
    Ok(())
}

/// Seeds the listing from `source`, loads up to `budget` more pages and
/// renders the result.
pub async fn build_listing(ctx: &AppContext, source: &str, budget: PageBudget) -> Result<String> {
    let payload = load_seed(ctx, source).await?;
    let snapshot = payload.snapshot();
    let seed = seed_from_initial_payload(&ctx.normalizer, payload)?;
    let acc = ctx.accumulator(seed);

    let mut lines = Vec::new();
    if let Snapshot::Preview { reference } = &snapshot {
        lines.push(format!("[preview {}]", reference));
    }

    let mut loaded = 0;
    while acc.has_more() && budget_allows(budget, loaded) {
        match acc.load_more().await {
            Ok(LoadOutcome::Loaded(_)) => loaded += 1,
            Ok(LoadOutcome::AlreadyLoading) | Ok(LoadOutcome::Exhausted) => break,
            Err(e) if e.is_retryable() => {
                eprintln!("Could not load more posts: {}", e);
                break;
            }
            Err(e) => return Err(e),
        }
    }

    let items = acc.items();
    if items.is_empty() {
        lines.push("No posts".to_string());
    }
    for post in &items {
        push_summary(&mut lines, post);
    }

    if acc.has_more() {
        lines.push(String::new());
        lines.push("More posts available (use --pages or --all)".to_string());
    }
    lines.push(String::new());
    lines.push(format!(
        "Listing regenerates every {}",
        format_interval(ctx.schedule.listing)
    ));

    Ok(render(lines))
}

fn budget_allows(budget: PageBudget, loaded: usize) -> bool {
    match budget {
        PageBudget::Pages(max) => loaded < max,
        PageBudget::All => true,
    }
}

fn push_summary(lines: &mut Vec<String>, post: &PostSummary) {
    lines.push(post.title.clone());
    if !post.subtitle.is_empty() {
        lines.push(format!("  {}", post.subtitle));
    }
    lines.push(format!("  {:<12} {}   /post/{}", post.display_date(), post.author, post.id));
}

fn render(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn show_post(ctx: &AppContext, path: &Path, preview_ref: Option<String>) -> Result<()> {
    print!("{}", render_post(ctx, path, preview_ref)?);
    Ok(())
}

/// Reads one CMS document from `path` and renders it as a post page.
pub fn render_post(ctx: &AppContext, path: &Path, preview_ref: Option<String>) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let raw: RawDocument = serde_json::from_slice(&bytes)
        .map_err(|e| BlogError::MalformedDocument(e.to_string()))?;

    let snapshot = match preview_ref {
        Some(reference) => Snapshot::Preview { reference },
        None => Snapshot::Published,
    };
    let page = PostPage::new(&ctx.normalizer, raw, snapshot)?;
    let post = &page.post;

    let mut lines = vec![post.summary.title.clone()];
    if !post.banner_url.is_empty() {
        lines.push(format!("  banner: {}", post.banner_url));
    }
    lines.push(format!(
        "  {}  {}  {} min",
        post.summary.display_date(),
        post.summary.author,
        post.reading_time_minutes()
    ));

    for section in &post.sections {
        lines.push(String::new());
        lines.push(format!("## {}", section.heading));
        lines.extend(
            section
                .body_blocks
                .iter()
                .map(|block| block.text())
                .filter(|text| !text.is_empty())
                .map(String::from),
        );
    }

    if let Some(mut comments) = ctx.comments() {
        lines.push(String::new());
        lines.push(comments.anchor_html());
        if let Some(script) = comments.mount() {
            lines.push(script.to_html());
        }
    }

    if page.shows_exit_preview() {
        lines.push(String::new());
        lines.push(format!("[Exit preview mode: {}]", ctx.config.site.exit_preview_path));
    }

    lines.push(String::new());
    lines.push(format!("Post regenerates every {}", format_interval(ctx.schedule.post)));

    Ok(render(lines))
}
