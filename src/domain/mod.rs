pub mod document;
pub mod post;
pub mod state;

pub use document::{RawDocument, RawImage, RawPage, RawPostData, RawSection, RichTextBlock};
pub use post::{PostDetail, PostSummary, Section};
pub use state::{MergeStats, PageToken, PaginationCursor, PaginationState};
