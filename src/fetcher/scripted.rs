//! In-memory fetcher that replays queued responses, for accumulator tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Notify;

use crate::app::FetchError;
use crate::domain::{PageToken, RawDocument, RawPage};
use crate::fetcher::PageFetcher;

type Reply = Result<RawPage, FetchError>;

#[derive(Default)]
pub struct ScriptedFetcher {
    replies: Mutex<VecDeque<Reply>>,
    requested: Mutex<Vec<PageToken>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch waits for a `notify_one` on the returned handle before replying.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let fetcher = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (fetcher, gate)
    }

    pub fn reply(self, page: RawPage) -> Self {
        self.push(Ok(page));
        self
    }

    pub fn fail(self, status: StatusCode) -> Self {
        self.push(Err(FetchError::Status(status)));
        self
    }

    fn push(&self, reply: Reply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<PageToken> {
        self.requested.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, token: &PageToken) -> Result<RawPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(token.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Status(StatusCode::NOT_FOUND)))
    }
}

pub fn doc(uid: &str, title: &str) -> RawDocument {
    let mut raw = RawDocument {
        uid: Some(uid.to_string()),
        ..Default::default()
    };
    raw.data.title = Some(title.to_string());
    raw
}

pub fn page(uids: &[&str], next_page: Option<&str>) -> RawPage {
    RawPage {
        results: uids.iter().map(|uid| doc(uid, uid)).collect(),
        next_page: next_page.map(String::from),
    }
}
