use std::sync::Arc;

use crate::app::Result;
use crate::comments::CommentsWidget;
use crate::config::Config;
use crate::domain::PaginationState;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::PageFetcher;
use crate::normalizer::Normalizer;
use crate::pagination::Accumulator;
use crate::regeneration::RegenerationSchedule;

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn PageFetcher + Send + Sync>,
    pub normalizer: Normalizer,
    pub schedule: RegenerationSchedule,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetcher)?);
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher + Send + Sync>) -> Result<Self> {
        let normalizer = Normalizer::from_locale_name(&config.site.locale)?;
        let schedule = RegenerationSchedule::from(&config.regeneration);

        Ok(Self {
            config,
            fetcher,
            normalizer,
            schedule,
        })
    }

    pub fn accumulator(&self, seed: PaginationState) -> Accumulator {
        Accumulator::new(seed, self.fetcher.clone(), self.normalizer.clone())
    }

    pub fn comments(&self) -> Option<CommentsWidget> {
        self.config
            .comments
            .is_enabled()
            .then(|| CommentsWidget::new(self.config.comments.clone()))
    }
}
