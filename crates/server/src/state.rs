use std::sync::Arc;
use marquee_core::{Aggregator, Config, SanitizedConfig, TorrentFetcher};

/// Shared application state
pub struct AppState {
    config: Config,
    aggregator: Arc<Aggregator>,
    fetcher: TorrentFetcher,
}

impl AppState {
    pub fn new(config: Config, aggregator: Arc<Aggregator>, fetcher: TorrentFetcher) -> Self {
        Self {
            config,
            aggregator,
            fetcher,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn aggregator(&self) -> &Aggregator {
        self.aggregator.as_ref()
    }

    pub fn fetcher(&self) -> &TorrentFetcher {
        &self.fetcher
    }
}
