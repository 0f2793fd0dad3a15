//! Scraper service facade.
//!
//! Owns the upstream client, the identifier table and the pipeline settings,
//! and exposes the operations the HTTP layer and CLI call.

use crate::client::UpstreamClient;
use crate::episodes;
use crate::error::Result;
use crate::ids::IdentifierTable;
use crate::listing::{self, ListingCategory};
use crate::types::{EpisodeReport, ListingReport};
use crate::video;
use shared::config::ScraperConfig;
use shared::{Config, VideoSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Scraper entry point shared by every request
pub struct AnimeScraper {
    client: UpstreamClient,
    table: Arc<IdentifierTable>,
    settings: ScraperConfig,
}

impl AnimeScraper {
    /// Build a scraper from the full configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = UpstreamClient::new(&config.upstream)?;
        let table = Arc::new(IdentifierTable::new(
            config.id_table.capacity,
            config.id_table.ttl_seconds.map(Duration::from_secs),
        ));

        info!(
            base_url = %client.base_url(),
            id_capacity = config.id_table.capacity,
            "Scraper initialized"
        );

        Ok(Self::from_parts(client, table, config.scraper.clone()))
    }

    /// Assemble a scraper from already-built parts
    pub fn from_parts(
        client: UpstreamClient,
        table: Arc<IdentifierTable>,
        settings: ScraperConfig,
    ) -> Self {
        Self {
            client,
            table,
            settings,
        }
    }

    pub fn settings(&self) -> &ScraperConfig {
        &self.settings
    }

    /// Caller page count, defaulted and clamped to the configured bounds
    pub fn page_count(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.settings.default_pages)
            .clamp(1, self.settings.max_pages.max(1))
    }

    /// Fetch `page_count` pages of a category slug
    pub async fn fetch_listing(&self, category: &str, page_count: u32) -> ListingReport {
        listing::fetch_listing(
            &self.client,
            &self.table,
            category,
            page_count,
            self.settings.listing_workers,
        )
        .await
    }

    /// Fetch one of the site's known categories
    pub async fn fetch_category(&self, category: ListingCategory, page_count: u32) -> ListingReport {
        self.fetch_listing(category.as_slug(), page_count).await
    }

    /// Search the site by title
    pub async fn search(&self, query: &str) -> ListingReport {
        listing::fetch_search(&self.client, &self.table, query).await
    }

    /// Resolve an identifier to its detail page URL
    pub fn lookup(&self, id: &str) -> Result<String> {
        self.table.lookup(id)
    }

    /// Fetch a detail page's episodes, enriching the first `enrich_limit`
    pub async fn enrich_episodes(
        &self,
        detail_url: &str,
        enrich_limit: Option<usize>,
    ) -> Result<EpisodeReport> {
        episodes::enrich_episodes(
            &self.client,
            detail_url,
            enrich_limit,
            self.settings.enrich_workers,
            self.settings.video_url_rule,
        )
        .await
    }

    /// Episodes for a previously listed identifier
    ///
    /// `enrich_limit` falls back to the configured limit when `None`.
    pub async fn anime_episodes(&self, id: &str, enrich_limit: Option<usize>) -> Result<EpisodeReport> {
        let detail_url = self.lookup(id)?;
        let limit = enrich_limit.or(self.settings.enrich_limit);
        self.enrich_episodes(&detail_url, limit).await
    }

    /// Video sources for a single episode page
    pub async fn fetch_video_sources(&self, episode_url: &str) -> Vec<VideoSource> {
        let url = video::source_url(episode_url, self.settings.video_url_rule);
        video::fetch_video_sources(&self.client, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;

    fn scraper() -> AnimeScraper {
        AnimeScraper::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_page_count_defaults_and_clamps() {
        let scraper = scraper();
        assert_eq!(scraper.page_count(None), 1);
        assert_eq!(scraper.page_count(Some(0)), 1);
        assert_eq!(scraper.page_count(Some(4)), 4);
        assert_eq!(scraper.page_count(Some(500)), 10);
    }

    #[tokio::test]
    async fn test_anime_episodes_unknown_id() {
        let scraper = scraper();
        let result = scraper.anime_episodes("deadbeef", None).await;
        assert!(matches!(result, Err(ScrapeError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_request() {
        let scraper = scraper();
        let report = scraper.search("   ").await;
        assert!(report.summaries.is_empty());
        assert_eq!(report.pages_requested, 0);
        assert_eq!(report.failures(), 0);
    }
}
