//! Episode list retrieval and video-source enrichment.

use crate::client::UpstreamClient;
use crate::error::Result;
use crate::extract::extract_episodes;
use crate::types::EpisodeReport;
use crate::video::{source_url, try_fetch_video_sources};
use shared::config::VideoUrlRule;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Fetch a detail page and attach video sources to its leading episodes.
///
/// Only the first `enrich_limit` episodes (all when `None`) are enriched, at
/// most `workers` at a time; the rest come back without sources. Output keeps
/// document order. Failing to fetch the detail page itself is an error;
/// failing to fetch an episode's sources only leaves that episode empty.
pub async fn enrich_episodes(
    client: &UpstreamClient,
    detail_url: &str,
    enrich_limit: Option<usize>,
    workers: usize,
    rule: VideoUrlRule,
) -> Result<EpisodeReport> {
    let html = client.get_text(detail_url).await?;
    let mut episodes = extract_episodes(&html, client.base_url());

    let limit = enrich_limit.unwrap_or(episodes.len()).min(episodes.len());
    info!(
        detail_url = %detail_url,
        episodes = episodes.len(),
        enrich = limit,
        "Enriching episodes"
    );

    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = Vec::with_capacity(limit);

    for episode in episodes.iter().take(limit) {
        let url = source_url(&episode.url, rule);
        let client = client.clone();
        let semaphore = semaphore.clone();

        tasks.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let result = try_fetch_video_sources(&client, &url).await;
            if let Err(e) = &result {
                warn!(url = %url, error = %e, "Video source fetch failed");
            }
            result
        }));
    }

    let mut failed_sources = 0;
    for (episode, task) in episodes.iter_mut().zip(tasks) {
        match task.await {
            Ok(Ok(sources)) => episode.video_sources = sources,
            Ok(Err(_)) => failed_sources += 1,
            Err(e) => {
                warn!(episode = %episode.label, error = %e, "Enrichment worker aborted");
                failed_sources += 1;
            }
        }
    }

    debug!(enriched = limit, failed = failed_sources, "Enrichment complete");

    Ok(EpisodeReport {
        episodes,
        enriched: limit,
        failed_sources,
    })
}
