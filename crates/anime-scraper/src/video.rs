//! Per-episode video-source retrieval.

use crate::client::UpstreamClient;
use crate::error::Result;
use crate::types::VideoPayload;
use crate::url::video_endpoint;
use shared::config::VideoUrlRule;
use shared::VideoSource;
use tracing::{debug, warn};

/// URL to request for an episode's sources under `rule`
pub fn source_url(episode_url: &str, rule: VideoUrlRule) -> String {
    match rule {
        VideoUrlRule::Verbatim => episode_url.to_string(),
        VideoUrlRule::VideoPath => video_endpoint(episode_url),
    }
}

/// Fetch the sources listed at `url`, reporting why when it fails
pub async fn try_fetch_video_sources(client: &UpstreamClient, url: &str) -> Result<Vec<VideoSource>> {
    let payload: VideoPayload = client.get_json(url).await?;
    let sources: Vec<VideoSource> = payload.data.into_iter().map(Into::into).collect();
    debug!(url = %url, sources = sources.len(), "Fetched video sources");
    Ok(sources)
}

/// Fetch the sources listed at `url`; any failure yields an empty list
pub async fn fetch_video_sources(client: &UpstreamClient, url: &str) -> Vec<VideoSource> {
    match try_fetch_video_sources(client, url).await {
        Ok(sources) => sources,
        Err(e) => {
            warn!(url = %url, error = %e, "Video source fetch failed");
            Vec::new()
        }
    }
}
