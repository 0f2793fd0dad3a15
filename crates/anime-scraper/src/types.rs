//! Upstream JSON payloads and the report shapes returned by batch fetches.

use serde::{Deserialize, Serialize};
use shared::{AnimeSummary, Episode, VideoSource};

/// Video-source endpoint body: `{"data": [{"src": ..., "label": ...}]}`
#[derive(Debug, Clone, Deserialize)]
pub struct VideoPayload {
    pub data: Vec<VideoEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoEntry {
    pub src: String,
    pub label: String,
}

impl From<VideoEntry> for VideoSource {
    fn from(entry: VideoEntry) -> Self {
        VideoSource {
            quality_label: entry.label,
            stream_url: entry.src,
        }
    }
}

/// A listing page that contributed nothing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageFailure {
    pub page: u32,
    pub error: String,
}

/// Result of a listing or search fetch
///
/// Summaries are in completion order, not page order.
#[derive(Debug, Clone, Default)]
pub struct ListingReport {
    pub summaries: Vec<AnimeSummary>,
    pub pages_requested: u32,
    pub failed_pages: Vec<PageFailure>,
}

impl ListingReport {
    pub fn failures(&self) -> usize {
        self.failed_pages.len()
    }
}

/// Result of enriching a detail page's episodes
#[derive(Debug, Clone, Default)]
pub struct EpisodeReport {
    /// All episodes in document order
    pub episodes: Vec<Episode>,
    /// Episodes for which a video-source fetch was attempted
    pub enriched: usize,
    /// Attempted fetches that failed and left the episode without sources
    pub failed_sources: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_payload_maps_to_sources() {
        let payload: VideoPayload = serde_json::from_str(
            r#"{"data":[{"src":"https://cdn/360.mp4","label":"360p"},{"src":"https://cdn/720.mp4","label":"720p","extra":1}],"resposta":{"status":"ok"}}"#,
        )
        .unwrap();

        let sources: Vec<VideoSource> = payload.data.into_iter().map(Into::into).collect();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].quality_label, "720p");
        assert_eq!(sources[1].stream_url, "https://cdn/720.mp4");
    }

    #[test]
    fn test_video_payload_rejects_missing_data() {
        assert!(serde_json::from_str::<VideoPayload>(r#"{"items":[]}"#).is_err());
        assert!(serde_json::from_str::<VideoPayload>(r#"{"data":[{"src":"x"}]}"#).is_err());
    }
}
