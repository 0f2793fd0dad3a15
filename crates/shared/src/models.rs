//! Data models for the project.
//!
//! Records extracted from the upstream site and the JSON envelope they are
//! republished in.

use serde::{Deserialize, Serialize};

/// One anime card from a listing or search page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnimeSummary {
    /// Short identifier derived from the title
    pub id: String,
    pub title: String,
    #[serde(rename = "image")]
    pub cover_image_url: String,
    /// Absolute upstream detail page; kept server-side only
    #[serde(skip)]
    pub detail_url: String,
}

/// One episode link from a detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Episode {
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub video_sources: Vec<VideoSource>,
}

impl Episode {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            video_sources: Vec::new(),
        }
    }
}

/// A playable stream for an episode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoSource {
    #[serde(rename = "quality")]
    pub quality_label: String,
    #[serde(rename = "url")]
    pub stream_url: String,
}

/// Envelope status marker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// JSON response wrapper shared by every endpoint
///
/// A success carries `data` plus the number of units (pages or video-source
/// fetches) that failed while producing it; an error carries only `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: EnvelopeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T, failures: usize) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: Some(data),
            failures: Some(failures),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            data: None,
            failures: None,
            message: Some(message.into()),
        }
    }
}
