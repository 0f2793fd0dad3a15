//! AnimeFire scraping proxy library.
//!
//! Fetches listing and detail pages from the upstream site, extracts anime
//! cards, episode links and video sources, and serves them as JSON.

pub mod client;
pub mod episodes;
pub mod error;
pub mod extract;
pub mod ids;
pub mod listing;
pub mod service;
pub mod server;
pub mod types;
pub mod url;
pub mod video;

pub use client::UpstreamClient;
pub use error::ScrapeError;
pub use ids::{generate_id, IdentifierTable};
pub use listing::ListingCategory;
pub use service::AnimeScraper;
pub use types::{EpisodeReport, ListingReport, PageFailure};
