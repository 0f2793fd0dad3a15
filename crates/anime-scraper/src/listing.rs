//! Paginated listing and search retrieval.
//!
//! Listing pages are fetched concurrently behind a semaphore. A page that
//! fails is recorded in the report and contributes no summaries; the rest of
//! the batch carries on.

use crate::client::UpstreamClient;
use crate::extract::extract_summaries;
use crate::ids::IdentifierTable;
use crate::types::{ListingReport, PageFailure};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

/// Listing categories the site exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingCategory {
    /// New releases
    Releases,
    /// Recently updated
    Updated,
}

impl ListingCategory {
    pub fn as_slug(&self) -> &'static str {
        match self {
            ListingCategory::Releases => "lancamentos",
            ListingCategory::Updated => "atualizados",
        }
    }
}

impl FromStr for ListingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lancamentos" | "releases" | "recent" => Ok(ListingCategory::Releases),
            "atualizados" | "updated" => Ok(ListingCategory::Updated),
            other => Err(format!("unknown listing category: {}", other)),
        }
    }
}

/// `base/animes-<category>/<page>`
pub fn listing_page_url(base_url: &str, category: &str, page: u32) -> String {
    format!("{}/animes-{}/{}", base_url, category, page)
}

/// Search results URL for `query`, or None for a blank query
pub fn search_url(base_url: &str, query: &str) -> Option<String> {
    let slug = query
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        return None;
    }
    Some(format!("{}/pesquisar/{}", base_url, urlencoding::encode(&slug)))
}

/// Fetch one page and extract its cards
async fn fetch_page(
    client: &UpstreamClient,
    table: &IdentifierTable,
    url: &str,
) -> crate::error::Result<Vec<shared::AnimeSummary>> {
    let html = client.get_text(url).await?;
    Ok(extract_summaries(&html, client.base_url(), table))
}

/// Fetch pages 1..=page_count of `category` with at most `workers` in flight
pub async fn fetch_listing(
    client: &UpstreamClient,
    table: &Arc<IdentifierTable>,
    category: &str,
    page_count: u32,
    workers: usize,
) -> ListingReport {
    info!(category = category, pages = page_count, workers = workers, "Fetching listing");

    let report = Arc::new(Mutex::new(ListingReport {
        pages_requested: page_count,
        ..Default::default()
    }));
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));

    let mut tasks = Vec::with_capacity(page_count as usize);

    for page in 1..=page_count {
        let url = listing_page_url(client.base_url(), category, page);
        let client = client.clone();
        let table = table.clone();
        let report = report.clone();
        let semaphore = semaphore.clone();

        let task = tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };

            let result = fetch_page(&client, &table, &url).await;

            let mut report = report.lock().await;
            match result {
                Ok(summaries) => {
                    debug!(page = page, found = summaries.len(), "Listing page parsed");
                    report.summaries.extend(summaries);
                }
                Err(e) => {
                    warn!(page = page, url = %url, error = %e, "Listing page failed");
                    report.failed_pages.push(PageFailure {
                        page,
                        error: e.to_string(),
                    });
                }
            }
        });

        tasks.push((page, task));
    }

    for (page, task) in tasks {
        if let Err(e) = task.await {
            warn!(page = page, error = %e, "Listing worker aborted");
            report.lock().await.failed_pages.push(PageFailure {
                page,
                error: e.to_string(),
            });
        }
    }

    let report = std::mem::take(&mut *report.lock().await);

    info!(
        category = category,
        summaries = report.summaries.len(),
        failed_pages = report.failures(),
        "Listing complete"
    );

    report
}

/// Fetch the single search results page for `query`
pub async fn fetch_search(
    client: &UpstreamClient,
    table: &IdentifierTable,
    query: &str,
) -> ListingReport {
    let Some(url) = search_url(client.base_url(), query) else {
        debug!("Blank search query");
        return ListingReport::default();
    };

    info!(query = query, "Searching");

    let mut report = ListingReport {
        pages_requested: 1,
        ..Default::default()
    };

    match fetch_page(client, table, &url).await {
        Ok(summaries) => report.summaries = summaries,
        Err(e) => {
            warn!(url = %url, error = %e, "Search page failed");
            report.failed_pages.push(PageFailure {
                page: 1,
                error: e.to_string(),
            });
        }
    }

    report
}
