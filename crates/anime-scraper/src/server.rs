//! HTTP surface: JSON routes over the scraper.

use crate::error::ScrapeError;
use crate::listing::ListingCategory;
use crate::service::AnimeScraper;
use crate::types::ListingReport;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shared::{AnimeSummary, Envelope};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

const ROUTES: &[&str] = &[
    "/recent",
    "/updated",
    "/listing/{category}",
    "/search/{query}",
    "/anime/{id}",
];

type AppState = Arc<AnimeScraper>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address `{address}`: {source}")]
    InvalidListenAddr {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct IndexResponse {
    status: &'static str,
    routes: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

fn envelope_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(Envelope::<()>::error(message))).into_response()
}

fn listing_response(report: ListingReport) -> Response {
    let failures = report.failures();
    if report.summaries.is_empty() && failures > 0 && failures as u32 >= report.pages_requested {
        return envelope_error(StatusCode::BAD_GATEWAY, "Upstream site unreachable");
    }
    Json(Envelope::<Vec<AnimeSummary>>::success(report.summaries, failures)).into_response()
}

fn scrape_error_response(error: &ScrapeError) -> Response {
    match error {
        ScrapeError::NotFound { .. } => envelope_error(StatusCode::NOT_FOUND, "Anime not found"),
        e if e.is_upstream() => envelope_error(StatusCode::BAD_GATEWAY, e.to_string()),
        e => envelope_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn build_router(scraper: Arc<AnimeScraper>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/recent", get(recent))
        .route("/updated", get(updated))
        .route("/listing/{category}", get(listing))
        .route("/search/{query}", get(search))
        .route("/anime/{id}", get(anime))
        .with_state(scraper)
}

async fn index() -> impl IntoResponse {
    Json(IndexResponse {
        status: "online",
        routes: ROUTES,
    })
}

async fn recent(State(scraper): State<AppState>, Query(query): Query<PagesQuery>) -> Response {
    let pages = scraper.page_count(query.pages);
    listing_response(scraper.fetch_category(ListingCategory::Releases, pages).await)
}

async fn updated(State(scraper): State<AppState>, Query(query): Query<PagesQuery>) -> Response {
    let pages = scraper.page_count(query.pages);
    listing_response(scraper.fetch_category(ListingCategory::Updated, pages).await)
}

async fn listing(
    State(scraper): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<PagesQuery>,
) -> Response {
    let slug = match category.parse::<ListingCategory>() {
        Ok(known) => known.as_slug().to_string(),
        Err(_) if is_valid_slug(&category) => category,
        Err(_) => return envelope_error(StatusCode::BAD_REQUEST, "Invalid category"),
    };
    let pages = scraper.page_count(query.pages);
    listing_response(scraper.fetch_listing(&slug, pages).await)
}

async fn search(State(scraper): State<AppState>, Path(query): Path<String>) -> Response {
    listing_response(scraper.search(&query).await)
}

async fn anime(
    State(scraper): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Response {
    match scraper.anime_episodes(&id, query.limit).await {
        Ok(report) => Json(Envelope::success(report.episodes, report.failed_sources)).into_response(),
        Err(e) => {
            warn!(id = %id, error = %e, "Anime request failed");
            scrape_error_response(&e)
        }
    }
}

/// Bind `listen_addr` and serve until Ctrl+C
pub async fn serve(scraper: Arc<AnimeScraper>, listen_addr: &str) -> Result<(), ServerError> {
    let trimmed = listen_addr.trim();
    let addr: SocketAddr = trimmed
        .parse()
        .map_err(|source| ServerError::InvalidListenAddr {
            address: trimmed.to_string(),
            source,
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            address: addr.to_string(),
            source,
        })?;

    info!(%addr, "Server listening");

    axum::serve(listener, build_router(scraper))
        .with_graceful_shutdown(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "Failed to capture Ctrl+C signal");
                std::future::pending::<()>().await;
            }
        })
        .await
        .map_err(|source| ServerError::Serve { source })?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("dublados"));
        assert!(is_valid_slug("top-animes-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("../etc"));
        assert!(!is_valid_slug("Lancamentos"));
    }
}
