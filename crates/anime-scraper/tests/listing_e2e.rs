//! Listing and search fetches against a mocked upstream.

mod common;

use std::collections::HashSet;
use std::time::{Duration, Instant};

use anime_scraper::{generate_id, AnimeScraper, ListingCategory, ScrapeError};
use common::{config_for, listing_html, scraper_for};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn failed_page_contributes_nothing_and_batch_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/animes-lancamentos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["Frieren", "Dandadan"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/animes-lancamentos/2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/animes-lancamentos/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["Kaiju No 8"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = scraper_for(&mock_server);
    let report = scraper.fetch_listing("lancamentos", 3).await;

    let requests = mock_server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 3);

    assert_eq!(report.pages_requested, 3);
    assert_eq!(report.failures(), 1);
    assert_eq!(report.failed_pages[0].page, 2);

    let titles: HashSet<_> = report.summaries.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, HashSet::from(["Frieren", "Dandadan", "Kaiju No 8"]));
}

#[tokio::test]
async fn summaries_register_identifiers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/animes-atualizados/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["Frieren"])))
        .mount(&mock_server)
        .await;

    let scraper = scraper_for(&mock_server);
    let report = scraper.fetch_category(ListingCategory::Updated, 1).await;

    assert_eq!(report.summaries.len(), 1);
    let summary = &report.summaries[0];
    assert_eq!(summary.id, generate_id("Frieren"));
    assert_eq!(
        summary.detail_url,
        format!("{}/animes/frieren-todos-os-episodios", mock_server.uri())
    );
    assert_eq!(
        summary.cover_image_url,
        format!("{}/img/animes/frieren.webp", mock_server.uri())
    );
    assert_eq!(scraper.lookup(&summary.id).unwrap(), summary.detail_url);

    assert!(matches!(
        scraper.lookup("00000000"),
        Err(ScrapeError::NotFound { .. })
    ));
}

#[tokio::test]
async fn slow_page_times_out_without_blocking_others() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/animes-lancamentos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["Frieren"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/animes-lancamentos/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(&["Too Late"]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.upstream.timeout_seconds = 1;
    let scraper = AnimeScraper::new(&config).unwrap();

    let report = scraper.fetch_listing("lancamentos", 2).await;

    assert_eq!(report.summaries.len(), 1);
    assert_eq!(report.summaries[0].title, "Frieren");
    assert_eq!(report.failed_pages.len(), 1);
    assert_eq!(report.failed_pages[0].page, 2);
}

#[tokio::test]
async fn page_fetches_are_bounded_by_worker_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(&[]))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(10)
        .mount(&mock_server)
        .await;

    let scraper = scraper_for(&mock_server);
    assert_eq!(scraper.settings().listing_workers, 5);

    let start = Instant::now();
    let report = scraper.fetch_listing("lancamentos", 10).await;
    let elapsed = start.elapsed();

    assert_eq!(report.failures(), 0);
    // 10 pages through 5 slots take at least two rounds
    assert!(elapsed >= Duration::from_millis(380), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn search_uses_slugged_query_and_registers_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pesquisar/sousou-no-frieren"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["Sousou no Frieren"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = scraper_for(&mock_server);
    let report = scraper.search("Sousou no Frieren").await;

    assert_eq!(report.summaries.len(), 1);
    let id = &report.summaries[0].id;
    assert!(scraper.lookup(id).is_ok());
}

#[tokio::test]
async fn search_failure_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let scraper = scraper_for(&mock_server);
    let report = scraper.search("anything").await;

    assert!(report.summaries.is_empty());
    assert_eq!(report.failures(), 1);
    assert!(report.failed_pages[0].error.contains("403"));
}

#[tokio::test]
async fn requests_carry_browser_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[])))
        .mount(&mock_server)
        .await;

    let scraper = scraper_for(&mock_server);
    scraper.fetch_listing("lancamentos", 1).await;

    let requests = mock_server.received_requests().await.unwrap();
    let request = &requests[0];
    let user_agent = request.headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(user_agent.starts_with("Mozilla/5.0"));
    let referer = request.headers.get("referer").unwrap().to_str().unwrap();
    assert_eq!(referer, mock_server.uri());
}
