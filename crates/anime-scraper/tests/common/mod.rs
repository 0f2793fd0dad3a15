//! Shared fixtures for tests against a mocked upstream site.

#![allow(dead_code)]

use anime_scraper::AnimeScraper;
use shared::Config;
use wiremock::MockServer;

/// Config pointing every upstream call at `server`
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.upstream.base_url = server.uri();
    config.upstream.timeout_seconds = 2;
    config
}

pub fn scraper_for(server: &MockServer) -> AnimeScraper {
    AnimeScraper::new(&config_for(server)).expect("scraper should build")
}

/// Listing page with one card per title; links are `/animes/<slug>`
pub fn listing_html(titles: &[&str]) -> String {
    let cards: String = titles
        .iter()
        .map(|title| {
            let slug = title.to_lowercase().replace(' ', "-");
            format!(
                r#"<div class="col-6 divCardUltimosEps">
                     <a href="/animes/{slug}-todos-os-episodios">
                       <article class="card">
                         <img class="imgAnimes" src="" data-src="/img/animes/{slug}.webp" alt="{title}">
                         <h3 class="animeTitle">{title}</h3>
                       </article>
                     </a>
                   </div>"#
            )
        })
        .collect();
    format!("<!DOCTYPE html><html><body><div class=\"row\">{cards}</div></body></html>")
}

/// Detail page listing `count` episodes of `slug`
pub fn detail_html(slug: &str, count: usize) -> String {
    let links: String = (1..=count)
        .map(|n| format!(r#"<a class="lEp epT divNumEp smallbox px-2 mx-1 text-left d-flex" href="/animes/{slug}/{n}">Episódio {n}</a>"#))
        .collect();
    format!(
        r#"<!DOCTYPE html><html><body>
             <h1 class="quicksand400">{slug}</h1>
             <div class="div_video_list">{links}</div>
           </body></html>"#
    )
}

/// Video-source JSON for episode `n`
pub fn video_json(n: usize) -> serde_json::Value {
    serde_json::json!({
        "data": [
            {"src": format!("https://cdn.test/{n}/360.mp4"), "label": "360p"},
            {"src": format!("https://cdn.test/{n}/720.mp4"), "label": "720p"}
        ],
        "resposta": {"status": "ok"}
    })
}
