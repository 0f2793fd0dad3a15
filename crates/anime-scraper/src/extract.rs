//! HTML extraction of listing cards and episode links.

use crate::ids::{generate_id, IdentifierTable};
use crate::url::normalize;
use scraper::{ElementRef, Html, Selector};
use shared::{AnimeSummary, Episode};
use std::sync::OnceLock;
use tracing::debug;

struct Selectors {
    card: Selector,
    title: Selector,
    image: Selector,
    link: Selector,
    episode_link: Selector,
}

static SELECTORS: OnceLock<Selectors> = OnceLock::new();

fn selectors() -> &'static Selectors {
    SELECTORS.get_or_init(|| Selectors {
        card: Selector::parse("div.divCardUltimosEps").unwrap(),
        title: Selector::parse("h3.animeTitle").unwrap(),
        image: Selector::parse("img").unwrap(),
        link: Selector::parse("a[href]").unwrap(),
        episode_link: Selector::parse("div.div_video_list a[href]").unwrap(),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Cover image of a card: `src`, else the lazy-load `data-src`
fn cover_image(card: ElementRef<'_>, base_url: &str) -> String {
    card.select(&selectors().image)
        .next()
        .and_then(|img| non_empty_attr(img, "src").or_else(|| non_empty_attr(img, "data-src")))
        .map(|src| normalize(src, base_url))
        .unwrap_or_default()
}

/// Extract anime cards from a listing or search page.
///
/// Every kept card registers its identifier in `table`. Cards without a
/// title or link are skipped.
pub fn extract_summaries(html: &str, base_url: &str, table: &IdentifierTable) -> Vec<AnimeSummary> {
    let document = Html::parse_document(html);
    let sel = selectors();
    let mut summaries = Vec::new();

    for card in document.select(&sel.card) {
        let Some(title) = card
            .select(&sel.title)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty())
        else {
            debug!("Skipping card without title");
            continue;
        };

        let Some(href) = card
            .select(&sel.link)
            .next()
            .and_then(|a| non_empty_attr(a, "href"))
        else {
            debug!(title = %title, "Skipping card without link");
            continue;
        };

        let detail_url = normalize(href, base_url);
        let id = generate_id(&title);
        table.insert(&id, &detail_url);

        summaries.push(AnimeSummary {
            id,
            title,
            cover_image_url: cover_image(card, base_url),
            detail_url,
        });
    }

    summaries
}

/// Extract the episode list of a detail page in document order.
pub fn extract_episodes(html: &str, base_url: &str) -> Vec<Episode> {
    let document = Html::parse_document(html);

    document
        .select(&selectors().episode_link)
        .filter_map(|link| {
            let href = non_empty_attr(link, "href")?;
            Some(Episode::new(text_of(link), normalize(href, base_url)))
        })
        .collect()
}
