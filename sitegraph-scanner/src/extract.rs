use crate::canonical::{is_binary, is_same_origin, resolve};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// What the crawler keeps from a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    /// Canonical same-origin page links in document order.
    pub links: Vec<String>,
}

/// Parse `html` fetched from `page_url` and collect its title and the links
/// that stay on `origin`.
pub fn extract_page(html: &str, page_url: &Url, origin: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document).unwrap_or_else(|| page_url.path().to_string());

    let mut links = Vec::new();
    if let Ok(link_selector) = Selector::parse("a[href]") {
        for element in document.select(&link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(target) = resolve(page_url, href) else {
                continue;
            };
            if !is_same_origin(&target, origin) {
                debug!("  -> Cross-origin, dropping {}", target);
                continue;
            }
            if is_binary(target.as_str()) {
                debug!("  -> Binary, dropping {}", target);
                continue;
            }
            links.push(target.into());
        }
    }

    ExtractedPage { title, links }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    if title.is_empty() { None } else { Some(title) }
}
