//! NYT Cooking search pages as a [`PageSource`].
//!
//! Page 1 is `{base}/search?q=<query>`; page N > 1 appends `&page=N`. The
//! result count comes from the `#pagination-count` banner ("1 - 24 of 1,234")
//! and the candidates from the `<article>` cards under
//! `#search-results > section`.

use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::matching::Query;
use crate::source::{FetchError, Page, PageSource, RawCandidate, SourceRef};
use crate::{Config, CoreError};

static PAGINATION_COUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#pagination-count").expect("valid selector"));
static ARTICLES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#search-results > section article").expect("valid selector"));
static RECIPE_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.name").expect("valid selector"));

/// HTTP page source for a cooking site search.
#[derive(Debug, Clone)]
pub struct CookingSite {
    client: reqwest::Client,
    base_url: String,
}

impl CookingSite {
    /// Build a source with its own client, configured from `config`.
    ///
    /// Fails with [`CoreError::InvalidUrl`] unless `base_url` is an absolute
    /// http(s) URL.
    pub fn new(config: &Config) -> Result<Self, CoreError> {
        let url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| CoreError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                config.base_url,
                url.scheme()
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Build a source around an existing client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a numbered results page for `query`.
    pub fn search_url(&self, query: &Query, page_number: u32) -> String {
        let mut url = format!(
            "{}/search?q={}",
            self.base_url,
            urlencoding::encode(query.raw_text())
        );
        if page_number > 1 {
            url.push_str(&format!("&page={page_number}"));
        }
        url
    }
}

impl PageSource for CookingSite {
    async fn fetch_page(&self, query: &Query, page_number: u32) -> Result<Page, FetchError> {
        let url = self.search_url(query, page_number);
        log::debug!("GET {url}");
        let resp = self.client.get(&url).send().await?;
        page_from_response(resp).await
    }
}

/// Turn an HTTP response into a [`Page`]. Bodies of non-success responses
/// are not read.
pub async fn page_from_response(resp: reqwest::Response) -> Result<Page, FetchError> {
    let status = resp.status().as_u16();
    if status != 200 {
        return Ok(Page {
            status,
            ..Page::default()
        });
    }
    let body = resp.text().await?;
    Ok(parse_results_page(status, &body))
}

/// Parse a search results document.
pub fn parse_results_page(status: u16, html: &str) -> Page {
    let document = Html::parse_document(html);

    let counts = document
        .select(&PAGINATION_COUNT)
        .next()
        .and_then(|el| parse_pagination_count(&element_text(&el)));

    let candidates = document
        .select(&ARTICLES)
        .map(|article| RawCandidate {
            display_name: article
                .select(&RECIPE_NAME)
                .next()
                .map(|h3| element_text(&h3))
                .filter(|name| !name.is_empty()),
            source_ref: SourceRef::new(article.value().attr("data-url").unwrap_or_default()),
        })
        .collect();

    Page {
        status,
        results_per_page_hint: counts.map(|(per_page, _)| per_page),
        total_results_hint: counts.map(|(_, total)| total),
        candidates,
    }
}

/// Parse the pagination banner into `(results_per_page, total_results)`.
///
/// The banner reads like `1 - 24 of 1,234`: the third word is the page size
/// and the fifth the total, which may carry thousands separators.
pub fn parse_pagination_count(text: &str) -> Option<(u64, u64)> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let per_page = parse_count(words.get(2)?)?;
    let total = parse_count(words.get(4)?)?;
    Some((per_page, total))
}

fn parse_count(word: &str) -> Option<u64> {
    word.replace(',', "").parse().ok()
}

/// Visible text of an element, with runs of whitespace collapsed to one space.
fn element_text(el: &ElementRef<'_>) -> String {
    let text: String = el.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
