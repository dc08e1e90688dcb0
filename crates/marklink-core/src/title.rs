//! Page title resolution: fetch a URL and pull the text of its `<title>`.

use std::borrow::Cow;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::error::ResolveError;
use crate::http::HttpGet;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));

/// Source of page titles for URLs that carry none inline.
pub trait TitleSource {
    fn title_for(&self, url: &str) -> Result<String, ResolveError>;
}

/// Resolves titles by fetching the page over HTTP.
#[derive(Debug, Clone)]
pub struct TitleResolver<H> {
    http: H,
}

impl<H: HttpGet> TitleResolver<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }
}

impl<H: HttpGet> TitleSource for TitleResolver<H> {
    fn title_for(&self, url: &str) -> Result<String, ResolveError> {
        let target = normalize_url(url);
        let html = self.http.get_text(&target, Some("text/html"))?;
        match extract_title(&html) {
            Some(title) if title.is_empty() => Err(ResolveError::EmptyTitle {
                url: target.into_owned(),
            }),
            Some(title) => {
                tracing::debug!(url = %target, title = %title, "resolved title");
                Ok(title)
            }
            None => Err(ResolveError::TitleNotFound {
                url: target.into_owned(),
            }),
        }
    }
}

/// Prefixes `https://` unless the URL already starts with `http://` or `https://`.
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    if has_http_scheme(url) {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("https://{url}"))
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Text of the first `<title>` element, trimmed with inner whitespace collapsed.
///
/// Returns `Some("")` for a present but blank title and `None` when there is no
/// title element at all.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let element = document.select(&TITLE_SELECTOR).next()?;
    let text: String = element.text().collect();
    Some(text.split_whitespace().collect::<Vec<_>>().join(" "))
}
