//! YouTube: replace the page title with the one from YouTube's oEmbed endpoint.

use serde::Deserialize;
use url::Url;

use super::{host_matches, Transformer};
use crate::http::HttpGet;
use crate::title::normalize_url;

pub const YOUTUBE_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

const DOMAINS: &[&str] = &["youtube.com", "youtu.be"];

/// Subset of an oEmbed response we care about.
#[derive(Debug, Deserialize)]
struct OEmbed {
    title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct YoutubeTransformer {
    endpoint: String,
}

impl Default for YoutubeTransformer {
    fn default() -> Self {
        Self::with_endpoint(YOUTUBE_OEMBED_ENDPOINT)
    }
}

impl YoutubeTransformer {
    /// Uses `endpoint` instead of the public oEmbed URL.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn oembed_url(&self, video_url: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(&self.endpoint, &[("format", "json"), ("url", video_url)])
    }

    fn fetch_title(&self, video_url: &str, http: &dyn HttpGet) -> anyhow::Result<Option<String>> {
        let request = self.oembed_url(video_url)?;
        let body = http.get_text(request.as_str(), Some("application/json"))?;
        let oembed: OEmbed = serde_json::from_str(&body)?;
        Ok(oembed.title)
    }
}

impl Transformer for YoutubeTransformer {
    fn name(&self) -> &str {
        "youtube"
    }

    fn transform(&self, url: &str, title: &str, http: &dyn HttpGet) -> Option<String> {
        if !host_matches(url, DOMAINS) {
            return None;
        }
        let video_url = normalize_url(url);
        match self.fetch_title(&video_url, http) {
            Ok(Some(oembed_title)) => Some(oembed_title),
            Ok(None) => Some(title.to_string()),
            Err(e) => {
                tracing::warn!(url, error = %format!("{e:#}"), "oEmbed lookup failed; keeping page title");
                None
            }
        }
    }
}
