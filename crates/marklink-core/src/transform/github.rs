//! GitHub: drop the `GitHub - ` prefix GitHub puts in front of repository titles.

use super::{host_matches, Transformer};
use crate::http::HttpGet;

const DOMAINS: &[&str] = &["github.com"];
const TITLE_PREFIX: &str = "GitHub - ";

#[derive(Debug, Clone, Copy, Default)]
pub struct GithubTransformer;

impl Transformer for GithubTransformer {
    fn name(&self) -> &str {
        "github"
    }

    fn transform(&self, url: &str, title: &str, _http: &dyn HttpGet) -> Option<String> {
        if !host_matches(url, DOMAINS) {
            return None;
        }
        Some(title.strip_prefix(TITLE_PREFIX).unwrap_or(title).to_string())
    }
}
