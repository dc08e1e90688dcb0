//! Per-domain title transformers.
//!
//! A transformer looks at the (normalized) URL and either proposes a new title
//! or returns `None`. The chain asks transformers in configured order and stops
//! at the first `Some`. `Some(String::new())` is a real answer, not a refusal.

mod github;
mod youtube;

pub use github::GithubTransformer;
pub use youtube::{YoutubeTransformer, YOUTUBE_OEMBED_ENDPOINT};

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::ConfigError;
use crate::http::HttpGet;
use crate::title::normalize_url;

/// A best-effort, per-domain title post-processor.
pub trait Transformer {
    /// Name used in configuration (`transformers = [...]`).
    fn name(&self) -> &str;

    /// Returns a replacement title, or `None` when the URL is not this
    /// transformer's business. Failures must be reported as `None`.
    fn transform(&self, url: &str, title: &str, http: &dyn HttpGet) -> Option<String>;
}

/// Built-in transformers, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerKind {
    Github,
    Youtube,
}

impl TransformerKind {
    pub const ALL: [TransformerKind; 2] = [TransformerKind::Github, TransformerKind::Youtube];

    pub fn name(self) -> &'static str {
        match self {
            TransformerKind::Github => "github",
            TransformerKind::Youtube => "youtube",
        }
    }

    pub fn build(self) -> Box<dyn Transformer> {
        match self {
            TransformerKind::Github => Box::new(GithubTransformer),
            TransformerKind::Youtube => Box::new(YoutubeTransformer::default()),
        }
    }
}

impl fmt::Display for TransformerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TransformerKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownTransformer {
                name: wanted.to_string(),
                available: TransformerKind::ALL.map(TransformerKind::name).join(", "),
            })
    }
}

/// Ordered list of enabled transformers.
#[derive(Default)]
pub struct TransformerChain {
    transformers: Vec<Box<dyn Transformer>>,
}

impl TransformerChain {
    pub fn new(transformers: Vec<Box<dyn Transformer>>) -> Self {
        Self { transformers }
    }

    /// Every built-in transformer, in [`TransformerKind::ALL`] order.
    pub fn all() -> Self {
        Self::new(TransformerKind::ALL.into_iter().map(TransformerKind::build).collect())
    }

    /// Builds the chain for the given names, in order. Blank names are ignored,
    /// duplicates keep their first position, an unknown name is an error.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let mut kinds: Vec<TransformerKind> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let kind: TransformerKind = name.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(Self::new(kinds.into_iter().map(TransformerKind::build).collect()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// First non-`None` answer in chain order.
    pub fn apply(&self, url: &str, title: &str, http: &dyn HttpGet) -> Option<String> {
        self.transformers.iter().find_map(|t| {
            let out = t.transform(url, title, http);
            if let Some(new_title) = &out {
                tracing::debug!(transformer = t.name(), url, title = %new_title, "title transformed");
            }
            out
        })
    }
}

impl fmt::Debug for TransformerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// True when `url`'s host is one of `domains` or a subdomain of one.
/// Scheme-less URLs are read as `https://`.
pub(crate) fn host_matches(url: &str, domains: &[&str]) -> bool {
    let Ok(parsed) = Url::parse(&normalize_url(url)) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    domains.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|rest| rest.ends_with('.'))
    })
}
