//! Error types shared across the rewrite pipeline.
//!
//! Kept typed (rather than `anyhow`) so the driver can decide what is fatal and
//! the CLI can attach context at the boundary.

use std::path::PathBuf;

/// A failed HTTP GET (title page or oEmbed metadata).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported a transport error (DNS, connect, TLS, bad URL, ...).
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// The request ran past the configured timeout.
    #[error("GET {url} timed out")]
    Timeout { url: String },
    /// Response had a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
}

impl FetchError {
    pub(crate) fn from_curl(url: &str, source: curl::Error) -> Self {
        if source.is_operation_timedout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Title resolution failure.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no <title> element in document at {url}")]
    TitleNotFound { url: String },
    #[error("empty <title> element in document at {url}")]
    EmptyTitle { url: String },
}

/// Fatal error while rewriting a stream.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("could not resolve title for {url}")]
    Resolve {
        url: String,
        #[source]
        source: ResolveError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid configuration, rejected before any input is read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported output format {0:?} (expected md, org or html)")]
    UnsupportedFormat(String),
    #[error("unknown transformer {name:?} (available: {available})")]
    UnknownTransformer { name: String, available: String },
    #[error("timeout must be at least one second")]
    ZeroTimeout,
    #[error("could not read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not locate config directory: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_messages_name_the_url() {
        let e = FetchError::Status {
            url: "https://example.com/x".to_string(),
            status: 404,
        };
        assert_eq!(e.to_string(), "GET https://example.com/x returned HTTP 404");

        let e = FetchError::Timeout {
            url: "https://slow.example".to_string(),
        };
        assert!(e.to_string().contains("https://slow.example"));
    }

    #[test]
    fn resolve_error_wraps_fetch_transparently() {
        let e: ResolveError = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 500,
        }
        .into();
        assert_eq!(e.to_string(), "GET https://example.com returned HTTP 500");
    }

    #[test]
    fn rewrite_error_keeps_resolver_source() {
        let e = RewriteError::Resolve {
            url: "https://example.com".to_string(),
            source: ResolveError::TitleNotFound {
                url: "https://example.com".to_string(),
            },
        };
        assert_eq!(e.to_string(), "could not resolve title for https://example.com");
        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("no <title>"));
    }
}
