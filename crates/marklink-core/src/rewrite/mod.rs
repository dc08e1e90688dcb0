//! Rewrite driver: streams lines through matcher, resolver, transformers and
//! formatter, writing each rewritten line as soon as it is done.
//!
//! Everything runs on the calling thread, one link at a time, so output order is
//! input order. A slow title fetch stalls the rest of the stream.

mod list;

use std::io::{BufRead, Write};

use crate::config::Settings;
use crate::error::RewriteError;
use crate::http::HttpGet;
use crate::matcher::{find_links, LinkMatch};
use crate::title::TitleSource;

/// Final (title, url) pair, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub title: String,
    pub url: String,
}

/// Counters for one run, logged when the stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub lines: usize,
    pub links: usize,
    pub fetched: usize,
    /// Links left untouched because their title could not be resolved.
    pub skipped: usize,
}

/// Drops everything from the first `?` on. URLs without a query are returned as-is.
pub fn remove_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

/// Applies the per-link pipeline with fixed settings.
pub struct Rewriter<'a> {
    settings: &'a Settings,
    titles: &'a dyn TitleSource,
    http: &'a dyn HttpGet,
}

/// What happened to one link.
enum Outcome {
    Resolved(ResolvedLink),
    Skipped,
}

impl<'a> Rewriter<'a> {
    /// `titles` answers for links without an inline title; `http` is handed to
    /// transformers that need a secondary lookup.
    pub fn new(settings: &'a Settings, titles: &'a dyn TitleSource, http: &'a dyn HttpGet) -> Self {
        Self {
            settings,
            titles,
            http,
        }
    }

    /// Query stripping, title resolution and transformers for one match.
    pub fn resolve(&self, link: &LinkMatch<'_>) -> Result<ResolvedLink, RewriteError> {
        let (title, url) = match link.title {
            Some(title) => (title.to_string(), link.url),
            None => {
                let url = if self.settings.remove_query {
                    remove_query(link.url)
                } else {
                    link.url
                };
                let title = self
                    .titles
                    .title_for(url)
                    .map_err(|source| RewriteError::Resolve {
                        url: url.to_string(),
                        source,
                    })?;
                (title, url)
            }
        };

        let title = self
            .settings
            .transformers
            .apply(url, &title, self.http)
            .unwrap_or(title);

        Ok(ResolvedLink {
            title,
            url: url.to_string(),
        })
    }

    fn resolve_or_skip(
        &self,
        link: &LinkMatch<'_>,
        summary: &mut RewriteSummary,
    ) -> Result<Outcome, RewriteError> {
        summary.links += 1;
        if link.title.is_none() {
            summary.fetched += 1;
        }
        match self.resolve(link) {
            Ok(resolved) => Ok(Outcome::Resolved(resolved)),
            Err(RewriteError::Resolve { url, source }) if self.settings.skip_failed => {
                tracing::warn!(url = %url, error = %source, "skipping link");
                summary.skipped += 1;
                Ok(Outcome::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    /// Rewrites every link in `line`; text between links is copied unchanged.
    pub fn rewrite_line(&self, line: &str) -> Result<String, RewriteError> {
        let mut summary = RewriteSummary::default();
        self.rewrite_line_counted(line, &mut summary)
    }

    fn rewrite_line_counted(
        &self,
        line: &str,
        summary: &mut RewriteSummary,
    ) -> Result<String, RewriteError> {
        let mut out = String::with_capacity(line.len());
        let mut last = 0;
        for link in find_links(line) {
            out.push_str(&line[last..link.span.start]);
            match self.resolve_or_skip(&link, summary)? {
                Outcome::Resolved(resolved) => {
                    out.push_str(&self.settings.format.render(&resolved.title, &resolved.url));
                }
                Outcome::Skipped => out.push_str(&line[link.span.clone()]),
            }
            last = link.span.end;
        }
        out.push_str(&line[last..]);
        Ok(out)
    }

    /// Reads `input` line by line and writes each rewritten line to `output`,
    /// keeping the original line terminators. Stops at the first fatal error;
    /// lines already written stay written.
    pub fn rewrite_stream<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> Result<RewriteSummary, RewriteError> {
        let mut summary = RewriteSummary::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            summary.lines += 1;
            let line = String::from_utf8_lossy(&buf);
            let rewritten = self.rewrite_line_counted(&line, &mut summary)?;
            output.write_all(rewritten.as_bytes())?;
            output.flush()?;
        }
        tracing::info!(
            lines = summary.lines,
            links = summary.links,
            fetched = summary.fetched,
            skipped = summary.skipped,
            "rewrite finished"
        );
        Ok(summary)
    }

    /// Runs list mode or rewrite mode according to the settings.
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<RewriteSummary, RewriteError> {
        if self.settings.list {
            self.list_stream(input, output)
        } else {
            self.rewrite_stream(input, output)
        }
    }
}
