//! Link detection in a line of text.
//!
//! One compiled pattern recognizes two shapes:
//!
//! - an existing markdown link `[title](url)`, whose title is kept;
//! - a bare URL starting at a word boundary with `http://`, `https://` or `www.`.
//!
//! The last character of a URL comes from a narrower set than the body, so prose
//! punctuation right after a URL (`.` `,` `;` `:` `!` `?`) stays outside the match.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Body of a URL after the scheme or `www.` prefix.
const URL_BODY: &str = r"[-A-Z0-9+&@#/%?=~_|$!:,.;]*";
/// Allowed final character of a URL.
const URL_TAIL: &str = r"[A-Z0-9+&@#/%=~_|$]";

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    let url = format!(r"(?:https?://|www\.){URL_BODY}{URL_TAIL}");
    let pattern = format!(r"(?i)\[(?P<title>[^\]]*)\]\((?P<url>{url})\)?|\b(?P<bare>{url})");
    Regex::new(&pattern).expect("link pattern is valid")
});

/// A link located in a source line. Borrows from the line it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    /// Inline title from `[title](url)`; `None` for bare URLs and for `[](url)`.
    pub title: Option<&'a str>,
    pub url: &'a str,
    /// Byte range of the whole match in the line, including brackets.
    pub span: Range<usize>,
}

/// Finds links in `line`, left to right, without overlap.
pub fn find_links(line: &str) -> impl Iterator<Item = LinkMatch<'_>> + '_ {
    LINK_RE.captures_iter(line).filter_map(link_from_captures)
}

fn link_from_captures<'a>(caps: Captures<'a>) -> Option<LinkMatch<'a>> {
    let whole = caps.get(0)?;
    let (title, url) = match caps.name("bare") {
        Some(bare) => (None, bare.as_str()),
        None => {
            let title = caps
                .name("title")
                .map(|m| m.as_str())
                .filter(|t| !t.is_empty());
            (title, caps.name("url")?.as_str())
        }
    };
    Some(LinkMatch {
        title,
        url,
        span: whole.range(),
    })
}
