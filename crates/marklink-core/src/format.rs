//! Link rendering for the supported markup syntaxes.
//!
//! Titles and URLs are inserted verbatim. A title containing `]` or `<` will
//! produce a link that the target markup parses differently; no escaping is done.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Output markup for rewritten links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `[title](url)`
    #[default]
    Markdown,
    /// `[[url][title]]`
    Org,
    /// `<a href="url">title</a>`
    Html,
}

impl OutputFormat {
    pub fn render(self, title: &str, url: &str) -> String {
        match self {
            OutputFormat::Markdown => format!("[{title}]({url})"),
            OutputFormat::Org => format!("[[{url}][{title}]]"),
            OutputFormat::Html => format!("<a href=\"{url}\">{title}</a>"),
        }
    }

    /// Renders the link as one item of a list (used by list mode).
    pub fn render_list_item(self, title: &str, url: &str) -> String {
        let link = self.render(title, url);
        match self {
            OutputFormat::Markdown => format!("* {link}"),
            OutputFormat::Org => format!("- {link}"),
            OutputFormat::Html => format!("<li>{link}</li>"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Org => "org",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "org" => Ok(OutputFormat::Org),
            "html" => Ok(OutputFormat::Html),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}
