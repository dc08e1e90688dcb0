//! List mode: one list item per link found in the input, in input order.

use std::io::{BufRead, Write};

use super::{Outcome, RewriteSummary, Rewriter};
use crate::error::RewriteError;
use crate::matcher::find_links;

impl Rewriter<'_> {
    /// Writes a list item for every link in `input`; surrounding text is dropped.
    pub fn list_stream<R: BufRead, W: Write>(
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
            for link in find_links(&line) {
                if let Outcome::Resolved(resolved) = self.resolve_or_skip(&link, &mut summary)? {
                    let item = self
                        .settings
                        .format
                        .render_list_item(&resolved.title, &resolved.url);
                    writeln!(output, "{item}")?;
                    output.flush()?;
                }
            }
        }
        tracing::info!(
            lines = summary.lines,
            links = summary.links,
            skipped = summary.skipped,
            "link list finished"
        );
        Ok(summary)
    }
}
