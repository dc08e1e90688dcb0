//! CLI for marklink: resolve settings once, then stream input through the rewriter.

use anyhow::{Context, Result};
use clap::Parser;
use marklink_core::config::{self, Overrides, Settings};
use marklink_core::http::CurlClient;
use marklink_core::rewrite::Rewriter;
use marklink_core::title::TitleResolver;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Turn URLs in text into titled links.
#[derive(Debug, Parser)]
#[command(name = "marklink", version)]
#[command(about = "Turn bare URLs in text into titled markdown, org or HTML links", long_about = None)]
pub struct Cli {
    /// Input file. Reads stdin when omitted or "-".
    pub file: Option<PathBuf>,

    /// Output format: md, org or html [default: md].
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Remove query parameters from bare URLs.
    #[arg(short = 'q', long)]
    pub remove_query: bool,

    /// Comma separated list of transformers, in precedence order [default: github,youtube].
    /// Pass an empty string to disable all.
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub transformers: Option<Vec<String>>,

    /// Print a list of the links found instead of rewriting the text.
    #[arg(short, long)]
    pub list: bool,

    /// Leave links whose title can't be fetched untouched instead of failing.
    #[arg(long)]
    pub skip_failed: bool,

    /// Per-request HTTP timeout in seconds [default: 10].
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file [default: ~/.config/marklink/config.toml].
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v, -vv). MARKLINK_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Flags that override the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            format: self.format.clone(),
            remove_query: self.remove_query,
            transformers: self.transformers.as_ref().map(|names| {
                names
                    .iter()
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            timeout_secs: self.timeout,
            skip_failed: self.skip_failed,
            list: self.list,
        }
    }

    fn input(&self) -> Result<Box<dyn BufRead>> {
        match self.file.as_deref() {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("opening input {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            _ => Ok(Box::new(io::stdin().lock())),
        }
    }

    pub fn run(&self) -> Result<()> {
        let file_cfg = config::load(self.config.as_deref())?;
        let settings = Settings::resolve(&file_cfg, &self.overrides())?;
        tracing::debug!("resolved settings: {:?}", settings);

        let input = self.input()?;
        let http = CurlClient::new(settings.timeout);
        let resolver = TitleResolver::new(&http);
        let rewriter = Rewriter::new(&settings, &resolver, &http);

        rewriter.run(input, io::stdout().lock())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
