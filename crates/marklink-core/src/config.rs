//! Configuration: TOML file, CLI overrides, and the resolved per-run settings.
//!
//! The file lives at `~/.config/marklink/config.toml` (XDG). Every key is
//! optional. Resolution happens once, before any input is read; the resulting
//! [`Settings`] are immutable for the rest of the run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::OutputFormat;
use crate::http::DEFAULT_TIMEOUT;
use crate::transform::{TransformerChain, TransformerKind};

/// Contents of `config.toml`. Unset keys fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarklinkConfig {
    /// Output format: "md", "org" or "html".
    pub format: Option<String>,
    /// Strip query strings from bare URLs before fetching titles.
    pub remove_query: Option<bool>,
    /// Enabled transformers, in precedence order.
    pub transformers: Option<Vec<String>>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Leave links whose title can't be fetched untouched instead of failing.
    pub skip_failed: Option<bool>,
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub format: Option<String>,
    pub remove_query: bool,
    pub transformers: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub skip_failed: bool,
    pub list: bool,
}

/// Fully resolved, read-only settings for one run.
#[derive(Debug)]
pub struct Settings {
    pub format: OutputFormat,
    pub remove_query: bool,
    pub transformers: TransformerChain,
    pub timeout: Duration,
    pub skip_failed: bool,
    /// Emit a list of links instead of rewriting the text.
    pub list: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            remove_query: false,
            transformers: TransformerChain::all(),
            timeout: DEFAULT_TIMEOUT,
            skip_failed: false,
            list: false,
        }
    }
}

/// Default transformer names when neither file nor CLI sets any.
pub fn default_transformers() -> Vec<String> {
    TransformerKind::ALL
        .iter()
        .map(|kind| kind.name().to_string())
        .collect()
}

impl Settings {
    /// Merges CLI overrides over the file and validates the result.
    pub fn resolve(file: &MarklinkConfig, overrides: &Overrides) -> Result<Self, ConfigError> {
        let format = match overrides.format.as_deref().or(file.format.as_deref()) {
            Some(name) => name.parse()?,
            None => OutputFormat::default(),
        };

        let names = overrides
            .transformers
            .clone()
            .or_else(|| file.transformers.clone())
            .unwrap_or_else(default_transformers);
        let transformers = TransformerChain::from_names(names.as_slice())?;

        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT.as_secs());
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            format,
            remove_query: overrides.remove_query || file.remove_query.unwrap_or(false),
            transformers,
            timeout: Duration::from_secs(timeout_secs),
            skip_failed: overrides.skip_failed || file.skip_failed.unwrap_or(false),
            list: overrides.list,
        })
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("marklink")?;
    Ok(xdg_dirs.get_config_home().join("config.toml"))
}

/// Loads the config at `path`.
pub fn load_from(path: &Path) -> Result<MarklinkConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads an explicitly given config file, or the default one if it exists.
///
/// A missing default file is not an error, and nothing is created on disk.
pub fn load(explicit: Option<&Path>) -> Result<MarklinkConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    let path = config_path()?;
    match load_from(&path) {
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(MarklinkConfig::default())
        }
        other => other,
    }
}
