#![forbid(unsafe_code)]

//! Terminal demo host for the resizing token field.

pub mod cli;
pub mod terminal;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tokenfield::{ConfigError, TokenFieldConfig};

/// Errors that stop the demo before the first frame.
#[derive(Debug)]
pub enum DemoError {
    /// The configuration file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// The configuration file is not a valid configuration document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The configuration has invalid lengths.
    Config(ConfigError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "invalid configuration in {}: {source}", path.display())
            }
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for DemoError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Parse a JSON configuration document. Missing fields use library defaults.
pub fn parse_config(path: &Path, json: &str) -> Result<TokenFieldConfig, DemoError> {
    serde_json::from_str(json).map_err(|source| DemoError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the configuration for `opts`: the file if given, otherwise the
/// terminal defaults, with command-line overrides applied and validated.
pub fn load_config(opts: &cli::Opts) -> Result<TokenFieldConfig, DemoError> {
    let mut config = match &opts.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| DemoError::Io {
                path: path.clone(),
                source,
            })?;
            parse_config(path, &json)?
        }
        None => terminal::terminal_config(),
    };

    if let Some(label) = &opts.label {
        config = config.with_label(label.clone());
    }
    if let Some(placeholder) = &opts.placeholder {
        config = config.with_placeholder(placeholder.clone());
    }
    if opts.focus {
        config = config.with_focus_on_load(true);
    }
    config.validate()?;
    Ok(config)
}
