//! Optional TOML configuration file.
//!
//! ```toml
//! [appstream]
//! details_url = "https://example.org/app/releases/{version}"
//! indent_level = 1
//! ```

use std::ops::Range;
use std::path::{Path, PathBuf};

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use serde::Deserialize;
use thiserror::Error;

use export::AppstreamOptions;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub appstream: AppstreamConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppstreamConfig {
    /// Details link template; `{version}` is replaced by the release version.
    pub details_url: Option<String>,

    /// Indentation depth the `<releases>` element is pasted at.
    pub indent_level: Option<usize>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Config::parse(path, source)
    }

    fn parse(path: &Path, source: String) -> Result<Config, ConfigError> {
        toml::from_str(&source).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: e.message().to_string(),
            span: e.span(),
            contents: source,
        })
    }

    /// AppStream settings, with `details_url` (from the command line) taking
    /// precedence over the file.
    pub fn appstream_options(&self, details_url: Option<String>) -> AppstreamOptions {
        let defaults = AppstreamOptions::default();
        AppstreamOptions {
            details_url: details_url
                .or_else(|| self.appstream.details_url.clone())
                .unwrap_or(defaults.details_url),
            indent_level: self.appstream.indent_level.unwrap_or(defaults.indent_level),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config '{}': {message}", path.display())]
    Invalid {
        path: PathBuf,
        message: String,
        span: Option<Range<usize>>,
        /// File contents, kept for diagnostics.
        contents: String,
    },
}

impl ConfigError {
    /// Build a codespan diagnostic, registering the config file in `files`
    /// when the error points into it.
    pub fn to_diagnostic(&self, files: &mut SimpleFiles<String, String>) -> Diagnostic<usize> {
        match self {
            ConfigError::Invalid {
                path,
                message,
                span: Some(span),
                contents,
            } => {
                let file_id = files.add(path.display().to_string(), contents.clone());
                Diagnostic::error()
                    .with_message("invalid configuration file")
                    .with_labels(vec![
                        Label::primary(file_id, span.clone()).with_message(message.clone()),
                    ])
            }
            other => Diagnostic::error().with_message(other.to_string()),
        }
    }
}
