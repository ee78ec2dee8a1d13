use std::num::NonZeroUsize;

use tracing::debug;

/// Release URL used when no other template is configured.
pub const DEFAULT_DETAILS_URL: &str = "https://github.com/IgKh/katvan/releases/tag/v{version}";

/// Output serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Markdown,
    /// AppStream `<releases>` metadata built from the version headings.
    Appstream,
}

/// Settings for the AppStream renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppstreamOptions {
    /// Details link for each release; `{version}` is replaced by the version.
    pub details_url: String,
    /// Indentation depth the `<releases>` element is assumed to sit at.
    pub indent_level: usize,
}

impl Default for AppstreamOptions {
    fn default() -> Self {
        AppstreamOptions {
            details_url: DEFAULT_DETAILS_URL.to_string(),
            indent_level: 1,
        }
    }
}

impl AppstreamOptions {
    pub fn details_url_for(&self, version: &str) -> String {
        self.details_url.replace("{version}", version)
    }
}

/// Everything that controls one run of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Keep only sections whose heading starts with this prefix.
    pub pick: Option<String>,
    /// Keep only the first N version sections.
    pub limit: Option<NonZeroUsize>,
    pub format: Format,
    /// Keep the heading of each picked section. AppStream output needs it,
    /// since that is where the version and date live.
    pub keep_matched_heading: bool,
    pub appstream: AppstreamOptions,
}

impl Options {
    pub fn new(format: Format) -> Self {
        Options {
            pick: None,
            limit: None,
            format,
            keep_matched_heading: format == Format::Appstream,
            appstream: AppstreamOptions::default(),
        }
    }

    pub fn with_pick(mut self, version: impl Into<String>) -> Self {
        self.pick = Some(version.into());
        self
    }

    /// Set the section limit. Zero or negative counts mean "no limit".
    pub fn with_limit(mut self, count: i64) -> Self {
        self.limit = usize::try_from(count).ok().and_then(NonZeroUsize::new);
        if self.limit.is_none() {
            debug!(count, "ignoring non-positive limit");
        }
        self
    }

    /// Force picked headings to be kept (they always are for AppStream).
    pub fn keep_heading(mut self, keep: bool) -> Self {
        self.keep_matched_heading = keep || self.format == Format::Appstream;
        self
    }

    pub fn with_appstream(mut self, appstream: AppstreamOptions) -> Self {
        self.appstream = appstream;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new(Format::default())
    }
}
