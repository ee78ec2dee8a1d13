use thiserror::Error;

/// Failure while writing the rendered changelog.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("rendered output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
