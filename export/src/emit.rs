use std::io::Write;

use changelog::Document;
use tracing::info;

use crate::appstream;
use crate::error::EmitError;
use crate::markdown;
use crate::options::{Format, Options};
use crate::select;

/// Run the configured filters: pick first, then limit.
pub fn apply_filters(document: Document, options: &Options) -> Document {
    let mut document = document;

    if let Some(version) = &options.pick {
        document = select::pick(document, version, options.keep_matched_heading);
        if document.is_empty() {
            info!(version = version.as_str(), "no section matches the picked version");
        }
    }

    if let Some(count) = options.limit {
        document = select::limit(document, count);
    }

    document
}

/// Filter the document and write it out in the configured format.
pub fn emit<W: Write>(document: Document, options: &Options, out: &mut W) -> Result<(), EmitError> {
    let document = apply_filters(document, options);

    match options.format {
        Format::Markdown => markdown::render(&document, out)?,
        Format::Appstream => appstream::render(&document, &options.appstream, out)?,
    }

    Ok(())
}

pub fn emit_to_string(document: Document, options: &Options) -> Result<String, EmitError> {
    let mut output = Vec::new();
    emit(document, options, &mut output)?;
    Ok(String::from_utf8(output)?)
}
