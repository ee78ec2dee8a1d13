//! AppStream release metadata.
//!
//! Only level-2 headings of the form `v<major>.<minor>.<patch> (<date>)` are
//! looked at; section bodies are ignored. The output is a `<releases>`
//! fragment meant to be pasted into a metainfo file.

use std::io::Write;
use std::sync::LazyLock;

use changelog::{Document, VERSION_HEADING_LEVEL};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use regex::Regex;
use tracing::debug;

use crate::error::EmitError;
use crate::options::AppstreamOptions;

/// Spaces per indentation level.
const INDENT: usize = 4;

/// Anchored at the start only: trailing text after the closing paren is allowed.
static RELEASE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v(?P<version>\d+\.\d+\.\d+) \((?P<date>.+)\)").unwrap()
});

/// One `<release>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub date: String,
}

impl Release {
    /// Parse a heading such as `v1.2.3 (2024-01-15)`.
    pub fn from_heading(text: &str) -> Option<Release> {
        let caps = RELEASE_HEADING_RE.captures(text.trim())?;
        Some(Release {
            version: caps["version"].to_string(),
            date: caps["date"].to_string(),
        })
    }
}

/// Releases described by the document's version headings, in document order.
pub fn releases(document: &Document) -> Vec<Release> {
    document
        .headings(VERSION_HEADING_LEVEL)
        .filter_map(|heading| {
            let release = Release::from_heading(heading.lead_text());
            if release.is_none() {
                debug!(heading = heading.lead_text().trim(), "skipping non-release heading");
            }
            release
        })
        .collect()
}

/// Render the document's releases as a `<releases>` element.
///
/// The root start tag is not indented; everything after it is laid out as
/// if the root sat at `options.indent_level`. No XML declaration and no
/// trailing newline are written.
pub fn to_xml(document: &Document, options: &AppstreamOptions) -> Result<String, EmitError> {
    let releases = releases(document);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    if releases.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("releases")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("releases")))?;
        for release in &releases {
            write_release(&mut writer, release, options)?;
        }
        writer.write_event(Event::End(BytesEnd::new("releases")))?;
    }

    let xml = String::from_utf8(writer.into_inner())?;
    Ok(shift_lines(&xml, options.indent_level * INDENT))
}

pub fn render<W: Write>(
    document: &Document,
    options: &AppstreamOptions,
    out: &mut W,
) -> Result<(), EmitError> {
    let xml = to_xml(document, options)?;
    out.write_all(xml.as_bytes())?;
    Ok(())
}

fn write_release(
    writer: &mut Writer<Vec<u8>>,
    release: &Release,
    options: &AppstreamOptions,
) -> Result<(), EmitError> {
    let mut start = BytesStart::new("release");
    start.push_attribute(("version", release.version.as_str()));
    start.push_attribute(("date", release.date.as_str()));
    writer.write_event(Event::Start(start))?;

    let mut url = BytesStart::new("url");
    url.push_attribute(("type", "details"));
    writer.write_event(Event::Start(url))?;
    let link = options.details_url_for(&release.version);
    writer.write_event(Event::Text(BytesText::new(&link)))?;
    writer.write_event(Event::End(BytesEnd::new("url")))?;

    writer.write_event(Event::End(BytesEnd::new("release")))?;
    Ok(())
}

/// Prefix every line but the first with `width` spaces.
fn shift_lines(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut lines = text.split('\n');
    let mut shifted = lines.next().unwrap_or_default().to_string();
    for line in lines {
        shifted.push('\n');
        shifted.push_str(&pad);
        shifted.push_str(line);
    }
    shifted
}
