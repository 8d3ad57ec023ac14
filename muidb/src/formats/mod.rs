//! Interchange formats understood by muidb.
//!
//! This module provides the [`FormatType`] enum, which binds each supported
//! format to its two capabilities: reading a source file into
//! [`ImportRecord`]s, and rendering a projection of the database into a file.

pub mod resx;
pub mod xliff;

use std::{
    fmt::{Display, Formatter},
    io::BufRead,
    path::Path,
    str::FromStr,
};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    Error,
    database::Database,
    export,
    options::ExportOptions,
    traits::Parser,
    types::ImportRecord,
};

// Reexporting the formats for easier access
pub use resx::Format as ResxFormat;
pub use xliff::Format as XliffFormat;

/// Represents all supported interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// .NET `.resx` resource files.
    Resx,
    /// XLIFF 1.2 interchange files (import only).
    Xliff,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use muidb::formats::FormatType;
/// assert_eq!(FormatType::Resx.to_string(), "resx");
/// assert_eq!(FormatType::Xliff.to_string(), "xliff");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Resx => write!(f, "resx"),
            FormatType::Xliff => write!(f, "xliff"),
        }
    }
}

/// Implements [`std::str::FromStr`] for [`FormatType`].
///
/// Accepts `"resx"` and `"xliff"`/`"xlf"`, case-insensitively. Returns
/// [`crate::error::Error::UnknownFormat`] for anything else.
///
/// # Example
/// ```rust
/// use muidb::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("RESX").unwrap(), FormatType::Resx);
/// assert!(FormatType::from_str("po").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "resx" => Ok(FormatType::Resx),
            "xliff" | "xlf" => Ok(FormatType::Xliff),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Resx => "resx",
            FormatType::Xliff => "xlf",
        }
    }

    /// Reads a source file and maps its contents to import records for `lang`.
    pub fn read_records<P: AsRef<Path>>(
        &self,
        path: P,
        lang: &str,
    ) -> Result<Vec<ImportRecord>, Error> {
        match self {
            FormatType::Resx => Ok(ResxFormat::read_from(path)?.into_records(lang)),
            FormatType::Xliff => XliffFormat::read_from(path)?.into_records(lang),
        }
    }

    /// Same as [`FormatType::read_records`], from an in-memory document.
    pub fn parse_records(&self, content: &str, lang: &str) -> Result<Vec<ImportRecord>, Error> {
        match self {
            FormatType::Resx => Ok(ResxFormat::from_str(content)?.into_records(lang)),
            FormatType::Xliff => XliffFormat::from_str(content)?.into_records(lang),
        }
    }

    /// Writes the projection of `db` for `lang` to `path`.
    ///
    /// Returns the number of entries written. XLIFF output is not supported
    /// and fails before touching the filesystem.
    pub fn write_projection<P: AsRef<Path>>(
        &self,
        db: &Database,
        path: P,
        lang: &str,
        options: &ExportOptions,
    ) -> Result<usize, Error> {
        match self {
            FormatType::Resx => export::export_resx(db, path, lang, options),
            FormatType::Xliff => Err(export_unsupported(self)),
        }
    }

    /// Fails with [`Error::NotImplemented`] for formats that can only be read.
    pub fn ensure_exportable(&self) -> Result<(), Error> {
        match self {
            FormatType::Resx => Ok(()),
            FormatType::Xliff => Err(export_unsupported(self)),
        }
    }
}

fn export_unsupported(format: &FormatType) -> Error {
    Error::NotImplemented(format!("exporting {} files is not supported", format))
}

/// Returns the unescaped value of attribute `name`, if present.
pub(crate) fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Collects the text content of the element whose start tag was just read,
/// up to and including its matching end tag. Markup nested inside the
/// element is dropped; its text is kept.
pub(crate) fn read_text<R: BufRead>(reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(e) if e.local_name().as_ref() == end => depth += 1,
            Event::End(e) if e.local_name().as_ref() == end => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(Error::invalid_resource(format!(
                    "unexpected end of document inside <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}
