//! Projection of the database into single-language output files.
//!
//! An item appears in the output for a language iff it has a text in that
//! language; nothing is synthesized for items that lack one.

use std::path::{Path, PathBuf};

use log::info;

use crate::{
    database::Database,
    error::Error,
    formats::{
        FormatType,
        resx::{DataEntry, Format as ResxFormat},
    },
    options::ExportOptions,
    traits::Parser,
};

/// Separator between accumulated comments in a single RESX `<comment>`.
const COMMENT_SEPARATOR: &str = "\n";

/// One file written by [`export_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub lang: String,
    pub entries: usize,
}

/// Builds the RESX document for `lang` without touching the filesystem.
pub fn project(db: &Database, lang: &str, options: &ExportOptions) -> ResxFormat {
    let data = db
        .items()
        .filter_map(|item| {
            let entry = item.text(lang)?;
            let comment = if options.include_comments && !item.comments().is_empty() {
                Some(item.comments().join(COMMENT_SEPARATOR))
            } else {
                None
            };
            Some(DataEntry {
                comment,
                ..DataEntry::new(item.id(), entry.value())
            })
        })
        .collect();
    ResxFormat { data }
}

/// Writes the RESX projection for `lang` to `path` and returns the number of
/// entries written.
pub fn export_resx<P: AsRef<Path>>(
    db: &Database,
    path: P,
    lang: &str,
    options: &ExportOptions,
) -> Result<usize, Error> {
    let path = path.as_ref();
    let format = project(db, lang, options);
    format.write_to(path)?;
    info!(
        "Exported {} [{}] entries to {}",
        format.data.len(),
        lang,
        path.display()
    );
    Ok(format.data.len())
}

/// Writes a single output file in `format`.
pub fn export_file<P: AsRef<Path>>(
    db: &Database,
    path: P,
    format: FormatType,
    lang: &str,
    options: &ExportOptions,
) -> Result<usize, Error> {
    format.write_projection(db, path, lang, options)
}

/// Writes every configured output file, resolved against the directory of
/// the database file.
pub fn export_all(db: &Database, options: &ExportOptions) -> Result<Vec<ExportedFile>, Error> {
    let mut written = Vec::with_capacity(db.output_files().len());
    for spec in db.output_files() {
        let path = db.resolve_output_path(spec);
        let entries = export_resx(db, &path, &spec.lang, options)?;
        written.push(ExportedFile {
            path,
            lang: spec.lang.clone(),
            entries,
        });
    }
    Ok(written)
}
