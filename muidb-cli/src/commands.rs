//! One function per subcommand. Each loads the database, runs a single
//! operation, and saves when the operation mutates.

use std::{path::Path, str::FromStr};

use log::info;
use muidb::{Database, ExportOptions, FormatType, LoadOptions, VerifyReport};
use thiserror::Error;

use crate::{
    info::print_info,
    validation::{validate_file_path, validate_language_code, validate_output_path},
};

/// Failure of a subcommand: either rejected input or a library error.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Invalid(String),

    // The library error prints its own source inline, so only the next link
    // is exposed as this error's source.
    #[error(transparent)]
    Db(#[from] muidb::Error),
}

impl From<String> for CliError {
    fn from(msg: String) -> Self {
        CliError::Invalid(msg)
    }
}

fn open(path: &Path, create_if_missing: bool) -> Result<Database, CliError> {
    let options = LoadOptions::new().with_create_if_missing(create_if_missing);
    Ok(Database::load(path, &options)?)
}

pub fn run_info(db_path: &Path, json_output: bool) -> Result<(), CliError> {
    let db = open(db_path, false)?;
    print_info(&db.summary(), json_output)?;
    Ok(())
}

pub fn run_import_file(
    db_path: &Path,
    format: &str,
    input: &Path,
    lang: &str,
    verbose: bool,
) -> Result<(), CliError> {
    let format = FormatType::from_str(format)?;
    validate_language_code(lang)?;
    validate_file_path(input)?;

    let mut db = open(db_path, true)?;
    let result = db.import_file(input, format, lang)?;
    db.save()?;

    if verbose {
        for id in &result.added {
            println!("  added: {}", id);
        }
        for id in &result.updated {
            println!("  updated: {}", id);
        }
    }
    println!(
        "Added {}, updated {}",
        result.added_count(),
        result.updated_count()
    );
    Ok(())
}

pub fn run_export(db_path: &Path, verbose: bool) -> Result<(), CliError> {
    let db = open(db_path, false)?;
    if db.output_files().is_empty() {
        println!("No output files configured");
        return Ok(());
    }

    let written = muidb::export_all(&db, &ExportOptions::default())?;
    for file in &written {
        if verbose {
            println!(
                "Wrote {} [{}]: {} entries",
                file.path.display(),
                file.lang,
                file.entries
            );
        }
    }
    println!("Exported {} file(s)", written.len());
    Ok(())
}

pub fn run_export_file(
    db_path: &Path,
    format: &str,
    output: &Path,
    lang: &str,
    include_comments: bool,
    verbose: bool,
) -> Result<(), CliError> {
    // Unsupported targets fail before the database is touched.
    let format = FormatType::from_str(format)?;
    format.ensure_exportable()?;
    validate_language_code(lang)?;
    validate_output_path(output)?;

    let db = open(db_path, false)?;
    let options = ExportOptions::new().with_comments(include_comments);
    let entries = muidb::export_file(&db, output, format, lang, &options)?;
    if verbose {
        println!(
            "Wrote {} [{}]: {} entries",
            output.display(),
            lang,
            entries
        );
    }
    Ok(())
}

pub fn run_verify(db_path: &Path) -> Result<(), CliError> {
    let mut db = open(db_path, false)?;
    let report = db.verify();
    db.save()?;

    eprint!("{}", render_report(&report));
    Ok(())
}

/// The report printed by `muidb verify`, one warning per issue followed by
/// the totals.
pub fn render_report(report: &VerifyReport) -> String {
    let mut out = String::new();
    for issue in &report.issues {
        out.push_str(&format!("Warning: {}\n", issue));
    }
    out.push_str(&format!(
        "Checked {} items, {} entries: {} issue(s)\n",
        report.items_checked,
        report.entries_checked,
        report.issues.len()
    ));
    out
}

pub fn run_add_output(db_path: &Path, name: &str, lang: &str) -> Result<(), CliError> {
    validate_language_code(lang)?;

    let mut db = open(db_path, true)?;
    db.add_output_file(name, lang)?;
    db.save()?;
    info!("Registered output file {} [{}]", name, lang);
    println!("Output file {} [{}] registered", name, lang);
    Ok(())
}
