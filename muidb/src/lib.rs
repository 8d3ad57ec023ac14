#![forbid(unsafe_code)]
//! Multilingual translation database.
//!
//! A `.muidb` file aggregates the texts of many languages, merged from RESX
//! and XLIFF sources, into one canonical store. Each text carries a review
//! state. The store is projected back into one RESX file per language.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use muidb::{Database, ExportOptions, FormatType, LoadOptions};
//!
//! let mut db = Database::load("app.muidb", &LoadOptions::new().with_create_if_missing(true))?;
//! let result = db.import_file("Strings.de.xlf", FormatType::Xliff, "de")?;
//! println!("added {}, updated {}", result.added_count(), result.updated_count());
//! db.save()?;
//!
//! muidb::export::export_all(&db, &ExportOptions::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod database;
pub mod error;
pub mod export;
pub mod formats;
pub mod merge;
pub mod options;
pub mod persistence;
pub mod state;
pub mod summary;
pub mod traits;
pub mod types;
pub mod verify;

// Re-export most used types for easy consumption
pub use crate::{
    database::{Database, LoadAnomaly},
    error::Error,
    export::{ExportedFile, export_all, export_file, export_resx},
    formats::FormatType,
    merge::{ImportResult, MergeOutcome},
    options::{ExportOptions, LoadOptions},
    state::TranslationState,
    summary::{StateCounts, Summary},
    types::{ImportRecord, OutputFileSpec, TextEntry, TranslationItem},
    verify::{Issue, VerifyReport},
};
