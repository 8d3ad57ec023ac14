//! All error types for the muidb crate.
//!
//! These are returned from every fallible operation (loading, importing,
//! exporting, saving). Verification anomalies are not errors; see
//! [`crate::verify`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to replace file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new invalid-resource error.
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Error::InvalidResource(message.into())
    }

    /// True for errors raised while reading a malformed source document.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::XmlParse(_) | Error::XmlAttr(_) | Error::InvalidResource(_)
        )
    }
}
