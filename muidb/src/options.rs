//! Options for loading a database and exporting from it.

/// Load behavior options for [`crate::Database::load`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Return an empty database instead of failing when the file is missing.
    pub create_if_missing: bool,
}

impl LoadOptions {
    /// Creates default load options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables/disables creation of an empty database for a missing file.
    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }
}

/// Export behavior options for the [`crate::export`] functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Render each item's accumulated comments next to its text.
    pub include_comments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_comments: true,
        }
    }
}

impl ExportOptions {
    /// Creates default export options (comments included).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables/disables comment output.
    pub fn with_comments(mut self, include_comments: bool) -> Self {
        self.include_comments = include_comments;
        self
    }
}
