// 🚫 Errors - Structural failures that abort a migration
//
// Missing references are NOT errors here: they skip a session and get
// counted in the summary. Only an export that is structurally broken
// (missing columns, unparseable catalog ids) ends up in this enum.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrationError {
    /// A row lacks a column every row of its table must carry
    #[error("{table} row {row}: missing required field '{field}'")]
    MissingField {
        table: String,
        row: usize,
        field: String,
    },

    /// `bgg_id` did not parse as an integer
    #[error("{table} row {row}: invalid catalog id '{value}'")]
    InvalidCatalogId {
        table: String,
        row: usize,
        value: String,
    },

    #[error("color palette must contain at least one color")]
    EmptyPalette,
}

/// Convenience Result type for the migration core
pub type Result<T> = std::result::Result<T, MigrationError>;
