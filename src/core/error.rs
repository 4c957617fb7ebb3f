use thiserror::Error;

use super::status::DocumentStatus;

/// Errors that can occur during document construction or processing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NfceError {
    /// A field failed validation (malformed CNPJ, short justification, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A document with the same (number, series) pair already exists.
    #[error("document number {number} is already used in series {series}")]
    DuplicateDocument {
        /// The requested document number.
        number: u32,
        /// The numbering series.
        series: u16,
    },

    /// Lookup by id or access key found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A lifecycle operation was attempted from the wrong status.
    #[error("cannot {operation}: document must be {required}, but is {actual}")]
    InvalidStateTransition {
        /// The attempted operation.
        operation: &'static str,
        /// The status the operation requires.
        required: DocumentStatus,
        /// The status the document actually has.
        actual: DocumentStatus,
    },

    /// XML rendering failed; the document must never be left half-written.
    #[error("XML error: {0}")]
    Xml(String),
}
