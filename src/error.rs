//! Defines the crate level error type and its conversion from SQLite errors.

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested row could not be found with the provided ID.
    #[error("the requested record could not be found")]
    NotFound,

    /// Tried to delete a title that transactions still reference.
    ///
    /// The caller should delete or re-tag the referencing transactions first.
    #[error("the title is still referenced by {0} transaction(s)")]
    TitleInUse(usize),

    /// Tried to delete a cash owner that transactions still reference.
    #[error("the cash owner is still referenced by {0} transaction(s)")]
    CashOwnerInUse(usize),

    /// Tried to update a transaction that does not exist.
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// A query was given an ID that does not refer to an existing title,
    /// cash owner, or construction group.
    #[error("a foreign key does not refer to an existing record")]
    InvalidForeignKey,

    /// A date string could not be parsed as an ISO-8601 calendar date.
    #[error("could not parse \"{0}\" as a date (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// Tried to export a report for a filter that matched no transactions.
    #[error("no transactions matched the report filters")]
    EmptyReport,

    /// The report file could not be written.
    ///
    /// Carries the message of the underlying CSV or I/O error.
    #[error("could not write the report file: {0}")]
    ExportError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidForeignKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::ExportError(value.to_string())
    }
}
