//! Sets up the database schema for the application's domain types.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, cash_owner::create_cash_owner_table,
    construction_group::create_construction_group_table, title::create_title_table,
    transaction::create_transaction_table,
};

/// Create the tables for the application's domain types if they do not exist.
///
/// The tables are created inside a single exclusive SQL transaction, so the
/// schema is either fully applied or not at all. Safe to call on every
/// startup.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must be set outside a transaction, SQLite ignores it otherwise.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_title_table(&transaction)?;
    create_cash_owner_table(&transaction)?;
    create_construction_group_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
