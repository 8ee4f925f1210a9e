//! This file defines the `CashOwner` type and its database functions.
//! A cash owner names whose cash or account a transaction affects.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{DatabaseID, Error};

/// A named entity representing whose cash or account a transaction affects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashOwner {
    /// The ID of the cash owner.
    pub id: DatabaseID,

    /// The display name of the cash owner.
    pub name: String,
}

/// Create a cash owner in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn create_cash_owner(name: &str, connection: &Connection) -> Result<CashOwner, Error> {
    connection.execute("INSERT INTO cash_owner (name) VALUES (?1);", (name,))?;

    let id = connection.last_insert_rowid();

    Ok(CashOwner {
        id,
        name: name.to_owned(),
    })
}

/// Retrieve all cash owners in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_cash_owners(connection: &Connection) -> Result<Vec<CashOwner>, Error> {
    connection
        .prepare("SELECT id, name FROM cash_owner;")?
        .query_map([], map_row)?
        .map(|maybe_owner| maybe_owner.map_err(|error| error.into()))
        .collect()
}

/// Delete a cash owner from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::CashOwnerInUse] if any transaction still references the cash
///   owner,
/// - [Error::NotFound] if the cash owner does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_cash_owner(id: DatabaseID, connection: &Connection) -> Result<(), Error> {
    let dependents = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE cash_owner_id = :id;",
        &[(":id", &id)],
        |row| row.get::<_, i64>(0),
    )? as usize;

    if dependents > 0 {
        return Err(Error::CashOwnerInUse(dependents));
    }

    let rows_affected = connection.execute("DELETE FROM cash_owner WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the cash owner table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_cash_owner_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS cash_owner (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<CashOwner, rusqlite::Error> {
    Ok(CashOwner {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

#[cfg(test)]
mod cash_owner_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    use super::{create_cash_owner, delete_cash_owner, get_all_cash_owners};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize the database");
        connection
    }

    #[test]
    fn create_cash_owner_succeeds() {
        let connection = get_test_db_connection();

        let owner =
            create_cash_owner("Main Cash", &connection).expect("Could not create cash owner");

        assert!(owner.id > 0);
        assert_eq!(owner.name, "Main Cash");
    }

    #[test]
    fn get_all_cash_owners_returns_inserted_owners() {
        let connection = get_test_db_connection();
        let inserted = vec![
            create_cash_owner("Main Cash", &connection).expect("Could not create cash owner"),
            create_cash_owner("Site Safe", &connection).expect("Could not create cash owner"),
        ];

        let owners = get_all_cash_owners(&connection).expect("Could not get cash owners");

        assert_eq!(owners, inserted);
    }

    #[test]
    fn delete_unreferenced_cash_owner_succeeds() {
        let connection = get_test_db_connection();
        let owner =
            create_cash_owner("Main Cash", &connection).expect("Could not create cash owner");

        delete_cash_owner(owner.id, &connection).expect("Could not delete cash owner");

        let owners = get_all_cash_owners(&connection).expect("Could not get cash owners");
        assert!(owners.is_empty());
    }

    #[test]
    fn delete_referenced_cash_owner_returns_cash_owner_in_use() {
        let connection = get_test_db_connection();
        let owner =
            create_cash_owner("Main Cash", &connection).expect("Could not create cash owner");
        let builder = Transaction::build(date!(2024 - 01 - 15)).cash_owner_id(Some(owner.id));
        create_transaction(builder, &connection).expect("Could not create transaction");

        let result = delete_cash_owner(owner.id, &connection);

        assert_eq!(result, Err(Error::CashOwnerInUse(1)));
    }
}
