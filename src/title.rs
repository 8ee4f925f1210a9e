//! This file defines the `Title` type and its database functions.
//! A title is a named grouping, such as a project or ledger, that
//! transactions are tagged with.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{DatabaseID, Error};

/// A named grouping (e.g., a project or ledger) that a transaction can be
/// tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// The ID of the title.
    pub id: DatabaseID,

    /// The display name of the title.
    pub name: String,
}

/// Create a title in the database.
///
/// Names are not checked for uniqueness or emptiness, the caller decides
/// what a sensible name is.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn create_title(name: &str, connection: &Connection) -> Result<Title, Error> {
    connection.execute("INSERT INTO title (name) VALUES (?1);", (name,))?;

    let id = connection.last_insert_rowid();

    Ok(Title {
        id,
        name: name.to_owned(),
    })
}

/// Retrieve all titles in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_titles(connection: &Connection) -> Result<Vec<Title>, Error> {
    connection
        .prepare("SELECT id, name FROM title;")?
        .query_map([], map_row)?
        .map(|maybe_title| maybe_title.map_err(|error| error.into()))
        .collect()
}

/// Delete a title from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::TitleInUse] if any transaction still references the title,
/// - [Error::NotFound] if the title does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_title(id: DatabaseID, connection: &Connection) -> Result<(), Error> {
    let dependents = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE title_id = :id;",
        &[(":id", &id)],
        |row| row.get::<_, i64>(0),
    )? as usize;

    if dependents > 0 {
        return Err(Error::TitleInUse(dependents));
    }

    let rows_affected = connection.execute("DELETE FROM title WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the title table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_title_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS title (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Title, rusqlite::Error> {
    Ok(Title {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

#[cfg(test)]
mod title_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    use super::{create_title, delete_title, get_all_titles};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize the database");
        connection
    }

    #[test]
    fn create_title_succeeds() {
        let connection = get_test_db_connection();

        let title = create_title("Block A", &connection).expect("Could not create title");

        assert!(title.id > 0);
        assert_eq!(title.name, "Block A");
    }

    #[test]
    fn create_title_allows_duplicate_names() {
        let connection = get_test_db_connection();

        let first = create_title("Block A", &connection).expect("Could not create title");
        let second = create_title("Block A", &connection).expect("Could not create title");

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn get_all_titles_returns_inserted_titles() {
        let connection = get_test_db_connection();
        let inserted = vec![
            create_title("Block A", &connection).expect("Could not create title"),
            create_title("Block B", &connection).expect("Could not create title"),
        ];

        let titles = get_all_titles(&connection).expect("Could not get titles");

        assert_eq!(titles, inserted);
    }

    #[test]
    fn delete_unreferenced_title_succeeds() {
        let connection = get_test_db_connection();
        let title = create_title("Block A", &connection).expect("Could not create title");

        delete_title(title.id, &connection).expect("Could not delete title");

        let titles = get_all_titles(&connection).expect("Could not get titles");
        assert!(!titles.contains(&title));
    }

    #[test]
    fn delete_title_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let result = delete_title(999, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_referenced_title_fails_and_changes_nothing() {
        let connection = get_test_db_connection();
        let title = create_title("Block A", &connection).expect("Could not create title");
        let builder = Transaction::build(date!(2024 - 01 - 15)).title_id(Some(title.id));
        let transaction =
            create_transaction(builder, &connection).expect("Could not create transaction");

        let result = delete_title(title.id, &connection);

        assert_eq!(result, Err(Error::TitleInUse(1)));

        let titles = get_all_titles(&connection).expect("Could not get titles");
        assert!(titles.contains(&title), "title should still exist");

        let got = crate::transaction::get_transaction(transaction.id, &connection)
            .expect("transaction should still exist");
        assert_eq!(got.title_id, Some(title.id));
    }
}
