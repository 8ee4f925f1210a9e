//! This file defines the `ConstructionGroup` type and its database functions.
//! A construction group is a free-text secondary tag for transactions,
//! deduplicated by exact name match when a transaction is written.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{DatabaseID, Error};

/// A free-text, lazily-deduplicated secondary tag for transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionGroup {
    /// The ID of the construction group.
    pub id: DatabaseID,

    /// The name of the construction group.
    pub name: String,
}

/// Get the construction group with the exact `name`, inserting it first if it
/// does not exist.
///
/// Matching is case and whitespace sensitive. The name column carries a
/// UNIQUE constraint and the lookup-or-insert is a single upsert statement,
/// so two writers racing on the same name cannot create duplicate rows.
///
/// Callers must not pass an empty name; an absent group is represented by
/// not calling this function at all (see
/// [TransactionBuilder::construction_group](crate::transaction::TransactionBuilder::construction_group)).
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn resolve_construction_group(
    name: &str,
    connection: &Connection,
) -> Result<ConstructionGroup, Error> {
    // DO NOTHING would return no row on conflict, hence the self-assignment.
    connection
        .prepare(
            "INSERT INTO construction_group (name) VALUES (?1)
             ON CONFLICT(name) DO UPDATE SET name = excluded.name
             RETURNING id, name",
        )?
        .query_row((name,), map_row)
        .map_err(|error| error.into())
}

/// Retrieve all construction groups in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_construction_groups(
    connection: &Connection,
) -> Result<Vec<ConstructionGroup>, Error> {
    connection
        .prepare("SELECT id, name FROM construction_group;")?
        .query_map([], map_row)?
        .map(|maybe_group| maybe_group.map_err(|error| error.into()))
        .collect()
}

/// Create the construction group table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_construction_group_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS construction_group (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<ConstructionGroup, rusqlite::Error> {
    Ok(ConstructionGroup {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

#[cfg(test)]
mod construction_group_tests {
    use rusqlite::Connection;

    use super::{
        create_construction_group_table, get_all_construction_groups, resolve_construction_group,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_construction_group_table(&connection)
            .expect("Could not create construction group table");
        connection
    }

    #[test]
    fn resolve_inserts_new_group() {
        let connection = get_test_db_connection();

        let group =
            resolve_construction_group("Foundations", &connection).expect("Could not resolve");

        assert!(group.id > 0);
        assert_eq!(group.name, "Foundations");
    }

    #[test]
    fn resolve_twice_returns_same_id_without_duplicates() {
        let connection = get_test_db_connection();

        let first =
            resolve_construction_group("Foundations", &connection).expect("Could not resolve");
        let second =
            resolve_construction_group("Foundations", &connection).expect("Could not resolve");

        assert_eq!(first, second);

        let groups = get_all_construction_groups(&connection).expect("Could not get groups");
        assert_eq!(groups, vec![first]);
    }

    #[test]
    fn resolve_matches_names_exactly() {
        let connection = get_test_db_connection();

        let lowercase =
            resolve_construction_group("foundations", &connection).expect("Could not resolve");
        let capitalised =
            resolve_construction_group("Foundations", &connection).expect("Could not resolve");
        let padded =
            resolve_construction_group("Foundations ", &connection).expect("Could not resolve");

        assert_ne!(lowercase.id, capitalised.id);
        assert_ne!(capitalised.id, padded.id);
    }
}
