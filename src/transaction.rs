//! This file defines the `Transaction` type, a builder for creating and
//! updating transactions, and the database functions for storing and
//! querying them.
//!
//! A transaction is one financial record (an expense, a received payment, a
//! check, an apartment sale, or an invoice) optionally tagged with a title,
//! a cash owner, and a construction group.

use std::ops::RangeInclusive;

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    DatabaseID, Error, construction_group::resolve_construction_group,
};

/// A financial record with monetary fields and optional tag references.
///
/// The tag names (`title_name`, `cash_owner_name`, `construction_group_name`)
/// are joined in by the read functions and are `None` wherever the matching
/// ID is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,

    /// The ID of the title the transaction is tagged with, if any.
    pub title_id: Option<DatabaseID>,

    /// The ID of the cash owner the transaction is tagged with, if any.
    pub cash_owner_id: Option<DatabaseID>,

    /// The ID of the construction group the transaction is tagged with, if
    /// any.
    pub construction_group_id: Option<DatabaseID>,

    /// The date of the transaction.
    pub date: Date,

    /// The company the transaction was made with.
    pub company_name: String,

    /// A free-text description of the transaction.
    pub description: String,

    /// The amount paid out.
    pub expense: f64,

    /// The amount of payment received.
    pub payment_received: f64,

    /// The amount received by check.
    pub check_received: f64,

    /// The amount given by check.
    pub check_given: f64,

    /// The amount received from an apartment sale.
    pub apartment_sale: f64,

    /// The invoiced amount.
    pub invoice_amount: f64,

    /// The quantity of goods or services.
    pub quantity: f64,

    /// The price per unit.
    pub unit_price: f64,

    /// The name of the tagged title, if any.
    pub title_name: Option<String>,

    /// The name of the tagged cash owner, if any.
    pub cash_owner_name: Option<String>,

    /// The name of the tagged construction group, if any.
    pub construction_group_name: Option<String>,
}

impl Transaction {
    /// Start building the data for a transaction dated `date`.
    ///
    /// All other fields default to unset tags, empty strings, and zero
    /// amounts.
    pub fn build(date: Date) -> TransactionBuilder {
        TransactionBuilder {
            date,
            title_id: None,
            cash_owner_id: None,
            construction_group: None,
            company_name: String::new(),
            description: String::new(),
            expense: 0.0,
            payment_received: 0.0,
            check_received: 0.0,
            check_given: 0.0,
            apartment_sale: 0.0,
            invoice_amount: 0.0,
            quantity: 0.0,
            unit_price: 0.0,
        }
    }

    /// The derived total of the transaction, `quantity * unit_price`.
    ///
    /// This value is never stored, it is always computed from the stored
    /// fields.
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// The data needed to create a transaction or overwrite an existing one.
///
/// Create an instance with [Transaction::build] and pass it to
/// [create_transaction] or [update_transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    date: Date,
    title_id: Option<DatabaseID>,
    cash_owner_id: Option<DatabaseID>,
    construction_group: Option<String>,
    company_name: String,
    description: String,
    expense: f64,
    payment_received: f64,
    check_received: f64,
    check_given: f64,
    apartment_sale: f64,
    invoice_amount: f64,
    quantity: f64,
    unit_price: f64,
}

impl TransactionBuilder {
    /// Set the title the transaction is tagged with.
    pub fn title_id(mut self, title_id: Option<DatabaseID>) -> Self {
        self.title_id = title_id;
        self
    }

    /// Set the cash owner the transaction is tagged with.
    pub fn cash_owner_id(mut self, cash_owner_id: Option<DatabaseID>) -> Self {
        self.cash_owner_id = cash_owner_id;
        self
    }

    /// Set the construction group by name.
    ///
    /// The group is resolved when the transaction is written: an existing
    /// group with the exact same name is reused, otherwise a new group is
    /// inserted. An empty name means no group.
    pub fn construction_group(mut self, name: &str) -> Self {
        self.construction_group = if name.is_empty() {
            None
        } else {
            Some(name.to_owned())
        };
        self
    }

    /// Set the company the transaction was made with.
    pub fn company_name(mut self, company_name: &str) -> Self {
        self.company_name = company_name.to_owned();
        self
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the amount paid out.
    pub fn expense(mut self, expense: f64) -> Self {
        self.expense = expense;
        self
    }

    /// Set the amount of payment received.
    pub fn payment_received(mut self, payment_received: f64) -> Self {
        self.payment_received = payment_received;
        self
    }

    /// Set the amount received by check.
    pub fn check_received(mut self, check_received: f64) -> Self {
        self.check_received = check_received;
        self
    }

    /// Set the amount given by check.
    pub fn check_given(mut self, check_given: f64) -> Self {
        self.check_given = check_given;
        self
    }

    /// Set the amount received from an apartment sale.
    pub fn apartment_sale(mut self, apartment_sale: f64) -> Self {
        self.apartment_sale = apartment_sale;
        self
    }

    /// Set the invoiced amount.
    pub fn invoice_amount(mut self, invoice_amount: f64) -> Self {
        self.invoice_amount = invoice_amount;
        self
    }

    /// Set the quantity of goods or services.
    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the price per unit.
    pub fn unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = unit_price;
        self
    }

    /// Resolve the construction group name to an ID, inserting the group if
    /// it does not exist yet.
    fn resolve_group(&self, connection: &Connection) -> Result<Option<DatabaseID>, Error> {
        match &self.construction_group {
            Some(name) => Ok(Some(resolve_construction_group(name, connection)?.id)),
            None => Ok(None),
        }
    }
}

const TRANSACTION_COLUMNS: &str = "t.id, t.title_id, t.cash_owner_id, \
    t.construction_group_id, t.date, t.company_name, t.description, \
    t.expense, t.payment_received, t.check_received, t.check_given, \
    t.apartment_sale, t.invoice_amount, t.quantity, t.unit_price, \
    ti.name, co.name, cg.name";

const TRANSACTION_JOINS: &str = "FROM \"transaction\" t \
    LEFT JOIN title ti ON t.title_id = ti.id \
    LEFT JOIN cash_owner co ON t.cash_owner_id = co.id \
    LEFT JOIN construction_group cg ON t.construction_group_id = cg.id";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidForeignKey] if the title or cash owner ID does not refer
///   to an existing record,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let construction_group_id = builder.resolve_group(connection)?;

    connection.execute(
        "INSERT INTO \"transaction\" (
            title_id, cash_owner_id, construction_group_id, date, company_name,
            description, expense, payment_received, check_received, check_given,
            apartment_sale, invoice_amount, quantity, unit_price
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        (
            builder.title_id,
            builder.cash_owner_id,
            construction_group_id,
            builder.date,
            &builder.company_name,
            &builder.description,
            builder.expense,
            builder.payment_received,
            builder.check_received,
            builder.check_given,
            builder.apartment_sale,
            builder.invoice_amount,
            builder.quantity,
            builder.unit_price,
        ),
    )?;

    get_transaction(connection.last_insert_rowid(), connection)
}

/// Retrieve a transaction from the database by its `id`, joined with the
/// names of its title, cash owner, and construction group.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: DatabaseID, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} {TRANSACTION_JOINS} WHERE t.id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Overwrite all mutable fields of the transaction with `id` using the
/// values in `builder`.
///
/// The construction group name is re-resolved exactly as on insert.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - [Error::InvalidForeignKey] if the title or cash owner ID does not refer
///   to an existing record,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: DatabaseID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let construction_group_id = builder.resolve_group(connection)?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET
            title_id = ?1, cash_owner_id = ?2, construction_group_id = ?3,
            date = ?4, company_name = ?5, description = ?6, expense = ?7,
            payment_received = ?8, check_received = ?9, check_given = ?10,
            apartment_sale = ?11, invoice_amount = ?12, quantity = ?13,
            unit_price = ?14
         WHERE id = ?15",
        (
            builder.title_id,
            builder.cash_owner_id,
            construction_group_id,
            builder.date,
            &builder.company_name,
            &builder.description,
            builder.expense,
            builder.payment_received,
            builder.check_received,
            builder.check_given,
            builder.apartment_sale,
            builder.invoice_amount,
            builder.quantity,
            builder.unit_price,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    get_transaction(id, connection)
}

/// Delete a transaction from the database.
///
/// Deleting a transaction that does not exist is a no-op success.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(id: DatabaseID, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    Ok(())
}

/// Defines which transactions should be fetched by [query_transactions].
///
/// Filters that are `None` are not applied; combining filters is a logical
/// AND. The default query matches every transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// Include transactions within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,

    /// Include transactions tagged with the title with this ID.
    pub title_id: Option<DatabaseID>,

    /// Include transactions tagged with the cash owner with this ID.
    pub cash_owner_id: Option<DatabaseID>,
}

/// Query for transactions in the database, joined with the names of their
/// title, cash owner, and construction group.
///
/// Results are ordered by date, newest first. Transactions with the same
/// date keep their insertion order.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn query_transactions(
    filter: TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut query_string_parts = vec![format!(
        "SELECT {TRANSACTION_COLUMNS} {TRANSACTION_JOINS}"
    )];
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(date_range) = filter.date_range {
        // Dates are stored as ISO-8601 text, which sorts lexicographically.
        where_clause_parts.push(format!(
            "t.date BETWEEN ?{} AND ?{}",
            query_parameters.len() + 1,
            query_parameters.len() + 2,
        ));
        query_parameters.push(Value::Text(date_range.start().to_string()));
        query_parameters.push(Value::Text(date_range.end().to_string()));
    }

    if let Some(title_id) = filter.title_id {
        where_clause_parts.push(format!("t.title_id = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Integer(title_id));
    }

    if let Some(cash_owner_id) = filter.cash_owner_id {
        where_clause_parts.push(format!("t.cash_owner_id = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Integer(cash_owner_id));
    }

    if !where_clause_parts.is_empty() {
        query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
    }

    query_string_parts.push("ORDER BY t.date DESC".to_string());

    let query_string = query_string_parts.join(" ");
    let params = params_from_iter(query_parameters.iter());

    connection
        .prepare(&query_string)?
        .query_map(params, map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            title_id INTEGER REFERENCES title(id),
            cash_owner_id INTEGER REFERENCES cash_owner(id),
            construction_group_id INTEGER REFERENCES construction_group(id),
            date TEXT NOT NULL,
            company_name TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            expense REAL NOT NULL DEFAULT 0,
            payment_received REAL NOT NULL DEFAULT 0,
            check_received REAL NOT NULL DEFAULT 0,
            check_given REAL NOT NULL DEFAULT 0,
            apartment_sale REAL NOT NULL DEFAULT 0,
            invoice_amount REAL NOT NULL DEFAULT 0,
            quantity REAL NOT NULL DEFAULT 0,
            unit_price REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title_id: row.get(1)?,
        cash_owner_id: row.get(2)?,
        construction_group_id: row.get(3)?,
        date: row.get(4)?,
        company_name: row.get(5)?,
        description: row.get(6)?,
        expense: row.get(7)?,
        payment_received: row.get(8)?,
        check_received: row.get(9)?,
        check_given: row.get(10)?,
        apartment_sale: row.get(11)?,
        invoice_amount: row.get(12)?,
        quantity: row.get(13)?,
        unit_price: row.get(14)?,
        title_name: row.get(15)?,
        cash_owner_name: row.get(16)?,
        construction_group_name: row.get(17)?,
    })
}
