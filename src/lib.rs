//! Ledgerdesk is a single-user bookkeeping tool for a small construction
//! business: financial transactions are tagged with a title (project/ledger),
//! a cash owner, and an optional construction group, stored in a local SQLite
//! database, and exported as filtered CSV reports.
//!
//! This library provides the storage layer and the report exporter. The
//! binary in `main.rs` is a thin command line interface over them.

#![warn(missing_docs)]

pub mod cash_owner;
pub mod construction_group;
mod database_id;
pub mod db;
mod error;
pub mod report;
pub mod title;
pub mod transaction;

pub use database_id::DatabaseID;
pub use db::initialize;
pub use error::Error;
