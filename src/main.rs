//! Command line interface for the ledgerdesk bookkeeping tool.
//!
//! Opens (creating if necessary) the SQLite ledger database, applies the
//! schema, and runs one store or report operation per invocation.

use std::{fs::OpenOptions, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ledgerdesk::{
    DatabaseID, Error,
    cash_owner::{create_cash_owner, delete_cash_owner, get_all_cash_owners},
    construction_group::get_all_construction_groups,
    initialize,
    report::export_transactions,
    title::{create_title, delete_title, get_all_titles},
    transaction::{
        Transaction, TransactionBuilder, TransactionQuery, create_transaction,
        delete_transaction, query_transactions, update_transaction,
    },
};

/// A single-user bookkeeping tool for project ledgers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the ledger SQLite database.
    #[arg(long, default_value = "ledger.db")]
    db_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a title (a project or ledger to tag transactions with).
    AddTitle {
        /// The display name of the title.
        name: String,
    },

    /// List all titles.
    Titles,

    /// Delete a title. Fails while transactions still reference it.
    DeleteTitle {
        /// The ID of the title to delete.
        id: DatabaseID,
    },

    /// Create a cash owner.
    AddCashOwner {
        /// The display name of the cash owner.
        name: String,
    },

    /// List all cash owners.
    CashOwners,

    /// Delete a cash owner. Fails while transactions still reference it.
    DeleteCashOwner {
        /// The ID of the cash owner to delete.
        id: DatabaseID,
    },

    /// List all construction groups.
    Groups,

    /// Record a transaction.
    AddTransaction(TransactionArgs),

    /// Overwrite all fields of an existing transaction.
    UpdateTransaction {
        /// The ID of the transaction to update.
        id: DatabaseID,

        #[command(flatten)]
        fields: TransactionArgs,
    },

    /// Delete a transaction.
    DeleteTransaction {
        /// The ID of the transaction to delete.
        id: DatabaseID,
    },

    /// List transactions, newest first.
    Transactions(FilterArgs),

    /// Export filtered transactions to a timestamped CSV report.
    Export {
        /// Directory to write the report file into.
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// The field values of a transaction, as collected from the command line.
#[derive(clap::Args, Debug)]
struct TransactionArgs {
    /// The transaction date (YYYY-MM-DD).
    #[arg(long)]
    date: String,

    /// The ID of the title to tag the transaction with.
    #[arg(long)]
    title_id: Option<DatabaseID>,

    /// The ID of the cash owner to tag the transaction with.
    #[arg(long)]
    cash_owner_id: Option<DatabaseID>,

    /// The construction group name. Created on first use; empty means none.
    #[arg(long, default_value = "")]
    group: String,

    /// The company the transaction was made with.
    #[arg(long, default_value = "")]
    company: String,

    /// A free-text description.
    #[arg(long, default_value = "")]
    description: String,

    /// The amount paid out.
    #[arg(long, default_value_t = 0.0)]
    expense: f64,

    /// The amount of payment received.
    #[arg(long, default_value_t = 0.0)]
    payment_received: f64,

    /// The amount received by check.
    #[arg(long, default_value_t = 0.0)]
    check_received: f64,

    /// The amount given by check.
    #[arg(long, default_value_t = 0.0)]
    check_given: f64,

    /// The amount received from an apartment sale.
    #[arg(long, default_value_t = 0.0)]
    apartment_sale: f64,

    /// The invoiced amount.
    #[arg(long, default_value_t = 0.0)]
    invoice_amount: f64,

    /// The quantity of goods or services.
    #[arg(long, default_value_t = 0.0)]
    quantity: f64,

    /// The price per unit.
    #[arg(long, default_value_t = 0.0)]
    unit_price: f64,
}

impl TransactionArgs {
    fn into_builder(self) -> Result<TransactionBuilder, Error> {
        Ok(Transaction::build(parse_date(&self.date)?)
            .title_id(self.title_id)
            .cash_owner_id(self.cash_owner_id)
            .construction_group(&self.group)
            .company_name(&self.company)
            .description(&self.description)
            .expense(self.expense)
            .payment_received(self.payment_received)
            .check_received(self.check_received)
            .check_given(self.check_given)
            .apartment_sale(self.apartment_sale)
            .invoice_amount(self.invoice_amount)
            .quantity(self.quantity)
            .unit_price(self.unit_price))
    }
}

/// Optional filters for listing and exporting transactions.
#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Start of the date range, inclusive (YYYY-MM-DD).
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// End of the date range, inclusive (YYYY-MM-DD).
    #[arg(long, requires = "from")]
    to: Option<String>,

    /// Only include transactions tagged with this title ID.
    #[arg(long)]
    title_id: Option<DatabaseID>,

    /// Only include transactions tagged with this cash owner ID.
    #[arg(long)]
    cash_owner_id: Option<DatabaseID>,
}

impl FilterArgs {
    fn into_query(self) -> Result<TransactionQuery, Error> {
        let date_range = match (self.from, self.to) {
            (Some(from), Some(to)) => Some(parse_date(&from)?..=parse_date(&to)?),
            _ => None,
        };

        Ok(TransactionQuery {
            date_range,
            title_id: self.title_id,
            cash_owner_id: self.cash_owner_id,
        })
    }
}

fn parse_date(text: &str) -> Result<Date, Error> {
    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    Date::parse(text, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

fn main() {
    setup_logging();

    let args = Args::parse();

    let connection =
        Connection::open(&args.db_path).expect("Could not open the ledger database.");
    initialize(&connection).expect("Could not initialize the database schema.");

    if let Err(error) = run(args.command, &connection) {
        tracing::error!("{error}");
        std::process::exit(1);
    }
}

fn run(command: Command, connection: &Connection) -> Result<(), Error> {
    match command {
        Command::AddTitle { name } => {
            let title = create_title(&name, connection)?;
            println!("Created title {}: {}", title.id, title.name);
        }
        Command::Titles => {
            for title in get_all_titles(connection)? {
                println!("{}\t{}", title.id, title.name);
            }
        }
        Command::DeleteTitle { id } => {
            delete_title(id, connection)?;
            println!("Deleted title {id}");
        }
        Command::AddCashOwner { name } => {
            let owner = create_cash_owner(&name, connection)?;
            println!("Created cash owner {}: {}", owner.id, owner.name);
        }
        Command::CashOwners => {
            for owner in get_all_cash_owners(connection)? {
                println!("{}\t{}", owner.id, owner.name);
            }
        }
        Command::DeleteCashOwner { id } => {
            delete_cash_owner(id, connection)?;
            println!("Deleted cash owner {id}");
        }
        Command::Groups => {
            for group in get_all_construction_groups(connection)? {
                println!("{}\t{}", group.id, group.name);
            }
        }
        Command::AddTransaction(fields) => {
            let transaction = create_transaction(fields.into_builder()?, connection)?;
            println!("Created transaction {}", transaction.id);
        }
        Command::UpdateTransaction { id, fields } => {
            update_transaction(id, fields.into_builder()?, connection)?;
            println!("Updated transaction {id}");
        }
        Command::DeleteTransaction { id } => {
            delete_transaction(id, connection)?;
            println!("Deleted transaction {id}");
        }
        Command::Transactions(filters) => {
            for transaction in query_transactions(filters.into_query()?, connection)? {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}",
                    transaction.id,
                    transaction.date,
                    transaction.title_name.as_deref().unwrap_or("-"),
                    transaction.cash_owner_name.as_deref().unwrap_or("-"),
                    transaction.description,
                    transaction.expense,
                    transaction.total(),
                );
            }
        }
        Command::Export {
            output_dir,
            filters,
        } => {
            let transactions = query_transactions(filters.into_query()?, connection)?;
            let report_path = export_transactions(&transactions, &output_dir)?;
            println!("Wrote report to {}", report_path.display());
        }
    }

    Ok(())
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}
