//! Writes filtered transaction lists to timestamped CSV report files.

use std::path::{Path, PathBuf};

use time::{OffsetDateTime, macros::format_description};

use crate::{Error, transaction::Transaction};

/// The column headers of an exported report.
///
/// Matches the transaction fields in display order; the final column is the
/// derived total.
pub const REPORT_HEADERS: [&str; 14] = [
    "Date",
    "Title",
    "Cash Owner",
    "Company",
    "Description",
    "Expense",
    "Payment Received",
    "Check Received",
    "Check Given",
    "Apartment Sale",
    "Invoice Amount",
    "Quantity",
    "Unit Price",
    "Total",
];

/// Write `transactions` to a CSV report file in `output_dir`.
///
/// The file is named `ledger_report_<timestamp>.csv` so repeated exports do
/// not overwrite each other. Each row's last column is the derived
/// `quantity * unit_price` total. The output directory is created if it does
/// not exist. Returns the path of the written file.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyReport] if `transactions` is empty,
/// - or [Error::ExportError] if the file could not be written.
pub fn export_transactions(
    transactions: &[Transaction],
    output_dir: &Path,
) -> Result<PathBuf, Error> {
    if transactions.is_empty() {
        return Err(Error::EmptyReport);
    }

    let timestamp = OffsetDateTime::now_utc()
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .map_err(|error| Error::ExportError(error.to_string()))?;

    std::fs::create_dir_all(output_dir)
        .map_err(|error| Error::ExportError(error.to_string()))?;
    let report_path = output_dir.join(format!("ledger_report_{timestamp}.csv"));

    let mut writer = csv::Writer::from_path(&report_path)?;
    writer.write_record(REPORT_HEADERS)?;

    for transaction in transactions {
        writer.write_record([
            transaction.date.to_string(),
            transaction.title_name.clone().unwrap_or_default(),
            transaction.cash_owner_name.clone().unwrap_or_default(),
            transaction.company_name.clone(),
            transaction.description.clone(),
            transaction.expense.to_string(),
            transaction.payment_received.to_string(),
            transaction.check_received.to_string(),
            transaction.check_given.to_string(),
            transaction.apartment_sale.to_string(),
            transaction.invoice_amount.to_string(),
            transaction.quantity.to_string(),
            transaction.unit_price.to_string(),
            transaction.total().to_string(),
        ])?;
    }

    writer
        .flush()
        .map_err(|error| Error::ExportError(error.to_string()))?;

    tracing::info!(
        "wrote a report with {} row(s) to {}",
        transactions.len(),
        report_path.display()
    );

    Ok(report_path)
}
