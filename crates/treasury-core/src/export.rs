use chrono::NaiveDate;

use crate::{models::PaymentRecord, month::MonthKey};

pub const REPORT_HEADERS: [&str; 9] = [
    "Flat No",
    "Name",
    "Amount Paid",
    "Transaction ID",
    "Paid Status",
    "Payment Date",
    "Purpose",
    "Resident Type",
    "Notes",
];

/// Renders records as a CSV document. Every cell is quoted and embedded
/// quotes are doubled; rows are separated by `\n`.
pub fn render_report(records: &[PaymentRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(render_row(REPORT_HEADERS.iter().map(|header| header.to_string())));

    for record in records {
        let notes = if record.notes.is_empty() {
            "-".to_string()
        } else {
            record.notes.clone()
        };

        lines.push(render_row([
            record.flat_number.clone(),
            record.resident_name.clone(),
            format!("₹{}", record.amount_paid.normalize()),
            record.transaction_id.clone(),
            "Paid".to_string(),
            display_date(&record.payment_date),
            record.payment_purpose.clone(),
            record.resident_type.as_str().to_string(),
            notes,
        ]));
    }

    lines.join("\n")
}

pub fn report_file_name(month: Option<&MonthKey>) -> String {
    match month {
        Some(month) => format!("payments-{month}.csv"),
        None => "payments-all.csv".to_string(),
    }
}

fn render_row(cells: impl IntoIterator<Item = String>) -> String {
    cells
        .into_iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
