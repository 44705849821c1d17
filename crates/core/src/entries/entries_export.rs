//! CSV export of saved entries.

use chrono::{Local, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fmt::Display;

use crate::constants::{DISPLAY_DECIMAL_PRECISION, EXPORT_TIMESTAMP_FORMAT};
use crate::entries::entries_model::SavedEntry;
use crate::errors::{Error, Result};

/// Column labels of the export, in order.
pub const EXPORT_HEADERS: [&str; 9] = [
    "Stock",
    "Purchase",
    "Market",
    "Gross Profit",
    "Purifying %",
    "Purifying Value",
    "Total Fees",
    "Net Profit (Purified)",
    "Saved At",
];

/// Renders entries as CSV, with timestamps shown in the machine's local time.
pub fn export_entries_csv_local(entries: &[SavedEntry]) -> Result<Option<String>> {
    export_entries_csv(entries, &Local)
}

/// Renders entries as CSV in the order given.
///
/// Returns `Ok(None)` for an empty slice; no header-only file is produced.
/// Every field is quoted, rows end with CRLF, numbers carry exactly three
/// decimals and `Saved At` is shown in `tz`.
pub fn export_entries_csv<Tz>(entries: &[SavedEntry], tz: &Tz) -> Result<Option<String>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if entries.is_empty() {
        return Ok(None);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for entry in entries {
        writer.write_record(export_row(entry, tz))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    let csv = String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))?;
    Ok(Some(csv))
}

fn export_row<Tz>(entry: &SavedEntry, tz: &Tz) -> [String; 9]
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    [
        entry.stock_name.clone(),
        format_amount(entry.purchase_value),
        format_amount(entry.market_value),
        format_amount(entry.profit),
        format_amount(entry.purifying_percentage),
        format_amount(entry.purifying_amount),
        format_amount(entry.total_fees()),
        format_amount(entry.final_profit),
        entry
            .saved_at
            .with_timezone(tz)
            .format(EXPORT_TIMESTAMP_FORMAT)
            .to_string(),
    ]
}

/// Fixed three-decimal rendering. Negative zero prints as `0.000`.
///
/// Amounts are finite by construction: `calculate` and `save` reject
/// anything else.
pub fn format_amount(value: f64) -> String {
    debug_assert!(value.is_finite(), "non-finite amount {value}");
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", DISPLAY_DECIMAL_PRECISION, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn entry(name: &str, saved_at: &str) -> SavedEntry {
        SavedEntry {
            id: format!("id-{name}"),
            saved_at: saved_at.parse().unwrap(),
            stock_name: name.to_string(),
            purchase_value: 100.0,
            market_value: 150.9996,
            app_fees: 1.5,
            third_party_fee: 0.25,
            purifying_percentage: 10.0,
            profit: 51.0,
            net_profit: 49.25,
            purifying_amount: 5.1,
            final_profit: 44.15,
        }
    }

    #[test]
    fn test_empty_list_has_nothing_to_export() {
        assert_eq!(export_entries_csv(&[], &Utc).unwrap(), None);
    }

    #[test]
    fn test_export_layout() {
        let entries = vec![entry("ACME", "2024-05-01T09:30:00.000Z")];

        let csv = export_entries_csv(&entries, &Utc).unwrap().unwrap();

        let expected = "\"Stock\",\"Purchase\",\"Market\",\"Gross Profit\",\"Purifying %\",\
                        \"Purifying Value\",\"Total Fees\",\"Net Profit (Purified)\",\"Saved At\"\r\n\
                        \"ACME\",\"100.000\",\"151.000\",\"51.000\",\"10.000\",\"5.100\",\"1.750\",\
                        \"44.150\",\"2024-05-01 09:30:00\"\r\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_export_row_count_matches_entries() {
        let entries = vec![
            entry("B", "2024-05-02T10:00:00.000Z"),
            entry("A", "2024-05-01T10:00:00.000Z"),
        ];

        let csv = export_entries_csv(&entries, &Utc).unwrap().unwrap();
        let rows: Vec<&str> = csv.split_terminator("\r\n").collect();

        assert_eq!(rows.len(), entries.len() + 1);
        assert!(rows[1].starts_with("\"B\""));
        assert!(rows[2].starts_with("\"A\""));
    }

    #[test]
    fn test_numeric_fields_have_three_decimals() {
        let entries = vec![entry("ACME", "2024-05-01T09:30:00.000Z")];
        let csv = export_entries_csv(&entries, &Utc).unwrap().unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        for record in reader.records() {
            let record = record.unwrap();
            for field in record.iter().skip(1).take(7) {
                let (_, decimals) = field.split_once('.').unwrap();
                assert_eq!(decimals.len(), 3, "field {field}");
            }
        }
    }

    #[test]
    fn test_quotes_in_stock_name_are_doubled() {
        let entries = vec![entry("Say \"hi\", Inc", "2024-05-01T09:30:00.000Z")];

        let csv = export_entries_csv(&entries, &Utc).unwrap().unwrap();

        assert!(csv.contains("\"Say \"\"hi\"\", Inc\""));
    }

    #[test]
    fn test_saved_at_uses_given_timezone() {
        let entries = vec![entry("ACME", "2024-05-01T22:30:00.000Z")];
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();

        let csv = export_entries_csv(&entries, &istanbul).unwrap().unwrap();

        assert!(csv.contains("\"2024-05-02 01:30:00\""));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(45.9), "45.900");
        assert_eq!(format_amount(-55.0), "-55.000");
        assert_eq!(format_amount(-0.0), "0.000");
        assert_eq!(format_amount(0.125), "0.125");
        assert_eq!(format_amount(1e306).split_once('.').unwrap().1, "000");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-finite amount")]
    fn test_format_amount_rejects_non_finite() {
        format_amount(f64::NAN);
    }
}
